use serde::{Deserialize, Serialize};

/// Hotel summary attached to every offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotel {
    pub id: i64,
    pub name: Option<String>,
    pub stars: Option<f64>,
}

/// Cheapest matching offer of one hotel, as listed on the search page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BestHotelOffer {
    pub hotel: Hotel,
    pub min_price: f64,
    pub departure_date: String,
    pub return_date: String,
    pub count_adults: i32,
    pub count_children: i32,
    pub duration: i32,
    pub count_available_offers: i64,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
}

impl BestHotelOffer {
    /// Stable identifier used to open the hotel's offers page
    pub fn hotel_id(&self) -> i64 {
        self.hotel.id
    }
}

/// A single bookable offer. Field names follow the offers index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub price: f64,
    #[serde(rename = "countadults")]
    pub count_adults: i32,
    #[serde(rename = "countchildren")]
    pub count_children: i32,
    #[serde(rename = "outbounddepartureairport")]
    pub outbound_departure_airport: String,
    #[serde(rename = "mealtype")]
    pub meal_type: String,
    #[serde(rename = "oceanview")]
    pub ocean_view: bool,
    #[serde(rename = "roomtype")]
    pub room_type: String,
    #[serde(rename = "outbounddeparturedatetime")]
    pub outbound_departure_datetime: String,
    #[serde(rename = "inbounddeparturedatetime")]
    pub inbound_departure_datetime: String,
    #[serde(rename = "inbounddepartureairport", default)]
    pub inbound_departure_airport: Option<String>,
    #[serde(rename = "inboundarrivalairport", default)]
    pub inbound_arrival_airport: Option<String>,
    #[serde(rename = "inboundarrivaldatetime", default)]
    pub inbound_arrival_datetime: Option<String>,
    #[serde(rename = "outboundarrivalairport", default)]
    pub outbound_arrival_airport: Option<String>,
    #[serde(rename = "outboundarrivaldatetime", default)]
    pub outbound_arrival_datetime: Option<String>,
}

/// All offers of one hotel matching a search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelOffers {
    pub hotel: Hotel,
    pub items: Vec<Offer>,
}
