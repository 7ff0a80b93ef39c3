use crate::config::Settings;
use crate::error::FetchError;
use crate::models::{BestHotelOffer, HotelOffers};
use crate::search::codec::format_date;
use crate::search::traits::OfferClient;
use crate::search::types::{QueryField, SearchParameters};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Offers API client
pub struct HttpOfferClient {
    client: Client,
    base_url: Url,
}

impl HttpOfferClient {
    /// Create a client for the API described by `settings`
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(&settings.api_base_url)
            .map_err(|e| FetchError::InvalidBaseUrl(format!("{}: {e}", settings.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl(settings.api_base_url.clone()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// All offers of one hotel for the given search
    pub async fn hotel_offers(
        &self,
        hotel_id: i64,
        params: &SearchParameters,
    ) -> Result<HotelOffers, FetchError> {
        let hotels: HotelOffers = self
            .get_json(&format!("hotels/{hotel_id}/offers"), params)
            .await?;
        info!(hotel_id, offers = hotels.items.len(), "fetched hotel offers");
        Ok(hotels)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &SearchParameters,
    ) -> Result<T, FetchError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::InvalidBaseUrl(e.to_string()))?;

        debug!("Fetching URL: {}", url);

        let response = self.client.get(url).query(&api_query(params)).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Offers API returned status: {}", status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Downloaded {} bytes", body.len());
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl OfferClient for HttpOfferClient {
    async fn fetch(&self, params: &SearchParameters) -> Result<Vec<BestHotelOffer>, FetchError> {
        let offers: Vec<BestHotelOffer> = self.get_json("bestOffersByHotel", params).await?;
        info!(offers = offers.len(), "fetched best offers by hotel");
        Ok(offers)
    }

    fn source_name(&self) -> &'static str {
        "offers-api"
    }
}

/// Request parameters for the offers API. Airports are repeated under
/// `departureAirports[]`; meal and room type are sent only when set.
pub fn api_query(params: &SearchParameters) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = params
        .departure_airports
        .iter()
        .map(|code| (format!("{}[]", QueryField::DepartureAirports), code.clone()))
        .collect();

    let mut push = |field: QueryField, value: String| pairs.push((field.to_string(), value));
    push(QueryField::EarliestDepartureDate, format_date(params.earliest_departure_date));
    push(QueryField::LatestReturnDate, format_date(params.latest_return_date));
    push(QueryField::CountAdults, params.count_adults.to_string());
    push(QueryField::CountChildren, params.count_children.to_string());
    push(QueryField::Duration, params.duration.to_string());
    if let Some(meal_type) = params.meal_type {
        push(QueryField::MealType, meal_type.to_string());
    }
    if let Some(room_type) = params.room_type {
        push(QueryField::RoomType, room_type.to_string());
    }
    push(QueryField::OceanView, params.ocean_view.to_string());

    pairs
}
