use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Field defaults shared by the query codec and the search controller.
pub struct SearchDefaults;

impl SearchDefaults {
    pub const COUNT_ADULTS: i32 = 2;
    pub const COUNT_CHILDREN: i32 = 0;
    /// Trip length in days
    pub const DURATION: i32 = 7;
    /// Days between today and the default latest return date
    pub const RETURN_WINDOW_DAYS: u64 = 14;

    pub fn earliest_departure_date(today: NaiveDate) -> NaiveDate {
        today
    }

    pub fn latest_return_date(today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(Self::RETURN_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Today's date in UTC, the reference point for date defaults
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Board included with an offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    None,
    Breakfast,
    HalfBoard,
    AllInclusive,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::None,
        MealType::Breakfast,
        MealType::HalfBoard,
        MealType::AllInclusive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::None => "none",
            MealType::Breakfast => "breakfast",
            MealType::HalfBoard => "halfboard",
            MealType::AllInclusive => "allinclusive",
        }
    }
}

/// Room category of an offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Double,
    Single,
    Apartment,
    Studio,
    JuniorSuite,
    Suite,
    Triple,
}

impl RoomType {
    pub const ALL: [RoomType; 7] = [
        RoomType::Double,
        RoomType::Single,
        RoomType::Apartment,
        RoomType::Studio,
        RoomType::JuniorSuite,
        RoomType::Suite,
        RoomType::Triple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Double => "double",
            RoomType::Single => "single",
            RoomType::Apartment => "apartment",
            RoomType::Studio => "studio",
            RoomType::JuniorSuite => "juniorsuite",
            RoomType::Suite => "suite",
            RoomType::Triple => "triple",
        }
    }
}

/// A literal that is not one of the known meal or room types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for MealType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|meal| meal.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "meal type",
                value: s.to_string(),
            })
    }
}

impl FromStr for RoomType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|room| room.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "room type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the query parameters that make up a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    DepartureAirports,
    CountAdults,
    CountChildren,
    Duration,
    EarliestDepartureDate,
    LatestReturnDate,
    MealType,
    RoomType,
    OceanView,
}

impl QueryField {
    pub const ALL: [QueryField; 9] = [
        QueryField::DepartureAirports,
        QueryField::CountAdults,
        QueryField::CountChildren,
        QueryField::Duration,
        QueryField::EarliestDepartureDate,
        QueryField::LatestReturnDate,
        QueryField::MealType,
        QueryField::RoomType,
        QueryField::OceanView,
    ];

    /// Parameter name as it appears in the URL (case-sensitive)
    pub fn as_str(self) -> &'static str {
        match self {
            QueryField::DepartureAirports => "departureAirports",
            QueryField::CountAdults => "countAdults",
            QueryField::CountChildren => "countChildren",
            QueryField::Duration => "duration",
            QueryField::EarliestDepartureDate => "earliestDepartureDate",
            QueryField::LatestReturnDate => "latestReturnDate",
            QueryField::MealType => "mealType",
            QueryField::RoomType => "roomType",
            QueryField::OceanView => "oceanView",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search parameters for hotel offers.
///
/// Every field always holds a concrete value. Counts and duration are not
/// range-checked here; the offers API receives them as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    /// Airport codes in selection order, not checked against a known set
    pub departure_airports: Vec<String>,
    pub count_adults: i32,
    pub count_children: i32,
    /// Trip length in days
    pub duration: i32,
    pub earliest_departure_date: NaiveDate,
    pub latest_return_date: NaiveDate,
    /// `None` means any meal type
    pub meal_type: Option<MealType>,
    /// `None` means any room type
    pub room_type: Option<RoomType>,
    pub ocean_view: bool,
}

impl SearchParameters {
    /// The fully defaulted search relative to `today`
    pub fn defaults_on(today: NaiveDate) -> Self {
        Self {
            departure_airports: Vec::new(),
            count_adults: SearchDefaults::COUNT_ADULTS,
            count_children: SearchDefaults::COUNT_CHILDREN,
            duration: SearchDefaults::DURATION,
            earliest_departure_date: SearchDefaults::earliest_departure_date(today),
            latest_return_date: SearchDefaults::latest_return_date(today),
            meal_type: None,
            room_type: None,
            ocean_view: false,
        }
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self::defaults_on(today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_the_table() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let params = SearchParameters::defaults_on(today);

        assert!(params.departure_airports.is_empty());
        assert_eq!(params.count_adults, 2);
        assert_eq!(params.count_children, 0);
        assert_eq!(params.duration, 7);
        assert_eq!(params.earliest_departure_date, today);
        assert_eq!(
            params.latest_return_date,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
        );
        assert_eq!(params.meal_type, None);
        assert_eq!(params.room_type, None);
        assert!(!params.ocean_view);
    }

    #[test]
    fn enum_literals_parse_back() {
        for meal in MealType::ALL {
            assert_eq!(meal.as_str().parse::<MealType>(), Ok(meal));
        }
        for room in RoomType::ALL {
            assert_eq!(room.as_str().parse::<RoomType>(), Ok(room));
        }
        assert!("Breakfast".parse::<MealType>().is_err());
        assert!("penthouse".parse::<RoomType>().is_err());
    }
}
