//! Conversion between a URL query and [`SearchParameters`].
//!
//! Decoding is total: absent or unparseable fields resolve to the values in
//! [`SearchDefaults`](super::types::SearchDefaults). Each substitution is
//! recorded in a [`DecodeReport`] so callers can observe it without treating
//! it as an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use super::query::Query;
use super::types::{today, MealType, QueryField, RoomType, SearchParameters};

/// Why a field fell back to its default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The parameter was not in the query
    Missing,
    /// The parameter was present but could not be parsed; holds the raw text
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub field: QueryField,
    pub reason: FallbackReason,
}

/// Fields that were defaulted while building a [`SearchParameters`] value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    fallbacks: Vec<Fallback>,
}

impl DecodeReport {
    pub fn fallbacks(&self) -> &[Fallback] {
        &self.fallbacks
    }

    pub fn is_defaulted(&self, field: QueryField) -> bool {
        self.reason(field).is_some()
    }

    pub fn reason(&self, field: QueryField) -> Option<&FallbackReason> {
        self.fallbacks
            .iter()
            .find(|fallback| fallback.field == field)
            .map(|fallback| &fallback.reason)
    }

    /// Fields that were present but unparseable
    pub fn malformed(&self) -> impl Iterator<Item = QueryField> + '_ {
        self.fallbacks
            .iter()
            .filter(|fallback| matches!(fallback.reason, FallbackReason::Malformed(_)))
            .map(|fallback| fallback.field)
    }

    pub(crate) fn missing(&mut self, field: QueryField) {
        self.fallbacks.push(Fallback {
            field,
            reason: FallbackReason::Missing,
        });
    }

    pub(crate) fn malformed_value(&mut self, field: QueryField, raw: &str) {
        debug!(field = field.as_str(), raw, "substituting default for malformed value");
        self.fallbacks.push(Fallback {
            field,
            reason: FallbackReason::Malformed(raw.to_string()),
        });
    }
}

/// Decode `query` using today's date for the date defaults.
pub fn decode(query: &Query) -> SearchParameters {
    decode_on(query, today())
}

/// Decode `query` relative to a fixed `today`.
pub fn decode_on(query: &Query, today: NaiveDate) -> SearchParameters {
    decode_with_report(query, today).0
}

pub fn decode_with_report(query: &Query, today: NaiveDate) -> (SearchParameters, DecodeReport) {
    let defaults = SearchParameters::defaults_on(today);
    let mut report = DecodeReport::default();

    let departure_airports = decode_airports(query, &mut report);
    let count_adults = decode_int(query, QueryField::CountAdults, &mut report)
        .unwrap_or(defaults.count_adults);
    let count_children = decode_int(query, QueryField::CountChildren, &mut report)
        .unwrap_or(defaults.count_children);
    let duration =
        decode_int(query, QueryField::Duration, &mut report).unwrap_or(defaults.duration);
    let earliest_departure_date = decode_date(query, QueryField::EarliestDepartureDate, &mut report)
        .unwrap_or(defaults.earliest_departure_date);
    let latest_return_date = decode_date(query, QueryField::LatestReturnDate, &mut report)
        .unwrap_or(defaults.latest_return_date);
    let meal_type = decode_variant::<MealType>(query, QueryField::MealType, &mut report);
    let room_type = decode_variant::<RoomType>(query, QueryField::RoomType, &mut report);
    let ocean_view = decode_bool(query, QueryField::OceanView, &mut report);

    let params = SearchParameters {
        departure_airports,
        count_adults,
        count_children,
        duration,
        earliest_departure_date,
        latest_return_date,
        meal_type,
        room_type,
        ocean_view,
    };
    (params, report)
}

/// Encode every field of `params`. Meal and room type are left out when unset.
pub fn encode(params: &SearchParameters) -> Query {
    let mut query = Query::new();
    query.append(
        QueryField::DepartureAirports.as_str(),
        params.departure_airports.join(","),
    );
    query.append(QueryField::CountAdults.as_str(), params.count_adults.to_string());
    query.append(
        QueryField::CountChildren.as_str(),
        params.count_children.to_string(),
    );
    query.append(QueryField::Duration.as_str(), params.duration.to_string());
    query.append(
        QueryField::EarliestDepartureDate.as_str(),
        format_date(params.earliest_departure_date),
    );
    query.append(
        QueryField::LatestReturnDate.as_str(),
        format_date(params.latest_return_date),
    );
    if let Some(meal_type) = params.meal_type {
        query.append(QueryField::MealType.as_str(), meal_type.as_str());
    }
    if let Some(room_type) = params.room_type {
        query.append(QueryField::RoomType.as_str(), room_type.as_str());
    }
    query.append(QueryField::OceanView.as_str(), params.ocean_view.to_string());
    query
}

/// Link to the per-hotel offers page for the current search.
pub fn offers_link(params: &SearchParameters, hotel_id: i64) -> String {
    let mut query = encode(params);
    query.append("hotelId", hotel_id.to_string());
    format!("/offers?{query}")
}

/// Dates travel as midnight UTC in ISO-8601, e.g. `2024-07-01T00:00:00.000Z`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// Date-time layouts read after RFC 3339. `%Y` takes the signed expanded
/// years (`+10000`, `-0001`) that [`format_date`] writes outside 0..=9999.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Accepts RFC 3339 date-times (the date is taken in the text's own offset),
/// UTC or naive date-times with a `T` or space separator, and plain
/// `YYYY-MM-DD` dates, including expanded years.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = restore_offset_sign(raw.trim());

    if let Ok(datetime) = DateTime::parse_from_rfc3339(&raw) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f%:z") {
        return Some(datetime.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(&raw, format) {
            return Some(datetime.date());
        }
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()
}

/// Form decoding turns an unescaped `+HH:MM` offset into ` HH:MM`; put the
/// sign back when a space sits in that position after a time of day.
fn restore_offset_sign(raw: &str) -> String {
    match raw.rsplit_once(' ') {
        Some((head, offset)) if head.contains(':') && is_hh_mm(offset) => {
            format!("{head}+{offset}")
        }
        _ => raw.to_string(),
    }
}

fn is_hh_mm(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
}

fn decode_airports(query: &Query, report: &mut DecodeReport) -> Vec<String> {
    let field = QueryField::DepartureAirports;
    if !query.contains_key(field.as_str()) {
        report.missing(field);
        return Vec::new();
    }

    let codes: Vec<String> = query
        .get_all(field.as_str())
        .flat_map(|value| value.split(','))
        .map(str::to_string)
        .collect();
    // a leading empty token means nothing was selected
    match codes.first() {
        Some(first) if !first.is_empty() => codes,
        _ => Vec::new(),
    }
}

fn decode_int(query: &Query, field: QueryField, report: &mut DecodeReport) -> Option<i32> {
    let Some(raw) = query.get(field.as_str()) else {
        report.missing(field);
        return None;
    };
    match raw.trim().parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            report.malformed_value(field, raw);
            None
        }
    }
}

fn decode_date(query: &Query, field: QueryField, report: &mut DecodeReport) -> Option<NaiveDate> {
    let Some(raw) = query.get(field.as_str()) else {
        report.missing(field);
        return None;
    };
    let parsed = parse_date(raw);
    if parsed.is_none() {
        report.malformed_value(field, raw);
    }
    parsed
}

fn decode_variant<T>(query: &Query, field: QueryField, report: &mut DecodeReport) -> Option<T>
where
    T: std::str::FromStr,
{
    let Some(raw) = query.get(field.as_str()) else {
        report.missing(field);
        return None;
    };
    // an empty value is an explicit "any"
    if raw.is_empty() {
        return None;
    }
    let parsed = raw.parse::<T>().ok();
    if parsed.is_none() {
        report.malformed_value(field, raw);
    }
    parsed
}

/// Truthy coercion: any present value other than the usual false literals is `true`.
fn decode_bool(query: &Query, field: QueryField, report: &mut DecodeReport) -> bool {
    let Some(raw) = query.get(field.as_str()) else {
        report.missing(field);
        return false;
    };
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "off" | "no"
    )
}
