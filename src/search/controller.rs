//! Search session state: the current parameters, the fetch lifecycle and
//! the URL that mirrors them.
//!
//! Every fetch is issued with a token. Only the first completion carrying the
//! token of the pending fetch changes the visible state, so a slow earlier
//! response can never overwrite the result of a later search.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::BestHotelOffer;
use crate::search::codec::{self, parse_date, DecodeReport};
use crate::search::traits::{Navigator, OfferClient};
use crate::search::types::{today, MealType, QueryField, RoomType, SearchParameters};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// No search has been issued yet
    Idle,
    Loading,
    Loaded(Vec<BestHotelOffer>),
    /// The last fetch failed; holds the error message
    Failed(String),
}

/// Raw values from the search form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchForm {
    pub departure_airports: Vec<String>,
    pub count_adults: i32,
    pub count_children: i32,
    pub duration: i32,
    pub earliest_departure: String,
    pub latest_return: String,
    /// Empty means any
    pub meal_type: String,
    /// Empty means any
    pub room_type: String,
    pub ocean_view: bool,
}

/// A fetch that has been issued but not yet resolved
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub token: u64,
    pub params: SearchParameters,
}

/// Outcome of handing a completed fetch to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// Not the pending fetch (superseded, already applied, or never issued);
    /// the result was dropped
    Stale,
}

pub struct SearchStateController<C, N> {
    client: C,
    navigator: N,
    params: SearchParameters,
    state: SearchState,
    issued_tokens: u64,
    pending_token: Option<u64>,
    last_report: DecodeReport,
    pinned_today: Option<NaiveDate>,
}

impl<C, N> SearchStateController<C, N>
where
    C: OfferClient,
    N: Navigator,
{
    pub fn new(client: C, navigator: N) -> Self {
        Self {
            client,
            navigator,
            params: SearchParameters::default(),
            state: SearchState::Idle,
            issued_tokens: 0,
            pending_token: None,
            last_report: DecodeReport::default(),
            pinned_today: None,
        }
    }

    /// Use a fixed date for every "today" default
    pub fn pinned_to(mut self, today: NaiveDate) -> Self {
        self.pinned_today = Some(today);
        self.params = SearchParameters::defaults_on(today);
        self
    }

    pub fn params(&self) -> &SearchParameters {
        &self.params
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Offers of the last applied successful fetch
    pub fn offers(&self) -> &[BestHotelOffer] {
        match &self.state {
            SearchState::Loaded(offers) => offers.as_slice(),
            _ => &[],
        }
    }

    /// Fields defaulted while building the current parameters
    pub fn last_report(&self) -> &DecodeReport {
        &self.last_report
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Decode the current location. Returns a ticket when the location
    /// carries a search; a bare landing page stays idle.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        let query = self.navigator.current_query();
        let (params, report) = codec::decode_with_report(&query, self.today());
        self.params = params;
        self.last_report = report;

        let has_search = query
            .get(QueryField::EarliestDepartureDate.as_str())
            .is_some_and(|raw| !raw.trim().is_empty());
        if !has_search {
            debug!("no search in current location, staying idle");
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Store the submitted search, mirror it into the URL and issue a fetch.
    pub fn submit(&mut self, form: SearchForm) -> FetchTicket {
        let (params, report) = assemble(form, self.today());
        self.params = params;
        self.last_report = report;

        let query = codec::encode(&self.params);
        self.navigator.replace_url(&query);
        self.begin_fetch()
    }

    /// Apply the result of the fetch identified by `token`.
    pub fn resolve(
        &mut self,
        token: u64,
        result: Result<Vec<BestHotelOffer>, FetchError>,
    ) -> Resolution {
        if self.pending_token != Some(token) {
            debug!(token, pending = ?self.pending_token, "discarding stale fetch result");
            return Resolution::Stale;
        }
        self.pending_token = None;

        self.state = match result {
            Ok(offers) => {
                info!(token, offers = offers.len(), "search loaded");
                SearchState::Loaded(offers)
            }
            Err(e) => {
                warn!(token, error = %e, "search failed");
                SearchState::Failed(e.to_string())
            }
        };
        Resolution::Applied
    }

    /// Mount and, when the location carries a search, wait for its results.
    pub async fn load_initial(&mut self) -> Option<Resolution> {
        let ticket = self.mount()?;
        Some(self.run(ticket).await)
    }

    /// Submit and wait for the results.
    pub async fn search(&mut self, form: SearchForm) -> Resolution {
        let ticket = self.submit(form);
        self.run(ticket).await
    }

    async fn run(&mut self, ticket: FetchTicket) -> Resolution {
        let result = self.client.fetch(&ticket.params).await;
        self.resolve(ticket.token, result)
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_tokens += 1;
        let token = self.issued_tokens;
        self.pending_token = Some(token);
        self.state = SearchState::Loading;
        info!(token, source = self.client.source_name(), "issuing search");
        FetchTicket {
            token,
            params: self.params.clone(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.pinned_today.unwrap_or_else(today)
    }
}

/// Build parameters from form values. Empty meal/room type strings mean
/// "any"; unparseable dates and unknown type literals fall back to defaults.
pub fn assemble(form: SearchForm, today: NaiveDate) -> (SearchParameters, DecodeReport) {
    let defaults = SearchParameters::defaults_on(today);
    let mut report = DecodeReport::default();

    let mut date_or_default = |field: QueryField, raw: &str, default: NaiveDate| {
        if raw.trim().is_empty() {
            report.missing(field);
            return default;
        }
        parse_date(raw).unwrap_or_else(|| {
            report.malformed_value(field, raw);
            default
        })
    };
    let earliest_departure_date = date_or_default(
        QueryField::EarliestDepartureDate,
        &form.earliest_departure,
        defaults.earliest_departure_date,
    );
    let latest_return_date = date_or_default(
        QueryField::LatestReturnDate,
        &form.latest_return,
        defaults.latest_return_date,
    );

    let meal_type = non_empty(&form.meal_type).and_then(|raw| {
        raw.parse::<MealType>().ok().or_else(|| {
            report.malformed_value(QueryField::MealType, raw);
            None
        })
    });
    let room_type = non_empty(&form.room_type).and_then(|raw| {
        raw.parse::<RoomType>().ok().or_else(|| {
            report.malformed_value(QueryField::RoomType, raw);
            None
        })
    });

    let params = SearchParameters {
        departure_airports: form.departure_airports,
        count_adults: form.count_adults,
        count_children: form.count_children,
        duration: form.duration,
        earliest_departure_date,
        latest_return_date,
        meal_type,
        room_type,
        ocean_view: form.ocean_view,
    };
    (params, report)
}

fn non_empty(raw: &str) -> Option<&str> {
    Some(raw).filter(|value| !value.is_empty())
}
