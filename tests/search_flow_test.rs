use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use holiday_search::models::{BestHotelOffer, Hotel};
use holiday_search::search::codec;
use holiday_search::search::{
    MemoryNavigator, Navigator, OfferClient, Query, Resolution, SearchForm, SearchParameters,
    SearchState, SearchStateController,
};
use holiday_search::FetchError;
use tokio::sync::mpsc;

/// Answers each search with one offer whose hotel id equals the requested
/// duration, after a per-duration delay.
#[derive(Clone, Default)]
struct ScriptedClient {
    delays_ms: Arc<HashMap<i32, u64>>,
    failing: bool,
    calls: Arc<Mutex<Vec<SearchParameters>>>,
}

impl ScriptedClient {
    fn with_delays(delays: &[(i32, u64)]) -> Self {
        Self {
            delays_ms: Arc::new(delays.iter().copied().collect()),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<SearchParameters> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OfferClient for ScriptedClient {
    async fn fetch(&self, params: &SearchParameters) -> Result<Vec<BestHotelOffer>, FetchError> {
        self.calls.lock().unwrap().push(params.clone());
        if let Some(ms) = self.delays_ms.get(&params.duration) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.failing {
            return Err(FetchError::Decode("unexpected end of input".into()));
        }
        Ok(vec![offer(i64::from(params.duration))])
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

fn offer(hotel_id: i64) -> BestHotelOffer {
    BestHotelOffer {
        hotel: Hotel {
            id: hotel_id,
            name: Some(format!("Hotel {hotel_id}")),
            stars: Some(4.0),
        },
        min_price: 640.0,
        departure_date: "2024-07-05T06:00:00".into(),
        return_date: "2024-07-12T18:00:00".into(),
        count_adults: 2,
        count_children: 0,
        duration: 7,
        count_available_offers: 3,
        room_type: None,
        meal_type: None,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

fn form(duration: i32) -> SearchForm {
    SearchForm {
        departure_airports: vec!["MUC".into(), "FRA".into()],
        count_adults: 2,
        count_children: 0,
        duration,
        earliest_departure: "2024-07-05T00:00:00.000Z".into(),
        latest_return: "2024-07-30T00:00:00.000Z".into(),
        meal_type: String::new(),
        room_type: String::new(),
        ocean_view: true,
    }
}

#[tokio::test]
async fn landing_page_does_not_fetch() {
    let client = ScriptedClient::default();
    let mut controller = SearchStateController::new(client.clone(), MemoryNavigator::from_url("/"))
        .pinned_to(today());

    assert_eq!(controller.load_initial().await, None);
    assert_eq!(controller.state(), &SearchState::Idle);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn shared_url_restores_and_fetches_the_search() {
    let mut shared = SearchParameters::defaults_on(today());
    shared.departure_airports = vec!["HAM".into()];
    shared.duration = 5;
    let url = format!("/?{}", codec::encode(&shared));

    let client = ScriptedClient::default();
    let mut controller = SearchStateController::new(client.clone(), MemoryNavigator::from_url(&url))
        .pinned_to(today());

    assert_eq!(controller.load_initial().await, Some(Resolution::Applied));
    assert_eq!(controller.params(), &shared);
    assert_eq!(client.calls(), vec![shared]);
    assert_eq!(controller.offers(), &[offer(5)]);
}

#[tokio::test]
async fn submit_updates_url_then_loads() {
    let client = ScriptedClient::default();
    let mut controller =
        SearchStateController::new(client.clone(), MemoryNavigator::new("/")).pinned_to(today());

    assert_eq!(controller.search(form(10)).await, Resolution::Applied);

    let query = controller.navigator().current_query();
    assert_eq!(query.get("departureAirports"), Some("MUC,FRA"));
    assert_eq!(query.get("duration"), Some("10"));
    assert_eq!(query.get("oceanView"), Some("true"));
    assert!(!query.contains_key("mealType"));
    assert!(!query.contains_key("roomType"));

    // the URL decodes back to exactly what was fetched
    assert_eq!(codec::decode_on(&query, today()), client.calls()[0]);
    assert_eq!(controller.offers(), &[offer(10)]);
}

#[tokio::test]
async fn repeated_identical_search_keeps_one_history_entry() {
    let navigator = MemoryNavigator::new("/");
    let mut controller =
        SearchStateController::new(ScriptedClient::default(), navigator).pinned_to(today());

    controller.search(form(7)).await;
    controller.search(form(7)).await;

    assert_eq!(controller.navigator().history().len(), 2);
}

#[tokio::test]
async fn failed_fetch_surfaces_message() {
    let navigator = MemoryNavigator::new("/");
    let mut controller =
        SearchStateController::new(ScriptedClient::failing(), navigator).pinned_to(today());

    assert_eq!(controller.search(form(7)).await, Resolution::Applied);
    match controller.state() {
        SearchState::Failed(message) => assert!(message.contains("unexpected end of input")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(controller.offers().is_empty());
}

#[tokio::test]
async fn later_search_wins_when_earlier_response_arrives_last() {
    // duration 3 answers slowly, duration 9 answers quickly
    let client = ScriptedClient::with_delays(&[(3, 120), (9, 5)]);
    let mut controller =
        SearchStateController::new(client.clone(), MemoryNavigator::new("/")).pinned_to(today());
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    for duration in [3, 9] {
        let ticket = controller.submit(form(duration));
        let client = client.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch(&ticket.params).await;
            let _ = done_tx.send((ticket.token, result));
        });
    }
    drop(done_tx);

    let mut resolutions = Vec::new();
    while let Some((token, result)) = done_rx.recv().await {
        resolutions.push((token, controller.resolve(token, result)));
    }

    assert_eq!(resolutions, vec![(2, Resolution::Applied), (1, Resolution::Stale)]);
    assert_eq!(controller.offers(), &[offer(9)]);
    assert_eq!(controller.params().duration, 9);
    assert_eq!(
        controller.navigator().current_query().get("duration"),
        Some("9")
    );
}

#[test]
fn bare_query_text_round_trips_through_the_navigator() {
    let mut navigator = MemoryNavigator::new("/");
    let params = codec::decode_on(&Query::parse("countAdults=4&mealType=breakfast"), today());

    navigator.replace_url(&codec::encode(&params));

    let restored = codec::decode_on(&Query::parse(&navigator.location()), today());
    assert_eq!(restored, params);
}
