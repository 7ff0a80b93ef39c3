use crate::error::FetchError;
use crate::models::BestHotelOffer;
use crate::search::query::Query;
use crate::search::types::SearchParameters;
use async_trait::async_trait;

/// Source of hotel offers for a search
#[async_trait]
pub trait OfferClient: Send + Sync {
    /// Fetch the best offer per hotel matching `params`
    async fn fetch(&self, params: &SearchParameters) -> Result<Vec<BestHotelOffer>, FetchError>;

    /// Name used in log output
    fn source_name(&self) -> &'static str;
}

/// Access to the page location that holds the current search
pub trait Navigator {
    fn current_query(&self) -> Query;

    /// Replace the current location's query without adding a history entry
    /// for an identical location.
    fn replace_url(&mut self, query: &Query);
}
