pub mod client;
pub mod codec;
pub mod controller;
pub mod navigation;
pub mod query;
pub mod traits;
pub mod types;

pub use client::HttpOfferClient;
pub use controller::{FetchTicket, Resolution, SearchForm, SearchState, SearchStateController};
pub use navigation::MemoryNavigator;
pub use query::Query;
pub use traits::{Navigator, OfferClient};
pub use types::{MealType, QueryField, RoomType, SearchDefaults, SearchParameters};
