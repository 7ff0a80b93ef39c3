//! Hotel offer search whose current criteria live in a shareable URL.

pub mod config;
pub mod error;
pub mod models;
pub mod search;

pub use error::FetchError;
