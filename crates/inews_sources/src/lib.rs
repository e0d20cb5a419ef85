pub mod fetch;
pub mod newsapi;

pub use fetch::{get_headlines, get_search_results};
pub use newsapi::NewsApiClient;
