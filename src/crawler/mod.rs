//! Crawl frontier, HTTP fetcher, and the fetch loop that drives them

mod engine;
mod fetcher;
mod frontier;

pub use engine::{mirror, Engine};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use frontier::{Frontier, PendingLink};
