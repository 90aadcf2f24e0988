//! HTTP fetcher
//!
//! Builds the HTTP client and performs single requests with manual redirect
//! handling. Every response is classified into a closed outcome the engine
//! can act on; nothing here is fatal to the crawl.

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Classified result of fetching one pending link.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 3xx with a Location header. The target has not been resolved or
    /// fetched; it becomes new frontier work.
    Redirect {
        /// Raw Location header value.
        location: String,
    },

    /// 2xx with the full body read.
    Success {
        /// Raw Content-Type header value, when present.
        content_type: Option<String>,
        body: Vec<u8>,
    },

    /// Anything else: non-2xx/3xx status, 3xx without Location, or a
    /// network failure. Logged and dropped by the engine.
    Failed { detail: String },
}

/// Builds the HTTP client used for the whole run.
///
/// Redirects are handled manually and no cookie store is configured, so
/// requests carry no credentials.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("sitefold/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET and classifies the response by its status-code
/// hundreds digit.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchOutcome {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::Failed {
                detail: e.to_string(),
            }
        }
    };

    let status = response.status();
    match status.as_u16() / 100 {
        3 => {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok());
            match location {
                Some(location) => FetchOutcome::Redirect {
                    location: location.to_string(),
                },
                None => FetchOutcome::Failed {
                    detail: format!("HTTP {} without a Location header", status.as_u16()),
                },
            }
        }
        2 => {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            match response.bytes().await {
                Ok(body) => FetchOutcome::Success {
                    content_type,
                    body: body.to_vec(),
                },
                Err(e) => FetchOutcome::Failed {
                    detail: format!("failed to read body: {}", e),
                },
            }
        }
        _ => FetchOutcome::Failed {
            detail: format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ),
        },
    }
}
