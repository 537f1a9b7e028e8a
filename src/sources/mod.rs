//! # Data Sources
//!
//! One HTTP client per screen, each turning an upstream JSON API into the
//! typed snapshot data its screen renders:
//!
//! - [`weather::WeatherSource`]: wttr.in current conditions
//! - [`standings::StandingsSource`]: MLB stats API division standings
//! - [`transit::TransitSource`]: Transiter stop departures
//!
//! ## Error Handling
//!
//! Every failure mode maps onto [`FetchError`]. Nothing here is fatal: the
//! controller folds errors into the screen's snapshot according to its
//! [`crate::screens::FailurePolicy`] and logs them.
//!
//! ## Timeouts
//!
//! Each client carries a request timeout, and the controller additionally
//! bounds every `fetch()` with the same limit, so a hung upstream can never
//! stall a refresh cycle.

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub mod standings;
pub mod transit;
pub mod weather;

pub use standings::StandingsSource;
pub use transit::TransitSource;
pub use weather::WeatherSource;

/// Errors that can occur while fetching and decoding upstream data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request failed (DNS, connect, TLS, non-2xx status, client timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The whole fetch exceeded the refresh deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Body was not the JSON shape we expect
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// JSON parsed but a required value was absent
    #[error("missing {0} in response")]
    Missing(&'static str),

    /// A numeric field held something other than a number
    #[error("invalid {field}: '{value}'")]
    Number { field: &'static str, value: String },

    /// The configured division was not among those returned
    #[error("division {0} not in response")]
    DivisionNotFound(u32),
}

/// A collaborator that produces one screen's data on demand.
pub trait DataSource: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    /// Short name for log lines.
    fn name(&self) -> &'static str;

    fn fetch(&self) -> impl Future<Output = Result<Self::Output, FetchError>> + Send;
}

/// HTTP client shared by the built-in sources.
pub fn http_client(timeout: Duration) -> Result<Client, FetchError> {
    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, FetchError> {
    value.trim().parse().map_err(|_| FetchError::Number {
        field,
        value: value.to_string(),
    })
}
