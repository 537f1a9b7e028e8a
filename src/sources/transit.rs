//! Stop departures from a Transiter instance.
//!
//! Departure times arrive as Unix seconds and are converted to whole minutes
//! from now, truncating toward zero, so a train 30 seconds past its departure
//! time still counts as "NOW".

use super::{parse_number, DataSource, FetchError};
use crate::screens::Departures;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

const TRANSITER_URL: &str = "https://demo.transiter.dev/systems";
const PROXY_URL: &str = "https://api.allorigins.win/get";

/// Which departures at the stop belong on the screen.
#[derive(Clone, Debug)]
pub struct DepartureFilter {
    pub route: String,
    /// Substring of the headsign, e.g. "Uptown"
    pub headsign_contains: String,
    /// Exclusive upper bound in minutes
    pub window_minutes: u32,
}

#[derive(Deserialize)]
struct ProxyEnvelope {
    contents: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopResponse {
    #[serde(default)]
    stop_times: Vec<StopTime>,
}

#[derive(Deserialize)]
struct StopTime {
    trip: Option<Trip>,
    #[serde(default)]
    headsign: String,
    departure: Option<Event>,
}

#[derive(Deserialize)]
struct Trip {
    route: Option<Route>,
}

#[derive(Deserialize)]
struct Route {
    id: String,
}

#[derive(Deserialize)]
struct Event {
    time: EpochSeconds,
}

/// Transiter encodes timestamps as strings; older builds used integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum EpochSeconds {
    Int(i64),
    Text(String),
}

impl EpochSeconds {
    fn seconds(&self) -> Result<i64, FetchError> {
        match self {
            EpochSeconds::Int(secs) => Ok(*secs),
            EpochSeconds::Text(text) => parse_number("departure.time", text),
        }
    }
}

impl StopTime {
    fn matches(&self, filter: &DepartureFilter) -> bool {
        let route = self
            .trip
            .as_ref()
            .and_then(|trip| trip.route.as_ref())
            .map(|route| route.id.as_str());
        route == Some(filter.route.as_str()) && self.headsign.contains(&filter.headsign_contains)
    }
}

/// Decode a Transiter stop body into the departures to display at `now`.
pub fn parse_departures(
    body: &str,
    filter: &DepartureFilter,
    now: DateTime<Utc>,
) -> Result<Departures, FetchError> {
    let response: StopResponse = serde_json::from_str(body)?;
    let now = now.timestamp();

    let mut minutes = Vec::new();
    for stop_time in response.stop_times.iter().filter(|st| st.matches(filter)) {
        if let Some(departure) = &stop_time.departure {
            let seconds = departure.time.seconds()?;
            let delta = seconds.checked_sub(now).ok_or_else(|| FetchError::Number {
                field: "departure.time",
                value: seconds.to_string(),
            })?;
            minutes.push(delta / 60);
        }
    }

    Ok(Departures::from_minutes(minutes, filter.window_minutes))
}

/// Unwrap an allorigins.win `{ "contents": "..." }` envelope.
pub fn unwrap_proxy(body: &str) -> Result<String, FetchError> {
    let envelope: ProxyEnvelope = serde_json::from_str(body)?;
    Ok(envelope.contents)
}

pub struct TransitSource {
    client: Client,
    url: String,
    filter: DepartureFilter,
    use_proxy: bool,
}

impl TransitSource {
    pub fn new(
        client: Client,
        system: &str,
        stop_id: &str,
        filter: DepartureFilter,
        use_proxy: bool,
    ) -> Self {
        Self {
            client,
            url: format!("{TRANSITER_URL}/{system}/stops/{stop_id}"),
            filter,
            use_proxy,
        }
    }
}

impl DataSource for TransitSource {
    type Output = Departures;

    fn name(&self) -> &'static str {
        "transit"
    }

    async fn fetch(&self) -> Result<Departures, FetchError> {
        let request = if self.use_proxy {
            self.client.get(PROXY_URL).query(&[("url", self.url.as_str())])
        } else {
            self.client.get(&self.url)
        };
        let body = request.send().await?.error_for_status()?.text().await?;
        let body = if self.use_proxy {
            unwrap_proxy(&body)?
        } else {
            body
        };
        parse_departures(&body, &self.filter, Utc::now())
    }
}
