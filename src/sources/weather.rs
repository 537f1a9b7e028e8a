//! Current conditions from wttr.in's JSON (`format=j1`) endpoint.

use super::{parse_number, DataSource, FetchError};
use crate::screens::WeatherReport;
use reqwest::Client;
use serde::Deserialize;

#[derive(Deserialize)]
struct WttrResponse {
    current_condition: Vec<CurrentCondition>,
}

#[derive(Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "FeelsLikeF")]
    feels_like_f: String,
    humidity: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<TextValue>,
}

#[derive(Deserialize)]
struct TextValue {
    value: String,
}

/// Decode a wttr.in `j1` body into a report.
pub fn parse_report(body: &str) -> Result<WeatherReport, FetchError> {
    let response: WttrResponse = serde_json::from_str(body)?;
    let current = response
        .current_condition
        .into_iter()
        .next()
        .ok_or(FetchError::Missing("current_condition"))?;
    let condition = current
        .weather_desc
        .into_iter()
        .next()
        .ok_or(FetchError::Missing("weatherDesc"))?
        .value;

    let temp: f32 = parse_number("temp_F", &current.temp_f)?;
    let feels_like: f32 = parse_number("FeelsLikeF", &current.feels_like_f)?;

    Ok(WeatherReport {
        temp_f: temp.round_ties_even() as i32,
        condition,
        humidity: parse_number("humidity", &current.humidity)?,
        feels_like_f: feels_like.round_ties_even() as i32,
    })
}

pub struct WeatherSource {
    client: Client,
    url: String,
}

impl WeatherSource {
    /// `location` is anything wttr.in accepts: a ZIP code, city or airport.
    pub fn new(client: Client, location: &str) -> Self {
        Self {
            client,
            url: format!("https://wttr.in/{location}?format=j1"),
        }
    }
}

impl DataSource for WeatherSource {
    type Output = WeatherReport;

    fn name(&self) -> &'static str {
        "weather"
    }

    async fn fetch(&self) -> Result<WeatherReport, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_report(&body)
    }
}
