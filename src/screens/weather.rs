//! Current conditions screen.
//!
//! ```text
//! row  0  NYC  72F
//! row  6  PARTLY
//! row 12  FEELS  70F
//! row 18  HUMIDITY  65%
//! ```

use super::{Layout, LayoutError, ScreenRenderer, Snapshot};
use crate::canvas::Rgb;

/// Current conditions as reported by the weather service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherReport {
    /// Temperature in °F, rounded
    pub temp_f: i32,
    /// Free-form condition text, e.g. "Partly cloudy"
    pub condition: String,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Apparent temperature in °F, rounded
    pub feels_like_f: i32,
}

/// Keyword → abbreviation, checked in order; first substring match wins.
///
/// Matching is case-sensitive, so "Partly cloudy" hits "Partly cloudy" and
/// never the later "Cloudy" entry.
const CONDITIONS: [(&str, &str); 11] = [
    ("Sunny", "SUNNY"),
    ("Clear", "CLEAR"),
    ("Partly cloudy", "PARTLY"),
    ("Cloudy", "CLOUDY"),
    ("Overcast", "OVRCAST"),
    ("Mist", "MISTY"),
    ("Light rain", "LT RAIN"),
    ("Rain", "RAINY"),
    ("Heavy rain", "HVY RAIN"),
    ("Snow", "SNOWY"),
    ("Fog", "FOGGY"),
];

const LABEL_COLOR: Rgb = Rgb::new(100, 180, 255);
const TEMP_COLOR: Rgb = Rgb::new(255, 220, 180);
const CONDITION_COLOR: Rgb = Rgb::new(200, 200, 255);
const FEELS_LABEL_COLOR: Rgb = Rgb::new(150, 170, 190);
const FEELS_COLOR: Rgb = Rgb::new(200, 180, 160);
const HUMIDITY_LABEL_COLOR: Rgb = Rgb::new(100, 200, 255);
const HUMIDITY_COLOR: Rgb = Rgb::new(150, 220, 255);

/// Condense a condition string to fit one 16-column text row.
pub fn short_condition(condition: &str) -> String {
    CONDITIONS
        .iter()
        .find(|(key, _)| condition.contains(key))
        .map(|(_, short)| short.to_string())
        .unwrap_or_else(|| condition.chars().take(10).collect::<String>().to_uppercase())
}

pub struct WeatherScreen {
    label: String,
}

impl WeatherScreen {
    /// `label` is the short location name drawn before the temperature.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn fields(&self, temp: &str, condition: &str, feels: &str, humidity: &str) -> Layout {
        let mut layout = Layout::new();
        layout
            .text(self.label.as_str(), 1, 0, LABEL_COLOR)
            .text(format!("{temp}F"), 18, 0, TEMP_COLOR)
            .text(short_condition(condition), 2, 6, CONDITION_COLOR)
            .text("FEELS", 2, 12, FEELS_LABEL_COLOR)
            .text(format!("{feels}F"), 26, 12, FEELS_COLOR)
            .text("HUMIDITY", 2, 18, HUMIDITY_LABEL_COLOR)
            .text(format!("{humidity}%"), 40, 18, HUMIDITY_COLOR);
        layout
    }
}

impl ScreenRenderer for WeatherScreen {
    type Data = WeatherReport;

    fn name(&self) -> &'static str {
        "weather"
    }

    fn layout(&self, snapshot: &Snapshot<WeatherReport>) -> Result<Layout, LayoutError> {
        Ok(match snapshot {
            Snapshot::Loading => Layout::loading(),
            Snapshot::Ready(report) => self.fields(
                &report.temp_f.to_string(),
                &report.condition,
                &report.feels_like_f.to_string(),
                &report.humidity.to_string(),
            ),
            Snapshot::Failed => self.fields("--", "Error", "--", "--"),
        })
    }
}
