//! # Configuration Management
//!
//! Loads `matrix-board.toml`. Every section and field is optional; anything
//! missing takes the default for the reference deployment (a 64x32 panel in
//! lower Manhattan showing NYC weather, the NL East and the uptown A train).
//!
//! A missing or unreadable file is not an error: the board starts with the
//! defaults and says so in the log.

use crate::controller::{Policies, Schedule, Screens};
use crate::panel::ChannelOrder;
use crate::screens::{FailurePolicy, StandingsScreen, TransitScreen, WeatherScreen};
use crate::sources::transit::DepartureFilter;
use crate::{DisplayState, Screen};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default location of the configuration file.
pub const DEFAULT_PATH: &str = "matrix-board.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from matrix-board.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub panel: PanelConfig,
    pub schedule: ScheduleConfig,
    pub server: ServerConfig,
    pub weather: WeatherConfig,
    pub standings: StandingsConfig,
    pub transit: TransitConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelConfig {
    pub width: u32,
    pub height: u32,
    /// Percent, applied by the raw frame sink
    pub brightness: u8,
    /// Byte order the hardware bridge expects
    pub channel_order: ChannelOrder,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub render_interval_secs: u64,
    pub rotate_interval_secs: u64,
    pub refresh_interval_secs: u64,
    pub fetch_timeout_secs: u64,
    pub initial_screen: Screen,
    pub auto_rotate: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,
    pub bind: String,
    pub max_body_bytes: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Anything wttr.in accepts (ZIP code, city, airport)
    pub location: String,
    /// Short label in the top-left corner
    pub label: String,
    pub on_error: FailurePolicy,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StandingsConfig {
    pub league_id: u32,
    pub division_id: u32,
    /// Defaults to the current calendar year
    pub season: Option<i32>,
    pub title: String,
    pub on_error: FailurePolicy,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransitConfig {
    pub system: String,
    pub stop_id: String,
    pub route: String,
    pub headsign_contains: String,
    pub title: String,
    pub station_label: String,
    pub destination_label: String,
    /// Exclusive upper bound in minutes
    pub window_minutes: u32,
    /// Fetch through the allorigins.win wrapper
    pub use_proxy: bool,
    pub on_error: FailurePolicy,
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            width: 64,
            height: 32,
            brightness: 60,
            channel_order: ChannelOrder::Rgb,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            render_interval_secs: 1,
            rotate_interval_secs: 30,
            refresh_interval_secs: 60,
            fetch_timeout_secs: 10,
            initial_screen: Screen::Weather,
            auto_rotate: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            enabled: true,
            bind: "0.0.0.0:5000".to_string(),
            max_body_bytes: 4096,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            location: "10038".to_string(),
            label: "NYC".to_string(),
            on_error: FailurePolicy::KeepStale,
        }
    }
}

impl Default for StandingsConfig {
    fn default() -> Self {
        StandingsConfig {
            league_id: 104, // National League
            division_id: 204, // NL East
            season: None,
            title: "NL EAST".to_string(),
            on_error: FailurePolicy::KeepStale,
        }
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        TransitConfig {
            system: "us-ny-subway".to_string(),
            stop_id: "A38".to_string(), // Fulton St
            route: "A".to_string(),
            headsign_contains: "Uptown".to_string(),
            title: "A TRAIN".to_string(),
            station_label: "FULTON".to_string(),
            destination_label: "UPTOWN".to_string(),
            window_minutes: 30,
            use_proxy: false,
            on_error: FailurePolicy::ShowError,
        }
    }
}

impl Config {
    /// Load configuration from matrix-board.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file {}: {}", path.display(), e);
                    log::warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file at {}, using default configuration", path.display());
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty TOML.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Controller timers. Zero periods are raised to one second.
    pub fn schedule(&self) -> Schedule {
        let secs = |value: u64| Duration::from_secs(value.max(1));
        Schedule {
            render: secs(self.schedule.render_interval_secs),
            rotate: secs(self.schedule.rotate_interval_secs),
            refresh: secs(self.schedule.refresh_interval_secs),
            fetch_timeout: secs(self.schedule.fetch_timeout_secs),
        }
    }

    pub fn policies(&self) -> Policies {
        Policies {
            weather: self.weather.on_error,
            standings: self.standings.on_error,
            transit: self.transit.on_error,
        }
    }

    pub fn initial_state(&self) -> DisplayState {
        DisplayState {
            selected: self.schedule.initial_screen,
            auto_rotate: self.schedule.auto_rotate,
        }
    }

    pub fn screens(&self) -> Screens {
        Screens {
            weather: WeatherScreen::new(self.weather.label.as_str()),
            standings: StandingsScreen::new(self.standings.title.as_str()),
            transit: TransitScreen::new(
                self.transit.title.as_str(),
                self.transit.station_label.as_str(),
                self.transit.destination_label.as_str(),
            ),
        }
    }

    pub fn departure_filter(&self) -> DepartureFilter {
        DepartureFilter {
            route: self.transit.route.clone(),
            headsign_contains: self.transit.headsign_contains.clone(),
            window_minutes: self.transit.window_minutes,
        }
    }
}

impl StandingsConfig {
    pub fn season(&self) -> i32 {
        self.season.unwrap_or_else(|| chrono::Local::now().year())
    }
}
