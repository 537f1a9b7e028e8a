//! # Matrix Board Core Library
//!
//! This library is the display engine behind a 64x32 RGB LED matrix that cycles
//! through three informational screens: local weather, a baseball division's
//! standings, and upcoming subway departures.
//!
//! ## Design Philosophy
//!
//! ### Frame Consistency
//! - **Double buffering**: every frame is drawn into a back buffer and only becomes
//!   visible through an atomic swap ([`canvas::Canvas::show`])
//! - **Two-phase rendering**: screens first build a [`screens::Layout`], which may
//!   fail; only a complete layout is ever drawn, so a half-drawn frame never reaches
//!   the panel
//!
//! ### Independent Cadences
//! Three activities run on their own timers (see [`controller`]):
//! - **Render** every second, so manual screen changes appear promptly
//! - **Rotate** every 30 seconds while auto-rotate is on
//! - **Refresh** every 60 seconds, bounded by upstream API etiquette
//!
//! ### Data Flow
//! 1. **Refresh**: data sources fetch → snapshot replaced wholesale (or kept stale)
//! 2. **Control**: HTTP/CLI command → [`state::DisplayHandle`] under a mutex
//! 3. **Render**: selected screen → layout → canvas → panel driver
//!
//! ## Core Types
//!
//! The library exports two primary scheduling types:
//! - [`Screen`]: the closed set of selectable full-panel layouts
//! - [`DisplayState`]: selected screen plus the auto-rotate flag

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Module declarations
pub mod canvas;
pub mod config;
pub mod control;
pub mod controller;
pub mod font;
pub mod panel;
pub mod screens;
pub mod server;
pub mod sources;
pub mod state;
pub mod text;

#[cfg(test)]
mod tests;

/// One of the three selectable full-panel layouts.
///
/// The set is closed: external requests naming anything else are rejected
/// without touching the current selection. Names are matched case-sensitively
/// against their lowercase wire form.
///
/// # Example
/// ```
/// use matrix_board_lib::Screen;
///
/// let screen: Screen = "standings".parse().unwrap();
/// assert_eq!(screen.next(), Screen::Transit);
/// assert!("Standings".parse::<Screen>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Weather,
    Standings,
    Transit,
}

/// A screen name outside the closed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown screen '{0}' (expected weather, standings or transit)")]
pub struct UnknownScreen(pub String);

impl Screen {
    /// Every screen, in rotation order.
    pub const ALL: [Screen; 3] = [Screen::Weather, Screen::Standings, Screen::Transit];

    /// Wire name used by the control surface and configuration.
    pub fn name(self) -> &'static str {
        match self {
            Screen::Weather => "weather",
            Screen::Standings => "standings",
            Screen::Transit => "transit",
        }
    }

    /// Next screen in the fixed cycle Weather → Standings → Transit → Weather.
    pub fn next(self) -> Screen {
        match self {
            Screen::Weather => Screen::Standings,
            Screen::Standings => Screen::Transit,
            Screen::Transit => Screen::Weather,
        }
    }
}

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.name() == s)
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheduling state shared between the render loop and the control surface.
///
/// Always read and written as a whole value through
/// [`state::DisplayHandle`], so the render loop never observes a selection
/// mid-update.
///
/// # Example
/// ```
/// use matrix_board_lib::{DisplayState, Screen};
///
/// let state = DisplayState::default();
/// assert_eq!(state.selected, Screen::Weather);
/// assert!(state.auto_rotate);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Screen rendered on the next tick
    pub selected: Screen,
    /// Whether the rotation timer advances the selection
    pub auto_rotate: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        DisplayState {
            selected: Screen::Weather,
            auto_rotate: true,
        }
    }
}
