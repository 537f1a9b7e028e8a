//! # Screen Rendering
//!
//! Each screen turns its latest [`Snapshot`] into a [`Layout`]: a list of
//! positioned, coloured text items. Building the layout is the only step that
//! can fail. Drawing happens afterwards in one pass, so a screen that cannot
//! lay itself out never leaves a half-drawn frame behind; it is replaced by the
//! LOADING layout instead.
//!
//! ## Snapshot Lifecycle
//! - `Loading`: no fetch has succeeded yet
//! - `Ready(data)`: the last good fetch, replaced wholesale on refresh
//! - `Failed`: an explicit error sentinel (only under [`FailurePolicy::ShowError`])

use crate::canvas::{Canvas, Rgb};
use crate::panel::PanelError;
use crate::text::draw_text;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod standings;
pub mod transit;
pub mod weather;

pub use standings::{StandingsScreen, TeamRecord};
pub use transit::{Departure, Departures, TransitScreen, Urgency};
pub use weather::{WeatherReport, WeatherScreen};

/// Latest known data for one screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Snapshot<T> {
    #[default]
    Loading,
    Ready(T),
    Failed,
}

/// What a failed refresh does to the snapshot already on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep showing the last good data; stay on LOADING if there never was any
    KeepStale,
    /// Replace whatever was shown with the screen's error layout
    ShowError,
}

impl<T> Snapshot<T> {
    /// Fold one refresh result into the snapshot.
    pub fn apply<E>(&mut self, result: Result<T, E>, policy: FailurePolicy) {
        match (result, policy) {
            (Ok(data), _) => *self = Snapshot::Ready(data),
            (Err(_), FailurePolicy::ShowError) => *self = Snapshot::Failed,
            (Err(_), FailurePolicy::KeepStale) => {}
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Snapshot::Ready(_))
    }
}

/// A screen could not produce a valid frame from its snapshot.
#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("games back '{value}' for {team} is not a number")]
    GamesBack { team: String, value: String },
}

/// One string placed on the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
}

/// A complete frame description, drawn in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    items: Vec<TextItem>,
}

const LOADING_COLOR: Rgb = Rgb::new(255, 255, 0);

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder shown before a screen has any data, or when its layout fails.
    pub fn loading() -> Self {
        let mut layout = Layout::new();
        layout.text("LOADING", 8, 12, LOADING_COLOR);
        layout
    }

    pub fn text(&mut self, text: impl Into<String>, x: i32, y: i32, color: Rgb) -> &mut Self {
        self.items.push(TextItem {
            text: text.into(),
            x,
            y,
            color,
        });
        self
    }

    pub fn items(&self) -> &[TextItem] {
        &self.items
    }

    /// First item whose text equals `text`.
    pub fn find(&self, text: &str) -> Option<&TextItem> {
        self.items.iter().find(|item| item.text == text)
    }

    /// Draw every item into the canvas back buffer.
    pub fn draw(&self, canvas: &mut Canvas) {
        for item in &self.items {
            draw_text(canvas, &item.text, item.x, item.y, item.color);
        }
    }
}

/// Contract shared by the weather, standings and transit screens.
pub trait ScreenRenderer {
    type Data;

    /// Screen name used in log lines.
    fn name(&self) -> &'static str;

    /// Lay out one frame for `snapshot`.
    fn layout(&self, snapshot: &Snapshot<Self::Data>) -> Result<Layout, LayoutError>;

    /// Render one full frame: `clear(); <draw>; show();`.
    ///
    /// A layout failure is logged and replaced by the LOADING layout.
    fn render(&self, snapshot: &Snapshot<Self::Data>, canvas: &mut Canvas) -> Result<(), PanelError> {
        let layout = self.layout(snapshot).unwrap_or_else(|err| {
            log::warn!("{} layout failed, showing placeholder: {}", self.name(), err);
            Layout::loading()
        });
        canvas.clear();
        layout.draw(canvas);
        canvas.show()
    }
}
