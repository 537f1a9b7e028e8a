//! Upcoming departures for one route and direction at one station.

use super::{Layout, LayoutError, ScreenRenderer, Snapshot};
use crate::canvas::Rgb;

/// At most this many departures are shown.
pub const MAX_DEPARTURES: usize = 4;

const ROWS: [i32; MAX_DEPARTURES] = [6, 12, 18, 24];

const TITLE_COLOR: Rgb = Rgb::new(0, 100, 255);
const STATION_COLOR: Rgb = Rgb::new(200, 200, 220);
const INDEX_COLOR: Rgb = Rgb::new(150, 150, 200);
const DESTINATION_COLOR: Rgb = Rgb::new(180, 180, 200);
const NOTICE_COLOR: Rgb = Rgb::new(200, 200, 200);

/// One upcoming train.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Departure {
    pub minutes: u32,
}

/// Departures inside the look-ahead window, or the "no trains" sentinel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Departures {
    /// Sorted ascending, at most [`MAX_DEPARTURES`] long, never empty
    Upcoming(Vec<Departure>),
    NoTrains,
}

impl Departures {
    /// Keep minutes in `0..window`, sort ascending and take the first four.
    pub fn from_minutes<I>(minutes: I, window: u32) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut upcoming: Vec<Departure> = minutes
            .into_iter()
            .filter(|&m| (0..window as i64).contains(&m))
            .map(|m| Departure { minutes: m as u32 })
            .collect();
        upcoming.sort();
        upcoming.truncate(MAX_DEPARTURES);

        if upcoming.is_empty() {
            Departures::NoTrains
        } else {
            Departures::Upcoming(upcoming)
        }
    }
}

/// Colour tier for a departure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    /// Leaving within a minute
    Imminent,
    /// Two to five minutes out
    Soon,
    Later,
}

impl Urgency {
    pub fn of(minutes: u32) -> Self {
        match minutes {
            0..=1 => Urgency::Imminent,
            2..=5 => Urgency::Soon,
            _ => Urgency::Later,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Urgency::Imminent => Rgb::new(255, 50, 50),
            Urgency::Soon => Rgb::new(255, 200, 0),
            Urgency::Later => Rgb::new(100, 255, 100),
        }
    }
}

/// "NOW" for a train at the platform, otherwise minutes with an "M" suffix.
pub fn time_label(minutes: u32) -> String {
    if minutes == 0 {
        "NOW".to_string()
    } else {
        format!("{minutes}M")
    }
}

pub struct TransitScreen {
    title: String,
    station: String,
    destination: String,
}

impl TransitScreen {
    pub fn new(
        title: impl Into<String>,
        station: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            station: station.into(),
            destination: destination.into(),
        }
    }

    fn header(&self) -> Layout {
        let mut layout = Layout::new();
        layout
            .text(self.title.as_str(), 1, 0, TITLE_COLOR)
            .text(self.station.as_str(), 34, 0, STATION_COLOR);
        layout
    }
}

impl ScreenRenderer for TransitScreen {
    type Data = Departures;

    fn name(&self) -> &'static str {
        "transit"
    }

    fn layout(&self, snapshot: &Snapshot<Departures>) -> Result<Layout, LayoutError> {
        let departures = match snapshot {
            Snapshot::Loading => return Ok(Layout::loading()),
            Snapshot::Failed => {
                let mut layout = self.header();
                layout.text("ERROR", 8, ROWS[0], NOTICE_COLOR);
                return Ok(layout);
            }
            Snapshot::Ready(Departures::Upcoming(list)) if !list.is_empty() => list,
            Snapshot::Ready(_) => {
                let mut layout = self.header();
                layout.text("NO TRAINS", 8, ROWS[0], NOTICE_COLOR);
                return Ok(layout);
            }
        };

        let mut layout = self.header();
        for (idx, (departure, &y)) in departures.iter().zip(ROWS.iter()).enumerate() {
            layout
                .text((idx + 1).to_string(), 1, y, INDEX_COLOR)
                .text(
                    time_label(departure.minutes),
                    8,
                    y,
                    Urgency::of(departure.minutes).color(),
                )
                .text(self.destination.as_str(), 32, y, DESTINATION_COLOR);
        }
        Ok(layout)
    }
}
