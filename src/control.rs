//! # Control Surface
//!
//! Transport-agnostic request/response contract for changing what the panel
//! shows. The HTTP server ([`crate::server`]) and the command line both go
//! through [`ControlSurface`].
//!
//! Invalid input never fails a request: an unknown screen name or a
//! wrongly-typed field is logged and ignored while the remaining fields still
//! apply. Commands overwrite state immediately; rapid sequences are
//! last-write-wins.

use crate::state::DisplayHandle;
use crate::{DisplayState, Screen};
use serde::Serialize;
use serde_json::Value;

/// Response to `GET screen-status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScreenStatus {
    pub current_screen: Screen,
    pub auto_rotate: bool,
}

impl From<DisplayState> for ScreenStatus {
    fn from(state: DisplayState) -> Self {
        ScreenStatus {
            current_screen: state.selected,
            auto_rotate: state.auto_rotate,
        }
    }
}

/// Response to `SET screen-selection`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SelectionResponse {
    /// False only when the command body itself could not be read
    pub success: bool,
    #[serde(flatten)]
    pub status: ScreenStatus,
}

/// Response to `GET capabilities`, together with the current status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    #[serde(flatten)]
    pub status: ScreenStatus,
    pub available_screens: Vec<&'static str>,
}

/// A screen-selection request with both fields optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScreenCommand {
    pub screen: Option<String>,
    pub auto_rotate: Option<bool>,
}

impl ScreenCommand {
    /// Read a command from a JSON object body.
    ///
    /// Fields of the wrong type are dropped individually; only a body that
    /// is not a JSON object is an error.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Map<String, Value> = serde_json::from_slice(body)?;
        let mut command = ScreenCommand::default();

        match value.get("screen") {
            Some(Value::String(name)) => command.screen = Some(name.clone()),
            Some(other) => log::warn!("ignoring non-string screen field: {other}"),
            None => {}
        }
        match value.get("auto_rotate") {
            Some(Value::Bool(enabled)) => command.auto_rotate = Some(*enabled),
            Some(other) => log::warn!("ignoring non-boolean auto_rotate field: {other}"),
            None => {}
        }

        Ok(command)
    }
}

/// Entry point for external screen-selection commands.
#[derive(Clone, Debug)]
pub struct ControlSurface {
    handle: DisplayHandle,
}

impl ControlSurface {
    pub fn new(handle: DisplayHandle) -> Self {
        Self { handle }
    }

    pub fn screen_status(&self) -> ScreenStatus {
        self.handle.snapshot().into()
    }

    /// Apply every recognised field of `command` and report the result.
    pub fn set_screen_selection(&self, command: &ScreenCommand) -> SelectionResponse {
        let screen = command
            .screen
            .as_deref()
            .and_then(|name| match name.parse::<Screen>() {
                Ok(screen) => Some(screen),
                Err(err) => {
                    log::warn!("ignoring screen selection: {err}");
                    None
                }
            });

        let before = self.handle.snapshot();
        let after = self.handle.update(screen, command.auto_rotate);

        if screen.is_some() {
            log::info!("Screen changed to: {}", after.selected);
        }
        if after.auto_rotate != before.auto_rotate {
            log::info!("Auto-rotate: {}", after.auto_rotate);
        }

        SelectionResponse {
            success: true,
            status: after.into(),
        }
    }

    /// Answer to a command that could not be read at all: state untouched.
    pub fn reject(&self) -> SelectionResponse {
        SelectionResponse {
            success: false,
            status: self.screen_status(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            status: self.screen_status(),
            available_screens: Screen::ALL.iter().map(|screen| screen.name()).collect(),
        }
    }
}
