//! Mutex-guarded [`DisplayState`] shared by the render loop and the control
//! surface. Every access copies or replaces the whole value under the lock.

use crate::{DisplayState, Screen};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to the shared display state.
#[derive(Clone, Debug, Default)]
pub struct DisplayHandle {
    inner: Arc<Mutex<DisplayState>>,
}

impl DisplayHandle {
    pub fn new(initial: DisplayState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    // A panic while holding the lock cannot leave a half-written Copy value.
    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consistent copy of the current state.
    pub fn snapshot(&self) -> DisplayState {
        *self.lock()
    }

    /// Apply an optional screen change and an optional auto-rotate change
    /// atomically.
    pub fn update(&self, screen: Option<Screen>, auto_rotate: Option<bool>) -> DisplayState {
        let mut state = self.lock();
        if let Some(screen) = screen {
            state.selected = screen;
        }
        if let Some(enabled) = auto_rotate {
            state.auto_rotate = enabled;
        }
        *state
    }

    /// Advance to the next screen if auto-rotate is on.
    ///
    /// Returns the new selection, or `None` when rotation is disabled. The
    /// flag is checked under the same lock as the advance, so a concurrent
    /// "auto_rotate = false" is never overridden.
    pub fn rotate(&self) -> Option<Screen> {
        let mut state = self.lock();
        if !state.auto_rotate {
            return None;
        }
        state.selected = state.selected.next();
        Some(state.selected)
    }
}
