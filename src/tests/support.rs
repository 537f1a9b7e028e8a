//! Test doubles shared by the unit and scenario tests: a scripted data source
//! and a panel driver that keeps every presented frame.

use crate::canvas::{Canvas, FrameBuffer};
use crate::panel::{PanelDriver, PanelError};
use crate::sources::{DataSource, FetchError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted answer from a [`FakeSource`].
#[derive(Clone, Debug)]
pub enum Reply<T> {
    Data(T),
    Fail,
    /// Never resolves; only a timeout gets the caller out
    Hang,
    /// Panics inside the refresh task
    Panic,
}

/// Answers fetches from a script, repeating the last reply once exhausted.
pub struct FakeSource<T> {
    name: &'static str,
    replies: Mutex<VecDeque<Reply<T>>>,
    calls: Arc<AtomicUsize>,
}

impl<T: Clone> FakeSource<T> {
    pub fn new(name: &'static str, replies: Vec<Reply<T>>) -> Self {
        Self {
            name,
            replies: Mutex::new(replies.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn always(name: &'static str, reply: Reply<T>) -> Self {
        Self::new(name, vec![reply])
    }

    /// Shared counter of `fetch()` calls, readable after the source is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn next_reply(&self) -> Reply<T> {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap_or(Reply::Fail)
        }
    }
}

impl<T: Clone + Send + Sync + 'static> DataSource for FakeSource<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self) -> Result<T, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next_reply() {
            Reply::Data(data) => Ok(data),
            Reply::Fail => Err(FetchError::Missing("scripted failure")),
            Reply::Hang => std::future::pending().await,
            Reply::Panic => panic!("{} source blew up", self.name),
        }
    }
}

/// Panel driver that records every presented frame.
#[derive(Clone, Default)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<FrameBuffer>>>,
}

impl FrameLog {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(64, 32, Box::new(self.clone()))
    }

    pub fn count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<FrameBuffer> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl PanelDriver for FrameLog {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), PanelError> {
        self.frames.lock().unwrap().push(frame.clone());
        Ok(())
    }
}

/// Panel whose sink has gone away.
pub struct BrokenPanel;

impl PanelDriver for BrokenPanel {
    fn present(&mut self, _frame: &FrameBuffer) -> Result<(), PanelError> {
        Err(PanelError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "panel unplugged",
        )))
    }
}
