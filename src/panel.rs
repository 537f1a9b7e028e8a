//! # Panel Drivers
//!
//! The physical matrix driver lives outside this crate. Everything the engine
//! needs from it is one operation: present a finished frame. Three drivers
//! ship with the binary:
//!
//! - [`TerminalPanel`]: 24-bit colour preview in a terminal (development mode)
//! - [`FrameSinkPanel`]: raw RGB frames written to a file or FIFO, read by an
//!   external hardware bridge
//! - [`NullPanel`]: discards frames (headless runs)

use crate::canvas::{FrameBuffer, Rgb};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Failures talking to the panel. Fatal for the render loop: there is no
/// software fallback for a missing display.
#[derive(Error, Debug)]
pub enum PanelError {
    /// Writing the frame failed (closed pipe, unplugged device, full disk)
    #[error("panel I/O: {0}")]
    Io(#[from] io::Error),

    /// The frame does not match the geometry the driver was opened with
    #[error("frame is {got_width}x{got_height}, panel expects {width}x{height}")]
    FrameSize {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
}

/// Sink for finished frames.
pub trait PanelDriver: Send {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), PanelError>;
}

/// Order in which the hardware expects the three colour channels.
///
/// Some panels are wired with green and blue swapped; this is a property of
/// the deployed panel and is set in `[panel] channel_order`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Rbg,
}

impl ChannelOrder {
    /// Bytes for one pixel in wire order.
    pub fn arrange(self, color: Rgb) -> [u8; 3] {
        match self {
            ChannelOrder::Rgb => [color.r, color.g, color.b],
            ChannelOrder::Rbg => [color.r, color.b, color.g],
        }
    }
}

/// Driver that drops every frame.
pub struct NullPanel;

impl PanelDriver for NullPanel {
    fn present(&mut self, _frame: &FrameBuffer) -> Result<(), PanelError> {
        Ok(())
    }
}

/// Terminal preview using upper-half-block characters, two pixel rows per line.
pub struct TerminalPanel<W> {
    out: W,
}

impl TerminalPanel<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> TerminalPanel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> PanelDriver for TerminalPanel<W> {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), PanelError> {
        let mut screen = String::with_capacity(frame.pixels().len() * 24);
        // Cursor home so each frame redraws in place
        screen.push_str("\x1b[H");

        for y in (0..frame.height() as i32).step_by(2) {
            for x in 0..frame.width() as i32 {
                let top = frame.get(x, y).unwrap_or_default();
                let bottom = frame.get(x, y + 1).unwrap_or_default();
                screen.push_str(&format!(
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m▀",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                ));
            }
            screen.push_str("\x1b[0m\n");
        }

        self.out.write_all(screen.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Raw frame stream: `width * height * 3` bytes per frame, row-major, in
/// the configured channel order, scaled by brightness.
pub struct FrameSinkPanel<W> {
    out: W,
    width: u32,
    height: u32,
    brightness: u8,
    order: ChannelOrder,
}

impl FrameSinkPanel<File> {
    /// Open (or create) the sink at `path`. FIFOs block here until a reader attaches.
    pub fn open<P: AsRef<Path>>(
        path: P,
        width: u32,
        height: u32,
        brightness: u8,
        order: ChannelOrder,
    ) -> Result<Self, PanelError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file, width, height, brightness, order))
    }
}

impl<W: Write + Send> FrameSinkPanel<W> {
    pub fn new(out: W, width: u32, height: u32, brightness: u8, order: ChannelOrder) -> Self {
        Self {
            out,
            width,
            height,
            brightness: brightness.min(100),
            order,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn scale(&self, channel: u8) -> u8 {
        (channel as u16 * self.brightness as u16 / 100) as u8
    }
}

impl<W: Write + Send> PanelDriver for FrameSinkPanel<W> {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), PanelError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(PanelError::FrameSize {
                width: self.width,
                height: self.height,
                got_width: frame.width(),
                got_height: frame.height(),
            });
        }

        let mut bytes = Vec::with_capacity(frame.pixels().len() * 3);
        for &pixel in frame.pixels() {
            bytes.extend(self.order.arrange(pixel).map(|c| self.scale(c)));
        }

        self.out.write_all(&bytes)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use tempfile::NamedTempFile;

    #[test]
    fn test_channel_order() {
        let color = Rgb::new(1, 2, 3);
        assert_eq!(ChannelOrder::Rgb.arrange(color), [1, 2, 3]);
        assert_eq!(ChannelOrder::Rbg.arrange(color), [1, 3, 2]);
    }

    #[test]
    fn test_frame_sink_writes_scaled_reordered_bytes() {
        let mut sink = FrameSinkPanel::new(Vec::new(), 2, 1, 50, ChannelOrder::Rbg);
        let mut canvas = Canvas::new(2, 1, Box::new(NullPanel));
        canvas.set_pixel(0, 0, Rgb::new(200, 100, 40));
        canvas.show().unwrap();

        sink.present(canvas.front()).unwrap();

        assert_eq!(sink.into_inner(), vec![100, 20, 50, 0, 0, 0]);
    }

    #[test]
    fn test_frame_sink_rejects_wrong_geometry() {
        let mut sink = FrameSinkPanel::new(Vec::new(), 64, 32, 100, ChannelOrder::Rgb);
        let frame = FrameBuffer::new(32, 16);
        let err = sink.present(&frame).unwrap_err();
        assert!(matches!(err, PanelError::FrameSize { got_width: 32, .. }));
    }

    #[test]
    fn test_frame_sink_file_appends_frames() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut sink =
            FrameSinkPanel::open(temp_file.path(), 64, 32, 100, ChannelOrder::Rgb).unwrap();
        let frame = FrameBuffer::new(64, 32);

        sink.present(&frame).unwrap();
        sink.present(&frame).unwrap();

        let written = std::fs::read(temp_file.path()).unwrap();
        assert_eq!(written.len(), 2 * 64 * 32 * 3);
    }

    #[test]
    fn test_terminal_preview_emits_one_line_per_two_rows() {
        let mut panel = TerminalPanel::new(Vec::new());
        panel.present(&FrameBuffer::new(64, 32)).unwrap();
        let text = String::from_utf8(panel.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 16);
        assert_eq!(text.matches('▀').count(), 64 * 16);
    }
}
