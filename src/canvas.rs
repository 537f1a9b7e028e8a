//! # Double-Buffered Pixel Canvas
//!
//! The canvas owns two RGB frame buffers of identical size. All drawing lands
//! in the back buffer; [`Canvas::show`] swaps the two and hands the new front
//! buffer to the panel driver. The old front buffer becomes the next draw
//! target, so no frame is ever reallocated after start-up.
//!
//! A complete frame is always `clear(); <draw calls>; show();`. The front
//! buffer is only reachable through a shared reference, so the frame the
//! panel is showing cannot be touched by a renderer.

use crate::panel::{PanelDriver, PanelError};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// An explicit red/green/blue triple.
///
/// Colors are always passed as one value rather than three positional bytes,
/// so channel order only matters at the panel boundary
/// (see [`crate::panel::ChannelOrder`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn is_black(self) -> bool {
        self == Rgb::BLACK
    }
}

impl From<Rgb888> for Rgb {
    fn from(color: Rgb888) -> Self {
        Rgb::new(color.r(), color.g(), color.b())
    }
}

impl From<Rgb> for Rgb888 {
    fn from(color: Rgb) -> Self {
        Rgb888::new(color.r, color.g, color.b)
    }
}

/// One full frame of pixels, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    /// Create an all-black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel slice, `width * height` long.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Number of pixels that are not black.
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_black()).count()
    }

    pub fn is_blank(&self) -> bool {
        self.lit_pixels() == 0
    }

    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

/// Double-buffered drawing surface bound to one panel driver.
pub struct Canvas {
    front: FrameBuffer,
    back: FrameBuffer,
    driver: Box<dyn PanelDriver>,
}

impl Canvas {
    /// Create a `width` x `height` canvas presenting frames through `driver`.
    pub fn new(width: u32, height: u32, driver: Box<dyn PanelDriver>) -> Self {
        Self {
            front: FrameBuffer::new(width, height),
            back: FrameBuffer::new(width, height),
            driver,
        }
    }

    pub fn width(&self) -> u32 {
        self.back.width
    }

    pub fn height(&self) -> u32 {
        self.back.height
    }

    /// Reset the back buffer to black.
    pub fn clear(&mut self) {
        self.back.fill(Rgb::BLACK);
    }

    /// Write one pixel into the back buffer; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.back.set(x, y, color);
    }

    /// Swap buffers and present the new front buffer to the panel.
    ///
    /// After this call the back buffer holds the previously displayed frame;
    /// callers are expected to `clear()` before drawing the next one.
    pub fn show(&mut self) -> Result<(), PanelError> {
        std::mem::swap(&mut self.front, &mut self.back);
        self.driver.present(&self.front)
    }

    /// The frame currently on the panel.
    pub fn front(&self) -> &FrameBuffer {
        &self.front
    }

    /// The frame being drawn.
    pub fn back(&self) -> &FrameBuffer {
        &self.back
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::NullPanel;
    use embedded_graphics::prelude::{Point, Primitive};
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_graphics::Drawable;
    use std::sync::{Arc, Mutex};

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn canvas() -> Canvas {
        Canvas::new(64, 32, Box::new(NullPanel))
    }

    /// Records every frame handed to the panel
    struct Recorder(Arc<Mutex<Vec<FrameBuffer>>>);

    impl PanelDriver for Recorder {
        fn present(&mut self, frame: &FrameBuffer) -> Result<(), PanelError> {
            self.0.lock().unwrap().push(frame.clone());
            Ok(())
        }
    }

    #[test]
    fn test_out_of_bounds_set_pixel_is_noop() {
        let mut canvas = canvas();
        canvas.set_pixel(3, 3, RED);
        let before = canvas.back().clone();

        for (x, y) in [(-1, 0), (0, -1), (64, 0), (0, 32), (64, 32), (-5, 40), (i32::MAX, 1)] {
            canvas.set_pixel(x, y, RED);
        }

        assert_eq!(canvas.back(), &before);
        assert_eq!(canvas.back().lit_pixels(), 1);
    }

    #[test]
    fn test_corner_pixels_are_addressable() {
        let mut canvas = canvas();
        canvas.set_pixel(0, 0, RED);
        canvas.set_pixel(63, 31, RED);
        assert_eq!(canvas.back().get(0, 0), Some(RED));
        assert_eq!(canvas.back().get(63, 31), Some(RED));
        assert_eq!(canvas.back().get(64, 31), None);
    }

    #[test]
    fn test_clear_then_show_displays_black_frame() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let mut canvas = Canvas::new(64, 32, Box::new(Recorder(frames.clone())));

        canvas.set_pixel(10, 10, RED);
        canvas.show().unwrap();
        canvas.set_pixel(20, 20, RED);
        canvas.clear();
        canvas.show().unwrap();

        assert!(canvas.front().is_blank());
        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].get(10, 10), Some(RED));
        assert!(frames[1].is_blank());
    }

    #[test]
    fn test_drawing_never_touches_front_buffer() {
        let mut canvas = canvas();
        canvas.set_pixel(1, 1, RED);
        canvas.show().unwrap();
        let shown = canvas.front().clone();

        canvas.clear();
        canvas.set_pixel(5, 5, Rgb::new(0, 255, 0));

        assert_eq!(canvas.front(), &shown);
        assert_eq!(canvas.front().get(5, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn test_show_reuses_previous_front_as_back() {
        let mut canvas = canvas();
        canvas.set_pixel(7, 7, RED);
        canvas.show().unwrap();
        canvas.show().unwrap();
        // Second swap brings the first frame back as the draw target
        assert_eq!(canvas.back().get(7, 7), Some(RED));
        assert_eq!(canvas.front().get(7, 7), Some(Rgb::BLACK));
    }

    #[test]
    fn test_embedded_graphics_primitives_are_clipped() {
        let mut canvas = canvas();
        Rectangle::new(Point::new(60, 30), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::new(0, 0, 255)))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(canvas.back().lit_pixels(), 4 * 2);
        assert_eq!(canvas.back().get(63, 31), Some(Rgb::new(0, 0, 255)));
    }
}
