//! Fixed-pitch text drawing on top of the 3x5 font.

use crate::canvas::{Canvas, Rgb};
use crate::font::{glyph, ADVANCE};

/// Draw `text` with its top-left corner at `(x, y)` and return the cursor
/// position after the last character.
///
/// Text is folded to uppercase. Every character advances the cursor by
/// [`ADVANCE`] columns whether or not it has a glyph, so string width is
/// always `4 * chars`. Pixels falling outside the canvas are dropped.
pub fn draw_text(canvas: &mut Canvas, text: &str, x: i32, y: i32, color: Rgb) -> i32 {
    let mut cursor = x;
    for ch in text.chars().map(|c| c.to_ascii_uppercase()) {
        if let Some(cells) = glyph(ch) {
            for (row, bits) in cells.iter().enumerate() {
                for (col, &lit) in bits.iter().enumerate() {
                    if lit {
                        canvas.set_pixel(cursor + col as i32, y + row as i32, color);
                    }
                }
            }
        }
        cursor += ADVANCE;
    }
    cursor
}

/// Width in columns that `text` occupies when drawn.
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * ADVANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::NullPanel;

    const WHITE: Rgb = Rgb::new(255, 255, 255);

    fn canvas() -> Canvas {
        Canvas::new(64, 32, Box::new(NullPanel))
    }

    #[test]
    fn test_cursor_advances_four_columns_per_character() {
        for text in ["", "A", "NYC", "72F", "HUMIDITY", "NO TRAINS", "100%", "-"] {
            let mut canvas = canvas();
            let end = draw_text(&mut canvas, text, 2, 6, WHITE);
            assert_eq!(end - 2, 4 * text.len() as i32, "advance for {text:?}");
            assert_eq!(text_width(text), end - 2);
        }
    }

    #[test]
    fn test_unsupported_characters_still_advance() {
        let mut canvas = canvas();
        let end = draw_text(&mut canvas, "7°F", 0, 0, WHITE);
        assert_eq!(end, 12);
        // Degree sign leaves its cell blank
        for x in 4..8 {
            for y in 0..5 {
                assert_eq!(canvas.back().get(x, y), Some(Rgb::BLACK));
            }
        }
    }

    #[test]
    fn test_lowercase_is_folded() {
        let mut upper = canvas();
        let mut lower = canvas();
        draw_text(&mut upper, "FEELS", 2, 12, WHITE);
        draw_text(&mut lower, "feels", 2, 12, WHITE);
        assert_eq!(upper.back(), lower.back());
        assert!(upper.back().lit_pixels() > 0);
    }

    #[test]
    fn test_pixels_stay_within_bounds() {
        let mut canvas = canvas();
        // "A" straddling the bottom-right corner keeps rows 0-2 of columns 0-1
        draw_text(&mut canvas, "A", 62, 29, WHITE);
        assert_eq!(canvas.back().lit_pixels(), 4);
        assert_eq!(canvas.back().get(63, 29), Some(WHITE));
        assert_eq!(canvas.back().get(62, 29), Some(Rgb::BLACK));

        // and the top-left corner keeps rows 2-4 of columns 1-2
        draw_text(&mut canvas, "A", -1, -2, WHITE);
        assert_eq!(canvas.back().lit_pixels(), 8);
        assert_eq!(canvas.back().get(0, 0), Some(WHITE));
        assert_eq!(canvas.back().get(0, 1), Some(Rgb::BLACK));
        assert_eq!(canvas.back().get(1, 1), Some(WHITE));
    }

    #[test]
    fn test_glyph_is_placed_at_origin() {
        let mut canvas = canvas();
        draw_text(&mut canvas, "-", 10, 20, WHITE);
        assert_eq!(canvas.back().lit_pixels(), 3);
        for x in 10..13 {
            assert_eq!(canvas.back().get(x, 22), Some(WHITE));
        }
    }
}
