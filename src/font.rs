//! # 3x5 Bitmap Font
//!
//! Fixed-width glyphs for the 64x32 matrix. Each glyph is 5 rows by 3 columns;
//! text is laid out on a 4-column pitch (glyph plus one blank column), which
//! fits 16 characters across the panel and 5 text rows down it.
//!
//! Only the characters the screens emit are present: digits, `A`-`Z`, space,
//! `-`, `%` and `.`. Lookups are case-sensitive; callers fold to uppercase first
//! (see [`crate::text::draw_text`]).

/// A 5-row by 3-column glyph; `true` cells are lit.
pub type Glyph = [[bool; 3]; 5];

/// Glyph width in columns.
pub const GLYPH_WIDTH: i32 = 3;

/// Glyph height in rows.
pub const GLYPH_HEIGHT: i32 = 5;

/// Horizontal distance between consecutive glyph origins.
pub const ADVANCE: i32 = GLYPH_WIDTH + 1;

const fn bits(rows: [[u8; 3]; 5]) -> Glyph {
    let mut out = [[false; 3]; 5];
    let mut r = 0;
    while r < 5 {
        let mut c = 0;
        while c < 3 {
            out[r][c] = rows[r][c] == 1;
            c += 1;
        }
        r += 1;
    }
    out
}

static GLYPHS: [(char, Glyph); 40] = [
    ('0', bits([[1, 1, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 1, 1]])),
    ('1', bits([[0, 1, 0], [1, 1, 0], [0, 1, 0], [0, 1, 0], [1, 1, 1]])),
    ('2', bits([[1, 1, 1], [0, 0, 1], [1, 1, 1], [1, 0, 0], [1, 1, 1]])),
    ('3', bits([[1, 1, 1], [0, 0, 1], [1, 1, 1], [0, 0, 1], [1, 1, 1]])),
    ('4', bits([[1, 0, 1], [1, 0, 1], [1, 1, 1], [0, 0, 1], [0, 0, 1]])),
    ('5', bits([[1, 1, 1], [1, 0, 0], [1, 1, 1], [0, 0, 1], [1, 1, 1]])),
    ('6', bits([[1, 1, 1], [1, 0, 0], [1, 1, 1], [1, 0, 1], [1, 1, 1]])),
    ('7', bits([[1, 1, 1], [0, 0, 1], [0, 0, 1], [0, 0, 1], [0, 0, 1]])),
    ('8', bits([[1, 1, 1], [1, 0, 1], [1, 1, 1], [1, 0, 1], [1, 1, 1]])),
    ('9', bits([[1, 1, 1], [1, 0, 1], [1, 1, 1], [0, 0, 1], [1, 1, 1]])),
    ('A', bits([[0, 1, 0], [1, 0, 1], [1, 1, 1], [1, 0, 1], [1, 0, 1]])),
    ('B', bits([[1, 1, 0], [1, 0, 1], [1, 1, 0], [1, 0, 1], [1, 1, 0]])),
    ('C', bits([[1, 1, 1], [1, 0, 0], [1, 0, 0], [1, 0, 0], [1, 1, 1]])),
    ('D', bits([[1, 1, 0], [1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 1, 0]])),
    ('E', bits([[1, 1, 1], [1, 0, 0], [1, 1, 0], [1, 0, 0], [1, 1, 1]])),
    ('F', bits([[1, 1, 1], [1, 0, 0], [1, 1, 0], [1, 0, 0], [1, 0, 0]])),
    ('G', bits([[1, 1, 1], [1, 0, 0], [1, 0, 1], [1, 0, 1], [1, 1, 1]])),
    ('H', bits([[1, 0, 1], [1, 0, 1], [1, 1, 1], [1, 0, 1], [1, 0, 1]])),
    ('I', bits([[1, 1, 1], [0, 1, 0], [0, 1, 0], [0, 1, 0], [1, 1, 1]])),
    ('J', bits([[0, 0, 1], [0, 0, 1], [0, 0, 1], [1, 0, 1], [1, 1, 1]])),
    ('K', bits([[1, 0, 1], [1, 0, 1], [1, 1, 0], [1, 0, 1], [1, 0, 1]])),
    ('L', bits([[1, 0, 0], [1, 0, 0], [1, 0, 0], [1, 0, 0], [1, 1, 1]])),
    ('M', bits([[1, 0, 1], [1, 1, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1]])),
    ('N', bits([[1, 0, 1], [1, 1, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1]])),
    ('O', bits([[1, 1, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 1, 1]])),
    ('P', bits([[1, 1, 1], [1, 0, 1], [1, 1, 1], [1, 0, 0], [1, 0, 0]])),
    ('Q', bits([[1, 1, 1], [1, 0, 1], [1, 0, 1], [1, 1, 1], [0, 0, 1]])),
    ('R', bits([[1, 1, 0], [1, 0, 1], [1, 1, 0], [1, 0, 1], [1, 0, 1]])),
    ('S', bits([[1, 1, 1], [1, 0, 0], [1, 1, 1], [0, 0, 1], [1, 1, 1]])),
    ('T', bits([[1, 1, 1], [0, 1, 0], [0, 1, 0], [0, 1, 0], [0, 1, 0]])),
    ('U', bits([[1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 1, 1]])),
    ('V', bits([[1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1], [0, 1, 0]])),
    ('W', bits([[1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 1, 1], [1, 0, 1]])),
    ('X', bits([[1, 0, 1], [1, 0, 1], [0, 1, 0], [1, 0, 1], [1, 0, 1]])),
    ('Y', bits([[1, 0, 1], [1, 0, 1], [0, 1, 0], [0, 1, 0], [0, 1, 0]])),
    ('Z', bits([[1, 1, 1], [0, 0, 1], [0, 1, 0], [1, 0, 0], [1, 1, 1]])),
    (' ', bits([[0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0]])),
    ('-', bits([[0, 0, 0], [0, 0, 0], [1, 1, 1], [0, 0, 0], [0, 0, 0]])),
    ('%', bits([[1, 0, 1], [0, 0, 1], [0, 1, 0], [1, 0, 0], [1, 0, 1]])),
    // Games-back figures such as "2.5"
    ('.', bits([[0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 1, 0]])),
];

/// Look up the glyph for an uppercase character.
///
/// Returns `None` for characters outside the table; the text renderer skips
/// those but still advances its cursor.
pub fn glyph(ch: char) -> Option<&'static Glyph> {
    GLYPHS
        .iter()
        .find(|(key, _)| *key == ch)
        .map(|(_, glyph)| glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_emitted_character_has_a_glyph() {
        let required = ('0'..='9').chain('A'..='Z').chain([' ', '-', '%', '.']);
        for ch in required {
            assert!(glyph(ch).is_some(), "missing glyph for {ch:?}");
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(glyph('a').is_none());
        assert!(glyph('?').is_none());
        assert!(glyph('°').is_none());
    }

    #[test]
    fn test_glyph_shapes() {
        let dash = glyph('-').unwrap();
        let lit: Vec<(usize, usize)> = (0..5)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .filter(|&(r, c)| dash[r][c])
            .collect();
        assert_eq!(lit, vec![(2, 0), (2, 1), (2, 2)]);

        let space = glyph(' ').unwrap();
        assert!(space.iter().flatten().all(|&cell| !cell));

        let one = glyph('1').unwrap();
        assert_eq!(one[4], [true, true, true]);
        assert_eq!(one[0], [false, true, false]);
    }
}
