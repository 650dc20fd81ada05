use image::{Pixel, Rgba, RgbaImage};
use tracing::debug;

/// Each glyph is 5 pixels wide and 7 tall.
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// Every glyph pixel is drawn as a `FIXED_SCALE` x `FIXED_SCALE` block.
pub const FIXED_SCALE: u32 = 2;

// Each row is 5 bits, leftmost pixel in bit 4.
#[rustfmt::skip]
const GLYPHS: &[(char, [u8; 7])] = &[
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    (':', [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000]),
    ('/', [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    (' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
];

/// Lowercase letters share the uppercase shapes.
fn glyph_rows(ch: char) -> Option<[u8; 7]> {
    let ch = ch.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(glyph, _)| *glyph == ch)
        .map(|(_, rows)| *rows)
}

/// Fixed-size font used when no scalable font can be found.
///
/// It knows digits, ASCII letters, space and a little punctuation; anything
/// else advances the pen without drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self { scale: FIXED_SCALE }
    }
}

impl BitmapFont {
    /// Horizontal distance between the starts of consecutive glyphs.
    fn advance(&self) -> u32 {
        (GLYPH_WIDTH + 1) * self.scale
    }

    pub fn text_size(&self, text: &str) -> (u32, u32) {
        let count = text.chars().count() as u32;
        if count == 0 {
            return (0, 0);
        }
        // No trailing gap after the last glyph.
        let width = count * self.advance() - self.scale;
        (width, GLYPH_HEIGHT * self.scale)
    }

    pub fn draw(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        let mut pen_x = x;
        for ch in text.chars() {
            match glyph_rows(ch) {
                Some(rows) => self.draw_glyph(canvas, color, pen_x, y, &rows),
                None => debug!("No bitmap glyph for {:?}, leaving a gap", ch),
            }
            pen_x += self.advance() as i32;
        }
    }

    fn draw_glyph(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, rows: &[u8; 7]) {
        let (w, h) = canvas.dimensions();
        let scale = self.scale as i32;
        for (row_idx, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                    continue;
                }
                let px = x + col as i32 * scale;
                let py = y + row_idx as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let sx = px + dx;
                        let sy = py + dy;
                        if sx >= 0 && sy >= 0 && (sx as u32) < w && (sy as u32) < h {
                            canvas.get_pixel_mut(sx as u32, sy as u32).blend(&color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_text_size_is_fixed() {
        let font = BitmapFont::default();
        // 10 glyphs * 12px advance - 2px trailing gap, 7 rows * 2px
        assert_eq!(font.text_size("2023-07-04"), (118, 14));
        assert_eq!(font.text_size(""), (0, 0));
        assert_eq!(font.text_size("1"), (10, 14));
    }

    #[test]
    fn test_draw_marks_pixels_inside_text_box() {
        let font = BitmapFont::default();
        let mut canvas = RgbaImage::from_pixel(40, 20, Rgba([0, 0, 0, 255]));
        font.draw(&mut canvas, WHITE, 2, 3, "1");

        let lit: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == WHITE)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());
        let (w, h) = font.text_size("1");
        for (x, y) in lit {
            assert!((2..2 + w).contains(&x), "x={x}");
            assert!((3..3 + h).contains(&y), "y={y}");
        }
    }

    #[test]
    fn test_draw_clips_at_canvas_edges() {
        let font = BitmapFont::default();
        let mut canvas = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        font.draw(&mut canvas, WHITE, -5, -5, "2023-07-04");
        font.draw(&mut canvas, WHITE, 6, 6, "88");
    }

    #[test]
    fn test_unknown_glyph_advances_without_ink() {
        let font = BitmapFont::default();
        let mut canvas = RgbaImage::from_pixel(30, 20, Rgba([0, 0, 0, 255]));
        font.draw(&mut canvas, WHITE, 0, 0, "é#");
        assert!(canvas.pixels().all(|p| *p != WHITE));
        assert_eq!(font.text_size("é"), font.text_size("0"));
    }

    #[test]
    fn test_letters_are_drawn() {
        let font = BitmapFont::default();
        let mut canvas = RgbaImage::from_pixel(100, 20, Rgba([0, 0, 0, 255]));
        font.draw(&mut canvas, WHITE, 0, 0, "garbage");
        let lit = canvas.pixels().filter(|p| **p == WHITE).count();
        assert!(lit > 0);

        for ch in ('A'..='Z').chain('a'..='z') {
            assert!(glyph_rows(ch).is_some(), "{ch}");
        }
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        let font = BitmapFont::default();
        let mut lower = RgbaImage::from_pixel(100, 20, Rgba([0, 0, 0, 255]));
        let mut upper = lower.clone();
        font.draw(&mut lower, WHITE, 0, 0, "Jul");
        font.draw(&mut upper, WHITE, 0, 0, "JUL");
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_space_is_blank() {
        let font = BitmapFont::default();
        let mut canvas = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        font.draw(&mut canvas, WHITE, 0, 0, " ");
        assert!(canvas.pixels().all(|p| *p != WHITE));
        assert!(glyph_rows(' ').is_some());
    }
}
