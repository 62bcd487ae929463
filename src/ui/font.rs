/// Glyph height and width in font pixels.
pub const GLYPH_SIZE: u32 = 8;

/// Monospace 8x8 bitmap font. Each glyph is a `u64`, one byte per row, top
/// row in the most significant byte and the leftmost pixel in bit 7.
pub struct BitmapFont;

impl BitmapFont {
    /// Bitmap for `ch`, or `None` when the font has no glyph for it.
    /// Lower-case letters share the upper-case glyphs.
    #[must_use]
    pub fn glyph(ch: char) -> Option<u64> {
        let bitmap = match ch.to_ascii_uppercase() {
            ' ' => 0x0000_0000_0000_0000,
            '0' => 0x3C66_666E_7666_3C00,
            '1' => 0x1818_3818_1818_7E00,
            '2' => 0x3C66_060C_3060_7E00,
            '3' => 0x3C66_061C_0666_3C00,
            '4' => 0x060E_1E66_7F06_0600,
            '5' => 0x7E60_7C06_0666_3C00,
            '6' => 0x3C66_607C_6666_3C00,
            '7' => 0x7E66_0C18_1818_1800,
            '8' => 0x3C66_663C_6666_3C00,
            '9' => 0x3C66_663E_0666_3C00,
            'A' => 0x183C_6666_7E66_6600,
            'B' => 0x7C66_667C_6666_7C00,
            'C' => 0x3C66_6060_6066_3C00,
            'D' => 0x786C_6666_666C_7800,
            'E' => 0x7E60_607C_6060_7E00,
            'F' => 0x7E60_607C_6060_6000,
            'G' => 0x3C66_606E_6666_3C00,
            'H' => 0x6666_667E_6666_6600,
            'I' => 0x3C18_1818_1818_3C00,
            'J' => 0x1E0C_0C0C_0C6C_3800,
            'K' => 0x666C_7870_786C_6600,
            'L' => 0x6060_6060_6060_7E00,
            'M' => 0x6377_7F6B_6363_6300,
            'N' => 0x6676_7E7E_6E66_6600,
            'O' => 0x3C66_6666_6666_3C00,
            'P' => 0x7C66_667C_6060_6000,
            'Q' => 0x3C66_6666_663C_0E00,
            'R' => 0x7C66_667C_786C_6600,
            'S' => 0x3C66_603C_0666_3C00,
            'T' => 0x7E18_1818_1818_1800,
            'U' => 0x6666_6666_6666_3C00,
            'V' => 0x6666_6666_663C_1800,
            'W' => 0x6363_636B_7F77_6300,
            'X' => 0x6666_3C18_3C66_6600,
            'Y' => 0x6666_663C_1818_1800,
            'Z' => 0x7E06_0C18_3060_7E00,
            ':' => 0x0018_1800_1818_0000,
            '.' => 0x0000_0000_0018_1800,
            ',' => 0x0000_0000_0018_1830,
            '-' => 0x0000_007E_0000_0000,
            '!' => 0x1818_1818_0000_1800,
            '?' => 0x3C66_060C_1800_1800,
            '/' => 0x0206_0C18_3060_4000,
            _ => return None,
        };
        Some(bitmap)
    }

    /// Whether the pixel at column `x`, row `y` of `bitmap` is set.
    #[must_use]
    pub fn is_set(bitmap: u64, x: u32, y: u32) -> bool {
        (bitmap >> (63 - (y * GLYPH_SIZE + x))) & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_and_letters_have_glyphs() {
        for ch in "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ".chars() {
            assert!(BitmapFont::glyph(ch).is_some(), "missing glyph for {ch}");
        }
        assert_eq!(BitmapFont::glyph('a'), BitmapFont::glyph('A'));
        assert_eq!(BitmapFont::glyph('~'), None);
    }

    #[test]
    fn test_bit_order() {
        // Top row of 'T' is 0x7E: columns 1..=6 set.
        let t = BitmapFont::glyph('T').unwrap();
        assert!(!BitmapFont::is_set(t, 0, 0));
        assert!(BitmapFont::is_set(t, 1, 0));
        assert!(BitmapFont::is_set(t, 6, 0));
        assert!(!BitmapFont::is_set(t, 7, 0));
        // Bottom row is always blank.
        assert!((0..8).all(|x| !BitmapFont::is_set(t, x, 7)));
    }
}
