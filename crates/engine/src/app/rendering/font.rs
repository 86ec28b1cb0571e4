pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) rows: [u8; GLYPH_HEIGHT as usize],
}

const fn g(rows: [u8; GLYPH_HEIGHT as usize]) -> Glyph {
    Glyph { rows }
}

pub(crate) const BLANK: Glyph = g([0, 0, 0, 0, 0]);
const UNKNOWN: Glyph = g([0b110, 0b001, 0b010, 0b000, 0b010]);

pub(crate) fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

/// Pixel size of a possibly multi-line string at `scale`.
pub fn text_size(text: &str, scale: i32) -> (i32, i32) {
    let scale = scale.max(1);
    let mut lines = 0;
    let mut widest = 0;
    for line in text.split('\n') {
        lines += 1;
        widest = widest.max(line.chars().count() as i32);
    }
    if widest == 0 {
        return (0, lines * line_advance(scale));
    }
    let width = widest * glyph_advance(scale) - scale;
    let height = lines * line_advance(scale) - 2 * scale;
    (width, height)
}

/// Lowercase letters reuse the uppercase shapes.
pub(crate) fn glyph_for(ch: char) -> Glyph {
    match ch.to_ascii_uppercase() {
        ' ' => BLANK,
        'A' => g([0b010, 0b101, 0b111, 0b101, 0b101]),
        'B' => g([0b110, 0b101, 0b110, 0b101, 0b110]),
        'C' => g([0b011, 0b100, 0b100, 0b100, 0b011]),
        'D' => g([0b110, 0b101, 0b101, 0b101, 0b110]),
        'E' => g([0b111, 0b100, 0b110, 0b100, 0b111]),
        'F' => g([0b111, 0b100, 0b110, 0b100, 0b100]),
        'G' => g([0b011, 0b100, 0b101, 0b101, 0b011]),
        'H' => g([0b101, 0b101, 0b111, 0b101, 0b101]),
        'I' => g([0b111, 0b010, 0b010, 0b010, 0b111]),
        'J' => g([0b001, 0b001, 0b001, 0b101, 0b010]),
        'K' => g([0b101, 0b101, 0b110, 0b101, 0b101]),
        'L' => g([0b100, 0b100, 0b100, 0b100, 0b111]),
        'M' => g([0b101, 0b111, 0b111, 0b101, 0b101]),
        'N' => g([0b110, 0b101, 0b101, 0b101, 0b101]),
        'O' => g([0b010, 0b101, 0b101, 0b101, 0b010]),
        'P' => g([0b110, 0b101, 0b110, 0b100, 0b100]),
        'Q' => g([0b010, 0b101, 0b101, 0b110, 0b011]),
        'R' => g([0b110, 0b101, 0b110, 0b101, 0b101]),
        'S' => g([0b011, 0b100, 0b010, 0b001, 0b110]),
        'T' => g([0b111, 0b010, 0b010, 0b010, 0b010]),
        'U' => g([0b101, 0b101, 0b101, 0b101, 0b111]),
        'V' => g([0b101, 0b101, 0b101, 0b101, 0b010]),
        'W' => g([0b101, 0b101, 0b111, 0b111, 0b101]),
        'X' => g([0b101, 0b101, 0b010, 0b101, 0b101]),
        'Y' => g([0b101, 0b101, 0b010, 0b010, 0b010]),
        'Z' => g([0b111, 0b001, 0b010, 0b100, 0b111]),
        '0' => g([0b111, 0b101, 0b101, 0b101, 0b111]),
        '1' => g([0b010, 0b110, 0b010, 0b010, 0b111]),
        '2' => g([0b110, 0b001, 0b010, 0b100, 0b111]),
        '3' => g([0b110, 0b001, 0b010, 0b001, 0b110]),
        '4' => g([0b101, 0b101, 0b111, 0b001, 0b001]),
        '5' => g([0b111, 0b100, 0b110, 0b001, 0b110]),
        '6' => g([0b011, 0b100, 0b111, 0b101, 0b111]),
        '7' => g([0b111, 0b001, 0b010, 0b010, 0b010]),
        '8' => g([0b111, 0b101, 0b111, 0b101, 0b111]),
        '9' => g([0b111, 0b101, 0b111, 0b001, 0b110]),
        ':' => g([0b000, 0b010, 0b000, 0b010, 0b000]),
        '/' => g([0b001, 0b001, 0b010, 0b100, 0b100]),
        '!' => g([0b010, 0b010, 0b010, 0b000, 0b010]),
        '-' => g([0b000, 0b000, 0b111, 0b000, 0b000]),
        '.' => g([0b000, 0b000, 0b000, 0b000, 0b010]),
        ',' => g([0b000, 0b000, 0b000, 0b010, 0b100]),
        '<' => g([0b001, 0b010, 0b100, 0b010, 0b001]),
        '>' => g([0b100, 0b010, 0b001, 0b010, 0b100]),
        '^' => g([0b010, 0b101, 0b000, 0b000, 0b000]),
        '\'' => g([0b010, 0b010, 0b000, 0b000, 0b000]),
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_maps_to_uppercase_shape() {
        assert_eq!(glyph_for('c'), glyph_for('C'));
    }

    #[test]
    fn unmapped_characters_render_as_question_mark_shape() {
        assert_eq!(glyph_for('@'), UNKNOWN);
        assert_eq!(glyph_for('?'), UNKNOWN);
    }

    #[test]
    fn text_size_accounts_for_lines_and_scale() {
        assert_eq!(text_size("AB", 1), (7, 5));
        assert_eq!(text_size("AB\nCDE", 2), (22, 24));
        assert_eq!(text_size("", 3), (0, 21));
    }
}
