/// Rows per glyph
pub const GLYPH_HEIGHT: u16 = 5;

const GLYPH_GAP: &str = "  ";

// 3x5 cells, each cell drawn two columns wide so digits look square in a terminal
const GLYPHS: [[&str; 5]; 10] = [
    ["###", "# #", "# #", "# #", "###"],
    [" # ", "## ", " # ", " # ", "###"],
    ["###", "  #", "###", "#  ", "###"],
    ["###", "  #", "###", "  #", "###"],
    ["# #", "# #", "###", "  #", "  #"],
    ["###", "#  ", "###", "  #", "###"],
    ["###", "#  ", "###", "# #", "###"],
    ["###", "  #", "  #", "  #", "  #"],
    ["###", "# #", "###", "# #", "###"],
    ["###", "# #", "###", "  #", "###"],
];

fn glyph_row(c: char, row: usize) -> String {
    let cells = c
        .to_digit(10)
        .map(|d| GLYPHS[d as usize][row])
        .unwrap_or("   ");
    cells
        .chars()
        .map(|cell| if cell == '#' { "██" } else { "  " })
        .collect()
}

/// Render digits as block-character rows; anything else becomes blank space
pub fn big_lines(text: &str) -> Vec<String> {
    (0..GLYPH_HEIGHT as usize)
        .map(|row| {
            text.chars()
                .map(|c| glyph_row(c, row))
                .collect::<Vec<_>>()
                .join(GLYPH_GAP)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn renders_five_rows() {
        let lines = big_lines("120");
        assert_eq!(lines.len(), GLYPH_HEIGHT as usize);
        assert_eq!(lines[0], "  ██    ██████  ██████");
    }

    #[test]
    fn rows_share_one_width() {
        for (text, glyphs) in [("0", 1), ("30", 2), ("240", 3)] {
            let lines = big_lines(text);
            let expected = glyphs * 6 + (glyphs - 1) * GLYPH_GAP.len();
            assert!(lines.iter().all(|l| l.width() == expected));
        }
    }
}
