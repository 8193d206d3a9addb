//! Fixed 11x18 dot-matrix bitmaps for the digits 0 through 9.

/// Glyph width in dots.
pub const DIGIT_FONT_WIDTH: usize = 11;
/// Glyph height in dots.
pub const DIGIT_FONT_HEIGHT: usize = 18;

const SET: u8 = b'#';

/// Rows of each digit; `#` marks a set dot.
const DIGIT_GLYPHS: [[&str; DIGIT_FONT_HEIGHT]; 10] = [
    // 0
    [
        "...#####...",
        "..#######..",
        ".###...###.",
        "###.....###",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "###.....###",
        ".###...###.",
        "..#######..",
        "...#####...",
    ],
    // 1
    [
        ".....##....",
        "...####....",
        "..#####....",
        ".###.##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".....##....",
        ".#########.",
        ".#########.",
    ],
    // 2
    [
        "..######...",
        ".########..",
        "###....###.",
        "##......##.",
        "........##.",
        "........##.",
        ".......###.",
        "......###..",
        ".....###...",
        "....###....",
        "...###.....",
        "..###......",
        ".###.......",
        "###........",
        "##.........",
        "##.........",
        "###########",
        "###########",
    ],
    // 3
    [
        "..######...",
        ".########..",
        "###....###.",
        "........##.",
        "........##.",
        "........##.",
        ".......###.",
        "...######..",
        "...######..",
        ".......###.",
        "........##.",
        "........##.",
        "........##.",
        "........##.",
        "##......##.",
        "###....###.",
        ".########..",
        "..######...",
    ],
    // 4
    [
        ".......##..",
        "......###..",
        ".....####..",
        "....##.##..",
        "...##..##..",
        "..##...##..",
        ".##....##..",
        "##.....##..",
        "##.....##..",
        "###########",
        "###########",
        ".......##..",
        ".......##..",
        ".......##..",
        ".......##..",
        ".......##..",
        ".......##..",
        ".......##..",
    ],
    // 5
    [
        "##########.",
        "##########.",
        "##.........",
        "##.........",
        "##.........",
        "##.#####...",
        "#########..",
        "###....###.",
        "........##.",
        "........##.",
        "........##.",
        "........##.",
        "........##.",
        "........##.",
        "##......##.",
        "###....###.",
        ".########..",
        "..######...",
    ],
    // 6
    [
        "...######..",
        "..########.",
        ".###....##.",
        "###........",
        "##.........",
        "##.........",
        "##.#####...",
        "#########..",
        "###....###.",
        "##......##.",
        "##......##.",
        "##......##.",
        "##......##.",
        "##......##.",
        "###....###.",
        ".###..###..",
        "..######...",
        "...####....",
    ],
    // 7
    [
        "###########",
        "###########",
        "........##.",
        ".......###.",
        ".......##..",
        "......###..",
        "......##...",
        ".....###...",
        ".....##....",
        "....###....",
        "....##.....",
        "....##.....",
        "...###.....",
        "...##......",
        "...##......",
        "...##......",
        "...##......",
        "...##......",
    ],
    // 8
    [
        "..#######..",
        ".#########.",
        "###.....###",
        "##.......##",
        "##.......##",
        "###.....###",
        ".###...###.",
        "..#######..",
        "..#######..",
        ".###...###.",
        "###.....###",
        "##.......##",
        "##.......##",
        "##.......##",
        "##.......##",
        "###.....###",
        ".#########.",
        "..#######..",
    ],
    // 9
    [
        "...#####...",
        "..#######..",
        ".###...###.",
        "###.....###",
        "##.......##",
        "##.......##",
        "###.....###",
        ".##########",
        "..######.##",
        ".........##",
        ".........##",
        ".........##",
        ".........##",
        "........###",
        "##.....###.",
        "###...###..",
        ".#######...",
        "..#####....",
    ],
];

/// Bitmap for `digit`, or `None` outside 0..=9.
pub(crate) fn digit_glyph(digit: u8) -> Option<&'static [&'static str; DIGIT_FONT_HEIGHT]> {
    DIGIT_GLYPHS.get(usize::from(digit))
}

/// Whether dot (`col`, `row`) of `glyph` is set.
pub(crate) fn is_set(glyph: &[&str; DIGIT_FONT_HEIGHT], col: usize, row: usize) -> bool {
    glyph[row].as_bytes().get(col) == Some(&SET)
}

#[cfg(test)]
#[path = "../../tests/unit/render/digit_font.rs"]
mod tests;
