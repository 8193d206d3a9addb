use super::*;

#[test]
fn every_glyph_is_eleven_by_eighteen() {
    for glyph in &DIGIT_GLYPHS {
        assert_eq!(glyph.len(), DIGIT_FONT_HEIGHT);
        for row in glyph {
            assert_eq!(row.len(), DIGIT_FONT_WIDTH);
            assert!(row.bytes().all(|b| b == SET || b == b'.'));
        }
    }
}

#[test]
fn glyphs_are_distinct_and_non_blank() {
    for a in 0..10u8 {
        let ga = digit_glyph(a).unwrap();
        let dots = (0..DIGIT_FONT_HEIGHT)
            .flat_map(|r| (0..DIGIT_FONT_WIDTH).map(move |c| (c, r)))
            .filter(|&(c, r)| is_set(ga, c, r))
            .count();
        assert!(dots > 20, "digit {a} has only {dots} dots");
        for b in (a + 1)..10 {
            assert_ne!(ga, digit_glyph(b).unwrap());
        }
    }
    assert!(digit_glyph(10).is_none());
}

#[test]
fn is_set_ignores_out_of_range_columns() {
    let zero = digit_glyph(0).unwrap();
    assert!(is_set(zero, 0, 4));
    assert!(!is_set(zero, 5, 4));
    assert!(!is_set(zero, DIGIT_FONT_WIDTH, 4));
}
