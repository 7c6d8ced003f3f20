use story_ui::{GlyphMetrics, wrap_lines};

#[test]
fn ascii_wraps_by_unit_width() {
    let m = GlyphMetrics::new(9.0, 30.0);
    // 每行最多 3 个字符 (27px)
    let lines = wrap_lines("abcdefg", 27.0, &m);
    assert_eq!(lines, vec!["abc", "def", "g"]);
}

#[test]
fn wide_characters_take_two_units() {
    let m = GlyphMetrics::new(9.0, 30.0);
    assert_eq!(m.char_width('a'), 9.0);
    assert_eq!(m.char_width('雨'), 18.0);
    assert_eq!(m.line_width("a雨"), 27.0);

    let lines = wrap_lines("雨夜里的侦探", 40.0, &m);
    assert_eq!(lines, vec!["雨夜", "里的", "侦探"]);
}

#[test]
fn explicit_breaks_and_empty_lines_are_kept() {
    let m = GlyphMetrics::default();
    let lines = wrap_lines("one\n\ntwo", 500.0, &m);
    assert_eq!(lines, vec!["one", "", "two"]);
}

#[test]
fn an_oversized_glyph_still_gets_its_own_line() {
    let m = GlyphMetrics::new(9.0, 30.0);
    let lines = wrap_lines("ab", 4.0, &m);
    assert_eq!(lines, vec!["a", "b"]);
    assert_eq!(wrap_lines("", 100.0, &m), vec![""]);
}
