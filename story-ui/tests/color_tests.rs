use story_ui::Color;

#[test]
fn hex_round_trip() {
    let c = Color::from_hex("#0d0d1a").unwrap();
    assert_eq!(c, Color::rgb(0x0d, 0x0d, 0x1a));
    assert_eq!(c.to_hex(), "#0d0d1a");
    assert_eq!(Color::from_hex("88ddbb"), Some(Color::rgb(0x88, 0xdd, 0xbb)));
}

#[test]
fn bad_hex_is_rejected() {
    assert_eq!(Color::from_hex("#fff"), None);
    assert_eq!(Color::from_hex("#zzzzzz"), None);
    assert_eq!(Color::from_hex(""), None);
}

#[test]
fn lerp_endpoints_and_truncation() {
    let bg = Color::rgb(0x0d, 0x0d, 0x1a);
    let fg = Color::rgb(0xd0, 0xd0, 0xe8);
    assert_eq!(bg.lerp(fg, 0.0), bg);
    assert_eq!(bg.lerp(fg, 1.0), fg);
    assert_eq!(bg.lerp(fg, 7.0), fg);
    assert_eq!(bg.lerp(fg, -1.0), bg);

    // 13 + (208 - 13) * 0.5 = 110.5 -> 110
    assert_eq!(bg.lerp(fg, 0.5).r, 110);
}

#[test]
fn lerp_is_monotone_per_channel() {
    let a = Color::rgb(0xff, 0x10, 0x80);
    let b = Color::rgb(0x00, 0xf0, 0x80);
    let mut prev = a;
    for i in 1..=40 {
        let c = a.lerp(b, i as f32 / 40.0);
        assert!(c.r <= prev.r);
        assert!(c.g >= prev.g);
        assert_eq!(c.b, 0x80);
        prev = c;
    }
}
