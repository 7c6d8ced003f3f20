use serde::Deserialize;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
struct Window {
    width: u32,
    title: String,
}

// 全局 store 在同一个测试二进制里共享，所以放在一个测试里按顺序跑
#[test]
fn sections_load_reload_and_fall_back() {
    let before: Window = story_shared::config::get("window");
    assert_eq!(before, Window::default());

    story_shared::config::init_from_str("[window]\nwidth = 1280\ntitle = \"Reader\"\n");
    assert!(story_shared::config::is_initialized());
    let w: Window = story_shared::config::get("window");
    assert_eq!(w.width, 1280);
    assert_eq!(w.title, "Reader");
    assert_eq!(story_shared::config::sections(), vec!["window".to_string()]);

    story_shared::config::init_from_str("[window]\nwidth = \"wide\"\n");
    let mismatch: Window = story_shared::config::get("window");
    assert_eq!(mismatch, Window::default());

    story_shared::config::init_from_str("this is = = not toml");
    assert!(story_shared::config::sections().is_empty());

    let missing = story_shared::config::init("definitely/not/here/config.toml");
    assert!(missing.is_ok());
    let absent: Window = story_shared::config::get("window");
    assert_eq!(absent, Window::default());
}
