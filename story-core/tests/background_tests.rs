use std::collections::BTreeSet;
use std::time::Duration;

use image::Rgb;
use story_core::config::TimingConfig;
use story_core::{BackgroundAnimator, BackgroundFrame, ImageCache};
use story_script::BackgroundSpec;
use story_ui::{Bitmap, Color};

fn spec(image: &str, tags: &[&str]) -> BackgroundSpec {
    BackgroundSpec {
        image: Some(image.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        ..BackgroundSpec::default()
    }
}

fn fixture() -> (tempfile::TempDir, ImageCache) {
    let dir = tempfile::tempdir().unwrap();
    Bitmap::from_pixel(32, 24, Rgb([200, 10, 10])).save(dir.path().join("a.png")).unwrap();
    Bitmap::from_pixel(32, 24, Rgb([10, 10, 200])).save(dir.path().join("b.png")).unwrap();
    let cache = ImageCache::new(dir.path());
    (dir, cache)
}

fn animator() -> BackgroundAnimator {
    BackgroundAnimator::new(Color::rgb(13, 13, 26), TimingConfig::default(), Some(9))
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn no_image_composes_a_solid_frame() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    assert_eq!(bg.compose(ms(0), 100, 80, &mut cache), BackgroundFrame::Solid(Color::rgb(13, 13, 26)));
}

#[test]
fn first_image_never_fades() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &["fade"])), ms(0), true, &mut cache);

    assert!(!bg.is_fading());
    assert!(bg.previous_image().is_none());
    match bg.compose(ms(0), 100, 80, &mut cache) {
        BackgroundFrame::Image { bitmap, offset } => {
            assert_eq!(bitmap.dimensions(), (100, 80));
            assert_eq!(offset, (0, 0));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn fade_needs_the_tag_and_a_previous_image() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &[])), ms(0), true, &mut cache);
    bg.configure(Some(&spec("b.png", &[])), ms(10), true, &mut cache);
    assert!(!bg.is_fading());

    bg.configure(Some(&spec("a.png", &["fadein"])), ms(20), true, &mut cache);
    assert!(bg.is_fading());
    assert!(bg.has_active_animation());

    // 450ms 默认时长之后淡入结束
    bg.compose(ms(20 + 450), 50, 50, &mut cache);
    assert!(!bg.is_fading());
    assert!(!bg.has_active_animation());
}

#[test]
fn static_configure_switches_without_animation() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &[])), ms(0), true, &mut cache);
    bg.configure(Some(&spec("b.png", &["fade", "shake"])), ms(5), false, &mut cache);

    assert!(bg.current_image().unwrap().ends_with("b.png"));
    assert!(!bg.has_active_animation());
}

#[test]
fn missing_image_keeps_the_current_background() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &[])), ms(0), true, &mut cache);
    bg.configure(Some(&spec("missing.png", &["fade"])), ms(5), true, &mut cache);
    bg.configure(None, ms(6), true, &mut cache);

    assert!(bg.current_image().unwrap().ends_with("a.png"));
    assert!(!bg.is_fading());
}

#[test]
fn shake_decays_and_expires() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    let mut shaking = spec("a.png", &["shake"]);
    shaking.shake_strength = Some(6);
    bg.configure(Some(&shaking), ms(0), true, &mut cache);
    assert!(bg.is_shaking());

    for t in [0, 50, 100, 200, 300, 379] {
        if let BackgroundFrame::Image { offset: (dx, dy), .. } = bg.compose(ms(t), 40, 40, &mut cache) {
            let ratio = 1.0 - t as f64 / 380.0;
            let k = ((6.0 * ratio) as i32).max(1);
            assert!(dx.abs() <= k && dy.abs() <= k, "offset ({dx},{dy}) at {t}ms exceeds {k}");
        }
    }
    match bg.compose(ms(380), 40, 40, &mut cache) {
        BackgroundFrame::Image { offset, .. } => assert_eq!(offset, (0, 0)),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!bg.is_shaking());
}

#[test]
fn shake_durations_have_a_floor() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    let mut quick = spec("a.png", &["shake"]);
    quick.shake_ms = Some(1.0);
    bg.configure(Some(&quick), ms(0), true, &mut cache);

    bg.compose(ms(79), 40, 40, &mut cache);
    assert!(bg.is_shaking());
    bg.compose(ms(80), 40, 40, &mut cache);
    assert!(!bg.is_shaking());
}

#[test]
fn refresh_skips_identical_frames() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &[])), ms(0), true, &mut cache);

    assert!(bg.refresh(ms(0), 64, 48, &mut cache).is_some());
    assert!(bg.refresh(ms(33), 64, 48, &mut cache).is_none());
    assert!(bg.refresh(ms(66), 65, 48, &mut cache).is_some());

    bg.on_resize(&mut cache);
    assert_eq!(cache.resized_count(), 0);
    assert!(bg.refresh(ms(99), 65, 48, &mut cache).is_some());
}

#[test]
fn shake_expires_even_without_an_image() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    let shaking = BackgroundSpec {
        tags: ["shake".to_string()].into_iter().collect(),
        ..BackgroundSpec::default()
    };
    bg.configure(Some(&shaking), ms(0), true, &mut cache);
    assert!(bg.is_shaking());

    assert_eq!(bg.compose(ms(100), 40, 40, &mut cache), BackgroundFrame::Solid(Color::rgb(13, 13, 26)));
    assert!(bg.has_active_animation());

    bg.compose(ms(380), 40, 40, &mut cache);
    assert!(!bg.is_shaking());
    assert!(!bg.has_active_animation());
}

#[test]
fn fade_into_an_undecodable_image_ends_at_once() {
    let (dir, mut cache) = fixture();
    std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &[])), ms(0), true, &mut cache);
    bg.configure(Some(&spec("broken.png", &["fade"])), ms(10), true, &mut cache);
    assert!(bg.is_fading());

    assert_eq!(bg.compose(ms(20), 40, 40, &mut cache), BackgroundFrame::Solid(Color::rgb(13, 13, 26)));
    assert!(!bg.is_fading());
    assert!(bg.previous_image().is_none());
    assert!(!bg.has_active_animation());
}

#[test]
fn huge_durations_are_capped() {
    let (_dir, mut cache) = fixture();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &[])), ms(0), true, &mut cache);

    let mut wild = spec("b.png", &["fade", "shake"]);
    wild.fade_ms = Some(1e30);
    wild.shake_ms = Some(1e30);
    wild.shake_strength = Some(i64::MAX);
    bg.configure(Some(&wild), ms(0), true, &mut cache);
    assert!(bg.is_fading() && bg.is_shaking());

    assert!(matches!(bg.compose(ms(10), 40, 40, &mut cache), BackgroundFrame::Image { .. }));

    // 最长一小时
    bg.compose(Duration::from_secs(3600), 40, 40, &mut cache);
    assert!(!bg.has_active_animation());
}

#[test]
fn switching_backgrounds_keeps_unrelated_resized_images() {
    let (dir, mut cache) = fixture();
    Bitmap::from_pixel(16, 16, Rgb([0, 200, 0])).save(dir.path().join("face.png")).unwrap();
    let mut bg = animator();
    bg.configure(Some(&spec("a.png", &[])), ms(0), true, &mut cache);
    bg.compose(ms(0), 64, 48, &mut cache);

    // 立绘也用同一个缓存
    let face = cache.resolve("face.png").unwrap();
    cache.get_resized(&face, 20, 30).unwrap();
    assert_eq!(cache.resized_count(), 2);

    bg.configure(Some(&spec("b.png", &[])), ms(5), true, &mut cache);
    assert_eq!(cache.resized_count(), 1);
    bg.compose(ms(5), 64, 48, &mut cache);
    assert_eq!(cache.resized_count(), 2);

    // 淡入期间旧图还要用，结束后才释放
    bg.configure(Some(&spec("a.png", &["fade"])), ms(10), true, &mut cache);
    bg.compose(ms(10), 64, 48, &mut cache);
    assert_eq!(cache.resized_count(), 3);
    bg.compose(ms(10 + 450), 64, 48, &mut cache);
    assert_eq!(cache.resized_count(), 2);
}
