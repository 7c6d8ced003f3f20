use std::time::Duration;

use story_core::overlay::{BASE_Y, HIDDEN_Y};
use story_core::{Band, ChoiceOverlay, ManualScheduler, Scheduler};
use story_ui::Rect;

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Fires the next overlay tick, if any.
fn step(overlay: &mut ChoiceOverlay, sched: &mut ManualScheduler) -> bool {
    match sched.pop_due(Duration::from_secs(10)) {
        Some(fired) => overlay.on_tick(fired.handle, sched),
        None => false,
    }
}

#[test]
fn show_tweens_opacity_and_offset() {
    let mut sched = ManualScheduler::new();
    let mut overlay = ChoiceOverlay::new(0.22, 33);
    overlay.show(&labels(&["Go", "Stay"]), &mut sched);

    assert_eq!(overlay.labels(), &["[1]  Go".to_string(), "[2]  Stay".to_string()]);
    let mut seen = vec![(overlay.current_y(), overlay.band())];
    while step(&mut overlay, &mut sched) {
        seen.push((overlay.current_y(), overlay.band()));
    }

    assert_eq!(
        seen,
        vec![
            (11, Some(Band::Faint)),
            (4, Some(Band::Medium)),
            (-1, Some(Band::Medium)),
            (-8, Some(Band::Dense)),
            (BASE_Y, Some(Band::Dense)),
        ]
    );
    assert_eq!(overlay.opacity(), 1.0);
    assert!(!overlay.is_animating());
    assert_eq!(sched.now(), Duration::from_millis(132));
}

#[test]
fn hide_mid_show_reverses_from_the_current_value() {
    let mut sched = ManualScheduler::new();
    let mut overlay = ChoiceOverlay::new(0.22, 33);
    overlay.show(&labels(&["a"]), &mut sched);
    step(&mut overlay, &mut sched);
    assert!((overlay.opacity() - 0.44).abs() < 1e-6);

    overlay.hide(true, &mut sched);
    assert!(!overlay.is_visible());
    assert!((overlay.opacity() - 0.22).abs() < 1e-6);
    assert_eq!(overlay.labels().len(), 1);

    step(&mut overlay, &mut sched);
    assert_eq!(overlay.opacity(), 0.0);
    assert_eq!(overlay.current_y(), HIDDEN_Y);
    assert!(overlay.labels().is_empty());
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn hide_with_nothing_visible_is_a_no_op() {
    let mut sched = ManualScheduler::new();
    let mut overlay = ChoiceOverlay::new(0.22, 33);
    overlay.hide(true, &mut sched);

    assert_eq!(sched.pending_count(), 0);
    assert_eq!(overlay.opacity(), 0.0);
    assert!(overlay.band().is_none());
}

#[test]
fn instant_hide_drops_the_pending_tick() {
    let mut sched = ManualScheduler::new();
    let mut overlay = ChoiceOverlay::new(0.22, 33);
    overlay.show(&labels(&["a", "b"]), &mut sched);
    let stale = sched.pop_due(Duration::from_secs(1)).unwrap();

    overlay.hide(false, &mut sched);
    assert_eq!(overlay.opacity(), 0.0);
    assert!(overlay.labels().is_empty());
    assert!(!overlay.on_tick(stale.handle, &mut sched));
}

#[test]
fn backdrop_is_anchored_to_the_stage_bottom() {
    let mut sched = ManualScheduler::new();
    let mut overlay = ChoiceOverlay::new(0.22, 33);
    let stage = Rect::new(0.0, 0.0, 560.0, 480.0);
    assert!(overlay.backdrop_rect(stage).is_none());

    overlay.show_immediately(&labels(&["Go", "Stay"]), &mut sched);
    let rect = overlay.backdrop_rect(stage).unwrap();
    assert_eq!(rect, Rect::from_edges(14.0, 366.0, 546.0, 472.0));

    // 行数多时高度封顶
    overlay.show_immediately(&labels(&["1", "2", "3", "4", "5", "6"]), &mut sched);
    assert_eq!(overlay.panel_height(), 220.0);
    overlay.show_immediately(&labels(&[]), &mut sched);
    assert_eq!(overlay.panel_height(), 72.0);
}

#[test]
fn bands_split_at_a_third() {
    assert_eq!(Band::from_opacity(0.1), Band::Faint);
    assert_eq!(Band::from_opacity(0.34), Band::Medium);
    assert_eq!(Band::from_opacity(0.669), Band::Medium);
    assert_eq!(Band::from_opacity(0.67), Band::Dense);
    assert!(Band::Faint.alpha() < Band::Medium.alpha());
    assert!(Band::Medium.alpha() < Band::Dense.alpha());
}
