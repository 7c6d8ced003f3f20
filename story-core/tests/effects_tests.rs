use std::time::Duration;

use story_core::effects::{CURSOR, EffectColors, EffectEngine, EffectStep, TextFrame, TextLayout, TextStyle};
use story_core::{ManualScheduler, Palette, TimerKind};
use story_script::EffectKind;
use story_ui::GlyphMetrics;

fn colors() -> EffectColors {
    EffectColors::from(&Palette::default())
}

fn layout() -> TextLayout {
    TextLayout {
        origin: (58.0, 38.0),
        wrap_width: 444.0,
        metrics: GlyphMetrics::default(),
    }
}

/// Runs an effect to completion and returns every frame it produced.
fn run(kind: EffectKind, text: &str) -> Vec<EffectStep> {
    let mut sched = ManualScheduler::new();
    let mut engine = EffectEngine::new(colors(), Some(42));
    let layout = layout();

    let mut steps = vec![engine.start(text, kind, 30, &layout, &mut sched)];
    while let Some(fired) = sched.pop_due(Duration::from_secs(600)) {
        assert_eq!(fired.kind, TimerKind::Text);
        steps.push(engine.tick(fired.handle, &layout, &mut sched).unwrap());
    }
    assert!(!engine.is_running());
    steps
}

fn block(step: &EffectStep) -> (&str, story_ui::Color, (i32, i32), TextStyle) {
    match &step.frame {
        TextFrame::Block { text, color, offset, style } => (text.as_str(), *color, *offset, *style),
        other => panic!("expected a block frame, got {:?}", other),
    }
}

#[test]
fn fadein_takes_forty_one_ticks() {
    let c = colors();
    let steps = run(EffectKind::FadeIn, "Hello");

    assert_eq!(steps.len(), 41);
    assert_eq!(block(&steps[0]).1, c.background);
    assert_eq!(block(&steps[40]).1, c.foreground);
    assert_eq!(block(&steps[20]).1, c.background.lerp(c.foreground, 0.5));
    assert!(steps[..40].iter().all(|s| !s.finished));
    assert!(steps[40].finished);
}

#[test]
fn typewriter_reveals_with_a_cursor() {
    let steps = run(EffectKind::Typewriter, "abc");
    let texts: Vec<&str> = steps.iter().map(|s| block(s).0).collect();

    let cursor = CURSOR.to_string();
    assert_eq!(texts, vec![cursor.as_str(), "a▌", "ab▌", "abc"]);
    assert!(steps.iter().all(|s| block(s).1 == colors().foreground));
    assert!(steps[3].finished);
}

#[test]
fn typewriter_counts_characters_not_bytes() {
    let steps = run(EffectKind::Typewriter, "雨夜");
    assert_eq!(steps.len(), 3);
    assert_eq!(block(&steps[1]).0, "雨▌");
}

#[test]
fn empty_typewriter_finishes_on_start() {
    let mut sched = ManualScheduler::new();
    let mut engine = EffectEngine::new(colors(), Some(1));
    let step = engine.start("", EffectKind::Typewriter, 30, &layout(), &mut sched);

    assert!(step.finished);
    assert!(!engine.is_running());
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn shake_fades_then_jitters_then_settles() {
    let c = colors();
    let steps = run(EffectKind::Shake, "Run!");

    assert_eq!(steps.len(), 14 + 22 + 1);
    for (i, step) in steps[..14].iter().enumerate() {
        let (_, color, offset, style) = block(step);
        assert_eq!(color, c.background.lerp(c.alert, i as f32 / 14.0));
        assert_eq!(offset, (0, 0));
        assert_eq!(style, TextStyle::Alert);
    }
    for (s, step) in steps[14..36].iter().enumerate() {
        let (_, color, (dx, dy), _) = block(step);
        let intensity = 1.0 - s as f32 / 22.0;
        assert_eq!(color, c.alert);
        assert!(dx.abs() as f32 <= 10.0 * intensity, "dx {} at jitter {}", dx, s);
        assert!(dy.abs() as f32 <= 6.0 * intensity, "dy {} at jitter {}", dy, s);
        assert!(!step.finished);
    }
    let last = steps.last().unwrap();
    assert!(last.finished);
    assert_eq!(block(last).1, c.alert);
    assert_eq!(block(last).2, (0, 0));
}

#[test]
fn wave_staggers_and_lands_on_the_static_layout() {
    let c = colors();
    let steps = run(EffectKind::Wave, "ab\ncd");
    // 4 chars * 3 + 30 frames, frame 0 included
    assert_eq!(steps.len(), 43);

    let glyphs = |i: usize| match &steps[i].frame {
        TextFrame::Glyphs(g) => g.clone(),
        other => panic!("expected glyphs, got {:?}", other),
    };

    let first = glyphs(0);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].ch, 'a');
    assert_eq!(first[0].color, c.background);
    assert_eq!(glyphs(3).len(), 2);

    let last = glyphs(42);
    let placed: Vec<(char, f32, f32)> = last.iter().map(|g| (g.ch, g.x, g.y)).collect();
    assert_eq!(
        placed,
        vec![('a', 58.0, 38.0), ('b', 67.0, 38.0), ('c', 58.0, 68.0), ('d', 67.0, 68.0)]
    );
    assert!(last.iter().all(|g| g.color == c.wave));
}

#[test]
fn wave_bounces_above_the_baseline() {
    let steps = run(EffectKind::Wave, "x");
    let y_at = |i: usize| match &steps[i].frame {
        TextFrame::Glyphs(g) => g[0].y,
        _ => unreachable!(),
    };
    // p = 0.5 在第 5 帧，sin 峰值 -14
    assert_eq!(y_at(5), 38.0 - 14.0);
    assert!(y_at(2) < 38.0);
    assert_eq!(y_at(10), 38.0);
}

#[test]
fn skip_settles_once_and_cancels_the_pending_tick() {
    let mut sched = ManualScheduler::new();
    let mut engine = EffectEngine::new(colors(), Some(3));
    engine.start("Hello", EffectKind::Wave, 30, &layout(), &mut sched);
    assert_eq!(sched.pending_of(TimerKind::Text), 1);

    let frame = engine.skip(&mut sched).unwrap();
    assert_eq!(frame, TextFrame::block("Hello", colors().wave));
    assert_eq!(sched.pending_count(), 0);
    assert!(engine.skip(&mut sched).is_none());
}

#[test]
fn settled_colors_follow_the_effect() {
    let c = colors();
    let engine = EffectEngine::new(c, Some(0));

    assert_eq!(engine.settled_frame("t", EffectKind::FadeIn), TextFrame::block("t", c.foreground));
    assert_eq!(engine.settled_frame("t", EffectKind::Typewriter), TextFrame::block("t", c.foreground));
    assert_eq!(engine.settled_frame("t", EffectKind::Wave), TextFrame::block("t", c.wave));
    assert_eq!(
        engine.settled_frame("t", EffectKind::Shake),
        TextFrame::Block { text: "t".into(), color: c.alert, offset: (0, 0), style: TextStyle::Alert }
    );
}

#[test]
fn stale_handles_are_ignored() {
    let mut sched = ManualScheduler::new();
    let mut engine = EffectEngine::new(colors(), Some(5));
    let layout = layout();

    engine.start("first", EffectKind::FadeIn, 30, &layout, &mut sched);
    let old = sched.pop_due(Duration::from_millis(30)).unwrap();

    engine.start("second", EffectKind::FadeIn, 30, &layout, &mut sched);
    assert!(engine.tick(old.handle, &layout, &mut sched).is_none());
    assert!(engine.is_running());
    assert_eq!(sched.pending_of(TimerKind::Text), 1);
}

#[test]
fn unknown_effect_names_fall_back_to_fadein() {
    assert_eq!(EffectKind::parse("WAVE"), EffectKind::Wave);
    assert_eq!(EffectKind::parse("sparkle"), EffectKind::FadeIn);
    assert_eq!(run(EffectKind::parse("sparkle"), "x").len(), 41);
}
