//! Text-reveal effects. Each effect is a plain state struct with a pure
//! `tick`; the [`EffectEngine`] owns the running one together with the handle
//! of its pending timer.

mod fadein;
mod shake;
mod typewriter;
mod wave;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use story_script::EffectKind;
use story_ui::{Color, GlyphMetrics};

use crate::config::Palette;
use crate::scheduler::{Scheduler, TimerHandle, TimerKind};

pub use fadein::FadeIn;
pub use shake::Shake;
pub use typewriter::{CURSOR, Typewriter};
pub use wave::Wave;

/// Where and how wide text is laid out. Read fresh on every tick, so a resize
/// between ticks is picked up by the next frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextLayout {
    pub origin: (f32, f32),
    pub wrap_width: f32,
    pub metrics: GlyphMetrics,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Regular,
    /// 加粗大字号
    Alert,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x: f32,
    pub y: f32,
    pub color: Color,
}

/// One rendered state of the segment text.
#[derive(Clone, Debug, PartialEq)]
pub enum TextFrame {
    /// The whole string wrapped at the layout's width, drawn at `origin + offset`.
    Block {
        text: String,
        color: Color,
        offset: (i32, i32),
        style: TextStyle,
    },
    /// Individually placed characters.
    Glyphs(Vec<Glyph>),
}

impl TextFrame {
    pub fn block(text: impl Into<String>, color: Color) -> Self {
        TextFrame::Block {
            text: text.into(),
            color,
            offset: (0, 0),
            style: TextStyle::Regular,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectStep {
    pub frame: TextFrame,
    pub finished: bool,
}

/// Colors the effects blend between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectColors {
    pub background: Color,
    pub foreground: Color,
    pub alert: Color,
    pub wave: Color,
}

impl From<&Palette> for EffectColors {
    fn from(p: &Palette) -> Self {
        Self {
            background: p.background,
            foreground: p.foreground,
            alert: p.alert,
            wave: p.wave,
        }
    }
}

pub trait TextEffect {
    /// Renders the current step and moves to the next one.
    fn tick(&mut self, layout: &TextLayout, rng: &mut StdRng) -> EffectStep;

    /// Final visual state, used when the effect is skipped.
    fn settled(&self) -> TextFrame;
}

pub fn build_effect(kind: EffectKind, text: &str, colors: EffectColors) -> Box<dyn TextEffect> {
    match kind {
        EffectKind::FadeIn => Box::new(FadeIn::new(text, colors)),
        EffectKind::Typewriter => Box::new(Typewriter::new(text, colors)),
        EffectKind::Shake => Box::new(Shake::new(text, colors)),
        EffectKind::Wave => Box::new(Wave::new(text, colors)),
    }
}

struct Running {
    kind: EffectKind,
    effect: Box<dyn TextEffect>,
    interval: Duration,
    pending: Option<TimerHandle>,
}

/// Runs at most one text effect at a time.
pub struct EffectEngine {
    colors: EffectColors,
    rng: StdRng,
    active: Option<Running>,
}

impl EffectEngine {
    pub fn new(colors: EffectColors, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { colors, rng, active: None }
    }

    /// Replaces any running effect, renders its first frame synchronously and
    /// schedules the next tick unless that first frame already finished it.
    pub fn start<T: Scheduler>(
        &mut self,
        text: &str,
        kind: EffectKind,
        speed_ms: u64,
        layout: &TextLayout,
        scheduler: &mut T,
    ) -> EffectStep {
        self.cancel(scheduler);

        let mut effect = build_effect(kind, text, self.colors);
        let step = effect.tick(layout, &mut self.rng);
        if !step.finished {
            let interval = Duration::from_millis(speed_ms.max(1));
            let pending = Some(scheduler.schedule(interval, TimerKind::Text));
            self.active = Some(Running { kind, effect, interval, pending });
        }
        log::debug!("Started {} effect ({} chars)", kind.name(), text.chars().count());
        step
    }

    /// Advances the running effect for a fired timer. Returns `None` for a
    /// stale handle or when nothing is running.
    pub fn tick<T: Scheduler>(
        &mut self,
        handle: TimerHandle,
        layout: &TextLayout,
        scheduler: &mut T,
    ) -> Option<EffectStep> {
        let running = self.active.as_mut()?;
        if running.pending != Some(handle) {
            log::debug!("Ignoring stale text tick {:?}", handle);
            return None;
        }
        running.pending = None;

        let step = running.effect.tick(layout, &mut self.rng);
        if step.finished {
            self.active = None;
        } else {
            running.pending = Some(scheduler.schedule(running.interval, TimerKind::Text));
        }
        Some(step)
    }

    /// Cancels the pending tick and returns the settled frame. `None` when no
    /// effect is running, so completion can only be reported once.
    pub fn skip<T: Scheduler>(&mut self, scheduler: &mut T) -> Option<TextFrame> {
        let running = self.active.take()?;
        if let Some(handle) = running.pending {
            scheduler.cancel(handle);
        }
        log::debug!("Skipped {} effect", running.kind.name());
        Some(running.effect.settled())
    }

    /// Drops the running effect without reporting completion.
    pub fn cancel<T: Scheduler>(&mut self, scheduler: &mut T) {
        if let Some(running) = self.active.take() {
            if let Some(handle) = running.pending {
                scheduler.cancel(handle);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn running_kind(&self) -> Option<EffectKind> {
        self.active.as_ref().map(|r| r.kind)
    }

    pub fn colors(&self) -> EffectColors {
        self.colors
    }

    /// Settled frame for text shown without animation.
    pub fn settled_frame(&self, text: &str, kind: EffectKind) -> TextFrame {
        build_effect(kind, text, self.colors).settled()
    }
}
