use std::time::Duration;

use story_ui::Rect;

use crate::scheduler::{Scheduler, TimerHandle, TimerKind};

pub const HIDDEN_Y: i32 = 18;
pub const BASE_Y: i32 = -12;
pub const ROW_HEIGHT: f32 = 46.0;
const PANEL_PAD: f32 = 14.0;
const MIN_HEIGHT: f32 = 72.0;
const MAX_HEIGHT: f32 = 220.0;
const EDGE: f32 = 14.0;
const BOTTOM_GAP: f32 = 8.0;

/// Backdrop translucency, quantized by opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Faint,
    Medium,
    Dense,
}

impl Band {
    pub fn from_opacity(opacity: f32) -> Self {
        if opacity < 0.34 {
            Band::Faint
        } else if opacity < 0.67 {
            Band::Medium
        } else {
            Band::Dense
        }
    }

    /// Alpha of the black backdrop (12%, 25%, 50% coverage).
    pub fn alpha(&self) -> u8 {
        match self {
            Band::Faint => 31,
            Band::Medium => 64,
            Band::Dense => 128,
        }
    }
}

/// Opacity and vertical-offset tween of the choice panel.
pub struct ChoiceOverlay {
    labels: Vec<String>,
    visible: bool,
    opacity: f32,
    current_y: i32,
    target: f32,
    step: f32,
    interval: Duration,
    pending: Option<TimerHandle>,
}

impl ChoiceOverlay {
    pub fn new(step: f32, tick_ms: u64) -> Self {
        Self {
            labels: Vec::new(),
            visible: false,
            opacity: 0.0,
            current_y: HIDDEN_Y,
            target: 0.0,
            step: if step > 0.0 { step } else { 0.22 },
            interval: Duration::from_millis(tick_ms.max(1)),
            pending: None,
        }
    }

    /// Restarts the tween from fully hidden. The first step is applied
    /// immediately.
    pub fn show<T: Scheduler>(&mut self, labels: &[String], scheduler: &mut T) {
        self.cancel(scheduler);
        self.labels = numbered(labels);
        self.visible = true;
        self.opacity = 0.0;
        self.current_y = HIDDEN_Y;
        self.animate(1.0, scheduler);
    }

    pub fn show_immediately<T: Scheduler>(&mut self, labels: &[String], scheduler: &mut T) {
        self.cancel(scheduler);
        self.labels = numbered(labels);
        self.visible = true;
        self.target = 1.0;
        self.set_opacity(1.0);
    }

    /// `animate == false` resets at once. An animated hide reverses from the
    /// current opacity and is a no-op when nothing is on screen.
    pub fn hide<T: Scheduler>(&mut self, animate: bool, scheduler: &mut T) {
        if !animate {
            self.cancel(scheduler);
            self.reset();
            return;
        }
        if self.labels.is_empty() && self.opacity <= 0.0 {
            self.visible = false;
            return;
        }
        self.visible = false;
        self.animate(0.0, scheduler);
    }

    /// Applies one tween step for a fired overlay timer. Returns `false` for a
    /// stale handle.
    pub fn on_tick<T: Scheduler>(&mut self, handle: TimerHandle, scheduler: &mut T) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        self.step_once(scheduler);
        true
    }

    pub fn cancel<T: Scheduler>(&mut self, scheduler: &mut T) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Accepting selections.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Anything to draw.
    pub fn is_on_screen(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn current_y(&self) -> i32 {
        self.current_y
    }

    pub fn band(&self) -> Option<Band> {
        (self.opacity > 0.0).then(|| Band::from_opacity(self.opacity))
    }

    /// Panel height for the current rows.
    pub fn panel_height(&self) -> f32 {
        (self.labels.len() as f32 * ROW_HEIGHT + PANEL_PAD).clamp(MIN_HEIGHT, MAX_HEIGHT)
    }

    /// Backdrop rectangle anchored at the bottom of `stage`, shifted by the
    /// tween offset. `None` while fully transparent.
    pub fn backdrop_rect(&self, stage: Rect) -> Option<Rect> {
        if self.opacity <= 0.0 {
            return None;
        }
        let left = stage.x + EDGE;
        let right = (left + 40.0).max(stage.right() - EDGE);
        let bottom = stage.bottom() - BOTTOM_GAP + (self.current_y - BASE_Y) as f32;
        let top = (stage.y + BOTTOM_GAP).max(bottom - self.panel_height());
        Some(Rect::from_edges(left, top, right, bottom))
    }

    fn animate<T: Scheduler>(&mut self, target: f32, scheduler: &mut T) {
        self.cancel(scheduler);
        self.target = target;
        self.step_once(scheduler);
    }

    fn step_once<T: Scheduler>(&mut self, scheduler: &mut T) {
        let next = if self.target > self.opacity {
            (self.opacity + self.step).min(self.target)
        } else {
            (self.opacity - self.step).max(self.target)
        };
        self.set_opacity(next);

        if self.opacity != self.target {
            self.pending = Some(scheduler.schedule(self.interval, TimerKind::Overlay));
        } else if self.target <= 0.0 {
            self.labels.clear();
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        let span = (HIDDEN_Y - BASE_Y) as f32;
        self.current_y = (HIDDEN_Y as f32 - span * opacity) as i32;
    }

    fn reset(&mut self) {
        self.labels.clear();
        self.visible = false;
        self.opacity = 0.0;
        self.target = 0.0;
        self.current_y = HIDDEN_Y;
    }
}

fn numbered(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("[{}]  {}", i + 1, label))
        .collect()
}
