use std::time::Duration;

use story_script::{ScriptGraph, Segment};
use story_ui::{Surface, SurfaceError};

use crate::assets::ImageCache;
use crate::background::BackgroundAnimator;
use crate::config::{Palette, PlayerConfig};
use crate::effects::{EffectColors, EffectEngine, TextFrame};
use crate::layout::Layout;
use crate::navigation::{NavCommand, Navigator, Phase, Progress};
use crate::overlay::ChoiceOverlay;
use crate::painter::Painter;
use crate::portrait::PortraitPanel;
use crate::scheduler::{Fired, ManualScheduler, Scheduler, TimerHandle, TimerKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Advance,
    Back,
    /// Zero-based choice index.
    Select(usize),
    Resize { width: u32, height: u32 },
    Escape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerSignal {
    None,
    /// Leave the player; every timer has been canceled.
    ExitToMenu,
}

/// Ties navigation, effects, background and overlay to one surface and one
/// scheduler. All entry points run to completion; timers only fire between
/// them.
pub struct Player<S: Surface, T: Scheduler> {
    surface: S,
    scheduler: T,
    config: PlayerConfig,
    viewport: (u32, u32),

    nav: Navigator,
    effects: EffectEngine,
    background: BackgroundAnimator,
    overlay: ChoiceOverlay,
    portrait: PortraitPanel,
    cache: ImageCache,
    painter: Painter,

    bg_timer: Option<TimerHandle>,
    dropped_frames: usize,
}

impl<S: Surface, T: Scheduler> Player<S, T> {
    pub fn new(graph: ScriptGraph, surface: S, scheduler: T, config: PlayerConfig) -> Self {
        let palette = Palette::from_theme(&config.theme);
        let viewport = surface.size();
        let seed = config.rng_seed;

        Self {
            viewport,
            nav: Navigator::new(graph),
            effects: EffectEngine::new(EffectColors::from(&palette), seed),
            background: BackgroundAnimator::new(palette.background, config.timing.clone(), seed),
            overlay: ChoiceOverlay::new(config.timing.overlay_step, config.timing.overlay_tick_ms),
            portrait: PortraitPanel::new(config.default_portrait.clone()),
            cache: ImageCache::new(&config.project_root),
            painter: Painter::new(palette, &config.layout),
            bg_timer: None,
            dropped_frames: 0,
            surface,
            scheduler,
            config,
        }
    }

    pub fn start(&mut self) {
        log::info!(
            "Starting '{}' at segment '{}'",
            self.nav.graph().title(),
            self.nav.graph().start_id()
        );
        let command = self.nav.start();
        self.apply(command);
    }

    pub fn handle_event(&mut self, event: HostEvent) -> PlayerSignal {
        match event {
            HostEvent::Advance => self.on_advance(),
            HostEvent::Back => self.on_back(),
            HostEvent::Select(index) => self.on_select(index),
            HostEvent::Resize { width, height } => self.on_resize(width, height),
            HostEvent::Escape => {
                self.cancel_all();
                log::info!("Leaving player");
                return PlayerSignal::ExitToMenu;
            }
        }
        PlayerSignal::None
    }

    pub fn on_timer(&mut self, fired: Fired) {
        match fired.kind {
            TimerKind::Text => {
                let layout = self.layout().text_layout(self.painter.metrics());
                let Some(step) = self.effects.tick(fired.handle, &layout, &mut self.scheduler) else {
                    return;
                };
                self.draw_text_frame(&step.frame);
                if step.finished {
                    self.on_effect_complete();
                }
            }
            TimerKind::Background => {
                if self.bg_timer != Some(fired.handle) {
                    log::debug!("Ignoring stale background tick {:?}", fired.handle);
                    return;
                }
                self.bg_timer = None;
                self.refresh_background();
                self.ensure_background_loop();
            }
            TimerKind::Overlay => {
                if self.overlay.on_tick(fired.handle, &mut self.scheduler) {
                    self.draw_choices();
                }
            }
        }
    }

    fn on_advance(&mut self) {
        if self.effects.is_running() {
            self.skip_effect();
            if !self.config.skip_then_advance {
                return;
            }
        }
        match self.nav.advance() {
            Ok(command) => self.apply(command),
            Err(e) => log::debug!("Advance ignored: {}", e),
        }
    }

    fn on_back(&mut self) {
        if self.effects.is_running() {
            log::debug!("Back ignored: effect still running");
            return;
        }
        match self.nav.back() {
            Ok(command) => self.apply(command),
            Err(e) => log::debug!("Back ignored: {}", e),
        }
    }

    fn on_select(&mut self, index: usize) {
        if self.effects.is_running() || !self.overlay.is_visible() {
            log::debug!("Select({}) ignored: no choices on screen", index);
            return;
        }
        match self.nav.select(index) {
            Ok(command) => self.apply(command),
            Err(e) => log::debug!("Select ignored: {}", e),
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        log::debug!("Resize {}x{}", width, height);
        self.viewport = (width, height);
        self.background.on_resize(&mut self.cache);
        self.refresh_background();
        self.draw_portrait();

        if !self.effects.is_running() {
            self.redraw_static();
            self.ensure_background_loop();
        }
        if self.overlay.is_visible() || self.overlay.is_on_screen() {
            self.draw_choices();
        }
    }

    fn apply(&mut self, command: NavCommand) {
        match command {
            NavCommand::Render(_) => self.render_segment(true),
            NavCommand::RenderStatic(_) => self.render_segment(false),
            NavCommand::Ending => self.show_ending(),
        }
    }

    fn render_segment(&mut self, animate: bool) {
        let Some(segment) = self.nav.current_segment().cloned() else {
            self.show_ending();
            return;
        };
        log::debug!("Render '{}' ({}, animate={})", segment.id, segment.effect.name(), animate);

        self.overlay.hide(false, &mut self.scheduler);
        self.draw_choices();

        let now = self.scheduler.now();
        self.background.configure(segment.background.as_ref(), now, animate, &mut self.cache);
        self.refresh_background();
        self.ensure_background_loop();

        self.portrait.update(&segment, &self.cache);
        self.draw_portrait();

        let layout = self.layout();
        let result = self.painter.paint_text_backdrop(&mut self.surface, &layout);
        self.report(result, "text backdrop");
        let result = self.painter.clear_text(&mut self.surface);
        self.report(result, "text");

        if animate {
            let text_layout = layout.text_layout(self.painter.metrics());
            let step = self.effects.start(
                &segment.text,
                segment.effect,
                segment.speed_ms,
                &text_layout,
                &mut self.scheduler,
            );
            self.draw_text_frame(&step.frame);
            if step.finished {
                self.on_effect_complete();
            }
        } else {
            self.effects.cancel(&mut self.scheduler);
            let frame = self.effects.settled_frame(&segment.text, segment.effect);
            self.draw_text_frame(&frame);
            if self.nav.phase() == Phase::AwaitingChoice {
                self.overlay.show_immediately(&choice_labels(&segment), &mut self.scheduler);
                self.draw_choices();
            }
        }
    }

    /// Settles the running effect with the current layout and completes it.
    fn skip_effect(&mut self) {
        if let Some(frame) = self.effects.skip(&mut self.scheduler) {
            self.draw_text_frame(&frame);
            self.on_effect_complete();
        }
    }

    fn on_effect_complete(&mut self) {
        let phase = self.nav.effect_finished();
        self.ensure_background_loop();
        if phase == Phase::AwaitingChoice {
            if let Some(segment) = self.nav.current_segment() {
                let labels = choice_labels(segment);
                self.overlay.show(&labels, &mut self.scheduler);
                self.draw_choices();
            }
        }
    }

    fn show_ending(&mut self) {
        log::info!("Reached the ending of '{}'", self.nav.graph().title());
        self.effects.cancel(&mut self.scheduler);
        self.overlay.hide(false, &mut self.scheduler);
        self.draw_choices();
        self.refresh_background();
        self.ensure_background_loop();

        let layout = self.layout();
        let result = self.painter.paint_text_backdrop(&mut self.surface, &layout);
        self.report(result, "text backdrop");
        let result = self.painter.paint_ending(&mut self.surface, &layout);
        self.report(result, "ending card");
    }

    fn redraw_static(&mut self) {
        let layout = self.layout();
        let result = self.painter.paint_text_backdrop(&mut self.surface, &layout);
        self.report(result, "text backdrop");

        if self.nav.is_at_ending() {
            let result = self.painter.paint_ending(&mut self.surface, &layout);
            self.report(result, "ending card");
            return;
        }
        let Some(segment) = self.nav.current_segment() else {
            let result = self.painter.clear_text(&mut self.surface);
            self.report(result, "text");
            return;
        };
        let frame = self.effects.settled_frame(&segment.text, segment.effect);
        let result = self.painter.clear_text(&mut self.surface);
        self.report(result, "text");
        self.draw_text_frame(&frame);
    }

    fn ensure_background_loop(&mut self) {
        if self.bg_timer.is_some() || !self.background.has_active_animation() {
            return;
        }
        let interval = Duration::from_millis(self.config.timing.background_tick_ms.max(1));
        self.bg_timer = Some(self.scheduler.schedule(interval, TimerKind::Background));
    }

    fn refresh_background(&mut self) {
        let layout = self.layout();
        let (w, h) = layout.stage.pixel_size();
        let now = self.scheduler.now();
        if let Some(frame) = self.background.refresh(now, w, h, &mut self.cache) {
            let result = self.painter.paint_background(&mut self.surface, &frame, layout.stage);
            if self.report(result, "background").is_none() {
                // 丢帧后下次必须重画
                self.background.invalidate();
            }
        }
    }

    fn draw_text_frame(&mut self, frame: &TextFrame) {
        let layout = self.layout();
        let result = self.painter.paint_text(&mut self.surface, frame, &layout);
        self.report(result, "text");
    }

    fn draw_choices(&mut self) {
        let layout = self.layout();
        let result = self.painter.paint_choices(&mut self.surface, &self.overlay, &layout);
        self.report(result, "choices");
    }

    fn draw_portrait(&mut self) {
        let layout = self.layout();
        let Some(frame) = layout.portrait_frame() else {
            let result = self.surface.clear(story_ui::Layer::Portrait);
            self.report(result, "portrait");
            return;
        };
        let (w, h) = frame.pixel_size();
        let view = self.portrait.view(w, h, &mut self.cache);
        let result = self.painter.paint_portrait(&mut self.surface, &view, &layout);
        self.report(result, "portrait");
    }

    fn cancel_all(&mut self) {
        self.effects.cancel(&mut self.scheduler);
        self.overlay.cancel(&mut self.scheduler);
        if let Some(handle) = self.bg_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Surface failures drop the frame; navigation carries on.
    fn report(&mut self, result: Result<(), SurfaceError>, what: &str) -> Option<()> {
        match result {
            Ok(()) => Some(()),
            Err(e) => {
                self.dropped_frames += 1;
                log::warn!("Dropped {} frame: {}", what, e);
                None
            }
        }
    }

    pub fn layout(&self) -> Layout {
        Layout::compute(self.viewport.0, self.viewport.1, &self.config.layout)
    }

    pub fn phase(&self) -> Phase {
        self.nav.phase()
    }

    pub fn current_id(&self) -> &str {
        self.nav.current_id()
    }

    pub fn progress(&self) -> Progress {
        self.nav.progress()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn overlay(&self) -> &ChoiceOverlay {
        &self.overlay
    }

    pub fn background(&self) -> &BackgroundAnimator {
        &self.background
    }

    pub fn is_animating(&self) -> bool {
        self.effects.is_running()
    }

    pub fn is_background_looping(&self) -> bool {
        self.bg_timer.is_some()
    }

    pub fn dropped_frames(&self) -> usize {
        self.dropped_frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }
}

impl<S: Surface> Player<S, ManualScheduler> {
    /// Moves the virtual clock forward by `by`, firing every timer that comes
    /// due on the way (including ones scheduled by earlier callbacks).
    /// Returns how many fired.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut fired = 0;
        while let Some(timer) = self.scheduler.pop_due(until) {
            self.on_timer(timer);
            fired += 1;
        }
        self.scheduler.set_now(until);
        fired
    }

    /// Runs timers until the text effect is done or `limit` of virtual time
    /// has passed.
    pub fn finish_effect(&mut self, limit: Duration) {
        let until = self.scheduler.now() + limit;
        while self.effects.is_running() {
            let Some(timer) = self.scheduler.pop_due(until) else { break };
            self.on_timer(timer);
        }
    }
}

fn choice_labels(segment: &Segment) -> Vec<String> {
    segment.choices.iter().map(|c| c.label.clone()).collect()
}
