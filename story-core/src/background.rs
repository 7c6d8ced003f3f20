use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use story_script::BackgroundSpec;
use story_ui::{Bitmap, Color};

use crate::assets::{ImageCache, crossfade};
use crate::config::TimingConfig;

const MIN_FADE: Duration = Duration::from_millis(100);
const MIN_SHAKE: Duration = Duration::from_millis(80);
const MAX_TIMELINE: Duration = Duration::from_secs(3600);

#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundFrame {
    Solid(Color),
    Image { bitmap: Arc<Bitmap>, offset: (i32, i32) },
}

#[derive(Clone, Copy, Debug)]
struct Fade {
    start: Duration,
    duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Jitter {
    start: Duration,
    duration: Duration,
    strength: i64,
}

/// Everything that makes two composed frames differ. Equal keys mean the
/// previous draw is still on screen and can be kept.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RenderKey {
    current: Option<PathBuf>,
    previous: Option<PathBuf>,
    size: (u32, u32),
    fade_ms: i64,
    offset: (i32, i32),
}

/// Background image state with its fade and shake timelines. Both timelines
/// read elapsed time from the caller's clock, so their speed does not depend
/// on how often the host redraws.
pub struct BackgroundAnimator {
    color: Color,
    timing: TimingConfig,
    current: Option<PathBuf>,
    previous: Option<PathBuf>,
    fade: Option<Fade>,
    shake: Option<Jitter>,
    last_key: Option<RenderKey>,
    rng: StdRng,
}

impl BackgroundAnimator {
    pub fn new(color: Color, timing: TimingConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            color,
            timing,
            current: None,
            previous: None,
            fade: None,
            shake: None,
            last_key: None,
            rng,
        }
    }

    /// Applies a segment's background. `animate == false` switches images
    /// without fading and ignores the shake tag.
    pub fn configure(
        &mut self,
        spec: Option<&BackgroundSpec>,
        now: Duration,
        animate: bool,
        cache: &mut ImageCache,
    ) {
        let Some(spec) = spec else { return };

        let resolved = spec.image.as_deref().and_then(|p| {
            let resolved = cache.resolve(p);
            if resolved.is_none() {
                log::warn!("Background image not found: {}", p);
            }
            resolved
        });

        if let Some(path) = resolved {
            if self.current.as_ref() != Some(&path) {
                log::debug!("Background -> {:?}", path);
                let outgoing_previous = self.previous.take();
                let previous = self.current.replace(path);

                if animate && spec.wants_fade() && previous.is_some() {
                    let ms = spec.fade_ms.unwrap_or(self.timing.background_fade_ms);
                    self.previous = previous;
                    self.fade = Some(Fade { start: now, duration: duration_at_least(ms, MIN_FADE) });
                } else {
                    self.previous = None;
                    self.fade = None;
                    if let Some(old) = previous {
                        self.drop_unused(&old, cache);
                    }
                }
                if let Some(old) = outgoing_previous {
                    self.drop_unused(&old, cache);
                }
            }
        }

        if animate && spec.wants_shake() {
            let ms = spec.shake_ms.unwrap_or(self.timing.background_shake_ms);
            let strength = spec.shake_strength.unwrap_or(self.timing.background_shake_power);
            self.shake = Some(Jitter {
                start: now,
                duration: duration_at_least(ms, MIN_SHAKE),
                strength: strength.max(1),
            });
        }
    }

    /// Composes the frame for `now`. Finished timelines are dropped here.
    pub fn compose(&mut self, now: Duration, width: u32, height: u32, cache: &mut ImageCache) -> BackgroundFrame {
        self.compose_keyed(now, width, height, cache).0
    }

    /// Like [`compose`](Self::compose) but returns `None` when the result
    /// would be identical to the last frame handed out.
    pub fn refresh(
        &mut self,
        now: Duration,
        width: u32,
        height: u32,
        cache: &mut ImageCache,
    ) -> Option<BackgroundFrame> {
        let (frame, key) = self.compose_keyed(now, width, height, cache);
        if self.last_key.as_ref() == Some(&key) {
            return None;
        }
        self.last_key = Some(key);
        Some(frame)
    }

    /// Forces the next [`refresh`](Self::refresh) to draw.
    pub fn invalidate(&mut self) {
        self.last_key = None;
    }

    pub fn on_resize(&mut self, cache: &mut ImageCache) {
        cache.clear_resized();
        self.last_key = None;
    }

    pub fn has_active_animation(&self) -> bool {
        self.fade.is_some() || self.shake.is_some()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn previous_image(&self) -> Option<&Path> {
        self.previous.as_deref()
    }

    fn compose_keyed(
        &mut self,
        now: Duration,
        width: u32,
        height: u32,
        cache: &mut ImageCache,
    ) -> (BackgroundFrame, RenderKey) {
        let width = width.max(1);
        let height = height.max(1);

        let target = self
            .current
            .clone()
            .and_then(|path| cache.get_resized(&path, width, height));
        let Some(target) = target else {
            // 没有图也要让计时线走完，否则重绘循环停不下来
            self.end_fade(cache);
            self.shake_offset(now);
            let key = RenderKey {
                current: None,
                previous: None,
                size: (width, height),
                fade_ms: -1,
                offset: (0, 0),
            };
            return (BackgroundFrame::Solid(self.color), key);
        };

        let mut bitmap = target.clone();
        let mut fade_ms = -1;
        if let Some(fade) = self.fade {
            let prev = self
                .previous
                .clone()
                .and_then(|path| cache.get_resized(&path, width, height));
            match prev {
                Some(prev) => {
                    let elapsed = now.saturating_sub(fade.start);
                    let t = (elapsed.as_secs_f64() / fade.duration.as_secs_f64()).clamp(0.0, 1.0);
                    match crossfade(&prev, &target, t as f32) {
                        Ok(blend) => bitmap = Arc::new(blend),
                        Err(e) => log::warn!("Background cross-fade failed: {}", e),
                    }
                    if t >= 1.0 {
                        self.end_fade(cache);
                    } else {
                        fade_ms = elapsed.as_millis() as i64;
                    }
                }
                None => self.end_fade(cache),
            }
        }

        let offset = self.shake_offset(now);
        let key = RenderKey {
            current: self.current.clone(),
            previous: self.previous.clone(),
            size: (width, height),
            fade_ms,
            offset,
        };
        (BackgroundFrame::Image { bitmap, offset }, key)
    }

    fn end_fade(&mut self, cache: &mut ImageCache) {
        self.fade = None;
        if let Some(old) = self.previous.take() {
            self.drop_unused(&old, cache);
        }
    }

    /// Drops the resized copies of a background that left the screen. Other
    /// owners' entries in the shared cache stay.
    fn drop_unused(&self, path: &Path, cache: &mut ImageCache) {
        if self.current.as_deref() != Some(path) && self.previous.as_deref() != Some(path) {
            cache.drop_resized(path);
        }
    }

    fn shake_offset(&mut self, now: Duration) -> (i32, i32) {
        let Some(shake) = self.shake else { return (0, 0) };
        let elapsed = now.saturating_sub(shake.start);
        if elapsed >= shake.duration {
            self.shake = None;
            return (0, 0);
        }
        let ratio = 1.0 - elapsed.as_secs_f64() / shake.duration.as_secs_f64();
        let k = ((shake.strength as f64 * ratio) as i32).max(1);
        (self.rng.gen_range(-k..=k), self.rng.gen_range(-k..=k))
    }
}

fn duration_at_least(ms: f64, floor: Duration) -> Duration {
    let secs = if ms.is_finite() { ms / 1000.0 } else { 0.0 };
    Duration::try_from_secs_f64(secs.max(0.0))
        .unwrap_or(MAX_TIMELINE)
        .clamp(floor, MAX_TIMELINE)
}
