use rand::Rng;
use rand::rngs::StdRng;
use story_ui::Color;

use super::{EffectColors, EffectStep, TextEffect, TextFrame, TextLayout, TextStyle};

pub const FADE_STEPS: u32 = 14;
pub const JITTER_STEPS: u32 = 22;
const MAX_DX: i32 = 10;
const MAX_DY: i32 = 6;

/// Fades into the alert color, then jitters with a linearly decaying
/// amplitude and settles at the origin.
///
/// Ticks `0..14` are fade steps; the fade's last step never gets a frame of
/// its own because it hands straight over to jitter step 0. Ticks `14..36`
/// are jitter steps `0..22` and tick 36 is the settled frame.
pub struct Shake {
    text: String,
    colors: EffectColors,
    tick: u32,
}

impl Shake {
    pub fn new(text: &str, colors: EffectColors) -> Self {
        Self { text: text.to_string(), colors, tick: 0 }
    }

    fn frame(&self, color: Color, offset: (i32, i32)) -> TextFrame {
        TextFrame::Block {
            text: self.text.clone(),
            color,
            offset,
            style: TextStyle::Alert,
        }
    }
}

impl TextEffect for Shake {
    fn tick(&mut self, _layout: &TextLayout, rng: &mut StdRng) -> EffectStep {
        let n = self.tick;
        self.tick += 1;

        if n < FADE_STEPS {
            let t = n as f32 / FADE_STEPS as f32;
            let color = self.colors.background.lerp(self.colors.alert, t);
            return EffectStep { frame: self.frame(color, (0, 0)), finished: false };
        }

        let s = n - FADE_STEPS;
        if s >= JITTER_STEPS {
            return EffectStep { frame: self.settled(), finished: true };
        }

        let intensity = 1.0 - s as f32 / JITTER_STEPS as f32;
        let dx = (rng.gen_range(-MAX_DX..=MAX_DX) as f32 * intensity) as i32;
        let dy = (rng.gen_range(-MAX_DY..=MAX_DY) as f32 * intensity) as i32;
        EffectStep { frame: self.frame(self.colors.alert, (dx, dy)), finished: false }
    }

    fn settled(&self) -> TextFrame {
        self.frame(self.colors.alert, (0, 0))
    }
}
