use rand::rngs::StdRng;

use super::{EffectColors, EffectStep, TextEffect, TextFrame, TextLayout};

pub const STEPS: u32 = 40;

/// Text color ramps from the background to the foreground over 40 steps.
pub struct FadeIn {
    text: String,
    colors: EffectColors,
    step: u32,
}

impl FadeIn {
    pub fn new(text: &str, colors: EffectColors) -> Self {
        Self { text: text.to_string(), colors, step: 0 }
    }
}

impl TextEffect for FadeIn {
    fn tick(&mut self, _layout: &TextLayout, _rng: &mut StdRng) -> EffectStep {
        let t = (self.step as f32 / STEPS as f32).min(1.0);
        let color = self.colors.background.lerp(self.colors.foreground, t);
        let finished = self.step >= STEPS;
        self.step += 1;
        EffectStep { frame: TextFrame::block(self.text.clone(), color), finished }
    }

    fn settled(&self) -> TextFrame {
        TextFrame::block(self.text.clone(), self.colors.foreground)
    }
}
