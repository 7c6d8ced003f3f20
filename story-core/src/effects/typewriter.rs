use rand::rngs::StdRng;

use super::{EffectColors, EffectStep, TextEffect, TextFrame, TextLayout};

pub const CURSOR: char = '▌';

/// One more character per tick with a trailing cursor; `len + 1` ticks in
/// total, the last one drops the cursor.
pub struct Typewriter {
    chars: Vec<char>,
    colors: EffectColors,
    idx: usize,
}

impl Typewriter {
    pub fn new(text: &str, colors: EffectColors) -> Self {
        Self { chars: text.chars().collect(), colors, idx: 0 }
    }
}

impl TextEffect for Typewriter {
    fn tick(&mut self, _layout: &TextLayout, _rng: &mut StdRng) -> EffectStep {
        let len = self.chars.len();
        let shown = self.idx.min(len);
        let mut text: String = self.chars[..shown].iter().collect();
        if shown < len {
            text.push(CURSOR);
        }
        let finished = self.idx >= len;
        self.idx += 1;
        EffectStep { frame: TextFrame::block(text, self.colors.foreground), finished }
    }

    fn settled(&self) -> TextFrame {
        TextFrame::block(self.chars.iter().collect::<String>(), self.colors.foreground)
    }
}
