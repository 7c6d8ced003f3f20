use std::f32::consts::PI;

use rand::rngs::StdRng;
use story_ui::wrap_lines;

use super::{EffectColors, EffectStep, Glyph, TextEffect, TextFrame, TextLayout};

const STAGGER: u32 = 3;
const BOUNCE_FRAMES: f32 = 10.0;
const BOUNCE_HEIGHT: f32 = 14.0;
const TAIL_FRAMES: u32 = 30;

/// Characters pop in one after another, each with a half-sine bounce and its
/// own color ramp.
pub struct Wave {
    text: String,
    colors: EffectColors,
    total_frames: u32,
    frame: u32,
}

impl Wave {
    pub fn new(text: &str, colors: EffectColors) -> Self {
        let chars = text.chars().filter(|&ch| ch != '\n').count() as u32;
        Self {
            text: text.to_string(),
            colors,
            total_frames: chars * STAGGER + TAIL_FRAMES,
            frame: 0,
        }
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Glyphs for frame `frame`, wrapped at the given layout. Characters not
    /// yet due are left out.
    pub fn glyphs_at(&self, frame: u32, layout: &TextLayout) -> Vec<Glyph> {
        let (ox, oy) = layout.origin;
        let metrics = &layout.metrics;
        let mut glyphs = Vec::new();
        let mut char_idx: u32 = 0;

        for (li, line) in wrap_lines(&self.text, layout.wrap_width, metrics).iter().enumerate() {
            let mut x = ox;
            let base_y = oy + li as f32 * metrics.line_height;
            for ch in line.chars() {
                let appear = char_idx * STAGGER;
                if frame >= appear {
                    let p = ((frame - appear) as f32 / BOUNCE_FRAMES).min(1.0);
                    let bounce = ((p * PI).sin() * -BOUNCE_HEIGHT) as i32;
                    let color = self.colors.background.lerp(self.colors.wave, (p * 1.5).min(1.0));
                    glyphs.push(Glyph { ch, x, y: base_y + bounce as f32, color });
                }
                x += metrics.char_width(ch);
                char_idx += 1;
            }
        }
        glyphs
    }
}

impl TextEffect for Wave {
    fn tick(&mut self, layout: &TextLayout, _rng: &mut StdRng) -> EffectStep {
        let frame = self.frame;
        self.frame += 1;
        EffectStep {
            frame: TextFrame::Glyphs(self.glyphs_at(frame, layout)),
            finished: frame >= self.total_frames,
        }
    }

    fn settled(&self) -> TextFrame {
        TextFrame::block(self.text.clone(), self.colors.wave)
    }
}
