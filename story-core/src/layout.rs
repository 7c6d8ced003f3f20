use story_ui::{GlyphMetrics, Rect};

use crate::config::LayoutConfig;
use crate::effects::TextLayout;

const MIN_PANEL: f32 = 60.0;
const PORTRAIT_INSET: f32 = 14.0;
const PORTRAIT_HEADER: f32 = 40.0;

/// Regions of the surface, recomputed from its size on every draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub surface: Rect,
    /// Surface minus the portrait column; background and text live here.
    pub stage: Rect,
    pub portrait: Option<Rect>,
    pub text_panel: Rect,
    pub text_origin: (f32, f32),
    pub text_width: f32,
}

impl Layout {
    pub fn compute(width: u32, height: u32, cfg: &LayoutConfig) -> Self {
        let surface = Rect::new(0.0, 0.0, width as f32, height as f32);

        // 人物栏最多占一半宽度，窄屏时不至于把舞台挤没
        let column = cfg.portrait_width.min(surface.w / 2.0).max(0.0);
        let (portrait, stage) = if column > 0.0 {
            let (right, rest) = surface.split_right(column);
            (Some(right), rest)
        } else {
            (None, surface)
        };

        let left = stage.x + cfg.panel_margin_x;
        let top = stage.y + cfg.panel_margin_top;
        let right = (left + MIN_PANEL).max(stage.right() - cfg.panel_margin_x);
        let bottom = (top + MIN_PANEL).max(stage.bottom() - cfg.panel_margin_bottom);
        let text_panel = Rect::from_edges(left, top, right, bottom);

        let text_width = (stage.w - cfg.panel_margin_x * 2.0 - cfg.panel_padding_x * 2.0)
            .max(cfg.min_text_width);

        Self {
            surface,
            stage,
            portrait,
            text_panel,
            text_origin: (left + cfg.panel_padding_x, top + cfg.panel_padding_y),
            text_width,
        }
    }

    pub fn text_layout(&self, metrics: GlyphMetrics) -> TextLayout {
        TextLayout {
            origin: self.text_origin,
            wrap_width: self.text_width,
            metrics,
        }
    }

    /// Frame inside the portrait column reserved for the picture.
    pub fn portrait_frame(&self) -> Option<Rect> {
        let column = self.portrait?;
        // 顶部留给说话人，再四周内缩
        let (_, body) = column.split_top(PORTRAIT_HEADER - PORTRAIT_INSET);
        let frame = body.shrink(PORTRAIT_INSET);
        (frame.w >= 1.0 && frame.h >= 1.0).then_some(frame)
    }

    pub fn speaker_origin(&self) -> Option<(f32, f32)> {
        self.portrait.map(|c| (c.x + PORTRAIT_INSET, c.y + 12.0))
    }
}
