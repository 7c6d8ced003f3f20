use story_ui::{Anchor, Color, GlyphMetrics, Layer, Rect, Surface, SurfaceError, TextRun, wrap_lines};

use crate::background::BackgroundFrame;
use crate::config::{LayoutConfig, Palette};
use crate::effects::{TextFrame, TextStyle};
use crate::layout::Layout;
use crate::overlay::{ChoiceOverlay, ROW_HEIGHT};
use crate::portrait::{PLACEHOLDER, PortraitView};

pub const ENDING_TITLE: &str = "— The End —";
pub const ENDING_SUBTITLE: &str = "Thanks for reading";

type PaintResult = Result<(), SurfaceError>;

/// Turns player state into draw calls, one layer at a time. Every method
/// clears the layer it owns first.
pub struct Painter {
    palette: Palette,
    metrics: GlyphMetrics,
    font_size: f32,
    alert_font_size: f32,
}

impl Painter {
    pub fn new(palette: Palette, layout: &LayoutConfig) -> Self {
        Self {
            palette,
            metrics: GlyphMetrics::new(layout.glyph_unit_width, layout.line_height),
            font_size: layout.font_size,
            alert_font_size: layout.alert_font_size,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn metrics(&self) -> GlyphMetrics {
        self.metrics
    }

    pub fn paint_background(&self, surface: &mut impl Surface, frame: &BackgroundFrame, stage: Rect) -> PaintResult {
        surface.clear(Layer::Background)?;
        match frame {
            BackgroundFrame::Solid(color) => surface.fill_rect(Layer::Background, stage, *color),
            BackgroundFrame::Image { bitmap, offset } => {
                let x = (stage.x as i32).saturating_add(offset.0);
                let y = (stage.y as i32).saturating_add(offset.1);
                surface.blit(Layer::Background, bitmap, x, y)
            }
        }
    }

    pub fn paint_text_backdrop(&self, surface: &mut impl Surface, layout: &Layout) -> PaintResult {
        surface.clear(Layer::TextBackdrop)?;
        surface.fill_rect(Layer::TextBackdrop, layout.text_panel, self.palette.background)
    }

    /// Block frames are wrapped at the layout's current width, so a settled
    /// frame always matches the surface it lands on.
    pub fn paint_text(&self, surface: &mut impl Surface, frame: &TextFrame, layout: &Layout) -> PaintResult {
        surface.clear(Layer::Text)?;
        let (ox, oy) = layout.text_origin;

        match frame {
            TextFrame::Block { text, color, offset, style } => {
                let (size, bold) = match style {
                    TextStyle::Regular => (self.font_size, false),
                    TextStyle::Alert => (self.alert_font_size, true),
                };
                let x = ox + offset.0 as f32;
                let y = oy + offset.1 as f32;
                for (i, line) in wrap_lines(text, layout.text_width, &self.metrics).into_iter().enumerate() {
                    let run = TextRun::new(line, x, y + i as f32 * self.metrics.line_height, *color)
                        .size(size)
                        .bold(bold)
                        .wrap(layout.text_width);
                    surface.draw_text(Layer::Text, &run)?;
                }
            }
            TextFrame::Glyphs(glyphs) => {
                for g in glyphs {
                    let run = TextRun::new(g.ch.to_string(), g.x, g.y, g.color).size(self.font_size);
                    surface.draw_text(Layer::Text, &run)?;
                }
            }
        }
        Ok(())
    }

    pub fn clear_text(&self, surface: &mut impl Surface) -> PaintResult {
        surface.clear(Layer::Text)?;
        surface.clear(Layer::Overlay)
    }

    pub fn paint_ending(&self, surface: &mut impl Surface, layout: &Layout) -> PaintResult {
        self.clear_text(surface)?;
        let (cx, cy) = layout.stage.center_point();
        let title = TextRun::new(ENDING_TITLE, cx, cy - 28.0, self.palette.ending)
            .size(26.0)
            .bold(true)
            .anchor(Anchor::Center);
        let subtitle = TextRun::new(ENDING_SUBTITLE, cx, cy + 28.0, self.palette.dim)
            .size(12.0)
            .anchor(Anchor::Center);
        surface.draw_text(Layer::Overlay, &title)?;
        surface.draw_text(Layer::Overlay, &subtitle)
    }

    pub fn paint_choices(&self, surface: &mut impl Surface, overlay: &ChoiceOverlay, layout: &Layout) -> PaintResult {
        surface.clear(Layer::ChoiceBackdrop)?;
        surface.clear(Layer::ChoicePanel)?;
        let (Some(rect), Some(band)) = (overlay.backdrop_rect(layout.stage), overlay.band()) else {
            return Ok(());
        };
        surface.fill_rect(Layer::ChoiceBackdrop, rect, Color::BLACK.with_alpha(band.alpha()))?;

        let alpha = (overlay.opacity().clamp(0.0, 1.0) * 255.0) as u8;
        for (i, label) in overlay.labels().iter().enumerate() {
            let row = Rect::new(rect.x + 8.0, rect.y + 7.0 + i as f32 * ROW_HEIGHT, rect.w - 16.0, ROW_HEIGHT - 8.0);
            if row.bottom() > rect.bottom() {
                break;
            }
            surface.fill_rect(Layer::ChoicePanel, row, self.palette.card.with_alpha(alpha))?;
            let run = TextRun::new(label.clone(), row.x + 12.0, row.y + 10.0, self.palette.foreground.with_alpha(alpha))
                .size(self.font_size)
                .wrap(row.w - 24.0);
            surface.draw_text(Layer::ChoicePanel, &run)?;
        }
        Ok(())
    }

    pub fn paint_portrait(&self, surface: &mut impl Surface, view: &PortraitView, layout: &Layout) -> PaintResult {
        surface.clear(Layer::Portrait)?;
        let Some(column) = layout.portrait else { return Ok(()) };
        surface.fill_rect(Layer::Portrait, column, self.palette.card)?;

        if let Some((x, y)) = layout.speaker_origin() {
            let run = TextRun::new(view.speaker_label.clone(), x, y, self.palette.hint)
                .size(12.0)
                .wrap(column.w - 28.0);
            surface.draw_text(Layer::Portrait, &run)?;
        }

        let Some(frame) = layout.portrait_frame() else { return Ok(()) };
        match &view.image {
            Some(bitmap) => surface.blit(Layer::Portrait, bitmap, frame.x as i32, frame.y as i32),
            None => {
                let (cx, cy) = frame.center_point();
                let run = TextRun::new(PLACEHOLDER, cx, cy, self.palette.dim)
                    .size(12.0)
                    .anchor(Anchor::Center);
                surface.draw_text(Layer::Portrait, &run)
            }
        }
    }
}
