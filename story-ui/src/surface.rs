use std::collections::HashMap;

use crate::types::{Anchor, Color, Rect};

pub type Bitmap = image::RgbImage;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("surface is no longer valid")]
    Invalid,
    #[error("surface backend error: {0}")]
    Backend(String),
}

/// 绘制层，从下到上
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Portrait,
    TextBackdrop,
    Text,
    Overlay,
    ChoiceBackdrop,
    ChoicePanel,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Background,
        Layer::Portrait,
        Layer::TextBackdrop,
        Layer::Text,
        Layer::Overlay,
        Layer::ChoiceBackdrop,
        Layer::ChoicePanel,
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub size: f32,
    pub bold: bool,
    pub wrap_width: Option<f32>,
    pub anchor: Anchor,
}

impl TextRun {
    pub fn new(text: impl Into<String>, x: f32, y: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            color,
            size: 16.0,
            bold: false,
            wrap_width: None,
            anchor: Anchor::TopLeft,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn wrap(mut self, width: f32) -> Self {
        self.wrap_width = Some(width);
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Host-provided drawing target. Every layer is an independent display list;
/// the host composites them in [`Layer`] order.
pub trait Surface {
    /// 当前像素尺寸
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, layer: Layer) -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, layer: Layer, rect: Rect, color: Color) -> Result<(), SurfaceError>;

    /// Draws `bitmap` with its top-left corner at `(x, y)`.
    fn blit(&mut self, layer: Layer, bitmap: &Bitmap, x: i32, y: i32) -> Result<(), SurfaceError>;

    fn draw_text(&mut self, layer: Layer, run: &TextRun) -> Result<(), SurfaceError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill { rect: Rect, color: Color },
    Blit { x: i32, y: i32, width: u32, height: u32, center: [u8; 3] },
    Text(TextRun),
}

/// Display-list surface: keeps the ops of every layer so a host (or a test)
/// can inspect exactly what the player drew.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    layers: HashMap<Layer, Vec<DrawOp>>,
    valid: bool,
    rejected: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, layers: HashMap::new(), valid: true, rejected: 0 }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// 模拟宿主销毁了画布：之后的所有操作都会失败
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn restore(&mut self) {
        self.valid = true;
    }

    pub fn rejected_ops(&self) -> usize {
        self.rejected
    }

    pub fn ops(&self, layer: Layer) -> &[DrawOp] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn texts(&self, layer: Layer) -> Vec<&TextRun> {
        self.ops(layer)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(run) => Some(run),
                _ => None,
            })
            .collect()
    }

    /// Concatenated text of a layer, one run per line.
    pub fn text_content(&self, layer: Layer) -> String {
        self.texts(layer)
            .iter()
            .map(|run| run.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn check(&mut self) -> Result<(), SurfaceError> {
        if self.valid {
            Ok(())
        } else {
            self.rejected += 1;
            Err(SurfaceError::Invalid)
        }
    }

    fn push(&mut self, layer: Layer, op: DrawOp) -> Result<(), SurfaceError> {
        self.check()?;
        self.layers.entry(layer).or_default().push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, layer: Layer) -> Result<(), SurfaceError> {
        self.check()?;
        self.layers.remove(&layer);
        Ok(())
    }

    fn fill_rect(&mut self, layer: Layer, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        self.push(layer, DrawOp::Fill { rect, color })
    }

    fn blit(&mut self, layer: Layer, bitmap: &Bitmap, x: i32, y: i32) -> Result<(), SurfaceError> {
        let (width, height) = bitmap.dimensions();
        let center = if width > 0 && height > 0 {
            bitmap.get_pixel(width / 2, height / 2).0
        } else {
            [0, 0, 0]
        };
        self.push(layer, DrawOp::Blit { x, y, width, height, center })
    }

    fn draw_text(&mut self, layer: Layer, run: &TextRun) -> Result<(), SurfaceError> {
        self.push(layer, DrawOp::Text(run.clone()))
    }
}
