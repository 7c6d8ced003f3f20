pub mod geometry;
pub mod surface;
pub mod text;
pub mod types;

pub use geometry::CoverFit;
pub use surface::{Bitmap, DrawOp, Layer, RecordingSurface, Surface, SurfaceError, TextRun};
pub use text::{GlyphMetrics, wrap_lines};
pub use types::{Anchor, Color, Rect};
