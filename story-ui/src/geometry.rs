/// Scale-then-center-crop parameters that make a `src` image exactly fill a
/// `target` rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    pub scaled_w: u32,
    pub scaled_h: u32,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CoverFit {
    /// `None` for a degenerate source (zero width or height); callers stretch
    /// instead.
    pub fn compute(src_w: u32, src_h: u32, width: u32, height: u32) -> Option<Self> {
        if src_w == 0 || src_h == 0 {
            return None;
        }
        let scale = (width as f64 / src_w as f64).max(height as f64 / src_h as f64);

        // 浮点误差可能让 src*scale 比目标少 1px，下限钳到目标尺寸保证裁剪不越界
        let scaled_w = ((src_w as f64 * scale).floor() as u32).max(width).max(1);
        let scaled_h = ((src_h as f64 * scale).floor() as u32).max(height).max(1);

        Some(Self {
            scale,
            scaled_w,
            scaled_h,
            left: (scaled_w - width) / 2,
            top: (scaled_h - height) / 2,
            width,
            height,
        })
    }
}
