use image::imageops::{self, FilterType};
use story_ui::{Bitmap, CoverFit};

use crate::error::AssetError;

/// Scales `source` uniformly until it covers `width x height`, then crops the
/// center. The result is always exactly `width x height`.
pub fn cover_fit(source: &Bitmap, width: u32, height: u32) -> Bitmap {
    if width == 0 || height == 0 {
        return Bitmap::new(width, height);
    }
    let (src_w, src_h) = source.dimensions();
    let Some(fit) = CoverFit::compute(src_w, src_h, width, height) else {
        // 空图没有可采样的像素，直接给目标尺寸的底图
        return Bitmap::new(width, height);
    };

    if (fit.scaled_w, fit.scaled_h) == (src_w, src_h) && (fit.left, fit.top) == (0, 0) {
        return imageops::crop_imm(source, 0, 0, width, height).to_image();
    }

    let scaled = imageops::resize(source, fit.scaled_w, fit.scaled_h, FilterType::Lanczos3);
    imageops::crop_imm(&scaled, fit.left, fit.top, width, height).to_image()
}

/// Per-pixel linear blend from `prev` to `target`. `t` is clamped to [0, 1];
/// `t = 0` reproduces `prev` and `t = 1` reproduces `target` exactly.
pub fn crossfade(prev: &Bitmap, target: &Bitmap, t: f32) -> Result<Bitmap, AssetError> {
    if prev.dimensions() != target.dimensions() {
        return Err(AssetError::SizeMismatch {
            left: prev.dimensions(),
            right: target.dimensions(),
        });
    }
    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 {
        return Ok(prev.clone());
    }
    if t >= 1.0 {
        return Ok(target.clone());
    }

    let (w, h) = prev.dimensions();
    let mut out = Vec::with_capacity(prev.as_raw().len());
    for (a, b) in prev.as_raw().iter().zip(target.as_raw().iter()) {
        let a = f32::from(*a);
        let b = f32::from(*b);
        out.push((a + (b - a) * t).round().clamp(0.0, 255.0) as u8);
    }
    // 尺寸一致，缓冲区长度必然匹配
    Ok(Bitmap::from_raw(w, h, out).unwrap_or_else(|| target.clone()))
}
