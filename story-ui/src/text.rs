use unicode_width::UnicodeWidthChar;

/// Fixed-cell glyph measurement: narrow characters take one unit, East Asian
/// wide/fullwidth characters take two.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    pub unit_width: f32,
    pub line_height: f32,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self { unit_width: 9.0, line_height: 30.0 }
    }
}

impl GlyphMetrics {
    pub fn new(unit_width: f32, line_height: f32) -> Self {
        Self { unit_width, line_height }
    }

    pub fn char_width(&self, ch: char) -> f32 {
        match ch.width() {
            Some(2) => self.unit_width * 2.0,
            _ => self.unit_width,
        }
    }

    pub fn line_width(&self, line: &str) -> f32 {
        line.chars().map(|ch| self.char_width(ch)).sum()
    }
}

/// Character-level wrap. Explicit `\n` always breaks; a character that would
/// overflow `max_width` starts a new line unless the current line is empty.
/// Empty source lines are kept so vertical spacing survives.
pub fn wrap_lines(text: &str, max_width: f32, metrics: &GlyphMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0;
        for ch in raw.chars() {
            let w = metrics.char_width(ch);
            if current_w + w > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current.push(ch);
                current_w = w;
            } else {
                current.push(ch);
                current_w += w;
            }
        }
        lines.push(current);
    }
    lines
}
