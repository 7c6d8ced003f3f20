use serde::{Deserialize, Serialize};
use story_ui::{Color, GlyphMetrics};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub scripts_dir: String,
    pub script_path: String,
    pub log_path:    String,
    pub log_level:   String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// 相对图片路径以此为根
    pub project_root: String,
    /// 第一次没有立绘时尝试的默认立绘
    pub default_portrait: String,
    /// 动画中点击：先跳过，再立即按推进处理
    pub skip_then_advance: bool,
    /// 固定随机种子（测试/录屏用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
    pub theme: ThemeConfig,
    pub layout: LayoutConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background: String,
    pub foreground: String,
    pub dim:        String,
    pub hint:       String,
    pub card:       String,
    pub alert:      String,
    pub wave:       String,
    pub ending:     String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub panel_margin_x:      f32,
    pub panel_margin_top:    f32,
    pub panel_margin_bottom: f32,
    pub panel_padding_x:     f32,
    pub panel_padding_y:     f32,
    pub min_text_width:      f32,
    /// 0 关闭右侧人物栏
    pub portrait_width:      f32,
    pub glyph_unit_width:    f32,
    pub line_height:         f32,
    pub font_size:           f32,
    pub alert_font_size:     f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub background_fade_ms:     f64,
    pub background_shake_ms:    f64,
    pub background_shake_power: i64,
    pub background_tick_ms:     u64,
    pub overlay_tick_ms:        u64,
    pub overlay_step:           f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            scripts_dir: "scripts/".into(),
            script_path: "scripts/demo.json".into(),
            log_path:    "logs/".into(),
            log_level:   "info".into(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            project_root: ".".into(),
            default_portrait: "docs/scenes/default_portrait.png".into(),
            skip_then_advance: true,
            rng_seed: None,
            theme: ThemeConfig::default(),
            layout: LayoutConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#0d0d1a".into(),
            foreground: "#d0d0e8".into(),
            dim:        "#555577".into(),
            hint:       "#8888aa".into(),
            card:       "#2d2d4e".into(),
            alert:      "#ff5555".into(),
            wave:       "#88ddbb".into(),
            ending:     "#666688".into(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            panel_margin_x: 34.0,
            panel_margin_top: 20.0,
            panel_margin_bottom: 26.0,
            panel_padding_x: 24.0,
            panel_padding_y: 18.0,
            min_text_width: 120.0,
            portrait_width: 240.0,
            glyph_unit_width: 9.0,
            line_height: 30.0,
            font_size: 16.0,
            alert_font_size: 18.0,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            background_fade_ms: 450.0,
            background_shake_ms: 380.0,
            background_shake_power: 10,
            background_tick_ms: 33,
            overlay_tick_ms: 33,
            overlay_step: 0.22,
        }
    }
}

impl PlayerConfig {
    /// `[player]` section of the shared config, defaults when absent.
    pub fn from_shared() -> Self {
        story_shared::config::get("player")
    }

    pub fn metrics(&self) -> GlyphMetrics {
        GlyphMetrics::new(self.layout.glyph_unit_width, self.layout.line_height)
    }
}

/// Theme colors resolved once from their hex strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub dim:        Color,
    pub hint:       Color,
    pub card:       Color,
    pub alert:      Color,
    pub wave:       Color,
    pub ending:     Color,
}

impl Palette {
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        let defaults = ThemeConfig::default();
        let pick = |value: &str, fallback: &str| {
            Color::from_hex(value).unwrap_or_else(|| {
                log::warn!("Invalid theme color '{}', using {}", value, fallback);
                // 默认值是常量，解析不会失败
                Color::from_hex(fallback).unwrap_or(Color::BLACK)
            })
        };
        Self {
            background: pick(&theme.background, &defaults.background),
            foreground: pick(&theme.foreground, &defaults.foreground),
            dim:        pick(&theme.dim, &defaults.dim),
            hint:       pick(&theme.hint, &defaults.hint),
            card:       pick(&theme.card, &defaults.card),
            alert:      pick(&theme.alert, &defaults.alert),
            wave:       pick(&theme.wave, &defaults.wave),
            ending:     pick(&theme.ending, &defaults.ending),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_theme(&ThemeConfig::default())
    }
}
