use std::path::{Path, PathBuf};
use std::sync::Arc;

use story_script::Segment;
use story_ui::Bitmap;

use crate::assets::ImageCache;

pub const PLACEHOLDER: &str = "No portrait available";

/// What the portrait column shows right now.
#[derive(Clone, Debug, PartialEq)]
pub struct PortraitView {
    pub speaker_label: String,
    /// `None` means the placeholder text is drawn instead.
    pub image: Option<Arc<Bitmap>>,
}

/// Speaker name and portrait of the right-hand column. A segment without a
/// portrait keeps the previous one.
pub struct PortraitPanel {
    speaker: Option<String>,
    portrait: Option<PathBuf>,
    last_drawn: Option<PathBuf>,
    default_portrait: String,
}

impl PortraitPanel {
    pub fn new(default_portrait: impl Into<String>) -> Self {
        Self {
            speaker: None,
            portrait: None,
            last_drawn: None,
            default_portrait: default_portrait.into(),
        }
    }

    pub fn update(&mut self, segment: &Segment, cache: &ImageCache) {
        self.speaker = Some(segment.speaker.clone());

        let resolved = segment.character_image.as_deref().and_then(|p| cache.resolve(p));
        if let Some(path) = resolved {
            self.portrait = Some(path);
        } else if self.portrait.is_none() {
            self.portrait = cache.resolve(&self.default_portrait);
            if self.portrait.is_none() {
                log::debug!("Default portrait {:?} not found", self.default_portrait);
            }
        }
    }

    pub fn view(&mut self, width: u32, height: u32, cache: &mut ImageCache) -> PortraitView {
        let speaker_label = format!(
            "Speaker: {}",
            self.speaker.as_deref().unwrap_or("-")
        );

        let mut image = None;
        if let Some(path) = self.portrait.clone() {
            image = cache.get_resized(&path, width.max(1), height.max(1));
            if image.is_some() {
                self.last_drawn = Some(path);
            }
        }
        // 新立绘加载失败时保留上一张成功显示的
        if image.is_none() {
            if let Some(path) = self.last_drawn.clone() {
                image = cache.get_resized(&path, width.max(1), height.max(1));
            }
        }

        PortraitView { speaker_label, image }
    }

    pub fn portrait_path(&self) -> Option<&Path> {
        self.portrait.as_deref()
    }

    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }
}
