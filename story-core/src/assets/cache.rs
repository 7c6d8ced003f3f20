use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use story_ui::Bitmap;

use super::compose::cover_fit;
use crate::error::AssetError;

/// Decoded bitmaps keyed by resolved path, plus cover-fit derivatives keyed by
/// `(path, width, height)`. Sources are never evicted during a session;
/// derivatives are dropped on surface resize or when their owner lets go.
pub struct ImageCache {
    root: PathBuf,
    sources: FxHashMap<PathBuf, Arc<Bitmap>>,
    resized: FxHashMap<(PathBuf, u32, u32), Arc<Bitmap>>,
    broken: FxHashSet<PathBuf>,
}

impl ImageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sources: FxHashMap::default(),
            resized: FxHashMap::default(),
            broken: FxHashSet::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths are taken as-is, relative ones join the project root.
    /// Only files that exist resolve.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        if path.is_empty() {
            return None;
        }
        let candidate = Path::new(path);
        let full = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };
        full.is_file().then_some(full)
    }

    pub fn decode(path: &Path) -> Result<Bitmap, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(image.to_rgb8())
    }

    pub fn load(&mut self, path: &Path) -> Option<Arc<Bitmap>> {
        if let Some(bitmap) = self.sources.get(path) {
            return Some(bitmap.clone());
        }
        // 坏图只报一次错，避免 33ms 的重绘循环刷屏
        if self.broken.contains(path) {
            return None;
        }

        log::debug!("Loading image: {:?}", path);
        match Self::decode(path) {
            Ok(bitmap) => {
                let bitmap = Arc::new(bitmap);
                self.sources.insert(path.to_path_buf(), bitmap.clone());
                Some(bitmap)
            }
            Err(e) => {
                log::error!("{}", e);
                self.broken.insert(path.to_path_buf());
                None
            }
        }
    }

    pub fn get_resized(&mut self, path: &Path, width: u32, height: u32) -> Option<Arc<Bitmap>> {
        let key = (path.to_path_buf(), width, height);
        if let Some(bitmap) = self.resized.get(&key) {
            return Some(bitmap.clone());
        }
        let source = self.load(path)?;
        let fitted = Arc::new(cover_fit(&source, width, height));
        self.resized.insert(key, fitted.clone());
        Some(fitted)
    }

    pub fn clear_resized(&mut self) {
        if !self.resized.is_empty() {
            log::debug!("Dropping {} resized images", self.resized.len());
        }
        self.resized.clear();
    }

    /// Drops the derivatives of one source, whatever their size.
    pub fn drop_resized(&mut self, path: &Path) {
        let before = self.resized.len();
        self.resized.retain(|(p, _, _), _| p != path);
        if self.resized.len() != before {
            log::debug!("Dropping {} resized copies of {:?}", before - self.resized.len(), path);
        }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn resized_count(&self) -> usize {
        self.resized.len()
    }
}
