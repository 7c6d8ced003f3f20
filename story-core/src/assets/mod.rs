mod cache;
mod compose;

pub use cache::ImageCache;
pub use compose::{cover_fit, crossfade};
