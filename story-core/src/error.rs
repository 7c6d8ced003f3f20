use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0:?}")]
    NotFound(PathBuf),

    #[error("cannot read asset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("bitmap sizes differ: {left:?} vs {right:?}")]
    SizeMismatch { left: (u32, u32), right: (u32, u32) },
}

/// Rejected navigation requests. The player treats every one of them as a
/// no-op; they exist so callers and tests can tell why nothing happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("an animation is still running")]
    Busy,
    #[error("the story has ended")]
    AtEnding,
    #[error("the current segment requires a choice")]
    ChoiceRequired,
    #[error("no choice is pending")]
    NotAwaitingChoice,
    #[error("choice {index} out of range ({len} choices)")]
    ChoiceOutOfRange { index: usize, len: usize },
    #[error("choice {index} has no target")]
    ChoiceWithoutTarget { index: usize },
    #[error("history is empty")]
    NoHistory,
}
