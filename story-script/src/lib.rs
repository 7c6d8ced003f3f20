pub mod error;
pub mod graph;
pub mod segment;

pub use error::ScriptError;
pub use graph::{ScriptGraph, ScriptSummary};
pub use segment::{BackgroundSpec, Choice, EffectKind, Segment};
