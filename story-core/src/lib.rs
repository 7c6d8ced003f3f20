pub mod assets;
pub mod background;
pub mod config;
pub mod effects;
pub mod error;
pub mod layout;
pub mod navigation;
pub mod overlay;
pub mod painter;
pub mod player;
pub mod portrait;
pub mod scheduler;

pub use assets::{ImageCache, cover_fit, crossfade};
pub use background::{BackgroundAnimator, BackgroundFrame};
pub use config::{Palette, PlayerConfig, SystemConfig};
pub use effects::{EffectEngine, EffectStep, TextFrame, TextLayout};
pub use error::{AssetError, NavigationError};
pub use layout::Layout;
pub use navigation::{NavCommand, Navigator, Phase, Progress};
pub use overlay::{Band, ChoiceOverlay};
pub use player::{HostEvent, Player, PlayerSignal};
pub use portrait::PortraitPanel;
pub use scheduler::{Fired, ManualScheduler, Scheduler, TimerHandle, TimerKind};
