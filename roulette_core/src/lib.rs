pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod items;
pub mod palette;
pub mod resolver;
pub mod rng;
pub mod roulette;
pub mod scheduler;

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{HistoryConfig, PaletteConfig, Range, RouletteConfig, SpinConfig};
pub use crate::engine::{
    ease_out_cubic, Episode, SpinEngine, SpinEvent, SpinListener, SpinOutcome, SpinState,
    SpinTrigger,
};
pub use crate::error::{RouletteError, RouletteResult};
pub use crate::geometry::{label_angle, slice_angle, wedge_span, wedge_under_pointer, POINTER_ANGLE};
pub use crate::history::{HistoryEntry, HistoryStore, DEFAULT_HISTORY_CAPACITY};
pub use crate::items::WheelItems;
pub use crate::palette::{generate_palette, Hsl, PaletteGenerator};
pub use crate::resolver::resolve;
pub use crate::rng::{derive_floats, derive_hash_hex, ProvablyFairRng, RandomSource, SeededStream};
pub use crate::roulette::Roulette;
pub use crate::scheduler::{FrameQueue, FrameScheduler, FrameToken};
