//! Scoring core for a poker-hand deckbuilder. Keep this crate free of IO
//! and platform concerns.
//!
//! Fixed-capacity storage lives in [`arena`] and [`list`]; everything else
//! is re-exported at the crate root.

pub mod arena;
pub mod cards;
pub mod config;
pub mod context;
pub mod effects;
pub mod events;
pub mod hand;
pub mod joker;
pub mod list;
pub mod pacing;
pub mod registry;
pub mod rng;
pub mod roster;
pub mod rules;
pub mod scoring;

pub use cards::*;
pub use config::*;
pub use context::*;
pub use effects::*;
pub use events::*;
pub use hand::*;
pub use joker::*;
pub use pacing::*;
pub use registry::{JokerInfo, MAX_COPY_DEPTH};
pub use rng::*;
pub use roster::*;
pub use rules::*;
pub use scoring::*;
