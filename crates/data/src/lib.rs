//! Loads scoring configuration from the JSON files under `assets/`.

pub mod load;

pub use load::*;
