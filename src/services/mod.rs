//! Sound services module
//!
//! This module contains the sound effects and the backends that play them.

pub mod player;
pub mod sound;

// Re-export main types
pub use player::{check_player_available, PlayerBackend, PlayerCommand};
pub use sound::{
    ClipId, Repeat, SilentBackend, SoundAssets, SoundBackend, SoundEffects, SoundKind,
    SoundLoaded,
};
