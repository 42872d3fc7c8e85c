//! Audio preprocessing modules
//!
//! Utilities for preparing audio for analysis:
//! - Channel mixing (interleaved multi-channel to mono)

pub mod channel_mixer;
