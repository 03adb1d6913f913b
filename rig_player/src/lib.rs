//! `rig_player`
//!
//! Player-side systems:
//! - `PointSequencePlayer`: writes recorded or live frames onto targets
//! - `PacedHost`: fixed-rate tick scheduling in place of an engine loop

pub mod host;
pub mod player;

pub use host::PacedHost;
pub use player::{PlaybackSource, PlayerStats, PointSequencePlayer};
