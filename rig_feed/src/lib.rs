//! `rig_feed`
//!
//! Replays a recording over UDP in the live message format, standing in for
//! the capture process when testing a player without a camera.

pub mod feed;

pub use feed::TrackFeed;
