//! `rig_shared`
//!
//! Shared libraries used by the player and the feed tool.
//!
//! Design goals:
//! - One playback contract for recorded and live landmark data.
//! - Explicit validation of every coordinate token.
//! - Traits at the seams to the host scene and the network receiver.
//! - No `unsafe`.

pub mod calib;
pub mod config;
pub mod frame;
pub mod live;
pub mod math;
pub mod net;
pub mod recorded;
pub mod scene;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::calib::*;
    pub use crate::config::*;
    pub use crate::frame::*;
    pub use crate::live::*;
    pub use crate::math::*;
    pub use crate::net::*;
    pub use crate::recorded::*;
    pub use crate::scene::*;
}
