//! Application setup and lifecycle management
//!
//! This module contains the application initialization and lifecycle code,
//! keeping lib.rs slim and focused.

pub mod host;
pub mod lifecycle;
pub mod plugins;
pub mod state;

pub use lifecycle::*;
pub use plugins::*;
pub use state::*;
