//! Core building blocks shared by every system: math, errors, logging.

pub mod error;
pub mod logging;
pub mod vec2;

pub use error::GlobeError;
pub use vec2::Vec2;
