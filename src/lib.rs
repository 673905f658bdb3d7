//! Snowglobe Engine - an interactive snow globe for the browser, in WASM
//!
//! Drag the globe and the snow swirls; let go and it drifts back down and
//! settles.
//!
//! Architecture:
//! - core/        - Math, errors, logging
//! - domain/      - Config, asset manifest, simulation state
//! - systems/     - Physics backend, scene, drag, shake, forces, repulsion
//! - render/      - Surface trait and the layered render pass
//! - simulation/  - GlobeCore: headless orchestration of one frame
//! - api/         - Browser runtime (canvas, input, assets, frame loop)

pub mod core;
pub mod domain;
pub mod systems;
pub mod render;
pub mod simulation;
pub mod api;

// Short paths for the physics layer
pub use systems::rigid_body;
pub use systems::rigid_body_system;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook and console logging
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::logging::init_logging();
    log::info!("❄ Snowglobe engine {} initialized", version());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use api::wasm::SnowGlobe;
pub use crate::core::{GlobeError, Vec2};
pub use domain::{AssetManifest, GlobeConfig, Layer};
pub use render::{RecordingSurface, Surface};
pub use simulation::{FrameStats, GlobeCore};
