pub mod assets;
pub mod config;
pub mod state;

pub use assets::{AssetManifest, Layer};
pub use config::{GlobeConfig, FRAME_MS};
pub use state::{DragPhase, SimulationState};
