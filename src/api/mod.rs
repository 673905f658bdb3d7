//! Browser runtime: canvas drawing, asset loading, input listeners and the
//! `requestAnimationFrame` loop, exposed to JS as `SnowGlobe`.

mod assets;
mod canvas;
mod runtime;

pub mod input;
pub mod wasm;
