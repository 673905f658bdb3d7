//! Simulation systems. Each one is a free function over the backend, the
//! scene and the shared `SimulationState`; the frame loop calls them in
//! order.

pub mod drag;
pub mod forces;
pub mod repulsion;
pub mod rigid_body;
pub mod rigid_body_system;
pub mod scene;
pub mod shake;
