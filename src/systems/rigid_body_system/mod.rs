//! ImpulseWorld - the crate's own `PhysicsBackend`
//!
//! Deliberately small (no broadphase, no rotation dynamics for contacts).
//! What it does:
//! - Semi-implicit Euler with per-body air drag and a speed clamp.
//! - Category/mask/group filtering before any narrow phase.
//! - Circle vs circle, circle vs box, circle vs one-way box contacts.
//! - Sleeping bodies are skipped until something wakes them.

mod collision;
mod system;

pub use system::ImpulseWorld;
