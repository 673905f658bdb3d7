//! Mutable per-widget simulation state.
//!
//! Input handlers write into it, the frame pump reads it. Everything that
//! used to be scattered across the widget lives in one `SimulationState`
//! that is passed explicitly to each system.

use crate::core::Vec2;

use super::config::FRAME_MS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPhase {
    Idle,
    /// `offset` is container center minus the grab point
    Dragging { offset: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub point: Vec2,
    pub time_ms: f64,
}

#[derive(Clone, Debug)]
pub struct DragState {
    pub phase: DragPhase,
    /// Latest pointer position in canvas pixels
    pub cursor: Vec2,
    /// Previous move sample, for cursor speed
    pub last_sample: Option<PointerSample>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ShakeState {
    /// Always within [0, 1]
    pub strength: f32,
    pub last_activity_ms: f64,
}

#[derive(Clone, Debug)]
pub struct SimulationState {
    pub drag: DragState,
    pub shake: ShakeState,
    /// Simulated clock, advanced by one fixed step per tick
    pub clock_ms: f64,
    pub frame: u64,
    pub debug: bool,
}

impl SimulationState {
    pub fn new() -> Self {
        Self {
            drag: DragState {
                phase: DragPhase::Idle,
                cursor: Vec2::zero(),
                last_sample: None,
            },
            shake: ShakeState {
                strength: 0.0,
                last_activity_ms: f64::NEG_INFINITY,
            },
            clock_ms: 0.0,
            frame: 0,
            debug: false,
        }
    }

    pub fn time_seconds(&self) -> f32 {
        (self.clock_ms / 1000.0) as f32
    }

    pub(crate) fn advance_clock(&mut self) {
        self.clock_ms += FRAME_MS;
        self.frame += 1;
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}
