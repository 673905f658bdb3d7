//! Input/drag controller: Idle -> Dragging -> Idle.
//!
//! Event handlers (`press`, `move_to`, `release`) only record what the
//! pointer did; `apply_drag` is pumped once per frame and moves the
//! container.

use crate::core::Vec2;
use crate::domain::config::GlobeConfig;
use crate::domain::state::{DragPhase, PointerSample, SimulationState};
use crate::rigid_body::PhysicsBackend;

use super::scene::Scene;

/// One-shot "shake" sound played when the globe is swung hard enough.
pub trait ShakeCue {
    fn is_playing(&self) -> bool;
    fn play(&mut self);
}

/// Cue for hosts without audio.
#[derive(Default)]
pub struct SilentCue;

impl ShakeCue for SilentCue {
    fn is_playing(&self) -> bool {
        false
    }

    fn play(&mut self) {}
}

/// Start a drag if `point` is on the globe. Returns whether it was grabbed.
pub fn press<B: PhysicsBackend + ?Sized>(
    state: &mut SimulationState,
    backend: &mut B,
    scene: &Scene,
    config: &GlobeConfig,
    point: Vec2,
    time_ms: f64,
) -> bool {
    if state.drag.is_dragging() {
        return true;
    }

    let center = backend.position(scene.container);
    if center.distance(point) > config.scene.globe_radius {
        return false;
    }

    // Pinned while the user holds it: gravity must not pull it away.
    backend.set_static(scene.container, true);
    backend.set_velocity(scene.container, Vec2::zero());

    state.drag.phase = DragPhase::Dragging { offset: center - point };
    state.drag.cursor = point;
    state.drag.last_sample = Some(PointerSample { point, time_ms });
    true
}

/// Record a pointer move. Returns the instantaneous cursor speed in px/ms
/// (0 when idle or when the timestamps don't advance).
pub fn move_to<C: ShakeCue + ?Sized>(
    state: &mut SimulationState,
    config: &GlobeConfig,
    point: Vec2,
    time_ms: f64,
    cue: &mut C,
) -> f32 {
    if !state.drag.is_dragging() {
        return 0.0;
    }

    let speed = match state.drag.last_sample {
        Some(prev) if time_ms > prev.time_ms => {
            prev.point.distance(point) / (time_ms - prev.time_ms) as f32
        }
        _ => 0.0,
    };

    state.drag.cursor = point;
    state.drag.last_sample = Some(PointerSample { point, time_ms });

    if speed > config.drag.shake_sound_speed && !cue.is_playing() {
        cue.play();
    }
    speed
}

/// End the drag. The container stops dead and stays pinned unless
/// `fall_on_release` hands it back to gravity.
pub fn release<B: PhysicsBackend + ?Sized>(
    state: &mut SimulationState,
    backend: &mut B,
    scene: &Scene,
    config: &GlobeConfig,
) {
    if !state.drag.is_dragging() {
        return;
    }
    state.drag.phase = DragPhase::Idle;
    state.drag.last_sample = None;

    backend.set_velocity(scene.container, Vec2::zero());
    if config.drag.fall_on_release {
        backend.set_static(scene.container, false);
        backend.set_sleeping(scene.container, false);
    }
}

/// Where the container goes for the current cursor: grab point kept fixed,
/// bottom edge held above `bottom_limit`.
pub fn drag_target(cursor: Vec2, offset: Vec2, config: &GlobeConfig) -> Vec2 {
    let mut target = cursor + offset;
    let max_y = config.drag.bottom_limit - config.scene.globe_radius;
    if target.y > max_y {
        target.y = max_y;
    }
    target
}

/// Frame pump: move the pinned container to the drag target and give it the
/// matching per-frame velocity.
pub fn apply_drag<B: PhysicsBackend + ?Sized>(
    state: &SimulationState,
    backend: &mut B,
    scene: &Scene,
    config: &GlobeConfig,
) {
    let DragPhase::Dragging { offset } = state.drag.phase else {
        return;
    };

    let target = drag_target(state.drag.cursor, offset, config);
    let current = backend.position(scene.container);
    backend.set_velocity(scene.container, target - current);
    backend.set_position(scene.container, target);
}
