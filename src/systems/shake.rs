//! Shake intensity: ramps up while the globe is dragged, decays after.
//!
//! Two-phase decay: a slow fade during the grace window after the last drag
//! frame, then a fast one so the snow reliably comes to rest.

use crate::domain::config::ShakeConfig;
use crate::domain::state::SimulationState;

/// Update `state.shake` for the current frame.
///
/// `container_speed` is the container's displacement this frame (px/frame).
/// Returns the new strength, always within `[0, 1]`.
pub fn update_shake(state: &mut SimulationState, container_speed: f32, config: &ShakeConfig) -> f32 {
    let shake = &mut state.shake;

    if state.drag.is_dragging() {
        let ramp = config.ramp_base + config.ramp_per_speed * container_speed.max(0.0);
        shake.strength = (shake.strength + ramp).min(1.0);
        shake.last_activity_ms = state.clock_ms;
    } else {
        let idle_ms = state.clock_ms - shake.last_activity_ms;
        let factor = if idle_ms < config.grace_ms {
            config.slow_decay
        } else {
            config.fast_decay
        };
        shake.strength *= factor;
        if shake.strength < config.snap_to_zero {
            shake.strength = 0.0;
        }
    }

    if !shake.strength.is_finite() {
        shake.strength = 0.0;
    }
    shake.strength = shake.strength.clamp(0.0, 1.0);
    shake.strength
}

/// Calm enough for particles to settle
#[inline]
pub fn is_calm(strength: f32, config: &ShakeConfig) -> bool {
    strength < config.epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec2;
    use crate::domain::state::DragPhase;

    fn dragging() -> SimulationState {
        let mut state = SimulationState::new();
        state.drag.phase = DragPhase::Dragging { offset: Vec2::zero() };
        state
    }

    #[test]
    fn ramps_while_dragging_and_saturates() {
        let config = ShakeConfig::default();
        let mut state = dragging();

        let first = update_shake(&mut state, 0.0, &config);
        assert!((first - config.ramp_base).abs() < 1e-6);

        for _ in 0..200 {
            state.advance_clock();
            update_shake(&mut state, 40.0, &config);
        }
        assert_eq!(state.shake.strength, 1.0);
        assert_eq!(state.shake.last_activity_ms, state.clock_ms);
    }

    #[test]
    fn faster_drags_ramp_faster() {
        let config = ShakeConfig::default();
        let mut slow = dragging();
        let mut fast = dragging();
        update_shake(&mut slow, 1.0, &config);
        update_shake(&mut fast, 10.0, &config);
        assert!(fast.shake.strength > slow.shake.strength);
    }

    #[test]
    fn decays_monotonically_after_release_and_reaches_zero() {
        let config = ShakeConfig::default();
        let mut state = dragging();
        for _ in 0..100 {
            update_shake(&mut state, 20.0, &config);
            state.advance_clock();
        }
        state.drag.phase = DragPhase::Idle;
        let released_at = state.clock_ms;

        let mut prev = state.shake.strength;
        while state.clock_ms - released_at < config.decay_window_ms() {
            let s = update_shake(&mut state, 0.0, &config);
            assert!(s <= prev);
            assert!((0.0..=1.0).contains(&s));
            prev = s;
            state.advance_clock();
        }
        assert!(is_calm(state.shake.strength, &config));

        for _ in 0..60 {
            update_shake(&mut state, 0.0, &config);
            state.advance_clock();
        }
        assert_eq!(state.shake.strength, 0.0);
    }

    #[test]
    fn grace_window_decays_slowly() {
        let config = ShakeConfig::default();
        let mut state = SimulationState::new();
        state.shake.strength = 1.0;
        state.shake.last_activity_ms = 0.0;
        state.clock_ms = 100.0;

        let s = update_shake(&mut state, 0.0, &config);
        assert!((s - config.slow_decay).abs() < 1e-6);

        state.clock_ms = config.grace_ms + 1.0;
        let s2 = update_shake(&mut state, 0.0, &config);
        assert!((s2 - s * config.fast_decay).abs() < 1e-6);
    }

    #[test]
    fn idle_from_start_stays_zero() {
        let config = ShakeConfig::default();
        let mut state = SimulationState::new();
        for _ in 0..10 {
            assert_eq!(update_shake(&mut state, 0.0, &config), 0.0);
            state.advance_clock();
        }
    }
}
