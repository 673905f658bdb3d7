use super::*;
use crate::domain::state::DragPhase;
use crate::render::RecordingSurface;
use crate::systems::drag::SilentCue;
use crate::systems::forces::glass_gap;
use crate::systems::scene::{ring_position, segment_angle};

const SEED: u64 = 42;

fn globe() -> GlobeCore {
    GlobeCore::with_seed(GlobeConfig::default(), SEED)
}

fn run(core: &mut GlobeCore, frames: u32) {
    for _ in 0..frames {
        core.step().unwrap();
    }
}

fn max_distance_from_center(core: &GlobeCore) -> f32 {
    let center = core.container_position();
    core.particle_positions()
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0, f32::max)
}

/// Drag the globe around its home in a fast circle-ish wobble.
fn violent_drag(core: &mut GlobeCore, frames: u32) {
    let home = core.scene().home;
    assert!(core.press(home.x, home.y, 0.0));
    for i in 0..frames {
        let t = i as f32 * 0.6;
        let cursor = home + Vec2::new(t.sin() * 120.0, (t * 1.3).cos() * 60.0);
        let time = core.state().clock_ms + 1.0;
        core.move_pointer(cursor.x, cursor.y, time, &mut SilentCue);
        core.step().unwrap();
    }
    core.release();
}

#[test]
fn calm_start_settles_inside_containment() {
    let mut core = globe();
    let config = core.config().clone();

    run(&mut core, 300);

    let total = config.particles.count as usize;
    let asleep = core.sleeping_count();
    assert!(asleep * 100 >= total * 95, "only {}/{} asleep after 300 frames", asleep, total);
    assert!(max_distance_from_center(&core) <= config.scene.containment_radius + 2.0);
    assert_eq!(core.container_position(), config.scene.home);
}

#[test]
fn settled_particles_stay_put() {
    let mut core = globe();
    run(&mut core, 300);

    let before: Vec<(usize, Vec2)> = core
        .scene()
        .particles
        .handles
        .iter()
        .enumerate()
        .filter(|(_, &h)| core.backend().is_sleeping(h))
        .map(|(i, &h)| (i, core.backend().position(h)))
        .collect();
    assert!(!before.is_empty());

    run(&mut core, 60);

    let handles = &core.scene().particles.handles;
    for (i, pos) in before {
        assert!(core.backend().is_sleeping(handles[i]));
        assert_eq!(core.backend().position(handles[i]), pos);
    }
}

/// Every sleeping particle rests inside the glass, within `settle_depth` of it.
fn assert_sleepers_rest_on_glass(core: &GlobeCore) {
    let config = core.config();
    let center = core.container_position();
    let containment = config.scene.containment_radius;
    let depth = config.forces.settle_depth;

    for &h in core.scene().particles.handles.iter() {
        if !core.backend().is_sleeping(h) {
            continue;
        }
        let offset = core.backend().position(h) - center;
        let gap = glass_gap(offset, containment);
        assert!(
            (-1e-3..=depth + 1e-3).contains(&gap),
            "sleeper at {:?} hangs {} px above the glass",
            offset,
            gap
        );
    }
}

#[test]
fn calm_snow_rests_on_the_glass() {
    let mut core = globe();
    run(&mut core, 300);
    assert_sleepers_rest_on_glass(&core);
}

#[test]
fn shaken_snow_comes_down_to_the_glass() {
    let mut core = globe();
    violent_drag(&mut core, 60);
    run(&mut core, 1200);

    assert!(core.sleeping_count() > 0);
    assert_sleepers_rest_on_glass(&core);
}

#[test]
fn shake_saturates_then_decays_within_window() {
    let mut core = globe();
    violent_drag(&mut core, 60);
    assert_eq!(core.shake(), 1.0);

    let config = core.config().shake.clone();
    let released_at = core.state().clock_ms;
    let mut prev = core.shake();
    while core.state().clock_ms - released_at < config.decay_window_ms() {
        core.step().unwrap();
        let s = core.shake();
        assert!((0.0..=1.0).contains(&s));
        assert!(s <= prev, "shake went up after release: {} -> {}", prev, s);
        prev = s;
    }
    assert!(core.shake() < config.epsilon);
}

#[test]
fn snow_returns_inside_after_violent_shaking() {
    let mut core = globe();
    violent_drag(&mut core, 60);
    run(&mut core, 900);

    let config = core.config();
    let bound = config.scene.containment_radius + config.forces.wake_margin;
    assert!(max_distance_from_center(&core) <= bound);
    assert!(core.sleeping_count() > 0);
}

#[test]
fn ring_tracks_the_container() {
    let mut core = globe();
    let home = core.scene().home;
    assert!(core.press(home.x, home.y, 0.0));
    let delta = Vec2::new(-70.0, 35.0);
    core.move_pointer(home.x + delta.x, home.y + delta.y, 16.0, &mut SilentCue);
    core.step().unwrap();

    let r = core.config().scene.ring_radius;
    let n = core.config().scene.ring_segments;
    for (i, seg) in core.scene().ring.iter().enumerate() {
        let expected = ring_position(home, r, segment_angle(i as u32, n)) + delta;
        assert!(core.backend().position(seg.handle).distance(expected) < 1e-3);
    }
}

#[test]
fn dragged_globe_is_pinned_to_the_cursor() {
    let mut core = globe();
    let home = core.scene().home;
    let grab = home + Vec2::new(-40.0, 60.0);
    assert!(core.press(grab.x, grab.y, 0.0));

    for i in 1..=30 {
        let cursor = grab + Vec2::new(i as f32 * 3.0, -(i as f32) * 2.0);
        core.move_pointer(cursor.x, cursor.y, i as f64 * 16.0, &mut SilentCue);
        core.step().unwrap();
        assert_eq!(core.container_position(), cursor + (home - grab));
        assert!(matches!(core.state().drag.phase, DragPhase::Dragging { .. }));
    }

    core.release();
    let pinned = core.container_position();
    run(&mut core, 30);
    assert_eq!(core.container_position(), pinned);
}

#[test]
fn fall_on_release_drops_the_globe_onto_the_floor() {
    let mut config = GlobeConfig::default();
    config.drag.fall_on_release = true;
    let mut core = GlobeCore::with_seed(config, SEED);
    let home = core.scene().home;

    core.press(home.x, home.y, 0.0);
    core.move_pointer(home.x, home.y - 200.0, 16.0, &mut SilentCue);
    core.step().unwrap();
    core.release();
    run(&mut core, 400);

    let c = core.config();
    let bottom = core.container_position().y + c.scene.globe_radius;
    assert!(bottom > c.drag.bottom_limit - 3.0 && bottom < c.drag.bottom_limit + 1.0);
}

#[test]
fn debug_toggle_outlines_the_ring() {
    let mut core = globe();
    let mut surface = RecordingSurface::with_all_layers();

    assert!(core.toggle_debug());
    let stats = core.tick(&mut surface).unwrap();
    assert_eq!(stats.debug_shapes, core.config().scene.ring_segments);

    assert!(!core.toggle_debug());
    surface.ops.clear();
    let stats = core.tick(&mut surface).unwrap();
    assert_eq!(stats.debug_shapes, 0);
}

#[test]
fn failing_step_does_not_advance_the_clock() {
    let mut core = globe();
    let h = core.scene().particles.handles[0];
    core.backend.set_position(h, Vec2::new(f32::NAN, 0.0));

    assert!(matches!(core.step(), Err(GlobeError::NonFinite { .. })));
    assert_eq!(core.frame(), 0);
}

#[test]
fn perf_stats_are_collected_when_enabled() {
    let mut core = globe();
    core.enable_perf_metrics(true);
    let mut surface = RecordingSurface::with_all_layers();
    core.tick(&mut surface).unwrap();

    let stats = core.perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.frame(), 1);
    assert_eq!(stats.particles_drawn(), core.config().particles.count);
    assert_eq!(
        stats.awake_particles() + stats.sleeping_particles(),
        core.config().particles.count
    );
}

#[test]
fn same_seed_builds_the_same_scene() {
    let a = globe();
    let b = globe();
    assert_eq!(a.particle_positions(), b.particle_positions());
}

#[test]
fn unvalidated_inverted_ranges_still_build() {
    let mut config = GlobeConfig::default();
    config.particles.sway_speed_min = 3.0;
    config.particles.sway_speed_max = 1.0;
    assert!(config.validate().is_err());

    let mut core = GlobeCore::with_seed(config, SEED);
    core.step().unwrap();
    assert_eq!(core.particle_positions().len(), 400);
}

#[test]
fn shutdown_empties_the_backend_for_reuse() {
    let core = globe();
    let config = core.config().clone();
    let backend = core.shutdown();
    assert_eq!(backend.body_count(), 0);

    let rebuilt = GlobeCore::with_backend(config, backend, SEED);
    assert_eq!(rebuilt.particle_positions(), globe().particle_positions());
}
