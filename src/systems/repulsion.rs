//! Soft particle-particle repulsion while the globe is shaken hard.
//!
//! Particles don't collide with each other in the physics backend, so this
//! pass keeps them from clumping. All pairs, awake particles only.

use crate::core::Vec2;
use crate::domain::config::RepulsionConfig;
use crate::rigid_body::{BodyHandle, PhysicsBackend};

use super::scene::Scene;

/// Interaction radius for the current shake strength
#[inline]
pub fn repulsion_radius(config: &RepulsionConfig, mult: f32) -> f32 {
    config.radius * (0.5 + 0.5 * mult)
}

/// Queue repulsion forces. Returns the number of interacting pairs.
pub fn apply_repulsion<B: PhysicsBackend + ?Sized>(
    backend: &mut B,
    scene: &Scene,
    mult: f32,
    config: &RepulsionConfig,
) -> u32 {
    if mult <= config.threshold {
        return 0;
    }

    let awake: Vec<(BodyHandle, Vec2, f32)> = scene
        .particles
        .handles
        .iter()
        .filter(|&&h| !backend.is_sleeping(h))
        .map(|&h| (h, backend.position(h), backend.mass(h)))
        .collect();

    let radius = repulsion_radius(config, mult);
    let radius_sq = radius * radius;
    let mut forces = vec![Vec2::zero(); awake.len()];
    let mut pairs = 0;

    for i in 0..awake.len() {
        let (_, pi, mi) = awake[i];
        for j in (i + 1)..awake.len() {
            let (_, pj, mj) = awake[j];
            let delta = pi - pj;
            let d2 = delta.length_squared();
            // Coincident particles have no direction to push along
            if d2 >= radius_sq || d2 < 1e-8 {
                continue;
            }
            let d = d2.sqrt();
            let reduced = mi * mj / (mi + mj);
            let push = delta * ((config.strength * (radius - d) * mult * reduced) / d);
            forces[i] += push;
            forces[j] -= push;
            pairs += 1;
        }
    }

    for ((h, _, _), force) in awake.iter().zip(forces) {
        if force != Vec2::zero() {
            backend.apply_force(*h, force);
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::GlobeConfig;
    use crate::rigid_body_system::ImpulseWorld;
    use crate::systems::scene::build_scene;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn setup(count: u32) -> (GlobeConfig, ImpulseWorld, Scene) {
        let mut config = GlobeConfig::default();
        config.particles.count = count;
        config.particles.air_friction = 0.0;
        let mut world = ImpulseWorld::new(config.physics.clone());
        let scene = build_scene(&mut world, &config, &mut SmallRng::seed_from_u64(9));
        (config, world, scene)
    }

    #[test]
    fn below_threshold_does_nothing() {
        let (config, mut world, scene) = setup(2);
        let [a, b] = [scene.particles.handles[0], scene.particles.handles[1]];
        world.set_position(a, scene.home);
        world.set_position(b, scene.home + Vec2::new(2.0, 0.0));

        assert_eq!(apply_repulsion(&mut world, &scene, config.repulsion.threshold, &config.repulsion), 0);
    }

    #[test]
    fn close_pair_is_pushed_apart_equally() {
        let (config, mut world, scene) = setup(2);
        let [a, b] = [scene.particles.handles[0], scene.particles.handles[1]];
        world.set_position(a, scene.home);
        world.set_position(b, scene.home + Vec2::new(3.0, 0.0));

        assert_eq!(apply_repulsion(&mut world, &scene, 1.0, &config.repulsion), 1);
        world.step().unwrap();

        let pa = world.velocity(a) * world.mass(a);
        let pb = world.velocity(b) * world.mass(b);
        assert!(pa.x < 0.0 && pb.x > 0.0);
        assert!((pa.x + pb.x).abs() < 1e-6, "momentum is conserved");
    }

    #[test]
    fn distant_pair_is_ignored() {
        let (config, mut world, scene) = setup(2);
        let [a, b] = [scene.particles.handles[0], scene.particles.handles[1]];
        world.set_position(a, scene.home);
        world.set_position(b, scene.home + Vec2::new(repulsion_radius(&config.repulsion, 1.0) + 1.0, 0.0));
        assert_eq!(apply_repulsion(&mut world, &scene, 1.0, &config.repulsion), 0);
    }

    #[test]
    fn coincident_pair_stays_finite() {
        let (config, mut world, scene) = setup(2);
        let [a, b] = [scene.particles.handles[0], scene.particles.handles[1]];
        world.set_position(a, scene.home);
        world.set_position(b, scene.home);

        assert_eq!(apply_repulsion(&mut world, &scene, 1.0, &config.repulsion), 0);
        world.step().unwrap();
        assert!(world.velocity(a).is_finite() && world.velocity(b).is_finite());
    }

    #[test]
    fn sleeping_particles_are_skipped() {
        let (config, mut world, scene) = setup(2);
        let [a, b] = [scene.particles.handles[0], scene.particles.handles[1]];
        world.set_position(a, scene.home);
        world.set_position(b, scene.home + Vec2::new(3.0, 0.0));
        world.set_sleeping(b, true);

        assert_eq!(apply_repulsion(&mut world, &scene, 1.0, &config.repulsion), 0);
    }
}
