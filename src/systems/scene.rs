//! Scene builder: container, floor, glass ring and the snow.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::core::Vec2;
use crate::domain::config::GlobeConfig;
use crate::rigid_body::{
    BodyDesc, BodyHandle, CollisionFilter, PhysicsBackend, CATEGORY_CONTAINER, CATEGORY_FLOOR,
    CATEGORY_PARTICLE, CATEGORY_RING, GROUP_PARTICLES,
};

/// One static piece of the glass wall
#[derive(Clone, Copy, Debug)]
pub struct RingSegment {
    pub handle: BodyHandle,
    /// Angle of the segment center around the globe (radians)
    pub angle: f32,
}

/// Per-particle data that the physics engine doesn't know about.
///
/// Struct-of-arrays indexed by particle index; `handles[i]` is the body.
#[derive(Clone, Debug, Default)]
pub struct ParticleTable {
    pub handles: Vec<BodyHandle>,
    pub radius: Vec<f32>,
    pub phase: Vec<f32>,
    /// Sway angular speed (radians per second)
    pub sway_speed: Vec<f32>,
    /// 0 = front of the globe, 1 = back
    pub depth: Vec<f32>,
}

impl ParticleTable {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            handles: Vec::with_capacity(n),
            radius: Vec::with_capacity(n),
            phase: Vec::with_capacity(n),
            sway_speed: Vec::with_capacity(n),
            depth: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    fn push(&mut self, handle: BodyHandle, radius: f32, phase: f32, sway_speed: f32, depth: f32) {
        self.handles.push(handle);
        self.radius.push(radius);
        self.phase.push(phase);
        self.sway_speed.push(sway_speed);
        self.depth.push(depth);
    }
}

/// Everything registered with the backend at build time
#[derive(Clone, Debug)]
pub struct Scene {
    pub home: Vec2,
    pub container: BodyHandle,
    pub floor: BodyHandle,
    pub ring: Vec<RingSegment>,
    pub particles: ParticleTable,
}

pub fn build_scene<B, R>(backend: &mut B, config: &GlobeConfig, rng: &mut R) -> Scene
where
    B: PhysicsBackend + ?Sized,
    R: Rng + ?Sized,
{
    let s = &config.scene;
    let home = s.home;

    let container = backend.add_body(
        BodyDesc::circle(home, s.globe_radius)
            .density(s.container_density)
            .restitution(0.2)
            .friction(0.5)
            .fixed()
            .filter(CollisionFilter::new(CATEGORY_CONTAINER, CATEGORY_FLOOR)),
    );

    let floor_center = Vec2::new(home.x, config.drag.bottom_limit + s.floor_thickness * 0.5);
    let floor = backend.add_body(
        BodyDesc::rect(floor_center, s.canvas_width * 2.0, s.floor_thickness)
            .fixed()
            .filter(CollisionFilter::new(CATEGORY_FLOOR, CATEGORY_CONTAINER)),
    );

    let ring = build_ring(backend, config, home);
    let particles = spawn_particles(backend, config, home, rng);

    log::info!(
        "scene built: {} ring segments, {} particles",
        ring.len(),
        particles.len()
    );

    Scene { home, container, floor, ring, particles }
}

fn build_ring<B: PhysicsBackend + ?Sized>(backend: &mut B, config: &GlobeConfig, center: Vec2) -> Vec<RingSegment> {
    let s = &config.scene;
    let n = s.ring_segments;
    let length = TAU * s.ring_radius / n as f32 * s.segment_overlap;

    (0..n)
        .map(|i| {
            let angle = segment_angle(i, n);
            let handle = backend.add_body(
                BodyDesc::one_way_rect(ring_position(center, s.ring_radius, angle), length, s.segment_thickness)
                    .angle(segment_orientation(angle, 0.0))
                    .restitution(0.1)
                    .friction(0.0)
                    .fixed()
                    .filter(CollisionFilter::new(CATEGORY_RING, CATEGORY_PARTICLE)),
            );
            RingSegment { handle, angle }
        })
        .collect()
}

fn spawn_particles<B, R>(backend: &mut B, config: &GlobeConfig, home: Vec2, rng: &mut R) -> ParticleTable
where
    B: PhysicsBackend + ?Sized,
    R: Rng + ?Sized,
{
    let p = &config.particles;
    let spawn_radius = config.spawn_radius();
    let mut table = ParticleTable::with_capacity(p.count as usize);

    let filter = CollisionFilter::new(CATEGORY_PARTICLE, CATEGORY_RING).with_group(GROUP_PARTICLES);

    for _ in 0..p.count {
        let radius = sample_between(rng, p.radius_min, p.radius_max);
        let offset = sample_spawn_offset(rng, spawn_radius, radius, p.spawn_floor, p.spawn_attempts);

        let handle = backend.add_body(
            BodyDesc::circle(home + offset, radius)
                .density(p.density)
                .restitution(p.restitution)
                .friction(p.friction)
                .air_friction(p.air_friction)
                .gravity_scale(0.0)
                .filter(filter),
        );

        table.push(
            handle,
            radius,
            rng.gen_range(0.0..TAU),
            sample_between(rng, p.sway_speed_min, p.sway_speed_max),
            rng.gen_range(0.0..=1.0),
        );
    }

    table
}

/// Rejection-sample an offset from the globe center inside the lower part of
/// the spawn disc. Falls back to clamping the last candidate onto the disc
/// once the attempt budget runs out.
fn sample_spawn_offset<R: Rng + ?Sized>(
    rng: &mut R,
    spawn_radius: f32,
    particle_radius: f32,
    spawn_floor: f32,
    attempts: u32,
) -> Vec2 {
    let limit = spawn_radius - particle_radius;
    let min_y = (spawn_floor.clamp(0.0, 1.0) * spawn_radius).min(limit);

    let mut candidate = Vec2::new(0.0, limit);
    for _ in 0..attempts.max(1) {
        candidate = Vec2::new(
            sample_between(rng, -limit, limit),
            sample_between(rng, min_y, limit),
        );
        if candidate.length_squared() <= limit * limit {
            return candidate;
        }
    }
    clamp_to_disc(candidate, limit)
}

/// Uniform sample between `a` and `b`, given in either order.
fn sample_between<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

fn clamp_to_disc(offset: Vec2, limit: f32) -> Vec2 {
    let len = offset.length();
    if len <= limit || len <= 0.0 {
        offset
    } else {
        offset * (limit / len)
    }
}

/// Angle of ring segment `i` of `n` around the globe
pub fn segment_angle(i: u32, n: u32) -> f32 {
    i as f32 / n as f32 * TAU
}

/// Center of a ring segment at `angle` around `center`
pub fn ring_position(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + Vec2::from_angle(angle) * radius
}

/// Body angle for a segment: long side tangent, solid side facing inward.
pub fn segment_orientation(angle: f32, container_angle: f32) -> f32 {
    angle + container_angle + FRAC_PI_2
}

/// Keep the ring centered on the container.
pub fn reposition_ring<B: PhysicsBackend + ?Sized>(backend: &mut B, scene: &Scene, ring_radius: f32) {
    let center = backend.position(scene.container);
    let container_angle = backend.angle(scene.container);

    for seg in scene.ring.iter() {
        let angle = seg.angle + container_angle;
        backend.set_position(seg.handle, ring_position(center, ring_radius, angle));
        backend.set_angle(seg.handle, segment_orientation(seg.angle, container_angle));
    }
}
