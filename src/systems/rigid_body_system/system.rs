use crate::core::{GlobeError, Vec2};
use crate::domain::config::PhysicsConfig;
use crate::rigid_body::{Body, BodyDesc, BodyHandle, Contact, PhysicsBackend};

use super::collision::detect;

/// Minimal impulse solver: semi-implicit Euler, one contact pass, positional
/// correction. Enough for a few hundred circles against a ring of boxes.
pub struct ImpulseWorld {
    bodies: Vec<Body>,
    contacts: Vec<Contact>,
    config: PhysicsConfig,
}

impl ImpulseWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            bodies: Vec::new(),
            contacts: Vec::new(),
            config,
        }
    }

    pub fn body(&self, handle: BodyHandle) -> &Body {
        &self.bodies[handle.index()]
    }

    fn body_mut(&mut self, handle: BodyHandle) -> &mut Body {
        &mut self.bodies[handle.index()]
    }

    fn integrate(&mut self) {
        let gravity = self.config.gravity;
        let max_speed = self.config.max_speed;

        for body in self.bodies.iter_mut() {
            if !body.is_dynamic() {
                body.force = Vec2::zero();
                continue;
            }

            let damping = 1.0 - body.air_friction;
            body.velocity = body.velocity * damping
                + body.force * body.inv_mass
                + gravity * body.gravity_scale;

            // Clamp to keep cost bounded and avoid tunneling through the ring.
            body.velocity = body.velocity.clamp_length(max_speed);

            body.angular_vel *= damping;
            body.angle += body.angular_vel;
            body.pos += body.velocity;
            body.force = Vec2::zero();
        }
    }

    fn solve_contacts(&mut self) {
        self.contacts.clear();
        let n = self.bodies.len();

        for i in 0..n {
            if !self.bodies[i].is_dynamic() {
                continue;
            }
            for j in 0..n {
                if i == j {
                    continue;
                }
                let other = &self.bodies[j];
                // Dynamic pairs are visited once, from the lower index.
                if other.is_dynamic() && j < i {
                    continue;
                }
                if !self.bodies[i].filter.can_collide(&other.filter) {
                    continue;
                }
                let Some((normal, depth)) = detect(&self.bodies[i], other) else {
                    continue;
                };

                if other.sleeping && !other.is_static {
                    self.bodies[j].sleeping = false;
                }

                self.resolve(i, j, normal, depth);
                self.contacts.push(Contact {
                    a: BodyHandle(i as u32),
                    b: BodyHandle(j as u32),
                    normal,
                    depth,
                });
            }
        }
    }

    /// Push `a` and `b` apart along `normal` (from b to a) and remove the
    /// approaching part of their relative velocity.
    fn resolve(&mut self, ia: usize, ib: usize, normal: Vec2, depth: f32) {
        let inv_a = self.bodies[ia].inv_mass;
        let inv_b = self.bodies[ib].inv_mass;
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return;
        }

        let correction = ((depth - self.config.slop).max(0.0) * self.config.position_correction)
            .min(self.config.max_correction);
        if correction > 0.0 {
            let push = normal * (correction / inv_sum);
            self.bodies[ia].pos += push * inv_a;
            self.bodies[ib].pos -= push * inv_b;
        }

        let rel = self.bodies[ia].velocity - self.bodies[ib].velocity;
        let vn = rel.dot(normal);
        if vn >= 0.0 {
            return;
        }

        let restitution = self.bodies[ia].restitution.max(self.bodies[ib].restitution);
        let friction = (self.bodies[ia].friction * self.bodies[ib].friction).sqrt();

        let jn = -(1.0 + restitution) * vn / inv_sum;
        let tangent = rel - normal * vn;
        let jt = tangent * (-friction / inv_sum);
        let impulse = normal * jn + jt;

        self.bodies[ia].velocity += impulse * inv_a;
        self.bodies[ib].velocity -= impulse * inv_b;
    }

    fn check_finite(&self) -> Result<(), GlobeError> {
        match self.bodies.iter().find(|b| !b.is_finite()) {
            Some(body) => Err(GlobeError::NonFinite { body: body.id }),
            None => Ok(()),
        }
    }
}

impl PhysicsBackend for ImpulseWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Body::from_desc(desc, handle.0));
        handle
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn position(&self, body: BodyHandle) -> Vec2 {
        self.body(body).pos
    }

    fn set_position(&mut self, body: BodyHandle, pos: Vec2) {
        self.body_mut(body).pos = pos;
    }

    fn angle(&self, body: BodyHandle) -> f32 {
        self.body(body).angle
    }

    fn set_angle(&mut self, body: BodyHandle, angle: f32) {
        self.body_mut(body).angle = angle;
    }

    fn velocity(&self, body: BodyHandle) -> Vec2 {
        self.body(body).velocity
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        self.body_mut(body).velocity = velocity;
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f32) {
        self.body_mut(body).angular_vel = angular_velocity;
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.body(body).mass
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        self.body_mut(body).apply_force(force);
    }

    fn is_static(&self, body: BodyHandle) -> bool {
        self.body(body).is_static
    }

    fn set_static(&mut self, body: BodyHandle, is_static: bool) {
        self.body_mut(body).set_static(is_static);
    }

    fn is_sleeping(&self, body: BodyHandle) -> bool {
        self.body(body).sleeping
    }

    fn set_sleeping(&mut self, body: BodyHandle, sleeping: bool) {
        let b = self.body_mut(body);
        b.sleeping = sleeping;
        if sleeping {
            b.force = Vec2::zero();
        }
    }

    fn step(&mut self) -> Result<(), GlobeError> {
        self.integrate();
        self.solve_contacts();
        self.check_finite()
    }

    fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.contacts.clear();
    }
}
