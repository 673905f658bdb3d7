use crate::core::Vec2;

use super::CollisionFilter;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Box centered on the body, rotated by the body angle
    Rect { half_width: f32, half_height: f32 },
    /// Box that only pushes toward its local +y side (rotated by the body
    /// angle). Used for the glass ring: whatever reaches it is sent back in.
    OneWayRect { half_width: f32, half_height: f32 },
}

impl Shape {
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Rect { half_width, half_height }
            | Shape::OneWayRect { half_width, half_height } => 4.0 * half_width * half_height,
        }
    }
}

/// Construction parameters for a body
#[derive(Clone, Debug)]
pub struct BodyDesc {
    pub shape: Shape,
    pub pos: Vec2,
    pub angle: f32,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
    /// Multiplier on world gravity (0 = the caller handles gravity itself)
    pub gravity_scale: f32,
    pub is_static: bool,
    pub filter: CollisionFilter,
}

impl BodyDesc {
    pub fn circle(pos: Vec2, radius: f32) -> Self {
        Self::with_shape(Shape::Circle { radius }, pos)
    }

    pub fn rect(pos: Vec2, width: f32, height: f32) -> Self {
        Self::with_shape(
            Shape::Rect { half_width: width * 0.5, half_height: height * 0.5 },
            pos,
        )
    }

    pub fn one_way_rect(pos: Vec2, width: f32, height: f32) -> Self {
        Self::with_shape(
            Shape::OneWayRect { half_width: width * 0.5, half_height: height * 0.5 },
            pos,
        )
    }

    fn with_shape(shape: Shape, pos: Vec2) -> Self {
        Self {
            shape,
            pos,
            angle: 0.0,
            density: 0.001,
            restitution: 0.0,
            friction: 0.1,
            air_friction: 0.01,
            gravity_scale: 1.0,
            is_static: false,
            filter: CollisionFilter::default(),
        }
    }

    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    pub fn air_friction(mut self, air_friction: f32) -> Self {
        self.air_friction = air_friction.clamp(0.0, 1.0);
        self
    }

    pub fn gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Rigid Body - moves as a single unit
#[derive(Clone, Debug)]
pub struct Body {
    // === Physics State ===
    /// World position (center of mass)
    pub pos: Vec2,
    /// Velocity vector (pixels per frame)
    pub velocity: Vec2,
    /// Rotation angle (radians)
    pub angle: f32,
    /// Angular velocity (radians per frame)
    pub angular_vel: f32,
    pub mass: f32,
    pub inv_mass: f32,
    /// Force accumulated for the next step
    pub force: Vec2,
    pub is_static: bool,
    pub sleeping: bool,
    pub id: u32,

    pub shape: Shape,
    pub filter: CollisionFilter,

    // === Material properties ===
    /// Bounciness (0.0 = no bounce, 1.0 = full elastic)
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
    pub gravity_scale: f32,
}

impl Body {
    pub fn from_desc(desc: BodyDesc, id: u32) -> Self {
        // Guard against zero-area shapes producing an infinite inverse mass
        let mass = (desc.shape.area() * desc.density).max(1e-6);
        let mut body = Self {
            pos: desc.pos,
            velocity: Vec2::zero(),
            angle: desc.angle,
            angular_vel: 0.0,
            mass,
            inv_mass: 1.0 / mass,
            force: Vec2::zero(),
            is_static: false,
            sleeping: false,
            id,
            shape: desc.shape,
            filter: desc.filter,
            restitution: desc.restitution,
            friction: desc.friction,
            air_friction: desc.air_friction,
            gravity_scale: desc.gravity_scale,
        };
        body.set_static(desc.is_static);
        body
    }

    /// Static bodies keep their mass for queries but have zero inverse mass.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        self.inv_mass = if is_static { 0.0 } else { 1.0 / self.mass };
        if is_static {
            self.velocity = Vec2::zero();
            self.angular_vel = 0.0;
            self.force = Vec2::zero();
        }
    }

    /// Only awake, non-static bodies are integrated
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.is_static && !self.sleeping
    }

    /// Transform a world point into this body's local frame
    #[inline]
    pub fn world_to_local(&self, point: Vec2) -> Vec2 {
        (point - self.pos).rotate(-self.angle)
    }

    /// Transform a local direction into world space
    #[inline]
    pub fn local_dir_to_world(&self, dir: Vec2) -> Vec2 {
        dir.rotate(self.angle)
    }

    /// Queue force for the next step
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite()
            && self.velocity.is_finite()
            && self.angle.is_finite()
            && self.angular_vel.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_mass_follows_area() {
        let body = Body::from_desc(BodyDesc::circle(Vec2::zero(), 2.0).density(0.5), 1);
        let expected = std::f32::consts::PI * 4.0 * 0.5;
        assert!((body.mass - expected).abs() < 1e-4);
        assert!((body.inv_mass - 1.0 / expected).abs() < 1e-4);
    }

    #[test]
    fn static_body_has_no_inverse_mass() {
        let mut body = Body::from_desc(BodyDesc::rect(Vec2::zero(), 10.0, 10.0).fixed(), 1);
        assert_eq!(body.inv_mass, 0.0);
        assert!(!body.is_dynamic());

        body.set_static(false);
        assert!(body.inv_mass > 0.0);
    }

    #[test]
    fn world_to_local_undoes_rotation() {
        let body = Body::from_desc(
            BodyDesc::rect(Vec2::new(10.0, 0.0), 4.0, 2.0).angle(std::f32::consts::FRAC_PI_2),
            1,
        );
        let local = body.world_to_local(Vec2::new(10.0, 3.0));
        assert!((local.x - 3.0).abs() < 1e-5);
        assert!(local.y.abs() < 1e-5);
    }
}
