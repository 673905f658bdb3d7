//! Tunable constants for the snow globe.
//!
//! Units: canvas pixels, and "frames" for anything time-integrated by the
//! physics step (velocities are px/frame, accelerations px/frame²). Wall-clock
//! style values (grace windows, cursor speed) are in milliseconds.
//!
//! Every section is `#[serde(default)]`, so a host only has to send the
//! values it wants to override.

use serde::{Deserialize, Serialize};

use crate::core::{GlobeError, Vec2};

/// Duration of one fixed simulation step.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub scene: SceneConfig,
    pub particles: ParticleConfig,
    pub drag: DragConfig,
    pub shake: ShakeConfig,
    pub forces: ForceConfig,
    pub repulsion: RepulsionConfig,
    pub physics: PhysicsConfig,
    pub render: RenderConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Resting position of the globe center
    pub home: Vec2,
    /// Radius of the glass, also the grab radius
    pub globe_radius: f32,
    /// Radius of the circle the collision ring segments sit on
    pub ring_radius: f32,
    pub ring_segments: u32,
    pub segment_thickness: f32,
    /// Segment length as a multiple of the arc length it covers
    pub segment_overlap: f32,
    /// Particles are pushed back once they drift past this radius
    pub containment_radius: f32,
    pub container_density: f32,
    pub floor_thickness: f32,
    /// Fixed RNG seed. `None` picks a random seed at mount.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024.0,
            canvas_height: 1024.0,
            home: Vec2::new(512.0, 470.0),
            globe_radius: 300.0,
            ring_radius: 285.0,
            ring_segments: 48,
            segment_thickness: 24.0,
            segment_overlap: 1.2,
            containment_radius: 255.0,
            container_density: 0.001,
            floor_thickness: 40.0,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: u32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
    /// Spawn disc radius is `containment_radius - spawn_margin`
    pub spawn_margin: f32,
    /// Minimum downward offset of a spawn point, as a fraction of the spawn radius
    pub spawn_floor: f32,
    pub spawn_attempts: u32,
    /// Sway angular speed range (radians per second)
    pub sway_speed_min: f32,
    pub sway_speed_max: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 400,
            radius_min: 2.0,
            radius_max: 4.5,
            density: 0.001,
            restitution: 0.1,
            friction: 0.0,
            air_friction: 0.01,
            spawn_margin: 10.0,
            spawn_floor: 0.55,
            spawn_attempts: 64,
            sway_speed_min: 0.8,
            sway_speed_max: 2.2,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// The globe's bottom edge may not be dragged below this y
    pub bottom_limit: f32,
    /// Cursor speed (px/ms) that triggers the shake sound
    pub shake_sound_speed: f32,
    /// Release the container to gravity instead of pinning it in place
    pub fall_on_release: bool,
    /// `KeyboardEvent.key` that toggles debug drawing
    pub debug_key: String,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            bottom_limit: 1000.0,
            shake_sound_speed: 2.5,
            fall_on_release: false,
            debug_key: "d".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Per-frame increase while dragging, before speed
    pub ramp_base: f32,
    /// Per-frame increase per px/frame of container speed
    pub ramp_per_speed: f32,
    pub grace_ms: f64,
    pub slow_decay: f32,
    pub fast_decay: f32,
    /// Below this the globe counts as calm
    pub epsilon: f32,
    pub snap_to_zero: f32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            ramp_base: 0.02,
            ramp_per_speed: 0.01,
            grace_ms: 1500.0,
            slow_decay: 0.985,
            fast_decay: 0.85,
            epsilon: 0.01,
            snap_to_zero: 0.001,
        }
    }
}

impl ShakeConfig {
    /// Upper bound on the time a full-strength shake needs after release to
    /// drop below `epsilon`: the grace window plus enough fast-decay frames
    /// to take 1.0 under epsilon.
    pub fn decay_window_ms(&self) -> f64 {
        let fast = self.fast_decay.clamp(0.0001, 0.9999) as f64;
        let eps = self.epsilon.clamp(0.0001, 1.0) as f64;
        let frames = (eps.ln() / fast.ln()).ceil();
        self.grace_ms + (frames + 1.0) * FRAME_MS
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Fraction of world gravity while calm (buoyant fall)
    pub settle_fall: f32,
    /// Fraction of world gravity at full shake
    pub shake_fall: f32,
    pub rest_drag: f32,
    pub shake_drag: f32,
    /// Velocity the surrounding fluid pulls particles toward
    pub ambient_flow: Vec2,
    /// Particles slower than this (px/frame) may settle
    pub sleep_speed: f32,
    /// How close (vertically) to the glass below a particle must be to settle
    pub settle_depth: f32,
    /// How far outside containment a sleeping particle may be before it is woken
    pub wake_margin: f32,
    pub sway_threshold: f32,
    pub sway_strength: f32,
    /// Sway phase change per pixel of height
    pub sway_frequency: f32,
    pub jitter_strength: f32,
    pub containment_stiffness: f32,
    /// Container speed (px/frame) above which dragging stirs the snow
    pub inject_threshold: f32,
    pub inject_gain: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            settle_fall: 0.15,
            shake_fall: 0.3,
            rest_drag: 0.08,
            shake_drag: 0.015,
            ambient_flow: Vec2::zero(),
            sleep_speed: 0.5,
            settle_depth: 12.0,
            wake_margin: 8.0,
            sway_threshold: 0.1,
            sway_strength: 0.04,
            sway_frequency: 0.02,
            jitter_strength: 0.015,
            containment_stiffness: 0.25,
            inject_threshold: 2.0,
            inject_gain: 0.04,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionConfig {
    /// Must be above `forces.sway_threshold`
    pub threshold: f32,
    pub radius: f32,
    pub strength: f32,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            radius: 10.0,
            strength: 0.05,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity (px/frame²)
    pub gravity: Vec2,
    /// Speed cap per body (px/frame); keep below half the ring thickness
    pub max_speed: f32,
    /// Fraction of penetration removed per step
    pub position_correction: f32,
    /// Penetration allowed before correction kicks in
    pub slop: f32,
    /// Largest positional push per contact per step
    pub max_correction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 0.25),
            max_speed: 12.0,
            position_correction: 0.8,
            slop: 0.05,
            max_correction: 8.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub particle_color: String,
    pub glow_color: String,
    pub glow_blur: f64,
    pub debug_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            particle_color: "rgba(255, 255, 255, 0.92)".to_string(),
            glow_color: "rgba(255, 255, 255, 0.8)".to_string(),
            glow_blur: 6.0,
            debug_color: "#ff3366".to_string(),
        }
    }
}

impl GlobeConfig {
    /// Parse a (possibly partial) JSON config. Empty input yields defaults.
    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        let config: GlobeConfig = if json.trim().is_empty() {
            GlobeConfig::default()
        } else {
            serde_json::from_str(json)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GlobeError> {
        let s = &self.scene;
        let p = &self.particles;

        if s.ring_segments < 3 {
            return Err(GlobeError::Config(format!(
                "ring needs at least 3 segments, got {}",
                s.ring_segments
            )));
        }
        if s.containment_radius >= s.ring_radius - s.segment_thickness * 0.5 {
            return Err(GlobeError::Config(
                "containment radius must sit inside the collision ring".to_string(),
            ));
        }
        if p.radius_min <= 0.0 || p.radius_min > p.radius_max {
            return Err(GlobeError::Config(format!(
                "bad particle radius range {}..{}",
                p.radius_min, p.radius_max
            )));
        }
        if p.sway_speed_min < 0.0 || p.sway_speed_min > p.sway_speed_max {
            return Err(GlobeError::Config(format!(
                "bad sway speed range {}..{}",
                p.sway_speed_min, p.sway_speed_max
            )));
        }
        if self.spawn_radius() <= p.radius_max {
            return Err(GlobeError::Config("spawn radius is smaller than a particle".to_string()));
        }
        if self.drag.bottom_limit < s.home.y + s.globe_radius {
            return Err(GlobeError::Config(
                "drag bottom limit is above the globe's resting bottom edge".to_string(),
            ));
        }
        if self.repulsion.threshold < self.forces.sway_threshold {
            return Err(GlobeError::Config(
                "repulsion threshold must not be below the sway threshold".to_string(),
            ));
        }
        Ok(())
    }

    /// Radius of the disc particles are spawned in
    pub fn spawn_radius(&self) -> f32 {
        self.scene.containment_radius - self.particles.spawn_margin
    }
}
