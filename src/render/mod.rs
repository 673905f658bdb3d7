//! Render pass: layered images, glowing snow, optional debug outlines.
//!
//! Drawing goes through `Surface`, so the pass itself never touches the DOM.
//! `api::canvas::WebSurface` draws to a 2D canvas; `RecordingSurface` keeps
//! a list of operations for tests and headless hosts.

pub mod recording;

pub use recording::{DrawOp, RecordingSurface};

use crate::core::Vec2;
use crate::domain::assets::Layer;
use crate::domain::config::{GlobeConfig, RenderConfig};
use crate::domain::state::SimulationState;
use crate::rigid_body::PhysicsBackend;
use crate::systems::scene::Scene;

/// Something the frame can be drawn onto
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);

    /// Draw an image layer stretched over the rect. Returns `false` if the
    /// layer isn't available (never loaded, or failed to load).
    fn draw_layer(&mut self, layer: Layer, x: f64, y: f64, width: f64, height: f64) -> bool;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);

    fn glow_circle(&mut self, x: f64, y: f64, radius: f64, style: &RenderConfig);

    /// Outline of a rotated rectangle centered on `(x, y)`
    fn stroke_rotated_rect(&mut self, x: f64, y: f64, width: f64, height: f64, angle: f64, color: &str);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub layers_drawn: u32,
    pub particles_drawn: u32,
    pub debug_shapes: u32,
}

const BEHIND_SNOW: [Layer; 2] = [Layer::Interior, Layer::Artwork];
const OVER_SNOW: [Layer; 3] = [Layer::Glass, Layer::Reflection, Layer::Base];

/// Draw one frame.
///
/// Everything except the background is shifted by the container's offset
/// from its home position, so the artwork moves with the globe while the
/// snow is drawn where the physics has it.
pub fn render_frame<S, B>(
    surface: &mut S,
    backend: &B,
    scene: &Scene,
    state: &SimulationState,
    config: &GlobeConfig,
) -> RenderStats
where
    S: Surface + ?Sized,
    B: PhysicsBackend + ?Sized,
{
    let w = config.scene.canvas_width as f64;
    let h = config.scene.canvas_height as f64;
    let mut stats = RenderStats::default();

    surface.clear(w, h);

    if surface.draw_layer(Layer::Background, 0.0, 0.0, w, h) {
        stats.layers_drawn += 1;
    }

    let offset = backend.position(scene.container) - scene.home;

    surface.save();
    surface.translate(offset.x as f64, offset.y as f64);

    for layer in BEHIND_SNOW {
        if surface.draw_layer(layer, 0.0, 0.0, w, h) {
            stats.layers_drawn += 1;
        }
    }

    // Inside the translated frame, world positions need the offset removed
    for (i, &handle) in scene.particles.handles.iter().enumerate() {
        let p = backend.position(handle) - offset;
        let r = scene.particles.radius[i];
        surface.glow_circle(p.x as f64, p.y as f64, r as f64, &config.render);
        stats.particles_drawn += 1;
    }

    for layer in OVER_SNOW {
        if surface.draw_layer(layer, 0.0, 0.0, w, h) {
            stats.layers_drawn += 1;
        }
    }

    surface.restore();

    if state.debug {
        stats.debug_shapes = draw_debug(surface, backend, scene, config);
    }

    stats
}

/// Ring segment outlines, in world space
fn draw_debug<S, B>(surface: &mut S, backend: &B, scene: &Scene, config: &GlobeConfig) -> u32
where
    S: Surface + ?Sized,
    B: PhysicsBackend + ?Sized,
{
    let s = &config.scene;
    let length = std::f32::consts::TAU * s.ring_radius / s.ring_segments as f32 * s.segment_overlap;

    for seg in scene.ring.iter() {
        let pos: Vec2 = backend.position(seg.handle);
        surface.stroke_rotated_rect(
            pos.x as f64,
            pos.y as f64,
            length as f64,
            s.segment_thickness as f64,
            backend.angle(seg.handle) as f64,
            &config.render.debug_color,
        );
    }
    scene.ring.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rigid_body_system::ImpulseWorld;
    use crate::systems::scene::build_scene;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn setup() -> (GlobeConfig, ImpulseWorld, Scene, SimulationState) {
        let mut config = GlobeConfig::default();
        config.particles.count = 10;
        let mut world = ImpulseWorld::new(config.physics.clone());
        let scene = build_scene(&mut world, &config, &mut SmallRng::seed_from_u64(5));
        (config, world, scene, SimulationState::new())
    }

    fn layer_order(ops: &[DrawOp]) -> Vec<Layer> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Layer { layer, .. } => Some(*layer),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn layers_are_drawn_in_order_around_the_snow() {
        let (config, world, scene, state) = setup();
        let mut surface = RecordingSurface::with_all_layers();

        let stats = render_frame(&mut surface, &world, &scene, &state, &config);

        assert_eq!(stats.layers_drawn, 6);
        assert_eq!(stats.particles_drawn, 10);
        assert_eq!(layer_order(&surface.ops), Layer::ALL.to_vec());
        assert!(matches!(surface.ops[0], DrawOp::Clear { .. }));

        let first_glow = surface.ops.iter().position(|op| matches!(op, DrawOp::Glow { .. })).unwrap();
        let last_glow = surface.ops.iter().rposition(|op| matches!(op, DrawOp::Glow { .. })).unwrap();
        let artwork = surface.ops.iter().position(|op| matches!(op, DrawOp::Layer { layer: Layer::Artwork, .. })).unwrap();
        let glass = surface.ops.iter().position(|op| matches!(op, DrawOp::Layer { layer: Layer::Glass, .. })).unwrap();
        assert!(artwork < first_glow && last_glow < glass);
    }

    #[test]
    fn missing_layers_are_skipped() {
        let (config, world, scene, state) = setup();
        let mut surface = RecordingSurface::with_layers(&[Layer::Background, Layer::Glass]);

        let stats = render_frame(&mut surface, &world, &scene, &state, &config);

        assert_eq!(stats.layers_drawn, 2);
        assert_eq!(layer_order(&surface.ops), vec![Layer::Background, Layer::Glass]);
        assert_eq!(stats.particles_drawn, 10);
    }

    #[test]
    fn moved_globe_shifts_artwork_but_not_background() {
        let (config, mut world, scene, state) = setup();
        let delta = Vec2::new(30.0, -12.0);
        world.set_position(scene.container, scene.home + delta);
        let mut surface = RecordingSurface::with_all_layers();

        render_frame(&mut surface, &world, &scene, &state, &config);

        for op in surface.ops.iter() {
            if let DrawOp::Layer { layer, screen_x, screen_y } = op {
                let expected = if layer.follows_camera() { delta } else { Vec2::zero() };
                assert_eq!((*screen_x, *screen_y), (expected.x as f64, expected.y as f64));
            }
        }
    }

    #[test]
    fn snow_lands_on_world_positions() {
        let (config, mut world, scene, state) = setup();
        world.set_position(scene.container, scene.home + Vec2::new(-50.0, 20.0));
        let mut surface = RecordingSurface::with_all_layers();

        render_frame(&mut surface, &world, &scene, &state, &config);

        let glows: Vec<(f64, f64)> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Glow { screen_x, screen_y, .. } => Some((*screen_x, *screen_y)),
                _ => None,
            })
            .collect();
        for (i, &h) in scene.particles.handles.iter().enumerate() {
            let p = world.position(h);
            assert!((glows[i].0 - p.x as f64).abs() < 1e-3);
            assert!((glows[i].1 - p.y as f64).abs() < 1e-3);
        }
    }

    #[test]
    fn debug_outlines_every_ring_segment() {
        let (config, world, scene, mut state) = setup();
        let mut surface = RecordingSurface::with_all_layers();

        let stats = render_frame(&mut surface, &world, &scene, &state, &config);
        assert_eq!(stats.debug_shapes, 0);

        state.debug = true;
        surface.ops.clear();
        let stats = render_frame(&mut surface, &world, &scene, &state, &config);
        assert_eq!(stats.debug_shapes, 48);
        let outlines = surface.ops.iter().filter(|op| matches!(op, DrawOp::Outline { .. })).count();
        assert_eq!(outlines, 48);
    }
}
