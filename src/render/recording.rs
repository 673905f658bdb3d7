use std::collections::HashSet;

use crate::domain::assets::Layer;
use crate::domain::config::RenderConfig;

use super::Surface;

/// A recorded draw call, in screen coordinates (translation applied).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Layer { layer: Layer, screen_x: f64, screen_y: f64 },
    Glow { screen_x: f64, screen_y: f64, radius: f64 },
    Outline { screen_x: f64, screen_y: f64, width: f64, height: f64, angle: f64 },
}

/// Surface that remembers what was drawn instead of drawing it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    available: HashSet<Layer>,
    offset: (f64, f64),
    stack: Vec<(f64, f64)>,
}

impl RecordingSurface {
    pub fn with_layers(layers: &[Layer]) -> Self {
        Self {
            available: layers.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn with_all_layers() -> Self {
        Self::with_layers(&Layer::ALL)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn draw_layer(&mut self, layer: Layer, x: f64, y: f64, _width: f64, _height: f64) -> bool {
        if !self.available.contains(&layer) {
            return false;
        }
        self.ops.push(DrawOp::Layer {
            layer,
            screen_x: x + self.offset.0,
            screen_y: y + self.offset.1,
        });
        true
    }

    fn save(&mut self) {
        self.stack.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.stack.pop() {
            self.offset = offset;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset.0 += dx;
        self.offset.1 += dy;
    }

    fn glow_circle(&mut self, x: f64, y: f64, radius: f64, _style: &RenderConfig) {
        self.ops.push(DrawOp::Glow {
            screen_x: x + self.offset.0,
            screen_y: y + self.offset.1,
            radius,
        });
    }

    fn stroke_rotated_rect(&mut self, x: f64, y: f64, width: f64, height: f64, angle: f64, _color: &str) {
        self.ops.push(DrawOp::Outline {
            screen_x: x + self.offset.0,
            screen_y: y + self.offset.1,
            width,
            height,
            angle,
        });
    }
}
