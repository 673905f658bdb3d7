use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::core::GlobeError;
use crate::domain::assets::Layer;
use crate::domain::config::RenderConfig;
use crate::render::Surface;

/// Loaded layer images, indexed by `Layer::index()`
pub(crate) type LayerImages = [Option<HtmlImageElement>; 6];

/// `Surface` backed by a 2D canvas context.
pub(crate) struct WebSurface {
    ctx: CanvasRenderingContext2d,
    images: LayerImages,
}

impl WebSurface {
    pub(crate) fn new(canvas: &HtmlCanvasElement, images: LayerImages) -> Result<Self, GlobeError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| GlobeError::from_js(&e))?
            .ok_or_else(|| GlobeError::Dom("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GlobeError::Dom("context is not a CanvasRenderingContext2d".to_string()))?;
        Ok(Self { ctx, images })
    }
}

impl Surface for WebSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn draw_layer(&mut self, layer: Layer, x: f64, y: f64, width: f64, height: f64) -> bool {
        let Some(image) = &self.images[layer.index()] else {
            return false;
        };
        match self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height)
        {
            Ok(()) => true,
            Err(e) => {
                log::debug!("drawing {} layer failed: {:?}", layer.name(), e);
                false
            }
        }
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        if let Err(e) = self.ctx.translate(dx, dy) {
            log::debug!("translate failed: {:?}", e);
        }
    }

    fn glow_circle(&mut self, x: f64, y: f64, radius: f64, style: &RenderConfig) {
        let ctx = &self.ctx;
        ctx.set_shadow_blur(style.glow_blur);
        ctx.set_shadow_color(&style.glow_color);
        ctx.set_fill_style_str(&style.particle_color);
        ctx.begin_path();
        if ctx.arc(x, y, radius, 0.0, TAU).is_ok() {
            ctx.fill();
        }
        ctx.set_shadow_blur(0.0);
    }

    fn stroke_rotated_rect(&mut self, x: f64, y: f64, width: f64, height: f64, angle: f64, color: &str) {
        let ctx = &self.ctx;
        ctx.save();
        if ctx.translate(x, y).is_ok() && ctx.rotate(angle).is_ok() {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(1.0);
            ctx.stroke_rect(-width * 0.5, -height * 0.5, width, height);
        }
        ctx.restore();
    }
}
