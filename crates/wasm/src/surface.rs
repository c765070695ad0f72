//! [`Surface`] over a browser `<canvas>` 2D context.

use std::f64::consts::TAU;

use backdrop_core::color::Rgba;
use backdrop_core::error::BackdropError;
use backdrop_core::surface::{Size, Surface};
use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Paints through `CanvasRenderingContext2d` calls.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquires the canvas's 2D context.
    ///
    /// Returns `BackdropError::SurfaceUnavailable` if the browser refuses one,
    /// e.g. because the canvas already has a WebGL context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, BackdropError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| BackdropError::SurfaceUnavailable(format!("{e:?}")))?
            .ok_or_else(|| BackdropError::SurfaceUnavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackdropError::SurfaceUnavailable("context is not 2d".into()))?;
        Ok(Self { canvas, ctx })
    }
}

fn css(color: Rgba) -> JsValue {
    JsValue::from_str(&color.to_css())
}

#[allow(deprecated)]
impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn resize(&mut self, size: Size) {
        let side = |v: f64| if v.is_finite() { v.max(0.0) as u32 } else { 0 };
        self.canvas.set_width(side(size.width));
        self.canvas.set_height(side(size.height));
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        let size = self.size();
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
        else {
            return;
        };
        if gradient.add_color_stop(0.0, &inner.to_css()).is_err()
            || gradient.add_color_stop(1.0, &outer.to_css()).is_err()
        {
            return;
        }
        self.ctx.set_fill_style(&gradient);
        self.ctx.fill_rect(0.0, 0.0, size.width, size.height);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.ctx.set_stroke_style(&css(color));
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x, center.y, radius.max(0.0), 0.0, TAU)
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style(&css(color));
        self.ctx.fill();
    }
}
