#![deny(unsafe_code)]
//! Browser bindings: a canvas-2d [`Surface`] and a handle the page's
//! animation loop drives once per `requestAnimationFrame`.
//!
//! The page owns the chrome (sketch picker, speed selector, credits panel);
//! this crate only draws, and reports credits and parameters as JSON.

use huahua_core::color::Rgba;
use huahua_core::geometry::Viewport;
use huahua_core::sketch::{FrameStatus, Sketch};
use huahua_core::surface::{LineCap, LineJoin, StrokeStyle, Surface};
use huahua_core::{DVec2, SpeedLevel};
use huahua_sketches::{FrameDriver, SketchKind};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement};

/// Count of `save()` calls still waiting for their `restore()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SaveDepth(usize);

impl SaveDepth {
    fn push(&mut self) {
        self.0 += 1;
    }

    /// False when there is nothing to restore.
    fn pop(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }

    /// Restores owed to get back to the base state; resets to zero.
    fn unwind(&mut self) -> usize {
        std::mem::take(&mut self.0)
    }
}

/// [`Surface`] backed by a `CanvasRenderingContext2d`.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    depth: SaveDepth,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            depth: SaveDepth::default(),
        })
    }

    fn viewport(&self) -> Result<Viewport, JsValue> {
        Viewport::new(f64::from(self.canvas.width()), f64::from(self.canvas.height())).map_err(to_js)
    }

    /// Resizing a canvas also resets its context state, save stack included.
    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.depth = SaveDepth::default();
    }
}

fn cap_name(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

fn join_name(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Miter => "miter",
        LineJoin::Round => "round",
        LineJoin::Bevel => "bevel",
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Rgba) {
        let (w, h) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        for _ in 0..self.depth.unwind() {
            self.ctx.restore();
        }
        // Only fails for a detached context; the fill below is then a no-op too.
        let _ = self.ctx.reset_transform();
        self.ctx.save();
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
        self.ctx.restore();
    }

    fn set_stroke(&mut self, style: &StrokeStyle) {
        self.ctx.set_stroke_style_str(&style.color.to_css());
        self.ctx.set_line_width(style.width);
        self.ctx.set_line_cap(cap_name(style.cap));
        self.ctx.set_line_join(join_name(style.join));
    }

    fn line(&mut self, from: DVec2, to: DVec2) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
    }

    fn push_transform(&mut self, offset: DVec2, angle: f64) {
        self.ctx.save();
        self.depth.push();
        let _ = self.ctx.translate(offset.x, offset.y);
        let _ = self.ctx.rotate(angle);
    }

    fn pop_transform(&mut self) {
        if self.depth.pop() {
            self.ctx.restore();
        }
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One running sketch bound to a canvas.
#[wasm_bindgen]
pub struct HuahuaApp {
    driver: FrameDriver<SketchKind>,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl HuahuaApp {
    /// Starts `sketch` on `canvas` at the canvas's current size.
    ///
    /// `params_json` may be empty; unknown or mistyped keys use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, sketch: &str, seed: u64, params_json: &str) -> Result<HuahuaApp, JsValue> {
        let params = if params_json.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(params_json).map_err(to_js)?
        };
        let kind = SketchKind::from_name(sketch, seed, &params).map_err(to_js)?;
        let mut surface = CanvasSurface::new(canvas)?;
        let viewport = surface.viewport()?;
        let driver = FrameDriver::new(kind, viewport, &mut surface);
        Ok(Self { driver, surface })
    }

    /// Draws one frame. Returns `false` once the sketch has finished, so the
    /// page can stop requesting frames until the next regeneration.
    pub fn frame(&mut self) -> bool {
        self.driver.frame(&mut self.surface) == FrameStatus::Running
    }

    /// Pointer pressed outside the chrome: start a new composition.
    pub fn pointer_pressed(&mut self) {
        self.driver.pointer_pressed(&mut self.surface);
    }

    /// Resizes the canvas and starts a new composition for the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.surface.set_size(width, height);
        let viewport = self.surface.viewport()?;
        self.driver.resize(viewport, &mut self.surface);
        Ok(())
    }

    /// Speed from the chrome's selector; anything but 2 or 4 means 1x.
    pub fn set_speed(&mut self, value: f64) {
        self.driver.set_speed(SpeedLevel::from_value(value));
    }

    pub fn speed(&self) -> u8 {
        self.driver.speed().multiplier()
    }

    pub fn is_finished(&self) -> bool {
        self.driver.status() == FrameStatus::Finished
    }

    pub fn sketch_name(&self) -> String {
        self.driver.sketch().name().to_string()
    }

    /// Credits as `{title, author, url, display_url}` JSON, if the sketch has any.
    pub fn credits(&self) -> Option<String> {
        self.driver.sketch().credits().map(|c| {
            serde_json::json!({
                "title": c.title,
                "author": c.author,
                "display_url": c.display_url(48),
                "url": c.url,
            })
            .to_string()
        })
    }

    pub fn params(&self) -> String {
        self.driver.sketch().params().to_string()
    }

    pub fn param_schema(&self) -> String {
        self.driver.sketch().param_schema().to_string()
    }
}

/// Comma-separated list of sketch names.
#[wasm_bindgen]
pub fn sketch_names() -> String {
    SketchKind::list_sketches().join(",")
}
