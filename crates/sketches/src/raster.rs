//! CPU rasterizer implementing [`Surface`] on top of `vello_cpu`.
//!
//! Every call since the last [`clear`](Surface::clear) is recorded into a
//! `vello_cpu::RenderContext` as a kurbo path; the scene is rendered into a
//! `Pixmap` only when pixels are read back. Readback is straight
//! (non-premultiplied) RGBA8.

use huahua_core::color::Rgba;
use huahua_core::error::SketchError;
use huahua_core::geometry::Viewport;
use huahua_core::surface::{LineCap, LineJoin, StrokeStyle, Surface};
use huahua_core::DVec2;
use vello_cpu::kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Stroke};
use vello_cpu::peniko::{Color, Fill};
use vello_cpu::{Pixmap, RenderContext};

pub struct RasterSurface {
    width: u16,
    height: u16,
    ctx: RenderContext,
    stroke: Stroke,
    paint: Color,
    transforms: Vec<Affine>,
    /// Straight-alpha readback of the last render; `None` once drawing resumes.
    rendered: Option<Vec<u8>>,
}

impl RasterSurface {
    /// Transparent `width x height` buffer.
    ///
    /// Returns `SketchError::InvalidDimensions` if either side is zero or
    /// larger than the rasterizer's `u16` limit.
    pub fn new(width: usize, height: usize) -> Result<Self, SketchError> {
        if width == 0 || height == 0 {
            return Err(SketchError::InvalidDimensions);
        }
        let width: u16 = width.try_into().map_err(|_| SketchError::InvalidDimensions)?;
        let height: u16 = height.try_into().map_err(|_| SketchError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            ctx: RenderContext::new(width, height),
            stroke: to_stroke(&StrokeStyle::new(Rgba::rgb(0, 0, 0), 1.0)),
            paint: Color::from_rgba8(0, 0, 0, 255),
            transforms: Vec::new(),
            rendered: None,
        })
    }

    /// Buffer covering `viewport`, rounding fractional sizes up.
    pub fn for_viewport(viewport: &Viewport) -> Result<Self, SketchError> {
        Self::new(viewport.width().ceil() as usize, viewport.height().ceil() as usize)
    }

    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Row-major RGBA8 bytes, `width * height * 4` long. Renders the scene
    /// recorded so far if anything was drawn since the last readback.
    pub fn pixels(&mut self) -> &[u8] {
        let (ctx, width, height) = (&mut self.ctx, self.width, self.height);
        self.rendered.get_or_insert_with(|| render_straight(ctx, width, height))
    }

    pub fn into_pixels(mut self) -> Vec<u8> {
        self.pixels();
        self.rendered.unwrap_or_default()
    }

    pub fn pixel(&mut self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = (y * self.width() + x) * 4;
        let px = &self.pixels()[i..i + 4];
        Some(Rgba::rgba(px[0], px[1], px[2], px[3]))
    }

    fn transform(&self) -> Affine {
        self.transforms.last().copied().unwrap_or(Affine::IDENTITY)
    }

    fn begin_draw(&mut self) {
        self.rendered = None;
        let transform = self.transform();
        self.ctx.set_transform(transform);
    }
}

fn to_point(p: DVec2) -> Point {
    Point::new(p.x, p.y)
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn to_stroke(style: &StrokeStyle) -> Stroke {
    let cap = match style.cap {
        LineCap::Butt => Cap::Butt,
        LineCap::Round => Cap::Round,
        LineCap::Square => Cap::Square,
    };
    let join = match style.join {
        LineJoin::Miter => Join::Miter,
        LineJoin::Round => Join::Round,
        LineJoin::Bevel => Join::Bevel,
    };
    Stroke::new(style.width).with_caps(cap).with_join(join)
}

/// Renders into a fresh pixmap and un-premultiplies the result.
fn render_straight(ctx: &mut RenderContext, width: u16, height: u16) -> Vec<u8> {
    let mut pixmap = Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    let mut data = pixmap.data_as_u8_slice().to_vec();
    for px in data.chunks_exact_mut(4) {
        unpremultiply(px);
    }
    data
}

fn unpremultiply(px: &mut [u8]) {
    let a = u16::from(px[3]);
    if a == 0 || a == 255 {
        return;
    }
    for c in &mut px[..3] {
        *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self, color: Rgba) {
        self.ctx = RenderContext::new(self.width, self.height);
        self.transforms.clear();
        self.begin_draw();
        self.ctx.set_paint(to_color(color));
        self.ctx
            .fill_rect(&Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height)));
    }

    fn set_stroke(&mut self, style: &StrokeStyle) {
        self.stroke = to_stroke(style);
        self.paint = to_color(style.color);
    }

    fn line(&mut self, from: DVec2, to: DVec2) {
        if !(self.stroke.width > 0.0 && self.stroke.width.is_finite()) {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(to_point(from));
        path.line_to(to_point(to));
        self.begin_draw();
        self.ctx.set_stroke(self.stroke.clone());
        self.ctx.set_paint(self.paint);
        self.ctx.stroke_path(&path);
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Rgba) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(to_point(*first));
        for &p in rest {
            path.line_to(to_point(p));
        }
        path.close_path();
        self.begin_draw();
        self.ctx.set_fill_rule(Fill::EvenOdd);
        self.ctx.set_paint(to_color(color));
        self.ctx.fill_path(&path);
    }

    fn push_transform(&mut self, offset: DVec2, angle: f64) {
        let next = self.transform() * Affine::translate((offset.x, offset.y)) * Affine::rotate(angle);
        self.transforms.push(next);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}
