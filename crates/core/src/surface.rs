//! Drawing-surface primitives consumed by the sketches.
//!
//! A [`Surface`] is whatever sits underneath: a canvas-2d context in the
//! browser, the CPU rasterizer used for snapshots, or a [`RecordingSurface`]
//! in tests. Sketches only ever clear, stroke straight lines, fill polygons,
//! and push/pop a translate+rotate frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// End cap for stroked lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Join style where stroked lines meet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Everything a line draw needs besides its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    /// Round-capped, round-joined stroke.
    pub fn new(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// Immediate-mode drawing target.
///
/// Coordinates passed to [`line`](Surface::line) and
/// [`fill_polygon`](Surface::fill_polygon) are in the current local frame,
/// i.e. after every pushed transform has been applied.
pub trait Surface {
    /// Paints the whole surface with `color` and resets the transform stack.
    fn clear(&mut self, color: Rgba);

    /// Style used by subsequent [`line`](Surface::line) calls.
    fn set_stroke(&mut self, style: &StrokeStyle);

    /// Strokes a straight line with the current style.
    fn line(&mut self, from: DVec2, to: DVec2);

    /// Fills the closed polygon through `points` (even-odd) with `color`.
    fn fill_polygon(&mut self, points: &[DVec2], color: Rgba);

    /// Enters a local frame: translate by `offset`, then rotate by `angle` radians.
    fn push_transform(&mut self, offset: DVec2, angle: f64);

    /// Leaves the innermost local frame. Unbalanced pops are ignored.
    fn pop_transform(&mut self);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear { color: Rgba },
    SetStroke { style: StrokeStyle },
    Line { from: DVec2, to: DVec2 },
    FillPolygon { points: Vec<DVec2>, color: Rgba },
    PushTransform { offset: DVec2, angle: f64 },
    PopTransform,
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `Line` commands.
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    /// Summed length of all recorded lines, in their local frames.
    pub fn total_line_length(&self) -> f64 {
        self.commands
            .iter()
            .map(|c| match c {
                DrawCommand::Line { from, to } => from.distance(*to),
                _ => 0.0,
            })
            .sum()
    }

    /// Number of `FillPolygon` commands.
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPolygon { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn set_stroke(&mut self, style: &StrokeStyle) {
        self.commands.push(DrawCommand::SetStroke { style: *style });
    }

    fn line(&mut self, from: DVec2, to: DVec2) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Rgba) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn push_transform(&mut self, offset: DVec2, angle: f64) {
        self.commands.push(DrawCommand::PushTransform { offset, angle });
    }

    fn pop_transform(&mut self) {
        self.commands.push(DrawCommand::PopTransform);
    }
}
