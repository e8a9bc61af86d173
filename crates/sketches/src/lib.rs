#![deny(unsafe_code)]
//! Sketch registry: maps sketch names to implementations, drives them frame
//! by frame, and rasterizes the result on the CPU.
//!
//! This crate sits between `huahua-core` (which defines the `Sketch` trait)
//! and the individual sketch crates (`huahua-mondrian`, `huahua-pebbles`).
//! Both the CLI and WASM bindings depend on it to avoid duplicating dispatch.

pub mod driver;
pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

pub use driver::FrameDriver;
pub use raster::RasterSurface;

use huahua_core::color::Rgba;
use huahua_core::error::SketchError;
use huahua_core::geometry::Viewport;
use huahua_core::pacing::Pacer;
use huahua_core::seed::Seed;
use huahua_core::sketch::{Credits, FrameStatus, Sketch};
use huahua_core::surface::Surface;
use huahua_mondrian::Mondrian;
use huahua_pebbles::Pebbles;
use serde_json::Value;

/// All available sketch names.
const SKETCH_NAMES: &[&str] = &["mondrian", "pebbles"];

/// Enumeration of all available sketches.
///
/// Wraps each implementation and delegates `Sketch` trait methods.
/// Use [`SketchKind::from_name`] for string-based construction (CLI, WASM).
pub enum SketchKind {
    /// Rectangular partition with hatched fills.
    Mondrian(Mondrian),
    /// Pebble cluster grown from the center.
    Pebbles(Pebbles),
}

impl SketchKind {
    /// Constructs a sketch by name.
    ///
    /// Names are matched case-insensitively. Returns
    /// `SketchError::UnknownSketch` if the name is not recognized.
    pub fn from_name(name: &str, seed: u64, params: &Value) -> Result<Self, SketchError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mondrian" | "mondriaan" => Ok(SketchKind::Mondrian(Mondrian::from_json(seed, params))),
            "pebbles" => Ok(SketchKind::Pebbles(Pebbles::from_json(seed, params))),
            _ => Err(SketchError::UnknownSketch(name.to_string())),
        }
    }

    /// Constructs the sketch a [`Seed`] record names, with its params.
    pub fn from_seed(seed: &Seed) -> Result<Self, SketchError> {
        Self::from_name(&seed.sketch, seed.seed, &seed.params)
    }

    /// Returns a slice of all recognized sketch names.
    pub fn list_sketches() -> &'static [&'static str] {
        SKETCH_NAMES
    }
}

impl Sketch for SketchKind {
    fn name(&self) -> &'static str {
        match self {
            SketchKind::Mondrian(s) => s.name(),
            SketchKind::Pebbles(s) => s.name(),
        }
    }

    fn background(&self) -> Rgba {
        match self {
            SketchKind::Mondrian(s) => s.background(),
            SketchKind::Pebbles(s) => s.background(),
        }
    }

    fn regenerate(&mut self, viewport: Viewport, surface: &mut dyn Surface) {
        match self {
            SketchKind::Mondrian(s) => s.regenerate(viewport, surface),
            SketchKind::Pebbles(s) => s.regenerate(viewport, surface),
        }
    }

    fn advance_frame(&mut self, frame_index: u64, pacer: &Pacer, surface: &mut dyn Surface) -> FrameStatus {
        match self {
            SketchKind::Mondrian(s) => s.advance_frame(frame_index, pacer, surface),
            SketchKind::Pebbles(s) => s.advance_frame(frame_index, pacer, surface),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            SketchKind::Mondrian(s) => s.is_finished(),
            SketchKind::Pebbles(s) => s.is_finished(),
        }
    }

    fn params(&self) -> Value {
        match self {
            SketchKind::Mondrian(s) => s.params(),
            SketchKind::Pebbles(s) => s.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            SketchKind::Mondrian(s) => s.param_schema(),
            SketchKind::Pebbles(s) => s.param_schema(),
        }
    }

    fn credits(&self) -> Option<Credits> {
        match self {
            SketchKind::Mondrian(s) => s.credits(),
            SketchKind::Pebbles(s) => s.credits(),
        }
    }
}
