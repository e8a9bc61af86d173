#![deny(unsafe_code)]
//! Core types for huahua, a pair of progressively drawn generative sketches.
//!
//! Provides the `Sketch` trait, the `Surface` drawing primitives, the
//! resumable `StrokePath` renderer, frame pacing (`SpeedLevel`, `Pacer`),
//! planar geometry, `Rgba`/`Palette`, the `Xorshift64` PRNG behind the
//! `RandomSource` trait, `Seed` records, and params helpers.

pub mod color;
pub mod error;
pub mod geometry;
pub mod pacing;
pub mod palette;
pub mod params;
pub mod prng;
pub mod seed;
pub mod sketch;
pub mod stroke;
pub mod surface;

pub use color::Rgba;
pub use error::SketchError;
pub use geometry::{Rect, Segment, Viewport};
pub use glam::DVec2;
pub use pacing::{Pacer, SpeedLevel, SpeedProfile};
pub use palette::Palette;
pub use prng::{RandomSource, Xorshift64};
pub use seed::Seed;
pub use sketch::{Credits, FrameStatus, Sketch};
pub use stroke::{StrokePath, StrokeState};
pub use surface::{DrawCommand, LineCap, LineJoin, RecordingSurface, StrokeStyle, Surface};
