//! Owns the active sketch and feeds it one frame at a time.
//!
//! The host (browser loop, CLI render loop) calls [`FrameDriver::frame`] once
//! per tick. Pointer presses and viewport changes throw away all sketch state
//! and start a fresh composition; nothing partial carries over.

use huahua_core::geometry::Viewport;
use huahua_core::pacing::{Pacer, SpeedLevel};
use huahua_core::sketch::{FrameStatus, Sketch};
use huahua_core::surface::Surface;
use tracing::{debug, trace};

use crate::SketchKind;

pub struct FrameDriver<S: Sketch = SketchKind> {
    sketch: S,
    viewport: Viewport,
    pacer: Pacer,
    frame: u64,
    status: FrameStatus,
}

impl<S: Sketch> FrameDriver<S> {
    /// Takes ownership of `sketch` and lays out its first composition.
    pub fn new(mut sketch: S, viewport: Viewport, surface: &mut dyn Surface) -> Self {
        sketch.regenerate(viewport, surface);
        Self {
            sketch,
            viewport,
            pacer: Pacer::default(),
            frame: 0,
            status: FrameStatus::Running,
        }
    }

    /// Advances the sketch by one frame.
    ///
    /// Once the sketch reports `Finished` it is no longer advanced until the
    /// next regeneration.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> FrameStatus {
        if self.status == FrameStatus::Finished {
            return FrameStatus::Finished;
        }
        self.frame += 1;
        self.status = self.sketch.advance_frame(self.frame, &self.pacer, surface);
        if self.status == FrameStatus::Finished {
            debug!(sketch = self.sketch.name(), frame = self.frame, "sketch finished");
        } else {
            trace!(frame = self.frame, "frame drawn");
        }
        self.status
    }

    /// Starts a new composition for the same viewport.
    pub fn pointer_pressed(&mut self, surface: &mut dyn Surface) {
        self.regenerate(surface);
    }

    /// Starts a new composition for a resized viewport.
    pub fn resize(&mut self, viewport: Viewport, surface: &mut dyn Surface) {
        self.viewport = viewport;
        self.regenerate(surface);
    }

    pub fn set_speed(&mut self, level: SpeedLevel) {
        self.pacer.set_level(level);
    }

    pub fn speed(&self) -> SpeedLevel {
        self.pacer.level()
    }

    /// Frames advanced since the driver was created.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn status(&self) -> FrameStatus {
        self.status
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn sketch(&self) -> &S {
        &self.sketch
    }

    /// Runs frames until the sketch finishes or `max_frames` more frames have
    /// been drawn. Returns the number of frames drawn by this call.
    pub fn run_until_finished(&mut self, surface: &mut dyn Surface, max_frames: Option<u64>) -> u64 {
        let mut drawn = 0;
        while self.status == FrameStatus::Running && max_frames.map_or(true, |max| drawn < max) {
            self.frame(surface);
            drawn += 1;
        }
        drawn
    }

    fn regenerate(&mut self, surface: &mut dyn Surface) {
        self.sketch.regenerate(self.viewport, surface);
        self.status = FrameStatus::Running;
    }
}
