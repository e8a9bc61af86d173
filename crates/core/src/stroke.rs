//! Incremental stroke renderer.
//!
//! A [`StrokePath`] is an ordered list of straight segments plus a cursor
//! (segment index, distance into that segment). Each frame the owner hands it
//! a distance budget; [`StrokePath::advance`] draws exactly that much more of
//! the path and remembers where it stopped, so the finished drawing is the
//! same no matter how the budget was chunked across frames.

use glam::DVec2;

use crate::geometry::Segment;
use crate::surface::{StrokeStyle, Surface};

/// Where the cursor of a [`StrokePath`] sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    /// Nothing drawn yet.
    Pending,
    /// Partly drawn.
    Advancing,
    /// Every segment has been drawn or skipped.
    Complete,
}

/// A resumable path drawn a little at a time.
#[derive(Debug, Clone, Default)]
pub struct StrokePath {
    segments: Vec<Segment>,
    index: usize,
    progress: f64,
    drawn: f64,
}

impl StrokePath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            index: 0,
            progress: 0.0,
            drawn: 0.0,
        }
    }

    /// Path along the closed polygon through `points`.
    pub fn closed(points: &[DVec2]) -> Self {
        Self::new(
            crate::geometry::closed_edges(points)
                .map(|(a, b)| Segment::new(a, b))
                .collect(),
        )
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Sum of all segment lengths, degenerate ones included.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// Distance consumed so far.
    pub fn drawn_length(&self) -> f64 {
        self.drawn
    }

    /// `(segment index, distance into segment)`.
    pub fn cursor(&self) -> (usize, f64) {
        (self.index, self.progress)
    }

    pub fn state(&self) -> StrokeState {
        if self.index >= self.segments.len() {
            StrokeState::Complete
        } else if self.index == 0 && self.progress == 0.0 {
            StrokeState::Pending
        } else {
            StrokeState::Advancing
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.segments.len()
    }

    /// Rewinds the cursor to the start.
    pub fn reset(&mut self) {
        self.index = 0;
        self.progress = 0.0;
        self.drawn = 0.0;
    }

    /// Draws up to `budget` more units of the path and returns how much was used.
    ///
    /// `brush` is asked for a style before every partial line, so callers can
    /// jitter width or color per stroke. Degenerate segments are skipped
    /// without using budget. Returns 0 once the path is complete, or for a
    /// non-positive / NaN budget.
    pub fn advance<B>(&mut self, budget: f64, surface: &mut dyn Surface, mut brush: B) -> f64
    where
        B: FnMut() -> StrokeStyle,
    {
        let mut budget = if budget.is_nan() { 0.0 } else { budget };
        let mut consumed = 0.0;

        while budget > 0.0 && self.index < self.segments.len() {
            let segment = self.segments[self.index];
            if segment.is_degenerate() {
                self.next_segment();
                continue;
            }

            let remaining = segment.length - self.progress;
            let step = remaining.min(budget);
            let finishes = step >= remaining;
            let next = if finishes {
                segment.length
            } else {
                self.progress + step
            };

            surface.set_stroke(&brush());
            surface.line(segment.point_at(self.progress), segment.point_at(next));

            budget -= step;
            consumed += step;

            if finishes {
                self.next_segment();
            } else {
                self.progress = next;
            }
        }

        // Trailing degenerate segments would otherwise keep the path open forever.
        while self
            .segments
            .get(self.index)
            .is_some_and(Segment::is_degenerate)
        {
            self.next_segment();
        }

        self.drawn += consumed;
        consumed
    }

    fn next_segment(&mut self) {
        self.index += 1;
        self.progress = 0.0;
    }
}
