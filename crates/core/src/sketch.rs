//! The `Sketch` trait every composition style implements.
//!
//! The trait is object-safe so a frame driver can hold `Box<dyn Sketch>` or a
//! tagged enum and switch styles at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgba;
use crate::geometry::Viewport;
use crate::pacing::Pacer;
use crate::surface::Surface;

/// Result of advancing a sketch by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// More frames are needed.
    Running,
    /// The composition is fully drawn; stop the loop until regeneration.
    Finished,
}

/// Attribution shown by the chrome for the active composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub title: String,
    pub author: String,
    pub url: String,
}

impl Credits {
    pub fn new(title: impl Into<String>, author: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            url: url.into(),
        }
    }

    /// URL shortened for display: scheme and `www.` stripped, then cut to
    /// `max_len` characters with a trailing `...`.
    pub fn display_url(&self, max_len: usize) -> String {
        let lower = self.url.to_ascii_lowercase();
        let mut rest = self.url.as_str();
        for scheme in ["https://", "http://"] {
            if lower.starts_with(scheme) {
                rest = &rest[scheme.len()..];
                break;
            }
        }
        if rest.to_ascii_lowercase().starts_with("www.") {
            rest = &rest[4..];
        }

        if rest.chars().count() <= max_len {
            return rest.to_string();
        }
        let keep = max_len.saturating_sub(3);
        let mut shortened: String = rest.chars().take(keep).collect();
        shortened.push_str("...");
        shortened
    }
}

/// A generative composition animated frame by frame.
///
/// Lifecycle: [`regenerate`](Sketch::regenerate) builds a fresh layout for a
/// viewport and clears the surface; [`advance_frame`](Sketch::advance_frame)
/// then reveals it progressively until it reports
/// [`FrameStatus::Finished`].
pub trait Sketch {
    /// Registry name, e.g. `"mondrian"`.
    fn name(&self) -> &'static str;

    /// Color the surface is cleared to on regeneration.
    fn background(&self) -> Rgba;

    /// Discards all state and lays out a new composition for `viewport`.
    fn regenerate(&mut self, viewport: Viewport, surface: &mut dyn Surface);

    /// Draws this frame's share of the composition.
    ///
    /// `frame_index` is 1-based and counts frames since the driver started.
    fn advance_frame(
        &mut self,
        frame_index: u64,
        pacer: &Pacer,
        surface: &mut dyn Surface,
    ) -> FrameStatus;

    /// True once nothing more will be drawn before the next regeneration.
    fn is_finished(&self) -> bool;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Parameter schema: type, default, range and description per key.
    fn param_schema(&self) -> Value;

    /// Attribution for the chrome, if the style has one.
    fn credits(&self) -> Option<Credits> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use serde_json::json;

    /// Draws one frame per unit of `length`, then finishes.
    struct Countdown {
        remaining: u32,
        length: u32,
    }

    impl Sketch for Countdown {
        fn name(&self) -> &'static str {
            "countdown"
        }

        fn background(&self) -> Rgba {
            Rgba::rgb(255, 255, 255)
        }

        fn regenerate(&mut self, _viewport: Viewport, surface: &mut dyn Surface) {
            surface.clear(self.background());
            self.remaining = self.length;
        }

        fn advance_frame(&mut self, _frame: u64, _pacer: &Pacer, _surface: &mut dyn Surface) -> FrameStatus {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                FrameStatus::Finished
            } else {
                FrameStatus::Running
            }
        }

        fn is_finished(&self) -> bool {
            self.remaining == 0
        }

        fn params(&self) -> Value {
            json!({"length": self.length})
        }

        fn param_schema(&self) -> Value {
            json!({"length": {"type": "integer", "default": 3}})
        }
    }

    #[test]
    fn sketch_trait_is_object_safe() {
        let mut sketch: Box<dyn Sketch> = Box::new(Countdown { remaining: 0, length: 2 });
        let mut surface = RecordingSurface::new();
        let viewport = Viewport::new(10.0, 10.0).unwrap();
        sketch.regenerate(viewport, &mut surface);
        let pacer = Pacer::default();
        assert_eq!(sketch.advance_frame(1, &pacer, &mut surface), FrameStatus::Running);
        assert_eq!(sketch.advance_frame(2, &pacer, &mut surface), FrameStatus::Finished);
        assert!(sketch.is_finished());
        assert!(sketch.credits().is_none());
        assert_eq!(sketch.params()["length"], 2);
    }

    #[test]
    fn display_url_strips_scheme_and_www() {
        let c = Credits::new("t", "a", "https://www.example.org/x");
        assert_eq!(c.display_url(40), "example.org/x");
        let plain = Credits::new("t", "a", "HTTP://example.org");
        assert_eq!(plain.display_url(40), "example.org");
    }

    #[test]
    fn display_url_truncates_with_ellipsis() {
        let c = Credits::new(
            "t",
            "a",
            "https://www.kunstmuseum.nl/en/collection/composition-large-red-plane",
        );
        let shown = c.display_url(40);
        assert_eq!(shown.chars().count(), 40);
        assert!(shown.ends_with("..."));
        assert!(shown.starts_with("kunstmuseum.nl/en/"));
    }

    #[test]
    fn display_url_empty() {
        assert_eq!(Credits::new("", "", "").display_url(10), "");
    }

    #[test]
    fn credits_roundtrip_json() {
        let c = Credits::new("Title", "Author", "https://example.org");
        let back: Credits = serde_json::from_str(&serde_json::to_string(&c).unwrap()).unwrap();
        assert_eq!(c, back);
    }
}
