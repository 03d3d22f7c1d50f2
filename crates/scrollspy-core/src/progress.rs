#![forbid(unsafe_code)]

//! Reading progress from raw scroll geometry.
//!
//! Progress is the normalized scroll position over the scrollable distance:
//! `100 * scroll_top / (document_height - viewport_height)`, clamped to
//! `[0, 100]`. Clamping absorbs elastic overscroll and fractional rounding;
//! the denominator guard keeps shorter-than-viewport documents at 0 instead
//! of producing NaN or infinity.
//!
//! The tracker must be fed on every scroll tick and additionally whenever
//! the document height changes without a scroll event (collapsible content
//! expanding, sections filtered out of the render tree).

/// Tracks the normalized 0–100 reading progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressTracker {
    percent: f64,
}

impl ProgressTracker {
    /// Create a tracker at 0%.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last computed progress percentage.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Recompute progress from raw geometry. Returns the new percentage.
    pub fn update(&mut self, scroll_top: f64, viewport_height: f64, document_height: f64) -> f64 {
        let scrollable = document_height - viewport_height;
        let percent = if scrollable <= 0.0 {
            0.0
        } else {
            (100.0 * scroll_top / scrollable.max(1.0)).clamp(0.0, 100.0)
        };
        // NaN inputs (uninitialized layout reads) degrade to 0 rather than
        // poisoning the published state.
        self.percent = if percent.is_finite() { percent } else { 0.0 };
        self.percent
    }
}
