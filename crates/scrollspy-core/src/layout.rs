#![forbid(unsafe_code)]

//! The seam between the scroll-sync engine and the host document.
//!
//! The engine never touches a DOM directly. Everything it needs from the
//! rendered page — section positions, scrollable geometry, the current
//! scroll offset — comes through [`DocumentLayout`], and the one mutation it
//! performs (applying an animated scroll step) goes back through the same
//! trait. Production hosts back this with real element measurements; tests
//! back it with a simulated document and get byte-for-byte deterministic
//! behavior.

/// Read/write access to the host document's vertical geometry.
///
/// All distances are CSS-pixel `f64`s in document space: `section_top(id)`
/// is the distance from the document top to the section's top edge.
///
/// A section that is not currently mounted (filtered out of the render
/// tree, or not yet rendered) reports `None` from [`Self::section_top`] and
/// [`Self::section_height`]; that is a normal condition, not an error.
pub trait DocumentLayout {
    /// Top edge of the section in document space, if mounted.
    fn section_top(&self, id: &str) -> Option<f64>;

    /// Rendered height of the section, if mounted.
    fn section_height(&self, id: &str) -> Option<f64>;

    /// Height of the visible viewport.
    fn viewport_height(&self) -> f64;

    /// Total scrollable height of the document.
    fn document_height(&self) -> f64;

    /// Current vertical scroll offset.
    fn scroll_top(&self) -> f64;

    /// Apply a new vertical scroll offset. Hosts clamp to their own
    /// scrollable range.
    fn set_scroll_top(&mut self, px: f64);

    /// Maximum meaningful scroll offset (zero when the content is shorter
    /// than the viewport).
    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height()).max(0.0)
    }
}
