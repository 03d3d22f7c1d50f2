#![forbid(unsafe_code)]

//! Activation-band geometry.
//!
//! The activation band is the vertical strip of the viewport a reader's eye
//! actually rests on while reading. A section counts as "visible" for
//! activation purposes only while its rect overlaps that strip, not merely
//! while it is anywhere on screen.
//!
//! The band is expressed as two inset fractions of the viewport height: for
//! a viewport of height `h`, the band spans
//! `[h * top_inset_pct, h * (1.0 - bottom_inset_pct))`. The default band is
//! the top 30% of the viewport (`top_inset_pct = 0.0`,
//! `bottom_inset_pct = 0.70`), so the band reaches the viewport's top edge
//! and a section that still pokes into the top of the screen keeps competing
//! for activation.

/// The vertical strip of the viewport used for section activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationBand {
    /// Fraction of the viewport height excluded above the band (0.0–1.0).
    pub top_inset_pct: f64,
    /// Fraction of the viewport height excluded below the band (0.0–1.0).
    pub bottom_inset_pct: f64,
}

impl Default for ActivationBand {
    fn default() -> Self {
        Self {
            top_inset_pct: 0.0,
            bottom_inset_pct: 0.70,
        }
    }
}

impl ActivationBand {
    /// Create a band from inset fractions. Each inset is clamped to
    /// `[0.0, 1.0]`; insets that sum to 1.0 or more produce an empty band.
    #[must_use]
    pub fn new(top_inset_pct: f64, bottom_inset_pct: f64) -> Self {
        Self {
            top_inset_pct: top_inset_pct.clamp(0.0, 1.0),
            bottom_inset_pct: bottom_inset_pct.clamp(0.0, 1.0),
        }
    }

    /// Band top edge in viewport pixels (inclusive).
    #[must_use]
    pub fn top_px(&self, viewport_height: f64) -> f64 {
        viewport_height.max(0.0) * self.top_inset_pct
    }

    /// Band bottom edge in viewport pixels (exclusive).
    #[must_use]
    pub fn bottom_px(&self, viewport_height: f64) -> f64 {
        viewport_height.max(0.0) * (1.0 - self.bottom_inset_pct)
    }

    /// Whether the band has zero (or negative) extent for this viewport.
    #[must_use]
    pub fn is_empty(&self, viewport_height: f64) -> bool {
        self.bottom_px(viewport_height) <= self.top_px(viewport_height)
    }

    /// Whether a section rect, given in viewport-relative coordinates,
    /// overlaps the band. Intervals are half-open: a section whose bottom
    /// edge sits exactly on the band top does not intersect.
    #[must_use]
    pub fn intersects(&self, viewport_top: f64, height: f64, viewport_height: f64) -> bool {
        if self.is_empty(viewport_height) || height <= 0.0 {
            return false;
        }
        let band_top = self.top_px(viewport_height);
        let band_bottom = self.bottom_px(viewport_height);
        // The inset products carry sub-pixel float residue (800 * 0.30 lands
        // a hair above 240). Comparisons absorb it so the half-open
        // boundaries hold for exact pixel inputs.
        let slack = viewport_height * f64::EPSILON * 4.0;
        viewport_top < band_bottom - slack && viewport_top + height > band_top + slack
    }

    /// Offset of a section's top edge relative to the band's top edge.
    /// Negative while the section top has already scrolled past the band.
    #[must_use]
    pub fn top_offset_px(&self, viewport_top: f64, viewport_height: f64) -> f64 {
        viewport_top - self.top_px(viewport_height)
    }
}
