#![forbid(unsafe_code)]

//! Active-section resolution.
//!
//! Collapses the current in-band candidate set into exactly one active
//! section id.
//!
//! # Design
//!
//! - Candidates are ranked by ascending `top_offset_px`; exact ties break to
//!   the smaller document order. The rule is a total order over candidates,
//!   so the same inputs always resolve the same way.
//! - An empty candidate set retains the previously resolved id: during fast
//!   scroll transitions nothing may instantaneously satisfy the band, and
//!   flickering to "unset" would make the sidebar blink.
//! - With debounce enabled (the default), a winner that differs from the
//!   current active id must win two consecutive resolutions before it is
//!   applied. This keeps the active id from oscillating when two adjacent
//!   sections trade near-equal offsets at a boundary. The first-ever
//!   resolution commits immediately so the page never sits unset while the
//!   reader can already see content.

use crate::observer::IntersectionReport;
use crate::registry::SectionId;

/// Tuning for [`ActiveResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Require a differing winner to persist across two consecutive
    /// resolutions before it becomes active.
    pub debounce: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { debounce: true }
    }
}

/// Deterministic resolver from candidate sets to one active section id.
#[derive(Debug, Clone, Default)]
pub struct ActiveResolver {
    config: ResolverConfig,
    active: Option<SectionId>,
    pending: Option<SectionId>,
}

impl ActiveResolver {
    /// Create a resolver with the given configuration.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            active: None,
            pending: None,
        }
    }

    /// Create a resolver with default configuration (debounce on).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ResolverConfig::default())
    }

    /// The currently resolved active id, `None` before the first
    /// resolution.
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Forget the resolved id and any pending candidate. Used when the
    /// active section disappears from the registered set.
    pub fn clear(&mut self) {
        self.active = None;
        self.pending = None;
    }

    /// Resolve the current candidate set. Returns `true` if the active id
    /// changed.
    ///
    /// Candidates with `is_intersecting = false` are ignored, so the full
    /// report batch of a scan can be passed through unfiltered.
    pub fn resolve(&mut self, candidates: &[IntersectionReport]) -> bool {
        let Some(winner) = Self::winner(candidates) else {
            // Nothing satisfies the band: retain the previous id, and drop
            // any pending candidate since nothing confirms it.
            self.pending = None;
            return false;
        };

        if self.active.as_ref() == Some(&winner.id) {
            self.pending = None;
            return false;
        }

        if !self.config.debounce || self.active.is_none() {
            tracing::debug!(active = %winner.id, "active section resolved");
            self.active = Some(winner.id.clone());
            self.pending = None;
            return true;
        }

        if self.pending.as_ref() == Some(&winner.id) {
            tracing::debug!(active = %winner.id, "active section resolved (confirmed)");
            self.active = self.pending.take();
            return true;
        }

        self.pending = Some(winner.id.clone());
        false
    }

    /// Pick the highest-ranked intersecting candidate: smallest
    /// `top_offset_px`, ties to the smallest `order`.
    fn winner(candidates: &[IntersectionReport]) -> Option<&IntersectionReport> {
        candidates
            .iter()
            .filter(|c| c.is_intersecting)
            .min_by(|a, b| {
                a.top_offset_px
                    .total_cmp(&b.top_offset_px)
                    .then(a.order.cmp(&b.order))
            })
    }
}
