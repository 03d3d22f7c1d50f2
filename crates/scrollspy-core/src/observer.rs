#![forbid(unsafe_code)]

//! Section visibility observation against the activation band.
//!
//! [`SectionObserver`] watches the registered sections' rects relative to
//! the activation band and reports every entry and exit transition as an
//! [`IntersectionReport`], mirroring how a platform intersection primitive
//! fires only on visibility changes rather than on every scrolled pixel.
//!
//! # Design
//!
//! - `observe` (re-)registers the watched set from a [`SectionRegistry`]
//!   and adopts that registry's epoch; all previous visibility state is
//!   dropped, so a re-registration also re-baselines transitions.
//! - `scan` diffs each watched section's current band intersection against
//!   its last known state and emits one report per transition. Sections
//!   with no mounted position are simply never reported.
//! - `intersecting` returns the full current in-band candidate set with
//!   fresh top offsets, which is what the resolver consumes.
//! - `disconnect` releases every watch; a disconnected observer scans to
//!   nothing until `observe` is called again.

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::geometry::ActivationBand;
use crate::layout::DocumentLayout;
use crate::registry::{SectionId, SectionRegistry};

/// Inline capacity for per-scan report batches. Few sections transition in
/// any single frame even on a long document.
pub const REPORT_BATCH_INLINE: usize = 8;

/// A batch of intersection reports produced by one scan.
pub type ReportBatch = SmallVec<[IntersectionReport; REPORT_BATCH_INLINE]>;

/// One visibility-change notification for one section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionReport {
    /// The section whose visibility changed.
    pub id: SectionId,
    /// Document order of the section at registration time.
    pub order: usize,
    /// Whether the section now overlaps the activation band.
    pub is_intersecting: bool,
    /// Offset of the section's top edge relative to the band's top edge,
    /// at scan time. Negative once the top has scrolled past the band.
    pub top_offset_px: f64,
    /// Registration epoch the report belongs to. Consumers drop reports
    /// from superseded epochs.
    pub epoch: u64,
}

/// Watches sections against the activation band and reports transitions.
#[derive(Debug, Clone)]
pub struct SectionObserver {
    band: ActivationBand,
    watched: Vec<SectionId>,
    was_intersecting: AHashMap<SectionId, bool>,
    epoch: u64,
    connected: bool,
}

impl SectionObserver {
    /// Create an observer with the given band and nothing watched yet.
    #[must_use]
    pub fn new(band: ActivationBand) -> Self {
        Self {
            band,
            watched: Vec::new(),
            was_intersecting: AHashMap::new(),
            epoch: 0,
            connected: false,
        }
    }

    /// The configured activation band.
    #[must_use]
    pub fn band(&self) -> ActivationBand {
        self.band
    }

    /// Registration epoch of the currently watched set.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the observer currently holds any watches.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// (Re-)register the watched set from the registry, adopting its epoch.
    ///
    /// Clears all per-section visibility state: the next `scan` re-baselines
    /// and reports an entry for every section already inside the band.
    pub fn observe(&mut self, registry: &SectionRegistry) {
        self.watched = registry.ids().to_vec();
        self.was_intersecting.clear();
        self.epoch = registry.epoch();
        self.connected = true;
        tracing::trace!(
            epoch = self.epoch,
            watched = self.watched.len(),
            "observer registered"
        );
    }

    /// Release all watches. Scans return nothing until `observe` is called
    /// again.
    pub fn disconnect(&mut self) {
        self.watched.clear();
        self.was_intersecting.clear();
        self.connected = false;
        tracing::trace!("observer disconnected");
    }

    /// Diff watched sections against the band and emit a report for every
    /// entry and exit transition.
    pub fn scan<L: DocumentLayout>(&mut self, layout: &L) -> ReportBatch {
        let mut reports = ReportBatch::new();
        if !self.connected {
            return reports;
        }

        let scroll_top = layout.scroll_top();
        let viewport_h = layout.viewport_height();

        for (order, id) in self.watched.iter().enumerate() {
            let Some(top) = layout.section_top(id.as_str()) else {
                // Not mounted. If it was visible before it effectively left
                // the band, so report the exit once.
                if self.was_intersecting.insert(id.clone(), false) == Some(true) {
                    reports.push(IntersectionReport {
                        id: id.clone(),
                        order,
                        is_intersecting: false,
                        top_offset_px: 0.0,
                        epoch: self.epoch,
                    });
                }
                continue;
            };
            let height = layout.section_height(id.as_str()).unwrap_or(0.0);
            let viewport_top = top - scroll_top;
            let now = self.band.intersects(viewport_top, height, viewport_h);
            let before = self.was_intersecting.insert(id.clone(), now).unwrap_or(false);
            if now != before {
                reports.push(IntersectionReport {
                    id: id.clone(),
                    order,
                    is_intersecting: now,
                    top_offset_px: self.band.top_offset_px(viewport_top, viewport_h),
                    epoch: self.epoch,
                });
            }
        }

        if !reports.is_empty() {
            tracing::trace!(transitions = reports.len(), "visibility transitions");
        }
        reports
    }

    /// The current in-band candidate set, with fresh top offsets.
    ///
    /// Every returned report has `is_intersecting = true`. Offsets are
    /// recomputed from the layout at call time, so candidates that never
    /// transitioned this frame still carry up-to-date positions.
    #[must_use]
    pub fn intersecting<L: DocumentLayout>(&self, layout: &L) -> ReportBatch {
        let mut candidates = ReportBatch::new();
        if !self.connected {
            return candidates;
        }

        let scroll_top = layout.scroll_top();
        let viewport_h = layout.viewport_height();

        for (order, id) in self.watched.iter().enumerate() {
            let Some(top) = layout.section_top(id.as_str()) else {
                continue;
            };
            let height = layout.section_height(id.as_str()).unwrap_or(0.0);
            let viewport_top = top - scroll_top;
            if self.band.intersects(viewport_top, height, viewport_h) {
                candidates.push(IntersectionReport {
                    id: id.clone(),
                    order,
                    is_intersecting: true,
                    top_offset_px: self.band.top_offset_px(viewport_top, viewport_h),
                    epoch: self.epoch,
                });
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sections stacked vertically with fixed heights.
    struct StackLayout {
        sections: Vec<(&'static str, f64)>,
        viewport: f64,
        scroll: f64,
    }

    impl StackLayout {
        fn new(sections: Vec<(&'static str, f64)>, viewport: f64) -> Self {
            Self {
                sections,
                viewport,
                scroll: 0.0,
            }
        }
    }

    impl DocumentLayout for StackLayout {
        fn section_top(&self, id: &str) -> Option<f64> {
            let mut top = 0.0;
            for (sid, height) in &self.sections {
                if *sid == id {
                    return Some(top);
                }
                top += height;
            }
            None
        }
        fn section_height(&self, id: &str) -> Option<f64> {
            self.sections
                .iter()
                .find(|(sid, _)| *sid == id)
                .map(|(_, h)| *h)
        }
        fn viewport_height(&self) -> f64 {
            self.viewport
        }
        fn document_height(&self) -> f64 {
            self.sections.iter().map(|(_, h)| h).sum()
        }
        fn scroll_top(&self) -> f64 {
            self.scroll
        }
        fn set_scroll_top(&mut self, px: f64) {
            self.scroll = px.clamp(0.0, self.max_scroll());
        }
    }

    fn five_sections() -> StackLayout {
        StackLayout::new(
            vec![
                ("intro", 1000.0),
                ("p1", 1000.0),
                ("p2", 1000.0),
                ("p3", 1000.0),
                ("reference", 1000.0),
            ],
            800.0,
        )
    }

    fn observer_for(layout_ids: &[&str]) -> (SectionObserver, SectionRegistry) {
        let registry = SectionRegistry::from_ids(layout_ids.iter().copied());
        let mut observer = SectionObserver::new(ActivationBand::default());
        observer.observe(&registry);
        (observer, registry)
    }

    #[test]
    fn first_scan_reports_initial_entries() {
        let layout = five_sections();
        let (mut observer, _) = observer_for(&["intro", "p1", "p2", "p3", "reference"]);

        let reports = observer.scan(&layout);
        // At scroll 0 only `intro` occupies the band.
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, *"intro");
        assert!(reports[0].is_intersecting);
        assert_eq!(reports[0].order, 0);
    }

    #[test]
    fn scan_reports_exit_and_entry_on_scroll() {
        let mut layout = five_sections();
        let (mut observer, _) = observer_for(&["intro", "p1", "p2", "p3", "reference"]);
        observer.scan(&layout);

        // Scroll so intro's tail leaves the band and p1 fills it.
        layout.set_scroll_top(1100.0);
        let reports = observer.scan(&layout);
        let exited: Vec<_> = reports.iter().filter(|r| !r.is_intersecting).collect();
        let entered: Vec<_> = reports.iter().filter(|r| r.is_intersecting).collect();
        assert_eq!(exited.len(), 1);
        assert_eq!(exited[0].id, *"intro");
        assert_eq!(entered.len(), 1);
        assert_eq!(entered[0].id, *"p1");
    }

    #[test]
    fn no_transitions_means_empty_scan() {
        let mut layout = five_sections();
        let (mut observer, _) = observer_for(&["intro", "p1", "p2", "p3", "reference"]);
        observer.scan(&layout);
        layout.set_scroll_top(10.0); // intro still alone in the band
        assert!(observer.scan(&layout).is_empty());
    }

    #[test]
    fn unmounted_sections_are_never_reported() {
        let layout = five_sections();
        let (mut observer, _) = observer_for(&["intro", "ghost", "p1"]);
        let reports = observer.scan(&layout);
        assert!(reports.iter().all(|r| r.id != *"ghost"));
    }

    #[test]
    fn section_unmounting_while_visible_reports_exit() {
        let mut layout = five_sections();
        let (mut observer, _) = observer_for(&["intro", "p1"]);
        observer.scan(&layout);

        layout.sections.retain(|(id, _)| *id != "intro");
        let reports = observer.scan(&layout);
        let exit = reports.iter().find(|r| r.id == *"intro");
        assert!(exit.is_some_and(|r| !r.is_intersecting));
    }

    #[test]
    fn intersecting_returns_current_candidates_with_offsets() {
        let mut layout = five_sections();
        let (mut observer, _) = observer_for(&["intro", "p1", "p2", "p3", "reference"]);
        observer.scan(&layout);

        // Both intro's tail and p1 overlap the band at this offset.
        layout.set_scroll_top(964.0);
        let candidates = observer.intersecting(&layout);
        let ids: Vec<_> = candidates.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "p1"]);
        assert!(candidates[0].top_offset_px < candidates[1].top_offset_px);
        assert!(candidates.iter().all(|r| r.is_intersecting));
    }

    #[test]
    fn reregistration_rebaselines_and_adopts_epoch() {
        let layout = five_sections();
        let registry = SectionRegistry::from_ids(["intro", "p1"]);
        let mut observer = SectionObserver::new(ActivationBand::default());
        observer.observe(&registry);
        observer.scan(&layout);

        let mut registry = registry;
        registry.register(["p1", "p2"]);
        observer.observe(&registry);
        assert_eq!(observer.epoch(), 2);
        // Re-baselined: no state remains for intro.
        let reports = observer.scan(&layout);
        assert!(reports.iter().all(|r| r.id != *"intro"));
    }

    #[test]
    fn disconnected_observer_scans_to_nothing() {
        let layout = five_sections();
        let (mut observer, _) = observer_for(&["intro", "p1"]);
        observer.scan(&layout);
        observer.disconnect();
        assert!(!observer.is_connected());
        assert!(observer.scan(&layout).is_empty());
        assert!(observer.intersecting(&layout).is_empty());
    }

    #[test]
    fn reports_carry_registration_epoch() {
        let layout = five_sections();
        let mut registry = SectionRegistry::from_ids(["intro"]);
        registry.register(["intro", "p1"]);
        let mut observer = SectionObserver::new(ActivationBand::default());
        observer.observe(&registry);
        let reports = observer.scan(&layout);
        assert!(reports.iter().all(|r| r.epoch == 2));
    }
}
