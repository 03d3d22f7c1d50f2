#![forbid(unsafe_code)]

//! The scroll-sync controller.
//!
//! [`ScrollSyncController`] is the single owner of the published
//! [`SyncState`]. It registers sections with the observer, feeds raw scroll
//! and layout-change events into the progress tracker, runs the resolver
//! over the current candidate set, drives the navigation tween, and
//! republishes the combined snapshot whenever either field actually
//! changed.
//!
//! # Field ownership
//!
//! Two independent event streams write into the one shared record: the
//! resolver owns `active_section`, the tracker owns `progress_percent`.
//! The controller performs the two writes independently and publishes the
//! combined snapshot after either — there is no lock because everything
//! runs on the same cooperative event loop; the hazard is logical
//! inconsistency, not data corruption.
//!
//! # Lifecycle
//!
//! `teardown` disconnects the observer, drops all subscribers, and abandons
//! any in-flight tween. After teardown every mutating call is a no-op and
//! `state` keeps returning the last known snapshot.

use scrollspy_core::geometry::ActivationBand;
use scrollspy_core::layout::DocumentLayout;
use scrollspy_core::observer::SectionObserver;
use scrollspy_core::progress::ProgressTracker;
use scrollspy_core::registry::{SectionId, SectionRegistry};
use scrollspy_core::resolver::{ActiveResolver, ResolverConfig};

use crate::navigator::{NavStart, NavigatorConfig, ScrollNavigator};
use crate::publish::{StatePublisher, SubId};

/// Tuning for the whole controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerConfig {
    /// Activation band used for observation.
    pub band: ActivationBand,
    /// Resolver debounce policy.
    pub resolver: ResolverConfig,
    /// Navigation anchoring and tween timing.
    pub navigator: NavigatorConfig,
}

/// The one live snapshot the rest of the application reads.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncState {
    /// Currently active section, `None` before the first observation
    /// arrives. Always a member of the registered set otherwise.
    pub active_section: Option<SectionId>,
    /// Reading progress in `[0, 100]`.
    pub progress_percent: f64,
}

/// Result of a navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// An animated scroll toward the target began.
    Started,
    /// An in-flight animation was redirected to the new target.
    Retargeted,
    /// Already at (or animating toward) the target; nothing to do.
    AlreadyAtTarget,
    /// The id is not registered or not mounted. Silently absorbed: the
    /// scroll position is untouched.
    UnknownSection,
    /// The controller was torn down.
    TornDown,
}

/// Root coordinator: owns the state, wires observer, resolver, tracker,
/// and navigator together.
pub struct ScrollSyncController {
    registry: SectionRegistry,
    observer: SectionObserver,
    resolver: ActiveResolver,
    progress: ProgressTracker,
    navigator: ScrollNavigator,
    publisher: StatePublisher<SyncState>,
    state: SyncState,
    torn_down: bool,
}

impl std::fmt::Debug for ScrollSyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSyncController")
            .field("sections", &self.registry.len())
            .field("state", &self.state)
            .field("animating", &self.navigator.is_animating())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl ScrollSyncController {
    /// Create a controller and register the initial section list.
    #[must_use]
    pub fn new<I>(config: ControllerConfig, section_ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        let registry = SectionRegistry::from_ids(section_ids);
        let mut observer = SectionObserver::new(config.band);
        observer.observe(&registry);
        Self {
            registry,
            observer,
            resolver: ActiveResolver::new(config.resolver),
            progress: ProgressTracker::new(),
            navigator: ScrollNavigator::new(config.navigator),
            publisher: StatePublisher::new(),
            state: SyncState::default(),
            torn_down: false,
        }
    }

    /// Current snapshot. Still readable after teardown.
    #[must_use]
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// The registered section ids in document order.
    #[must_use]
    pub fn section_ids(&self) -> &[SectionId] {
        self.registry.ids()
    }

    /// Whether a navigation animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.navigator.is_animating()
    }

    /// Replace the registered section list (the rendered set changed).
    ///
    /// Bumps the registration epoch, re-baselines observation, and — if the
    /// active id is no longer a member — resets the active section to
    /// `None` so the membership invariant holds.
    pub fn set_sections<I>(&mut self, section_ids: I)
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        if self.torn_down {
            return;
        }
        self.registry.register(section_ids);
        self.observer.observe(&self.registry);

        let vanished = self
            .state
            .active_section
            .as_ref()
            .is_some_and(|id| !self.registry.contains(id.as_str()));
        if vanished {
            tracing::debug!("active section left the rendered set");
            self.resolver.clear();
            self.state.active_section = None;
            let snapshot = self.state.clone();
            self.publisher.publish(&snapshot);
        }
    }

    /// React to a raw scroll event.
    pub fn on_scroll<L: DocumentLayout>(&mut self, layout: &L) {
        self.refresh(layout);
    }

    /// React to a layout-height change (collapsible content, resize).
    /// Progress must be recomputed even though no scroll event fired.
    pub fn on_layout_change<L: DocumentLayout>(&mut self, layout: &L) {
        self.refresh(layout);
    }

    /// Request an animated scroll to `id`.
    ///
    /// An id that is not registered or not currently mounted is a silent
    /// no-op: the scroll position is untouched and nothing is raised.
    pub fn navigate_to<L: DocumentLayout>(
        &mut self,
        id: &str,
        layout: &L,
        now_ms: u64,
    ) -> NavOutcome {
        if self.torn_down {
            return NavOutcome::TornDown;
        }
        if !self.registry.contains(id) {
            tracing::debug!(id, "navigation target not registered");
            return NavOutcome::UnknownSection;
        }
        let Some(target_top) = layout.section_top(id) else {
            tracing::debug!(id, "navigation target not mounted");
            return NavOutcome::UnknownSection;
        };

        match self
            .navigator
            .go_to(target_top, layout.scroll_top(), layout.max_scroll(), now_ms)
        {
            NavStart::Started => NavOutcome::Started,
            NavStart::Retargeted => NavOutcome::Retargeted,
            NavStart::Absorbed => NavOutcome::AlreadyAtTarget,
        }
    }

    /// Advance one frame: apply the next tween sample (if animating), then
    /// run the normal scroll pipeline over the resulting position.
    ///
    /// Returns `true` while the animation is still running. Observation is
    /// never suppressed during the animation — intermediate sections
    /// resolve exactly as they would under manual scrolling.
    pub fn tick<L: DocumentLayout>(&mut self, layout: &mut L, now_ms: u64) -> bool {
        if self.torn_down {
            return false;
        }
        if let Some(pos) = self.navigator.tick(now_ms) {
            layout.set_scroll_top(pos);
        }
        self.refresh(layout);
        self.navigator.is_animating()
    }

    /// Register a snapshot callback. The subscriber immediately receives
    /// the current snapshot, then every subsequent real change.
    pub fn subscribe(&mut self, callback: impl FnMut(&SyncState) + 'static) -> SubId {
        let id = self.publisher.subscribe(callback);
        let snapshot = self.state.clone();
        self.publisher.notify_one(id, &snapshot);
        id
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&mut self, id: SubId) -> bool {
        self.publisher.unsubscribe(id)
    }

    /// Release observation and subscribers and abandon any in-flight
    /// animation. Subsequent mutating calls are no-ops; `state` keeps
    /// returning the last snapshot.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.observer.disconnect();
        self.publisher.clear();
        self.navigator.cancel();
        self.torn_down = true;
        tracing::debug!("controller torn down");
    }

    /// Recompute both state fields from the layout and publish iff either
    /// changed.
    fn refresh<L: DocumentLayout>(&mut self, layout: &L) {
        if self.torn_down {
            return;
        }

        // Progress slice: owned by the tracker.
        let percent = self.progress.update(
            layout.scroll_top(),
            layout.viewport_height(),
            layout.document_height(),
        );

        // Active slice: owned by the resolver. The scan updates transition
        // state; the resolver consumes the full current candidate set.
        // Observation re-registers synchronously with the registry, so a
        // candidate can never carry a superseded epoch here; the stamp
        // exists for consumers that receive reports asynchronously.
        self.observer.scan(layout);
        let candidates = self.observer.intersecting(layout);
        debug_assert!(candidates.iter().all(|r| r.epoch == self.registry.epoch()));
        self.resolver.resolve(&candidates);

        let active = self.resolver.active().cloned();
        let changed =
            self.state.active_section != active || self.state.progress_percent != percent;
        if changed {
            self.state.active_section = active;
            self.state.progress_percent = percent;
            let snapshot = self.state.clone();
            self.publisher.publish(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Minimal stacked-section layout for controller tests.
    struct StackLayout {
        sections: Vec<(String, f64)>,
        viewport: f64,
        scroll: f64,
    }

    impl StackLayout {
        fn five_by_1000() -> Self {
            Self {
                sections: ["intro", "p1", "p2", "p3", "reference"]
                    .into_iter()
                    .map(|id| (id.to_owned(), 1000.0))
                    .collect(),
                viewport: 800.0,
                scroll: 0.0,
            }
        }

        fn ids(&self) -> Vec<String> {
            self.sections.iter().map(|(id, _)| id.clone()).collect()
        }
    }

    impl DocumentLayout for StackLayout {
        fn section_top(&self, id: &str) -> Option<f64> {
            let mut top = 0.0;
            for (sid, height) in &self.sections {
                if sid == id {
                    return Some(top);
                }
                top += height;
            }
            None
        }
        fn section_height(&self, id: &str) -> Option<f64> {
            self.sections
                .iter()
                .find(|(sid, _)| sid == id)
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

    fn controller_for(layout: &StackLayout) -> ScrollSyncController {
        ScrollSyncController::new(ControllerConfig::default(), layout.ids())
    }

    #[test]
    fn initial_state_is_unset() {
        let layout = StackLayout::five_by_1000();
        let controller = controller_for(&layout);
        assert!(controller.state().active_section.is_none());
        assert_eq!(controller.state().progress_percent, 0.0);
    }

    #[test]
    fn first_scroll_resolves_and_publishes_once() {
        let layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);

        let publishes = Rc::new(RefCell::new(Vec::new()));
        let sink = publishes.clone();
        controller.subscribe(move |s| sink.borrow_mut().push(s.clone()));
        assert_eq!(publishes.borrow().len(), 1); // immediate snapshot

        controller.on_scroll(&layout);
        let log = publishes.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(
            log[1].active_section.as_ref().map(SectionId::as_str),
            Some("intro")
        );
    }

    #[test]
    fn redundant_refreshes_do_not_republish() {
        let layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);

        let count = Rc::new(RefCell::new(0u32));
        let sink = count.clone();
        controller.subscribe(move |_| *sink.borrow_mut() += 1);

        controller.on_scroll(&layout);
        let after_first = *count.borrow();
        controller.on_scroll(&layout);
        controller.on_scroll(&layout);
        assert_eq!(*count.borrow(), after_first);
    }

    #[test]
    fn scroll_updates_progress_and_active() {
        let mut layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);
        controller.on_scroll(&layout);

        layout.set_scroll_top(1964.0);
        controller.on_scroll(&layout);
        // Debounce: one more callback cycle confirms the new winner.
        controller.on_scroll(&layout);

        let state = controller.state();
        assert_eq!(
            state.active_section.as_ref().map(SectionId::as_str),
            Some("p1")
        );
        assert!((state.progress_percent - 46.761_904_761_904_76).abs() < 1e-6);
    }

    #[test]
    fn navigate_to_unknown_id_is_a_noop() {
        let mut layout = StackLayout::five_by_1000();
        layout.set_scroll_top(500.0);
        let mut controller = controller_for(&layout);

        let outcome = controller.navigate_to("nonexistent-id", &layout, 0);
        assert_eq!(outcome, NavOutcome::UnknownSection);
        assert_eq!(layout.scroll_top(), 500.0);
        assert!(!controller.is_animating());
    }

    #[test]
    fn navigate_to_registered_but_unmounted_id_is_a_noop() {
        let mut layout = StackLayout::five_by_1000();
        layout.sections.retain(|(id, _)| id != "p3");
        let mut controller =
            ScrollSyncController::new(ControllerConfig::default(), ["intro", "p1", "p2", "p3"]);

        let outcome = controller.navigate_to("p3", &layout, 0);
        assert_eq!(outcome, NavOutcome::UnknownSection);
        assert_eq!(layout.scroll_top(), 0.0);
    }

    #[test]
    fn navigation_settles_at_anchor_offset() {
        let mut layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);

        assert_eq!(controller.navigate_to("p2", &layout, 0), NavOutcome::Started);
        let mut now = 0;
        while controller.tick(&mut layout, now) {
            now += 16;
        }
        // elementTop(p2) = 2000, minus bar 64 and buffer 36.
        assert!((layout.scroll_top() - 1900.0).abs() < 1.0);
    }

    #[test]
    fn repeated_navigation_converges() {
        let mut layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);

        assert_eq!(controller.navigate_to("p2", &layout, 0), NavOutcome::Started);
        assert_eq!(
            controller.navigate_to("p2", &layout, 50),
            NavOutcome::AlreadyAtTarget
        );
        let mut now = 0;
        while controller.tick(&mut layout, now) {
            now += 16;
        }
        assert!((layout.scroll_top() - 1900.0).abs() < 1.0);
    }

    #[test]
    fn observation_passes_through_during_animation() {
        let mut layout = StackLayout::five_by_1000();
        let mut controller = ScrollSyncController::new(
            ControllerConfig {
                resolver: ResolverConfig { debounce: false },
                ..ControllerConfig::default()
            },
            layout.ids(),
        );
        controller.on_scroll(&layout);

        let actives = Rc::new(RefCell::new(Vec::new()));
        let sink = actives.clone();
        controller.subscribe(move |s: &SyncState| {
            if let Some(id) = &s.active_section {
                let mut log = sink.borrow_mut();
                if log.last() != Some(&id.as_str().to_owned()) {
                    log.push(id.as_str().to_owned());
                }
            }
        });

        controller.navigate_to("reference", &layout, 0);
        let mut now = 0;
        while controller.tick(&mut layout, now) {
            now += 16;
        }

        // The active id travelled through intermediate sections on the way
        // down instead of jumping straight to the destination. At the
        // anchored offset the tail of p3 still occupies the band top, so it
        // is the final winner under the ascending-top-offset rule.
        let log = actives.borrow();
        assert!(log.len() > 2, "expected intermediate sections, got {log:?}");
        assert!(log.contains(&"p1".to_owned()));
        assert_eq!(log.last().map(String::as_str), Some("p3"));
    }

    #[test]
    fn set_sections_resets_vanished_active() {
        let mut layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);
        controller.on_scroll(&layout); // active = intro

        layout.sections.retain(|(id, _)| id != "intro");
        controller.set_sections(layout.ids());
        assert!(controller.state().active_section.is_none());

        // Next refresh resolves from the new set immediately.
        controller.on_scroll(&layout);
        assert_eq!(
            controller.state().active_section.as_ref().map(SectionId::as_str),
            Some("p1")
        );
    }

    #[test]
    fn observer_epoch_tracks_registry_across_reregistration() {
        let mut layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);
        controller.on_scroll(&layout);

        layout.sections.retain(|(id, _)| id != "p3");
        controller.set_sections(layout.ids());
        assert_eq!(controller.observer.epoch(), controller.registry.epoch());

        controller.on_scroll(&layout);
        let candidates = controller.observer.intersecting(&layout);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|r| r.epoch == controller.registry.epoch()));
    }

    #[test]
    fn teardown_makes_mutations_inert() {
        let mut layout = StackLayout::five_by_1000();
        let mut controller = controller_for(&layout);
        controller.on_scroll(&layout);
        let snapshot = controller.state().clone();

        controller.teardown();
        assert_eq!(
            controller.navigate_to("p2", &layout, 0),
            NavOutcome::TornDown
        );
        layout.set_scroll_top(2000.0);
        controller.on_scroll(&layout);
        assert!(!controller.tick(&mut layout, 16));
        assert_eq!(controller.state(), &snapshot);
    }

    #[test]
    fn short_document_keeps_progress_zero() {
        let mut layout = StackLayout {
            sections: vec![("intro".to_owned(), 400.0)],
            viewport: 800.0,
            scroll: 0.0,
        };
        let mut controller = ScrollSyncController::new(ControllerConfig::default(), ["intro"]);
        controller.on_scroll(&layout);
        assert_eq!(controller.state().progress_percent, 0.0);
        layout.scroll = 100.0; // overscroll that a host might report
        controller.on_scroll(&layout);
        assert_eq!(controller.state().progress_percent, 0.0);
    }
}
