#![forbid(unsafe_code)]

//! Simulated document and frame-stepping session driver.
//!
//! [`SimDocument`] models the rendered page as a stack of `(id, height)`
//! blocks: section tops are cumulative sums, the scroll offset clamps to
//! the scrollable range, and "mounted" simply means present in the stack.
//!
//! [`SimSession`] owns a document plus a controller and advances them with
//! an explicit millisecond clock. Each frame produces a [`FrameStats`] row
//! suitable for JSONL logging, so a whole reading session can be replayed
//! and diffed offline.

use serde::Serialize;

use scrollspy_core::layout::DocumentLayout;
use scrollspy_core::registry::SectionId;
use scrollspy_runtime::controller::{
    ControllerConfig, NavOutcome, ScrollSyncController, SyncState,
};
use scrollspy_runtime::publish::SubId;

/// One content block in the simulated page.
#[derive(Debug, Clone, PartialEq)]
struct SimSection {
    id: String,
    height: f64,
}

/// A stack of sections with a viewport and a clamped scroll offset.
#[derive(Debug, Clone, Default)]
pub struct SimDocument {
    sections: Vec<SimSection>,
    viewport_height: f64,
    scroll_top: f64,
}

impl SimDocument {
    /// Create an empty document with the given viewport height.
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            sections: Vec::new(),
            viewport_height,
            scroll_top: 0.0,
        }
    }

    /// Build a document from `(id, height)` blocks.
    #[must_use]
    pub fn from_blocks<I, S>(blocks: I, viewport_height: f64) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut doc = Self::new(viewport_height);
        for (id, height) in blocks {
            doc.push_section(id, height);
        }
        doc
    }

    /// Append a section at the bottom of the document.
    pub fn push_section(&mut self, id: impl Into<String>, height: f64) {
        self.sections.push(SimSection {
            id: id.into(),
            height: height.max(0.0),
        });
    }

    /// Mounted section ids in document order.
    #[must_use]
    pub fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    /// Change one section's rendered height (collapsible content expanding
    /// or collapsing). Returns `false` if the id is not mounted.
    pub fn set_section_height(&mut self, id: &str, height: f64) -> bool {
        match self.sections.iter_mut().find(|s| s.id == id) {
            Some(section) => {
                section.height = height.max(0.0);
                self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
                true
            }
            None => false,
        }
    }

    /// Keep only the sections the predicate accepts (a search filter
    /// shrinking the rendered set).
    pub fn retain_sections(&mut self, keep: impl Fn(&str) -> bool) {
        self.sections.retain(|s| keep(&s.id));
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
    }

    /// Resize the viewport.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
    }
}

impl DocumentLayout for SimDocument {
    fn section_top(&self, id: &str) -> Option<f64> {
        let mut top = 0.0;
        for section in &self.sections {
            if section.id == id {
                return Some(top);
            }
            top += section.height;
        }
        None
    }

    fn section_height(&self, id: &str) -> Option<f64> {
        self.sections.iter().find(|s| s.id == id).map(|s| s.height)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_height(&self) -> f64 {
        self.sections.iter().map(|s| s.height).sum()
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, px: f64) {
        self.scroll_top = px.clamp(0.0, self.max_scroll());
    }
}

/// Per-frame metrics for JSONL session logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameStats {
    /// Frame counter, monotonically increasing.
    pub frame: u64,
    /// Session clock at the end of the frame.
    pub now_ms: u64,
    /// Scroll offset after the frame.
    pub scroll_top: f64,
    /// Published reading progress.
    pub progress_percent: f64,
    /// Published active section id.
    pub active_section: Option<String>,
    /// Whether a navigation tween is still running.
    pub animating: bool,
}

/// A simulated reading session: one document, one controller, one clock.
#[derive(Debug)]
pub struct SimSession {
    doc: SimDocument,
    controller: ScrollSyncController,
    now_ms: u64,
    frame: u64,
}

impl SimSession {
    /// Bind a controller to `doc`, registering the document's mounted
    /// sections and running one initial layout pass.
    #[must_use]
    pub fn new(doc: SimDocument, config: ControllerConfig) -> Self {
        let mut controller = ScrollSyncController::new(config, doc.section_ids());
        controller.on_layout_change(&doc);
        Self {
            doc,
            controller,
            now_ms: 0,
            frame: 0,
        }
    }

    /// The simulated document.
    #[must_use]
    pub fn doc(&self) -> &SimDocument {
        &self.doc
    }

    /// The published state snapshot.
    #[must_use]
    pub fn state(&self) -> &SyncState {
        self.controller.state()
    }

    /// Session clock in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Set the scroll offset directly (a jump, not an animation) and run
    /// the scroll pipeline.
    pub fn scroll_to(&mut self, px: f64) {
        self.doc.set_scroll_top(px);
        self.controller.on_scroll(&self.doc);
    }

    /// Scroll by a signed delta (wheel/touch input).
    pub fn wheel(&mut self, delta_px: f64) {
        self.scroll_to(self.doc.scroll_top() + delta_px);
    }

    /// Click a navigation entry: request an animated scroll to `id`.
    pub fn click(&mut self, id: &str) -> NavOutcome {
        self.controller.navigate_to(id, &self.doc, self.now_ms)
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&mut self, callback: impl FnMut(&SyncState) + 'static) -> SubId {
        self.controller.subscribe(callback)
    }

    /// Advance one frame of `dt_ms` and return its stats row.
    pub fn step(&mut self, dt_ms: u64) -> FrameStats {
        self.now_ms += dt_ms;
        self.frame += 1;
        let animating = self.controller.tick(&mut self.doc, self.now_ms);
        let state = self.controller.state();
        FrameStats {
            frame: self.frame,
            now_ms: self.now_ms,
            scroll_top: self.doc.scroll_top(),
            progress_percent: state.progress_percent,
            active_section: state
                .active_section
                .as_ref()
                .map(|id| id.as_str().to_owned()),
            animating,
        }
    }

    /// Advance `n` frames of `dt_ms` each, collecting stats rows.
    pub fn step_frames(&mut self, n: usize, dt_ms: u64) -> Vec<FrameStats> {
        (0..n).map(|_| self.step(dt_ms)).collect()
    }

    /// Change one section's height and re-run the layout pipeline.
    pub fn set_section_height(&mut self, id: &str, height: f64) -> bool {
        let changed = self.doc.set_section_height(id, height);
        if changed {
            self.controller.on_layout_change(&self.doc);
        }
        changed
    }

    /// Apply a search filter: shrink the rendered set, re-register the
    /// surviving sections, and re-run the layout pipeline.
    pub fn filter_sections(&mut self, keep: impl Fn(&str) -> bool) {
        self.doc.retain_sections(&keep);
        self.controller.set_sections(self.doc.section_ids());
        self.controller.on_layout_change(&self.doc);
    }

    /// Resize the viewport and re-run the layout pipeline.
    pub fn resize_viewport(&mut self, height: f64) {
        self.doc.set_viewport_height(height);
        self.controller.on_layout_change(&self.doc);
    }

    /// Active section id as a plain string, for assertions.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.controller
            .state()
            .active_section
            .as_ref()
            .map(SectionId::as_str)
    }

    /// Tear the controller down. Further mutations are inert.
    pub fn teardown(&mut self) {
        self.controller.teardown();
    }
}
