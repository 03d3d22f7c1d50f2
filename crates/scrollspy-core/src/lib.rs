#![forbid(unsafe_code)]

//! Headless scroll-synchronization primitives for a sectioned single-page
//! document.
//!
//! This crate holds the pure, host-agnostic half of the scroll-sync engine:
//!
//! - [`geometry`] — the activation band, the vertical strip of the viewport
//!   used to decide which section counts as "currently being read".
//! - [`registry`] — the ordered, epoch-stamped list of section ids.
//! - [`layout`] — the [`DocumentLayout`](layout::DocumentLayout) seam that
//!   abstracts the host document (a real DOM in production, a simulated
//!   document in tests).
//! - [`observer`] — watches sections against the band and emits
//!   [`IntersectionReport`](observer::IntersectionReport)s on every
//!   entry/exit transition.
//! - [`resolver`] — collapses the current intersecting set into exactly one
//!   active section id, with a deterministic tie-break and an optional
//!   two-confirmation debounce.
//! - [`progress`] — normalized 0–100 reading progress from raw scroll
//!   geometry.
//!
//! None of this blocks or spawns: every operation is a synchronous reaction
//! meant to run on a single cooperative event loop. The coordination layer
//! that wires these into one published state lives in `scrollspy-runtime`.

pub mod geometry;
pub mod layout;
pub mod observer;
pub mod progress;
pub mod registry;
pub mod resolver;

pub use geometry::ActivationBand;
pub use layout::DocumentLayout;
pub use observer::{IntersectionReport, SectionObserver};
pub use progress::ProgressTracker;
pub use registry::{SectionId, SectionRegistry};
pub use resolver::{ActiveResolver, ResolverConfig};
