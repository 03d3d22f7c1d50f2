#![forbid(unsafe_code)]

//! Headless simulation layer for the scroll-sync engine.
//!
//! Nothing here touches a real DOM. [`sim::SimDocument`] is a stack of
//! `(id, height)` blocks implementing
//! [`DocumentLayout`](scrollspy_core::layout::DocumentLayout);
//! [`sim::SimSession`] binds one to a
//! [`ScrollSyncController`](scrollspy_runtime::controller::ScrollSyncController)
//! and steps it frame by frame with an explicit millisecond clock, which
//! makes every scenario — manual scrolling, sidebar clicks mid-animation,
//! filter changes, collapsible sections — fully deterministic and
//! assertable.
//!
//! [`catalog`] carries the static section list of the reference document
//! (an introduction, twenty documented patterns, a closing quick
//! reference) used by the demo binary and the end-to-end tests.

pub mod catalog;
pub mod sim;

pub use sim::{FrameStats, SimDocument, SimSession};
