#![forbid(unsafe_code)]

//! Coordination layer for the scroll-sync engine.
//!
//! `scrollspy-core` supplies the pure pieces (band geometry, observation,
//! resolution, progress). This crate wires them into one live unit:
//!
//! - [`navigator`] — tween-animated programmatic scrolling to a target
//!   section, idempotent and interruption-safe.
//! - [`publish`] — a synchronous subscribe/unsubscribe channel for state
//!   snapshots, so "who changed the state" is decoupled from "who reacts
//!   to it".
//! - [`controller`] — [`ScrollSyncController`](controller::ScrollSyncController),
//!   the single owner of the published
//!   [`SyncState`](controller::SyncState): active section id plus reading
//!   progress. All event sources feed it; all consumers read from it.
//!
//! Everything runs on one cooperative event loop. The three input streams
//! (raw scroll, visibility transitions, layout changes) own disjoint slices
//! of the state record, so there is no locking anywhere.

pub mod controller;
pub mod navigator;
pub mod publish;

pub use controller::{ControllerConfig, NavOutcome, ScrollSyncController, SyncState};
pub use navigator::{NavigatorConfig, ScrollNavigator};
pub use publish::{StatePublisher, SubId};
