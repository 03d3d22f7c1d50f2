#![forbid(unsafe_code)]

//! Scripted reading-session replay.
//!
//! Builds the reference document (introduction, twenty pattern sections,
//! quick reference), then replays a session against the scroll-sync engine:
//! a manual scroll sweep, a sidebar click, a second click mid-animation,
//! a collapsible section expanding, and a search filter shrinking the
//! rendered set. One JSONL stats row is printed per frame.
//!
//! # Running
//!
//! ```sh
//! cargo run -p scrollspy-harness
//! RUST_LOG=scrollspy_core=trace cargo run -p scrollspy-harness
//! ```

use tracing_subscriber::EnvFilter;

use scrollspy_harness::catalog;
use scrollspy_harness::sim::{SimDocument, SimSession};
use scrollspy_runtime::controller::ControllerConfig;

const FRAME_MS: u64 = 16;

fn reference_document() -> SimDocument {
    let mut doc = SimDocument::new(800.0);
    doc.push_section(catalog::INTRO_ID, 600.0);
    for pattern in &catalog::PATTERNS {
        doc.push_section(pattern.slug, 900.0);
    }
    doc.push_section(catalog::REFERENCE_ID, 1200.0);
    doc
}

fn emit(rows: &[scrollspy_harness::FrameStats]) {
    for row in rows {
        match serde_json::to_string(row) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::error!(%err, "stats row failed to serialize"),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut session = SimSession::new(reference_document(), ControllerConfig::default());
    session.subscribe(|state| {
        tracing::debug!(
            active = ?state.active_section,
            progress = state.progress_percent,
            "state published"
        );
    });

    // Manual sweep through the first few patterns.
    for _ in 0..12 {
        session.wheel(260.0);
        emit(&session.step_frames(1, FRAME_MS));
    }

    // Sidebar click: animate to "planning".
    let outcome = session.click("planning");
    tracing::info!(?outcome, "clicked planning");
    emit(&session.step_frames(10, FRAME_MS));

    // Second click before the first animation settles: retarget.
    let outcome = session.click("guardrails-safety");
    tracing::info!(?outcome, "clicked guardrails-safety mid-flight");
    emit(&session.step_frames(30, FRAME_MS));

    // A collapsible section expands: document grows, progress recomputes
    // without any scroll event.
    session.set_section_height("retrieval-rag", 1600.0);
    emit(&session.step_frames(1, FRAME_MS));

    // Search filter: only memory/reasoning related patterns stay rendered.
    session.filter_sections(|id| {
        id == catalog::INTRO_ID
            || id == catalog::REFERENCE_ID
            || id.contains("memory")
            || id.contains("reasoning")
    });
    emit(&session.step_frames(5, FRAME_MS));

    let state = session.state().clone();
    tracing::info!(
        active = ?state.active_section,
        progress = state.progress_percent,
        frames = session.now_ms() / FRAME_MS,
        "session complete"
    );
    session.teardown();
}
