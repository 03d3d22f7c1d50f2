#![forbid(unsafe_code)]

//! Static section catalog of the reference document.
//!
//! The document is a single page: an introduction, one section per
//! documented pattern, and a closing quick-reference table. Section ids are
//! the pattern slugs; titles are only used for display in the demo binary.

/// One pattern section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Stable slug used as the section id.
    pub slug: &'static str,
    /// Display title.
    pub title: &'static str,
}

/// Id of the introduction bookend.
pub const INTRO_ID: &str = "introduction";

/// Id of the quick-reference bookend.
pub const REFERENCE_ID: &str = "quick-reference";

/// The documented patterns, in reading order.
pub const PATTERNS: [CatalogEntry; 20] = [
    CatalogEntry { slug: "prompt-chaining", title: "Prompt Chaining" },
    CatalogEntry { slug: "routing", title: "Routing" },
    CatalogEntry { slug: "parallelization", title: "Parallelization" },
    CatalogEntry { slug: "reflection", title: "Reflection" },
    CatalogEntry { slug: "tool-use", title: "Tool Use" },
    CatalogEntry { slug: "planning", title: "Planning" },
    CatalogEntry { slug: "multi-agent-collaboration", title: "Multi-Agent Collaboration" },
    CatalogEntry { slug: "memory-management", title: "Memory Management" },
    CatalogEntry { slug: "learning-adaptation", title: "Learning & Adaptation" },
    CatalogEntry { slug: "goal-setting-monitoring", title: "Goal Setting & Monitoring" },
    CatalogEntry { slug: "exception-handling-recovery", title: "Exception Handling & Recovery" },
    CatalogEntry { slug: "human-in-the-loop", title: "Human-in-the-Loop" },
    CatalogEntry { slug: "retrieval-rag", title: "Retrieval (RAG)" },
    CatalogEntry { slug: "inter-agent-communication", title: "Inter-Agent Communication" },
    CatalogEntry { slug: "resource-aware-optimization", title: "Resource-Aware Optimization" },
    CatalogEntry { slug: "reasoning-techniques", title: "Reasoning Techniques" },
    CatalogEntry { slug: "evaluation-monitoring", title: "Evaluation & Monitoring" },
    CatalogEntry { slug: "guardrails-safety", title: "Guardrails & Safety" },
    CatalogEntry { slug: "prioritization", title: "Prioritization" },
    CatalogEntry { slug: "exploration-discovery", title: "Exploration & Discovery" },
];

/// All section ids in document order: introduction, patterns, reference.
#[must_use]
pub fn section_ids() -> Vec<String> {
    let mut ids = Vec::with_capacity(PATTERNS.len() + 2);
    ids.push(INTRO_ID.to_owned());
    ids.extend(PATTERNS.iter().map(|p| p.slug.to_owned()));
    ids.push(REFERENCE_ID.to_owned());
    ids
}

/// Display title for a section id, if it names a catalog entry.
#[must_use]
pub fn title_of(id: &str) -> Option<&'static str> {
    match id {
        INTRO_ID => Some("Introduction"),
        REFERENCE_ID => Some("Quick Reference"),
        _ => PATTERNS.iter().find(|p| p.slug == id).map(|p| p.title),
    }
}
