#![forbid(unsafe_code)]

//! Ordered, epoch-stamped section registry.
//!
//! The registry is the authoritative list of section ids for one rendered
//! document, in vertical order. It is supplied once at mount and replaced
//! wholesale whenever the rendered set changes (a search filter removing
//! sections, for example). Each replacement bumps the registration epoch;
//! anything stamped with an older epoch is stale and must be discarded.

use ahash::AHashMap;
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of one addressable content block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SectionId(String);

impl SectionId {
    /// Create a new id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Ordered list of section ids with an id → order index.
///
/// Order is implicit from registration sequence: the first registered id has
/// order 0. Duplicate ids keep their first position.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    ids: Vec<SectionId>,
    index: AHashMap<SectionId, usize>,
    epoch: u64,
}

impl SectionRegistry {
    /// Create an empty registry at epoch 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with `ids` (epoch 1).
    #[must_use]
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        let mut registry = Self::new();
        registry.register(ids);
        registry
    }

    /// Replace the registered set with `ids` and bump the epoch.
    ///
    /// The new list is authoritative from this point on; reports carrying an
    /// older epoch must be dropped by consumers.
    pub fn register<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        self.ids.clear();
        self.index.clear();
        for id in ids {
            let id = id.into();
            if self.index.contains_key(&id) {
                tracing::debug!(id = %id, "duplicate section id ignored");
                continue;
            }
            self.index.insert(id.clone(), self.ids.len());
            self.ids.push(id);
        }
        self.epoch += 1;
        tracing::trace!(epoch = self.epoch, sections = self.ids.len(), "sections registered");
    }

    /// Current registration epoch. 0 means nothing was ever registered.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of registered sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is a member of the registered set.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Document order of `id`, if registered.
    #[must_use]
    pub fn order_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Id at document order `order`.
    #[must_use]
    pub fn get(&self, order: usize) -> Option<&SectionId> {
        self.ids.get(order)
    }

    /// Registered ids in document order.
    #[must_use]
    pub fn ids(&self) -> &[SectionId] {
        &self.ids
    }

    /// Iterate `(order, id)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SectionId)> {
        self.ids.iter().enumerate()
    }
}
