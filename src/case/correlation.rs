//! Correlation paths: the keyed branch choices taken to reach a value.

use serde::{Serialize, Serializer};
use std::fmt;

/// One keyed branch choice: the correlation key of a property and the index
/// of the value taken under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationSegment {
    pub key: String,
    pub index: usize,
}

/// The sequence of keyed choices on the way from the tree root to a leaf.
///
/// A leaf whose own property is keyed carries that choice as its last segment,
/// so a single path comparison covers both direct correlation and correlation
/// inherited from a keyed import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CorrelationPath {
    segments: Vec<CorrelationSegment>,
}

impl CorrelationPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this path extended by one choice.
    pub fn child(&self, key: &str, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(CorrelationSegment {
            key: key.to_string(),
            index,
        });
        Self { segments }
    }

    pub fn segments(&self) -> &[CorrelationSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index chosen under `key`, if this path passed through it.
    pub fn index_for(&self, key: &str) -> Option<usize> {
        self.segments
            .iter()
            .find(|segment| segment.key == key)
            .map(|segment| segment.index)
    }

    /// True when both paths went through the same correlation key but took
    /// values of different index under it.
    pub fn conflicts_with(&self, other: &CorrelationPath) -> bool {
        self.segments.iter().any(|mine| {
            other
                .segments
                .iter()
                .any(|theirs| mine.key == theirs.key && mine.index != theirs.index)
        })
    }
}

impl fmt::Display for CorrelationPath {
    /// Renders `/key:index` per segment.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}:{}", segment.key, segment.index)?;
        }
        Ok(())
    }
}

impl Serialize for CorrelationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
