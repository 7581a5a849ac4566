//! # Offset Mapping
//!
//! Converts an absolute character offset into the flattened text of a block
//! into a `(node, local offset)` pair over its spans.
//!
//! The table stores the cumulative end offset of every node:
//!
//! ```text
//! spans:   "ab"   ""   "cde"
//! ends:     2     2     5
//!
//! offset 0 → (0, 0)     offset 2 → (0, 2)     offset 3 → (2, 1)
//! offset 5 → (2, 3)     offset 6 → UnmappableOffset
//! ```
//!
//! At an exact boundary the earlier node wins (its end, not the next node's
//! start). Start and end of a range go through the same lookup, so a range
//! never straddles a different interpretation of the same offset.

use crate::core::document::InlineSpan;
use crate::core::error::EditorError;

/// A node index plus an offset inside that node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub node: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OffsetMap {
    ends: Vec<usize>,
}

impl OffsetMap {
    pub fn new(lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut total = 0;
        let ends = lengths
            .into_iter()
            .map(|len| {
                total += len;
                total
            })
            .collect();
        Self { ends }
    }

    /// Map over span lengths counted in characters.
    pub fn from_spans(spans: &[InlineSpan]) -> Self {
        Self::new(spans.iter().map(InlineSpan::char_len))
    }

    /// Total flattened length.
    pub fn len(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute offset at which `node` starts.
    pub fn node_start(&self, node: usize) -> usize {
        if node == 0 { 0 } else { self.ends[node - 1] }
    }

    pub fn locate(&self, offset: usize) -> Result<Position, EditorError> {
        let unmappable = || EditorError::UnmappableOffset {
            offset,
            len: self.len(),
        };
        if offset > self.len() {
            return Err(unmappable());
        }
        // First node whose end reaches the offset.
        let node = self.ends.partition_point(|&end| end < offset);
        if node >= self.ends.len() {
            return Err(unmappable());
        }
        Ok(Position {
            node,
            offset: offset - self.node_start(node),
        })
    }

    pub fn locate_range(&self, start: usize, end: usize) -> Result<(Position, Position), EditorError> {
        if start > end {
            return Err(EditorError::UnmappableOffset {
                offset: start,
                len: self.len(),
            });
        }
        Ok((self.locate(start)?, self.locate(end)?))
    }
}

/// Byte index of the `char_offset`-th character of `text` (or its length).
pub fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
