// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

/// Error reported by a [`ShapeBackend`](crate::ShapeBackend).
///
/// The layout engine treats it as opaque and propagates it unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("shaping failed: {message}")]
pub struct ShapeError {
    message: String,
}

impl ShapeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a layout attempt produced no result.
///
/// Every variant is terminal for that call: the engine never retries and
/// never returns a partial layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The container resolves to zero area.
    #[error("container resolves to an empty region")]
    EmptyRegion,
    /// The requested range exceeds the text, or splits a UTF-8 character.
    #[error("range {start}..{end} out of bounds of text length {len}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
    /// The text is empty.
    #[error("empty input text")]
    EmptyInput,
    /// The shaping backend reported an error.
    #[error(transparent)]
    Shaping(#[from] ShapeError),
}

impl LayoutError {
    pub(crate) fn range_out_of_bounds(range: &Range<usize>, len: usize) -> Self {
        Self::RangeOutOfBounds {
            start: range.start,
            end: range.end,
            len,
        }
    }
}
