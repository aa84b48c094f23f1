// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

use rangemap::RangeMap;

use crate::Attachment;

/// Style attributes for a span of text.
///
/// The layout engine does not interpret decoration attributes semantically.
/// It records which ones appear anywhere in the text so a renderer can skip
/// whole drawing passes, and it extracts [`Attachment`] markers to position
/// them. `metadata` is passed through untouched.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attrs {
    pub attachment: Option<Attachment>,
    pub highlight: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub shadow: bool,
    pub inner_shadow: bool,
    pub border: bool,
    pub background_border: bool,
    pub block_border: bool,
    pub metadata: usize,
}

impl Eq for Attrs {}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn strikethrough(mut self, strikethrough: bool) -> Self {
        self.strikethrough = strikethrough;
        self
    }

    pub fn shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn inner_shadow(mut self, inner_shadow: bool) -> Self {
        self.inner_shadow = inner_shadow;
        self
    }

    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn background_border(mut self, background_border: bool) -> Self {
        self.background_border = background_border;
        self
    }

    pub fn block_border(mut self, block_border: bool) -> Self {
        self.block_border = block_border;
        self
    }

    pub fn metadata(mut self, metadata: usize) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Default attributes plus per-span overrides, keyed by byte offset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrsList {
    defaults: Attrs,
    spans: RangeMap<usize, Attrs>,
}

impl AttrsList {
    pub fn new(defaults: Attrs) -> Self {
        Self {
            defaults,
            spans: RangeMap::new(),
        }
    }

    pub fn defaults(&self) -> &Attrs {
        &self.defaults
    }

    /// Sets the attributes for a byte range, replacing any overlap.
    pub fn add_span(&mut self, range: Range<usize>, attrs: Attrs) {
        if range.is_empty() {
            return;
        }
        self.spans.insert(range, attrs);
    }

    /// Attributes in effect at a byte offset.
    pub fn get_span(&self, index: usize) -> &Attrs {
        self.spans.get(&index).unwrap_or(&self.defaults)
    }

    /// Maximal runs of uniform attributes covering `range`, in order.
    ///
    /// Gaps between stored spans are reported with the default attributes.
    pub fn runs_in(&self, range: Range<usize>) -> Vec<(Range<usize>, &Attrs)> {
        let mut runs = Vec::new();
        if range.is_empty() {
            return runs;
        }
        let mut cursor = range.start;
        for (span, attrs) in self.spans.overlapping(&range) {
            let start = span.start.max(range.start);
            let end = span.end.min(range.end);
            if cursor < start {
                runs.push((cursor..start, &self.defaults));
            }
            runs.push((start..end, attrs));
            cursor = end;
        }
        if cursor < range.end {
            runs.push((cursor..range.end, &self.defaults));
        }
        runs
    }
}

/// An immutable attributed string: UTF-8 text plus an [`AttrsList`].
///
/// This is the input to layout. Offsets and ranges are byte offsets into the
/// backing text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrString {
    text: String,
    attrs: AttrsList,
}

impl AttrString {
    pub fn new(text: impl Into<String>, defaults: Attrs) -> Self {
        Self {
            text: text.into(),
            attrs: AttrsList::new(defaults),
        }
    }

    pub fn with_list(text: impl Into<String>, attrs: AttrsList) -> Self {
        Self {
            text: text.into(),
            attrs,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn attrs_list(&self) -> &AttrsList {
        &self.attrs
    }

    /// Sets attributes for a byte range of the text.
    pub fn add_span(&mut self, range: Range<usize>, attrs: Attrs) {
        self.attrs.add_span(range, attrs);
    }

    /// Maximal runs of uniform attributes covering `range`.
    pub fn attr_runs(&self, range: Range<usize>) -> Vec<(Range<usize>, &Attrs)> {
        self.attrs.runs_in(range)
    }
}
