// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

use crate::{EdgeInsets, Rect, Size};

/// What kind of content an attachment stands in for.
///
/// The crate never touches the content itself, it only reserves space for it
/// and reports where it should be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttachmentKind {
    Image,
    View,
    Layer,
}

/// Opaque handle to user-supplied attachment content.
///
/// Two attachments with the same content id share one slot in
/// [`Layout::attachment_contents`](crate::Layout::attachment_contents).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachmentContent {
    pub id: u64,
    pub kind: AttachmentKind,
}

impl AttachmentContent {
    pub fn new(id: u64, kind: AttachmentKind) -> Self {
        Self { id, kind }
    }
}

/// An inline non-text placeholder embedded at a text range.
///
/// Attach one to a span of an [`AttrString`](crate::AttrString) (usually a
/// single object replacement character) via
/// [`Attrs::attachment`](crate::Attrs::attachment).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attachment {
    pub content: AttachmentContent,
    pub content_size: Size,
    pub content_insets: EdgeInsets,
}

impl Attachment {
    pub fn new(content: AttachmentContent) -> Self {
        Self {
            content,
            content_size: Size::ZERO,
            content_insets: EdgeInsets::ZERO,
        }
    }

    pub fn content_size(mut self, content_size: Size) -> Self {
        self.content_size = content_size;
        self
    }

    pub fn content_insets(mut self, content_insets: EdgeInsets) -> Self {
        self.content_insets = content_insets;
        self
    }
}

/// A laid out attachment: the attachment, the text range it occupies, and the
/// rect assigned to it from its owning line's bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentEntry {
    pub attachment: Attachment,
    pub range: Range<usize>,
    pub rect: Rect,
}
