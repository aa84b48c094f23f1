// SPDX-License-Identifier: MIT OR Apache-2.0

//! # textframe
//!
//! This library lays rich text out into containers in a generic way. A
//! [`Container`] describes the region text must fit into, either a simple
//! inset rectangle or an arbitrary closed path with exclusion zones, plus a
//! writing mode, a row cap and a truncation policy. A [`Layout`] is the
//! immutable result: positioned and measured [`Line`]s, an optional
//! truncated line, per-row extents for hit testing, attachment placements
//! and draw-need hints.
//!
//! Glyph shaping is not performed here. The engine consumes any shaper
//! through the [`ShapeBackend`] trait and only deals in the typographic
//! metrics the shaper reports; the bundled [`Monospace`] backend exists for
//! tests and examples.
//!
//! ```
//! use textframe::{AttrString, Attrs, Container, Layout, Monospace, Size, Truncation};
//!
//! // A backend turns attributed text into measured lines; bring your own
//! // shaper in production.
//! let mut backend = Monospace::new();
//!
//! // Attributes mark decorations and attachments, not fonts
//! let text = AttrString::new("Hello, container-driven rich text layout!", Attrs::new());
//!
//! // Describe the region: 120 points wide, at most 2 rows, ellipsis at the end
//! let container = Container::new(Size::new(120.0, 200.0))
//!     .max_rows(2)
//!     .truncation(Truncation::End);
//!
//! let layout = Layout::new(container, &text, &mut backend).unwrap();
//!
//! assert!(layout.row_count() <= 2);
//! for line in layout.lines() {
//!     println!("row {} covers {:?}", line.row(), line.bounds());
//! }
//! if let Some(truncated) = layout.truncated_line() {
//!     println!("last visible line truncated at {:?}", truncated.range());
//! }
//! ```

pub use self::attachment::*;
mod attachment;

pub use self::attrs::*;
mod attrs;

pub use self::container::*;
mod container;

pub use self::error::*;
mod error;

pub use self::layout::*;
mod layout;

pub use self::line::*;
mod line;

pub use self::math::*;
mod math;

pub use self::path::*;
mod path;

pub use self::shape::*;
mod shape;
