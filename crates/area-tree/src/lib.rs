//! The area tree and its forward-reference resolution.
//!
//! - Containment inside a page: [`Page`] → [`RegionViewport`] →
//!   [`BodyRegion`] → [`MainReference`] → [`Span`] → [`NormalFlow`] →
//!   [`Block`] → [`LineArea`] → [`InlineArea`].
//! - [`PageViewport`] is the durable handle of one page; its content may be
//!   spilled to disk and reloaded while resolutions keep arriving.
//! - [`IdTracker`] resolves idrefs (page-number citations, links,
//!   bookmarks) once the pages holding their ids are known.

pub mod block;
pub mod bookmark;
pub mod error;
pub mod extension;
pub mod flow;
pub mod id_tracker;
pub mod inline;
pub mod line;
pub mod markers;
pub mod off_document;
pub mod page;
pub mod page_sequence;
pub mod page_viewport;
pub mod region;
pub mod resolvable;
pub mod resolvables;
pub mod span;

pub use block::{Block, BlockChild, Border};
pub use bookmark::BookmarkData;
pub use error::AreaError;
pub use extension::ExtensionAttachment;
pub use flow::NormalFlow;
pub use id_tracker::IdTracker;
pub use inline::{Citation, FontKey, ImageArea, InlineArea, Leader, TextArea};
pub use line::{LineAdjust, LineAlignment, LineArea};
pub use markers::{Marker, RetrievePosition};
pub use off_document::{OffDocumentItem, WhenToProcess};
pub use page::Page;
pub use page_sequence::PageSequence;
pub use page_viewport::{PageViewport, PageViewportRef};
pub use region::{BodyRegion, MainReference, RegionClass, RegionContent, RegionReference, RegionViewport};
pub use resolvable::{PageRef, Resolvable, SharedResolvable};
pub use resolvables::{LinkResolver, PLACEHOLDER, ResolvableArea, SlotId, UnresolvedPageNumber};
pub use span::Span;
