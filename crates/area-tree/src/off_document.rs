//! Items that belong to the document rather than to a page.

use crate::bookmark::BookmarkData;
use crate::resolvable::{Resolvable, SharedResolvable};
use folio_types::AreaId;
use std::cell::RefCell;
use std::rc::Rc;

/// When the renderer should receive an off-document item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenToProcess {
    Immediately,
    AfterPage,
    EndOfDocument,
}

#[derive(Debug, Clone)]
pub enum OffDocumentItem {
    Bookmarks(Rc<RefCell<BookmarkData>>),
}

impl OffDocumentItem {
    pub fn bookmarks(root: BookmarkData) -> Self {
        OffDocumentItem::Bookmarks(Rc::new(RefCell::new(root)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            OffDocumentItem::Bookmarks(_) => "Bookmarks",
        }
    }

    pub fn when_to_process(&self) -> WhenToProcess {
        match self {
            OffDocumentItem::Bookmarks(_) => WhenToProcess::EndOfDocument,
        }
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            OffDocumentItem::Bookmarks(root) => root.borrow().is_resolved(),
        }
    }

    pub fn id_refs(&self) -> Vec<AreaId> {
        match self {
            OffDocumentItem::Bookmarks(root) => root.borrow().id_refs(),
        }
    }

    /// The handle the id tracker resolves through.
    pub fn resolvable(&self) -> SharedResolvable {
        match self {
            OffDocumentItem::Bookmarks(root) => root.clone(),
        }
    }
}
