//! The forward-reference resolution contract.
//!
//! Anything that waits on an id (a page viewport holding page-number
//! citations, a bookmark tree, a link) implements [`Resolvable`]. The
//! [`IdTracker`](crate::IdTracker) calls `resolve_id_ref` once the pages
//! holding the id are known.

use folio_types::AreaId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// An immutable description of a page, handed to resolvables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    /// Zero-based position of the page in the document.
    pub index: usize,
    pub number: i32,
    /// The formatted page number ("iv", "12", ...).
    pub number_string: String,
    /// Stable key used for internal link targets.
    pub key: String,
}

pub trait Resolvable {
    fn is_resolved(&self) -> bool;

    /// Resolves `id` against the pages that contain it, first page first.
    /// An empty slice means the id is known to be missing; resolvables keep
    /// their placeholder but stop waiting.
    fn resolve_id_ref(&mut self, id: &AreaId, pages: &[PageRef]);
}

/// A resolvable shared between its owner and the id tracker.
pub type SharedResolvable = Rc<RefCell<dyn Resolvable>>;

pub(crate) fn same_resolvable(a: &SharedResolvable, b: &SharedResolvable) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
