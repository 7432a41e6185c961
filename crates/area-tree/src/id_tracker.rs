//! Tracks where ids land and who waits on them.
//!
//! Two independent axes per id:
//! - *located*: the pages holding the id's areas are known
//!   ([`associate_id_with_page_viewport`](IdTracker::associate_id_with_page_viewport))
//! - *pending*: the id's formatting object is still being laid out
//!   ([`signal_pending_id`](IdTracker::signal_pending_id))
//!
//! Waiters registered with [`add_unresolved_id_ref`](IdTracker::add_unresolved_id_ref)
//! fire once the id is located and not pending, exactly once per id.

use crate::page_viewport::PageViewportRef;
use crate::resolvable::{PageRef, SharedResolvable, same_resolvable};
use folio_types::AreaId;
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct IdTracker {
    id_locations: HashMap<AreaId, Vec<PageRef>>,
    unresolved: IndexMap<AreaId, Vec<SharedResolvable>>,
    pending: HashSet<AreaId>,
    already_resolved: HashSet<AreaId>,
    missing: Vec<AreaId>,
}

impl IdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `id` has an area on the page. The first page recorded
    /// is the id's defining page.
    pub fn associate_id_with_page_viewport(&mut self, id: impl Into<AreaId>, viewport: &PageViewportRef) {
        let id = id.into();
        let page = viewport.borrow().page_ref();
        match self.id_locations.get_mut(&id) {
            Some(pages) => {
                if !pages.contains(&page) {
                    pages.push(page);
                }
            }
            None => {
                debug!("Id '{}' located on page {}", id, page.key);
                viewport.borrow_mut().set_first_with_id(&id);
                self.id_locations.insert(id.clone(), vec![page]);
                if !self.pending.contains(&id) {
                    self.flush_waiters(&id);
                }
            }
        }
    }

    /// Marks `id` as still being laid out; its waiters are held back until
    /// [`signal_id_processed`](Self::signal_id_processed).
    pub fn signal_pending_id(&mut self, id: impl Into<AreaId>) {
        let id = id.into();
        debug!("Id '{}' pending", id);
        self.pending.insert(id);
    }

    pub fn signal_id_processed(&mut self, id: impl Into<AreaId>) {
        let id = id.into();
        self.already_resolved.insert(id.clone());
        if !self.pending.remove(&id) {
            return;
        }
        debug!("Id '{}' processed", id);
        if self.id_locations.contains_key(&id) {
            self.flush_waiters(&id);
        } else if self.unresolved.contains_key(&id) {
            warn!("Id '{}' was processed but never placed on a page; references to it stay unresolved", id);
            if !self.missing.contains(&id) {
                self.missing.push(id);
            }
        }
    }

    pub fn already_resolved_id(&self, id: &str) -> bool {
        self.already_resolved.contains(id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    /// Registers `resolvable` as waiting on `idref`. Registering the same
    /// resolvable twice for one idref has no effect.
    pub fn add_unresolved_id_ref(&mut self, idref: impl Into<AreaId>, resolvable: SharedResolvable) {
        let waiters = self.unresolved.entry(idref.into()).or_default();
        if !waiters.iter().any(|w| same_resolvable(w, &resolvable)) {
            waiters.push(resolvable);
        }
    }

    /// Resolves what the page can resolve now and registers the page as a
    /// waiter for the rest.
    pub fn try_id_resolution_for_page(&mut self, viewport: &PageViewportRef) {
        let idrefs = viewport.borrow().id_refs();
        for idref in idrefs {
            self.try_id_resolution(idref, viewport.clone());
        }
    }

    /// Resolves `resolvable` against `idref` if its pages are known, or
    /// registers it as a waiter.
    pub fn try_id_resolution(&mut self, idref: AreaId, resolvable: SharedResolvable) {
        if !self.pending.contains(&idref) {
            if let Some(pages) = self.id_locations.get(&idref) {
                resolvable.borrow_mut().resolve_id_ref(&idref, pages);
                return;
            }
        }
        self.add_unresolved_id_ref(idref, resolvable);
    }

    /// The pages holding `id`, defining page first.
    pub fn page_viewports_containing_id(&self, id: &str) -> Option<&[PageRef]> {
        self.id_locations.get(id).map(Vec::as_slice)
    }

    /// The idrefs that still have waiters.
    pub fn id_refs(&self) -> Vec<AreaId> {
        self.unresolved.keys().cloned().collect()
    }

    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }

    /// Ids that were processed without ever being placed while something
    /// referred to them.
    pub fn missing_ids(&self) -> &[AreaId] {
        &self.missing
    }

    /// Resolves every remaining waiter at end of document: against the
    /// known pages where there are any, otherwise as missing. Returns the
    /// ids that had waiters.
    pub fn force_resolve_dangling(&mut self) -> Vec<AreaId> {
        let dangling = std::mem::take(&mut self.unresolved);
        let mut forced = Vec::with_capacity(dangling.len());
        for (id, waiters) in dangling {
            let pages = self.id_locations.get(&id).map(Vec::as_slice).unwrap_or(&[]);
            if pages.is_empty() {
                warn!("Unresolved id reference '{}' found at end of document", id);
                if !self.missing.contains(&id) {
                    self.missing.push(id.clone());
                }
            } else {
                warn!("Id '{}' was never signalled as processed; resolving against {} page(s)", id, pages.len());
            }
            for waiter in waiters {
                waiter.borrow_mut().resolve_id_ref(&id, pages);
            }
            self.pending.remove(&id);
            self.already_resolved.insert(id.clone());
            forced.push(id);
        }
        forced
    }

    fn flush_waiters(&mut self, id: &AreaId) {
        let Some(waiters) = self.unresolved.shift_remove(id) else {
            return;
        };
        let pages = self.id_locations.get(id).map(Vec::as_slice).unwrap_or(&[]);
        debug!("Resolving {} waiter(s) for id '{}'", waiters.len(), id);
        for waiter in waiters {
            waiter.borrow_mut().resolve_id_ref(id, pages);
        }
        self.already_resolved.insert(id.clone());
    }
}
