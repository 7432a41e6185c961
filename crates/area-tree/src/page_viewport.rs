//! The durable per-page handle of the area tree.
//!
//! A `PageViewport` lives for the whole document run. Its [`Page`] content
//! can be written out with [`save_page`](PageViewport::save_page), dropped
//! with [`clear`](PageViewport::clear) and read back with
//! [`load_page`](PageViewport::load_page); the viewport keeps the
//! unresolved idref bookkeeping across that window.
//!
//! Resolutions that arrive while the content is out are buffered in arrival
//! order and replayed once `load_page` has rebuilt the unresolved map.

use crate::error::AreaError;
use crate::markers::{Marker, Markers, RetrievePosition};
use crate::page::Page;
use crate::page_sequence::PageSequence;
use crate::resolvable::{PageRef, Resolvable};
use crate::resolvables::SlotId;
use folio_types::{AreaId, Rect};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;

/// A page viewport shared between the page scheduler and the id tracker.
pub type PageViewportRef = Rc<RefCell<PageViewport>>;

#[derive(Debug)]
pub struct PageViewport {
    view_area: Rect,
    index: usize,
    number: i32,
    number_string: String,
    key: String,
    blank: bool,
    page: Option<Page>,
    ids_first_on_page: IndexSet<AreaId>,
    unresolved_id_refs: IndexMap<AreaId, Vec<SlotId>>,
    pending_resolved: IndexMap<AreaId, Vec<PageRef>>,
    markers: Markers,
    page_sequence: Option<Rc<PageSequence>>,
    first_in_sequence: bool,
}

impl PageViewport {
    /// Creates the viewport for the page at zero-based `index`.
    pub fn new(view_area: Rect, index: usize, number: i32, number_string: impl Into<String>, page: Page) -> Self {
        let unresolved_id_refs = page.unresolved_references();
        Self {
            view_area,
            index,
            number,
            number_string: number_string.into(),
            key: format!("P{}", index + 1),
            blank: false,
            page: Some(page),
            ids_first_on_page: IndexSet::new(),
            unresolved_id_refs,
            pending_resolved: IndexMap::new(),
            markers: Markers::default(),
            page_sequence: None,
            first_in_sequence: false,
        }
    }

    pub fn into_shared(self) -> PageViewportRef {
        Rc::new(RefCell::new(self))
    }

    pub fn view_area(&self) -> Rect {
        self.view_area
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn number_string(&self) -> &str {
        &self.number_string
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn page_ref(&self) -> PageRef {
        PageRef {
            index: self.index,
            number: self.number,
            number_string: self.number_string.clone(),
            key: self.key.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn set_blank(&mut self, blank: bool) {
        self.blank = blank;
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn page_mut(&mut self) -> Option<&mut Page> {
        self.page.as_mut()
    }

    pub fn is_loaded(&self) -> bool {
        self.page.is_some()
    }

    /// Records that `id` first appears on this page.
    pub fn set_first_with_id(&mut self, id: &AreaId) {
        self.ids_first_on_page.insert(id.clone());
    }

    pub fn is_first_with_id(&self, id: &str) -> bool {
        self.ids_first_on_page.contains(id)
    }

    pub fn ids_first_on_page(&self) -> impl Iterator<Item = &AreaId> {
        self.ids_first_on_page.iter()
    }

    /// The idrefs this page still waits on.
    pub fn id_refs(&self) -> Vec<AreaId> {
        self.unresolved_id_refs.keys().cloned().collect()
    }

    pub fn add_markers(&mut self, marks: &[Marker], starting: bool, is_first: bool, is_last: bool) {
        self.markers.add(marks, starting, is_first, is_last);
    }

    pub fn marker(&self, class_name: &str, position: RetrievePosition) -> Option<&Marker> {
        self.markers.get(class_name, position)
    }

    pub fn set_page_sequence(&mut self, sequence: Rc<PageSequence>, first_in_sequence: bool) {
        self.page_sequence = Some(sequence);
        self.first_in_sequence = first_in_sequence;
    }

    pub fn page_sequence(&self) -> Option<&PageSequence> {
        self.page_sequence.as_deref()
    }

    pub fn is_first_in_sequence(&self) -> bool {
        self.first_in_sequence
    }

    /// Writes the page content out and releases it.
    pub fn save_page<W: Write>(&mut self, writer: W) -> Result<(), AreaError> {
        let page = self.page.as_ref().ok_or_else(|| AreaError::PageNotLoaded(self.key.clone()))?;
        serde_json::to_writer(writer, page)?;
        self.page = None;
        debug!("Saved page {} out of memory", self.key);
        Ok(())
    }

    /// Reads page content written by [`save_page`](Self::save_page) and
    /// replays the resolutions that arrived in the meantime.
    pub fn load_page<R: Read>(&mut self, reader: R) -> Result<(), AreaError> {
        if self.page.is_some() {
            return Err(AreaError::PageAlreadyLoaded(self.key.clone()));
        }
        let page: Page = serde_json::from_reader(reader)?;
        self.unresolved_id_refs = page.unresolved_references();
        self.page = Some(page);

        let buffered = std::mem::take(&mut self.pending_resolved);
        if !buffered.is_empty() {
            debug!("Replaying {} buffered resolution(s) on page {}", buffered.len(), self.key);
        }
        for (id, pages) in buffered {
            self.resolve_id_ref(&id, &pages);
        }
        Ok(())
    }

    /// Drops the page content, typically once it has been rendered.
    pub fn clear(&mut self) {
        self.page = None;
    }
}

impl Resolvable for PageViewport {
    fn is_resolved(&self) -> bool {
        self.unresolved_id_refs.is_empty()
    }

    fn resolve_id_ref(&mut self, id: &AreaId, pages: &[PageRef]) {
        let slots = self.unresolved_id_refs.shift_remove(id);
        match self.page.as_mut() {
            Some(page) => {
                for slot in slots.into_iter().flatten() {
                    page.resolve_slot(slot, id, pages);
                }
            }
            None => {
                debug!("Page {} not loaded, buffering resolution of '{}'", self.key, id);
                self.pending_resolved.entry(id.clone()).or_insert_with(|| pages.to_vec());
            }
        }
    }
}
