//! The bookmark tree.
//!
//! Each bookmark points at the first page of an id. A parent registers the
//! unresolved idrefs of its children so the tracker only needs to know the
//! root: resolving an id on the root re-propagates it down the tree.

use crate::resolvable::{PageRef, Resolvable};
use folio_types::AreaId;
use indexmap::IndexMap;
use log::debug;

#[derive(Debug, Clone, Default)]
pub struct BookmarkData {
    title: String,
    show_children: bool,
    idref: Option<AreaId>,
    page: Option<PageRef>,
    own_resolved: bool,
    children: Vec<BookmarkData>,
    /// idref -> indices of the children waiting on it.
    unresolved: IndexMap<AreaId, Vec<usize>>,
}

impl BookmarkData {
    /// The root of a bookmark tree. It has no title and no target.
    pub fn root() -> Self {
        Self { show_children: true, ..Self::default() }
    }

    pub fn new(title: impl Into<String>, show_children: bool, idref: impl Into<AreaId>) -> Self {
        Self {
            title: title.into(),
            show_children,
            idref: Some(idref.into()),
            ..Self::default()
        }
    }

    /// Sets the target page when it is already known at creation.
    pub fn with_page(mut self, page: PageRef) -> Self {
        self.page = Some(page);
        self.own_resolved = true;
        self
    }

    pub fn add_sub_data(&mut self, child: BookmarkData) {
        let index = self.children.len();
        if child.page.is_none() {
            let mut waiting: Vec<AreaId> = child.idref.iter().cloned().collect();
            waiting.extend(child.unresolved.keys().cloned());
            for id in waiting {
                let entry = self.unresolved.entry(id).or_default();
                if !entry.contains(&index) {
                    entry.push(index);
                }
            }
        } else {
            // The child's own target is known; only its subtree still waits.
            for id in child.unresolved.keys() {
                self.unresolved.entry(id.clone()).or_default().push(index);
            }
        }
        self.children.push(child);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn show_children(&self) -> bool {
        self.show_children
    }

    pub fn idref(&self) -> Option<&AreaId> {
        self.idref.as_ref()
    }

    pub fn page(&self) -> Option<&PageRef> {
        self.page.as_ref()
    }

    pub fn children(&self) -> &[BookmarkData] {
        &self.children
    }

    /// The idrefs this bookmark or its subtree still waits on.
    pub fn id_refs(&self) -> Vec<AreaId> {
        let mut ids: Vec<AreaId> = Vec::new();
        if let Some(idref) = self.idref.as_ref().filter(|_| !self.own_resolved) {
            ids.push(idref.clone());
        }
        for id in self.unresolved.keys() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

impl Resolvable for BookmarkData {
    fn is_resolved(&self) -> bool {
        (self.idref.is_none() || self.own_resolved) && self.unresolved.is_empty()
    }

    fn resolve_id_ref(&mut self, id: &AreaId, pages: &[PageRef]) {
        if !self.own_resolved && self.idref.as_ref() == Some(id) {
            self.own_resolved = true;
            self.page = pages.first().cloned();
            debug!("Bookmark '{}' resolved to {:?}", self.title, self.page.as_ref().map(|p| &p.key));
        }
        if let Some(indices) = self.unresolved.shift_remove(id) {
            for index in indices {
                if let Some(child) = self.children.get_mut(index) {
                    child.resolve_id_ref(id, pages);
                }
            }
        }
    }
}
