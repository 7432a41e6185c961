//! In-page resolvable areas: page-number citations and internal links.
//!
//! These live in the page's content, which may be written to disk and read
//! back, so they are plain serializable values addressed by [`SlotId`].

use crate::resolvable::{PageRef, Resolvable};
use folio_types::AreaId;
use log::debug;
use serde::{Deserialize, Serialize};

/// Index of a resolvable area within its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

pub const PLACEHOLDER: &str = "?";

/// A page-number citation whose text is filled in once the cited id has
/// been placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedPageNumber {
    idref: AreaId,
    /// Cite the last page holding the id instead of the first.
    last: bool,
    text: String,
    resolved: bool,
}

impl UnresolvedPageNumber {
    pub fn new(idref: impl Into<AreaId>, last: bool) -> Self {
        Self { idref: idref.into(), last, text: PLACEHOLDER.to_string(), resolved: false }
    }

    pub fn idref(&self) -> &AreaId {
        &self.idref
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Resolvable for UnresolvedPageNumber {
    fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn resolve_id_ref(&mut self, id: &AreaId, pages: &[PageRef]) {
        if self.resolved || &self.idref != id {
            return;
        }
        self.resolved = true;
        let page = if self.last { pages.last() } else { pages.first() };
        if let Some(page) = page {
            debug!("Resolving page number for '{}': {}", id, page.number_string);
            self.text = page.number_string.clone();
        }
    }
}

/// An internal link; resolves to the first page holding its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResolver {
    idref: AreaId,
    target: Option<PageRef>,
    resolved: bool,
}

impl LinkResolver {
    pub fn new(idref: impl Into<AreaId>) -> Self {
        Self { idref: idref.into(), target: None, resolved: false }
    }

    pub fn idref(&self) -> &AreaId {
        &self.idref
    }

    pub fn target(&self) -> Option<&PageRef> {
        self.target.as_ref()
    }
}

impl Resolvable for LinkResolver {
    fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn resolve_id_ref(&mut self, id: &AreaId, pages: &[PageRef]) {
        if &self.idref == id {
            self.resolved = true;
            self.target = pages.first().cloned();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvableArea {
    PageNumber(UnresolvedPageNumber),
    Link(LinkResolver),
}

impl ResolvableArea {
    pub fn idref(&self) -> &AreaId {
        match self {
            ResolvableArea::PageNumber(citation) => citation.idref(),
            ResolvableArea::Link(link) => link.idref(),
        }
    }
}

impl Resolvable for ResolvableArea {
    fn is_resolved(&self) -> bool {
        match self {
            ResolvableArea::PageNumber(citation) => citation.is_resolved(),
            ResolvableArea::Link(link) => link.is_resolved(),
        }
    }

    fn resolve_id_ref(&mut self, id: &AreaId, pages: &[PageRef]) {
        match self {
            ResolvableArea::PageNumber(citation) => citation.resolve_id_ref(id, pages),
            ResolvableArea::Link(link) => link.resolve_id_ref(id, pages),
        }
    }
}
