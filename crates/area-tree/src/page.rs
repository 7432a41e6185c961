//! The content of one page: its regions, the resolvable areas they refer
//! to, and extension attachments.
//!
//! A `Page` is the part of a [`PageViewport`](crate::PageViewport) that may
//! be discarded or written out to disk; it round-trips through serde.

use crate::extension::ExtensionAttachment;
use crate::region::{RegionClass, RegionViewport};
use crate::resolvable::{PageRef, Resolvable};
use crate::resolvables::{ResolvableArea, SlotId};
use folio_types::AreaId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    regions: Vec<RegionViewport>,
    resolvables: Vec<ResolvableArea>,
    extension_attachments: Vec<ExtensionAttachment>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region, replacing any region of the same class.
    pub fn set_region(&mut self, region: RegionViewport) {
        match self.regions.iter_mut().find(|r| r.class == region.class) {
            Some(existing) => *existing = region,
            None => self.regions.push(region),
        }
    }

    pub fn region(&self, class: RegionClass) -> Option<&RegionViewport> {
        self.regions.iter().find(|r| r.class == class)
    }

    pub fn region_mut(&mut self, class: RegionClass) -> Option<&mut RegionViewport> {
        self.regions.iter_mut().find(|r| r.class == class)
    }

    pub fn regions(&self) -> &[RegionViewport] {
        &self.regions
    }

    /// Registers a resolvable area; inline areas refer to it by the
    /// returned slot.
    pub fn add_resolvable(&mut self, area: ResolvableArea) -> SlotId {
        self.resolvables.push(area);
        SlotId(self.resolvables.len() - 1)
    }

    pub fn resolvable(&self, slot: SlotId) -> Option<&ResolvableArea> {
        self.resolvables.get(slot.0)
    }

    pub fn resolvables(&self) -> &[ResolvableArea] {
        &self.resolvables
    }

    /// The still-unresolved idrefs on this page, in the order they were
    /// first added, each with the slots waiting on it.
    pub fn unresolved_references(&self) -> IndexMap<AreaId, Vec<SlotId>> {
        let mut unresolved: IndexMap<AreaId, Vec<SlotId>> = IndexMap::new();
        for (index, area) in self.resolvables.iter().enumerate() {
            if !area.is_resolved() {
                unresolved.entry(area.idref().clone()).or_default().push(SlotId(index));
            }
        }
        unresolved
    }

    pub(crate) fn resolve_slot(&mut self, slot: SlotId, id: &AreaId, pages: &[PageRef]) {
        if let Some(area) = self.resolvables.get_mut(slot.0) {
            area.resolve_id_ref(id, pages);
        }
    }

    pub fn add_extension_attachment(&mut self, attachment: ExtensionAttachment) {
        self.extension_attachments.push(attachment);
    }

    pub fn extension_attachments(&self) -> &[ExtensionAttachment] {
        &self.extension_attachments
    }
}
