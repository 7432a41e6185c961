//! Per-page coded font references.
//!
//! Each distinct (font, size) pair used on a page gets one local reference,
//! mapped into the page's environment group the first time it is used.

use crate::config::FontConfig;
use folio_afp::{FontMapping, Rotation};
use std::collections::HashMap;

/// Millipoints per 1/1440 inch, the unit of outline font sizes.
const MPT_PER_TWIP: i32 = 50;

#[derive(Debug, Default)]
pub(crate) struct PageFonts {
    references: HashMap<(usize, i32), u8>,
    next_reference: u8,
}

impl PageFonts {
    pub fn reset(&mut self) {
        self.references.clear();
        self.next_reference = 0;
    }

    /// The reference for font `index` at `size`. A new mapping is returned
    /// alongside when the pair is not mapped on this page yet; it only counts
    /// as mapped after [`commit`](Self::commit). `None` means the page has
    /// run out of references.
    pub fn reference(
        &self,
        index: usize,
        font: &FontConfig,
        size: i32,
        rotation: Rotation,
    ) -> Option<(u8, Option<FontMapping>)> {
        if let Some(reference) = self.references.get(&(index, size)) {
            return Some((*reference, None));
        }
        let reference = self.next_reference.checked_add(1)?;
        let outline_size = font
            .outline
            .then(|| u16::try_from((size + MPT_PER_TWIP / 2) / MPT_PER_TWIP).unwrap_or(u16::MAX));
        Some((
            reference,
            Some(FontMapping {
                reference,
                character_set: font.character_set.clone(),
                code_page: font.code_page.clone(),
                rotation,
                outline_size,
            }),
        ))
    }

    /// Records a reference whose mapping reached the page.
    pub fn commit(&mut self, index: usize, size: i32, reference: u8) {
        self.references.insert((index, size), reference);
        self.next_reference = self.next_reference.max(reference);
    }
}
