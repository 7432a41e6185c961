//! Inline areas: the content of line areas.
//!
//! Positions are millipoints. `offset` is the distance from the top of the
//! line area to the inline's baseline.

use crate::resolvables::SlotId;
use folio_types::Color;
use serde::{Deserialize, Serialize};

/// Identifies a font face at a size, as chosen by layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontKey {
    pub family: String,
    pub weight: u16,
    pub italic: bool,
    /// Font size in millipoints.
    pub size: i32,
}

impl FontKey {
    pub fn new(family: impl Into<String>, weight: u16, italic: bool, size: i32) -> Self {
        Self { family: family.into(), weight, italic, size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextArea {
    pub text: String,
    pub ipd: i32,
    pub offset: i32,
    pub font: FontKey,
    pub color: Color,
}

/// A page-number citation; its text lives in the page's resolvable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub slot: SlotId,
    pub ipd: i32,
    pub offset: i32,
    pub font: FontKey,
    pub color: Color,
}

/// A rule leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub ipd: i32,
    pub offset: i32,
    pub thickness: i32,
    pub color: Color,
}

/// An external graphic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArea {
    pub ipd: i32,
    pub bpd: i32,
    pub offset: i32,
    pub uri: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineArea {
    Text(TextArea),
    Space { ipd: i32, adjustable: bool },
    Leader(Leader),
    PageNumberCitation(Citation),
    /// An internal link around its inline content.
    Link { slot: SlotId, children: Vec<InlineArea> },
    Image(ImageArea),
}

impl InlineArea {
    pub fn ipd(&self) -> i32 {
        match self {
            InlineArea::Text(text) => text.ipd,
            InlineArea::Space { ipd, .. } => *ipd,
            InlineArea::Leader(leader) => leader.ipd,
            InlineArea::PageNumberCitation(citation) => citation.ipd,
            InlineArea::Link { children, .. } => children.iter().map(InlineArea::ipd).sum(),
            InlineArea::Image(image) => image.ipd,
        }
    }
}
