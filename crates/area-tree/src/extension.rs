//! Renderer-specific instructions attached to a page.
//!
//! Renderers that do not understand an attachment skip it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionAttachment {
    /// Places a named page overlay at a page position (millipoints).
    IncludePageOverlay { name: String, x: i32, y: i32 },
    /// Places a named page segment at a page position (millipoints).
    IncludePageSegment { name: String, x: i32, y: i32 },
    /// Attaches a name/value pair to the page.
    TagLogicalElement { name: String, value: String },
    /// Carries an opaque comment into the output.
    NoOperation { content: String },
}

impl ExtensionAttachment {
    pub fn category(&self) -> &'static str {
        match self {
            ExtensionAttachment::IncludePageOverlay { .. } => "include-page-overlay",
            ExtensionAttachment::IncludePageSegment { .. } => "include-page-segment",
            ExtensionAttachment::TagLogicalElement { .. } => "tag-logical-element",
            ExtensionAttachment::NoOperation { .. } => "no-operation",
        }
    }
}
