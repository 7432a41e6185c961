//! MO:DCA (AFP) object model and binary emission.
//!
//! This crate provides:
//! - Structured field framing and the three-phase [`StructuredObject`] contract
//! - Triplets, resource maps with overflow splitting, environment groups
//! - Page objects, presentation text, IM image shading, object containers
//! - A streaming [`DataStream`] that writes one page at a time
//!
//! All coordinates and sizes are AFP units at the page's resolution.

mod binary;
pub mod container;
pub mod data_stream;
pub mod descriptors;
pub mod document;
pub mod ebcdic;
pub mod environment;
mod error;
pub mod factory;
pub mod image;
pub mod include;
pub mod maps;
pub mod no_operation;
pub mod page;
pub mod page_segment;
pub mod presentation_text;
pub mod reader;
pub mod registry;
pub mod rotation;
pub mod structured_field;
pub mod tag;
pub mod triplet;

#[cfg(test)]
mod testing;

pub use data_stream::{DataStream, ObjectPlacement};
pub use error::AfpError;
pub use factory::Factory;
pub use maps::FontMapping;
pub use page::{PageContent, PageObject, PageState};
pub use presentation_text::{Rule, TextRun};
pub use rotation::Rotation;
pub use structured_field::{serialize, StructuredObject};
pub use triplet::{Triplet, Triplets};
