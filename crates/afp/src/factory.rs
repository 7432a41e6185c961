//! Creates AFP objects and hands out their names.
//!
//! Names are a three letter prefix per object kind followed by a five digit
//! counter, e.g. `PGN00001` for the first page.

use crate::container::ObjectContainer;
use crate::document::Document;
use crate::environment::ObjectEnvironmentGroup;
use crate::error::AfpError;
use crate::page::PageObject;
use crate::page_segment::PageSegment;
use crate::presentation_text::PresentationTextObject;
use crate::registry::ObjectType;
use crate::rotation::Rotation;
use std::collections::HashMap;

const PAGE: &str = "PGN";
const ACTIVE_ENVIRONMENT_GROUP: &str = "AEG";
const OBJECT_ENVIRONMENT_GROUP: &str = "OEG";
const PRESENTATION_TEXT: &str = "PTO";
const IMAGE: &str = "IMG";
const OBJECT_CONTAINER: &str = "OBC";
const PAGE_SEGMENT: &str = "PSG";
const DOCUMENT: &str = "DOC";

#[derive(Debug, Default)]
pub struct Factory {
    counters: HashMap<&'static str, u32>,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_name(&mut self, prefix: &'static str) -> String {
        let counter = self.counters.entry(prefix).or_insert(0);
        *counter += 1;
        format!("{}{:05}", prefix, counter)
    }

    pub fn page_name(&mut self) -> String {
        self.next_name(PAGE)
    }

    pub fn presentation_text_name(&mut self) -> String {
        self.next_name(PRESENTATION_TEXT)
    }

    pub fn image_name(&mut self) -> String {
        self.next_name(IMAGE)
    }

    pub fn create_page(
        &mut self,
        width: i32,
        height: i32,
        rotation: Rotation,
        resolution: u32,
    ) -> Result<PageObject, AfpError> {
        let name = self.next_name(PAGE);
        let environment_name = self.next_name(ACTIVE_ENVIRONMENT_GROUP);
        PageObject::new(&name, &environment_name, width, height, rotation, resolution)
    }

    pub fn create_presentation_text_object(&mut self) -> PresentationTextObject {
        PresentationTextObject::new(&self.next_name(PRESENTATION_TEXT))
    }

    pub fn create_object_environment_group(&mut self) -> ObjectEnvironmentGroup {
        ObjectEnvironmentGroup::new(&self.next_name(OBJECT_ENVIRONMENT_GROUP))
    }

    pub fn create_object_container(&mut self, object_type: ObjectType) -> ObjectContainer {
        ObjectContainer::new(&self.next_name(OBJECT_CONTAINER), object_type)
    }

    pub fn create_page_segment(&mut self) -> PageSegment {
        PageSegment::new(&self.next_name(PAGE_SEGMENT))
    }

    /// A document named `name`, or a generated name when `None`.
    pub fn create_document(&mut self, name: Option<&str>) -> Document {
        match name {
            Some(name) => Document::new(name),
            None => Document::new(&self.next_name(DOCUMENT)),
        }
    }
}
