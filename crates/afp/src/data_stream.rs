//! The AFP data stream: a document envelope with pages streamed into it.
//!
//! Only one page is held in memory at a time. `end_page` serializes the page
//! to the underlying writer and drops it.

use crate::descriptors::{ContainerDataDescriptor, ObjectAreaDescriptor, ObjectAreaPosition};
use crate::document::Document;
use crate::environment::DataDescriptor;
use crate::error::AfpError;
use crate::factory::Factory;
use crate::maps::{FontMapping, MapContainerData};
use crate::no_operation::NoOperation;
use crate::page::{PageContent, PageObject};
use crate::presentation_text::{Rule, TextRun};
use crate::registry::ObjectType;
use crate::rotation::Rotation;
use crate::structured_field::serialize;
use crate::tag::TagLogicalElement;
use folio_types::Color;
use log::{debug, warn};
use std::io::Write;

/// Where and how a data object is drawn on the page, in page units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectPlacement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub rotation: Rotation,
    pub mapping_option: u8,
}

pub struct DataStream<W: Write> {
    out: W,
    factory: Factory,
    document: Option<Document>,
    page: Option<PageObject>,
    pages_written: usize,
}

impl<W: Write> DataStream<W> {
    pub fn new(out: W) -> Self {
        Self { out, factory: Factory::new(), document: None, page: None, pages_written: 0 }
    }

    pub fn pages_written(&self) -> usize {
        self.pages_written
    }

    fn current(page: &mut Option<PageObject>) -> Result<&mut PageObject, AfpError> {
        page.as_mut().ok_or(AfpError::PrerequisiteNotMet("no page is open"))
    }

    pub fn current_page(&mut self) -> Result<&mut PageObject, AfpError> {
        Self::current(&mut self.page)
    }

    pub fn start_document(&mut self, name: Option<&str>) -> Result<(), AfpError> {
        if self.document.is_some() {
            return Err(AfpError::PrerequisiteNotMet("document already started"));
        }
        let mut document = self.factory.create_document(name);
        document.write_begin(&mut self.out)?;
        self.document = Some(document);
        Ok(())
    }

    pub fn start_page(
        &mut self,
        width: i32,
        height: i32,
        rotation: Rotation,
        resolution: u32,
    ) -> Result<(), AfpError> {
        if !self.document.as_ref().is_some_and(Document::is_open) {
            return Err(AfpError::PrerequisiteNotMet("document is not open"));
        }
        if self.page.is_some() {
            return Err(AfpError::PrerequisiteNotMet("previous page has not ended"));
        }
        self.page = Some(self.factory.create_page(width, height, rotation, resolution)?);
        Ok(())
    }

    pub fn create_font(&mut self, font: FontMapping) -> Result<(), AfpError> {
        Self::current(&mut self.page)?.create_font(font)
    }

    pub fn create_text(&mut self, run: &TextRun<'_>) -> Result<(), AfpError> {
        let factory = &mut self.factory;
        Self::current(&mut self.page)?
            .presentation_text(|| factory.presentation_text_name())?
            .create_text(run)
    }

    pub fn create_line(&mut self, rule: &Rule) -> Result<(), AfpError> {
        let factory = &mut self.factory;
        Self::current(&mut self.page)?
            .presentation_text(|| factory.presentation_text_name())?
            .create_line(rule)
    }

    pub fn create_shading(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) -> Result<(), AfpError> {
        let page = Self::current(&mut self.page)?;
        let name = self.factory.image_name();
        page.create_shading(&name, x, y, width, height, color)
    }

    pub fn create_include_page_overlay(
        &mut self,
        name: &str,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) -> Result<(), AfpError> {
        Self::current(&mut self.page)?.create_include_page_overlay(name, x, y, rotation)
    }

    pub fn create_include_page_segment(&mut self, name: &str, x: i32, y: i32) -> Result<(), AfpError> {
        Self::current(&mut self.page)?.create_include_page_segment(name, x, y)
    }

    /// Places a foreign data object (image, PDF page, ...) in an object
    /// container on the current page.
    pub fn create_object_container(
        &mut self,
        placement: &ObjectPlacement,
        object_type: ObjectType,
        data: Vec<u8>,
    ) -> Result<(), AfpError> {
        let page = Self::current(&mut self.page)?;
        let resolution = page.resolution();
        let mut environment_group = self.factory.create_object_environment_group();
        environment_group.set_object_area(
            ObjectAreaDescriptor::new(placement.width, placement.height, resolution, resolution)?,
            ObjectAreaPosition::new(placement.x, placement.y, placement.rotation)?,
        );
        environment_group.set_map_container_data(MapContainerData::new(placement.mapping_option));
        environment_group.set_data_descriptor(DataDescriptor::Container(ContainerDataDescriptor::new(
            placement.width,
            placement.height,
            resolution,
            resolution,
        )?));
        let mut container = self.factory.create_object_container(object_type);
        container.set_environment_group(environment_group);
        container.set_data(data);
        page.add_object(PageContent::Container(container))
    }

    /// Adds a tag logical element to the open page, or writes it at
    /// document level when no page is open.
    pub fn create_tag_logical_element(&mut self, name: &str, value: &str) -> Result<(), AfpError> {
        let mut element = TagLogicalElement::new(name, value);
        match self.page.as_mut() {
            Some(page) => page.add_tag_logical_element(element),
            None => {
                if !self.document.as_ref().is_some_and(Document::is_open) {
                    return Err(AfpError::PrerequisiteNotMet("document is not open"));
                }
                serialize(&mut element, &mut self.out)
            }
        }
    }

    /// Adds a no-operation comment to the open page, or writes it at
    /// document level when no page is open.
    pub fn create_no_operation(&mut self, content: &str) -> Result<(), AfpError> {
        let mut nop = NoOperation::new(content);
        match self.page.as_mut() {
            Some(page) => page.add_object(PageContent::NoOperation(nop)),
            None => {
                if !self.document.as_ref().is_some_and(Document::is_open) {
                    return Err(AfpError::PrerequisiteNotMet("document is not open"));
                }
                serialize(&mut nop, &mut self.out)
            }
        }
    }

    pub fn end_page(&mut self) -> Result<(), AfpError> {
        let mut page = self
            .page
            .take()
            .ok_or(AfpError::PrerequisiteNotMet("no page is open"))?;
        serialize(&mut page, &mut self.out)?;
        self.pages_written += 1;
        debug!("Wrote AFP page {}", self.pages_written);
        Ok(())
    }

    /// Ends any open page, then closes the document.
    pub fn end_document(&mut self) -> Result<(), AfpError> {
        if self.page.is_some() {
            warn!("Ending document with an open page; writing it first");
            self.end_page()?;
        }
        let document = self
            .document
            .as_mut()
            .ok_or(AfpError::PrerequisiteNotMet("document was never started"))?;
        document.write_end(&mut self.out)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use crate::testing::field_ids;
    use crate::triplet::mapping_option;

    fn stream() -> DataStream<Vec<u8>> {
        let _ = env_logger::builder().is_test(true).try_init();
        DataStream::new(Vec::new())
    }

    #[test]
    fn test_document_with_two_pages() {
        let mut ds = stream();
        ds.start_document(Some("TESTDOC")).unwrap();
        for _ in 0..2 {
            ds.start_page(1984, 2806, Rotation::Deg0, 240).unwrap();
            ds.create_text(&TextRun { x: 10, y: 10, font_reference: 1, rotation: Rotation::Deg0, text: "a" })
                .unwrap();
            ds.end_page().unwrap();
        }
        ds.end_document().unwrap();
        assert_eq!(ds.pages_written(), 2);

        let bytes = ds.into_inner();
        let ids = field_ids(&bytes);
        assert_eq!(ids.first(), Some(&(0xA8, 0xA8)));
        assert_eq!(ids.last(), Some(&(0xA9, 0xA8)));
        assert_eq!(ids.iter().filter(|id| **id == (0xA8, 0xAF)).count(), 2);
    }

    #[test]
    fn test_page_operations_need_a_page() {
        let mut ds = stream();
        assert!(ds.start_page(10, 10, Rotation::Deg0, 240).is_err());
        ds.start_document(None).unwrap();
        assert!(matches!(ds.end_page(), Err(AfpError::PrerequisiteNotMet(_))));
        assert!(ds.create_shading(0, 0, 1, 1, Color::BLACK).is_err());
    }

    #[test]
    fn test_document_level_tag_logical_element() {
        let mut ds = stream();
        ds.start_document(None).unwrap();
        ds.create_tag_logical_element("Bookmark", "1").unwrap();
        ds.end_document().unwrap();
        let ids = field_ids(&ds.into_inner());
        assert_eq!(ids, vec![(0xA8, 0xA8), (0xA0, 0x90), (0xA9, 0xA8)]);
    }

    #[test]
    fn test_no_operation_on_page_and_document() {
        let mut ds = stream();
        ds.start_document(None).unwrap();
        ds.create_no_operation("doc").unwrap();
        ds.start_page(100, 100, Rotation::Deg0, 240).unwrap();
        ds.create_no_operation("page").unwrap();
        ds.end_page().unwrap();
        ds.end_document().unwrap();
        let ids = field_ids(&ds.into_inner());
        assert_eq!(ids.iter().filter(|id| **id == (0xEE, 0xEE)).count(), 2);
        assert_eq!(ids[1], (0xEE, 0xEE));
    }

    #[test]
    fn test_end_document_writes_open_page() {
        let mut ds = stream();
        ds.start_document(None).unwrap();
        ds.start_page(100, 100, Rotation::Deg0, 240).unwrap();
        ds.create_object_container(
            &ObjectPlacement { x: 0, y: 0, width: 50, height: 50, rotation: Rotation::Deg0, mapping_option: mapping_option::SCALE_TO_FIT },
            registry::GIF,
            vec![0x47, 0x49, 0x46],
        )
        .unwrap();
        ds.end_document().unwrap();
        assert_eq!(ds.pages_written(), 1);
        let ids = field_ids(&ds.into_inner());
        assert!(ids.contains(&(0xA8, 0x92)));
        assert!(ids.contains(&(0xEE, 0x92)));
    }
}
