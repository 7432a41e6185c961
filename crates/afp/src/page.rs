//! Page objects (BPG ... EPG).
//!
//! A page is built up, sealed, then serialized exactly once. Content is
//! written in a fixed order: the begin record with its triplets, the active
//! environment group, tag logical elements, then the content objects in the
//! order they were added.

use crate::container::ObjectContainer;
use crate::ebcdic;
use crate::environment::ActiveEnvironmentGroup;
use crate::error::AfpError;
use crate::image::{gray_level, ImImageObject, ImageArea};
use crate::include::{IncludePageOverlay, IncludePageSegment};
use crate::maps::FontMapping;
use crate::no_operation::NoOperation;
use crate::presentation_text::PresentationTextObject;
use crate::rotation::Rotation;
use crate::structured_field::{category, serialize, serialize_all, sf_type, Field, StructuredObject};
use crate::tag::TagLogicalElement;
use crate::triplet::{Triplet, Triplets};
use folio_types::Color;
use log::trace;
use std::io::Write;

/// An object that can be placed on a page or in a page segment.
#[derive(Debug)]
pub enum PageContent {
    Text(PresentationTextObject),
    Image(ImImageObject),
    Overlay(IncludePageOverlay),
    Segment(IncludePageSegment),
    Container(ObjectContainer),
    NoOperation(NoOperation),
}

impl StructuredObject for PageContent {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        match self {
            PageContent::Text(object) => serialize(object, out),
            PageContent::Image(object) => serialize(object, out),
            PageContent::Overlay(object) => serialize(object, out),
            PageContent::Segment(object) => serialize(object, out),
            PageContent::Container(object) => serialize(object, out),
            PageContent::NoOperation(object) => serialize(object, out),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Building,
    Sealed,
    Serialized,
}

#[derive(Debug)]
pub struct PageObject {
    name: [u8; 8],
    width: i32,
    height: i32,
    rotation: Rotation,
    resolution: u32,
    state: PageState,
    triplets: Triplets,
    environment_group: ActiveEnvironmentGroup,
    tag_logical_elements: Vec<TagLogicalElement>,
    objects: Vec<PageContent>,
    text: Option<PresentationTextObject>,
}

impl PageObject {
    /// Creates a page of `width` x `height` units at `resolution` units per
    /// inch. The page's environment group is named `environment_name`.
    pub fn new(
        name: &str,
        environment_name: &str,
        width: i32,
        height: i32,
        rotation: Rotation,
        resolution: u32,
    ) -> Result<Self, AfpError> {
        if width <= 0 || height <= 0 {
            return Err(AfpError::InvalidGeometry(format!(
                "page must have a positive size, got {}x{}",
                width, height
            )));
        }
        if resolution == 0 {
            return Err(AfpError::InvalidGeometry("page resolution must be positive".into()));
        }
        let mut environment_group =
            ActiveEnvironmentGroup::new(environment_name, width, height, resolution, resolution)?;
        environment_group.set_object_area_position(0, 0, rotation)?;
        Ok(Self {
            name: ebcdic::encode_name(name),
            width,
            height,
            rotation,
            resolution,
            state: PageState::Building,
            triplets: Triplets::new(),
            environment_group,
            tag_logical_elements: Vec::new(),
            objects: Vec::new(),
            text: None,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    fn ensure_building(&self) -> Result<(), AfpError> {
        match self.state {
            PageState::Building => Ok(()),
            PageState::Sealed => Err(AfpError::PrerequisiteNotMet("page is sealed")),
            PageState::Serialized => Err(AfpError::PrerequisiteNotMet("page is already serialized")),
        }
    }

    pub fn environment_group(&self) -> &ActiveEnvironmentGroup {
        &self.environment_group
    }

    pub fn add_triplet(&mut self, triplet: Triplet) -> Result<(), AfpError> {
        self.ensure_building()?;
        self.triplets.push(triplet);
        Ok(())
    }

    pub fn create_font(&mut self, font: FontMapping) -> Result<(), AfpError> {
        self.ensure_building()?;
        self.environment_group.create_font(font)
    }

    pub fn add_tag_logical_element(&mut self, element: TagLogicalElement) -> Result<(), AfpError> {
        self.ensure_building()?;
        self.tag_logical_elements.push(element);
        Ok(())
    }

    /// The open presentation text object. When none is open a new one is
    /// created, named by `name`.
    pub fn presentation_text(
        &mut self,
        name: impl FnOnce() -> String,
    ) -> Result<&mut PresentationTextObject, AfpError> {
        self.ensure_building()?;
        Ok(self.text.get_or_insert_with(|| PresentationTextObject::new(&name())))
    }

    pub fn has_open_presentation_text(&self) -> bool {
        self.text.is_some()
    }

    /// Closes the open presentation text object, if any, and appends it to
    /// the page content.
    pub fn end_presentation_object(&mut self) {
        if let Some(text) = self.text.take() {
            self.objects.push(PageContent::Text(text));
        }
    }

    /// Adds a content object after closing any open presentation text.
    pub fn add_object(&mut self, object: PageContent) -> Result<(), AfpError> {
        self.ensure_building()?;
        self.end_presentation_object();
        self.objects.push(object);
        Ok(())
    }

    pub fn create_include_page_overlay(
        &mut self,
        name: &str,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) -> Result<(), AfpError> {
        self.ensure_building()?;
        let include = IncludePageOverlay::new(name, x, y, rotation)?;
        self.environment_group.create_overlay(name)?;
        self.add_object(PageContent::Overlay(include))
    }

    pub fn create_include_page_segment(&mut self, name: &str, x: i32, y: i32) -> Result<(), AfpError> {
        self.ensure_building()?;
        let include = IncludePageSegment::new(name, x, y)?;
        self.environment_group.add_map_page_segment(name)?;
        self.add_object(PageContent::Segment(include))
    }

    /// Paints the rectangle in page coordinates with `color` as a dithered
    /// IM image. The rectangle is remapped into the rotated page's
    /// coordinate system.
    pub fn create_shading(
        &mut self,
        image_name: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) -> Result<(), AfpError> {
        self.ensure_building()?;
        let (page_w, page_h) = (self.width, self.height);
        let (x, y, width, height) = match self.rotation {
            Rotation::Deg0 => (x, y, width, height),
            Rotation::Deg90 => (page_w - y - height, x, height, width),
            Rotation::Deg180 => (page_w - x - width, page_h - y - height, width, height),
            Rotation::Deg270 => (y, page_h - x - width, height, width),
        };
        let level = gray_level(color);
        trace!("Shading {}x{} at ({}, {}) with gray level {}", width, height, x, y, level);
        let area = ImageArea { x, y, width, height, rotation: Rotation::Deg0, resolution: self.resolution };
        let image = ImImageObject::shading(image_name, &area, level)?;
        self.add_object(PageContent::Image(image))
    }

    /// Ends building: closes open presentation text and refuses further
    /// content.
    pub fn seal(&mut self) {
        if self.state == PageState::Building {
            self.end_presentation_object();
            self.state = PageState::Sealed;
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len() + usize::from(self.text.is_some())
    }
}

impl StructuredObject for PageObject {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        if self.state == PageState::Serialized {
            return Err(AfpError::PrerequisiteNotMet("page is already serialized"));
        }
        self.seal();
        let mut field = Field::named(sf_type::BEGIN, category::PAGE, &self.name);
        field.put_triplets(&mut self.triplets)?;
        field.write_to(out)
    }

    fn write_content(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        serialize(&mut self.environment_group, out)?;
        serialize_all(&mut self.tag_logical_elements, out)?;
        serialize_all(&mut self.objects, out)
    }

    fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::END, category::PAGE, &self.name).write_to(out)?;
        self.state = PageState::Serialized;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation_text::TextRun;
    use crate::testing::{field_ids, fields};
    use crate::triplet::mapping_option;

    fn page(rotation: Rotation) -> PageObject {
        PageObject::new("PGN00001", "AEG00001", 2000, 3000, rotation, 240).unwrap()
    }

    fn text(page: &mut PageObject, name: &str) {
        page.presentation_text(|| name.to_string())
            .unwrap()
            .create_text(&TextRun { x: 1, y: 2, font_reference: 1, rotation: Rotation::Deg0, text: "x" })
            .unwrap();
    }

    #[test]
    fn test_fully_populated_page_order() {
        let mut page = page(Rotation::Deg0);
        page.add_triplet(Triplet::Comment("c".into())).unwrap();
        page.create_font(FontMapping {
            reference: 1,
            character_set: "C0H200B0".into(),
            code_page: "T1V10500".into(),
            rotation: Rotation::Deg0,
            outline_size: None,
        })
        .unwrap();
        page.add_tag_logical_element(TagLogicalElement::new("K", "V")).unwrap();
        text(&mut page, "PTO00001");
        page.create_shading("IMG00001", 0, 0, 10, 10, Color::gray(200)).unwrap();
        page.create_include_page_overlay("OVERLAY1", 0, 0, Rotation::Deg0).unwrap();
        page.create_include_page_segment("SEG1", 0, 0).unwrap();
        let mut container = ObjectContainer::new("OBC00001", crate::registry::TIFF);
        container.add_triplet(Triplet::MappingOption(mapping_option::SCALE_TO_FIT));
        page.add_object(PageContent::Container(container)).unwrap();
        text(&mut page, "PTO00002");

        let mut out = Vec::new();
        serialize(&mut page, &mut out).unwrap();
        let ids = field_ids(&out);
        let begin_end: Vec<_> = ids.iter().filter(|(t, _)| *t == 0xA8 || *t == 0xA9).copied().collect();
        assert_eq!(
            begin_end,
            vec![
                (0xA8, 0xAF), // page
                (0xA8, 0xC9),
                (0xA9, 0xC9),
                (0xA8, 0x9B), // first text object
                (0xA9, 0x9B),
                (0xA8, 0x7B),
                (0xA9, 0x7B),
                (0xA8, 0x92),
                (0xA9, 0x92),
                (0xA8, 0x9B), // text closed when sealing
                (0xA9, 0x9B),
                (0xA9, 0xAF),
            ]
        );
        // tag logical element right after the environment group
        let aeg_end = ids.iter().position(|id| *id == (0xA9, 0xC9)).unwrap();
        assert_eq!(ids[aeg_end + 1], (0xA0, 0x90));
        // includes keep their place between the image and the container
        let image_end = ids.iter().position(|id| *id == (0xA9, 0x7B)).unwrap();
        assert_eq!(&ids[image_end + 1..image_end + 3], &[(0xAF, 0xD8), (0xAF, 0x5F)]);
        // the page begin carries its comment triplet
        assert_eq!(fields(&out)[0].len(), 17 + 3);
    }

    #[test]
    fn test_sealed_page_refuses_content() {
        let mut page = page(Rotation::Deg0);
        page.seal();
        assert!(matches!(
            page.add_tag_logical_element(TagLogicalElement::new("K", "V")),
            Err(AfpError::PrerequisiteNotMet(_))
        ));
        assert!(page.presentation_text(|| "PTO00001".to_string()).is_err());
    }

    #[test]
    fn test_page_serializes_once() {
        let mut page = page(Rotation::Deg0);
        serialize(&mut page, &mut Vec::new()).unwrap();
        assert_eq!(page.state(), PageState::Serialized);
        assert!(matches!(serialize(&mut page, &mut Vec::new()), Err(AfpError::PrerequisiteNotMet(_))));
    }

    #[test]
    fn test_add_object_closes_open_text() {
        let mut page = page(Rotation::Deg0);
        text(&mut page, "PTO00001");
        assert!(page.has_open_presentation_text());
        page.create_include_page_segment("SEG1", 0, 0).unwrap();
        assert!(!page.has_open_presentation_text());
        assert_eq!(page.object_count(), 2);
    }

    fn shading_origin_and_size(rotation: Rotation) -> [u8; 14] {
        let mut page = page(rotation);
        page.create_shading("IMG00001", 100, 200, 30, 40, Color::BLACK).unwrap();
        let mut out = Vec::new();
        serialize(&mut page, &mut out).unwrap();
        let records = fields(&out);
        let ioc = records.iter().find(|r| r[4] == 0xA7 && r[5] == 0x7B).unwrap();
        let icp = records.iter().find(|r| r[4] == 0xAC && r[5] == 0x7B).unwrap();
        let mut result = [0u8; 14];
        result[..6].copy_from_slice(&ioc[9..15]);
        result[6..10].copy_from_slice(&icp[17..21]);
        result[10..].copy_from_slice(&[0; 4]);
        result
    }

    #[test]
    fn test_shading_rotation_remaps_rectangle() {
        // page is 2000 x 3000
        let at = |x: u16, y: u16, w: u16, h: u16| {
            let mut r = [0u8; 14];
            r[1..3].copy_from_slice(&x.to_be_bytes());
            r[4..6].copy_from_slice(&y.to_be_bytes());
            r[6..8].copy_from_slice(&w.to_be_bytes());
            r[8..10].copy_from_slice(&h.to_be_bytes());
            r
        };
        assert_eq!(shading_origin_and_size(Rotation::Deg0), at(100, 200, 30, 40));
        assert_eq!(shading_origin_and_size(Rotation::Deg90), at(2000 - 200 - 40, 100, 40, 30));
        assert_eq!(shading_origin_and_size(Rotation::Deg180), at(2000 - 100 - 30, 3000 - 200 - 40, 30, 40));
        assert_eq!(shading_origin_and_size(Rotation::Deg270), at(200, 3000 - 100 - 30, 40, 30));
    }

    #[test]
    fn test_rejects_bad_pages() {
        assert!(matches!(
            PageObject::new("P", "A", 0, 10, Rotation::Deg0, 240),
            Err(AfpError::InvalidGeometry(_))
        ));
        assert!(matches!(
            PageObject::new("P", "A", 10, 10, Rotation::Deg0, 0),
            Err(AfpError::InvalidGeometry(_))
        ));
    }
}
