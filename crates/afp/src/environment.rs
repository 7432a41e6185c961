//! Active and object environment groups.
//!
//! An active environment group (AEG) sits at the start of every page and maps
//! the resources the page uses; an object environment group (OEG) does the
//! same for a single data object.

use crate::descriptors::{
    ContainerDataDescriptor, GraphicsDataDescriptor, ObjectAreaDescriptor, ObjectAreaPosition,
    PageDescriptor, PresentationTextDescriptor,
};
use crate::ebcdic;
use crate::error::AfpError;
use crate::maps::{
    append_with_overflow, FontMapping, MapCodedFont, MapContainerData, MapDataResource,
    MapPageOverlay, MapPageSegment,
};
use crate::rotation::Rotation;
use crate::structured_field::{category, serialize, serialize_all, sf_type, Field, StructuredObject};
use crate::triplet::{Triplet, Triplets};
use std::io::Write;

/// Writes an object area descriptor and position. Both or neither must be
/// present.
fn write_object_area(
    descriptor: &mut Option<ObjectAreaDescriptor>,
    position: &mut Option<ObjectAreaPosition>,
    out: &mut dyn Write,
) -> Result<(), AfpError> {
    match (descriptor, position) {
        (Some(descriptor), Some(position)) => {
            serialize(descriptor, out)?;
            serialize(position, out)
        }
        (None, None) => Ok(()),
        (Some(_), None) => Err(AfpError::PrerequisiteNotMet(
            "object area descriptor written without an object area position",
        )),
        (None, Some(_)) => Err(AfpError::PrerequisiteNotMet(
            "object area position written without an object area descriptor",
        )),
    }
}

#[derive(Debug)]
pub struct ActiveEnvironmentGroup {
    name: [u8; 8],
    triplets: Triplets,
    coded_fonts: Vec<MapCodedFont>,
    data_resources: Vec<MapDataResource>,
    page_overlays: Vec<MapPageOverlay>,
    page_segments: Vec<MapPageSegment>,
    page_descriptor: PageDescriptor,
    object_area_descriptor: Option<ObjectAreaDescriptor>,
    object_area_position: Option<ObjectAreaPosition>,
    presentation_text_descriptor: Option<PresentationTextDescriptor>,
}

impl ActiveEnvironmentGroup {
    pub fn new(
        name: &str,
        width: i32,
        height: i32,
        x_resolution: u32,
        y_resolution: u32,
    ) -> Result<Self, AfpError> {
        Ok(Self {
            name: ebcdic::encode_name(name),
            triplets: Triplets::new(),
            coded_fonts: Vec::new(),
            data_resources: Vec::new(),
            page_overlays: Vec::new(),
            page_segments: Vec::new(),
            page_descriptor: PageDescriptor::new(width, height, x_resolution, y_resolution)?,
            object_area_descriptor: Some(ObjectAreaDescriptor::new(
                width,
                height,
                x_resolution,
                y_resolution,
            )?),
            object_area_position: Some(ObjectAreaPosition::new(0, 0, Rotation::Deg0)?),
            presentation_text_descriptor: Some(PresentationTextDescriptor::new(
                width,
                height,
                x_resolution,
                y_resolution,
            )?),
        })
    }

    pub fn add_triplet(&mut self, triplet: Triplet) {
        self.triplets.push(triplet);
    }

    /// Replaces the default position at the page origin.
    pub fn set_object_area_position(&mut self, x: i32, y: i32, rotation: Rotation) -> Result<(), AfpError> {
        self.object_area_position = Some(ObjectAreaPosition::new(x, y, rotation)?);
        Ok(())
    }

    /// Maps a coded font. A reference that is already mapped is left alone.
    pub fn create_font(&mut self, font: FontMapping) -> Result<(), AfpError> {
        if self.coded_fonts.iter().any(|map| map.contains(font.reference)) {
            return Ok(());
        }
        append_with_overflow(&mut self.coded_fonts, font)
    }

    /// Maps a page overlay by its 8-character name.
    pub fn create_overlay(&mut self, name: &str) -> Result<(), AfpError> {
        if self.page_overlays.iter().any(|map| map.contains(name)) {
            return Ok(());
        }
        append_with_overflow(&mut self.page_overlays, name.to_string())
    }

    pub fn add_map_page_segment(&mut self, name: &str) -> Result<(), AfpError> {
        if self.page_segments.iter().any(|map| map.contains(name)) {
            return Ok(());
        }
        append_with_overflow(&mut self.page_segments, name.to_string())
    }

    pub fn add_map_data_resource(&mut self, resource: MapDataResource) {
        self.data_resources.push(resource);
    }

    pub fn coded_fonts(&self) -> &[MapCodedFont] {
        &self.coded_fonts
    }

    pub fn page_overlays(&self) -> &[MapPageOverlay] {
        &self.page_overlays
    }

    pub fn page_segments(&self) -> &[MapPageSegment] {
        &self.page_segments
    }
}

impl StructuredObject for ActiveEnvironmentGroup {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::named(sf_type::BEGIN, category::ACTIVE_ENVIRONMENT_GROUP, &self.name);
        field.put_triplets(&mut self.triplets)?;
        field.write_to(out)
    }

    fn write_content(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        serialize_all(&mut self.coded_fonts, out)?;
        serialize_all(&mut self.data_resources, out)?;
        serialize_all(&mut self.page_overlays, out)?;
        serialize_all(&mut self.page_segments, out)?;
        serialize(&mut self.page_descriptor, out)?;
        write_object_area(&mut self.object_area_descriptor, &mut self.object_area_position, out)?;
        if let Some(descriptor) = self.presentation_text_descriptor.as_mut() {
            serialize(descriptor, out)?;
        }
        Ok(())
    }

    fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::END, category::ACTIVE_ENVIRONMENT_GROUP, &self.name).write_to(out)
    }
}

/// The data descriptor that closes an object environment group.
#[derive(Debug)]
pub enum DataDescriptor {
    Container(ContainerDataDescriptor),
    Graphics(GraphicsDataDescriptor),
}

impl StructuredObject for DataDescriptor {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        match self {
            DataDescriptor::Container(descriptor) => serialize(descriptor, out),
            DataDescriptor::Graphics(descriptor) => serialize(descriptor, out),
        }
    }
}

#[derive(Debug)]
pub struct ObjectEnvironmentGroup {
    name: [u8; 8],
    triplets: Triplets,
    map_data_resources: Vec<MapDataResource>,
    map_container_data: Option<MapContainerData>,
    object_area_descriptor: Option<ObjectAreaDescriptor>,
    object_area_position: Option<ObjectAreaPosition>,
    data_descriptor: Option<DataDescriptor>,
}

impl ObjectEnvironmentGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: ebcdic::encode_name(name),
            triplets: Triplets::new(),
            map_data_resources: Vec::new(),
            map_container_data: None,
            object_area_descriptor: None,
            object_area_position: None,
            data_descriptor: None,
        }
    }

    pub fn add_triplet(&mut self, triplet: Triplet) {
        self.triplets.push(triplet);
    }

    pub fn add_map_data_resource(&mut self, resource: MapDataResource) {
        self.map_data_resources.push(resource);
    }

    pub fn set_map_container_data(&mut self, map: MapContainerData) {
        self.map_container_data = Some(map);
    }

    pub fn set_object_area(
        &mut self,
        descriptor: ObjectAreaDescriptor,
        position: ObjectAreaPosition,
    ) {
        self.object_area_descriptor = Some(descriptor);
        self.object_area_position = Some(position);
    }

    pub fn set_data_descriptor(&mut self, descriptor: DataDescriptor) {
        self.data_descriptor = Some(descriptor);
    }
}

impl StructuredObject for ObjectEnvironmentGroup {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::named(sf_type::BEGIN, category::OBJECT_ENVIRONMENT_GROUP, &self.name);
        field.put_triplets(&mut self.triplets)?;
        field.write_to(out)
    }

    fn write_content(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        serialize_all(&mut self.map_data_resources, out)?;
        if let Some(map) = self.map_container_data.as_mut() {
            serialize(map, out)?;
        }
        write_object_area(&mut self.object_area_descriptor, &mut self.object_area_position, out)?;
        if let Some(descriptor) = self.data_descriptor.as_mut() {
            serialize(descriptor, out)?;
        }
        Ok(())
    }

    fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::END, category::OBJECT_ENVIRONMENT_GROUP, &self.name).write_to(out)
    }
}
