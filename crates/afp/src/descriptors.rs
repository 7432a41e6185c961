//! Descriptor and position records: page, object area, presentation text,
//! object container and graphics data descriptors.
//!
//! Sizes and offsets are validated and encoded when the descriptor is
//! created, so writing can only fail on I/O.

use crate::binary::{i16_field, i24_field, u16_field, u24_field};
use crate::error::AfpError;
use crate::rotation::Rotation;
use crate::structured_field::{category, sf_type, Field, StructuredObject};
use crate::triplet::{Triplet, Triplets};
use std::io::Write;

/// Units per ten inches, as stored in descriptor unit fields.
fn units(field: &'static str, resolution: u32) -> Result<[u8; 2], AfpError> {
    u16_field(field, i64::from(resolution) * 10)
}

fn size(field: &'static str, value: i32) -> Result<[u8; 3], AfpError> {
    if value <= 0 {
        return Err(AfpError::InvalidGeometry(format!("{} must be positive, got {}", field, value)));
    }
    u24_field(field, i64::from(value))
}

/// Shared units-and-extent block of the page, presentation text and
/// container data descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Extent {
    x_units: [u8; 2],
    y_units: [u8; 2],
    width: [u8; 3],
    height: [u8; 3],
}

impl Extent {
    fn new(width: i32, height: i32, x_resolution: u32, y_resolution: u32) -> Result<Self, AfpError> {
        Ok(Self {
            x_units: units("x resolution", x_resolution)?,
            y_units: units("y resolution", y_resolution)?,
            width: size("width", width)?,
            height: size("height", height)?,
        })
    }

    fn put(&self, field: &mut Field) {
        // x and y base: ten inches
        field
            .put(&[0x00, 0x00])
            .put(&self.x_units)
            .put(&self.y_units)
            .put(&self.width)
            .put(&self.height);
    }
}

/// Page Descriptor (PGD).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    extent: Extent,
}

impl PageDescriptor {
    pub fn new(width: i32, height: i32, x_resolution: u32, y_resolution: u32) -> Result<Self, AfpError> {
        Ok(Self { extent: Extent::new(width, height, x_resolution, y_resolution)? })
    }
}

impl StructuredObject for PageDescriptor {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::DESCRIPTOR, category::PAGE);
        self.extent.put(&mut field);
        field.put_zeros(3);
        field.write_to(out)
    }
}

/// Presentation Text Descriptor (PTD, migration format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationTextDescriptor {
    extent: Extent,
}

impl PresentationTextDescriptor {
    pub fn new(width: i32, height: i32, x_resolution: u32, y_resolution: u32) -> Result<Self, AfpError> {
        Ok(Self { extent: Extent::new(width, height, x_resolution, y_resolution)? })
    }
}

impl StructuredObject for PresentationTextDescriptor {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::MIGRATION, category::PRESENTATION_TEXT);
        self.extent.put(&mut field);
        field.put_zeros(2);
        field.write_to(out)
    }
}

/// Container Data Descriptor (CDD).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDataDescriptor {
    extent: Extent,
}

impl ContainerDataDescriptor {
    pub fn new(width: i32, height: i32, x_resolution: u32, y_resolution: u32) -> Result<Self, AfpError> {
        Ok(Self { extent: Extent::new(width, height, x_resolution, y_resolution)? })
    }
}

impl StructuredObject for ContainerDataDescriptor {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::DESCRIPTOR, category::OBJECT_CONTAINER);
        self.extent.put(&mut field);
        field.write_to(out)
    }
}

/// Graphics Data Descriptor (GDD): the drawing order subset and the
/// graphics presentation space window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsDataDescriptor {
    resolution: [u8; 2],
    window: [[u8; 2]; 4],
}

impl GraphicsDataDescriptor {
    const DRAWING_ORDER_SUBSET: [u8; 9] = [0xF7, 0x07, 0xB0, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00];
    // absolute coordinates, image resolution given
    const WINDOW_FLAGS: u8 = 0x08 | 0x02;

    pub fn new(
        x_left: i32,
        x_right: i32,
        y_bottom: i32,
        y_top: i32,
        resolution: u32,
    ) -> Result<Self, AfpError> {
        Ok(Self {
            resolution: units("graphics resolution", resolution)?,
            window: [
                i16_field("window left", i64::from(x_left))?,
                i16_field("window right", i64::from(x_right))?,
                i16_field("window bottom", i64::from(y_bottom))?,
                i16_field("window top", i64::from(y_top))?,
            ],
        })
    }

    fn window_specification(&self) -> Vec<u8> {
        let mut spec = vec![0xF6, 0x00, Self::WINDOW_FLAGS, 0x00, 0x00, 0x00];
        // x, y and image resolution share one value
        for _ in 0..3 {
            spec.extend_from_slice(&self.resolution);
        }
        for coordinate in &self.window {
            spec.extend_from_slice(coordinate);
        }
        spec[1] = (spec.len() - 2) as u8;
        spec
    }
}

impl StructuredObject for GraphicsDataDescriptor {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::DESCRIPTOR, category::GRAPHICS);
        field
            .put(&Self::DRAWING_ORDER_SUBSET)
            .put(&self.window_specification());
        field.write_to(out)
    }
}

/// Object Area Descriptor (OBD).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAreaDescriptor {
    triplets: Triplets,
}

impl ObjectAreaDescriptor {
    pub fn new(width: i32, height: i32, x_resolution: u32, y_resolution: u32) -> Result<Self, AfpError> {
        if width <= 0 || height <= 0 {
            return Err(AfpError::InvalidGeometry(format!(
                "object area must have a positive size, got {}x{}",
                width, height
            )));
        }
        let triplets = [
            Triplet::DescriptorPosition(0x01),
            Triplet::measurement_units(x_resolution, y_resolution)?,
            Triplet::object_area_size(width, height)?,
        ]
        .into_iter()
        .collect();
        Ok(Self { triplets })
    }
}

impl StructuredObject for ObjectAreaDescriptor {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::DESCRIPTOR, category::OBJECT_AREA);
        field.put_triplets(&mut self.triplets)?;
        field.write_to(out)
    }
}

/// Object Area Position (OBP).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAreaPosition {
    x: [u8; 3],
    y: [u8; 3],
    rotation: Rotation,
}

impl ObjectAreaPosition {
    const REPEATING_GROUP_LENGTH: u8 = 0x17;
    const REFERENCE_COORDINATE_SYSTEM: u8 = 0x01;

    pub fn new(x: i32, y: i32, rotation: Rotation) -> Result<Self, AfpError> {
        Ok(Self {
            x: i24_field("object area x offset", i64::from(x))?,
            y: i24_field("object area y offset", i64::from(y))?,
            rotation,
        })
    }
}

impl StructuredObject for ObjectAreaPosition {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::POSITION, category::OBJECT_AREA);
        field
            .put_u8(0x01)
            .put_u8(Self::REPEATING_GROUP_LENGTH)
            .put(&self.x)
            .put(&self.y)
            .put(&self.rotation.orientation())
            .put(&self.rotation.quarter_turn().orientation())
            .put_zeros(1)
            // object content offset and orientation: none
            .put_zeros(6)
            .put(&Rotation::Deg0.orientation())
            .put(&Rotation::Deg90.orientation())
            .put_u8(Self::REFERENCE_COORDINATE_SYSTEM);
        field.write_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_field::serialize;

    fn bytes<O: StructuredObject>(mut object: O) -> Vec<u8> {
        let mut out = Vec::new();
        serialize(&mut object, &mut out).unwrap();
        out
    }

    #[test]
    fn test_page_descriptor_layout() {
        let out = bytes(PageDescriptor::new(1984, 2806, 240, 240).unwrap());
        assert_eq!(out.len(), 24);
        assert_eq!(&out[1..3], &[0x00, 0x17]);
        assert_eq!(&out[9..15], &[0x00, 0x00, 0x09, 0x60, 0x09, 0x60]);
        assert_eq!(&out[15..21], &[0x00, 0x07, 0xC0, 0x00, 0x0A, 0xF6]);
    }

    #[test]
    fn test_presentation_text_descriptor_layout() {
        let out = bytes(PresentationTextDescriptor::new(100, 200, 1440, 1440).unwrap());
        assert_eq!(out.len(), 23);
        assert_eq!(&out[1..3], &[0x00, 0x16]);
        assert_eq!(&out[4..6], &[0xB1, 0x9B]);
        assert_eq!(&out[11..13], &[0x38, 0x40]);
    }

    #[test]
    fn test_container_data_descriptor_layout() {
        let out = bytes(ContainerDataDescriptor::new(10, 20, 240, 240).unwrap());
        assert_eq!(out.len(), 21);
        assert_eq!(&out[4..6], &[0xA6, 0x92]);
    }

    #[test]
    fn test_object_area_pair_layout() {
        let descriptor = bytes(ObjectAreaDescriptor::new(50, 60, 240, 240).unwrap());
        assert_eq!(descriptor.len(), 9 + 3 + 8 + 9);
        assert_eq!(u16::from_be_bytes([descriptor[1], descriptor[2]]) as usize, descriptor.len() - 1);

        let position = bytes(ObjectAreaPosition::new(10, 20, Rotation::Deg90).unwrap());
        assert_eq!(position.len(), 33);
        assert_eq!(&position[1..3], &[0x00, 0x20]);
        assert_eq!(&position[9..17], &[0x01, 0x17, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x14]);
        assert_eq!(position[17], 45);
        assert_eq!(position[19], 90);
        assert_eq!(position[30], 0x2D);
        assert_eq!(position[32], 0x01);
    }

    #[test]
    fn test_graphics_data_descriptor_window() {
        let out = bytes(GraphicsDataDescriptor::new(0, 100, 0, 50, 240).unwrap());
        assert_eq!(&out[9..18], &GraphicsDataDescriptor::DRAWING_ORDER_SUBSET);
        assert_eq!(out[18], 0xF6);
        assert_eq!(out[19] as usize, out.len() - 20);
        assert_eq!(out[20], 0x0A);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(matches!(PageDescriptor::new(0, 10, 240, 240), Err(AfpError::InvalidGeometry(_))));
        assert!(matches!(
            PageDescriptor::new(0x100_0000, 10, 240, 240),
            Err(AfpError::ValueOutOfRange { .. })
        ));
        assert!(ObjectAreaDescriptor::new(-5, 10, 240, 240).is_err());
    }
}
