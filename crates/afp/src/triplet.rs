//! Triplets: self-describing `length, id, payload` parameters appended to
//! begin, map and descriptor records.

use crate::binary::{u16_field, u24_field};
use crate::ebcdic;
use crate::error::AfpError;
use crate::registry::ObjectType;

pub mod id {
    pub const FULLY_QUALIFIED_NAME: u8 = 0x02;
    pub const MAPPING_OPTION: u8 = 0x04;
    pub const OBJECT_CLASSIFICATION: u8 = 0x10;
    pub const RESOURCE_LOCAL_IDENTIFIER: u8 = 0x24;
    pub const CHARACTER_ROTATION: u8 = 0x26;
    pub const ATTRIBUTE_VALUE: u8 = 0x36;
    pub const DESCRIPTOR_POSITION: u8 = 0x43;
    pub const MEASUREMENT_UNITS: u8 = 0x4B;
    pub const OBJECT_AREA_SIZE: u8 = 0x4C;
    pub const COMMENT: u8 = 0x65;
}

/// Fully qualified name types.
pub mod fqn_type {
    pub const REPLACE_FIRST_GID: u8 = 0x01;
    pub const ATTRIBUTE_GID: u8 = 0x0B;
    pub const BEGIN_RESOURCE_OBJECT_REF: u8 = 0x84;
    pub const CODE_PAGE_NAME_REF: u8 = 0x85;
    pub const FONT_CHARSET_NAME_REF: u8 = 0x86;
    pub const CODED_FONT_NAME_REF: u8 = 0x8E;
    pub const INTERNAL_RESOURCE_REF: u8 = 0xBE;
    pub const DATA_OBJECT_EXTERNAL_RESOURCE_REF: u8 = 0xDE;
}

/// Resource local identifier types.
pub mod resource_type {
    pub const USAGE_DEPENDENT: u8 = 0x00;
    pub const PAGE_OVERLAY: u8 = 0x02;
    pub const CODED_FONT: u8 = 0x05;
}

/// Mapping options for data objects placed in an object area.
pub mod mapping_option {
    pub const POSITION: u8 = 0x00;
    pub const POSITION_AND_TRIM: u8 = 0x10;
    pub const SCALE_TO_FIT: u8 = 0x20;
    pub const CENTER_AND_TRIM: u8 = 0x30;
    pub const SCALE_TO_FILL: u8 = 0x60;
}

/// Object classes for the object classification triplet.
pub mod object_class {
    pub const TIME_INVARIANT_PAGINATED_PRESENTATION: u8 = 0x01;
    pub const TIME_VARIANT_PRESENTATION: u8 = 0x10;
    pub const EXECUTABLE_PROGRAM: u8 = 0x20;
    pub const SETUP_FILE: u8 = 0x30;
    pub const SECONDARY_RESOURCE: u8 = 0x40;
    pub const DATA_OBJECT_FONT: u8 = 0x41;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FqnFormat {
    /// EBCDIC character string.
    CharString,
    /// ASN.1 object identifier, written as raw bytes.
    Oid,
    /// Uniform resource locator, written as ASCII.
    Url,
}

impl FqnFormat {
    fn code(self) -> u8 {
        match self {
            FqnFormat::CharString => 0x00,
            FqnFormat::Oid => 0x10,
            FqnFormat::Url => 0x20,
        }
    }
}

/// Classifies a data object carried in an object container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectClassification {
    pub object_class: u8,
    pub object_type: ObjectType,
    pub data_in_container: bool,
    pub container_has_oeg: bool,
    pub data_in_ocd: bool,
    pub level: String,
    pub company: String,
}

impl ObjectClassification {
    pub const LENGTH: usize = 96;

    pub fn new(object_class: u8, object_type: ObjectType) -> Self {
        Self {
            object_class,
            object_type,
            data_in_container: true,
            container_has_oeg: true,
            data_in_ocd: true,
            level: String::new(),
            company: String::new(),
        }
    }

    fn structure_flags(&self) -> [u8; 2] {
        let flag = |set: bool| if set { 3u8 } else { 1u8 };
        [
            (flag(self.data_in_container) << 6)
                | (flag(self.container_has_oeg) << 4)
                | (flag(self.data_in_ocd) << 2),
            0x00,
        ]
    }

    fn write_payload(&self, out: &mut Vec<u8>) {
        out.push(0x00);
        out.push(self.object_class);
        out.extend_from_slice(&[0x00, 0x00]);
        out.extend_from_slice(&self.structure_flags());
        out.extend_from_slice(&self.object_type.registry_id());
        out.extend_from_slice(&ebcdic::encode_padded::<32>(self.object_type.name));
        out.extend_from_slice(&ebcdic::encode_padded::<8>(&self.level));
        out.extend_from_slice(&ebcdic::encode_padded::<32>(&self.company));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Triplet {
    FullyQualifiedName {
        fqn_type: u8,
        format: FqnFormat,
        name: String,
    },
    MappingOption(u8),
    ObjectClassification(Box<ObjectClassification>),
    ResourceLocalIdentifier {
        resource_type: u8,
        local_id: u8,
    },
    /// Character rotation for a coded font mapping; the value is the
    /// 2-byte orientation code.
    CharacterRotation([u8; 2]),
    AttributeValue(String),
    DescriptorPosition(u8),
    /// Units per ten inches along each axis.
    MeasurementUnits {
        x_units: [u8; 2],
        y_units: [u8; 2],
    },
    ObjectAreaSize {
        width: [u8; 3],
        height: [u8; 3],
    },
    Comment(String),
}

impl Triplet {
    pub fn fully_qualified_name(fqn_type: u8, format: FqnFormat, name: impl Into<String>) -> Self {
        Triplet::FullyQualifiedName { fqn_type, format, name: name.into() }
    }

    /// Measurement units from a resolution in units per inch.
    pub fn measurement_units(x_resolution: u32, y_resolution: u32) -> Result<Self, AfpError> {
        Ok(Triplet::MeasurementUnits {
            x_units: u16_field("x units per 10 inches", i64::from(x_resolution) * 10)?,
            y_units: u16_field("y units per 10 inches", i64::from(y_resolution) * 10)?,
        })
    }

    pub fn object_area_size(width: i32, height: i32) -> Result<Self, AfpError> {
        Ok(Triplet::ObjectAreaSize {
            width: u24_field("object area width", i64::from(width))?,
            height: u24_field("object area height", i64::from(height))?,
        })
    }

    pub fn id(&self) -> u8 {
        match self {
            Triplet::FullyQualifiedName { .. } => id::FULLY_QUALIFIED_NAME,
            Triplet::MappingOption(_) => id::MAPPING_OPTION,
            Triplet::ObjectClassification(_) => id::OBJECT_CLASSIFICATION,
            Triplet::ResourceLocalIdentifier { .. } => id::RESOURCE_LOCAL_IDENTIFIER,
            Triplet::CharacterRotation(_) => id::CHARACTER_ROTATION,
            Triplet::AttributeValue(_) => id::ATTRIBUTE_VALUE,
            Triplet::DescriptorPosition(_) => id::DESCRIPTOR_POSITION,
            Triplet::MeasurementUnits { .. } => id::MEASUREMENT_UNITS,
            Triplet::ObjectAreaSize { .. } => id::OBJECT_AREA_SIZE,
            Triplet::Comment(_) => id::COMMENT,
        }
    }

    fn payload_length(&self) -> usize {
        match self {
            Triplet::FullyQualifiedName { format, name, .. } => {
                2 + match format {
                    FqnFormat::CharString => ebcdic::encoded_len(name),
                    FqnFormat::Oid | FqnFormat::Url => name.len(),
                }
            }
            Triplet::MappingOption(_) | Triplet::DescriptorPosition(_) => 1,
            Triplet::ObjectClassification(_) => ObjectClassification::LENGTH - 2,
            Triplet::ResourceLocalIdentifier { .. } | Triplet::CharacterRotation(_) => 2,
            Triplet::AttributeValue(value) => 2 + ebcdic::encoded_len(value),
            Triplet::MeasurementUnits { .. } => 6,
            Triplet::ObjectAreaSize { .. } => 7,
            Triplet::Comment(text) => ebcdic::encoded_len(text),
        }
    }

    /// Encoded length including the length and id bytes.
    pub fn data_length(&self) -> usize {
        2 + self.payload_length()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), AfpError> {
        let length = self.data_length();
        if length > 0xFF {
            return Err(AfpError::ValueOutOfRange {
                field: "triplet length",
                value: length as i64,
                max: 0xFF,
            });
        }
        out.push(length as u8);
        out.push(self.id());
        match self {
            Triplet::FullyQualifiedName { fqn_type, format, name } => {
                out.push(*fqn_type);
                out.push(format.code());
                match format {
                    FqnFormat::CharString => out.extend(ebcdic::encode(name)),
                    FqnFormat::Oid | FqnFormat::Url => out.extend_from_slice(name.as_bytes()),
                }
            }
            Triplet::MappingOption(option) => out.push(*option),
            Triplet::ObjectClassification(classification) => classification.write_payload(out),
            Triplet::ResourceLocalIdentifier { resource_type, local_id } => {
                out.extend_from_slice(&[*resource_type, *local_id]);
            }
            Triplet::CharacterRotation(orientation) => out.extend_from_slice(orientation),
            Triplet::AttributeValue(value) => {
                out.extend_from_slice(&[0x00, 0x00]);
                out.extend(ebcdic::encode(value));
            }
            Triplet::DescriptorPosition(position) => out.push(*position),
            Triplet::MeasurementUnits { x_units, y_units } => {
                // 0x00 base: ten inches
                out.extend_from_slice(&[0x00, 0x00]);
                out.extend_from_slice(x_units);
                out.extend_from_slice(y_units);
            }
            Triplet::ObjectAreaSize { width, height } => {
                out.push(0x02);
                out.extend_from_slice(width);
                out.extend_from_slice(height);
            }
            Triplet::Comment(text) => out.extend(ebcdic::encode(text)),
        }
        Ok(())
    }
}

/// An ordered triplet list owned by a structured object.
///
/// Writing drains the list, so a record's triplets are emitted exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triplets(Vec<Triplet>);

impl Triplets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triplet: Triplet) {
        self.0.push(triplet);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triplet> {
        self.0.iter()
    }

    /// Sum of the encoded lengths of all triplets.
    pub fn data_length(&self) -> usize {
        self.0.iter().map(Triplet::data_length).sum()
    }

    pub fn write_to(&mut self, out: &mut Vec<u8>) -> Result<(), AfpError> {
        for triplet in std::mem::take(&mut self.0) {
            triplet.write_to(out)?;
        }
        Ok(())
    }
}

impl FromIterator<Triplet> for Triplets {
    fn from_iter<I: IntoIterator<Item = Triplet>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Triplet> for Triplets {
    fn extend<I: IntoIterator<Item = Triplet>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn every_kind() -> Vec<Triplet> {
        vec![
            Triplet::fully_qualified_name(fqn_type::CODE_PAGE_NAME_REF, FqnFormat::CharString, "T1V10500"),
            Triplet::fully_qualified_name(
                fqn_type::DATA_OBJECT_EXTERNAL_RESOURCE_REF,
                FqnFormat::Url,
                "file:///tmp/logo.tif",
            ),
            Triplet::MappingOption(mapping_option::SCALE_TO_FIT),
            Triplet::ObjectClassification(Box::new(ObjectClassification::new(
                object_class::TIME_INVARIANT_PAGINATED_PRESENTATION,
                registry::TIFF,
            ))),
            Triplet::ResourceLocalIdentifier { resource_type: resource_type::CODED_FONT, local_id: 1 },
            Triplet::CharacterRotation([0x2D, 0x00]),
            Triplet::AttributeValue("Chapter 1".into()),
            Triplet::DescriptorPosition(0x01),
            Triplet::measurement_units(240, 240).unwrap(),
            Triplet::object_area_size(1984, 2806).unwrap(),
            Triplet::Comment("made by folio".into()),
        ]
    }

    #[test]
    fn test_data_length_matches_written_bytes() {
        for triplet in every_kind() {
            let mut out = Vec::new();
            triplet.write_to(&mut out).unwrap();
            assert_eq!(out.len(), triplet.data_length(), "{:?}", triplet);
            assert_eq!(out[0] as usize, out.len());
            assert_eq!(out[1], triplet.id());
        }
    }

    #[test]
    fn test_list_length_is_sum_and_write_drains() {
        let mut triplets: Triplets = every_kind().into_iter().collect();
        let expected = triplets.data_length();
        assert_eq!(expected, triplets.data_length());

        let mut out = Vec::new();
        triplets.write_to(&mut out).unwrap();
        assert_eq!(out.len(), expected);
        assert!(triplets.is_empty());
    }

    #[test]
    fn test_known_encodings() {
        let mut out = Vec::new();
        Triplet::measurement_units(240, 240).unwrap().write_to(&mut out).unwrap();
        assert_eq!(out, vec![0x08, 0x4B, 0x00, 0x00, 0x09, 0x60, 0x09, 0x60]);

        out.clear();
        Triplet::object_area_size(0x0102, 0x0304).unwrap().write_to(&mut out).unwrap();
        assert_eq!(out, vec![0x09, 0x4C, 0x02, 0x00, 0x01, 0x02, 0x00, 0x03, 0x04]);
    }

    #[test]
    fn test_object_classification_layout() {
        let mut classification =
            ObjectClassification::new(object_class::TIME_INVARIANT_PAGINATED_PRESENTATION, registry::GIF);
        classification.data_in_ocd = false;
        let mut out = Vec::new();
        Triplet::ObjectClassification(Box::new(classification)).write_to(&mut out).unwrap();
        assert_eq!(out.len(), 96);
        assert_eq!(out[3], 0x01);
        assert_eq!(out[6], (3 << 6) | (3 << 4) | (1 << 2));
        assert_eq!(&out[8..17], &[0x06, 0x07, 0x2B, 0x12, 0x00, 0x04, 0x01, 0x01, 0x16]);
    }

    #[test]
    fn test_oversized_triplet_is_rejected() {
        let triplet = Triplet::Comment("x".repeat(300));
        assert!(matches!(
            triplet.write_to(&mut Vec::new()),
            Err(AfpError::ValueOutOfRange { field: "triplet length", .. })
        ));
    }
}
