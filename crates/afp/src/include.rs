//! Include records for page overlays and page segments.

use crate::binary::i24_field;
use crate::ebcdic;
use crate::error::AfpError;
use crate::rotation::Rotation;
use crate::structured_field::{category, sf_type, Field, StructuredObject};
use std::io::Write;

/// Include Page Overlay (IPO).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludePageOverlay {
    name: [u8; 8],
    x: [u8; 3],
    y: [u8; 3],
    rotation: Rotation,
}

impl IncludePageOverlay {
    pub fn new(name: &str, x: i32, y: i32, rotation: Rotation) -> Result<Self, AfpError> {
        if name.chars().count() != 8 {
            return Err(AfpError::InvalidName {
                name: name.to_string(),
                reason: "overlay names must be exactly 8 characters",
            });
        }
        Ok(Self {
            name: ebcdic::encode_name(name),
            x: i24_field("overlay x origin", i64::from(x))?,
            y: i24_field("overlay y origin", i64::from(y))?,
            rotation,
        })
    }
}

impl StructuredObject for IncludePageOverlay {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::named(sf_type::INCLUDE, category::PAGE_OVERLAY, &self.name);
        field.put(&self.x).put(&self.y).put(&self.rotation.orientation());
        field.write_to(out)
    }
}

/// Include Page Segment (IPS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludePageSegment {
    name: [u8; 8],
    x: [u8; 3],
    y: [u8; 3],
}

impl IncludePageSegment {
    pub fn new(name: &str, x: i32, y: i32) -> Result<Self, AfpError> {
        if name.is_empty() {
            return Err(AfpError::InvalidName { name: String::new(), reason: "name is empty" });
        }
        Ok(Self {
            name: ebcdic::encode_name(name),
            x: i24_field("segment x origin", i64::from(x))?,
            y: i24_field("segment y origin", i64::from(y))?,
        })
    }
}

impl StructuredObject for IncludePageSegment {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::named(sf_type::INCLUDE, category::PAGE_SEGMENT, &self.name);
        field.put(&self.x).put(&self.y);
        field.write_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_field::serialize;

    #[test]
    fn test_include_page_overlay_layout() {
        let mut ipo = IncludePageOverlay::new("OVERLAY1", 100, -2, Rotation::Deg270).unwrap();
        let mut out = Vec::new();
        serialize(&mut ipo, &mut out).unwrap();
        assert_eq!(out.len(), 25);
        assert_eq!(&out[4..6], &[0xAF, 0xD8]);
        assert_eq!(&out[17..25], &[0x00, 0x00, 0x64, 0xFF, 0xFF, 0xFE, 0x87, 0x00]);
    }

    #[test]
    fn test_include_page_segment_layout() {
        let mut ips = IncludePageSegment::new("S1", 1, 2).unwrap();
        let mut out = Vec::new();
        serialize(&mut ips, &mut out).unwrap();
        assert_eq!(out.len(), 23);
        assert_eq!(&out[4..6], &[0xAF, 0x5F]);
        assert_eq!(&out[9..11], &[0xE2, 0xF1]);
    }

    #[test]
    fn test_overlay_name_must_be_eight_characters() {
        assert!(IncludePageOverlay::new("OVL1", 0, 0, Rotation::Deg0).is_err());
    }
}
