//! Structured field framing and the three-phase serialization contract.
//!
//! Every MO:DCA record starts with a nine byte introducer:
//!
//! | offset | content |
//! |---|---|
//! | 0 | carriage control `0x5A` |
//! | 1-2 | record length minus the carriage control byte |
//! | 3 | class `0xD3` |
//! | 4 | type code |
//! | 5 | category code |
//! | 6 | flags |
//! | 7-8 | reserved |

use crate::error::AfpError;
use crate::triplet::Triplets;
use log::trace;
use std::io::Write;

pub const CARRIAGE_CONTROL: u8 = 0x5A;
pub const CLASS: u8 = 0xD3;
pub const HEADER_LENGTH: usize = 9;
/// Largest value the 2-byte length field may carry.
pub const MAX_LENGTH_FIELD: usize = 0x7FFF;
/// Largest payload a single record can carry after its header.
pub const MAX_PAYLOAD: usize = MAX_LENGTH_FIELD + 1 - HEADER_LENGTH;
pub const NAME_LENGTH: usize = 8;

pub mod sf_type {
    pub const ATTRIBUTE: u8 = 0xA0;
    pub const DESCRIPTOR: u8 = 0xA6;
    pub const CONTROL: u8 = 0xA7;
    pub const BEGIN: u8 = 0xA8;
    pub const END: u8 = 0xA9;
    pub const MAP: u8 = 0xAB;
    pub const POSITION: u8 = 0xAC;
    pub const INCLUDE: u8 = 0xAF;
    pub const MIGRATION: u8 = 0xB1;
    pub const DATA: u8 = 0xEE;
}

pub mod category {
    pub const PRESENTATION_TEXT: u8 = 0x9B;
    pub const PAGE_SEGMENT: u8 = 0x5F;
    pub const GRAPHICS: u8 = 0xBB;
    pub const OBJECT_AREA: u8 = 0x6B;
    pub const IM_IMAGE: u8 = 0x7B;
    pub const PAGE: u8 = 0xAF;
    pub const ACTIVE_ENVIRONMENT_GROUP: u8 = 0xC9;
    pub const OBJECT_ENVIRONMENT_GROUP: u8 = 0xC7;
    pub const OBJECT_CONTAINER: u8 = 0x92;
    pub const CODED_FONT: u8 = 0x8A;
    pub const DATA_RESOURCE: u8 = 0xC3;
    pub const PAGE_OVERLAY: u8 = 0xD8;
    pub const DOCUMENT: u8 = 0xA8;
    pub const PROCESS_ELEMENT: u8 = 0x90;
    pub const NO_OPERATION: u8 = 0xEE;
}

/// An object that can be written to an AFP data stream.
///
/// The phases are only ever driven by [`serialize`], which calls them once
/// each and in order. Objects override the phases they need.
pub trait StructuredObject {
    fn write_start(&mut self, _out: &mut dyn Write) -> Result<(), AfpError> {
        Ok(())
    }

    fn write_content(&mut self, _out: &mut dyn Write) -> Result<(), AfpError> {
        Ok(())
    }

    fn write_end(&mut self, _out: &mut dyn Write) -> Result<(), AfpError> {
        Ok(())
    }
}

/// Writes `object` by running its start, content and end phases.
pub fn serialize<O: StructuredObject + ?Sized>(
    object: &mut O,
    out: &mut dyn Write,
) -> Result<(), AfpError> {
    object.write_start(out)?;
    object.write_content(out)?;
    object.write_end(out)
}

/// Serializes every object of a list in order.
pub(crate) fn serialize_all<O: StructuredObject>(
    objects: &mut [O],
    out: &mut dyn Write,
) -> Result<(), AfpError> {
    for object in objects {
        serialize(object, out)?;
    }
    Ok(())
}

/// Builds one structured field. The length field is computed from the bytes
/// actually appended, so it cannot drift from the emitted record.
#[derive(Debug)]
pub(crate) struct Field {
    sf_type: u8,
    category: u8,
    body: Vec<u8>,
}

impl Field {
    pub fn new(sf_type: u8, category: u8) -> Self {
        Self { sf_type, category, body: Vec::new() }
    }

    /// A begin or end record carrying an 8-byte EBCDIC name.
    pub fn named(sf_type: u8, category: u8, name: &[u8; NAME_LENGTH]) -> Self {
        let mut field = Self::new(sf_type, category);
        field.body.extend_from_slice(name);
        field
    }

    pub fn put(&mut self, bytes: &[u8]) -> &mut Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn put_u8(&mut self, byte: u8) -> &mut Self {
        self.body.push(byte);
        self
    }

    pub fn put_zeros(&mut self, count: usize) -> &mut Self {
        self.body.resize(self.body.len() + count, 0x00);
        self
    }

    /// Appends and consumes the triplets.
    pub fn put_triplets(&mut self, triplets: &mut Triplets) -> Result<&mut Self, AfpError> {
        triplets.write_to(&mut self.body)?;
        Ok(self)
    }

    pub fn total_length(&self) -> usize {
        HEADER_LENGTH + self.body.len()
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, AfpError> {
        let length = self.total_length() - 1;
        if length > MAX_LENGTH_FIELD {
            return Err(AfpError::ValueOutOfRange {
                field: "structured field length",
                value: length as i64,
                max: MAX_LENGTH_FIELD as i64,
            });
        }
        let [hi, lo] = (length as u16).to_be_bytes();
        let mut bytes = Vec::with_capacity(self.total_length());
        bytes.extend_from_slice(&[
            CARRIAGE_CONTROL,
            hi,
            lo,
            CLASS,
            self.sf_type,
            self.category,
            0x00,
            0x00,
            0x00,
        ]);
        bytes.extend_from_slice(&self.body);
        Ok(bytes)
    }

    pub fn write_to(self, out: &mut dyn Write) -> Result<(), AfpError> {
        trace!(
            "Writing structured field D3{:02X}{:02X} ({} bytes)",
            self.sf_type,
            self.category,
            self.total_length()
        );
        out.write_all(&self.into_bytes()?)?;
        Ok(())
    }
}
