//! A minimal structured field reader, used to inspect generated output.

use crate::error::AfpError;
use crate::structured_field::{CARRIAGE_CONTROL, CLASS, HEADER_LENGTH};

/// One structured field as found in a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    pub sf_type: u8,
    pub category: u8,
    /// The whole record, header included.
    pub bytes: &'a [u8],
}

impl<'a> RawField<'a> {
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[HEADER_LENGTH..]
    }
}

/// Iterates over the structured fields of a complete AFP byte stream.
pub struct FieldReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn malformed(&mut self, reason: &'static str) -> Option<Result<RawField<'a>, AfpError>> {
        self.offset = self.bytes.len();
        Some(Err(AfpError::Malformed(reason)))
    }
}

impl<'a> Iterator for FieldReader<'a> {
    type Item = Result<RawField<'a>, AfpError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.bytes[self.offset..];
        if rest.is_empty() {
            return None;
        }
        if rest.len() < HEADER_LENGTH || rest[0] != CARRIAGE_CONTROL || rest[3] != CLASS {
            return self.malformed("malformed structured field introducer");
        }
        let total = usize::from(u16::from_be_bytes([rest[1], rest[2]])) + 1;
        if total < HEADER_LENGTH || total > rest.len() {
            return self.malformed("structured field length exceeds the stream");
        }
        self.offset += total;
        Some(Ok(RawField { sf_type: rest[4], category: rest[5], bytes: &rest[..total] }))
    }
}
