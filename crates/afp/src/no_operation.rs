use crate::ebcdic;
use crate::error::AfpError;
use crate::structured_field::{category, sf_type, Field, StructuredObject, MAX_PAYLOAD};
use log::warn;
use std::io::Write;

/// No Operation (NOP): carries a comment that presentation ignores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoOperation {
    content: Vec<u8>,
}

impl NoOperation {
    /// Encodes `content` as EBCDIC, truncated to one record's payload.
    pub fn new(content: &str) -> Self {
        let mut content = ebcdic::encode(content);
        if content.len() > MAX_PAYLOAD {
            warn!("No-operation content of {} bytes truncated to {}", content.len(), MAX_PAYLOAD);
            content.truncate(MAX_PAYLOAD);
        }
        Self { content }
    }
}

impl StructuredObject for NoOperation {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::DATA, category::NO_OPERATION);
        field.put(&self.content);
        field.write_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_field::serialize;

    #[test]
    fn test_no_operation_layout() {
        let mut nop = NoOperation::new("AB");
        let mut out = Vec::new();
        serialize(&mut nop, &mut out).unwrap();
        assert_eq!(out, [0x5A, 0x00, 0x0A, 0xD3, 0xEE, 0xEE, 0x00, 0x00, 0x00, 0xC1, 0xC2]);
    }

    #[test]
    fn test_long_content_is_truncated() {
        let mut nop = NoOperation::new(&"x".repeat(MAX_PAYLOAD + 10));
        let mut out = Vec::new();
        serialize(&mut nop, &mut out).unwrap();
        assert_eq!(out.len(), 9 + MAX_PAYLOAD);
    }
}
