use crate::ebcdic;
use crate::error::AfpError;
use crate::structured_field::{category, sf_type, Field};
use crate::triplet::{Triplet, Triplets};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentState {
    Created,
    Open,
    Closed,
}

/// The document envelope (BDT ... EDT).
///
/// Pages are streamed between the begin and end records, so a document
/// writes its two records separately instead of buffering its pages.
#[derive(Debug)]
pub struct Document {
    name: [u8; 8],
    triplets: Triplets,
    state: DocumentState,
}

impl Document {
    pub fn new(name: &str) -> Self {
        Self { name: ebcdic::encode_name(name), triplets: Triplets::new(), state: DocumentState::Created }
    }

    pub fn add_triplet(&mut self, triplet: Triplet) {
        self.triplets.push(triplet);
    }

    pub fn is_open(&self) -> bool {
        self.state == DocumentState::Open
    }

    pub fn write_begin(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        if self.state != DocumentState::Created {
            return Err(AfpError::PrerequisiteNotMet("document has already begun"));
        }
        let mut field = Field::named(sf_type::BEGIN, category::DOCUMENT, &self.name);
        field.put_triplets(&mut self.triplets)?;
        field.write_to(out)?;
        self.state = DocumentState::Open;
        Ok(())
    }

    pub fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        if self.state != DocumentState::Open {
            return Err(AfpError::PrerequisiteNotMet("document is not open"));
        }
        Field::named(sf_type::END, category::DOCUMENT, &self.name).write_to(out)?;
        self.state = DocumentState::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_end_once() {
        let mut document = Document::new("DOC00001");
        let mut out = Vec::new();
        assert!(document.write_end(&mut out).is_err());
        document.write_begin(&mut out).unwrap();
        assert!(document.write_begin(&mut out).is_err());
        document.write_end(&mut out).unwrap();
        assert_eq!(out.len(), 34);
        assert_eq!(&out[4..6], &[0xA8, 0xA8]);
        assert_eq!(&out[21..23], &[0xA9, 0xA8]);
    }
}
