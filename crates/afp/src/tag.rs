use crate::error::AfpError;
use crate::structured_field::{category, sf_type, Field, StructuredObject};
use crate::triplet::{fqn_type, FqnFormat, Triplet, Triplets};
use std::io::Write;

/// Tag Logical Element (TLE): a named attribute attached to a page or the
/// document, used for indexing and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLogicalElement {
    triplets: Triplets,
}

impl TagLogicalElement {
    pub fn new(name: &str, value: &str) -> Self {
        let triplets = [
            Triplet::fully_qualified_name(fqn_type::ATTRIBUTE_GID, FqnFormat::CharString, name),
            Triplet::AttributeValue(value.to_string()),
        ]
        .into_iter()
        .collect();
        Self { triplets }
    }
}

impl StructuredObject for TagLogicalElement {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::ATTRIBUTE, category::PROCESS_ELEMENT);
        field.put_triplets(&mut self.triplets)?;
        field.write_to(out)
    }
}
