//! Byte-level helpers for unit tests.

use crate::reader::FieldReader;

/// Every structured field in `bytes`, header included.
pub(crate) fn fields(bytes: &[u8]) -> Vec<&[u8]> {
    FieldReader::new(bytes).map(|field| field.unwrap().bytes).collect()
}

/// `(type, category)` of every structured field in `bytes`.
pub(crate) fn field_ids(bytes: &[u8]) -> Vec<(u8, u8)> {
    FieldReader::new(bytes)
        .map(|field| {
            let field = field.unwrap();
            (field.sf_type, field.category)
        })
        .collect()
}
