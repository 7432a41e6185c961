//! Registered MO:DCA object types, keyed by MIME type.

/// Prefix of every registered object type OID (1.3.18.0.4.1.1).
const OID_PREFIX: [u8; 8] = [0x06, 0x07, 0x2B, 0x12, 0x00, 0x04, 0x01, 0x01];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectType {
    pub mime_type: &'static str,
    pub name: &'static str,
    /// Final OID component.
    pub component: u8,
}

impl ObjectType {
    /// The 16-byte registry id field: the encoded OID, zero padded.
    pub fn registry_id(&self) -> [u8; 16] {
        let mut id = [0u8; 16];
        id[..8].copy_from_slice(&OID_PREFIX);
        id[8] = self.component;
        id
    }
}

pub const EPS: ObjectType = ObjectType {
    mime_type: "application/postscript",
    name: "Encapsulated PostScript",
    component: 0x0D,
};

pub const TIFF: ObjectType = ObjectType {
    mime_type: "image/tiff",
    name: "TIFF",
    component: 0x0E,
};

pub const GIF: ObjectType = ObjectType {
    mime_type: "image/gif",
    name: "GIF",
    component: 0x16,
};

pub const JFIF: ObjectType = ObjectType {
    mime_type: "image/jpeg",
    name: "JFIF",
    component: 0x17,
};

pub const PDF_SINGLE_PAGE: ObjectType = ObjectType {
    mime_type: "application/pdf",
    name: "PDF Single-page Object",
    component: 0x19,
};

const KNOWN: [ObjectType; 5] = [EPS, TIFF, GIF, JFIF, PDF_SINGLE_PAGE];

pub fn lookup(mime_type: &str) -> Option<ObjectType> {
    KNOWN
        .iter()
        .find(|t| t.mime_type.eq_ignore_ascii_case(mime_type))
        .copied()
}
