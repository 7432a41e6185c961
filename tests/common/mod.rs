pub mod afp_assertions;
pub mod fixtures;

use folio::area::PageViewportRef;
use folio::{PipelineBuilder, PipelineError};
use folio_afp::reader::FieldReader;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Structured field ids used in assertions.
pub mod ids {
    pub const BEGIN_DOCUMENT: (u8, u8) = (0xA8, 0xA8);
    pub const END_DOCUMENT: (u8, u8) = (0xA9, 0xA8);
    pub const BEGIN_PAGE: (u8, u8) = (0xA8, 0xAF);
    pub const END_PAGE: (u8, u8) = (0xA9, 0xAF);
    pub const BEGIN_ENVIRONMENT_GROUP: (u8, u8) = (0xA8, 0xC9);
    pub const MAP_CODED_FONT: (u8, u8) = (0xAB, 0x8A);
    pub const PAGE_DESCRIPTOR: (u8, u8) = (0xA6, 0xAF);
    pub const BEGIN_TEXT: (u8, u8) = (0xA8, 0x9B);
    pub const TEXT_DATA: (u8, u8) = (0xEE, 0x9B);
    pub const BEGIN_IMAGE: (u8, u8) = (0xA8, 0x7B);
    pub const TAG: (u8, u8) = (0xA0, 0x90);
    pub const NO_OPERATION: (u8, u8) = (0xEE, 0xEE);
    pub const INCLUDE_SEGMENT: (u8, u8) = (0xAF, 0x5F);
    pub const BEGIN_CONTAINER: (u8, u8) = (0xA8, 0x92);
}

/// Wrapper around a generated AFP stream with helper methods.
pub struct GeneratedAfp {
    pub bytes: Vec<u8>,
    pub fields: Vec<(u8, u8, Vec<u8>)>,
}

impl GeneratedAfp {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut fields = Vec::new();
        for field in FieldReader::new(&bytes) {
            let field = field?;
            fields.push((field.sf_type, field.category, field.payload().to_vec()));
        }
        Ok(Self { bytes, fields })
    }

    pub fn ids(&self) -> Vec<(u8, u8)> {
        self.fields.iter().map(|(t, c, _)| (*t, *c)).collect()
    }

    pub fn count(&self, id: (u8, u8)) -> usize {
        self.fields.iter().filter(|(t, c, _)| (*t, *c) == id).count()
    }

    pub fn page_count(&self) -> usize {
        self.count(ids::BEGIN_PAGE)
    }

    pub fn payloads(&self, id: (u8, u8)) -> Vec<&[u8]> {
        self.fields
            .iter()
            .filter(|(t, c, _)| (*t, *c) == id)
            .map(|(_, _, payload)| payload.as_slice())
            .collect()
    }

    /// Save the stream to a file for manual debugging.
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.afp", name), &self.bytes)
    }
}

/// Render pages with the default configuration.
pub fn render_pages(pages: Vec<PageViewportRef>) -> Result<GeneratedAfp, PipelineError> {
    render_pages_with(PipelineBuilder::new(), pages)
}

pub fn render_pages_with(
    builder: PipelineBuilder,
    pages: Vec<PageViewportRef>,
) -> Result<GeneratedAfp, PipelineError> {
    let bytes = builder.build(Vec::new())?.render_pages(pages)?;
    GeneratedAfp::from_bytes(bytes).map_err(|e| PipelineError::Config(e.to_string()))
}
