use folio_types::AreaId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AreaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Page {0} is not loaded")]
    PageNotLoaded(String),

    #[error("Page {0} is already loaded")]
    PageAlreadyLoaded(String),

    #[error("Page {page} has unresolved references: {}", format_ids(.idrefs))]
    UnresolvedReferences { page: String, idrefs: Vec<AreaId> },

    #[error("Invalid column number {requested} requested; the span has {available} columns")]
    InvalidColumn { requested: usize, available: usize },

    #[error("No more flows left in span")]
    NoMoreFlows,
}

pub(crate) fn format_ids(ids: &[AreaId]) -> String {
    ids.iter().map(AreaId::as_str).collect::<Vec<_>>().join(", ")
}
