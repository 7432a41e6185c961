use folio_area::AreaError;
use folio_types::AreaId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Area tree error: {0}")]
    Area(#[from] AreaError),
    #[error("Page {page} cannot be rendered, unresolved references: {}", join_ids(.idrefs))]
    UnresolvedPage { page: String, idrefs: Vec<AreaId> },
    #[error("Output error: {0}")]
    Output(String),
    #[error("Renderer not started")]
    NotStarted,
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}

fn join_ids(ids: &[AreaId]) -> String {
    ids.iter().map(AreaId::as_str).collect::<Vec<_>>().join(", ")
}
