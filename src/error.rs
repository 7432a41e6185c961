use folio_render_core::RenderError;
use thiserror::Error;

/// Errors surfaced by the AFP pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}
