//! folio: AFP (MO:DCA) output for a paginated area tree.
//!
//! - [`folio_afp`]: structured-field object model and binary emission
//! - [`folio_area`]: area tree, page viewports and id resolution
//! - [`folio_render_core`]: renderer trait and page scheduling
//! - [`folio_render_afp`]: the AFP renderer
//!
//! This crate adds configuration and the [`PipelineBuilder`].

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::RenderConfig;
pub use error::PipelineError;
pub use pipeline::{AfpPipeline, PipelineBuilder};

pub use folio_afp as afp;
pub use folio_area as area;
pub use folio_render_afp as render_afp;
pub use folio_render_core as render_core;
pub use folio_types as types;
