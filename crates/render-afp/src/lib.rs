//! AFP renderer for the area tree.
//!
//! [`AfpRenderer`] implements the [`Renderer`](folio_render_core::Renderer)
//! trait: each resolved page is converted from millipoints to AFP units and
//! written through a [`DataStream`](folio_afp::DataStream). Bookmarks end up
//! as document-level tag logical elements.

mod config;
mod fonts;
mod renderer;

pub use config::{AfpRendererConfig, FontConfig, default_fonts};
pub use renderer::AfpRenderer;
