//! Renderer abstraction and page scheduling for the area tree.
//!
//! This crate provides:
//! - the [`Renderer`] trait output backends implement
//! - [`RenderPagesModel`], which renders pages once their references are resolved
//! - [`AreaTreeHandler`], which couples the model with the id tracker
//! - the [`RenderError`] type

mod error;
mod handler;
mod model;
mod traits;

pub use error::RenderError;
pub use handler::AreaTreeHandler;
pub use model::RenderPagesModel;
pub use traits::Renderer;
