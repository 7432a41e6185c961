use crate::error::RenderError;
use folio_area::{OffDocumentItem, PageSequence, PageViewport};

/// An output format backend fed with resolved pages.
///
/// Only `render_page` is required; the lifecycle hooks default to no-ops.
pub trait Renderer {
    fn start_renderer(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn stop_renderer(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Whether pages may be rendered as soon as they are resolved, even if
    /// an earlier page still waits on a reference.
    fn supports_out_of_order(&self) -> bool {
        false
    }

    fn start_page_sequence(&mut self, _sequence: &PageSequence) -> Result<(), RenderError> {
        Ok(())
    }

    /// Called for a page that cannot be rendered yet.
    fn prepare_page(&mut self, _page: &PageViewport) -> Result<(), RenderError> {
        Ok(())
    }

    fn render_page(&mut self, page: &PageViewport) -> Result<(), RenderError>;

    fn process_off_document_item(&mut self, _item: &OffDocumentItem) -> Result<(), RenderError> {
        Ok(())
    }
}
