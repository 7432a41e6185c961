//! The entry point layout talks to.
//!
//! `AreaTreeHandler` owns the [`IdTracker`] and the [`RenderPagesModel`],
//! so the id bookkeeping and the page scheduling move together: each page
//! registers its idrefs before it is scheduled, and dangling references are
//! force-resolved before the last pages are rendered.

use crate::error::RenderError;
use crate::model::RenderPagesModel;
use crate::traits::Renderer;
use folio_area::{IdTracker, OffDocumentItem, PageSequence, PageViewportRef};
use folio_types::AreaId;
use log::{info, warn};
use std::rc::Rc;

pub struct AreaTreeHandler<R: Renderer> {
    tracker: IdTracker,
    model: RenderPagesModel<R>,
    waiting_items: Vec<OffDocumentItem>,
    current_sequence: Option<Rc<PageSequence>>,
    first_of_sequence: bool,
    pages_added: usize,
}

impl<R: Renderer> AreaTreeHandler<R> {
    pub fn new(renderer: R, conserve_memory: bool) -> Self {
        Self {
            tracker: IdTracker::new(),
            model: RenderPagesModel::new(renderer, conserve_memory),
            waiting_items: Vec::new(),
            current_sequence: None,
            first_of_sequence: false,
            pages_added: 0,
        }
    }

    pub fn id_tracker(&self) -> &IdTracker {
        &self.tracker
    }

    /// Layout reports located, pending and processed ids through the
    /// tracker.
    pub fn id_tracker_mut(&mut self) -> &mut IdTracker {
        &mut self.tracker
    }

    pub fn model(&self) -> &RenderPagesModel<R> {
        &self.model
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.model.renderer_mut()
    }

    pub fn pages_added(&self) -> usize {
        self.pages_added
    }

    pub fn start_document(&mut self) -> Result<(), RenderError> {
        info!("Starting area tree document");
        self.model.start_document()
    }

    pub fn start_page_sequence(&mut self, sequence: PageSequence) -> Result<(), RenderError> {
        self.model.start_page_sequence(&sequence)?;
        self.current_sequence = Some(Rc::new(sequence));
        self.first_of_sequence = true;
        Ok(())
    }

    pub fn add_page(&mut self, viewport: PageViewportRef) -> Result<(), RenderError> {
        if let Some(sequence) = &self.current_sequence {
            viewport.borrow_mut().set_page_sequence(sequence.clone(), self.first_of_sequence);
            self.first_of_sequence = false;
        }
        self.tracker.try_id_resolution_for_page(&viewport);
        self.model.add_page(viewport)?;
        self.pages_added += 1;
        self.release_resolved_items()
    }

    /// Hands the item to the renderer once every idref it carries is
    /// resolved; until then it waits in the tracker.
    pub fn add_off_document_item(&mut self, item: OffDocumentItem) -> Result<(), RenderError> {
        for idref in item.id_refs() {
            self.tracker.try_id_resolution(idref, item.resolvable());
        }
        if item.is_resolved() {
            self.model.handle_off_document_item(item)
        } else {
            self.waiting_items.push(item);
            Ok(())
        }
    }

    /// Resolves what is still dangling, renders the remaining pages and
    /// stops the renderer.
    pub fn end_document(&mut self) -> Result<(), RenderError> {
        let dangling: Vec<AreaId> = self.tracker.force_resolve_dangling();
        if !dangling.is_empty() {
            warn!("{} id reference(s) forced at end of document", dangling.len());
        }
        for item in std::mem::take(&mut self.waiting_items) {
            self.model.handle_off_document_item(item)?;
        }
        self.model.end_document()?;
        info!("Finished area tree document: {} page(s)", self.model.pages_rendered());
        Ok(())
    }

    pub fn into_renderer(self) -> R {
        self.model.into_renderer()
    }

    fn release_resolved_items(&mut self) -> Result<(), RenderError> {
        let (ready, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.waiting_items).into_iter().partition(OffDocumentItem::is_resolved);
        self.waiting_items = waiting;
        for item in ready {
            self.model.handle_off_document_item(item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_area::{
        BookmarkData, Page, PageViewport, PageViewportRef, ResolvableArea, SlotId, UnresolvedPageNumber,
    };
    use folio_types::Rect;

    #[derive(Default)]
    struct RecordingRenderer {
        out_of_order: bool,
        events: Vec<String>,
        citations: Vec<String>,
        bookmarks: Vec<(String, Option<usize>)>,
    }

    impl Renderer for RecordingRenderer {
        fn start_renderer(&mut self) -> Result<(), RenderError> {
            self.events.push("start".into());
            Ok(())
        }

        fn stop_renderer(&mut self) -> Result<(), RenderError> {
            self.events.push("stop".into());
            Ok(())
        }

        fn supports_out_of_order(&self) -> bool {
            self.out_of_order
        }

        fn start_page_sequence(&mut self, sequence: &PageSequence) -> Result<(), RenderError> {
            self.events.push(format!("sequence {}", sequence.title.as_deref().unwrap_or("")));
            Ok(())
        }

        fn render_page(&mut self, page: &PageViewport) -> Result<(), RenderError> {
            self.events.push(format!("page {}", page.key()));
            let content = page.page().ok_or(RenderError::Other("page not loaded".into()))?;
            for area in content.resolvables() {
                if let ResolvableArea::PageNumber(citation) = area {
                    self.citations.push(citation.text().to_string());
                }
            }
            Ok(())
        }

        fn process_off_document_item(&mut self, item: &OffDocumentItem) -> Result<(), RenderError> {
            let OffDocumentItem::Bookmarks(root) = item;
            for child in root.borrow().children() {
                self.bookmarks.push((child.title().to_string(), child.page().map(|p| p.index)));
            }
            self.events.push("bookmarks".into());
            Ok(())
        }
    }

    fn viewport(index: usize, citing: &[&str]) -> (PageViewportRef, Vec<SlotId>) {
        let mut page = Page::new();
        let slots = citing
            .iter()
            .map(|id| page.add_resolvable(ResolvableArea::PageNumber(UnresolvedPageNumber::new(*id, false))))
            .collect();
        let pv = PageViewport::new(Rect::new(0, 0, 595_000, 842_000), index, index as i32 + 1, (index + 1).to_string(), page);
        (pv.into_shared(), slots)
    }

    fn events(handler: AreaTreeHandler<RecordingRenderer>) -> Vec<String> {
        handler.into_renderer().events
    }

    #[test]
    fn test_in_order_waits_for_forward_reference() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut handler = AreaTreeHandler::new(RecordingRenderer::default(), false);
        handler.start_document().unwrap();
        handler.start_page_sequence(PageSequence::new(Some("body".into()))).unwrap();

        let (p1, _) = viewport(0, &["later"]);
        handler.add_page(p1).unwrap();
        assert_eq!(handler.model().pages_prepared(), 1);

        let (p2, _) = viewport(1, &[]);
        handler.id_tracker_mut().associate_id_with_page_viewport("later", &p2);
        handler.add_page(p2).unwrap();
        assert_eq!(handler.model().pages_prepared(), 0);

        handler.end_document().unwrap();
        let renderer = handler.into_renderer();
        assert_eq!(renderer.events, ["start", "sequence body", "page P1", "page P2", "stop"]);
        assert_eq!(renderer.citations, ["2"]);
    }

    #[test]
    fn test_in_order_holds_back_later_resolved_pages() {
        let mut handler = AreaTreeHandler::new(RecordingRenderer::default(), false);
        handler.start_document().unwrap();
        let (p1, _) = viewport(0, &["end"]);
        let (p2, _) = viewport(1, &[]);
        handler.add_page(p1).unwrap();
        handler.add_page(p2).unwrap();
        assert_eq!(handler.model().pages_rendered(), 0);
        assert_eq!(handler.model().pages_prepared(), 2);

        let (p3, _) = viewport(2, &[]);
        handler.id_tracker_mut().associate_id_with_page_viewport("end", &p3);
        handler.add_page(p3).unwrap();
        assert_eq!(handler.model().pages_rendered(), 3);
        handler.end_document().unwrap();
        assert_eq!(events(handler), ["start", "page P1", "page P2", "page P3", "stop"]);
    }

    #[test]
    fn test_out_of_order_renders_resolved_pages_first() {
        let renderer = RecordingRenderer { out_of_order: true, ..RecordingRenderer::default() };
        let mut handler = AreaTreeHandler::new(renderer, false);
        handler.start_document().unwrap();
        let (p1, _) = viewport(0, &["end"]);
        let (p2, _) = viewport(1, &[]);
        handler.add_page(p1).unwrap();
        handler.add_page(p2).unwrap();
        let (p3, _) = viewport(2, &[]);
        handler.id_tracker_mut().associate_id_with_page_viewport("end", &p3);
        handler.add_page(p3).unwrap();
        handler.end_document().unwrap();
        // The new page goes first, then the held-back one.
        assert_eq!(events(handler), ["start", "page P2", "page P3", "page P1", "stop"]);
    }

    #[test]
    fn test_conserve_memory_spills_and_reloads() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut handler = AreaTreeHandler::new(RecordingRenderer::default(), true);
        handler.start_document().unwrap();
        let (p1, _) = viewport(0, &["target"]);
        handler.add_page(p1.clone()).unwrap();
        assert!(!p1.borrow().is_loaded());

        let (p2, _) = viewport(1, &[]);
        handler.id_tracker_mut().associate_id_with_page_viewport("target", &p2);
        handler.add_page(p2).unwrap();
        handler.end_document().unwrap();

        let renderer = handler.into_renderer();
        assert_eq!(renderer.citations, ["2"]);
        assert!(!p1.borrow().is_loaded());
    }

    #[test]
    fn test_dangling_reference_is_forced_at_end() {
        let mut handler = AreaTreeHandler::new(RecordingRenderer::default(), false);
        handler.start_document().unwrap();
        let (p1, _) = viewport(0, &["nowhere"]);
        handler.add_page(p1).unwrap();
        handler.end_document().unwrap();
        let renderer = handler.into_renderer();
        assert_eq!(renderer.citations, ["?"]);
        assert_eq!(renderer.events, ["start", "page P1", "stop"]);
    }

    #[test]
    fn test_bookmarks_processed_at_end_of_document() {
        let mut handler = AreaTreeHandler::new(RecordingRenderer::default(), false);
        handler.start_document().unwrap();

        let mut root = BookmarkData::root();
        root.add_sub_data(BookmarkData::new("Intro", true, "intro"));
        root.add_sub_data(BookmarkData::new("Missing", true, "missing"));
        handler.add_off_document_item(OffDocumentItem::bookmarks(root)).unwrap();

        let (p1, _) = viewport(0, &[]);
        handler.id_tracker_mut().associate_id_with_page_viewport("intro", &p1);
        handler.add_page(p1).unwrap();
        handler.end_document().unwrap();

        let renderer = handler.into_renderer();
        assert_eq!(renderer.events, ["start", "page P1", "bookmarks", "stop"]);
        assert_eq!(
            renderer.bookmarks,
            [("Intro".to_string(), Some(0)), ("Missing".to_string(), None)]
        );
    }
}
