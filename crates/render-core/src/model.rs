//! Render-when-resolved page scheduling.
//!
//! Pages are handed to the renderer as soon as they are resolved. A page
//! still waiting on a reference is *prepared* and held back; with an
//! in-order renderer every later page waits behind it. In
//! memory-conservation mode the content of held-back pages is spilled to a
//! temporary file and read back just before rendering.

use crate::error::RenderError;
use crate::traits::Renderer;
use folio_area::{OffDocumentItem, PageSequence, PageViewportRef, Resolvable, WhenToProcess};
use log::{debug, warn};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};

struct PreparedPage {
    viewport: PageViewportRef,
    spill: Option<File>,
}

pub struct RenderPagesModel<R: Renderer> {
    renderer: R,
    conserve_memory: bool,
    prepared: VecDeque<PreparedPage>,
    after_page_items: Vec<OffDocumentItem>,
    end_of_document_items: Vec<OffDocumentItem>,
    pages_rendered: usize,
}

impl<R: Renderer> RenderPagesModel<R> {
    pub fn new(renderer: R, conserve_memory: bool) -> Self {
        Self {
            renderer,
            conserve_memory,
            prepared: VecDeque::new(),
            after_page_items: Vec::new(),
            end_of_document_items: Vec::new(),
            pages_rendered: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn pages_rendered(&self) -> usize {
        self.pages_rendered
    }

    /// Number of pages held back waiting on references.
    pub fn pages_prepared(&self) -> usize {
        self.prepared.len()
    }

    pub fn start_document(&mut self) -> Result<(), RenderError> {
        self.renderer.start_renderer()
    }

    pub fn start_page_sequence(&mut self, sequence: &PageSequence) -> Result<(), RenderError> {
        // In-order renderers learn about the sequence with its first page.
        if self.renderer.supports_out_of_order() {
            self.renderer.start_page_sequence(sequence)?;
        }
        Ok(())
    }

    pub fn add_page(&mut self, viewport: PageViewportRef) -> Result<(), RenderError> {
        let ready = self.renderer.supports_out_of_order() && viewport.borrow().is_resolved();
        if ready {
            self.render_page(&viewport)?;
        } else {
            self.prepare_page(viewport)?;
        }

        if self.check_prepared_pages(false)? {
            let items = std::mem::take(&mut self.after_page_items);
            self.process_off_document_items(&items)?;
        }
        Ok(())
    }

    pub fn handle_off_document_item(&mut self, item: OffDocumentItem) -> Result<(), RenderError> {
        match item.when_to_process() {
            WhenToProcess::Immediately => self.renderer.process_off_document_item(&item),
            WhenToProcess::AfterPage => {
                self.after_page_items.push(item);
                Ok(())
            }
            WhenToProcess::EndOfDocument => {
                self.end_of_document_items.push(item);
                Ok(())
            }
        }
    }

    /// Renders every remaining page, hands over the deferred off-document
    /// items and stops the renderer.
    pub fn end_document(&mut self) -> Result<(), RenderError> {
        self.check_prepared_pages(true)?;
        let after_page = std::mem::take(&mut self.after_page_items);
        self.process_off_document_items(&after_page)?;
        let end_of_document = std::mem::take(&mut self.end_of_document_items);
        self.process_off_document_items(&end_of_document)?;
        debug!("Rendered {} page(s)", self.pages_rendered);
        self.renderer.stop_renderer()
    }

    fn prepare_page(&mut self, viewport: PageViewportRef) -> Result<(), RenderError> {
        self.renderer.prepare_page(&viewport.borrow())?;
        let spill = if self.conserve_memory {
            let mut file = tempfile::tempfile()?;
            {
                let mut writer = BufWriter::new(&mut file);
                viewport.borrow_mut().save_page(&mut writer)?;
                writer.flush()?;
            }
            debug!("Spilled page {} to a temporary file", viewport.borrow().key());
            Some(file)
        } else {
            None
        };
        self.prepared.push_back(PreparedPage { viewport, spill });
        Ok(())
    }

    /// Renders prepared pages that are ready. Returns whether no page is
    /// held back any more (always true for out-of-order renderers).
    fn check_prepared_pages(&mut self, render_unresolved: bool) -> Result<bool, RenderError> {
        let out_of_order = self.renderer.supports_out_of_order();
        let mut index = 0;
        while index < self.prepared.len() {
            let resolved = self.prepared[index].viewport.borrow().is_resolved();
            if resolved || render_unresolved {
                if let Some(page) = self.prepared.remove(index) {
                    self.render_prepared(page)?;
                }
            } else if out_of_order {
                index += 1;
            } else {
                break;
            }
        }
        Ok(out_of_order || self.prepared.is_empty())
    }

    fn render_prepared(&mut self, page: PreparedPage) -> Result<(), RenderError> {
        if let Some(mut file) = page.spill {
            file.seek(SeekFrom::Start(0))?;
            page.viewport.borrow_mut().load_page(BufReader::new(file))?;
        }
        self.render_page(&page.viewport)
    }

    fn render_page(&mut self, viewport: &PageViewportRef) -> Result<(), RenderError> {
        {
            let pv = viewport.borrow();
            if !pv.is_resolved() {
                let idrefs = pv.id_refs();
                for idref in &idrefs {
                    warn!("Page {}: unresolved id reference '{}' found", pv.key(), idref);
                }
                return Err(RenderError::UnresolvedPage { page: pv.key().to_string(), idrefs });
            }
            if !self.renderer.supports_out_of_order() && pv.is_first_in_sequence() {
                if let Some(sequence) = pv.page_sequence() {
                    self.renderer.start_page_sequence(sequence)?;
                }
            }
            self.renderer.render_page(&pv)?;
            debug!("Rendered page {}", pv.key());
        }
        viewport.borrow_mut().clear();
        self.pages_rendered += 1;
        Ok(())
    }

    fn process_off_document_items(&mut self, items: &[OffDocumentItem]) -> Result<(), RenderError> {
        for item in items {
            debug!("Processing off-document item: {}", item.name());
            self.renderer.process_off_document_item(item)?;
        }
        Ok(())
    }
}

