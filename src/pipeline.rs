//! Builder and driver for turning area-tree pages into an AFP stream.

use crate::config::RenderConfig;
use crate::error::PipelineError;
use folio_area::{IdTracker, OffDocumentItem, PageSequence, PageViewportRef};
use folio_render_afp::AfpRenderer;
use folio_render_core::AreaTreeHandler;
use log::info;
use std::io::Write;

/// A builder for creating an `AfpPipeline`.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: RenderConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration with one read from JSON.
    pub fn with_config_json(mut self, json: &str) -> Result<Self, PipelineError> {
        self.config = RenderConfig::from_json(json)?;
        Ok(self)
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.config.resolution = resolution;
        self
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.config.rotation = degrees;
        self
    }

    pub fn with_conserve_memory(mut self, conserve_memory: bool) -> Self {
        self.config.conserve_memory = conserve_memory;
        self
    }

    pub fn with_document_name(mut self, name: &str) -> Self {
        self.config.document_name = name.to_string();
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Validates the configuration and creates a pipeline writing to `out`.
    pub fn build<W: Write>(self, out: W) -> Result<AfpPipeline<W>, PipelineError> {
        let renderer_config = self.config.to_renderer_config()?;
        let renderer = AfpRenderer::new(out, renderer_config);
        Ok(AfpPipeline {
            handler: AreaTreeHandler::new(renderer, self.config.conserve_memory),
            started: false,
        })
    }
}

/// Drives one AFP document: pages go in as they are laid out, the stream
/// comes back from [`finish`](AfpPipeline::finish).
pub struct AfpPipeline<W: Write> {
    handler: AreaTreeHandler<AfpRenderer<W>>,
    started: bool,
}

impl<W: Write> AfpPipeline<W> {
    /// Registers the bytes of an external graphic referenced from image
    /// areas by `uri`.
    pub fn add_resource(&mut self, uri: impl Into<String>, data: Vec<u8>) {
        self.handler.renderer_mut().add_resource(uri, data);
    }

    pub fn start_document(&mut self) -> Result<(), PipelineError> {
        info!("Starting AFP document");
        self.handler.start_document()?;
        self.started = true;
        Ok(())
    }

    pub fn start_page_sequence(&mut self, sequence: PageSequence) -> Result<(), PipelineError> {
        self.ensure_started()?;
        Ok(self.handler.start_page_sequence(sequence)?)
    }

    /// Layout reports ids through the tracker: located, pending and
    /// processed.
    pub fn id_tracker_mut(&mut self) -> &mut IdTracker {
        self.handler.id_tracker_mut()
    }

    pub fn add_page(&mut self, viewport: PageViewportRef) -> Result<(), PipelineError> {
        self.ensure_started()?;
        Ok(self.handler.add_page(viewport)?)
    }

    pub fn add_off_document_item(&mut self, item: OffDocumentItem) -> Result<(), PipelineError> {
        self.ensure_started()?;
        Ok(self.handler.add_off_document_item(item)?)
    }

    /// Ends the document and returns the output.
    pub fn finish(mut self) -> Result<W, PipelineError> {
        self.ensure_started()?;
        self.handler.end_document()?;
        let renderer = self.handler.into_renderer();
        info!("Finished AFP document: {} page(s)", renderer.pages_written());
        Ok(renderer.into_inner())
    }

    /// Renders a complete sequence of pages in one call.
    pub fn render_pages<I>(mut self, pages: I) -> Result<W, PipelineError>
    where
        I: IntoIterator<Item = PageViewportRef>,
    {
        self.ensure_started()?;
        for page in pages {
            self.add_page(page)?;
        }
        self.finish()
    }

    fn ensure_started(&mut self) -> Result<(), PipelineError> {
        if self.started {
            return Ok(());
        }
        self.start_document()
    }
}
