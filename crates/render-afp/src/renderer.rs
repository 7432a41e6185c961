use crate::config::AfpRendererConfig;
use crate::fonts::PageFonts;
use folio_afp::registry;
use folio_afp::triplet::mapping_option;
use folio_afp::{AfpError, DataStream, ObjectPlacement, Rule, TextRun};
use folio_area::{
    AreaError, Block, BlockChild, BodyRegion, BookmarkData, ExtensionAttachment, FontKey, ImageArea, InlineArea,
    LineArea, OffDocumentItem, Page, PageViewport, RegionContent, RegionViewport, ResolvableArea,
};
use folio_render_core::{RenderError, Renderer};
use folio_types::{Color, Rect, mpt_to_units};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Write;

/// Longest bookmark title written as a tag attribute name.
const MAX_TAG_NAME: usize = 200;

fn output(err: AfpError) -> RenderError {
    RenderError::Output(err.to_string())
}

/// A bookmark flattened for output: title and target page number.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BookmarkEntry {
    title: String,
    page_number: Option<String>,
}

/// Writes resolved area-tree pages as an AFP data stream.
pub struct AfpRenderer<W: Write> {
    stream: DataStream<W>,
    config: AfpRendererConfig,
    fonts: PageFonts,
    resources: HashMap<String, Vec<u8>>,
    bookmarks: Vec<BookmarkEntry>,
    started: bool,
}

impl<W: Write> AfpRenderer<W> {
    pub fn new(out: W, config: AfpRendererConfig) -> Self {
        Self {
            stream: DataStream::new(out),
            config,
            fonts: PageFonts::default(),
            resources: HashMap::new(),
            bookmarks: Vec::new(),
            started: false,
        }
    }

    pub fn config(&self) -> &AfpRendererConfig {
        &self.config
    }

    /// Registers the bytes of an external graphic referenced by `uri`.
    pub fn add_resource(&mut self, uri: impl Into<String>, data: Vec<u8>) {
        self.resources.insert(uri.into(), data);
    }

    pub fn pages_written(&self) -> usize {
        self.stream.pages_written()
    }

    pub fn into_inner(self) -> W {
        self.stream.into_inner()
    }

    fn units(&self, mpt: i32) -> i32 {
        mpt_to_units(mpt, self.config.resolution)
    }

    fn render_attachment(&mut self, attachment: &ExtensionAttachment) -> Result<(), AfpError> {
        match attachment {
            ExtensionAttachment::IncludePageOverlay { name, x, y } => {
                let (x, y) = (self.units(*x), self.units(*y));
                self.stream.create_include_page_overlay(name, x, y, self.config.rotation)
            }
            ExtensionAttachment::IncludePageSegment { name, x, y } => {
                let (x, y) = (self.units(*x), self.units(*y));
                self.stream.create_include_page_segment(name, x, y)
            }
            ExtensionAttachment::TagLogicalElement { name, value } => {
                self.stream.create_tag_logical_element(name, value)
            }
            ExtensionAttachment::NoOperation { content } => self.stream.create_no_operation(content),
        }
    }

    fn render_shading(&mut self, area: Rect, color: Color) -> Result<(), AfpError> {
        if !self.config.shading || area.is_empty() {
            return Ok(());
        }
        let (x, y) = (self.units(area.x), self.units(area.y));
        let (width, height) = (self.units(area.width), self.units(area.height));
        if width <= 0 || height <= 0 {
            return Ok(());
        }
        self.stream.create_shading(x, y, width, height, color)
    }

    fn render_rule(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32) -> Result<(), AfpError> {
        let rule = Rule {
            x1: self.units(x1),
            y1: self.units(y1),
            x2: self.units(x2),
            y2: self.units(y2),
            thickness: self.units(thickness).max(1),
            rotation: self.config.rotation,
        };
        self.stream.create_line(&rule)
    }

    fn render_region(&mut self, page: &Page, region: &RegionViewport) -> Result<(), RenderError> {
        if let Some(background) = region.background {
            self.render_shading(region.view_area, background).map_err(output)?;
        }
        let (x, y) = (region.view_area.x, region.view_area.y);
        match &region.content {
            RegionContent::Static(reference) => {
                self.render_block_stack(page, &reference.blocks, x, y)?;
            }
            RegionContent::Body(body) => self.render_body(page, body, x, y)?,
        }
        Ok(())
    }

    fn render_body(&mut self, page: &Page, body: &BodyRegion, x: i32, y: i32) -> Result<(), RenderError> {
        let mut cursor = self.render_block_stack(page, &body.before_float, x, y)?;
        for span in body.main.spans() {
            let step = span.column_width() + span.column_gap();
            let mut column_x = x;
            for flow in span.flows() {
                self.render_block_stack(page, &flow.blocks, column_x, cursor)?;
                column_x += step;
            }
            cursor += span.height();
        }
        let footnote_height: i32 = body.footnote.iter().map(|b| b.y_offset + b.bpd).sum();
        self.render_block_stack(page, &body.footnote, x, y + body.bpd - footnote_height)?;
        Ok(())
    }

    /// Renders blocks stacked from `y` downwards; returns the y below them.
    fn render_block_stack(&mut self, page: &Page, blocks: &[Block], x: i32, y: i32) -> Result<i32, RenderError> {
        let mut cursor = y;
        for block in blocks {
            self.render_block(page, block, x, cursor)?;
            cursor += block.y_offset + block.bpd;
        }
        Ok(cursor)
    }

    fn render_block(&mut self, page: &Page, block: &Block, x: i32, y: i32) -> Result<(), RenderError> {
        let (bx, by) = (x + block.x_offset, y + block.y_offset);
        if let Some(background) = block.background {
            self.render_shading(Rect::new(bx, by, block.ipd, block.bpd), background).map_err(output)?;
        }
        let mut cursor = by;
        for child in &block.children {
            match child {
                BlockChild::Block(inner) => {
                    self.render_block(page, inner, bx, cursor)?;
                    cursor += inner.y_offset + inner.bpd;
                }
                BlockChild::Line(line) => {
                    self.render_line(page, line, bx, cursor)?;
                    cursor += line.bpd;
                }
            }
        }
        if let Some(border) = block.border {
            let (right, bottom) = (bx + block.ipd, by + block.bpd);
            let edges = [
                (bx, by, right, by),
                (bx, bottom, right, bottom),
                (bx, by, bx, bottom),
                (right, by, right, bottom),
            ];
            for (x1, y1, x2, y2) in edges {
                self.render_rule(x1, y1, x2, y2, border.width).map_err(output)?;
            }
        }
        Ok(())
    }

    fn render_line(&mut self, page: &Page, line: &LineArea, x: i32, y: i32) -> Result<(), RenderError> {
        let mut cursor = x + line.start_indent;
        for inline in &line.inlines {
            self.render_inline(page, inline, cursor, y)?;
            cursor += inline.ipd();
        }
        Ok(())
    }

    fn render_inline(&mut self, page: &Page, inline: &InlineArea, x: i32, y: i32) -> Result<(), RenderError> {
        match inline {
            InlineArea::Text(text) => self.render_text(&text.text, &text.font, x, y + text.offset),
            InlineArea::PageNumberCitation(citation) => match page.resolvable(citation.slot) {
                Some(ResolvableArea::PageNumber(number)) => {
                    self.render_text(number.text(), &citation.font, x, y + citation.offset)
                }
                _ => {
                    warn!("Citation slot {} holds no page number", citation.slot.index());
                    Ok(())
                }
            },
            InlineArea::Leader(leader) => {
                let baseline = y + leader.offset;
                self.render_rule(x, baseline, x + leader.ipd, baseline, leader.thickness).map_err(output)
            }
            InlineArea::Link { children, .. } => {
                let mut cursor = x;
                for child in children {
                    self.render_inline(page, child, cursor, y)?;
                    cursor += child.ipd();
                }
                Ok(())
            }
            InlineArea::Image(image) => self.render_image(image, x, y),
            InlineArea::Space { .. } => Ok(()),
        }
    }

    fn render_text(&mut self, text: &str, font: &FontKey, x: i32, y: i32) -> Result<(), RenderError> {
        if text.is_empty() {
            return Ok(());
        }
        let (index, config) = self
            .config
            .font_for(font)
            .ok_or_else(|| RenderError::Output(format!("no AFP font configured for '{}'", font.family)))?;
        let (reference, mapping) = self
            .fonts
            .reference(index, config, font.size, self.config.rotation)
            .ok_or_else(|| RenderError::Output("too many fonts on one page".to_string()))?;
        if let Some(mapping) = mapping {
            self.stream.create_font(mapping).map_err(output)?;
            self.fonts.commit(index, font.size, reference);
        }
        let run = TextRun {
            x: self.units(x),
            y: self.units(y),
            font_reference: reference,
            rotation: self.config.rotation,
            text,
        };
        self.stream.create_text(&run).map_err(output)
    }

    fn render_image(&mut self, image: &ImageArea, x: i32, y: i32) -> Result<(), RenderError> {
        let Some(object_type) = registry::lookup(&image.mime_type) else {
            warn!("Unsupported image type '{}' for {}; skipping", image.mime_type, image.uri);
            return Ok(());
        };
        let Some(data) = self.resources.get(&image.uri).cloned() else {
            warn!("Image resource {} not found; skipping", image.uri);
            return Ok(());
        };
        let placement = ObjectPlacement {
            x: self.units(x),
            y: self.units(y + image.offset - image.bpd),
            width: self.units(image.ipd),
            height: self.units(image.bpd),
            rotation: self.config.rotation,
            mapping_option: mapping_option::SCALE_TO_FIT,
        };
        self.stream.create_object_container(&placement, object_type, data).map_err(output)
    }

    fn collect_bookmarks(&mut self, bookmark: &BookmarkData) {
        for child in bookmark.children() {
            self.bookmarks.push(BookmarkEntry {
                title: child.title().chars().take(MAX_TAG_NAME).collect(),
                page_number: child.page().map(|page| page.number_string.clone()),
            });
            self.collect_bookmarks(child);
        }
    }
}

impl<W: Write> Renderer for AfpRenderer<W> {
    fn start_renderer(&mut self) -> Result<(), RenderError> {
        self.stream.start_document(Some(&self.config.document_name)).map_err(output)?;
        self.started = true;
        Ok(())
    }

    fn render_page(&mut self, viewport: &PageViewport) -> Result<(), RenderError> {
        if !self.started {
            return Err(RenderError::NotStarted);
        }
        let page = viewport
            .page()
            .ok_or_else(|| RenderError::Area(AreaError::PageNotLoaded(viewport.key().to_string())))?;
        let view = viewport.view_area();
        let (width, height) = (self.units(view.width), self.units(view.height));
        self.stream
            .start_page(width, height, self.config.rotation, self.config.resolution)
            .map_err(output)?;
        self.fonts.reset();

        for attachment in page.extension_attachments() {
            self.render_attachment(attachment).map_err(output)?;
        }
        for region in page.regions() {
            self.render_region(page, region)?;
        }
        self.stream.end_page().map_err(output)?;
        debug!("AFP page written for {}", viewport.key());
        Ok(())
    }

    fn process_off_document_item(&mut self, item: &OffDocumentItem) -> Result<(), RenderError> {
        match item {
            OffDocumentItem::Bookmarks(root) => self.collect_bookmarks(&root.borrow()),
        }
        Ok(())
    }

    /// Writes bookmarks as document-level tag logical elements, then ends
    /// the document.
    fn stop_renderer(&mut self) -> Result<(), RenderError> {
        if !self.started {
            return Err(RenderError::NotStarted);
        }
        for entry in std::mem::take(&mut self.bookmarks) {
            match entry.page_number {
                Some(number) => self.stream.create_tag_logical_element(&entry.title, &number).map_err(output)?,
                None => warn!("Bookmark '{}' has no target page; not written", entry.title),
            }
        }
        self.stream.end_document().map_err(output)?;
        self.started = false;
        Ok(())
    }
}
