//! Region viewports and the reference areas inside them.

use crate::block::Block;
use crate::span::Span;
use folio_types::{Color, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionClass {
    Before,
    After,
    Start,
    End,
    Body,
}

/// The main reference area of the body region: a stack of spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainReference {
    ipd: i32,
    column_count: usize,
    column_gap: i32,
    spans: Vec<Span>,
}

impl MainReference {
    pub fn new(ipd: i32, column_count: usize, column_gap: i32) -> Self {
        Self { ipd, column_count, column_gap, spans: Vec::new() }
    }

    /// Starts a new span across all columns (`span_all`) or the body's
    /// column count. An empty current span is discarded first.
    pub fn create_span(&mut self, span_all: bool) -> &mut Span {
        if self.spans.last().is_some_and(Span::is_empty) {
            self.spans.pop();
        }
        let columns = if span_all { 1 } else { self.column_count };
        self.spans.push(Span::new(columns, self.column_gap, self.ipd));
        let last = self.spans.len() - 1;
        &mut self.spans[last]
    }

    pub fn current_span(&self) -> Option<&Span> {
        self.spans.last()
    }

    pub fn current_span_mut(&mut self) -> Option<&mut Span> {
        self.spans.last_mut()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(Span::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRegion {
    pub ipd: i32,
    pub bpd: i32,
    pub before_float: Vec<Block>,
    pub main: MainReference,
    pub footnote: Vec<Block>,
}

impl BodyRegion {
    pub fn new(ipd: i32, bpd: i32, column_count: usize, column_gap: i32) -> Self {
        Self {
            ipd,
            bpd,
            before_float: Vec::new(),
            main: MainReference::new(ipd, column_count.max(1), column_gap),
            footnote: Vec::new(),
        }
    }
}

/// The reference area of a static (before, after, start, end) region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionReference {
    pub ipd: i32,
    pub bpd: i32,
    pub blocks: Vec<Block>,
}

impl RegionReference {
    pub fn new(ipd: i32, bpd: i32) -> Self {
        Self { ipd, bpd, blocks: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionContent {
    Static(RegionReference),
    Body(BodyRegion),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionViewport {
    pub class: RegionClass,
    /// Position and size on the page, in millipoints.
    pub view_area: Rect,
    pub clip: bool,
    pub background: Option<Color>,
    pub content: RegionContent,
}

impl RegionViewport {
    pub fn body(view_area: Rect, column_count: usize, column_gap: i32) -> Self {
        Self {
            class: RegionClass::Body,
            view_area,
            clip: false,
            background: None,
            content: RegionContent::Body(BodyRegion::new(
                view_area.width,
                view_area.height,
                column_count,
                column_gap,
            )),
        }
    }

    pub fn static_region(class: RegionClass, view_area: Rect) -> Self {
        Self {
            class,
            view_area,
            clip: false,
            background: None,
            content: RegionContent::Static(RegionReference::new(view_area.width, view_area.height)),
        }
    }

    pub fn body_region_mut(&mut self) -> Option<&mut BodyRegion> {
        match &mut self.content {
            RegionContent::Body(body) => Some(body),
            RegionContent::Static(_) => None,
        }
    }

    pub fn reference_mut(&mut self) -> Option<&mut RegionReference> {
        match &mut self.content {
            RegionContent::Static(reference) => Some(reference),
            RegionContent::Body(_) => None,
        }
    }
}
