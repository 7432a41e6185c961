use folio::area::{
    Block, Citation, FontKey, InlineArea, LineArea, Page, PageViewport, PageViewportRef, RegionClass,
    RegionViewport, ResolvableArea, SlotId, TextArea, UnresolvedPageNumber,
};
use folio::types::{Color, Rect};

/// A4 in millipoints.
pub const A4: Rect = Rect { x: 0, y: 0, width: 595_276, height: 841_890 };
/// A4 less one-inch margins.
pub const BODY: Rect = Rect { x: 72_000, y: 72_000, width: 451_276, height: 697_890 };

pub fn font() -> FontKey {
    FontKey::new("Helvetica", 400, false, 10_000)
}

/// A text inline, 6pt per character.
pub fn text(content: &str) -> InlineArea {
    InlineArea::Text(TextArea {
        text: content.to_string(),
        ipd: 6_000 * content.chars().count() as i32,
        offset: 9_000,
        font: font(),
        color: Color::BLACK,
    })
}

pub fn citation(slot: SlotId) -> InlineArea {
    InlineArea::PageNumberCitation(Citation { slot, ipd: 12_000, offset: 9_000, font: font(), color: Color::BLACK })
}

/// Adds a citation of `idref` to the page and returns its inline.
pub fn cite(page: &mut Page, idref: &str) -> InlineArea {
    let slot = page.add_resolvable(ResolvableArea::PageNumber(UnresolvedPageNumber::new(idref, false)));
    citation(slot)
}

pub fn line(inlines: Vec<InlineArea>) -> LineArea {
    let mut line = LineArea::new(BODY.width, 12_000);
    for inline in inlines {
        line.add_inline(inline);
    }
    line
}

pub fn paragraph(lines: Vec<LineArea>) -> Block {
    let mut block = Block::new(BODY.width);
    for line in lines {
        block.add_line(line);
    }
    block
}

/// Puts the blocks into a single-column body region of `page`.
pub fn with_body(mut page: Page, blocks: Vec<Block>) -> Page {
    let mut region = RegionViewport::body(BODY, 1, 0);
    if let Some(body) = region.body_region_mut() {
        let span = body.main.create_span(false);
        if let Ok(flow) = span.current_flow_mut() {
            for block in blocks {
                flow.add_block(block);
            }
        }
        span.notify_flows_finished();
    }
    page.set_region(region);
    page
}

/// A header region with the given blocks.
pub fn with_header(mut page: Page, blocks: Vec<Block>) -> Page {
    let mut region = RegionViewport::static_region(RegionClass::Before, Rect::new(72_000, 20_000, BODY.width, 36_000));
    if let Some(reference) = region.reference_mut() {
        reference.blocks = blocks;
    }
    page.set_region(region);
    page
}

pub fn viewport(index: usize, page: Page) -> PageViewportRef {
    PageViewport::new(A4, index, index as i32 + 1, (index + 1).to_string(), page).into_shared()
}

/// A page holding a single line of text.
pub fn text_page(index: usize, content: &str) -> PageViewportRef {
    viewport(index, with_body(Page::new(), vec![paragraph(vec![line(vec![text(content)])])]))
}
