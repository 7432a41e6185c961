mod common;

use common::fixtures::*;
use common::ids;
use common::{TestResult, render_pages, render_pages_with};
use folio::PipelineBuilder;
use folio::area::{Block, ExtensionAttachment, Page};
use folio::types::Color;

#[test]
fn test_document_envelope_and_pages() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let afp = render_pages(vec![text_page(0, "First"), text_page(1, "Second")])?;
    assert_afp_page_count!(afp, 2);
    let ids = afp.ids();
    assert_eq!(ids.first(), Some(&ids::BEGIN_DOCUMENT));
    assert_eq!(ids.last(), Some(&ids::END_DOCUMENT));
    assert_eq!(afp.count(ids::END_PAGE), 2);
    assert_afp_contains_text!(afp, "First");
    assert_afp_contains_text!(afp, "Second");
    Ok(())
}

#[test]
fn test_page_record_order() -> TestResult {
    let afp = render_pages(vec![text_page(0, "Order")])?;
    let ids = afp.ids();
    let position = |id| ids.iter().position(|candidate| *candidate == id).unwrap();
    assert!(position(ids::BEGIN_PAGE) < position(ids::BEGIN_ENVIRONMENT_GROUP));
    assert!(position(ids::BEGIN_ENVIRONMENT_GROUP) < position(ids::MAP_CODED_FONT));
    assert!(position(ids::MAP_CODED_FONT) < position(ids::PAGE_DESCRIPTOR));
    assert!(position(ids::PAGE_DESCRIPTOR) < position(ids::BEGIN_TEXT));
    assert!(position(ids::BEGIN_TEXT) < position(ids::END_PAGE));
    Ok(())
}

#[test]
fn test_document_name_in_begin_document() -> TestResult {
    let afp = render_pages_with(PipelineBuilder::new().with_document_name("INVOICES"), vec![text_page(0, "x")])?;
    let begin = afp.payloads(ids::BEGIN_DOCUMENT);
    assert_eq!(&begin[0][..8], folio_afp::ebcdic::encode("INVOICES").as_slice());
    Ok(())
}

#[test]
fn test_one_font_mapping_per_page_for_repeated_font() -> TestResult {
    let blocks = vec![
        paragraph(vec![line(vec![text("one")]), line(vec![text("two")])]),
        paragraph(vec![line(vec![text("three")])]),
    ];
    let afp = render_pages(vec![viewport(0, with_body(Page::new(), blocks))])?;
    assert_eq!(afp.count(ids::MAP_CODED_FONT), 1);
    // One repeating group for the single coded font.
    let mcf = afp.payloads(ids::MAP_CODED_FONT);
    assert_eq!(usize::from(u16::from_be_bytes([mcf[0][0], mcf[0][1]])), mcf[0].len());
    Ok(())
}

#[test]
fn test_backgrounds_become_shading() -> TestResult {
    let mut block = paragraph(vec![line(vec![text("shaded")])]);
    block.background = Some(Color::gray(180));
    let page = with_header(
        with_body(Page::new(), vec![block]),
        vec![Block { background: Some(Color::BLACK), ..paragraph(vec![line(vec![text("head")])]) }],
    );
    let afp = render_pages(vec![viewport(0, page)])?;
    assert_eq!(afp.count(ids::BEGIN_IMAGE), 2);
    assert_afp_contains_text!(afp, "head");

    let page = with_body(Page::new(), vec![Block { background: Some(Color::BLACK), ..Block::new(100_000) }]);
    let mut config = folio::RenderConfig::default();
    config.shading = false;
    let afp = render_pages_with(PipelineBuilder::new().with_config(config), vec![viewport(0, page)])?;
    assert_eq!(afp.count(ids::BEGIN_IMAGE), 0);
    Ok(())
}

#[test]
fn test_extension_attachments_on_page() -> TestResult {
    let mut page = Page::new();
    page.add_extension_attachment(ExtensionAttachment::IncludePageSegment { name: "S1LOGO".into(), x: 0, y: 0 });
    page.add_extension_attachment(ExtensionAttachment::NoOperation { content: "generated".into() });
    page.add_extension_attachment(ExtensionAttachment::TagLogicalElement {
        name: "Customer".into(),
        value: "0042".into(),
    });
    let afp = render_pages(vec![viewport(0, with_body(page, vec![]))])?;
    assert_eq!(afp.count(ids::INCLUDE_SEGMENT), 1);
    assert_eq!(afp.count(ids::NO_OPERATION), 1);
    assert_eq!(afp.count(ids::TAG), 1);
    Ok(())
}

#[test]
fn test_images_become_object_containers() -> TestResult {
    use folio::area::{ImageArea, InlineArea};

    let image = InlineArea::Image(ImageArea {
        ipd: 72_000,
        bpd: 36_000,
        offset: 36_000,
        uri: "logo.gif".into(),
        mime_type: "image/gif".into(),
    });
    let missing = InlineArea::Image(ImageArea {
        ipd: 72_000,
        bpd: 36_000,
        offset: 36_000,
        uri: "missing.gif".into(),
        mime_type: "image/gif".into(),
    });
    let page = with_body(Page::new(), vec![paragraph(vec![line(vec![image, missing])])]);

    let mut pipeline = PipelineBuilder::new().build(Vec::new())?;
    pipeline.add_resource("logo.gif", b"GIF89a".to_vec());
    let bytes = pipeline.render_pages(vec![viewport(0, page)])?;
    let afp = common::GeneratedAfp::from_bytes(bytes)?;
    assert_eq!(afp.count(ids::BEGIN_CONTAINER), 1);
    Ok(())
}
