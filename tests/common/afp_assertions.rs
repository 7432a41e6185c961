use super::{ids, GeneratedAfp};

const ESCAPE: [u8; 2] = [0x2B, 0xD3];
const TRANSPARENT_DATA: u8 = 0xDA;

/// Concatenates the transparent data of every presentation text record:
/// the EBCDIC text as it will be printed.
pub fn extract_text(afp: &GeneratedAfp) -> Vec<u8> {
    let mut text = Vec::new();
    for payload in afp.payloads(ids::TEXT_DATA) {
        let mut i = 0;
        while i + 4 <= payload.len() && payload[i..i + 2] == ESCAPE {
            let length = usize::from(payload[i + 2]);
            let end = (i + 2 + length).min(payload.len());
            if payload[i + 3] == TRANSPARENT_DATA {
                text.extend_from_slice(&payload[i + 4..end]);
            }
            i = end;
        }
    }
    text
}

pub fn contains_text(afp: &GeneratedAfp, text: &str) -> bool {
    let needle = folio_afp::ebcdic::encode(text);
    extract_text(afp).windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Assert that the AFP stream prints specific text
#[macro_export]
macro_rules! assert_afp_contains_text {
    ($afp:expr, $text:expr) => {
        assert!(
            $crate::common::afp_assertions::contains_text(&$afp, $text),
            "AFP should contain '{}'",
            $text
        );
    };
}

/// Assert that the AFP stream does NOT print specific text
#[macro_export]
macro_rules! assert_afp_not_contains_text {
    ($afp:expr, $text:expr) => {
        assert!(
            !$crate::common::afp_assertions::contains_text(&$afp, $text),
            "AFP should NOT contain '{}'",
            $text
        );
    };
}

/// Assert the number of pages in an AFP stream
#[macro_export]
macro_rules! assert_afp_page_count {
    ($afp:expr, $count:expr) => {
        assert_eq!($afp.page_count(), $count, "Expected {} pages, got {}", $count, $afp.page_count());
    };
}
