use crate::ebcdic;
use crate::error::AfpError;
use crate::page::PageContent;
use crate::structured_field::{category, serialize_all, sf_type, Field, StructuredObject};
use std::io::Write;

/// A page segment (BPS ... EPS): reusable page content that pages pull in
/// with an include page segment record.
#[derive(Debug)]
pub struct PageSegment {
    name: [u8; 8],
    objects: Vec<PageContent>,
}

impl PageSegment {
    pub fn new(name: &str) -> Self {
        Self { name: ebcdic::encode_name(name), objects: Vec::new() }
    }

    pub fn add_object(&mut self, object: PageContent) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl StructuredObject for PageSegment {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::BEGIN, category::PAGE_SEGMENT, &self.name).write_to(out)
    }

    fn write_content(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        serialize_all(&mut self.objects, out)
    }

    fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::END, category::PAGE_SEGMENT, &self.name).write_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImImageObject, ImageArea};
    use crate::rotation::Rotation;
    use crate::structured_field::serialize;
    use crate::testing::field_ids;

    #[test]
    fn test_segment_wraps_its_objects() {
        let mut segment = PageSegment::new("LOGO");
        let area = ImageArea { x: 0, y: 0, width: 64, height: 8, rotation: Rotation::Deg0, resolution: 240 };
        segment.add_object(PageContent::Image(ImImageObject::shading("IMG00001", &area, 4).unwrap()));

        let mut out = Vec::new();
        serialize(&mut segment, &mut out).unwrap();
        let ids = field_ids(&out);
        assert_eq!(ids.first(), Some(&(0xA8, 0x5F)));
        assert_eq!(ids.last(), Some(&(0xA9, 0x5F)));
        assert_eq!(ids.len(), 2 + 6);
    }
}
