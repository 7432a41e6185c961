//! Resource maps held by environment groups.
//!
//! Coded font, page overlay and page segment maps have a fixed capacity per
//! record. Environment groups keep them as a chain of buckets and open a new
//! bucket when the last one is full (see [`append_with_overflow`]).

use crate::binary::u16_field;
use crate::ebcdic;
use crate::error::AfpError;
use crate::rotation::Rotation;
use crate::structured_field::{category, sf_type, Field, StructuredObject};
use crate::triplet::{fqn_type, id as triplet_id, resource_type, FqnFormat, Triplet, Triplets};
use log::debug;
use std::io::Write;

/// A capacity-limited map record.
pub(crate) trait ResourceMap: Default {
    type Entry: Clone;
    const KIND: &'static str;

    /// Adds an entry, failing with `MaxSizeExceeded` once the record is full.
    fn add(&mut self, entry: Self::Entry) -> Result<(), AfpError>;
}

/// Appends `entry` to the last bucket of `chain`, opening a new bucket when
/// the last one is full. A new bucket that refuses its first entry is an
/// internal error and is reported as `OverflowRetryFailed`.
pub(crate) fn append_with_overflow<M: ResourceMap>(
    chain: &mut Vec<M>,
    entry: M::Entry,
) -> Result<(), AfpError> {
    if let Some(current) = chain.last_mut() {
        match current.add(entry.clone()) {
            Ok(()) => return Ok(()),
            Err(AfpError::MaxSizeExceeded { .. }) => {
                debug!("{} full, opening bucket {}", M::KIND, chain.len() + 1);
            }
            Err(e) => return Err(e),
        }
    }

    let mut bucket = M::default();
    match bucket.add(entry) {
        Ok(()) => {}
        Err(AfpError::MaxSizeExceeded { .. }) => {
            return Err(AfpError::OverflowRetryFailed { kind: M::KIND });
        }
        Err(e) => return Err(e),
    }
    chain.push(bucket);
    Ok(())
}

fn full(kind: &'static str, capacity: usize) -> AfpError {
    AfpError::MaxSizeExceeded { kind, capacity }
}

fn validate_name(name: &str, max: usize) -> Result<(), AfpError> {
    if name.is_empty() {
        return Err(AfpError::InvalidName { name: name.to_string(), reason: "name is empty" });
    }
    if name.chars().count() > max {
        return Err(AfpError::InvalidName {
            name: name.to_string(),
            reason: "name is longer than 8 characters",
        });
    }
    Ok(())
}

/// One coded font mapped into a page: a character set and code page pair
/// bound to a local font reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMapping {
    pub reference: u8,
    pub character_set: String,
    pub code_page: String,
    pub rotation: Rotation,
    /// Outline fonts carry a vertical size in 1440ths of an inch.
    /// Raster fonts use `None`.
    pub outline_size: Option<u16>,
}

impl FontMapping {
    const RASTER_GROUP_LENGTH: usize = 0x22;
    const OUTLINE_GROUP_LENGTH: usize = 0x36;

    fn group_length(&self) -> usize {
        match self.outline_size {
            Some(_) => Self::OUTLINE_GROUP_LENGTH,
            None => Self::RASTER_GROUP_LENGTH,
        }
    }
}

/// Map Coded Font (MCF).
#[derive(Debug, Default)]
pub struct MapCodedFont {
    fonts: Vec<FontMapping>,
}

impl MapCodedFont {
    pub const CAPACITY: usize = 254;

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn contains(&self, reference: u8) -> bool {
        self.fonts.iter().any(|f| f.reference == reference)
    }
}

impl ResourceMap for MapCodedFont {
    type Entry = FontMapping;
    const KIND: &'static str = "MapCodedFont";

    fn add(&mut self, font: FontMapping) -> Result<(), AfpError> {
        validate_name(&font.character_set, 8)?;
        validate_name(&font.code_page, 8)?;
        if self.fonts.len() >= Self::CAPACITY {
            return Err(full(Self::KIND, Self::CAPACITY));
        }
        self.fonts.push(font);
        Ok(())
    }
}

impl StructuredObject for MapCodedFont {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::MAP, category::CODED_FONT);
        for font in &self.fonts {
            let mut group = Vec::with_capacity(font.group_length());
            group.extend_from_slice(&u16_field("font group length", font.group_length() as i64)?);

            let mut triplets: Triplets = [
                Triplet::fully_qualified_name(
                    fqn_type::FONT_CHARSET_NAME_REF,
                    FqnFormat::CharString,
                    format!("{:<8}", font.character_set),
                ),
                Triplet::fully_qualified_name(
                    fqn_type::CODE_PAGE_NAME_REF,
                    FqnFormat::CharString,
                    format!("{:<8}", font.code_page),
                ),
                Triplet::CharacterRotation(font.rotation.orientation()),
                Triplet::ResourceLocalIdentifier {
                    resource_type: resource_type::CODED_FONT,
                    local_id: font.reference,
                },
            ]
            .into_iter()
            .collect();
            triplets.write_to(&mut group)?;

            if let Some(size) = font.outline_size {
                // Font descriptor specification: weight/width class, height,
                // width, flags, reserved, usage flags.
                group.extend_from_slice(&[0x14, 0x1F, 0x00, 0x00]);
                group.extend_from_slice(&size.to_be_bytes());
                group.extend_from_slice(&size.to_be_bytes());
                group.extend_from_slice(&[0x00; 12]);
            }
            field.put(&group);
        }
        field.write_to(out)
    }
}

/// Map Page Overlay (MPO).
#[derive(Debug, Default)]
pub struct MapPageOverlay {
    overlays: Vec<[u8; 8]>,
}

impl MapPageOverlay {
    pub const CAPACITY: usize = 254;
    const GROUP_LENGTH: usize = 18;

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.overlays.contains(&ebcdic::encode_name(name))
    }
}

impl ResourceMap for MapPageOverlay {
    type Entry = String;
    const KIND: &'static str = "MapPageOverlay";

    fn add(&mut self, name: String) -> Result<(), AfpError> {
        if name.chars().count() != 8 {
            return Err(AfpError::InvalidName {
                name,
                reason: "overlay names must be exactly 8 characters",
            });
        }
        if self.overlays.len() >= Self::CAPACITY {
            return Err(full(Self::KIND, Self::CAPACITY));
        }
        self.overlays.push(ebcdic::encode_name(&name));
        Ok(())
    }
}

impl StructuredObject for MapPageOverlay {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::MAP, category::PAGE_OVERLAY);
        for (index, name) in self.overlays.iter().enumerate() {
            field
                .put(&[0x00, Self::GROUP_LENGTH as u8])
                .put(&[0x0C, triplet_id::FULLY_QUALIFIED_NAME, fqn_type::BEGIN_RESOURCE_OBJECT_REF, 0x00])
                .put(name)
                .put(&[
                    0x04,
                    triplet_id::RESOURCE_LOCAL_IDENTIFIER,
                    resource_type::PAGE_OVERLAY,
                    (index + 1) as u8,
                ]);
        }
        field.write_to(out)
    }
}

/// Map Page Segment (MPS).
#[derive(Debug, Default)]
pub struct MapPageSegment {
    segments: Vec<[u8; 8]>,
}

impl MapPageSegment {
    pub const CAPACITY: usize = 128;
    const GROUP_LENGTH: u8 = 0x0C;

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.segments.contains(&ebcdic::encode_name(name))
    }
}

impl ResourceMap for MapPageSegment {
    type Entry = String;
    const KIND: &'static str = "MapPageSegment";

    fn add(&mut self, name: String) -> Result<(), AfpError> {
        validate_name(&name, 8)?;
        if self.segments.len() >= Self::CAPACITY {
            return Err(full(Self::KIND, Self::CAPACITY));
        }
        self.segments.push(ebcdic::encode_name(&name));
        Ok(())
    }
}

impl StructuredObject for MapPageSegment {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::MIGRATION, category::PAGE_SEGMENT);
        field.put_zeros(3).put_u8(Self::GROUP_LENGTH);
        for name in &self.segments {
            field.put_zeros(4).put(name);
        }
        field.write_to(out)
    }
}

/// Map Data Resource (MDR): one record per mapped resource, described
/// entirely by its triplets.
#[derive(Debug, Default)]
pub struct MapDataResource {
    triplets: Triplets,
}

impl MapDataResource {
    pub fn new(triplets: Triplets) -> Self {
        Self { triplets }
    }

    pub fn add_triplet(&mut self, triplet: Triplet) {
        self.triplets.push(triplet);
    }
}

impl StructuredObject for MapDataResource {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        write_repeating_group(sf_type::MAP, category::DATA_RESOURCE, &mut self.triplets, out)
    }
}

/// Map Container Data (MCD): how a container's data is mapped into its
/// object area.
#[derive(Debug)]
pub struct MapContainerData {
    triplets: Triplets,
}

impl MapContainerData {
    pub fn new(mapping_option: u8) -> Self {
        let mut triplets = Triplets::new();
        triplets.push(Triplet::MappingOption(mapping_option));
        Self { triplets }
    }
}

impl StructuredObject for MapContainerData {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        write_repeating_group(sf_type::MAP, category::OBJECT_CONTAINER, &mut self.triplets, out)
    }
}

fn write_repeating_group(
    sf_type: u8,
    category: u8,
    triplets: &mut Triplets,
    out: &mut dyn Write,
) -> Result<(), AfpError> {
    let group_length = 2 + triplets.data_length();
    let mut field = Field::new(sf_type, category);
    field
        .put(&u16_field("repeating group length", group_length as i64)?)
        .put_triplets(triplets)?;
    field.write_to(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_field::serialize;

    fn overlay_name(i: usize) -> String {
        format!("OVL{:05}", i)
    }

    fn segment_chain(count: usize) -> Vec<MapPageSegment> {
        let mut chain = Vec::new();
        for i in 0..count {
            append_with_overflow(&mut chain, format!("S{}", i)).unwrap();
        }
        chain
    }

    #[test]
    fn test_overflow_opens_second_bucket() {
        let chain = segment_chain(MapPageSegment::CAPACITY + 1);
        let sizes: Vec<_> = chain.iter().map(MapPageSegment::len).collect();
        assert_eq!(sizes, vec![128, 1]);
    }

    #[test]
    fn test_overflow_fills_buckets_in_order() {
        let chain = segment_chain(2 * MapPageSegment::CAPACITY + 5);
        let sizes: Vec<_> = chain.iter().map(MapPageSegment::len).collect();
        assert_eq!(sizes, vec![128, 128, 5]);
        assert!(chain[2].contains("S260"));
    }

    #[derive(Default)]
    struct Closed;

    impl ResourceMap for Closed {
        type Entry = ();
        const KIND: &'static str = "Closed";

        fn add(&mut self, _: ()) -> Result<(), AfpError> {
            Err(full(Self::KIND, 0))
        }
    }

    #[test]
    fn test_second_failure_is_reported() {
        let mut chain: Vec<Closed> = Vec::new();
        assert!(matches!(
            append_with_overflow(&mut chain, ()),
            Err(AfpError::OverflowRetryFailed { kind: "Closed" })
        ));
        assert!(chain.is_empty());
    }

    #[test]
    fn test_validation_errors_are_not_retried() {
        let mut chain: Vec<MapPageOverlay> = Vec::new();
        let result = append_with_overflow(&mut chain, "SHORT".to_string());
        assert!(matches!(result, Err(AfpError::InvalidName { .. })));
        assert!(chain.is_empty());
    }

    #[test]
    fn test_page_overlay_record_layout() {
        let mut map = MapPageOverlay::default();
        map.add(overlay_name(1)).unwrap();
        map.add(overlay_name(2)).unwrap();
        let mut out = Vec::new();
        serialize(&mut map, &mut out).unwrap();

        assert_eq!(out.len(), 9 + 2 * 18);
        assert_eq!(u16::from_be_bytes([out[1], out[2]]) as usize, 2 * 18 + 8);
        assert_eq!(&out[4..6], &[0xAB, 0xD8]);
        // second group, local id 2
        assert_eq!(&out[9 + 18..9 + 18 + 6], &[0x00, 0x12, 0x0C, 0x02, 0x84, 0x00]);
        assert_eq!(out[out.len() - 1], 2);
    }

    #[test]
    fn test_coded_font_group_lengths() {
        let mut map = MapCodedFont::default();
        map.add(FontMapping {
            reference: 1,
            character_set: "C0H200B0".into(),
            code_page: "T1V10500".into(),
            rotation: Rotation::Deg0,
            outline_size: None,
        })
        .unwrap();
        map.add(FontMapping {
            reference: 2,
            character_set: "CZH200".into(),
            code_page: "T1V10500".into(),
            rotation: Rotation::Deg90,
            outline_size: Some(240),
        })
        .unwrap();
        let mut out = Vec::new();
        serialize(&mut map, &mut out).unwrap();

        assert_eq!(out.len(), 9 + 0x22 + 0x36);
        assert_eq!(&out[9..11], &[0x00, 0x22]);
        // rotation and local id of the raster font
        assert_eq!(&out[9 + 26..9 + 34], &[0x04, 0x26, 0x00, 0x00, 0x04, 0x24, 0x05, 0x01]);
        let second = 9 + 0x22;
        assert_eq!(&out[second..second + 2], &[0x00, 0x36]);
        assert_eq!(&out[second + 26..second + 30], &[0x04, 0x26, 0x2D, 0x00]);
    }

    #[test]
    fn test_data_resource_lengths() {
        let mut mdr = MapDataResource::new(
            [Triplet::fully_qualified_name(
                fqn_type::DATA_OBJECT_EXTERNAL_RESOURCE_REF,
                FqnFormat::CharString,
                "LOGO",
            )]
            .into_iter()
            .collect(),
        );
        let mut out = Vec::new();
        serialize(&mut mdr, &mut out).unwrap();
        let triplet_length = 8;
        assert_eq!(out.len(), 11 + triplet_length);
        assert_eq!(u16::from_be_bytes([out[1], out[2]]) as usize, 10 + triplet_length);
        assert_eq!(u16::from_be_bytes([out[9], out[10]]) as usize, 2 + triplet_length);
    }

    #[test]
    fn test_page_segment_record_layout() {
        let mut map = MapPageSegment::default();
        map.add("SEG1".into()).unwrap();
        let mut out = Vec::new();
        serialize(&mut map, &mut out).unwrap();
        assert_eq!(&out[4..6], &[0xB1, 0x5F]);
        assert_eq!(&out[9..13], &[0x00, 0x00, 0x00, 0x0C]);
        assert_eq!(out.len(), 13 + 12);
    }
}
