//! IM image objects, used to paint shaded rectangles.
//!
//! A shade is a 64x8 pel cell of 1-bit raster data, dithered from the fill
//! color's gray level and repeated across the image area by the image cell
//! position's fill size.

use crate::binary::{i24_field, u16_field};
use crate::ebcdic;
use crate::error::AfpError;
use crate::rotation::Rotation;
use crate::structured_field::{category, sf_type, Field, StructuredObject};
use folio_types::Color;
use std::io::Write;

pub const CELL_WIDTH: u16 = 64;
pub const CELL_HEIGHT: u16 = 8;
/// Number of gray levels; level 16 is white, level 0 black.
pub const GRAY_LEVELS: u8 = 16;

const BAYER: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Gray level of a color, 0 (black) to 16 (white).
pub fn gray_level(color: Color) -> u8 {
    (color.luminance() / 255.0 * f32::from(GRAY_LEVELS)).round() as u8
}

/// The raster of one shading cell for `level`, 8 rows of 64 pels.
pub fn dither_cell(level: u8) -> [u8; 64] {
    let ink = u16::from(GRAY_LEVELS.saturating_sub(level)) * 4;
    let mut raster = [0u8; 64];
    for (row, thresholds) in BAYER.iter().enumerate() {
        let byte = thresholds
            .iter()
            .enumerate()
            .filter(|&(_, &threshold)| u16::from(threshold) < ink)
            .fold(0u8, |acc, (column, _)| acc | (0x80 >> column));
        raster[row * 8..row * 8 + 8].fill(byte);
    }
    raster
}

/// Placement and size of an IM image, in page units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub rotation: Rotation,
    pub resolution: u32,
}

#[derive(Debug)]
pub struct ImImageObject {
    name: [u8; 8],
    x: [u8; 3],
    y: [u8; 3],
    rotation: Rotation,
    units: [u8; 2],
    width: [u8; 2],
    height: [u8; 2],
    raster: Vec<u8>,
}

impl ImImageObject {
    /// A shade filling `area` with the dither cell for `level`.
    pub fn shading(name: &str, area: &ImageArea, level: u8) -> Result<Self, AfpError> {
        if area.width <= 0 || area.height <= 0 {
            return Err(AfpError::InvalidGeometry(format!(
                "shading area must have a positive size, got {}x{}",
                area.width, area.height
            )));
        }
        Ok(Self {
            name: ebcdic::encode_name(name),
            x: i24_field("image x offset", i64::from(area.x))?,
            y: i24_field("image y offset", i64::from(area.y))?,
            rotation: area.rotation,
            units: u16_field("image resolution", i64::from(area.resolution) * 10)?,
            width: u16_field("image width", i64::from(area.width))?,
            height: u16_field("image height", i64::from(area.height))?,
            raster: dither_cell(level).to_vec(),
        })
    }

    fn write_output_control(&self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::CONTROL, category::IM_IMAGE);
        field
            .put(&self.x)
            .put(&self.y)
            .put(&self.rotation.orientation())
            .put(&self.rotation.quarter_turn().orientation())
            .put_zeros(8)
            // scale 1:1, no reflection
            .put(&[0x03, 0xE8])
            .put(&[0xFF, 0xFF, 0xFF, 0xFF]);
        field.write_to(out)
    }

    fn write_input_descriptor(&self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::DESCRIPTOR, category::IM_IMAGE);
        field
            .put_zeros(12)
            .put(&[0x00, 0x00])
            .put(&self.units)
            .put(&self.units)
            .put(&self.width)
            .put(&self.height)
            .put_zeros(6)
            .put(&CELL_WIDTH.to_be_bytes())
            .put(&CELL_HEIGHT.to_be_bytes())
            .put_zeros(2)
            // default image color
            .put(&[0xFF, 0xFF]);
        field.write_to(out)
    }

    fn write_cell_position(&self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::POSITION, category::IM_IMAGE);
        field
            .put_zeros(4)
            .put(&CELL_WIDTH.to_be_bytes())
            .put(&CELL_HEIGHT.to_be_bytes())
            .put(&self.width)
            .put(&self.height);
        field.write_to(out)
    }
}

impl StructuredObject for ImImageObject {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::BEGIN, category::IM_IMAGE, &self.name).write_to(out)
    }

    fn write_content(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        self.write_output_control(out)?;
        self.write_input_descriptor(out)?;
        self.write_cell_position(out)?;
        let mut raster = Field::new(sf_type::DATA, category::IM_IMAGE);
        raster.put(&self.raster);
        raster.write_to(out)
    }

    fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::END, category::IM_IMAGE, &self.name).write_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_field::serialize;
    use crate::testing::{field_ids, fields};

    #[test]
    fn test_gray_levels() {
        assert_eq!(gray_level(Color::BLACK), 0);
        assert_eq!(gray_level(Color::WHITE), 16);
        assert_eq!(gray_level(Color::gray(128)), 8);
    }

    #[test]
    fn test_dither_cell_density() {
        let ones = |cell: [u8; 64]| cell.iter().map(|b| b.count_ones()).sum::<u32>();
        assert_eq!(ones(dither_cell(16)), 0);
        assert_eq!(ones(dither_cell(0)), 64 * 8);
        // half the pels of each 8x8 tile are inked at level 8
        assert_eq!(ones(dither_cell(8)), 64 * 4);
        // every row repeats its 8-pel pattern across the cell width
        let cell = dither_cell(5);
        assert!(cell.chunks(8).all(|row| row.iter().all(|&b| b == row[0])));
    }

    #[test]
    fn test_shading_records() {
        let area = ImageArea { x: 10, y: 20, width: 300, height: 40, rotation: Rotation::Deg0, resolution: 240 };
        let mut image = ImImageObject::shading("IMG00001", &area, 8).unwrap();
        let mut out = Vec::new();
        serialize(&mut image, &mut out).unwrap();

        assert_eq!(
            field_ids(&out),
            vec![(0xA8, 0x7B), (0xA7, 0x7B), (0xA6, 0x7B), (0xAC, 0x7B), (0xEE, 0x7B), (0xA9, 0x7B)]
        );
        let records = fields(&out);
        assert_eq!(records[1].len(), 33);
        assert_eq!(records[2].len(), 45);
        assert_eq!(records[3].len(), 21);
        assert_eq!(records[4].len(), 9 + 64);
        // fill size covers the whole area
        assert_eq!(&records[3][17..21], &[0x01, 0x2C, 0x00, 0x28]);
    }

    #[test]
    fn test_rejects_empty_area() {
        let area = ImageArea { x: 0, y: 0, width: 0, height: 10, rotation: Rotation::Deg0, resolution: 240 };
        assert!(matches!(ImImageObject::shading("IMG00001", &area, 0), Err(AfpError::InvalidGeometry(_))));
    }
}
