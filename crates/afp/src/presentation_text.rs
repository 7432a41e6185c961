//! Presentation text objects (PTOCA).
//!
//! Text is written as unchained control sequences, each introduced by the
//! `2B D3` escape. Sequences accumulate in presentation text data records;
//! a record that cannot take the next batch is closed and a new one opened.

use crate::binary::i16_field;
use crate::ebcdic;
use crate::error::AfpError;
use crate::rotation::Rotation;
use crate::structured_field::{category, serialize_all, sf_type, Field, StructuredObject, MAX_PAYLOAD};
use log::trace;
use std::io::Write;

const ESCAPE: [u8; 2] = [0x2B, 0xD3];
// Each sequence carries at most 255 bytes after the escape.
const MAX_TRN_CHUNK: usize = 0xFF - 2;
/// Encoded text placed in one batch; longer runs continue in further batches.
const TEXT_SLAB: usize = MAX_TRN_CHUNK * 64;

pub mod function {
    pub const AMI: u8 = 0xC6;
    pub const AMB: u8 = 0xD2;
    pub const SCFL: u8 = 0xF0;
    pub const STO: u8 = 0xF6;
    pub const TRN: u8 = 0xDA;
    pub const DIR: u8 = 0xE4;
    pub const DBR: u8 = 0xE6;
    pub const NOP: u8 = 0xF8;
}

/// Builder for a batch of control sequences.
#[derive(Debug, Default)]
pub struct ControlSequences {
    bytes: Vec<u8>,
}

impl ControlSequences {
    pub fn new() -> Self {
        Self::default()
    }

    fn sequence(&mut self, function: u8, parameters: &[u8]) {
        self.bytes.extend_from_slice(&ESCAPE);
        self.bytes.push((parameters.len() + 2) as u8);
        self.bytes.push(function);
        self.bytes.extend_from_slice(parameters);
    }

    pub fn absolute_move_inline(&mut self, x: i32) -> Result<&mut Self, AfpError> {
        let x = i16_field("inline position", i64::from(x))?;
        self.sequence(function::AMI, &x);
        Ok(self)
    }

    pub fn absolute_move_baseline(&mut self, y: i32) -> Result<&mut Self, AfpError> {
        let y = i16_field("baseline position", i64::from(y))?;
        self.sequence(function::AMB, &y);
        Ok(self)
    }

    pub fn set_coded_font_local(&mut self, reference: u8) -> &mut Self {
        self.sequence(function::SCFL, &[reference]);
        self
    }

    /// Sets the inline direction to `rotation`; the baseline direction
    /// follows a quarter turn later.
    pub fn set_text_orientation(&mut self, rotation: Rotation) -> &mut Self {
        let mut parameters = [0u8; 4];
        parameters[..2].copy_from_slice(&rotation.orientation());
        parameters[2..].copy_from_slice(&rotation.quarter_turn().orientation());
        self.sequence(function::STO, &parameters);
        self
    }

    /// Transparent data, already encoded for the active code page.
    pub fn transparent_data(&mut self, data: &[u8]) -> &mut Self {
        for chunk in data.chunks(MAX_TRN_CHUNK) {
            self.sequence(function::TRN, chunk);
        }
        self
    }

    pub fn draw_inline_rule(&mut self, length: i32, width: i32) -> Result<&mut Self, AfpError> {
        let parameters = rule_parameters(length, width)?;
        self.sequence(function::DIR, &parameters);
        Ok(self)
    }

    pub fn draw_baseline_rule(&mut self, length: i32, width: i32) -> Result<&mut Self, AfpError> {
        let parameters = rule_parameters(length, width)?;
        self.sequence(function::DBR, &parameters);
        Ok(self)
    }

    pub fn no_operation(&mut self, data: &[u8]) -> &mut Self {
        for chunk in data.chunks(MAX_TRN_CHUNK) {
            self.sequence(function::NOP, chunk);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// Rule length, then width as a 2-byte integer plus a zero fraction byte.
fn rule_parameters(length: i32, width: i32) -> Result<[u8; 5], AfpError> {
    let length = i16_field("rule length", i64::from(length))?;
    let width = i16_field("rule width", i64::from(width))?;
    Ok([length[0], length[1], width[0], width[1], 0x00])
}

/// A run of text placed at a baseline position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun<'a> {
    pub x: i32,
    pub y: i32,
    pub font_reference: u8,
    pub rotation: Rotation,
    pub text: &'a str,
}

/// A horizontal or vertical rule between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub thickness: i32,
    pub rotation: Rotation,
}

/// Presentation Text Data (PTX) record.
#[derive(Debug, Default)]
pub struct PresentationTextData {
    data: Vec<u8>,
}

impl PresentationTextData {
    pub const CAPACITY: usize = MAX_PAYLOAD;

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn fits(&self, batch: usize) -> bool {
        self.data.len() + batch <= Self::CAPACITY
    }
}

impl StructuredObject for PresentationTextData {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::new(sf_type::DATA, category::PRESENTATION_TEXT);
        field.put(&self.data);
        field.write_to(out)
    }
}

/// Presentation text object (BPT ... EPT).
#[derive(Debug)]
pub struct PresentationTextObject {
    name: [u8; 8],
    data: Vec<PresentationTextData>,
    font: Option<u8>,
    rotation: Option<Rotation>,
}

impl PresentationTextObject {
    pub fn new(name: &str) -> Self {
        Self { name: ebcdic::encode_name(name), data: Vec::new(), font: None, rotation: None }
    }

    /// Appends a batch of control sequences, opening a new data record when
    /// the current one cannot take the whole batch.
    pub fn add_control_sequences(&mut self, batch: ControlSequences) -> Result<(), AfpError> {
        if batch.is_empty() {
            return Ok(());
        }
        if batch.len() > PresentationTextData::CAPACITY {
            return Err(AfpError::ValueOutOfRange {
                field: "presentation text batch",
                value: batch.len() as i64,
                max: PresentationTextData::CAPACITY as i64,
            });
        }
        let needs_record = self.data.last().is_none_or(|current| !current.fits(batch.len()));
        if needs_record {
            trace!("Opening presentation text data record {}", self.data.len() + 1);
            self.data.push(PresentationTextData::default());
        }
        if let Some(current) = self.data.last_mut() {
            current.data.extend(batch.into_bytes());
        }
        Ok(())
    }

    // Emits orientation and font changes only; the new state is committed
    // once the batch has been accepted.
    fn orientation_and_font(&self, batch: &mut ControlSequences, rotation: Rotation, font: Option<u8>) {
        if self.rotation != Some(rotation) {
            batch.set_text_orientation(rotation);
        }
        if let Some(reference) = font {
            if self.font != Some(reference) {
                batch.set_coded_font_local(reference);
            }
        }
    }

    pub fn create_text(&mut self, run: &TextRun<'_>) -> Result<(), AfpError> {
        let encoded = ebcdic::encode(run.text);
        let mut slabs = encoded.chunks(TEXT_SLAB);

        let mut batch = ControlSequences::new();
        self.orientation_and_font(&mut batch, run.rotation, Some(run.font_reference));
        batch.absolute_move_inline(run.x)?.absolute_move_baseline(run.y)?;
        if let Some(first) = slabs.next() {
            batch.transparent_data(first);
        }
        self.add_control_sequences(batch)?;
        self.rotation = Some(run.rotation);
        self.font = Some(run.font_reference);

        // The current position carries over, so the rest needs no move.
        for slab in slabs {
            let mut batch = ControlSequences::new();
            batch.transparent_data(slab);
            self.add_control_sequences(batch)?;
        }
        Ok(())
    }

    /// Draws a rule. Lines with equal x coordinates run along the baseline
    /// direction, everything else along the inline direction.
    pub fn create_line(&mut self, rule: &Rule) -> Result<(), AfpError> {
        let mut batch = ControlSequences::new();
        self.orientation_and_font(&mut batch, rule.rotation, None);
        batch.absolute_move_inline(rule.x1)?.absolute_move_baseline(rule.y1)?;
        if rule.x1 == rule.x2 {
            batch.draw_baseline_rule(rule.y2 - rule.y1, rule.thickness)?;
        } else {
            batch.draw_inline_rule(rule.x2 - rule.x1, rule.thickness)?;
        }
        self.add_control_sequences(batch)?;
        self.rotation = Some(rule.rotation);
        Ok(())
    }

    pub fn data_records(&self) -> &[PresentationTextData] {
        &self.data
    }
}

impl StructuredObject for PresentationTextObject {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::BEGIN, category::PRESENTATION_TEXT, &self.name).write_to(out)
    }

    fn write_content(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        serialize_all(&mut self.data, out)
    }

    fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::END, category::PRESENTATION_TEXT, &self.name).write_to(out)
    }
}
