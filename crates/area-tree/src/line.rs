use crate::inline::InlineArea;
use log::trace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineAlignment {
    #[default]
    Start,
    Center,
    End,
    Justify,
}

/// What layout left over on a line: the unused inline space and how far
/// the adjustable spaces may stretch or shrink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdjust {
    pub alignment: LineAlignment,
    /// Available width minus content width; negative when overfull.
    pub difference: i32,
    pub available_stretch: i32,
    pub available_shrink: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineArea {
    pub ipd: i32,
    pub bpd: i32,
    pub start_indent: i32,
    pub inlines: Vec<InlineArea>,
    adjust: Option<LineAdjust>,
}

impl LineArea {
    pub fn new(ipd: i32, bpd: i32) -> Self {
        Self { ipd, bpd, ..Self::default() }
    }

    pub fn add_inline(&mut self, inline: InlineArea) {
        self.inlines.push(inline);
    }

    pub fn set_adjust(&mut self, adjust: LineAdjust) {
        self.adjust = Some(adjust);
    }

    pub fn content_ipd(&self) -> i32 {
        self.inlines.iter().map(InlineArea::ipd).sum()
    }

    /// Applies the line's alignment. Start, center and end move the line's
    /// start indent; justify spreads the difference over the adjustable
    /// spaces, limited by the available stretch or shrink.
    pub fn finalise(&mut self) {
        let Some(adjust) = self.adjust.take() else {
            return;
        };
        match adjust.alignment {
            LineAlignment::Start => {}
            LineAlignment::Center => self.start_indent += adjust.difference / 2,
            LineAlignment::End => self.start_indent += adjust.difference,
            LineAlignment::Justify => self.justify(&adjust),
        }
    }

    fn justify(&mut self, adjust: &LineAdjust) {
        let amount = adjust
            .difference
            .clamp(-adjust.available_shrink.max(0), adjust.available_stretch.max(0));
        let spaces = self
            .inlines
            .iter()
            .filter(|inline| matches!(inline, InlineArea::Space { adjustable: true, .. }))
            .count() as i32;
        if spaces == 0 || amount == 0 {
            return;
        }
        trace!("Justifying line: {} mpt over {} spaces", amount, spaces);
        let share = amount / spaces;
        let mut remainder = amount % spaces;
        for inline in &mut self.inlines {
            if let InlineArea::Space { ipd, adjustable: true } = inline {
                *ipd += share + remainder.signum();
                remainder -= remainder.signum();
            }
        }
    }
}
