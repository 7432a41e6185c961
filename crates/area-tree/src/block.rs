use crate::line::LineArea;
use folio_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub width: i32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockChild {
    Block(Block),
    Line(LineArea),
}

/// A block area. Children stack in the block-progression direction;
/// `x_offset` and `y_offset` place the block inside its parent's content
/// rectangle (space-before lands in `y_offset`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub x_offset: i32,
    pub y_offset: i32,
    pub ipd: i32,
    pub bpd: i32,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub children: Vec<BlockChild>,
}

impl Block {
    pub fn new(ipd: i32) -> Self {
        Self { ipd, ..Self::default() }
    }

    /// Appends a child block, growing this block's height.
    pub fn add_block(&mut self, block: Block) {
        self.bpd += block.y_offset + block.bpd;
        self.children.push(BlockChild::Block(block));
    }

    /// Appends a line, growing this block's height.
    pub fn add_line(&mut self, line: LineArea) {
        self.bpd += line.bpd;
        self.children.push(BlockChild::Line(line));
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
