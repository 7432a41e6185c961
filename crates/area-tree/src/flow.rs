use crate::block::Block;
use serde::{Deserialize, Serialize};

/// One column of a span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalFlow {
    pub ipd: i32,
    /// Height taken up by the blocks added so far.
    pub allocated_bpd: i32,
    pub blocks: Vec<Block>,
}

impl NormalFlow {
    pub fn new(ipd: i32) -> Self {
        Self { ipd, ..Self::default() }
    }

    pub fn add_block(&mut self, block: Block) {
        self.allocated_bpd += block.y_offset + block.bpd;
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
