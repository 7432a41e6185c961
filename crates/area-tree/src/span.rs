use crate::error::AreaError;
use crate::flow::NormalFlow;
use serde::{Deserialize, Serialize};

/// A span: a band of the main reference area with one normal flow per
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    column_count: usize,
    column_gap: i32,
    ipd: i32,
    bpd: i32,
    current_flow: usize,
    flows: Vec<NormalFlow>,
}

impl Span {
    /// Creates the span and its flows. Each column is
    /// `(ipd - (columns - 1) * gap) / columns` wide.
    pub fn new(column_count: usize, column_gap: i32, ipd: i32) -> Self {
        let column_count = column_count.max(1);
        let gaps = (column_count as i32 - 1) * column_gap;
        let column_width = (ipd - gaps) / column_count as i32;
        Self {
            column_count,
            column_gap,
            ipd,
            bpd: 0,
            current_flow: 0,
            flows: (0..column_count).map(|_| NormalFlow::new(column_width)).collect(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn column_gap(&self) -> i32 {
        self.column_gap
    }

    pub fn column_width(&self) -> i32 {
        self.flows.first().map_or(0, |flow| flow.ipd)
    }

    pub fn ipd(&self) -> i32 {
        self.ipd
    }

    pub fn height(&self) -> i32 {
        self.bpd
    }

    pub fn normal_flow(&self, column: usize) -> Result<&NormalFlow, AreaError> {
        self.flows
            .get(column)
            .ok_or(AreaError::InvalidColumn { requested: column, available: self.column_count })
    }

    pub fn normal_flow_mut(&mut self, column: usize) -> Result<&mut NormalFlow, AreaError> {
        let available = self.column_count;
        self.flows
            .get_mut(column)
            .ok_or(AreaError::InvalidColumn { requested: column, available })
    }

    pub fn flows(&self) -> &[NormalFlow] {
        &self.flows
    }

    pub fn current_flow_index(&self) -> usize {
        self.current_flow
    }

    pub fn current_flow_mut(&mut self) -> Result<&mut NormalFlow, AreaError> {
        self.normal_flow_mut(self.current_flow)
    }

    pub fn has_more_flows(&self) -> bool {
        self.current_flow + 1 < self.column_count
    }

    pub fn move_to_next_flow(&mut self) -> Result<&mut NormalFlow, AreaError> {
        if !self.has_more_flows() {
            return Err(AreaError::NoMoreFlows);
        }
        self.current_flow += 1;
        self.current_flow_mut()
    }

    /// Sets the span height to its tallest flow.
    pub fn notify_flows_finished(&mut self) {
        self.bpd = self.flows.iter().map(|flow| flow.allocated_bpd).max().unwrap_or(0);
    }

    pub fn is_empty(&self) -> bool {
        self.flows.iter().all(NormalFlow::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    fn block(bpd: i32) -> Block {
        Block { bpd, ..Block::new(1000) }
    }

    #[test]
    fn test_column_width() {
        let span = Span::new(3, 12_000, 468_000);
        assert_eq!(span.column_width(), (468_000 - 2 * 12_000) / 3);
        assert_eq!(span.flows().len(), 3);
    }

    #[test]
    fn test_flow_navigation() {
        let mut span = Span::new(2, 0, 100_000);
        assert!(span.has_more_flows());
        span.move_to_next_flow().unwrap();
        assert_eq!(span.current_flow_index(), 1);
        assert!(matches!(span.move_to_next_flow(), Err(AreaError::NoMoreFlows)));
        assert!(matches!(
            span.normal_flow(2),
            Err(AreaError::InvalidColumn { requested: 2, available: 2 })
        ));
    }

    #[test]
    fn test_height_is_tallest_flow() {
        let mut span = Span::new(2, 0, 100_000);
        assert!(span.is_empty());
        span.current_flow_mut().unwrap().add_block(block(30_000));
        span.move_to_next_flow().unwrap().add_block(block(50_000));
        span.notify_flows_finished();
        assert_eq!(span.height(), 50_000);
        assert!(!span.is_empty());
    }
}
