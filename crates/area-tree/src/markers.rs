//! Marker bookkeeping for `retrieve-marker`.
//!
//! A page keeps these maps keyed by marker class name:
//! - first starting within the page
//! - carried over from the previous page (first including carry-over falls
//!   back to first starting)
//! - last starting within the page
//! - last ending within the page (with a fall back to any last marker)

use crate::block::Block;
use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub class_name: String,
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievePosition {
    FirstStartingWithinPage,
    FirstIncludingCarryover,
    LastStartingWithinPage,
    LastEndingWithinPage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    first_start: IndexMap<String, Marker>,
    first_carryover: IndexMap<String, Marker>,
    last_start: IndexMap<String, Marker>,
    last_end: IndexMap<String, Marker>,
    last_any: IndexMap<String, Marker>,
}

impl Markers {
    /// Records the markers of an area that starts (`starting`) or ends on
    /// this page. `is_first` / `is_last` tell whether the area is the first
    /// or last of its formatting object.
    pub fn add(&mut self, marks: &[Marker], starting: bool, is_first: bool, is_last: bool) {
        if starting {
            if is_first {
                for mark in marks {
                    self.first_start.entry(mark.class_name.clone()).or_insert_with(|| mark.clone());
                    self.last_start.insert(mark.class_name.clone(), mark.clone());
                }
            } else {
                for mark in marks {
                    self.first_carryover.entry(mark.class_name.clone()).or_insert_with(|| mark.clone());
                }
            }
        } else {
            for mark in marks {
                if is_last {
                    self.last_end.insert(mark.class_name.clone(), mark.clone());
                }
                self.last_any.insert(mark.class_name.clone(), mark.clone());
            }
        }
    }

    pub fn get(&self, class_name: &str, position: RetrievePosition) -> Option<&Marker> {
        let found = match position {
            RetrievePosition::FirstStartingWithinPage => {
                self.first_start.get(class_name).or_else(|| self.first_carryover.get(class_name))
            }
            RetrievePosition::FirstIncludingCarryover => {
                self.first_carryover.get(class_name).or_else(|| self.first_start.get(class_name))
            }
            RetrievePosition::LastStartingWithinPage => {
                self.last_start.get(class_name).or_else(|| self.last_any.get(class_name))
            }
            RetrievePosition::LastEndingWithinPage => {
                self.last_end.get(class_name).or_else(|| self.last_any.get(class_name))
            }
        };
        trace!("Marker '{}' at {:?}: {}", class_name, position, if found.is_some() { "found" } else { "none" });
        found
    }

    pub fn is_empty(&self) -> bool {
        self.first_start.is_empty() && self.first_carryover.is_empty() && self.last_any.is_empty()
    }
}
