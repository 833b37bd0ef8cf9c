use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Messages and billed segments, either queued with the provider or estimated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchSummary {
    pub segments: u64,
    pub messages: u64,
}

impl DispatchSummary {
    pub fn new(segments: u64, messages: u64) -> Self {
        Self { segments, messages }
    }

    pub fn is_empty(&self) -> bool {
        self.segments == 0 && self.messages == 0
    }
}

impl Add for DispatchSummary {
    type Output = DispatchSummary;

    fn add(self, rhs: Self) -> Self::Output {
        DispatchSummary {
            segments: self.segments + rhs.segments,
            messages: self.messages + rhs.messages,
        }
    }
}

impl AddAssign for DispatchSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.segments += rhs.segments;
        self.messages += rhs.messages;
    }
}
