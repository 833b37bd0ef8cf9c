use crate::domain::{
    models::{DispatchSummary, RecipientEntry},
    segments::count_messages_and_segments,
};

#[derive(Default)]
pub struct EstimateMessagesUseCase;

impl EstimateMessagesUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, batch: &[RecipientEntry]) -> DispatchSummary {
        count_messages_and_segments(batch)
    }
}
