use crate::{
    domain::models::{DispatchBatch, DispatchSummary, PayloadMessage, RecipientEntry},
    presentation::http::{
        requests::{PayloadMessageDto, RecipientEntryDto},
        responses::MessageSummaryDto,
    },
};

pub fn map_batch(recipients: &[RecipientEntryDto]) -> DispatchBatch {
    recipients.iter().map(map_recipient).collect()
}

fn map_recipient(entry: &RecipientEntryDto) -> RecipientEntry {
    RecipientEntry {
        phone_number: entry.phone_number.clone(),
        messages: entry.messages.iter().map(map_message).collect(),
    }
}

fn map_message(message: &PayloadMessageDto) -> PayloadMessage {
    PayloadMessage {
        body: message.body.clone(),
        journey_type: message.journey_type.into(),
        campaign_name: message.campaign_name.clone(),
    }
}

pub fn map_summary(summary: &DispatchSummary) -> MessageSummaryDto {
    MessageSummaryDto {
        messages: summary.messages,
        segments: summary.segments,
    }
}
