use serde::{Deserialize, Serialize};

use super::journey::JourneyType;

/// A single outbound SMS body addressed to whichever recipient owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadMessage {
    pub body: String,
    pub journey_type: JourneyType,
    pub campaign_name: Option<String>,
}

impl PayloadMessage {
    pub fn new(body: impl Into<String>, journey_type: JourneyType) -> Self {
        Self {
            body: body.into(),
            journey_type,
            campaign_name: None,
        }
    }

    pub fn with_campaign(mut self, campaign_name: impl Into<String>) -> Self {
        self.campaign_name = Some(campaign_name.into());
        self
    }
}

/// All messages queued for one phone number. The number is passed to the
/// provider verbatim; only the provider decides whether it is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipientEntry {
    pub phone_number: String,
    pub messages: Vec<PayloadMessage>,
}

impl RecipientEntry {
    pub fn new(phone_number: impl Into<String>, messages: Vec<PayloadMessage>) -> Self {
        Self {
            phone_number: phone_number.into(),
            messages,
        }
    }
}

/// Duplicate phone numbers are allowed and processed independently.
pub type DispatchBatch = Vec<RecipientEntry>;
