use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::journey::JourneyType;

/// Identifier the SMS provider assigns to an accepted message (a Twilio `sid`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProviderMessageId(pub String);

impl ProviderMessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderMessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Journeys opened for every account sharing a phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationJourneys {
    pub phone_number: String,
    pub journey_type: JourneyType,
    pub campaign_name: Option<String>,
    pub journey_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Communication {
    pub id: Uuid,
    pub journey_id: Uuid,
    pub provider_message_id: ProviderMessageId,
    pub created_at: DateTime<Utc>,
}
