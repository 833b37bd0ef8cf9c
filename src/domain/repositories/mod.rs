use async_trait::async_trait;

use crate::domain::models::{CommunicationJourneys, JourneyType, ProviderMessageId};

#[async_trait]
pub trait CommunicationRepository: Send + Sync {
    async fn create_communication_journeys(
        &self,
        phone_number: &str,
        journey_type: JourneyType,
        campaign_name: Option<&str>,
    ) -> anyhow::Result<CommunicationJourneys>;

    async fn create_communication(
        &self,
        journeys: &CommunicationJourneys,
        provider_message_id: &ProviderMessageId,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PhoneNumberRepository: Send + Sync {
    /// Marks numbers the provider rejected so future campaigns skip them.
    /// Callers may pass the same number more than once.
    async fn flag_invalid_phone_numbers(&self, phone_numbers: &[String]) -> anyhow::Result<()>;
}
