use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    models::{Communication, CommunicationJourneys, JourneyType, ProviderMessageId},
    repositories::{CommunicationRepository, PhoneNumberRepository},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JourneyKey {
    phone_number: String,
    journey_type: JourneyType,
    campaign_name: Option<String>,
}

#[derive(Default)]
pub struct InMemoryCommunicationRepository {
    journeys: Arc<RwLock<HashMap<JourneyKey, (Uuid, DateTime<Utc>)>>>,
    communications: Arc<RwLock<Vec<Communication>>>,
}

impl InMemoryCommunicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn communications(&self) -> Vec<Communication> {
        self.communications.read().await.clone()
    }

    pub async fn journey_count(&self) -> usize {
        self.journeys.read().await.len()
    }
}

#[async_trait]
impl CommunicationRepository for InMemoryCommunicationRepository {
    async fn create_communication_journeys(
        &self,
        phone_number: &str,
        journey_type: JourneyType,
        campaign_name: Option<&str>,
    ) -> anyhow::Result<CommunicationJourneys> {
        let key = JourneyKey {
            phone_number: phone_number.to_string(),
            journey_type,
            campaign_name: campaign_name.map(str::to_string),
        };

        // one journey per phone/type/campaign, reused on later sends
        let mut journeys = self.journeys.write().await;
        let (journey_id, _) = *journeys
            .entry(key)
            .or_insert_with(|| (Uuid::new_v4(), Utc::now()));

        Ok(CommunicationJourneys {
            phone_number: phone_number.to_string(),
            journey_type,
            campaign_name: campaign_name.map(str::to_string),
            journey_ids: vec![journey_id],
        })
    }

    async fn create_communication(
        &self,
        journeys: &CommunicationJourneys,
        provider_message_id: &ProviderMessageId,
    ) -> anyhow::Result<()> {
        let now = Utc::now();
        let mut communications = self.communications.write().await;
        for journey_id in &journeys.journey_ids {
            communications.push(Communication {
                id: Uuid::new_v4(),
                journey_id: *journey_id,
                provider_message_id: provider_message_id.clone(),
                created_at: now,
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPhoneNumberRepository {
    flagged: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<Vec<String>>>>,
}

impl InMemoryPhoneNumberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_flagged(&self, phone_number: &str) -> bool {
        self.flagged.read().await.contains(phone_number)
    }

    /// Arguments of every flagging call, in call order.
    pub async fn flag_calls(&self) -> Vec<Vec<String>> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl PhoneNumberRepository for InMemoryPhoneNumberRepository {
    async fn flag_invalid_phone_numbers(&self, phone_numbers: &[String]) -> anyhow::Result<()> {
        self.calls.write().await.push(phone_numbers.to_vec());
        let mut flagged = self.flagged.write().await;
        flagged.extend(phone_numbers.iter().cloned());
        Ok(())
    }
}
