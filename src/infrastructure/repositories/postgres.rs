use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::domain::{
    models::{CommunicationJourneys, JourneyType, ProviderMessageId},
    repositories::{CommunicationRepository, PhoneNumberRepository},
};

pub type PgPool = Pool<Postgres>;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS user_communication_journey (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        journey_type TEXT NOT NULL,
        campaign_name TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, journey_type, campaign_name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_communication (
        id UUID PRIMARY KEY,
        user_communication_journey_id UUID NOT NULL REFERENCES user_communication_journey (id),
        message_id TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sms_invalid_phone_number (
        phone_number TEXT PRIMARY KEY,
        flagged_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

/// Creates the dispatch tables if they are missing. The `users` table with a
/// `phone_number` and `has_valid_phone_number` column is owned elsewhere.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct PostgresCommunicationRepository {
    pool: PgPool,
}

impl PostgresCommunicationRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl CommunicationRepository for PostgresCommunicationRepository {
    async fn create_communication_journeys(
        &self,
        phone_number: &str,
        journey_type: JourneyType,
        campaign_name: Option<&str>,
    ) -> anyhow::Result<CommunicationJourneys> {
        // every account registered with the number gets its own journey
        let journey_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO user_communication_journey (id, user_id, journey_type, campaign_name)
            SELECT gen_random_uuid(), u.id, $2, $3
            FROM users u
            WHERE u.phone_number = $1
            ON CONFLICT (user_id, journey_type, campaign_name) DO UPDATE
            SET journey_type = EXCLUDED.journey_type
            RETURNING id
            "#,
        )
        .bind(phone_number)
        .bind(journey_type.as_str())
        .bind(campaign_name.unwrap_or_default())
        .fetch_all(&self.pool)
        .await?;

        Ok(CommunicationJourneys {
            phone_number: phone_number.to_string(),
            journey_type,
            campaign_name: campaign_name.map(str::to_string),
            journey_ids,
        })
    }

    async fn create_communication(
        &self,
        journeys: &CommunicationJourneys,
        provider_message_id: &ProviderMessageId,
    ) -> anyhow::Result<()> {
        if journeys.journey_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO user_communication (id, user_communication_journey_id, message_id)
            SELECT gen_random_uuid(), journey_id, $2
            FROM UNNEST($1::uuid[]) AS journey_id
            "#,
        )
        .bind(&journeys.journey_ids)
        .bind(provider_message_id.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresPhoneNumberRepository {
    pool: PgPool,
}

impl PostgresPhoneNumberRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl PhoneNumberRepository for PostgresPhoneNumberRepository {
    async fn flag_invalid_phone_numbers(&self, phone_numbers: &[String]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sms_invalid_phone_number (phone_number)
            SELECT DISTINCT UNNEST($1::text[])
            ON CONFLICT (phone_number) DO UPDATE
            SET flagged_at = now()
            "#,
        )
        .bind(phone_numbers)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET has_valid_phone_number = false
            WHERE phone_number = ANY($1)
            "#,
        )
        .bind(phone_numbers)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
