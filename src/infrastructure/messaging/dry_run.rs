use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::services::sms::{SendSmsError, SmsProvider},
    domain::{models::ProviderMessageId, segments::count_segments},
};

/// Accepts every message without contacting a provider.
#[derive(Default)]
pub struct DryRunSmsProvider;

impl DryRunSmsProvider {
    pub fn new() -> Arc<dyn SmsProvider> {
        Arc::new(Self) as Arc<dyn SmsProvider>
    }
}

#[async_trait]
impl SmsProvider for DryRunSmsProvider {
    async fn send_message(
        &self,
        body: &str,
        phone_number: &str,
    ) -> Result<ProviderMessageId, SendSmsError> {
        let sid = format!("DRY{}", Uuid::new_v4().simple());
        info!(
            %phone_number,
            segments = count_segments(body),
            %sid,
            "[dry-run] sending sms"
        );
        Ok(ProviderMessageId(sid))
    }
}
