use std::sync::Arc;

use tracing::{error, info};

use crate::{
    application::handlers::sms_dispatcher::SmsDispatchHandler,
    domain::{
        errors::DispatchError,
        models::{DispatchBatch, DispatchSummary},
        segments::count_messages_and_segments,
    },
};

pub struct EnqueueMessagesRequest {
    pub campaign_name: Option<String>,
    pub batch: DispatchBatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueMessagesResponse {
    pub planned: DispatchSummary,
    pub sent: DispatchSummary,
}

pub struct EnqueueMessagesUseCase {
    handler: Arc<SmsDispatchHandler>,
}

impl EnqueueMessagesUseCase {
    pub fn new(handler: Arc<SmsDispatchHandler>) -> Self {
        Self { handler }
    }

    /// Dispatches the batch and waits for every retry pass to finish.
    pub async fn execute(
        &self,
        request: EnqueueMessagesRequest,
    ) -> Result<EnqueueMessagesResponse, DispatchError> {
        let (batch, planned) = self.prepare(request)?;
        let sent = self.handler.dispatch(batch).await?;
        log_finished(planned, sent);
        Ok(EnqueueMessagesResponse { planned, sent })
    }

    /// Validates the batch, then dispatches it on a background task and
    /// returns the planned counts without waiting for the retry schedule.
    pub fn enqueue(
        self: &Arc<Self>,
        request: EnqueueMessagesRequest,
    ) -> Result<DispatchSummary, DispatchError> {
        let (batch, planned) = self.prepare(request)?;
        let usecase = Arc::clone(self);
        tokio::spawn(async move {
            match usecase.handler.dispatch(batch).await {
                Ok(sent) => log_finished(planned, sent),
                Err(err) => error!(error = %err, "background dispatch failed"),
            }
        });
        Ok(planned)
    }

    fn prepare(
        &self,
        mut request: EnqueueMessagesRequest,
    ) -> Result<(DispatchBatch, DispatchSummary), DispatchError> {
        self.handler.check_payload(&request.batch)?;

        // A request-level campaign fills in messages that did not name one.
        if let Some(campaign_name) = request.campaign_name.as_deref() {
            for message in request
                .batch
                .iter_mut()
                .flat_map(|entry| entry.messages.iter_mut())
            {
                if message.campaign_name.is_none() {
                    message.campaign_name = Some(campaign_name.to_string());
                }
            }
        }

        let planned = count_messages_and_segments(&request.batch);
        info!(
            recipients = request.batch.len(),
            messages = planned.messages,
            segments = planned.segments,
            "enqueueing messages"
        );

        Ok((request.batch, planned))
    }
}

fn log_finished(planned: DispatchSummary, sent: DispatchSummary) {
    info!(
        messages = sent.messages,
        segments = sent.segments,
        dropped = planned.messages.saturating_sub(sent.messages),
        "enqueue messages finished"
    );
}
