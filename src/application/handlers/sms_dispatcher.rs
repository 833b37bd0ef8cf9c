use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::{
    application::services::{
        error_reporter::{ErrorContext, ErrorReporter},
        sleeper::Sleeper,
        sms::{SendSmsError, SendSmsErrorKind, SmsProvider},
    },
    domain::{
        errors::DispatchError,
        models::{DispatchBatch, DispatchSummary, PayloadMessage, RecipientEntry},
        repositories::{CommunicationRepository, PhoneNumberRepository},
        segments::count_segments,
    },
};

pub const MAX_RETRY_ATTEMPTS: u32 = 5;
pub const PAYLOAD_LIMIT: usize = 10_000;
pub const BACKOFF_BASE: Duration = Duration::from_secs(10);

const REPORT_DOMAIN: &str = "enqueueMessages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    pub max_retry_attempts: u32,
    pub payload_limit: usize,
    pub backoff_base: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: MAX_RETRY_ATTEMPTS,
            payload_limit: PAYLOAD_LIMIT,
            backoff_base: BACKOFF_BASE,
        }
    }
}

impl DispatchConfig {
    /// Wait before the pass that follows `attempt`. Grows linearly.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt.saturating_add(1))
    }
}

/// Result of a single pass over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub sent: DispatchSummary,
    pub invalid_phone_numbers: Vec<String>,
    /// Rate-limited messages grouped by phone number, in first-seen order.
    pub residual: DispatchBatch,
}

enum MessageOutcome {
    Sent { segments: u32 },
    RateLimited { phone_number: String },
    InvalidPhoneNumber { phone_number: String },
    Dropped,
}

#[derive(Default)]
struct RecipientOutcome {
    sent: DispatchSummary,
    rate_limited: Vec<(String, PayloadMessage)>,
    invalid_phone_number: Option<String>,
}

pub struct SmsDispatchHandler {
    provider: Arc<dyn SmsProvider>,
    communications: Arc<dyn CommunicationRepository>,
    phone_numbers: Arc<dyn PhoneNumberRepository>,
    reporter: Arc<dyn ErrorReporter>,
    sleeper: Arc<dyn Sleeper>,
    config: DispatchConfig,
}

impl SmsDispatchHandler {
    pub fn new(
        provider: Arc<dyn SmsProvider>,
        communications: Arc<dyn CommunicationRepository>,
        phone_numbers: Arc<dyn PhoneNumberRepository>,
        reporter: Arc<dyn ErrorReporter>,
        sleeper: Arc<dyn Sleeper>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            provider,
            communications,
            phone_numbers,
            reporter,
            sleeper,
            config,
        }
    }

    /// A non-retriable provider failure is returned as soon as it happens;
    /// sends still in flight for other recipients are abandoned.
    pub async fn dispatch(&self, batch: DispatchBatch) -> Result<DispatchSummary, DispatchError> {
        self.dispatch_from(batch, 0).await
    }

    /// Runs passes starting at `attempt` until nothing is left to retry or
    /// the attempt ceiling is passed. Messages still pending at the ceiling
    /// are dropped.
    pub async fn dispatch_from(
        &self,
        batch: DispatchBatch,
        attempt: u32,
    ) -> Result<DispatchSummary, DispatchError> {
        let mut total = DispatchSummary::default();
        let mut pending = batch;
        let mut attempt = attempt;

        while attempt <= self.config.max_retry_attempts {
            let report = self.run_pass(&pending, attempt).await?;
            total += report.sent;

            if report.residual.is_empty() {
                return Ok(total);
            }

            let wait = self.config.backoff_for(attempt);
            info!(
                attempt = attempt + 1,
                phone_numbers = report.residual.len(),
                wait_ms = wait.as_millis() as u64,
                "failed to send SMS to some phone numbers, attempting again"
            );
            self.sleeper.sleep(wait).await;

            pending = report.residual;
            attempt += 1;
        }

        if !pending.is_empty() {
            let messages: usize = pending.iter().map(|entry| entry.messages.len()).sum();
            warn!(
                attempt,
                phone_numbers = pending.len(),
                messages,
                "retry attempts exhausted, dropping rate limited messages"
            );
        }

        Ok(total)
    }

    pub fn check_payload(&self, batch: &[RecipientEntry]) -> Result<(), DispatchError> {
        if batch.len() > self.config.payload_limit {
            return Err(DispatchError::PayloadLimitExceeded {
                limit: self.config.payload_limit,
                len: batch.len(),
            });
        }
        Ok(())
    }

    async fn run_pass(
        &self,
        batch: &[RecipientEntry],
        attempt: u32,
    ) -> Result<PassReport, DispatchError> {
        self.check_payload(batch)?;

        let outcomes =
            try_join_all(batch.iter().map(|entry| self.send_to_recipient(entry))).await?;

        let mut report = PassReport::default();
        let mut residual_index: HashMap<String, usize> = HashMap::new();

        for outcome in outcomes {
            report.sent += outcome.sent;
            report
                .invalid_phone_numbers
                .extend(outcome.invalid_phone_number);

            for (phone_number, message) in outcome.rate_limited {
                match residual_index.get(&phone_number) {
                    Some(&index) => report.residual[index].messages.push(message),
                    None => {
                        residual_index.insert(phone_number.clone(), report.residual.len());
                        report
                            .residual
                            .push(RecipientEntry::new(phone_number, vec![message]));
                    }
                }
            }
        }

        info!(
            attempt = attempt + 1,
            messages = report.sent.messages,
            segments = report.sent.segments,
            "attempt queued messages"
        );

        if !report.invalid_phone_numbers.is_empty() {
            info!(
                count = report.invalid_phone_numbers.len(),
                "found invalid phone numbers"
            );
            if let Err(err) = self
                .phone_numbers
                .flag_invalid_phone_numbers(&report.invalid_phone_numbers)
                .await
            {
                self.reporter.report(
                    format!("flagInvalidPhoneNumbers error: {err:#}"),
                    ErrorContext::new(REPORT_DOMAIN),
                );
            }
        }

        Ok(report)
    }

    /// Messages for one number go out strictly in order.
    async fn send_to_recipient(
        &self,
        entry: &RecipientEntry,
    ) -> Result<RecipientOutcome, DispatchError> {
        let mut outcome = RecipientOutcome::default();

        for message in &entry.messages {
            match self.send_one(&entry.phone_number, message).await? {
                MessageOutcome::Sent { segments } => {
                    outcome.sent += DispatchSummary::new(u64::from(segments), 1);
                }
                MessageOutcome::RateLimited { phone_number } => {
                    outcome.rate_limited.push((phone_number, message.clone()));
                }
                MessageOutcome::InvalidPhoneNumber { phone_number } => {
                    outcome.invalid_phone_number = Some(phone_number);
                    break;
                }
                MessageOutcome::Dropped => {}
            }
        }

        Ok(outcome)
    }

    async fn send_one(
        &self,
        phone_number: &str,
        message: &PayloadMessage,
    ) -> Result<MessageOutcome, DispatchError> {
        let journeys = match self
            .communications
            .create_communication_journeys(
                phone_number,
                message.journey_type,
                message.campaign_name.as_deref(),
            )
            .await
        {
            Ok(journeys) => journeys,
            Err(err) => {
                self.report_unexpected(phone_number, &err);
                return Ok(MessageOutcome::Dropped);
            }
        };

        let provider_message_id = match self
            .provider
            .send_message(&message.body, phone_number)
            .await
        {
            Ok(id) => id,
            Err(err) => return self.classify(err),
        };

        if let Err(err) = self
            .communications
            .create_communication(&journeys, &provider_message_id)
            .await
        {
            self.report_unexpected(phone_number, &err);
            return Ok(MessageOutcome::Dropped);
        }

        debug!(%provider_message_id, "message queued");

        Ok(MessageOutcome::Sent {
            segments: count_segments(&message.body),
        })
    }

    fn classify(&self, err: SendSmsError) -> Result<MessageOutcome, DispatchError> {
        match err.kind {
            SendSmsErrorKind::TooManyRequests => Ok(MessageOutcome::RateLimited {
                phone_number: err.phone_number,
            }),
            SendSmsErrorKind::InvalidPhoneNumber => Ok(MessageOutcome::InvalidPhoneNumber {
                phone_number: err.phone_number,
            }),
            SendSmsErrorKind::NonRetriable => Err(DispatchError::NonRetriable(err.to_string())),
            SendSmsErrorKind::Other => {
                self.reporter.report(
                    format!("sendSMS Error {}: {}", err.code, err.message),
                    ErrorContext::new(REPORT_DOMAIN)
                        .with_phone_number(err.phone_number)
                        .with_code(err.code),
                );
                Ok(MessageOutcome::Dropped)
            }
        }
    }

    fn report_unexpected(&self, phone_number: &str, err: &anyhow::Error) {
        self.reporter.report(
            format!("sendSMS unexpected Error: {err:#}"),
            ErrorContext::new(REPORT_DOMAIN).with_phone_number(phone_number),
        );
    }
}
