#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sms_dispatch::{
    application::{
        handlers::sms_dispatcher::{DispatchConfig, SmsDispatchHandler},
        services::{
            error_reporter::{ErrorContext, ErrorReporter},
            sleeper::Sleeper,
            sms::{SendSmsError, SendSmsErrorKind, SmsProvider},
        },
    },
    domain::{
        models::{CommunicationJourneys, JourneyType, PayloadMessage, ProviderMessageId, RecipientEntry},
        repositories::{CommunicationRepository, PhoneNumberRepository},
    },
    infrastructure::repositories::in_memory::{
        InMemoryCommunicationRepository, InMemoryPhoneNumberRepository,
    },
};

pub const PHONE: &str = "+15551234567";
pub const OTHER_PHONE: &str = "+15557654321";

type Script =
    dyn Fn(&str, &str, usize) -> Result<ProviderMessageId, SendSmsError> + Send + Sync;

/// Provider whose answer is computed from the body, the phone number and how
/// many times that number was already tried.
pub struct ScriptedSmsProvider {
    script: Box<Script>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedSmsProvider {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&str, &str, usize) -> Result<ProviderMessageId, SendSmsError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn accepting() -> Arc<Self> {
        Self::new(|_, _, n| Ok(sid(n)))
    }

    /// (phone number, body) of every send, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, phone_number: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(phone, _)| phone == phone_number)
            .count()
    }
}

#[async_trait]
impl SmsProvider for ScriptedSmsProvider {
    async fn send_message(
        &self,
        body: &str,
        phone_number: &str,
    ) -> Result<ProviderMessageId, SendSmsError> {
        let previous = {
            let mut calls = self.calls.lock().unwrap();
            let previous = calls.iter().filter(|(phone, _)| phone == phone_number).count();
            calls.push((phone_number.to_string(), body.to_string()));
            previous
        };
        (self.script)(body, phone_number, previous)
    }
}

pub fn sid(n: usize) -> ProviderMessageId {
    ProviderMessageId(format!("SM{n:032}"))
}

pub fn rate_limited(phone_number: &str) -> SendSmsError {
    SendSmsError::new(SendSmsErrorKind::TooManyRequests, phone_number, "20429", "Too Many Requests")
}

pub fn invalid_number(phone_number: &str) -> SendSmsError {
    SendSmsError::new(
        SendSmsErrorKind::InvalidPhoneNumber,
        phone_number,
        "21211",
        "Invalid 'To' Phone Number",
    )
}

pub fn non_retriable(phone_number: &str) -> SendSmsError {
    SendSmsError::new(SendSmsErrorKind::NonRetriable, phone_number, "20003", "Authenticate")
}

pub fn unclassified(phone_number: &str) -> SendSmsError {
    SendSmsError::new(SendSmsErrorKind::Other, phone_number, "30001", "Queue overflow")
}

#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits_ms(&self) -> Vec<u64> {
        self.waits
            .lock()
            .unwrap()
            .iter()
            .map(|wait| wait.as_millis() as u64)
            .collect()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
pub struct RecordingErrorReporter {
    reports: Mutex<Vec<(String, ErrorContext)>>,
}

impl RecordingErrorReporter {
    pub fn reports(&self) -> Vec<(String, ErrorContext)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingErrorReporter {
    fn report(&self, message: String, context: ErrorContext) {
        self.reports.lock().unwrap().push((message, context));
    }
}

pub struct FailingCommunicationRepository;

#[async_trait]
impl CommunicationRepository for FailingCommunicationRepository {
    async fn create_communication_journeys(
        &self,
        _phone_number: &str,
        _journey_type: JourneyType,
        _campaign_name: Option<&str>,
    ) -> anyhow::Result<CommunicationJourneys> {
        anyhow::bail!("database unavailable")
    }

    async fn create_communication(
        &self,
        _journeys: &CommunicationJourneys,
        _provider_message_id: &ProviderMessageId,
    ) -> anyhow::Result<()> {
        anyhow::bail!("database unavailable")
    }
}

pub struct FailingPhoneNumberRepository;

#[async_trait]
impl PhoneNumberRepository for FailingPhoneNumberRepository {
    async fn flag_invalid_phone_numbers(&self, _phone_numbers: &[String]) -> anyhow::Result<()> {
        anyhow::bail!("database unavailable")
    }
}

pub struct Harness {
    pub handler: SmsDispatchHandler,
    pub provider: Arc<ScriptedSmsProvider>,
    pub communications: Arc<InMemoryCommunicationRepository>,
    pub phone_numbers: Arc<InMemoryPhoneNumberRepository>,
    pub reporter: Arc<RecordingErrorReporter>,
    pub sleeper: Arc<RecordingSleeper>,
}

impl Harness {
    pub fn new(provider: Arc<ScriptedSmsProvider>) -> Self {
        Self::with_config(provider, DispatchConfig::default())
    }

    pub fn with_config(provider: Arc<ScriptedSmsProvider>, config: DispatchConfig) -> Self {
        let communications = Arc::new(InMemoryCommunicationRepository::new());
        let phone_numbers = Arc::new(InMemoryPhoneNumberRepository::new());
        let reporter = Arc::new(RecordingErrorReporter::default());
        let sleeper = Arc::new(RecordingSleeper::default());

        let handler = SmsDispatchHandler::new(
            provider.clone(),
            communications.clone(),
            phone_numbers.clone(),
            reporter.clone(),
            sleeper.clone(),
            config,
        );

        Self {
            handler,
            provider,
            communications,
            phone_numbers,
            reporter,
            sleeper,
        }
    }
}

pub fn message(body: &str) -> PayloadMessage {
    PayloadMessage::new(body, JourneyType::BulkSms)
}

pub fn entry(phone_number: &str, bodies: &[&str]) -> RecipientEntry {
    RecipientEntry::new(phone_number, bodies.iter().map(|body| message(body)).collect())
}
