use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    application::services::sms::{SendSmsError, SendSmsErrorKind, SmsProvider},
    domain::models::ProviderMessageId,
};

const TOO_MANY_REQUESTS: i64 = 20429;
const AUTHENTICATION_FAILED: i64 = 20003;
const INVALID_PHONE_NUMBER_CODES: [i64; 5] = [21211, 21214, 21217, 21407, 21614];

#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub messaging_service_sid: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl TwilioConfig {
    pub fn new(account_sid: String, auth_token: String, messaging_service_sid: String) -> Self {
        Self {
            account_sid,
            auth_token,
            messaging_service_sid,
            base_url: "https://api.twilio.com".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

pub struct TwilioClient {
    http: Client,
    config: TwilioConfig,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> anyhow::Result<Arc<dyn SmsProvider>> {
        let http = Client::builder()
            .user_agent("sms-dispatch/twilio")
            .timeout(config.timeout)
            .build()?;
        Ok(Arc::new(Self { http, config }) as Arc<dyn SmsProvider>)
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url, self.config.account_sid
        )
    }
}

/// Maps a Twilio error response onto the dispatcher's failure classes.
pub fn classify_error(status: StatusCode, code: Option<i64>) -> SendSmsErrorKind {
    match code {
        Some(TOO_MANY_REQUESTS) => return SendSmsErrorKind::TooManyRequests,
        Some(AUTHENTICATION_FAILED) => return SendSmsErrorKind::NonRetriable,
        Some(code) if INVALID_PHONE_NUMBER_CODES.contains(&code) => {
            return SendSmsErrorKind::InvalidPhoneNumber;
        }
        _ => {}
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => SendSmsErrorKind::TooManyRequests,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SendSmsErrorKind::NonRetriable,
        _ => SendSmsErrorKind::Other,
    }
}

#[async_trait]
impl SmsProvider for TwilioClient {
    async fn send_message(
        &self,
        body: &str,
        phone_number: &str,
    ) -> Result<ProviderMessageId, SendSmsError> {
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", phone_number),
                ("Body", body),
                ("MessagingServiceSid", self.config.messaging_service_sid.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                SendSmsError::new(SendSmsErrorKind::Other, phone_number, "transport", err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let message: TwilioMessage = response.json().await.map_err(|err| {
                SendSmsError::new(SendSmsErrorKind::Other, phone_number, "decode", err.to_string())
            })?;
            return Ok(ProviderMessageId(message.sid));
        }

        let error = response.json::<TwilioError>().await.unwrap_or_default();
        let kind = classify_error(status, error.code);
        Err(SendSmsError::new(
            kind,
            phone_number,
            error
                .code
                .map(|code| code.to_string())
                .unwrap_or_else(|| status.as_u16().to_string()),
            error
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string()),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Default, Deserialize)]
struct TwilioError {
    code: Option<i64>,
    message: Option<String>,
}
