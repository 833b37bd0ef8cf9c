use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::ProviderMessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendSmsErrorKind {
    TooManyRequests,
    InvalidPhoneNumber,
    /// Retrying cannot help (bad credentials, misconfigured sender).
    NonRetriable,
    Other,
}

impl fmt::Display for SendSmsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SendSmsErrorKind::TooManyRequests => "too many requests",
            SendSmsErrorKind::InvalidPhoneNumber => "invalid phone number",
            SendSmsErrorKind::NonRetriable => "non-retriable",
            SendSmsErrorKind::Other => "unclassified",
        };
        f.write_str(label)
    }
}

/// A provider rejection, classified so the dispatcher can decide between
/// retrying, flagging the number, aborting or dropping the message.
#[derive(Debug, Clone, Error)]
#[error("sendSMS error {code} ({kind}) for {phone_number}: {message}")]
pub struct SendSmsError {
    pub kind: SendSmsErrorKind,
    pub phone_number: String,
    pub code: String,
    pub message: String,
}

impl SendSmsError {
    pub fn new(
        kind: SendSmsErrorKind,
        phone_number: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            phone_number: phone_number.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Hands one body to the provider. Per-call timeouts are the provider's
    /// responsibility.
    async fn send_message(
        &self,
        body: &str,
        phone_number: &str,
    ) -> Result<ProviderMessageId, SendSmsError>;
}
