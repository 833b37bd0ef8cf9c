use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;

use crate::{
    application::handlers::sms_dispatcher::DispatchConfig,
    infrastructure::messaging::twilio::TwilioConfig,
};

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    /// Without credentials messages go to the dry-run provider.
    pub twilio: Option<TwilioConfig>,
    /// Without a database the in-memory repositories are used.
    pub database_url: Option<String>,
    pub dispatch: DispatchConfig,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        Self::from_lookup(|name| var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, &'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let twilio = match lookup("TWILIO_ACCOUNT_SID") {
            Some(account_sid) => Some(TwilioConfig::new(
                account_sid,
                lookup("TWILIO_AUTH_TOKEN")
                    .ok_or("An error occured while getting TWILIO_AUTH_TOKEN env param")?,
                lookup("TWILIO_MESSAGING_SERVICE_SID").ok_or(
                    "An error occured while getting TWILIO_MESSAGING_SERVICE_SID env param",
                )?,
            )),
            None => None,
        };

        let defaults = DispatchConfig::default();
        let dispatch = DispatchConfig {
            max_retry_attempts: match lookup("SMS_MAX_RETRY_ATTEMPTS") {
                Some(value) => value
                    .parse::<u32>()
                    .map_err(|_| "An error occured while parsing SMS_MAX_RETRY_ATTEMPTS env param")?,
                None => defaults.max_retry_attempts,
            },
            payload_limit: match lookup("SMS_PAYLOAD_LIMIT") {
                Some(value) => value
                    .parse::<usize>()
                    .map_err(|_| "An error occured while parsing SMS_PAYLOAD_LIMIT env param")?,
                None => defaults.payload_limit,
            },
            backoff_base: match lookup("SMS_BACKOFF_BASE_MS") {
                Some(value) => Duration::from_millis(
                    value
                        .parse::<u64>()
                        .map_err(|_| "An error occured while parsing SMS_BACKOFF_BASE_MS env param")?,
                ),
                None => defaults.backoff_base,
            },
        };

        Ok(Config {
            port: lookup("PORT")
                .ok_or("An error occured while getting PORT env param")?
                .parse::<u16>()
                .map_err(|_| "An error occured while parsing PORT env param")?,
            scheme: lookup("SCHEME").ok_or("An error occured while getting SCHEME env param")?,
            host: lookup("HOST").ok_or("An error occured while getting HOST env param")?,
            twilio,
            database_url: lookup("DATABASE_URL"),
            dispatch,
        })
    }
}
