pub mod error_reporter;
pub mod sleeper;
pub mod sms;
