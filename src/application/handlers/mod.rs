pub mod sms_dispatcher;
