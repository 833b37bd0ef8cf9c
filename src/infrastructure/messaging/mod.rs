pub mod dry_run;
pub mod twilio;
