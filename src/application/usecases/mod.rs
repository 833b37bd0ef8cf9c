pub mod enqueue_messages;
pub mod estimate_messages;
