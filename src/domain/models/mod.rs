pub mod communication;
pub mod journey;
pub mod message;
pub mod summary;

pub use communication::{Communication, CommunicationJourneys, ProviderMessageId};
pub use journey::JourneyType;
pub use message::{DispatchBatch, PayloadMessage, RecipientEntry};
pub use summary::DispatchSummary;
