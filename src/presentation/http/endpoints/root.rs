use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::usecases::{
    enqueue_messages::EnqueueMessagesUseCase, estimate_messages::EstimateMessagesUseCase,
};

#[derive(Clone)]
pub struct ApiState {
    pub enqueue_messages_usecase: Arc<EnqueueMessagesUseCase>,
    pub estimate_messages_usecase: Arc<EstimateMessagesUseCase>,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Sms,
}
