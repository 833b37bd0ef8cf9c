use poem_openapi::{ApiResponse, Object, payload::Json};

#[derive(Object, Debug, PartialEq, Eq)]
pub struct MessageSummaryDto {
    pub messages: u64,
    pub segments: u64,
}

#[derive(Object, Debug)]
pub struct EnqueueMessagesResponseDto {
    pub planned: MessageSummaryDto,
    pub sent: MessageSummaryDto,
}

#[derive(ApiResponse)]
pub enum EnqueueAcceptedResponse {
    /// Batch accepted; dispatch continues in the background.
    #[oai(status = 202)]
    Accepted(Json<MessageSummaryDto>),
}
