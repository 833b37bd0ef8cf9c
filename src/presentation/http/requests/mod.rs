use poem_openapi::Object;

use crate::presentation::models::JourneyTypeKind;

#[derive(Object, Debug)]
pub struct PayloadMessageDto {
    /// May be empty when estimating; sending requires text.
    pub body: String,
    #[oai(default)]
    pub journey_type: JourneyTypeKind,
    pub campaign_name: Option<String>,
}

#[derive(Object, Debug)]
pub struct RecipientEntryDto {
    #[oai(validator(min_length = 1))]
    pub phone_number: String,
    pub messages: Vec<PayloadMessageDto>,
}

#[derive(Object, Debug)]
pub struct EnqueueMessagesRequestDto {
    pub campaign_name: Option<String>,
    pub recipients: Vec<RecipientEntryDto>,
}

#[derive(Object, Debug)]
pub struct EstimateMessagesRequestDto {
    pub recipients: Vec<RecipientEntryDto>,
}
