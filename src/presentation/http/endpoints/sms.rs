use std::sync::Arc;

use poem::{Result as PoemResult, http::StatusCode};
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    application::usecases::enqueue_messages::EnqueueMessagesRequest,
    domain::errors::DispatchError,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        mappers::{map_batch, map_summary},
        requests::{EnqueueMessagesRequestDto, EstimateMessagesRequestDto, RecipientEntryDto},
        responses::{EnqueueAcceptedResponse, EnqueueMessagesResponseDto, MessageSummaryDto},
    },
};

#[derive(Clone)]
pub struct SmsEndpoints {
    state: Arc<ApiState>,
}

impl SmsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl SmsEndpoints {
    /// Counts messages and billed segments without sending anything.
    #[oai(path = "/sms/estimate", method = "post", tag = EndpointsTags::Sms)]
    pub async fn estimate(
        &self,
        request: Json<EstimateMessagesRequestDto>,
    ) -> PoemResult<Json<MessageSummaryDto>> {
        let batch = map_batch(&request.recipients);
        let summary = self.state.estimate_messages_usecase.execute(&batch);
        Ok(Json(map_summary(&summary)))
    }

    /// Sends the batch, retrying rate-limited numbers, and returns what was queued.
    ///
    /// Blocks until the retry schedule completes, which with the default
    /// backoff can take several minutes. Use `/sms/enqueue` to return early.
    #[oai(path = "/sms/dispatch", method = "post", tag = EndpointsTags::Sms)]
    pub async fn dispatch(
        &self,
        request: Json<EnqueueMessagesRequestDto>,
    ) -> PoemResult<Json<EnqueueMessagesResponseDto>> {
        ensure_bodies(&request.recipients)?;
        let payload = EnqueueMessagesRequest {
            campaign_name: request.campaign_name.clone(),
            batch: map_batch(&request.recipients),
        };

        let response = self
            .state
            .enqueue_messages_usecase
            .execute(payload)
            .await
            .map_err(dispatch_error)?;

        Ok(Json(EnqueueMessagesResponseDto {
            planned: map_summary(&response.planned),
            sent: map_summary(&response.sent),
        }))
    }

    /// Accepts the batch and dispatches it in the background.
    #[oai(path = "/sms/enqueue", method = "post", tag = EndpointsTags::Sms)]
    pub async fn enqueue(
        &self,
        request: Json<EnqueueMessagesRequestDto>,
    ) -> PoemResult<EnqueueAcceptedResponse> {
        ensure_bodies(&request.recipients)?;
        let payload = EnqueueMessagesRequest {
            campaign_name: request.campaign_name.clone(),
            batch: map_batch(&request.recipients),
        };

        let planned = self
            .state
            .enqueue_messages_usecase
            .enqueue(payload)
            .map_err(dispatch_error)?;

        Ok(EnqueueAcceptedResponse::Accepted(Json(map_summary(&planned))))
    }
}

fn ensure_bodies(recipients: &[RecipientEntryDto]) -> PoemResult<()> {
    let empty = recipients
        .iter()
        .flat_map(|entry| &entry.messages)
        .any(|message| message.body.is_empty());
    if empty {
        return Err(poem::Error::from_string(
            "message body must not be empty",
            StatusCode::BAD_REQUEST,
        ));
    }
    Ok(())
}

fn dispatch_error(err: DispatchError) -> poem::Error {
    let status = match err {
        DispatchError::PayloadLimitExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        DispatchError::NonRetriable(_) => StatusCode::BAD_GATEWAY,
    };
    poem::Error::from_string(err.to_string(), status)
}
