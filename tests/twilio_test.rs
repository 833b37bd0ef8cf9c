//! Twilio client against a local stand-in for the Messages API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use poem::{
    IntoResponse, Request, Response, Route, Server, handler,
    http::StatusCode,
    listener::TcpAcceptor,
    post,
    web::{Form, Json},
};
use serde_json::json;

use sms_dispatch::{
    application::services::sms::{SendSmsErrorKind, SmsProvider},
    infrastructure::messaging::twilio::{TwilioClient, TwilioConfig},
};

const ACCEPTED: &str = "+15550000001";
const LANDLINE: &str = "+15550000002";
const OVERLOADED: &str = "+15550000003";
const THROTTLED: &str = "+15550000004";

#[handler]
fn messages(req: &Request, Form(form): Form<HashMap<String, String>>) -> Response {
    let authorized = req
        .header("authorization")
        .is_some_and(|value| value.starts_with("Basic "));
    if !authorized || form.get("MessagingServiceSid").map(String::as_str) != Some("MG456") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 20003, "message": "Authenticate" })),
        )
            .into_response();
    }

    match form.get("To").map(String::as_str) {
        Some(ACCEPTED) => (
            StatusCode::CREATED,
            Json(json!({ "sid": "SM123", "body": form.get("Body") })),
        )
            .into_response(),
        Some(LANDLINE) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "code": 21407,
                "message": "This Phone Number type does not support SMS or MMS"
            })),
        )
            .into_response(),
        Some(OVERLOADED) => (StatusCode::SERVICE_UNAVAILABLE, "busy").into_response(),
        Some(THROTTLED) => StatusCode::TOO_MANY_REQUESTS.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_messages_api() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Route::new()
        .at("/2010-04-01/Accounts/AC123/Messages.json", post(messages));
    let acceptor = TcpAcceptor::from_tokio(listener)?;
    tokio::spawn(Server::new_with_acceptor(acceptor).run(app));
    Ok(format!("http://{addr}"))
}

fn client(base_url: String) -> Result<Arc<dyn SmsProvider>> {
    let mut config = TwilioConfig::new("AC123".into(), "secret".into(), "MG456".into());
    config.base_url = base_url;
    config.timeout = Duration::from_secs(5);
    TwilioClient::new(config)
}

#[tokio::test]
async fn accepted_message_returns_its_sid() -> Result<()> {
    let twilio = client(spawn_messages_api().await?)?;

    let id = twilio.send_message("Hi", ACCEPTED).await?;

    assert_eq!(id.as_str(), "SM123");
    Ok(())
}

#[tokio::test]
async fn error_body_code_drives_the_classification() -> Result<()> {
    let twilio = client(spawn_messages_api().await?)?;

    let err = twilio.send_message("Hi", LANDLINE).await.unwrap_err();

    assert_eq!(err.kind, SendSmsErrorKind::InvalidPhoneNumber);
    assert_eq!(err.phone_number, LANDLINE);
    assert_eq!(err.code, "21407");
    assert!(err.message.contains("does not support SMS"));
    Ok(())
}

#[tokio::test]
async fn unreadable_error_body_falls_back_to_the_status() -> Result<()> {
    let twilio = client(spawn_messages_api().await?)?;

    let unavailable = twilio.send_message("Hi", OVERLOADED).await.unwrap_err();
    assert_eq!(unavailable.kind, SendSmsErrorKind::Other);
    assert_eq!(unavailable.code, "503");
    assert_eq!(unavailable.message, "Service Unavailable");

    let throttled = twilio.send_message("Hi", THROTTLED).await.unwrap_err();
    assert_eq!(throttled.kind, SendSmsErrorKind::TooManyRequests);
    assert_eq!(throttled.code, "429");
    Ok(())
}

#[tokio::test]
async fn rejected_credentials_are_non_retriable() -> Result<()> {
    let base_url = spawn_messages_api().await?;
    let mut config = TwilioConfig::new("AC123".into(), "secret".into(), "MG000".into());
    config.base_url = base_url;
    let twilio = TwilioClient::new(config)?;

    let err = twilio.send_message("Hi", ACCEPTED).await.unwrap_err();

    assert_eq!(err.kind, SendSmsErrorKind::NonRetriable);
    assert_eq!(err.code, "20003");
    Ok(())
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() -> Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    let twilio = client(format!("http://{addr}"))?;

    let err = twilio.send_message("Hi", ACCEPTED).await.unwrap_err();

    assert_eq!(err.kind, SendSmsErrorKind::Other);
    assert_eq!(err.code, "transport");
    Ok(())
}
