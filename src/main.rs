use std::io::Error;
use std::sync::Arc;

use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use sqlx::postgres::PgPoolOptions;
use tokio::main;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sms_dispatch::{
    application::{
        handlers::sms_dispatcher::SmsDispatchHandler,
        services::{error_reporter::TracingErrorReporter, sleeper::TokioSleeper, sms::SmsProvider},
        usecases::{
            enqueue_messages::EnqueueMessagesUseCase, estimate_messages::EstimateMessagesUseCase,
        },
    },
    config::Config,
    domain::repositories::{CommunicationRepository, PhoneNumberRepository},
    infrastructure::{
        messaging::{dry_run::DryRunSmsProvider, twilio::TwilioClient},
        repositories::{
            in_memory::{InMemoryCommunicationRepository, InMemoryPhoneNumberRepository},
            postgres::{PostgresCommunicationRepository, PostgresPhoneNumberRepository, ensure_schema},
        },
    },
    presentation::http::endpoints::{
        health::HealthEndpoints,
        root::ApiState,
        sms::SmsEndpoints,
    },
};

#[main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(Error::other)?;

    let config = Config::try_parse().map_err(Error::other)?;

    let provider: Arc<dyn SmsProvider> = match config.twilio.clone() {
        Some(twilio) => TwilioClient::new(twilio).map_err(Error::other)?,
        None => {
            info!("twilio credentials not set, using dry-run sms provider");
            DryRunSmsProvider::new()
        }
    };

    let (communications, phone_numbers): (
        Arc<dyn CommunicationRepository>,
        Arc<dyn PhoneNumberRepository>,
    ) = match config.database_url.as_deref() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .map_err(Error::other)?;
            ensure_schema(&pool).await.map_err(Error::other)?;
            let communications: Arc<dyn CommunicationRepository> =
                PostgresCommunicationRepository::new(pool.clone());
            let phone_numbers: Arc<dyn PhoneNumberRepository> =
                PostgresPhoneNumberRepository::new(pool);
            (communications, phone_numbers)
        }
        None => {
            info!("DATABASE_URL not set, communications are kept in memory");
            let communications: Arc<dyn CommunicationRepository> =
                Arc::new(InMemoryCommunicationRepository::new());
            let phone_numbers: Arc<dyn PhoneNumberRepository> =
                Arc::new(InMemoryPhoneNumberRepository::new());
            (communications, phone_numbers)
        }
    };

    let handler = Arc::new(SmsDispatchHandler::new(
        provider,
        communications,
        phone_numbers,
        Arc::new(TracingErrorReporter),
        Arc::new(TokioSleeper),
        config.dispatch,
    ));

    let state = Arc::new(ApiState {
        enqueue_messages_usecase: Arc::new(EnqueueMessagesUseCase::new(handler)),
        estimate_messages_usecase: Arc::new(EstimateMessagesUseCase::new()),
    });

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);

    info!(%server_url, "starting server");

    let api_service = OpenApiService::new(
        (HealthEndpoints, SmsEndpoints::new(state)),
        "SMS Dispatch API",
        "0.1.0",
    )
    .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    Server::new(TcpListener::bind(format!("0.0.0.0:{}", config.port)))
        .run(app)
        .await
}
