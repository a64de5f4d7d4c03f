//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{ChatCompletionAdapter, WhisperTranscriptionAdapter},
    config::Config,
    error::ApiError,
    web::{rest, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let completion = Arc::new(ChatCompletionAdapter::new(
        &config.generation_api_key,
        &config.generation_api_base,
        config.generation_model.clone(),
    ));

    // Transcription runs against OpenAI Whisper; the generation provider has
    // no audio endpoint. Without a key the route answers 501.
    let transcription = match config.openai_api_key.as_ref() {
        Some(key) => {
            let openai_config = OpenAIConfig::new().with_api_key(key);
            let openai_client = Client::with_config(openai_config);
            Some(Arc::new(WhisperTranscriptionAdapter::new(
                openai_client,
                config.transcribe_model.clone(),
            )) as Arc<dyn swipelearn_core::ports::TranscriptionService>)
        }
        None => {
            info!("OPENAI_API_KEY not set; the transcription endpoint is disabled.");
            None
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        profile: config.provider_profile(),
        config: config.clone(),
        completion,
        transcription,
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = rest::api_router(app_state)
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
        .layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
