use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coastal_api::router::create_router;
use coastal_api::{ApiConfig, AppState};
use coastal_engine::{EngineClient, ImageryEngine};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coastal_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    tracing::info!(
        port = config.port,
        engine_url = %config.engine_url,
        project = %config.project,
        poll_interval_secs = config.poll_interval.as_secs(),
        "Starting coastal analysis API server"
    );

    let engine = EngineClient::new(&config.engine_url, &config.project);

    // Fail closed: the session is unusable without an authenticated engine
    if let Err(e) = engine.authenticate().await {
        tracing::error!(error = %e, "Imagery engine authentication failed");
        tracing::error!(
            "Remediation:\n\
            1. Ensure the imagery engine is reachable at {}\n\
            2. Verify the project '{}' exists and your credentials grant access\n\
            3. Set COASTAL_ENGINE_URL / COASTAL_PROJECT to override",
            config.engine_url,
            config.project
        );
        std::process::exit(1);
    }

    tracing::info!(project = %config.project, "Imagery engine authenticated");

    let state = Arc::new(AppState::new(Arc::new(engine), config.poll_interval));

    let cors_origin = match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(_) => {
            tracing::error!(origin = %config.cors_origin, "Invalid COASTAL_CORS_ORIGIN value");
            std::process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind server address");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
