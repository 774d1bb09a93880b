use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    InviteComposer, InviteDispatcher, RegistrationService, RegistrationSettings, RegistrationStore,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id, SecurityHeaders,
};
use crate::routes::{health, register, registrations};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
    pub store: Arc<dyn RegistrationStore>,
    pub config: Arc<Config>,
    pub dispatcher_provider: &'static str,
}

/// Wires the registration service from configuration and its two backends.
pub fn build_service(
    config: &Config,
    store: Arc<dyn RegistrationStore>,
    dispatcher: Arc<dyn InviteDispatcher>,
) -> RegistrationService {
    let composer = InviteComposer::new(
        config.email.subject.clone(),
        config.email.sender_name.clone(),
        config.meeting.uid_domain.clone(),
    );
    let settings = RegistrationSettings {
        mode: config.meeting.mode,
        default_meeting: config.meeting.to_meeting(),
        send_timeout: config.send_timeout(),
        store_timeout: config.query_timeout(),
    };
    RegistrationService::new(store, dispatcher, composer, settings)
}

pub fn create_app(
    config: Config,
    store: Arc<dyn RegistrationStore>,
    dispatcher: Arc<dyn InviteDispatcher>,
) -> Router {
    let dispatcher_provider = dispatcher.provider();
    let service = Arc::new(build_service(&config, store.clone(), dispatcher));
    let config = Arc::new(config);

    let state = AppState {
        service,
        store,
        config: config.clone(),
        dispatcher_provider,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (the form may be hosted elsewhere)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/register", post(register::register))
        .route("/registrations", get(registrations::export_registrations))
        .route("/registrations.json", get(registrations::export_json))
        .route("/registrations.csv", get(registrations::export_csv));

    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    let mut router = Router::new().merge(public_routes).merge(api_routes);

    // Hosted registration form and its assets
    if let Some(dir) = config.server.static_dir.as_deref() {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            SecurityHeaders {
                hsts: config.security.hsts_enabled,
            },
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
