//! Common test utilities for integration tests.
//!
//! Tests drive the full router against the in-memory store and a recording
//! mock dispatcher, so no database or mail relay is needed.

// Helpers are shared by several test binaries; not every binary uses all of them.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::{TimeZone, Utc};
use domain::models::MeetingMode;
use domain::services::{InMemoryRegistrationStore, InviteDispatcher, MockInviteDispatcher};
use meeting_invite_api::app::create_app;
use meeting_invite_api::config::{
    Config, DatabaseConfig, EmailConfig, LoggingConfig, MeetingConfig, SecurityConfig,
    ServerConfig,
};

/// Test configuration with the in-memory store and a fixed meeting.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            static_dir: None,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
            query_timeout_secs: 5,
            allow_in_memory: true,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        email: EmailConfig {
            sender_email: "invites@example.com".to_string(),
            sender_name: "Kinetics Team".to_string(),
            send_timeout_secs: 5,
            ..EmailConfig::default()
        },
        meeting: MeetingConfig {
            mode: MeetingMode::Fixed,
            title: "Kinetics session".to_string(),
            description: "Quarterly review".to_string(),
            start: Utc.with_ymd_and_hms(2025, 8, 25, 23, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 8, 26, 0, 0, 0).unwrap(),
            join_url: "https://meet.example.com/abc-defg-hij".to_string(),
            dial_in: Some("+52 55 8421 0898 PIN: 496 952 841#".to_string()),
            date_text: Some("Monday, 25 August from 5:00 to 6:00pm".to_string()),
            timezone: Some("America/Mexico_City".to_string()),
            more_phones_url: None,
            location: "Online".to_string(),
            uid_domain: "invites.test".to_string(),
        },
    }
}

/// Router plus handles on its backends.
pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryRegistrationStore>,
    pub dispatcher: Arc<MockInviteDispatcher>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_dispatcher(config, MockInviteDispatcher::new())
    }

    pub fn with_dispatcher(config: Config, dispatcher: MockInviteDispatcher) -> Self {
        let store = Arc::new(InMemoryRegistrationStore::new());
        let dispatcher = Arc::new(dispatcher);
        let app = create_app(config, store.clone(), dispatcher.clone());
        Self {
            app,
            store,
            dispatcher,
        }
    }
}

/// Router with an arbitrary dispatcher, for transports other than the mock.
pub fn create_test_app_with(
    config: Config,
    dispatcher: Arc<dyn InviteDispatcher>,
) -> (Router, Arc<InMemoryRegistrationStore>) {
    let store = Arc::new(InMemoryRegistrationStore::new());
    (create_app(config, store.clone(), dispatcher), store)
}

/// Build a JSON POST request.
pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to read a response body as text.
pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}
