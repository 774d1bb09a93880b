//! Security headers middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Security header settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeaders {
    /// Add Strict-Transport-Security. Only behind TLS termination.
    pub hsts: bool,
}

/// Adds `X-Content-Type-Options`, `X-Frame-Options` and
/// `Referrer-Policy` to every response, plus HSTS when enabled.
pub async fn security_headers_middleware(
    State(settings): State<SecurityHeaders>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );

    if settings.hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}
