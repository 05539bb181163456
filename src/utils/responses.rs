//! HTTP response handling
//!
//! One place for every response shape the gateway emits: a machine-readable
//! `error` code plus a human `message`, never a stack trace. The handful of
//! fixed error bodies are serialized once at startup and reused.

use actix_web::{http::header, HttpResponse};
use serde_json::{json, Value};

/// Pre-serialized bodies for the common error responses
static CACHED_RESPONSES: std::sync::LazyLock<CachedResponses> =
    std::sync::LazyLock::new(CachedResponses::new);

struct CachedResponses {
    invalid_request: String,
    unauthorized_partner: String,
    server_error: String,
}

impl CachedResponses {
    fn new() -> Self {
        Self {
            invalid_request: Self::create_json(
                "invalid_request",
                "Required parameters are missing from the request",
            ),
            unauthorized_partner: Self::create_json(
                "unauthorized_partner",
                "The partner key and site identity pairing is not registered",
            ),
            server_error: Self::create_json("server_error", "An internal server error occurred"),
        }
    }

    fn create_json(error: &str, message: &str) -> String {
        let body = json!({
            "error": error,
            "message": message
        });
        serde_json::to_string(&body).expect("Failed to serialize JSON")
    }

    fn invalid_request(&self) -> HttpResponse {
        HttpResponse::BadRequest()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(self.invalid_request.clone())
    }

    fn unauthorized_partner(&self) -> HttpResponse {
        HttpResponse::Unauthorized()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(self.unauthorized_partner.clone())
    }

    fn server_error(&self) -> HttpResponse {
        HttpResponse::InternalServerError()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(self.server_error.clone())
    }
}

/// Unified response builder for the partner-facing surface
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a `BadRequest` (400) error response with optional customization
    #[must_use]
    pub fn bad_request() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::BadRequest)
    }

    /// Create an `Unauthorized` (401) error response with optional customization
    #[must_use]
    pub fn unauthorized() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::Unauthorized)
    }

    /// Create an `InternalServerError` (500) error response with optional customization
    #[must_use]
    pub fn internal_server_error() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::InternalServerError)
    }

    /// Create an OK (200) JSON response
    #[must_use]
    pub fn ok<T: serde::Serialize>(data: &T) -> HttpResponse {
        HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .json(data)
    }

    /// Common validation error: missing or blank field
    #[must_use]
    pub fn missing_field(field_name: &str) -> HttpResponse {
        Self::bad_request()
            .with_error_code("invalid_request")
            .with_message(&format!("Missing required field: {field_name}"))
            .build()
    }

    /// Cached unauthorized-partner response
    #[must_use]
    pub fn unauthorized_partner() -> HttpResponse {
        CACHED_RESPONSES.unauthorized_partner()
    }
}

/// Builder for error responses with fluent interface
pub struct ErrorResponseBuilder {
    error_type: ErrorType,
    error_code: Option<String>,
    message: Option<String>,
}

#[derive(Clone, Copy)]
enum ErrorType {
    BadRequest,
    Unauthorized,
    InternalServerError,
}

impl ErrorResponseBuilder {
    fn new(error_type: ErrorType) -> Self {
        Self {
            error_type,
            error_code: None,
            message: None,
        }
    }

    /// Set a custom error code (e.g., "`invalid_request`")
    #[must_use]
    pub fn with_error_code(mut self, code: &str) -> Self {
        self.error_code = Some(code.to_string());
        self
    }

    /// Set a custom error message
    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Build the final `HttpResponse`
    #[must_use]
    pub fn build(self) -> HttpResponse {
        if self.error_code.is_none() && self.message.is_none() {
            return match self.error_type {
                ErrorType::BadRequest => CACHED_RESPONSES.invalid_request(),
                ErrorType::Unauthorized => CACHED_RESPONSES.unauthorized_partner(),
                ErrorType::InternalServerError => CACHED_RESPONSES.server_error(),
            };
        }

        let mut body = json!({});
        body["error"] = Value::String(
            self.error_code
                .unwrap_or_else(|| self.error_type.default_code().to_string()),
        );
        body["message"] = Value::String(
            self.message
                .unwrap_or_else(|| self.error_type.default_message().to_string()),
        );

        let mut response = match self.error_type {
            ErrorType::BadRequest => HttpResponse::BadRequest(),
            ErrorType::Unauthorized => HttpResponse::Unauthorized(),
            ErrorType::InternalServerError => HttpResponse::InternalServerError(),
        };
        response
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .json(body)
    }
}

impl ErrorType {
    fn default_code(self) -> &'static str {
        match self {
            Self::BadRequest => "invalid_request",
            Self::Unauthorized => "unauthorized_partner",
            Self::InternalServerError => "server_error",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request is malformed or invalid",
            Self::Unauthorized => "The partner key and site identity pairing is not registered",
            Self::InternalServerError => "An internal server error occurred",
        }
    }
}
