//! Parsing of the remote analysis service's success and failure bodies.

use std::fmt::{Display, Formatter};

use serde::Deserialize;
use serde_json::Value;

use crate::pronunciation::{PronunciationError, Result};
use crate::types::{AnalysisResult, StrictnessLevel};

impl AnalysisResult {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| {
            PronunciationError::new(format!("failed to parse analysis result: {err}"))
        })
    }

    /// Strictness the result was graded with, or the default level.
    pub fn strictness(&self) -> StrictnessLevel {
        self.strictness_level.unwrap_or_default()
    }

    /// Error marker from the detailed breakdown, if the service set one.
    pub fn breakdown_error(&self) -> Option<&str> {
        self.azure_debug
            .as_ref()
            .and_then(|details| details.error.as_deref())
    }
}

/// Classification of a failed analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    RateLimit,
    QuotaExceeded,
    AuthError,
    ServiceError,
    Generic,
}

impl ErrorClass {
    pub fn from_label(label: &str) -> Self {
        match label {
            "rate_limit" => ErrorClass::RateLimit,
            "quota_exceeded" => ErrorClass::QuotaExceeded,
            "auth_error" => ErrorClass::AuthError,
            "service_error" => ErrorClass::ServiceError,
            _ => ErrorClass::Generic,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorClass::RateLimit => "rate_limit",
            ErrorClass::QuotaExceeded => "quota_exceeded",
            ErrorClass::AuthError => "auth_error",
            ErrorClass::ServiceError => "service_error",
            ErrorClass::Generic => "generic",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorClass::RateLimit => "Rate Limit Exceeded",
            ErrorClass::QuotaExceeded => "Quota Exceeded",
            ErrorClass::AuthError => "Authentication Error",
            ErrorClass::ServiceError | ErrorClass::Generic => "Error",
        }
    }

    /// Rate limits clear on their own; the other classes need attention.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorClass::RateLimit)
    }
}

/// Failure reported by the analysis service, as presented to the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub message: String,
    pub class: ErrorClass,
    pub service: Option<String>,
}

#[derive(Deserialize)]
struct StructuredDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_type: String,
    #[serde(default)]
    service: Option<String>,
}

impl ServiceError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            class: ErrorClass::Generic,
            service: None,
        }
    }

    /// Interprets a non-success response body.
    ///
    /// Structured `detail` objects keep their classification; string details
    /// and anything unreadable become generic errors.
    pub fn from_response_body(body: &str) -> Self {
        let detail = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut fields)) => fields.remove("detail"),
            _ => None,
        };
        match detail {
            Some(Value::String(message)) => Self::generic(message),
            Some(value @ Value::Object(_)) => serde_json::from_value::<StructuredDetail>(value)
                .map(|detail| Self {
                    message: detail.message,
                    class: ErrorClass::from_label(&detail.error_type),
                    service: detail.service,
                })
                .unwrap_or_else(|_| Self::generic("Analysis failed")),
            _ => Self::generic("Analysis failed"),
        }
    }

    /// Human-readable name of the originating service.
    pub fn service_name(&self) -> Option<&str> {
        self.service.as_deref().map(|tag| match tag {
            "azure_speech" => "Azure Speech",
            "openai" => "OpenAI",
            other => other,
        })
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.class.title(), self.message)?;
        if let Some(service) = self.service_name() {
            write!(f, " (service: {service})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}
