use serde::Serialize;
use thiserror::Error;

use crate::providers::ProviderId;

#[derive(Error, Debug)]
pub enum BrandCheckError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("The {provider} API key is not configured (set {credential_env})")]
    ProviderNotConfigured {
        provider: ProviderId,
        credential_env: &'static str,
    },

    #[error("{provider} API error: {message}")]
    ProviderInvocation {
        provider: ProviderId,
        status: Option<u16>,
        message: String,
    },

    #[error("Could not parse JSON from model response: {reason}")]
    UnparsableResponse { reason: String, raw: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Coarse classification surfaced to callers (HTTP `kind`, CLI exit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    ProviderNotConfigured,
    ProviderInvocation,
    UnparsableResponse,
    Internal,
}

impl BrandCheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrandCheckError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            BrandCheckError::ProviderNotConfigured { .. } => ErrorKind::ProviderNotConfigured,
            BrandCheckError::ProviderInvocation { .. } => ErrorKind::ProviderInvocation,
            BrandCheckError::UnparsableResponse { .. } => ErrorKind::UnparsableResponse,
            BrandCheckError::ConfigError(_)
            | BrandCheckError::IoError(_)
            | BrandCheckError::SerializationError(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invocation(
        provider: ProviderId,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        BrandCheckError::ProviderInvocation {
            provider,
            status,
            message: message.into(),
        }
    }

    pub(crate) fn unparsable(reason: impl Into<String>, raw: &str) -> Self {
        BrandCheckError::UnparsableResponse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    /// Raw completion text kept for diagnostics, if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            BrandCheckError::UnparsableResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::ProviderNotConfigured => "provider_not_configured",
            ErrorKind::ProviderInvocation => "provider_invocation",
            ErrorKind::UnparsableResponse => "unparsable_response",
            ErrorKind::Internal => "internal",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Internal => 1,
            ErrorKind::InvalidRequest => 2,
            ErrorKind::ProviderNotConfigured => 3,
            ErrorKind::ProviderInvocation => 4,
            ErrorKind::UnparsableResponse => 5,
        }
    }
}
