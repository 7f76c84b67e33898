//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to load configuration: {reason}")]
    Load { reason: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Run parameter errors. Raised before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid iteration count '{input}': expected a positive integer")]
    InvalidIterationCount { input: String },

    #[error("Referral code must not be empty")]
    EmptyReferralCode,
}

/// Key material and key-pair persistence errors
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Invalid private key: {reason}")]
    InvalidKey { reason: String },

    #[error("Failed to persist wallet to '{path}': {reason}")]
    Persist { path: String, reason: String },
}

/// Network and HTTP-related errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Request timeout after {timeout_ms}ms to {endpoint}")]
    Timeout { timeout_ms: u64, endpoint: String },

    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Malformed response (HTTP {status}) from {endpoint}: {body}")]
    MalformedResponse {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Invalid proxy '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },

    #[error("Failed to build HTTP client: {reason}")]
    ClientBuild { reason: String },
}

/// Session acquisition failures. Terminal for the iteration that hit them.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Max retries reached ({attempts}): invalid timestamp")]
    MaxRetries { attempts: u32 },

    #[error("Signature rejected: {message}")]
    Rejected { code: Option<String>, message: String },

    #[error("Signature endpoint returned non-JSON body: {body}")]
    Malformed { body: String },

    #[error(transparent)]
    Transport(NetworkError),

    #[error(transparent)]
    Signing(WalletError),
}

impl From<NetworkError> for AuthError {
    fn from(e: NetworkError) -> Self {
        AuthError::Transport(e)
    }
}

impl From<WalletError> for AuthError {
    fn from(e: WalletError) -> Self {
        AuthError::Signing(e)
    }
}
