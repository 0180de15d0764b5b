//! Client library for the hosted barcode rendering service.
//!
//! Provides the symbology catalogue, the authenticated GET call that
//! turns `(text, format)` into an image payload, and the classification
//! of service failures into user-presentable messages.

pub mod client;
pub mod format;
pub mod payload;

pub use client::{RenderResponse, ZebraClient};
pub use format::BarcodeFormat;
pub use payload::RenderPayload;

/// Message shown for any failure the service does not explain itself.
pub const GENERIC_FAILURE: &str = "Oops! Barcode generation failed, please try again later.";

const AUTH_FAILURE: &str = "API Key is invalid or expired";
const QUOTA_FAILURE: &str = "API Request exceeded capacity.";

/// Unified error type for the zebra-client crate.
#[derive(Debug, thiserror::Error)]
pub enum ZebraError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("endpoint has no host: {0}")]
    InvalidEndpoint(String),

    #[error("API key contains characters not valid in a header")]
    InvalidKey,

    #[error("malformed image payload: {0}")]
    BadPayload(#[from] base64::DecodeError),

    #[error("rendering service rejected the API key")]
    KeyRejected,

    #[error("rendering service quota exceeded")]
    QuotaExceeded,

    #[error("rendering service returned no image (status {status})")]
    Failed { status: u16 },
}

impl ZebraError {
    /// The message surfaced to the user for this failure.
    ///
    /// Only the auth and quota rejections get specific wording; every
    /// other failure collapses into the generic retry-later message.
    pub fn user_message(&self) -> &'static str {
        match self {
            ZebraError::KeyRejected => AUTH_FAILURE,
            ZebraError::QuotaExceeded => QUOTA_FAILURE,
            _ => GENERIC_FAILURE,
        }
    }
}
