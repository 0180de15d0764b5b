//! The authenticated GET call against the rendering endpoint.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::format::BarcodeFormat;
use crate::payload::RenderPayload;
use crate::ZebraError;

/// JSON body the service answers with.
#[derive(Debug, Deserialize)]
pub struct RenderResponse {
    pub image: Option<String>,
}

/// Client for the hosted barcode rendering service.
///
/// One instance per endpoint; the host-identifier header is derived
/// from the endpoint URL at construction time.
#[derive(Debug, Clone)]
pub struct ZebraClient {
    http: reqwest::Client,
    endpoint: Url,
    host_header: String,
}

impl ZebraClient {
    pub fn new(endpoint: &str) -> Result<Self, ZebraError> {
        let endpoint = Url::parse(endpoint)?;
        let host_header = endpoint
            .host_str()
            .map(|h| h.to_string())
            .ok_or_else(|| ZebraError::InvalidEndpoint(endpoint.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            host_header,
        })
    }

    /// The host identifier sent with every request.
    pub fn host(&self) -> &str {
        &self.host_header
    }

    /// Build the auth headers for the given API key.
    fn auth_headers(&self, api_key: &str) -> Result<HeaderMap, ZebraError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| ZebraError::InvalidKey)?;
        headers.insert("X-RapidAPI-Key", key);
        headers.insert(
            "X-RapidAPI-Host",
            HeaderValue::from_str(&self.host_header)
                .map_err(|_| ZebraError::InvalidEndpoint(self.host_header.clone()))?,
        );
        Ok(headers)
    }

    /// Fetch the rendered image for `(data, format)`.
    ///
    /// `data` must already be percent-encoded by the caller; the query
    /// string is assembled by hand so the service sees that encoding
    /// unchanged. No caching, no retry: every call re-fetches.
    pub async fn render(
        &self,
        data: &str,
        format: BarcodeFormat,
        api_key: &str,
    ) -> Result<RenderPayload, ZebraError> {
        let url = format!(
            "{}?data={}&type={}",
            self.endpoint,
            data,
            format.as_wire_code()
        );
        let headers = self.auth_headers(api_key)?;

        tracing::debug!(format = %format, "Requesting barcode render");
        let resp = self.http.get(&url).headers(headers).send().await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        let parsed: RenderResponse = serde_json::from_str(&body)?;

        match parsed.image {
            Some(image) if !image.is_empty() => RenderPayload::from_image_field(&image),
            _ => {
                tracing::warn!(status, "Rendering service returned no image");
                Err(classify_failure(status))
            }
        }
    }
}

/// Map a falsy-image outcome onto the failure taxonomy by HTTP status.
fn classify_failure(status: u16) -> ZebraError {
    match status {
        403 => ZebraError::KeyRejected,
        429 => ZebraError::QuotaExceeded,
        other => ZebraError::Failed { status: other },
    }
}
