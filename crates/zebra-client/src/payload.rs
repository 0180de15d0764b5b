//! Image payload returned by the rendering service.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::ZebraError;

/// What the service handed back in the `image` field.
///
/// The service normally answers with SVG markup, but some symbologies
/// come back pre-rastered as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPayload {
    /// SVG markup text.
    Markup(String),
    /// Decoded raster bytes (PNG or similar).
    Bytes(Vec<u8>),
}

impl RenderPayload {
    /// Classify a non-empty `image` field value.
    ///
    /// A `data:image/...;base64,` prefix marks a raster payload; the
    /// base64 tail is decoded here. Anything else is taken as markup
    /// verbatim.
    pub fn from_image_field(image: &str) -> Result<Self, ZebraError> {
        if let Some(encoded) = data_uri_base64(image) {
            let bytes = BASE64.decode(encoded.trim())?;
            return Ok(Self::Bytes(bytes));
        }
        Ok(Self::Markup(image.to_string()))
    }
}

fn data_uri_base64(image: &str) -> Option<&str> {
    let rest = image.strip_prefix("data:image/")?;
    let (_, tail) = rest.split_once(";base64,")?;
    Some(tail)
}
