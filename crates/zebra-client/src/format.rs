//! Barcode symbology catalogue.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Symbologies the rendering service accepts.
///
/// The serde wire names double as the `type` query parameter value sent
/// to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    #[serde(rename = "QR_CODE")]
    QrCode,
    #[serde(rename = "CODE-128")]
    Code128,
    #[serde(rename = "CODE-39")]
    Code39,
    #[serde(rename = "EAN-13")]
    Ean13,
    #[serde(rename = "EAN-8")]
    Ean8,
    #[serde(rename = "UPC-A")]
    UpcA,
    #[serde(rename = "ITF")]
    Itf,
    #[serde(rename = "DATA-MATRIX")]
    DataMatrix,
    #[serde(rename = "PDF-417")]
    Pdf417,
}

impl BarcodeFormat {
    /// The `type` query parameter value for this symbology.
    pub fn as_wire_code(&self) -> &'static str {
        match self {
            Self::QrCode => "QR_CODE",
            Self::Code128 => "CODE-128",
            Self::Code39 => "CODE-39",
            Self::Ean13 => "EAN-13",
            Self::Ean8 => "EAN-8",
            Self::UpcA => "UPC-A",
            Self::Itf => "ITF",
            Self::DataMatrix => "DATA-MATRIX",
            Self::Pdf417 => "PDF-417",
        }
    }

    /// Human-readable name used for frame titles and caption labels.
    ///
    /// Hyphens fold to spaces, so `CODE-128` reads "CODE 128";
    /// underscores stay, so `QR_CODE` reads "QR_CODE".
    pub fn display_name(&self) -> String {
        self.as_wire_code().replace('-', " ")
    }

    /// QR codes get the square two-dimensional layout; everything else
    /// is treated as a one-dimensional strip.
    pub fn is_qr(&self) -> bool {
        matches!(self, Self::QrCode)
    }

    pub const ALL: &'static [BarcodeFormat] = &[
        Self::QrCode,
        Self::Code128,
        Self::Code39,
        Self::Ean13,
        Self::Ean8,
        Self::UpcA,
        Self::Itf,
        Self::DataMatrix,
        Self::Pdf417,
    ];
}

impl FromStr for BarcodeFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_wire_code() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

impl std::fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_code())
    }
}

/// Returned when a wire code does not match any known symbology.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown barcode format: {0}")]
pub struct UnknownFormat(pub String);
