//! UI message protocol.
//!
//! Inbound messages arrive from the settings UI tagged by `type`;
//! outbound state and notice events travel back the same way over a
//! single unbounded channel.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use zebra_client::BarcodeFormat;

/// Messages the UI sends to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiRequest {
    /// Generate a barcode. `text`, when present, is already
    /// percent-encoded by the UI; when absent the current selection
    /// supplies the text.
    #[serde(rename = "app:generate")]
    Generate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        format: BarcodeFormat,
    },

    /// Persist the user's own API key.
    #[serde(rename = "setting:save")]
    SaveKey { text: String },

    /// Forget the stored API key and fall back to the bundled one.
    #[serde(rename = "setting:clear")]
    ClearKey,
}

/// State updates the core pushes to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StateEvent {
    /// Selection changed; pre-fill (or clear) the text field.
    #[serde(rename = "state:set-text")]
    SetText { text: String },

    /// Generate was asked to use the selection but none was usable.
    #[serde(rename = "state:no-text-selected")]
    NoTextSelected,

    /// A generate call finished, success or not; clear the busy state.
    #[serde(rename = "state:finish")]
    Finish,

    /// Startup prefill of the stored credential (empty when unset).
    #[serde(rename = "state:saved-key")]
    SavedKey { text: String },

    /// The stored credential was saved or cleared.
    #[serde(rename = "state:key-updated")]
    KeyUpdated,
}

/// Transient toast traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NoticeEvent {
    #[serde(rename = "notice:show")]
    Show {
        id: String,
        message: String,
        error: bool,
    },
    #[serde(rename = "notice:dismiss")]
    Dismiss { id: String },
}

/// Everything that flows core → UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UiEvent {
    State(StateEvent),
    Notice(NoticeEvent),
}

/// Clonable sender half of the core → UI channel.
///
/// A closed UI is not an error; failed sends are logged and dropped.
#[derive(Debug, Clone)]
pub struct UiBridge {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl UiBridge {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: StateEvent) {
        if self.tx.send(UiEvent::State(event)).is_err() {
            tracing::warn!("UI channel closed, dropping state event");
        }
    }

    pub fn notice(&self, event: NoticeEvent) {
        if self.tx.send(UiEvent::Notice(event)).is_err() {
            tracing::warn!("UI channel closed, dropping notice");
        }
    }
}
