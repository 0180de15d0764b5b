//! Plugin session: state, dispatch, and the host event loop.

use std::time::Duration;

use studio_canvas::{CanvasDocument, NodeId};
use studio_db::Database;
use tokio::sync::mpsc;
use zebra_client::ZebraClient;

use crate::config::{API_KEY_SETTING, SettingType, StudioConfig};
use crate::generate::{GenerateError, GenerateRequest};
use crate::messages::{StateEvent, UiBridge, UiEvent, UiRequest};
use crate::notify::Notifier;
use crate::selection;

/// Events the host shell pushes into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The canvas selection changed.
    SelectionChanged,
    /// The settings UI sent a message.
    Ui(UiRequest),
}

/// One plugin session over an injected canvas document.
///
/// The host guarantees serialized event handling, so the session owns
/// its state without locking. `last_placed` is the explicit reference
/// used to line containers up left to right; it replaces scanning the
/// page children from the end.
pub struct Session<C: CanvasDocument> {
    pub(crate) canvas: C,
    pub(crate) db: Database,
    pub(crate) client: ZebraClient,
    pub(crate) bridge: UiBridge,
    pub(crate) notifier: Notifier,
    pub(crate) config: StudioConfig,
    pub(crate) last_placed: Option<NodeId>,
}

impl<C: CanvasDocument> Session<C> {
    /// Wire a session over the given canvas, returning it together
    /// with the receiving half of the UI channel.
    pub fn new(
        canvas: C,
        db: Database,
        config: StudioConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<UiEvent>), anyhow::Error> {
        let client = ZebraClient::new(&config.endpoint)?;
        let (bridge, rx) = UiBridge::channel();
        let notifier = Notifier::start(
            bridge.clone(),
            Duration::from_millis(config.notice_duration_ms),
        );
        let session = Self {
            canvas,
            db,
            client,
            bridge,
            notifier,
            config,
            last_placed: None,
        };
        Ok((session, rx))
    }

    /// Emit the startup prefill: the stored credential, empty when unset.
    pub fn startup(&self) -> Result<(), anyhow::Error> {
        let key = self.db.get_setting(API_KEY_SETTING)?.unwrap_or_default();
        self.bridge.emit(StateEvent::SavedKey { text: key });
        Ok(())
    }

    /// Drain host events until the channel closes.
    pub async fn run(mut self, mut rx: mpsc::Receiver<HostEvent>) {
        if let Err(e) = self.startup() {
            tracing::error!("Failed to read stored key at startup: {e}");
        }
        while let Some(event) = rx.recv().await {
            match event {
                HostEvent::SelectionChanged => self.selection_changed(),
                HostEvent::Ui(req) => self.handle(req).await,
            }
        }
        tracing::info!("Host event stream closed, session ending");
    }

    /// Push the current selection state to the UI.
    pub fn selection_changed(&self) {
        self.bridge.emit(selection::selection_state(&self.canvas));
    }

    /// Dispatch one UI message.
    pub async fn handle(&mut self, req: UiRequest) {
        match req {
            UiRequest::Generate { text, format } => {
                let result = self.generate(GenerateRequest { text, format }).await;
                self.report(result.map(|_| ()));
            }
            UiRequest::SaveKey { text } => self.save_key(&text),
            UiRequest::ClearKey => self.clear_key(),
        }
    }

    /// Map a generate outcome onto UI traffic.
    ///
    /// `state:finish` goes out exactly once on every path so the UI
    /// can always clear its busy indicator. The no-text case is a
    /// silent state change; every other failure raises a toast.
    fn report(&self, result: Result<(), GenerateError>) {
        match result {
            Ok(()) => {}
            Err(GenerateError::NoTextSelected) => {
                self.bridge.emit(StateEvent::NoTextSelected);
            }
            Err(err) => {
                tracing::warn!("Generate failed: {err}");
                self.notifier.enqueue(err.user_message(), true);
            }
        }
        self.bridge.emit(StateEvent::Finish);
    }

    /// Persist the user's API key.
    pub fn save_key(&mut self, text: &str) {
        match self
            .db
            .set_setting(API_KEY_SETTING, text, SettingType::Secret.as_db_str())
        {
            Ok(()) => {
                self.notifier.enqueue("API key saved", false);
                self.bridge.emit(StateEvent::KeyUpdated);
            }
            Err(e) => {
                tracing::error!("Failed to save API key: {e}");
                self.notifier.enqueue("Failed to save API key", true);
            }
        }
    }

    /// Forget the stored API key; later calls use the bundled one.
    pub fn clear_key(&mut self) {
        match self.db.delete_setting(API_KEY_SETTING) {
            Ok(()) => {
                self.notifier.enqueue("API key cleared", false);
                self.bridge.emit(StateEvent::KeyUpdated);
            }
            Err(e) => {
                tracing::error!("Failed to clear API key: {e}");
                self.notifier.enqueue("Failed to clear API key", true);
            }
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }
}
