//! Selection watcher.
//!
//! Turns the host's selection-change events into UI text-field state.
//! This path never mutates the canvas and never fails: an unusable
//! selection is a normal state, reported as an empty string.

use studio_canvas::{CanvasDocument, NodeKind};

use crate::messages::StateEvent;

/// Compute the UI state for the current selection.
///
/// Exactly one selected text node yields its characters; anything else
/// (nothing, several nodes, or a non-text node) clears the field.
pub fn selection_state(canvas: &impl CanvasDocument) -> StateEvent {
    let selection = canvas.selection();
    let text = match selection[..] {
        [only] if canvas.node_kind(only) == Some(NodeKind::Text) => {
            canvas.text_characters(only).unwrap_or_default()
        }
        _ => String::new(),
    };
    StateEvent::SetText { text }
}
