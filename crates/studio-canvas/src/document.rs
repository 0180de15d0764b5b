//! The document handle the orchestrator draws through.

use crate::node::{ImageHash, NodeId, NodeKind, Paint, TextStyle};
use crate::CanvasError;

/// Injected canvas/document handle.
///
/// The host application owns the real scene graph; this trait is the
/// seam the plugin core works against, so tests can substitute the
/// in-memory implementation. Draw order follows append order: a
/// frame's children render in the order they were appended.
pub trait CanvasDocument {
    // -- selection --

    /// Ids of the currently selected nodes, in selection order.
    fn selection(&self) -> Vec<NodeId>;
    fn node_kind(&self, id: NodeId) -> Option<NodeKind>;
    /// Characters of a text node, `None` for other kinds.
    fn text_characters(&self, id: NodeId) -> Option<String>;

    // -- creation --

    fn create_frame(&mut self) -> NodeId;
    fn create_text(&mut self) -> NodeId;
    /// Create a vector node from SVG markup. The node takes its size
    /// from the markup's `width`/`height` attributes, falling back to
    /// the `viewBox`, falling back to the SVG default of 300x150.
    fn create_vector_from_markup(&mut self, svg: &str) -> Result<NodeId, CanvasError>;
    fn create_rectangle(&mut self) -> NodeId;

    // -- mutation --

    fn set_name(&mut self, id: NodeId, name: &str) -> Result<(), CanvasError>;
    fn resize(&mut self, id: NodeId, width: f32, height: f32) -> Result<(), CanvasError>;
    fn set_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), CanvasError>;
    /// Replace a text node's characters; re-runs text measurement.
    fn set_characters(&mut self, id: NodeId, characters: &str) -> Result<(), CanvasError>;
    fn set_text_style(&mut self, id: NodeId, style: TextStyle) -> Result<(), CanvasError>;
    fn set_fills(&mut self, id: NodeId, fills: Vec<Paint>) -> Result<(), CanvasError>;
    fn append_child(&mut self, frame: NodeId, child: NodeId) -> Result<(), CanvasError>;
    /// Append a node as the last top-level child of the current page.
    fn append_to_page(&mut self, id: NodeId) -> Result<(), CanvasError>;
    /// Detach and delete a node and its subtree.
    fn remove(&mut self, id: NodeId) -> Result<(), CanvasError>;

    // -- geometry / inspection --

    fn exists(&self, id: NodeId) -> bool;
    fn size(&self, id: NodeId) -> Option<(f32, f32)>;
    fn position(&self, id: NodeId) -> Option<(f32, f32)>;
    fn name(&self, id: NodeId) -> Option<String>;
    /// Top-level children of the current page, in append order.
    fn page_children(&self) -> Vec<NodeId>;
    /// Children of a frame, in append order.
    fn children(&self, id: NodeId) -> Vec<NodeId>;
    fn fills(&self, id: NodeId) -> Vec<Paint>;

    // -- host services --

    /// Measure text at the given style, returning (width, height).
    fn measure_text(&self, characters: &str, style: &TextStyle) -> (f32, f32);
    /// Export a node as PNG bytes at the given scale factor.
    fn export_png(&self, id: NodeId, scale: f32) -> Result<Vec<u8>, CanvasError>;
    /// Register image bytes for use as a reusable image fill.
    /// Identical bytes always yield the same hash.
    fn register_image(&mut self, bytes: Vec<u8>) -> Result<ImageHash, CanvasError>;
    fn image_bytes(&self, hash: &ImageHash) -> Option<Vec<u8>>;
}
