//! Scene model for the design canvas.
//!
//! Defines the node/paint vocabulary the generate workflow draws with,
//! the [`CanvasDocument`] trait that stands in for the host's document
//! API, and an in-memory implementation that doubles as the default
//! document and the test fake. The host's real font engine and
//! rasterizer are out of scope; the in-memory document substitutes
//! deterministic approximations for both.

pub mod document;
pub mod markup;
pub mod memory;
pub mod node;
pub mod raster;
pub mod text;

pub use document::CanvasDocument;
pub use memory::InMemoryCanvas;
pub use node::{
    Color, ImageHash, NodeId, NodeKind, Paint, ScaleMode, TextAlign, TextStyle, VerticalAlign,
};

/// Unified error type for canvas operations.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node {0} is not a frame")]
    NotAFrame(NodeId),

    #[error("node {0} is not a text node")]
    NotAText(NodeId),

    #[error("node {0} has no exportable content")]
    NotExportable(NodeId),

    #[error("unknown image hash: {0}")]
    UnknownImage(String),

    #[error("invalid markup: {0}")]
    InvalidMarkup(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
