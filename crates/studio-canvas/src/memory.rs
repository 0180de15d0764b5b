//! In-memory canvas document.
//!
//! Default implementation of [`CanvasDocument`]: a node arena plus a
//! page-level child list, with deterministic text metrics and a
//! rect-subset rasterizer standing in for the host services.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::document::CanvasDocument;
use crate::node::{ImageHash, NodeId, NodeKind, Paint, TextStyle};
use crate::{markup, raster, text, CanvasError};

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    characters: String,
    style: TextStyle,
    fills: Vec<Paint>,
    markup: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, width: f32, height: f32) -> Self {
        Self {
            kind,
            name: String::new(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            characters: String::new(),
            style: TextStyle::default(),
            fills: Vec::new(),
            markup: None,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// In-memory scene graph.
#[derive(Debug, Default)]
pub struct InMemoryCanvas {
    nodes: HashMap<NodeId, Node>,
    page: Vec<NodeId>,
    selection: Vec<NodeId>,
    images: HashMap<ImageHash, Vec<u8>>,
    next_id: u64,
}

impl InMemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection. Host shells drive this from their
    /// selection events; tests drive it directly.
    pub fn set_selection(&mut self, ids: &[NodeId]) {
        self.selection = ids.to_vec();
    }

    /// Convenience for tests and host shells: create a text node on the
    /// page holding the given characters.
    pub fn add_page_text(&mut self, characters: &str) -> NodeId {
        let id = self.create_text();
        // Both operations only fail for missing nodes.
        let _ = self.set_characters(id, characters);
        let _ = self.append_to_page(id);
        id
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, node);
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, CanvasError> {
        self.nodes.get(&id).ok_or(CanvasError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, CanvasError> {
        self.nodes.get_mut(&id).ok_or(CanvasError::NodeNotFound(id))
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.page.retain(|c| *c != id);
    }
}

impl CanvasDocument for InMemoryCanvas {
    fn selection(&self) -> Vec<NodeId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect()
    }

    fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(&id).map(|n| n.kind)
    }

    fn text_characters(&self, id: NodeId) -> Option<String> {
        let node = self.nodes.get(&id)?;
        (node.kind == NodeKind::Text).then(|| node.characters.clone())
    }

    fn create_frame(&mut self) -> NodeId {
        // Hosts default new frames to 100x100.
        self.alloc(Node::new(NodeKind::Frame, 100.0, 100.0))
    }

    fn create_text(&mut self) -> NodeId {
        let style = TextStyle::default();
        let (w, h) = text::measure("", &style);
        self.alloc(Node::new(NodeKind::Text, w, h))
    }

    fn create_vector_from_markup(&mut self, svg: &str) -> Result<NodeId, CanvasError> {
        let (w, h) = markup::markup_size(svg)?;
        let mut node = Node::new(NodeKind::Vector, w, h);
        node.markup = Some(svg.to_string());
        Ok(self.alloc(node))
    }

    fn create_rectangle(&mut self) -> NodeId {
        self.alloc(Node::new(NodeKind::Rectangle, 100.0, 100.0))
    }

    fn set_name(&mut self, id: NodeId, name: &str) -> Result<(), CanvasError> {
        self.node_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn resize(&mut self, id: NodeId, width: f32, height: f32) -> Result<(), CanvasError> {
        let node = self.node_mut(id)?;
        node.width = width;
        node.height = height;
        Ok(())
    }

    fn set_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), CanvasError> {
        let node = self.node_mut(id)?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    fn set_characters(&mut self, id: NodeId, characters: &str) -> Result<(), CanvasError> {
        let node = self.node_mut(id)?;
        if node.kind != NodeKind::Text {
            return Err(CanvasError::NotAText(id));
        }
        node.characters = characters.to_string();
        let (w, h) = text::measure(characters, &node.style);
        node.width = w;
        node.height = h;
        Ok(())
    }

    fn set_text_style(&mut self, id: NodeId, style: TextStyle) -> Result<(), CanvasError> {
        let node = self.node_mut(id)?;
        if node.kind != NodeKind::Text {
            return Err(CanvasError::NotAText(id));
        }
        node.style = style;
        let (w, h) = text::measure(&node.characters, &style);
        node.width = w;
        node.height = h;
        Ok(())
    }

    fn set_fills(&mut self, id: NodeId, fills: Vec<Paint>) -> Result<(), CanvasError> {
        self.node_mut(id)?.fills = fills;
        Ok(())
    }

    fn append_child(&mut self, frame: NodeId, child: NodeId) -> Result<(), CanvasError> {
        if self.node(frame)?.kind != NodeKind::Frame {
            return Err(CanvasError::NotAFrame(frame));
        }
        self.node(child)?;
        self.detach(child);
        self.node_mut(frame)?.children.push(child);
        self.node_mut(child)?.parent = Some(frame);
        Ok(())
    }

    fn append_to_page(&mut self, id: NodeId) -> Result<(), CanvasError> {
        self.node(id)?;
        self.detach(id);
        self.node_mut(id)?.parent = None;
        self.page.push(id);
        Ok(())
    }

    fn remove(&mut self, id: NodeId) -> Result<(), CanvasError> {
        self.node(id)?;
        self.detach(id);
        let children = self
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.remove(child)?;
        }
        self.nodes.remove(&id);
        self.selection.retain(|s| *s != id);
        Ok(())
    }

    fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn size(&self, id: NodeId) -> Option<(f32, f32)> {
        self.nodes.get(&id).map(|n| (n.width, n.height))
    }

    fn position(&self, id: NodeId) -> Option<(f32, f32)> {
        self.nodes.get(&id).map(|n| (n.x, n.y))
    }

    fn name(&self, id: NodeId) -> Option<String> {
        self.nodes.get(&id).map(|n| n.name.clone())
    }

    fn page_children(&self) -> Vec<NodeId> {
        self.page.clone()
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn fills(&self, id: NodeId) -> Vec<Paint> {
        self.nodes
            .get(&id)
            .map(|n| n.fills.clone())
            .unwrap_or_default()
    }

    fn measure_text(&self, characters: &str, style: &TextStyle) -> (f32, f32) {
        text::measure(characters, style)
    }

    fn export_png(&self, id: NodeId, scale: f32) -> Result<Vec<u8>, CanvasError> {
        let node = self.node(id)?;
        let Some(svg) = &node.markup else {
            return Err(CanvasError::NotExportable(id));
        };
        let out_w = (node.width * scale).round() as u32;
        let out_h = (node.height * scale).round() as u32;
        tracing::debug!(%id, out_w, out_h, "Exporting node as PNG");
        raster::render_markup(svg, out_w, out_h)
    }

    fn register_image(&mut self, bytes: Vec<u8>) -> Result<ImageHash, CanvasError> {
        let hash = ImageHash(hex::encode(Sha256::digest(&bytes)));
        self.images.entry(hash.clone()).or_insert(bytes);
        Ok(hash)
    }

    fn image_bytes(&self, hash: &ImageHash) -> Option<Vec<u8>> {
        self.images.get(hash).cloned()
    }
}
