//! Retained in-memory draw surface.
//!
//! `Scene` stores elements in an arena, keeps attributes in insertion order
//! (so serialized output is stable), and dispatches pointer events to the
//! handlers registered on each element.

use std::fmt;

use super::surface::{DrawSurface, ElementKind, NodeId, PointerEvent, PointerEventKind, PointerHandler};

struct Node {
    kind: ElementKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    text: Option<String>,
    handlers: Vec<(PointerEventKind, PointerHandler)>,
}

impl Node {
    fn new(kind: ElementKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            attrs: Vec::new(),
            styles: Vec::new(),
            text: None,
            handlers: Vec::new(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("attrs", &self.attrs)
            .field("styles", &self.styles)
            .field("text", &self.text)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// A page with an empty chart container, ready to be drawn on.
#[derive(Debug)]
pub struct Scene {
    nodes: Vec<Node>,
    page: NodeId,
    container: NodeId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let page = NodeId(0);
        let container = NodeId(1);
        let mut body = Node::new(ElementKind::Page, None);
        body.children.push(container);
        let mut chart = Node::new(ElementKind::Div, Some(page));
        chart.attrs.push(("id".to_string(), "container".to_string()));

        Self {
            nodes: vec![body, chart],
            page,
            container,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, node: NodeId) -> Option<ElementKind> {
        self.nodes.get(node.0).map(|n| n.kind)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        lookup(&self.nodes.get(node.0)?.attrs, name)
    }

    /// Numeric attribute, if present and parseable.
    pub fn attr_f64(&self, node: NodeId, name: &str) -> Option<f64> {
        self.attr(node, name)?.parse().ok()
    }

    pub fn attrs(&self, node: NodeId) -> &[(String, String)] {
        self.nodes.get(node.0).map(|n| n.attrs.as_slice()).unwrap_or(&[])
    }

    pub fn style(&self, node: NodeId, name: &str) -> Option<&str> {
        lookup(&self.nodes.get(node.0)?.styles, name)
    }

    pub fn styles(&self, node: NodeId) -> &[(String, String)] {
        self.nodes.get(node.0).map(|n| n.styles.as_slice()).unwrap_or(&[])
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0)?.text.as_deref()
    }

    /// Whether an element is shown: it exists and its opacity is not zero.
    pub fn is_visible(&self, node: NodeId) -> bool {
        if node.0 >= self.nodes.len() {
            return false;
        }
        match self.style(node, "opacity") {
            Some(v) => v.parse::<f64>().map(|o| o > 0.0).unwrap_or(true),
            None => true,
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.page)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    /// All elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.page)
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// `node` and everything below it, depth-first in document order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if n.0 >= self.nodes.len() {
                continue;
            }
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Run every handler `node` registered for `event.kind`.
    ///
    /// Returns how many handlers ran.
    pub fn dispatch(&mut self, node: NodeId, event: &PointerEvent) -> usize {
        let handlers: Vec<PointerHandler> = match self.nodes.get(node.0) {
            Some(n) => n
                .handlers
                .iter()
                .filter(|(k, _)| *k == event.kind)
                .map(|(_, h)| h.clone())
                .collect(),
            None => return 0,
        };

        for handler in &handlers {
            let surface: &mut dyn DrawSurface = &mut *self;
            handler(surface, event);
        }
        handlers.len()
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node.0)
    }
}

impl DrawSurface for Scene {
    fn container(&self) -> NodeId {
        self.container
    }

    fn page(&self) -> NodeId {
        self.page
    }

    fn append(&mut self, parent: NodeId, kind: ElementKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        // Unknown parents fall back to the page so the element is still reachable.
        let parent = if parent.0 < self.nodes.len() { parent } else { self.page };
        self.nodes.push(Node::new(kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: String) {
        if let Some(n) = self.node_mut(node) {
            upsert(&mut n.attrs, name, value);
        }
    }

    fn set_style(&mut self, node: NodeId, name: &str, value: String) {
        if let Some(n) = self.node_mut(node) {
            upsert(&mut n.styles, name, value);
        }
    }

    fn set_text(&mut self, node: NodeId, text: String) {
        if let Some(n) = self.node_mut(node) {
            n.text = Some(text);
        }
    }

    fn on_pointer(&mut self, node: NodeId, kind: PointerEventKind, handler: PointerHandler) {
        if let Some(n) = self.node_mut(node) {
            n.handlers.push((kind, handler));
        }
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: String) {
    match pairs.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value,
        None => pairs.push((name.to_string(), value)),
    }
}
