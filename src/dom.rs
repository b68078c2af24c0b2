use std::collections::HashMap;

use crate::config::{HarnessConfig, LogLevel};
use crate::listeners::ListenerRegistry;
use crate::trace::TraceState;
use crate::tree::{EventTree, NodeId};
use crate::{Error, Result};

#[derive(Debug, Clone)]
enum NodeType {
    Window,
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    attrs: HashMap<String, String>,
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    node_type: NodeType,
    listeners: ListenerRegistry<Dom>,
}

/// Minimal arena tree: one window, one document, and the elements and text
/// nodes created under it.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Node>,
    window: NodeId,
    document: NodeId,
    id_index: HashMap<String, NodeId>,
    trace: TraceState,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            window: NodeId(0),
            document: NodeId(1),
            id_index: HashMap::new(),
            trace: TraceState::default(),
        };
        dom.window = dom.create_node(None, NodeType::Window);
        dom.document = dom.create_node(None, NodeType::Document);
        dom
    }

    pub fn with_config(config: &HarnessConfig) -> Result<Self> {
        let mut dom = Self::new();
        dom.trace = TraceState::from_config(config)?;
        Ok(dom)
    }

    pub fn window(&self) -> NodeId {
        self.window
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Whether `node_id` is a handle this arena issued. Detached and recycled
    /// nodes still count.
    pub fn has_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
            listeners: ListenerRegistry::default(),
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub fn create_element(&mut self, parent: NodeId, tag_name: &str) -> Result<NodeId> {
        self.ensure_container(parent)?;
        Ok(self.create_node(
            Some(parent),
            NodeType::Element(Element {
                tag_name: tag_name.to_ascii_lowercase(),
                attrs: HashMap::new(),
            }),
        ))
    }

    pub fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        self.create_node(
            None,
            NodeType::Element(Element {
                tag_name: tag_name.to_ascii_lowercase(),
                attrs: HashMap::new(),
            }),
        )
    }

    pub fn create_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.ensure_container(parent)?;
        Ok(self.create_node(Some(parent), NodeType::Text(text.to_string())))
    }

    fn node(&self, node_id: NodeId) -> Result<&Node> {
        self.nodes
            .get(node_id.0)
            .ok_or_else(|| Error::InvalidTree(format!("unknown node: {}", node_id.0)))
    }

    fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn ensure_container(&self, node_id: NodeId) -> Result<()> {
        match self.node(node_id)?.node_type {
            NodeType::Document | NodeType::Element(_) => Ok(()),
            NodeType::Window => Err(Error::InvalidTree("window cannot have children".into())),
            NodeType::Text(_) => Err(Error::InvalidTree("text node cannot have children".into())),
        }
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    /// Sets an attribute. For `id`, the last writer owns the index entry; an
    /// earlier holder keeps its attribute but `by_id` no longer finds it.
    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::InvalidTree("attribute target is not an element".into()))?;
        let previous = element.attrs.insert(name.to_string(), value.to_string());

        if name == "id" {
            if let Some(previous) = previous {
                if self.id_index.get(&previous) == Some(&node_id) {
                    self.id_index.remove(&previous);
                }
            }
            self.id_index.insert(value.to_string(), node_id);
        }
        Ok(())
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Text(text) => text.clone(),
            NodeType::Window => String::new(),
            NodeType::Document | NodeType::Element(_) => node
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0).and_then(|node| node.parent)
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Moves `child` under `parent`, detaching it from its previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_container(parent)?;
        match self.node(child)?.node_type {
            NodeType::Window | NodeType::Document => {
                return Err(Error::InvalidTree(
                    "window and document cannot be appended".into(),
                ));
            }
            NodeType::Element(_) | NodeType::Text(_) => {}
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(Error::InvalidTree(
                "append_child would create a cycle".into(),
            ));
        }

        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub fn detach(&mut self, node_id: NodeId) {
        let Some(parent) = self.parent(node_id) else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != node_id);
        self.nodes[node_id.0].parent = None;
    }

    /// Detaches `node_id`, drops every listener registered in its subtree and
    /// removes the subtree's ids from the id index.
    pub fn recycle(&mut self, node_id: NodeId) {
        self.detach(node_id);
        let mut stack = vec![node_id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current.0) else {
                continue;
            };
            node.listeners.clear();
            stack.extend(node.children.iter().copied());
            if let NodeType::Element(element) = &node.node_type {
                if let Some(id) = element.attrs.get("id") {
                    if self.id_index.get(id) == Some(&current) {
                        self.id_index.remove(id);
                    }
                }
            }
        }
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.take_logs()
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.trace.level = level;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace.set_log_limit(max_entries)
    }
}

impl EventTree for Dom {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Dom::parent(self, node)
    }

    fn is_document(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(node.0).map(|node| &node.node_type),
            Some(NodeType::Document)
        )
    }

    fn default_view(&self, node: NodeId) -> Option<NodeId> {
        self.is_document(node).then_some(self.window)
    }

    fn registry(&self, node: NodeId) -> Option<&ListenerRegistry<Self>> {
        self.nodes.get(node.0).map(|node| &node.listeners)
    }

    fn registry_mut(&mut self, node: NodeId) -> Option<&mut ListenerRegistry<Self>> {
        self.nodes.get_mut(node.0).map(|node| &mut node.listeners)
    }

    fn node_label(&self, node: NodeId) -> String {
        let Some(entry) = self.nodes.get(node.0) else {
            return format!("node-{}", node.0);
        };
        match &entry.node_type {
            NodeType::Window => "window".to_string(),
            NodeType::Document => "document".to_string(),
            NodeType::Text(_) => "#text".to_string(),
            NodeType::Element(element) => match element.attrs.get("id") {
                Some(id) if !id.is_empty() => format!("#{id}"),
                _ => element.tag_name.clone(),
            },
        }
    }

    fn trace_state(&self) -> Option<&TraceState> {
        Some(&self.trace)
    }

    fn trace_state_mut(&mut self) -> Option<&mut TraceState> {
        Some(&mut self.trace)
    }
}
