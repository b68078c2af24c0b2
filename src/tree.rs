use crate::listeners::ListenerRegistry;
use crate::trace::TraceState;

/// Opaque handle to a node (or the window) of an [`EventTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The contract the dispatch engine needs from a tree implementation.
///
/// The engine only ever asks for a node's structural parent, whether a node is
/// the document root, and the window owned by that root. Each node owns its
/// listener registry; the tree hands it out through `registry` and
/// `registry_mut`.
///
/// Implementations must keep the parent chain acyclic. The engine does not
/// detect cycles.
pub trait EventTree: Sized {
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn is_document(&self, node: NodeId) -> bool;

    /// Window associated with a document root. Only consulted for nodes where
    /// `is_document` is true.
    fn default_view(&self, node: NodeId) -> Option<NodeId>;

    fn registry(&self, node: NodeId) -> Option<&ListenerRegistry<Self>>;

    fn registry_mut(&mut self, node: NodeId) -> Option<&mut ListenerRegistry<Self>>;

    fn node_label(&self, node: NodeId) -> String {
        format!("node-{}", node.0)
    }

    fn trace_state(&self) -> Option<&TraceState> {
        None
    }

    fn trace_state_mut(&mut self) -> Option<&mut TraceState> {
        None
    }
}
