use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;

use crate::event::Event;
use crate::tree::NodeId;

pub type ListenerResult = std::result::Result<(), Box<dyn StdError>>;

type Callback<T> = dyn Fn(&mut T, NodeId, &mut Event) -> ListenerResult;

/// A registered handler.
///
/// Clones share the same callback, and two listeners are the same handler
/// only when they share it. Registering one `EventListener` twice yields two
/// independent registrations.
pub struct EventListener<T> {
    callback: Rc<Callback<T>>,
}

impl<T> EventListener<T> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut T, NodeId, &mut Event) -> ListenerResult + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub fn same_handler(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }

    pub(crate) fn call(&self, tree: &mut T, node: NodeId, event: &mut Event) -> ListenerResult {
        (self.callback)(tree, node, event)
    }
}

impl<T> Clone for EventListener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<T> fmt::Debug for EventListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Listeners owned by a single node, indexed by event type.
///
/// Registration order is kept per type. Duplicate registrations are allowed.
pub struct ListenerRegistry<T> {
    map: HashMap<String, Vec<EventListener<T>>>,
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("map", &self.map)
            .finish()
    }
}

impl<T> ListenerRegistry<T> {
    pub fn add(&mut self, event_type: &str, listener: EventListener<T>) {
        self.map
            .entry(event_type.to_string())
            .or_default()
            .push(listener);
    }

    /// Removes the first registration of `listener` for `event_type`.
    pub fn remove(&mut self, event_type: &str, listener: &EventListener<T>) -> bool {
        let Some(listeners) = self.map.get_mut(event_type) else {
            return false;
        };

        if let Some(pos) = listeners
            .iter()
            .position(|registered| registered.same_handler(listener))
        {
            listeners.remove(pos);
            if listeners.is_empty() {
                self.map.remove(event_type);
            }
            return true;
        }

        false
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Copies the listeners currently registered for `event_type`.
    ///
    /// Dispatch invokes the copy, so edits made by the invoked handlers only
    /// take effect on the next pass over this node.
    pub fn snapshot(&self, event_type: &str) -> Vec<EventListener<T>> {
        self.map.get(event_type).cloned().unwrap_or_default()
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.map.get(event_type).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
