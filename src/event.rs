use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::tree::{EventTree, NodeId};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Event,
    Custom,
    Keyboard,
    Mouse,
}

/// One occurrence being delivered through a tree.
///
/// Fields specific to keyboard, mouse and custom events are `None` unless the
/// event kind declares them or an initializer sets them.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub kind: EventKind,
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
    pub cancel_bubble: bool,
    pub default_prevented: bool,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub src_element: Option<NodeId>,
    /// Milliseconds since the Unix epoch at construction.
    pub time_stamp: u64,

    pub detail: Option<Value>,

    pub code: Option<String>,
    pub key: Option<String>,
    pub location: Option<u32>,
    pub repeat: Option<bool>,

    pub screen_x: Option<f64>,
    pub screen_y: Option<f64>,
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
    pub button: Option<i16>,
    pub buttons: Option<u16>,
    pub related_target: Option<NodeId>,

    pub alt_key: Option<bool>,
    pub ctrl_key: Option<bool>,
    pub meta_key: Option<bool>,
    pub shift_key: Option<bool>,

    immediate_propagation_stopped: bool,
}

/// Caller overrides merged over an event's defaults.
///
/// Every `Some` field overwrites the matching event field, whatever the event
/// kind. That includes `event_type`: the constructor argument is still
/// required, but an init may rename the event afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInit {
    pub event_type: Option<String>,
    pub bubbles: Option<bool>,
    pub cancelable: Option<bool>,
    pub composed: Option<bool>,
    pub cancel_bubble: Option<bool>,
    pub default_prevented: Option<bool>,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub src_element: Option<NodeId>,
    pub time_stamp: Option<u64>,
    pub detail: Option<Value>,
    pub code: Option<String>,
    pub key: Option<String>,
    pub location: Option<u32>,
    pub repeat: Option<bool>,
    pub screen_x: Option<f64>,
    pub screen_y: Option<f64>,
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
    pub button: Option<i16>,
    pub buttons: Option<u16>,
    pub related_target: Option<NodeId>,
    pub alt_key: Option<bool>,
    pub ctrl_key: Option<bool>,
    pub meta_key: Option<bool>,
    pub shift_key: Option<bool>,
}

impl Event {
    pub fn new<'a>(event_type: impl Into<Option<&'a str>>) -> Result<Self> {
        Self::construct(EventKind::Event, event_type, None)
    }

    pub fn with_init<'a>(event_type: impl Into<Option<&'a str>>, init: EventInit) -> Result<Self> {
        Self::construct(EventKind::Event, event_type, Some(init))
    }

    pub fn custom<'a>(
        event_type: impl Into<Option<&'a str>>,
        init: Option<EventInit>,
    ) -> Result<Self> {
        Self::construct(EventKind::Custom, event_type, init)
    }

    pub fn keyboard<'a>(
        event_type: impl Into<Option<&'a str>>,
        init: Option<EventInit>,
    ) -> Result<Self> {
        Self::construct(EventKind::Keyboard, event_type, init)
    }

    pub fn mouse<'a>(
        event_type: impl Into<Option<&'a str>>,
        init: Option<EventInit>,
    ) -> Result<Self> {
        Self::construct(EventKind::Mouse, event_type, init)
    }

    /// Builds an event of `kind`: base defaults, then the kind's own defaults,
    /// then `init`.
    pub fn construct<'a>(
        kind: EventKind,
        event_type: impl Into<Option<&'a str>>,
        init: Option<EventInit>,
    ) -> Result<Self> {
        let Some(event_type) = event_type.into() else {
            return Err(Error::InvalidEvent("event type required".into()));
        };

        let mut event = Self::base(kind, event_type);
        event.apply_kind_defaults();
        if let Some(init) = init {
            event.apply_init(init);
        }
        Ok(event)
    }

    fn base(kind: EventKind, event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            kind,
            bubbles: false,
            cancelable: false,
            composed: false,
            cancel_bubble: false,
            default_prevented: false,
            target: None,
            current_target: None,
            src_element: None,
            time_stamp: now_ms(),
            detail: None,
            code: None,
            key: None,
            location: None,
            repeat: None,
            screen_x: None,
            screen_y: None,
            client_x: None,
            client_y: None,
            button: None,
            buttons: None,
            related_target: None,
            alt_key: None,
            ctrl_key: None,
            meta_key: None,
            shift_key: None,
            immediate_propagation_stopped: false,
        }
    }

    fn apply_kind_defaults(&mut self) {
        match self.kind {
            // `detail` already starts absent.
            EventKind::Event | EventKind::Custom => {}
            EventKind::Keyboard => {
                self.code = Some(String::new());
                self.key = Some(String::new());
                self.location = Some(0);
                self.repeat = Some(false);
                self.set_modifiers(false);
            }
            EventKind::Mouse => {
                self.screen_x = Some(0.0);
                self.screen_y = Some(0.0);
                self.client_x = Some(0.0);
                self.client_y = Some(0.0);
                self.button = Some(0);
                self.buttons = Some(0);
                self.related_target = None;
                self.set_modifiers(false);
            }
        }
    }

    fn set_modifiers(&mut self, value: bool) {
        self.alt_key = Some(value);
        self.ctrl_key = Some(value);
        self.meta_key = Some(value);
        self.shift_key = Some(value);
    }

    fn apply_init(&mut self, init: EventInit) {
        fn merge<V>(slot: &mut V, value: Option<V>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        fn merge_opt<V>(slot: &mut Option<V>, value: Option<V>) {
            if value.is_some() {
                *slot = value;
            }
        }

        merge(&mut self.event_type, init.event_type);
        merge(&mut self.bubbles, init.bubbles);
        merge(&mut self.cancelable, init.cancelable);
        merge(&mut self.composed, init.composed);
        merge(&mut self.cancel_bubble, init.cancel_bubble);
        merge(&mut self.default_prevented, init.default_prevented);
        merge_opt(&mut self.target, init.target);
        merge_opt(&mut self.current_target, init.current_target);
        merge_opt(&mut self.src_element, init.src_element);
        merge(&mut self.time_stamp, init.time_stamp);
        merge_opt(&mut self.detail, init.detail);
        merge_opt(&mut self.code, init.code);
        merge_opt(&mut self.key, init.key);
        merge_opt(&mut self.location, init.location);
        merge_opt(&mut self.repeat, init.repeat);
        merge_opt(&mut self.screen_x, init.screen_x);
        merge_opt(&mut self.screen_y, init.screen_y);
        merge_opt(&mut self.client_x, init.client_x);
        merge_opt(&mut self.client_y, init.client_y);
        merge_opt(&mut self.button, init.button);
        merge_opt(&mut self.buttons, init.buttons);
        merge_opt(&mut self.related_target, init.related_target);
        merge_opt(&mut self.alt_key, init.alt_key);
        merge_opt(&mut self.ctrl_key, init.ctrl_key);
        merge_opt(&mut self.meta_key, init.meta_key);
        merge_opt(&mut self.shift_key, init.shift_key);
    }

    /// Marks the default action as prevented. Advisory only: propagation is
    /// unaffected and callers read the flag themselves.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stops the walk before the next node. Remaining listeners on the current
    /// node still run.
    pub fn stop_propagation(&mut self) {
        self.cancel_bubble = true;
    }

    /// Stops the walk and skips the remaining listeners on the current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.cancel_bubble = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// True when a cancelable event had its default prevented.
    pub fn is_canceled(&self) -> bool {
        self.cancelable && self.default_prevented
    }

    /// Nodes from `target` up to the tree root, followed by the root's window
    /// when the root is a document. A detached subtree ends at its topmost
    /// node.
    pub fn composed_path<T: EventTree>(&self, tree: &T) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.target;

        while let Some(node) = cursor {
            path.push(node);

            let parent = tree.parent(node);
            if parent.is_none() && tree.is_document(node) {
                if let Some(window) = tree.default_view(node) {
                    path.push(window);
                }
                break;
            }

            cursor = parent;
        }

        path
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
