use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::config::LogLevel;
use crate::event::Event;
use crate::listeners::{EventListener, ListenerResult};
use crate::tree::{EventTree, NodeId};
use crate::Error;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// What happened during one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    /// `cancelable && default_prevented`.
    pub canceled: bool,
    pub propagation_stopped: bool,
    pub listeners_invoked: usize,
    pub listener_errors: usize,
}

pub fn add_event_listener<T: EventTree>(
    tree: &mut T,
    node: NodeId,
    event_type: &str,
    listener: EventListener<T>,
) {
    if let Some(registry) = tree.registry_mut(node) {
        registry.add(event_type, listener);
    }
}

pub fn remove_event_listener<T: EventTree>(
    tree: &mut T,
    node: NodeId,
    event_type: &str,
    listener: &EventListener<T>,
) {
    if let Some(registry) = tree.registry_mut(node) {
        let _ = registry.remove(event_type, listener);
    }
}

pub fn reset_event_listeners<T: EventTree>(tree: &mut T, node: NodeId) {
    if let Some(registry) = tree.registry_mut(node) {
        registry.clear();
    }
}

/// Delivers `event` at `target` and bubbles it upward.
///
/// Always returns `true`, even when a listener prevented the default of a
/// cancelable event. Use [`dispatch_event_with_outcome`] to read cancellation.
pub fn dispatch_event<T: EventTree>(
    tree: &mut T,
    target: impl Into<Option<NodeId>>,
    event: &mut Event,
) -> bool {
    let _ = dispatch_event_with_outcome(tree, target, event);
    true
}

pub fn dispatch_event_with_outcome<T: EventTree>(
    tree: &mut T,
    target: impl Into<Option<NodeId>>,
    event: &mut Event,
) -> DispatchOutcome {
    let target = target.into();
    event.target = target;

    let mut outcome = DispatchOutcome::default();
    propagate(tree, target, event, &mut outcome);

    outcome.default_prevented = event.default_prevented;
    outcome.canceled = event.is_canceled();
    outcome.propagation_stopped = event.cancel_bubble;

    let result = if target.is_none() {
        "empty_path"
    } else if event.cancel_bubble {
        "propagation_stopped"
    } else {
        "completed"
    };
    trace_line(tree, LogLevel::Info, |tree| {
        format!(
            "[event] done {} target={} outcome={} default_prevented={}",
            event.event_type,
            label(tree, target),
            result,
            event.default_prevented
        )
    });

    outcome
}

fn propagate<T: EventTree>(
    tree: &mut T,
    node: Option<NodeId>,
    event: &mut Event,
    outcome: &mut DispatchOutcome,
) {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
        propagate_at(tree, node, event, outcome)
    })
}

fn propagate_at<T: EventTree>(
    tree: &mut T,
    node: Option<NodeId>,
    event: &mut Event,
    outcome: &mut DispatchOutcome,
) {
    let Some(node) = node else {
        return;
    };
    if event.cancel_bubble {
        return;
    }

    event.current_target = Some(node);

    let listeners = tree
        .registry(node)
        .map(|registry| registry.snapshot(&event.event_type))
        .unwrap_or_default();

    for (index, listener) in listeners.iter().enumerate() {
        trace_line(tree, LogLevel::Debug, |tree| {
            format!(
                "[event] {} target={} current={} listener={} default_prevented={}",
                event.event_type,
                label(tree, event.target),
                tree.node_label(node),
                index,
                event.default_prevented
            )
        });

        outcome.listeners_invoked += 1;
        if let Err(message) = invoke_listener(tree, node, event, listener) {
            outcome.listener_errors += 1;
            report_listener_error(tree, node, event, message);
        }

        if event.immediate_propagation_stopped() {
            break;
        }
    }

    if !event.bubbles {
        return;
    }

    let next = next_hop(tree, node);
    propagate(tree, next, event, outcome);
}

/// A document hands the event to its window, which has no parent of its own.
/// Every other node hands it to its structural parent.
fn next_hop<T: EventTree>(tree: &T, node: NodeId) -> Option<NodeId> {
    if tree.is_document(node) {
        tree.default_view(node)
    } else {
        tree.parent(node)
    }
}

/// Runs one listener. Errors and panics both come back as a message.
fn invoke_listener<T: EventTree>(
    tree: &mut T,
    node: NodeId,
    event: &mut Event,
    listener: &EventListener<T>,
) -> Result<(), String> {
    let result: std::thread::Result<ListenerResult> =
        panic::catch_unwind(AssertUnwindSafe(|| listener.call(tree, node, event)));
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("listener panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("listener panicked: {message}")
    } else {
        "listener panicked".to_string()
    }
}

fn report_listener_error<T: EventTree>(tree: &mut T, node: NodeId, event: &Event, message: String) {
    let err = Error::ListenerInvocation {
        event_type: event.event_type.clone(),
        node: tree.node_label(node),
        message,
    };

    tracing::error!(target: "mock_doc_events", error = %err, "event listener failed");
    if let Some(state) = tree.trace_state_mut() {
        if state.wants(LogLevel::Error) {
            state.buffer(format!("[event] error {err}"));
        }
    }
}

fn trace_line<T, F>(tree: &mut T, level: LogLevel, line: F)
where
    T: EventTree,
    F: FnOnce(&T) -> String,
{
    if !tree.trace_state().is_some_and(|state| state.wants(level)) {
        return;
    }
    let line = line(tree);
    if let Some(state) = tree.trace_state_mut() {
        state.record(level, line);
    }
}

fn label<T: EventTree>(tree: &T, node: Option<NodeId>) -> String {
    node.map(|node| tree.node_label(node))
        .unwrap_or_else(|| "none".to_string())
}
