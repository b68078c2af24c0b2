//! In-memory emulation of the DOM `Event` / `EventTarget` model for headless tests.
//!
//! The crate builds events, stores listeners on the nodes that own them and
//! walks the bubble path synchronously over any tree implementing [`EventTree`].
//! A small arena [`Dom`] is bundled for callers without a tree of their own.

use std::error::Error as StdError;
use std::fmt;

mod config;
mod dispatch;
mod dom;
mod event;
mod listeners;
mod trace;
mod tree;

pub use config::{Flags, HarnessConfig, LogLevel};
pub use dispatch::{
    DispatchOutcome, add_event_listener, dispatch_event, dispatch_event_with_outcome,
    remove_event_listener, reset_event_listeners,
};
pub use dom::Dom;
pub use event::{Event, EventInit, EventKind};
pub use listeners::{EventListener, ListenerRegistry, ListenerResult};
pub use trace::TraceState;
pub use tree::{EventTree, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidEvent(String),
    ListenerInvocation {
        event_type: String,
        node: String,
        message: String,
    },
    InvalidTree(String),
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEvent(msg) => write!(f, "invalid event: {msg}"),
            Self::ListenerInvocation {
                event_type,
                node,
                message,
            } => write!(
                f,
                "listener for {event_type} on {node} failed: {message}"
            ),
            Self::InvalidTree(msg) => write!(f, "invalid tree operation: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests;
