use super::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::subscriber::Interest;

mod event_model;

type CallLog = Rc<RefCell<Vec<String>>>;

fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn recorder(log: &CallLog, name: &str) -> EventListener<Dom> {
    let log = Rc::clone(log);
    let name = name.to_string();
    EventListener::new(move |_dom: &mut Dom, _node, _event: &mut Event| {
        log.borrow_mut().push(name.clone());
        Ok(())
    })
}

fn calls(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

/// document > div#a > div#b > button#leaf
struct Chain {
    dom: Dom,
    a: NodeId,
    b: NodeId,
    leaf: NodeId,
}

fn chain() -> Result<Chain> {
    let mut dom = Dom::new();
    let document = dom.document();
    let a = dom.create_element(document, "div")?;
    dom.set_attr(a, "id", "a")?;
    let b = dom.create_element(a, "div")?;
    dom.set_attr(b, "id", "b")?;
    let leaf = dom.create_element(b, "button")?;
    dom.set_attr(leaf, "id", "leaf")?;
    Ok(Chain { dom, a, b, leaf })
}

fn bubbling(event_type: &str) -> Result<Event> {
    Event::with_init(
        event_type,
        EventInit {
            bubbles: Some(true),
            ..EventInit::default()
        },
    )
}

/// Counts `error`-level events emitted under the crate's log target.
#[derive(Clone, Default)]
struct ErrorEvents(Arc<AtomicUsize>);

impl ErrorEvents {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl tracing::Subscriber for ErrorEvents {
    fn register_callsite(&self, _: &'static tracing::Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        let metadata = event.metadata();
        if *metadata.level() == tracing::Level::ERROR && metadata.target() == "mock_doc_events" {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _: &tracing::span::Id) {}

    fn exit(&self, _: &tracing::span::Id) {}
}

/// Runs `body` with an [`ErrorEvents`] subscriber installed on this thread.
fn count_error_events<R>(body: impl FnOnce() -> R) -> (R, usize) {
    let counter = ErrorEvents::default();
    let result = tracing::subscriber::with_default(counter.clone(), body);
    (result, counter.count())
}
