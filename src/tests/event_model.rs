use super::*;

use serde_json::json;

#[test]
fn new_event_has_type_and_defaults() -> Result<()> {
    let event = Event::new("click")?;
    assert_eq!(event.event_type, "click");
    assert_eq!(event.kind, EventKind::Event);
    assert!(!event.bubbles);
    assert!(!event.cancelable);
    assert!(!event.composed);
    assert!(!event.cancel_bubble);
    assert!(!event.default_prevented);
    assert_eq!(event.target, None);
    assert_eq!(event.current_target, None);
    assert_eq!(event.src_element, None);
    assert!(event.time_stamp > 0);
    assert_eq!(event.key, None);
    assert_eq!(event.detail, None);
    Ok(())
}

#[test]
fn missing_type_is_rejected() {
    let err = Event::new(None).expect_err("event without a type should be rejected");
    match err {
        Error::InvalidEvent(msg) => assert!(msg.contains("event type required")),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(matches!(
        Event::keyboard(None, None),
        Err(Error::InvalidEvent(_))
    ));
    assert!(matches!(
        Event::mouse(None, Some(EventInit::default())),
        Err(Error::InvalidEvent(_))
    ));
}

#[test]
fn empty_type_string_is_still_a_string() -> Result<()> {
    let event = Event::new("")?;
    assert_eq!(event.event_type, "");
    Ok(())
}

#[test]
fn keyboard_defaults_are_set_before_init() -> Result<()> {
    let event = Event::keyboard("keydown", None)?;
    assert_eq!(event.kind, EventKind::Keyboard);
    assert_eq!(event.code.as_deref(), Some(""));
    assert_eq!(event.key.as_deref(), Some(""));
    assert_eq!(event.location, Some(0));
    assert_eq!(event.repeat, Some(false));
    assert_eq!(event.alt_key, Some(false));
    assert_eq!(event.ctrl_key, Some(false));
    assert_eq!(event.meta_key, Some(false));
    assert_eq!(event.shift_key, Some(false));
    assert_eq!(event.client_x, None);

    let event = Event::keyboard(
        "keydown",
        Some(EventInit {
            key: Some("Enter".into()),
            shift_key: Some(true),
            bubbles: Some(true),
            ..EventInit::default()
        }),
    )?;
    assert_eq!(event.key.as_deref(), Some("Enter"));
    assert_eq!(event.code.as_deref(), Some(""));
    assert_eq!(event.shift_key, Some(true));
    assert_eq!(event.ctrl_key, Some(false));
    assert!(event.bubbles);
    Ok(())
}

#[test]
fn mouse_defaults_are_set_before_init() -> Result<()> {
    let event = Event::mouse("click", None)?;
    assert_eq!(event.kind, EventKind::Mouse);
    assert_eq!(event.screen_x, Some(0.0));
    assert_eq!(event.screen_y, Some(0.0));
    assert_eq!(event.client_x, Some(0.0));
    assert_eq!(event.client_y, Some(0.0));
    assert_eq!(event.button, Some(0));
    assert_eq!(event.buttons, Some(0));
    assert_eq!(event.related_target, None);
    assert_eq!(event.meta_key, Some(false));
    assert_eq!(event.key, None);

    let event = Event::mouse(
        "mousedown",
        Some(EventInit {
            client_x: Some(12.5),
            button: Some(2),
            related_target: Some(NodeId(7)),
            ..EventInit::default()
        }),
    )?;
    assert_eq!(event.client_x, Some(12.5));
    assert_eq!(event.client_y, Some(0.0));
    assert_eq!(event.button, Some(2));
    assert_eq!(event.related_target, Some(NodeId(7)));
    Ok(())
}

#[test]
fn custom_event_carries_detail() -> Result<()> {
    let event = Event::custom("ready", None)?;
    assert_eq!(event.kind, EventKind::Custom);
    assert_eq!(event.detail, None);

    let event = Event::custom(
        "ready",
        Some(EventInit {
            detail: Some(json!({ "count": 3, "tags": ["a", "b"] })),
            ..EventInit::default()
        }),
    )?;
    assert_eq!(event.detail, Some(json!({ "count": 3, "tags": ["a", "b"] })));
    Ok(())
}

#[test]
fn init_may_set_fields_the_kind_does_not_declare() -> Result<()> {
    let event = Event::with_init(
        "anything",
        EventInit {
            key: Some("x".into()),
            client_y: Some(4.0),
            detail: Some(json!(1)),
            default_prevented: Some(true),
            time_stamp: Some(42),
            ..EventInit::default()
        },
    )?;
    assert_eq!(event.kind, EventKind::Event);
    assert_eq!(event.key.as_deref(), Some("x"));
    assert_eq!(event.client_y, Some(4.0));
    assert_eq!(event.detail, Some(json!(1)));
    assert!(event.default_prevented);
    assert_eq!(event.time_stamp, 42);
    Ok(())
}

#[test]
fn init_may_rename_the_event() -> Result<()> {
    let event = Event::keyboard(
        "keydown",
        Some(EventInit {
            event_type: Some("keyup".into()),
            ..EventInit::default()
        }),
    )?;
    assert_eq!(event.event_type, "keyup");
    assert_eq!(event.kind, EventKind::Keyboard);

    let Chain { mut dom, leaf, .. } = chain()?;
    let log = call_log();
    add_event_listener(&mut dom, leaf, "keydown", recorder(&log, "down"));
    add_event_listener(&mut dom, leaf, "keyup", recorder(&log, "up"));
    let mut event = event;
    dispatch_event(&mut dom, leaf, &mut event);
    assert_eq!(calls(&log), vec!["up"]);
    Ok(())
}

#[test]
fn prevent_default_only_sets_the_flag() -> Result<()> {
    let mut event = Event::new("submit")?;
    event.prevent_default();
    assert!(event.default_prevented);
    assert!(!event.cancel_bubble);
    assert!(!event.is_canceled());

    let mut event = Event::with_init(
        "submit",
        EventInit {
            cancelable: Some(true),
            ..EventInit::default()
        },
    )?;
    event.prevent_default();
    assert!(event.is_canceled());
    Ok(())
}

#[test]
fn stop_methods_both_set_cancel_bubble() -> Result<()> {
    let mut event = Event::new("click")?;
    event.stop_propagation();
    assert!(event.cancel_bubble);
    assert!(!event.immediate_propagation_stopped());

    let mut event = Event::new("click")?;
    event.stop_immediate_propagation();
    assert!(event.cancel_bubble);
    assert!(event.immediate_propagation_stopped());
    Ok(())
}

#[test]
fn composed_path_runs_from_target_to_window() -> Result<()> {
    let Chain {
        mut dom, a, b, leaf,
    } = chain()?;
    let mut event = bubbling("click")?;
    dispatch_event(&mut dom, leaf, &mut event);

    assert_eq!(
        event.composed_path(&dom),
        vec![leaf, b, a, dom.document(), dom.window()]
    );
    Ok(())
}

#[test]
fn composed_path_of_detached_subtree_stops_at_its_top() -> Result<()> {
    let mut dom = Dom::new();
    let top = dom.create_detached_element("section");
    let inner = dom.create_element(top, "span")?;

    let mut event = Event::new("click")?;
    event.target = Some(inner);
    assert_eq!(event.composed_path(&dom), vec![inner, top]);
    Ok(())
}

#[test]
fn composed_path_without_target_is_empty() -> Result<()> {
    let dom = Dom::new();
    let event = Event::new("click")?;
    assert!(event.composed_path(&dom).is_empty());
    Ok(())
}

#[test]
fn composed_path_from_document_is_document_then_window() -> Result<()> {
    let dom = Dom::new();
    let mut event = Event::new("load")?;
    event.target = Some(dom.document());
    assert_eq!(event.composed_path(&dom), vec![dom.document(), dom.window()]);
    Ok(())
}
