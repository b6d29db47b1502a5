// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch basics.
//!
//! Builds a small document, registers capturing, bubbling, and property
//! handlers, and prints the order in which a click reaches them.
//!
//! Run:
//! - `cargo run -p understory_demos --example event_basics`

use kurbo::Point;
use understory_dom::{Document, NodeId};
use understory_event::dispatcher::Dispatcher;
use understory_event::event::{Event, EventPayload, MouseDetail};
use understory_event::types::{HandlerReturn, Listener, TargetId};

fn main() {
    let mut doc = Document::new();
    let body = doc.create_element("body");
    let form = doc.create_element("form");
    let button = doc.create_element("button");
    doc.append_child(doc.root(), body);
    doc.append_child(body, form);
    doc.append_child(form, button);

    let dispatcher: Dispatcher<NodeId, &'static str, Document> = Dispatcher::new(doc);
    dispatcher
        .target(TargetId::Window)
        .add_event_listener("click", "window (capture)", true);
    dispatcher
        .target(body)
        .add_event_listener("click", "body (capture)", true);
    dispatcher
        .target(button)
        .add_event_listener("click", "button", false);
    dispatcher
        .target(form)
        .set_event_handler("click", Some("form.onclick"));
    dispatcher
        .target(body)
        .add_event_listener("click", "body (bubble)", false);

    let mut invoker = |l: &Listener<&'static str>, ev: &mut Event<NodeId>| {
        println!(
            "  {:<16} phase={:?} current={:?}",
            l.handler(),
            ev.phase(),
            ev.current_target()
        );
        if l.is_property_handler() {
            // `return false` from an `onclick` cancels the default action.
            return Ok::<_, ()>(HandlerReturn::Bool(false));
        }
        Ok(HandlerReturn::Undefined)
    };

    let mut click = Event::new("click")
        .with_trusted(true)
        .with_payload(EventPayload::Mouse(MouseDetail {
            client: Point::new(12.0, 8.0),
            detail: 1,
            ..MouseDetail::default()
        }));
    println!("== click on <button> ==");
    match dispatcher.dispatch(button, &mut click, &mut invoker) {
        Ok(proceed) => println!("default action runs: {proceed}"),
        Err(e) => println!("dispatch failed: {e:?}"),
    }

    println!("== focus on <button> (does not bubble) ==");
    dispatcher
        .target(body)
        .add_event_listener("focus", "body (bubble)", false);
    dispatcher
        .target(button)
        .add_event_listener("focus", "button", false);
    let _ = dispatcher.dispatch(button, &mut Event::new("focus"), &mut invoker);
}
