// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label activation and disabled controls.
//!
//! Clicking a `<label>` forwards a click to its control. Disabled controls
//! never see mouse activation, and a canceled click is not forwarded.
//!
//! Run:
//! - `cargo run -p understory_demos --example label_forwarding`

use std::cell::Cell;

use understory_dom::{Document, NodeId};
use understory_event::dispatcher::Dispatcher;
use understory_event::event::Event;
use understory_event::types::{HandlerReturn, Listener};

fn main() {
    let mut doc = Document::new();
    let label = doc.create_element("label");
    let text = doc.create_text("Subscribe");
    let checkbox = doc.create_element("input");
    let fieldset = doc.create_element("fieldset");
    let locked = doc.create_element("input");
    doc.append_child(doc.root(), label);
    doc.append_child(label, text);
    doc.append_child(doc.root(), checkbox);
    doc.append_child(doc.root(), fieldset);
    doc.append_child(fieldset, locked);
    doc.set_attribute(checkbox, "id", "subscribe");
    doc.set_attribute(checkbox, "type", "checkbox");
    doc.set_attribute(label, "for", "subscribe");
    doc.set_attribute(fieldset, "disabled", "");

    let dispatcher: Dispatcher<NodeId, &'static str, Document> = Dispatcher::new(doc);
    dispatcher.target(label).add_event_listener("click", "label", false);
    dispatcher
        .target(checkbox)
        .add_event_listener("click", "checkbox", false);
    dispatcher
        .target(locked)
        .add_event_listener("click", "locked input", false);

    let cancel_label = Cell::new(false);
    let mut invoker = |l: &Listener<&'static str>, ev: &mut Event<NodeId>| {
        let note = if ev.is_forwarded_activation() {
            " (forwarded)"
        } else {
            ""
        };
        println!("  {}{note}", l.handler());
        if cancel_label.get() && *l.handler() == "label" {
            ev.prevent_default();
        }
        Ok::<_, ()>(HandlerReturn::Undefined)
    };

    println!("== click on the label text ==");
    let _ = dispatcher.dispatch(text, &mut Event::new("click"), &mut invoker);

    println!("== click on an input inside a disabled fieldset ==");
    let _ = dispatcher.dispatch(locked, &mut Event::new("click"), &mut invoker);
    println!("  (nothing ran)");

    println!("== canceled click on the label ==");
    cancel_label.set(true);
    let _ = dispatcher.dispatch(label, &mut Event::new("click"), &mut invoker);
}
