// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event --heading-base-level=0

//! Understory Event: a deterministic DOM event runtime for simulated documents.
//!
//! ## Overview
//!
//! This crate stores event listeners per target and event type, and drives
//! events through the capture → target → bubble propagation model used by web
//! documents. It is meant for headless hosts (test harnesses, scripted page
//! simulators) that run script handlers against a document tree without a
//! browser.
//!
//! The engine never runs script itself. The host supplies two collaborators:
//!
//! - a [`DomLookup`](crate::types::DomLookup) that answers parent, document,
//!   and label questions about the tree;
//! - a [`HandlerInvoker`](crate::types::HandlerInvoker) that executes a
//!   listener body against the in-flight [`Event`](crate::event::Event).
//!
//! ## Pieces
//!
//! - [`Event`](crate::event::Event): type, flags, phase, targets, payload.
//! - [`ListenerRegistry`](crate::registry::ListenerRegistry): capturing,
//!   bubbling, and at-target lists for one (target, type) pair, plus the
//!   `on<type>` property handler slot.
//! - [`EventTarget`](crate::target::EventTarget): the registries of one node
//!   (or the window), keyed by event type.
//! - [`Dispatcher`](crate::dispatcher::Dispatcher): owns the targets, builds
//!   propagation paths, runs the phases, and applies label click forwarding.
//!
//! ## Propagation rules
//!
//! - Capturing listeners of ancestors run outermost first; then every listener
//!   of the target in installation order; then, if the event bubbles, the
//!   bubbling listeners of ancestors innermost first.
//! - The [`Window`](crate::types::TargetId::Window) pseudo-target sits above
//!   the document node, except for `load`.
//! - `stop_propagation` finishes the current node; `stop_immediate_propagation`
//!   stops at once; `prevent_default` only affects cancelable events.
//! - Listener lists are snapshotted per node visit, so handlers may add and
//!   remove listeners (or dispatch other events) while a dispatch is running.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_event::dispatcher::Dispatcher;
//! use understory_event::event::Event;
//! use understory_event::types::{DomLookup, HandlerReturn, Listener, Phase};
//!
//! // A two-node tree: 1 is the document, 2 its only child.
//! struct Tiny;
//! impl DomLookup<u32> for Tiny {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node == 2).then_some(1)
//!     }
//!     fn is_document(&self, node: &u32) -> bool {
//!         *node == 1
//!     }
//! }
//!
//! let dispatcher: Dispatcher<u32, &'static str, Tiny> = Dispatcher::new(Tiny);
//! dispatcher.target(1).add_event_listener("click", "doc-capture", true);
//! dispatcher.target(2).add_event_listener("click", "child", false);
//! dispatcher.target(1).set_event_handler("click", Some("doc-onclick"));
//!
//! let mut seen = Vec::new();
//! let mut invoker = |l: &Listener<&'static str>, ev: &mut Event<u32>| {
//!     seen.push((*l.handler(), ev.phase()));
//!     if l.is_property_handler() {
//!         // Legacy `return false` cancels the event.
//!         return Ok::<_, ()>(HandlerReturn::Bool(false));
//!     }
//!     Ok(HandlerReturn::Undefined)
//! };
//!
//! let mut click = Event::new("click");
//! let proceed = dispatcher.dispatch(2, &mut click, &mut invoker).unwrap();
//! assert!(!proceed);
//! assert_eq!(
//!     seen,
//!     [
//!         ("doc-capture", Phase::Capturing),
//!         ("child", Phase::AtTarget),
//!         ("doc-onclick", Phase::Bubbling),
//!     ]
//! );
//! ```
//!
//! ## Features
//!
//! - `dom_adapter`: implements [`DomLookup`](crate::types::DomLookup) for
//!   `understory_dom::Document`.

pub mod adapters;
pub mod defaults;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod registry;
pub mod target;
pub mod types;
