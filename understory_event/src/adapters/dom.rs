// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`DomLookup`] for the Understory DOM document tree.
//!
//! ## Feature
//!
//! Enable with `dom_adapter`.
//!
//! ## Notes
//!
//! Stale node ids have no parent, are not documents, and handle no events, so
//! dispatching to a removed node runs nothing.

use understory_dom::{Document, NodeId, NodeKind};

use crate::types::DomLookup;

impl DomLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }

    fn is_document(&self, node: &NodeId) -> bool {
        matches!(self.kind(*node), Some(NodeKind::Document))
    }

    fn handles(&self, node: &NodeId, event_type: &str) -> bool {
        Document::handles(self, *node, event_type)
    }

    fn is_label(&self, node: &NodeId) -> bool {
        Document::is_label(self, *node)
    }

    fn labeled_control(&self, node: &NodeId) -> Option<NodeId> {
        Document::labeled_control(self, *node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::event::Event;
    use crate::types::{HandlerReturn, Listener, Phase, TargetId};

    type Log = Vec<(&'static str, Option<TargetId<NodeId>>, Phase)>;
    type DomDispatcher = Dispatcher<NodeId, &'static str, Document>;

    fn recorder(
        log: &mut Log,
    ) -> impl FnMut(&Listener<&'static str>, &mut Event<NodeId>) -> Result<HandlerReturn, ()> + '_
    {
        move |l: &Listener<&'static str>, ev: &mut Event<NodeId>| {
            log.push((*l.handler(), ev.current_target(), ev.phase()));
            Ok(HandlerReturn::Undefined)
        }
    }

    #[test]
    fn path_reaches_window_through_document() {
        let mut doc = Document::new();
        let body = doc.create_element("body");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), body);
        doc.append_child(body, p);
        let root = doc.root();
        let d = DomDispatcher::new(doc);
        assert_eq!(
            d.propagation_path(TargetId::Node(p), "click"),
            vec![
                TargetId::Node(p),
                TargetId::Node(body),
                TargetId::Node(root),
                TargetId::Window
            ]
        );
    }

    #[test]
    fn detached_subtree_has_no_window() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        doc.append_child(div, span);
        let d = DomDispatcher::new(doc);
        assert_eq!(
            d.propagation_path(TargetId::Node(span), "click"),
            vec![TargetId::Node(span), TargetId::Node(div)]
        );
    }

    #[test]
    fn text_nodes_ignore_focus() {
        let mut doc = Document::new();
        let text = doc.create_text("hello");
        doc.append_child(doc.root(), text);
        let d = DomDispatcher::new(doc);
        d.target(text).add_event_listener("focus", "onfocus", false);
        d.target(text).add_event_listener("click", "onclick", false);
        let mut log = Log::new();
        assert_eq!(
            d.dispatch(text, &mut Event::new("focus"), &mut recorder(&mut log)),
            Ok(true)
        );
        assert!(log.is_empty());
        let _ = d.dispatch(text, &mut Event::new("click"), &mut recorder(&mut log));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn disabled_button_swallows_click() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.root(), button);
        doc.set_attribute(button, "disabled", "");
        let d = DomDispatcher::new(doc);
        d.target(button).add_event_listener("click", "press", false);
        d.target(button).add_event_listener("keydown", "key", false);
        let mut log = Log::new();
        let _ = d.dispatch(button, &mut Event::new("click"), &mut recorder(&mut log));
        let _ = d.dispatch(button, &mut Event::new("keydown"), &mut recorder(&mut log));
        assert_eq!(
            log.iter().map(|e| e.0).collect::<Vec<_>>(),
            vec!["key"],
            "only non-mouse events reach a disabled control"
        );
    }

    #[test]
    fn label_for_forwards_click() {
        let mut doc = Document::new();
        let label = doc.create_element("label");
        let input = doc.create_element("input");
        doc.append_child(doc.root(), label);
        doc.append_child(doc.root(), input);
        doc.set_attribute(input, "id", "name");
        doc.set_attribute(label, "for", "name");
        let d = DomDispatcher::new(doc);
        d.target(input).add_event_listener("click", "input", false);
        d.target(TargetId::Window).add_event_listener("click", "window", false);
        let mut log = Log::new();
        let _ = d.dispatch(label, &mut Event::new("click"), &mut recorder(&mut log));
        assert_eq!(
            log,
            vec![
                ("window", Some(TargetId::Window), Phase::Bubbling),
                ("input", Some(TargetId::Node(input)), Phase::AtTarget),
                ("window", Some(TargetId::Window), Phase::Bubbling),
            ]
        );
    }

    #[test]
    fn removed_node_runs_nothing() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.append_child(doc.root(), div);
        let mut d = DomDispatcher::new(doc);
        d.target(div).add_event_listener("click", "gone", false);
        d.dom_mut().remove(div);
        let mut log = Log::new();
        assert_eq!(
            d.dispatch(div, &mut Event::new("click"), &mut recorder(&mut log)),
            Ok(true)
        );
        assert!(log.is_empty());
    }

    #[test]
    fn dead_node_targets_can_be_pruned() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), div);
        doc.append_child(div, p);
        let mut d = DomDispatcher::new(doc);
        d.target(div).add_event_listener("click", "div", false);
        d.target(p).add_event_listener("click", "p", false);
        d.target(TargetId::Window).add_event_listener("click", "window", false);
        d.dom_mut().remove(div);
        let dropped = d.retain_targets(|id| id.node().is_none_or(|n| d.dom().is_alive(n)));
        assert_eq!(dropped, 2, "div and its descendant");
        assert!(d.existing_target(div).is_none());
        assert!(d.existing_target(p).is_none());
        assert!(d.existing_target(TargetId::Window).is_some());
    }
}
