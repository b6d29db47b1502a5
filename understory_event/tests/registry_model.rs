// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model-based checks of listener registries and propagation order.

use std::collections::HashMap;

use proptest::collection::vec;
use proptest::prelude::*;
use understory_event::dispatcher::Dispatcher;
use understory_event::event::Event;
use understory_event::registry::ListenerRegistry;
use understory_event::types::{DomLookup, HandlerReturn, Listener, Phase};

#[derive(Clone, Debug)]
enum Op {
    Add(u8, bool),
    Remove(u8, bool),
    SetHandler(Option<u8>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0_u8..6, any::<bool>()).prop_map(|(h, c)| Op::Add(h, c)),
        3 => (0_u8..6, any::<bool>()).prop_map(|(h, c)| Op::Remove(h, c)),
        1 => proptest::option::of(100_u8..103).prop_map(Op::SetHandler),
    ]
}

/// Reference model: the at-target list, from which the other two are derived.
#[derive(Default)]
struct Model {
    at_target: Vec<Listener<u8>>,
}

impl Model {
    fn apply(&mut self, op: &Op) -> Option<bool> {
        match *op {
            Op::Add(handler, capture) => {
                let entry = Listener::Plain { handler, capture };
                if self.at_target.contains(&entry) {
                    return Some(false);
                }
                self.at_target.push(entry);
                Some(true)
            }
            Op::Remove(handler, capture) => {
                let entry = Listener::Plain { handler, capture };
                let Some(pos) = self.at_target.iter().position(|l| *l == entry) else {
                    return Some(false);
                };
                self.at_target.remove(pos);
                Some(true)
            }
            Op::SetHandler(handler) => {
                let slot = self.at_target.iter().position(Listener::is_property_handler);
                match (handler, slot) {
                    (Some(h), Some(i)) => self.at_target[i] = Listener::PropertyHandler(h),
                    (Some(h), None) => self.at_target.push(Listener::PropertyHandler(h)),
                    (None, Some(i)) => {
                        self.at_target.remove(i);
                    }
                    (None, None) => {}
                }
                None
            }
        }
    }

    fn capturing(&self) -> Vec<Listener<u8>> {
        self.at_target
            .iter()
            .filter(|l| matches!(l, Listener::Plain { capture: true, .. }))
            .cloned()
            .collect()
    }

    fn bubbling(&self) -> Vec<Listener<u8>> {
        self.at_target
            .iter()
            .filter(|l| !matches!(l, Listener::Plain { capture: true, .. }))
            .cloned()
            .collect()
    }
}

proptest! {
    #[test]
    fn registry_matches_model(ops in vec(op_strategy(), 0..64)) {
        let registry = ListenerRegistry::new();
        let mut model = Model::default();
        for op in &ops {
            let expected = model.apply(op);
            let actual = match *op {
                Op::Add(h, c) => Some(registry.add(h, c)),
                Op::Remove(h, c) => Some(registry.remove(&h, c)),
                Op::SetHandler(h) => {
                    registry.set_property_handler(h);
                    None
                }
            };
            prop_assert_eq!(actual, expected, "result of {:?}", op);
        }
        let at_target = registry.listeners_for(Phase::AtTarget);
        let capturing = registry.listeners_for(Phase::Capturing);
        let bubbling = registry.listeners_for(Phase::Bubbling);
        let (model_capturing, model_bubbling) = (model.capturing(), model.bubbling());
        prop_assert_eq!(at_target.as_slice(), model.at_target.as_slice());
        prop_assert_eq!(capturing.as_slice(), model_capturing.as_slice());
        prop_assert_eq!(bubbling.as_slice(), model_bubbling.as_slice());
        prop_assert_eq!(registry.is_empty(), model.at_target.is_empty());
        let handler = model.at_target.iter().find_map(|l| match l {
            Listener::PropertyHandler(h) => Some(*h),
            Listener::Plain { .. } => None,
        });
        prop_assert_eq!(registry.property_handler(), handler);
    }
}

/// Node `i` is the child of `i - 1`; node 0 is the document.
struct Chain;

impl DomLookup<u32> for Chain {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        node.checked_sub(1)
    }

    fn is_document(&self, node: &u32) -> bool {
        *node == 0
    }
}

proptest! {
    #[test]
    fn dispatch_order_follows_phases(
        depth in 1_u32..6,
        registrations in vec((0_u32..6, any::<bool>()), 0..24),
        bubbles in any::<bool>(),
    ) {
        let target = depth - 1;
        let dispatcher: Dispatcher<u32, usize, Chain> = Dispatcher::new(Chain);
        let mut per_node: HashMap<u32, Vec<(usize, bool)>> = HashMap::new();
        for (id, &(node, capture)) in registrations.iter().enumerate() {
            let node = node % depth;
            dispatcher.target(node).add_event_listener("x-probe", id, capture);
            per_node.entry(node).or_default().push((id, capture));
        }

        let mut expected = Vec::new();
        let on = |node: u32, capture: Option<bool>| -> Vec<usize> {
            per_node
                .get(&node)
                .into_iter()
                .flatten()
                .filter(|(_, c)| capture.is_none_or(|want| *c == want))
                .map(|(id, _)| *id)
                .collect()
        };
        for node in 0..target {
            expected.extend(on(node, Some(true)));
        }
        expected.extend(on(target, None));
        if bubbles {
            for node in (0..target).rev() {
                expected.extend(on(node, Some(false)));
            }
        }

        let mut seen = Vec::new();
        let mut invoker = |l: &Listener<usize>, _: &mut Event<u32>| {
            seen.push(*l.handler());
            Ok::<_, ()>(HandlerReturn::Undefined)
        };
        let init = understory_event::event::EventInit {
            bubbles: Some(bubbles),
            cancelable: None,
        };
        let mut event = Event::with_init("x-probe", init);
        prop_assert_eq!(dispatcher.dispatch(target, &mut event, &mut invoker), Ok(true));
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(event.phase(), Phase::None);
    }
}
