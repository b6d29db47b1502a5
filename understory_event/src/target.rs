// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener ownership for one node or the window.
//!
//! An [`EventTarget`] maps lower-cased event types to their
//! [`ListenerRegistry`]. Registries are created on demand by the mutating
//! calls and are shared by `Arc`, so the dispatcher can keep one alive across
//! handler invocations without holding the target's lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::event::Event;
use crate::registry::{ListenerRegistry, ListenerSnapshot};
use crate::types::{DomLookup, HandlerInvoker, Phase, TargetId};

/// Listeners of one target, keyed by event type.
#[derive(Debug)]
pub struct EventTarget<K, H> {
    id: TargetId<K>,
    registries: RwLock<HashMap<String, Arc<ListenerRegistry<H>>>>,
}

impl<K, H> EventTarget<K, H>
where
    K: Copy + Eq + core::hash::Hash + core::fmt::Debug,
    H: Clone + PartialEq,
{
    /// Create a target with no listeners.
    pub fn new(id: TargetId<K>) -> Self {
        Self {
            id,
            registries: RwLock::new(HashMap::new()),
        }
    }

    /// The identity this target was created for.
    pub fn id(&self) -> TargetId<K> {
        self.id
    }

    /// Register `listener` for `event_type`.
    ///
    /// Returns `false` if it was already registered for that phase.
    pub fn add_event_listener(&self, event_type: &str, listener: H, use_capture: bool) -> bool {
        let added = self.registry_or_insert(event_type).add(listener, use_capture);
        if added {
            log::trace!(
                "{:?}: added `{event_type}` listener (capture: {use_capture})",
                self.id
            );
        }
        added
    }

    /// Unregister `listener` from `event_type`. Absent listeners are ignored.
    pub fn remove_event_listener(&self, event_type: &str, listener: &H, use_capture: bool) -> bool {
        let removed = self
            .registry(event_type)
            .is_some_and(|r| r.remove(listener, use_capture));
        if removed {
            log::trace!(
                "{:?}: removed `{event_type}` listener (capture: {use_capture})",
                self.id
            );
        }
        removed
    }

    /// Install, replace, or clear the `on<event_type>` property handler.
    pub fn set_event_handler(&self, event_type: &str, handler: Option<H>) {
        log::trace!(
            "{:?}: {} `on{event_type}` handler",
            self.id,
            if handler.is_some() { "set" } else { "cleared" }
        );
        match handler {
            Some(handler) => self
                .registry_or_insert(event_type)
                .set_property_handler(Some(handler)),
            None => {
                if let Some(registry) = self.registry(event_type) {
                    registry.set_property_handler(None);
                }
            }
        }
    }

    /// The current `on<event_type>` property handler.
    pub fn event_handler(&self, event_type: &str) -> Option<H> {
        self.registry(event_type).and_then(|r| r.property_handler())
    }

    /// Returns true if anything would run at target for `event_type`.
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.registry(event_type).is_some_and(|r| !r.is_empty())
    }

    /// Snapshot of the listeners `phase` invokes for `event_type`.
    pub fn listeners(&self, event_type: &str, phase: Phase) -> ListenerSnapshot<H> {
        self.registry(event_type)
            .map_or_else(|| ListenerSnapshot::empty(phase), |r| r.listeners_for(phase))
    }

    /// The registry for `event_type`, if one was ever created.
    pub fn registry(&self, event_type: &str) -> Option<Arc<ListenerRegistry<H>>> {
        let key = event_type.to_ascii_lowercase();
        self.registries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Dispatch `event` with this target as its target.
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn dispatch<D, I>(
        &self,
        dispatcher: &Dispatcher<K, H, D>,
        event: &mut Event<K>,
        invoker: &mut I,
    ) -> Result<bool, DispatchError<I::Error>>
    where
        D: DomLookup<K>,
        I: HandlerInvoker<K, H>,
    {
        dispatcher.dispatch(self.id, event, invoker)
    }

    fn registry_or_insert(&self, event_type: &str) -> Arc<ListenerRegistry<H>> {
        if let Some(registry) = self.registry(event_type) {
            return registry;
        }
        let mut registries = self
            .registries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            registries
                .entry(event_type.to_ascii_lowercase())
                .or_default(),
        )
    }
}
