// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: propagation paths and the capture/target/bubble state machine.
//!
//! ## Overview
//!
//! The [`Dispatcher`] owns every [`EventTarget`] (created on demand, keyed by
//! [`TargetId`]) and drives an [`Event`] through
//! `None → Capturing → AtTarget → Bubbling → None`.
//!
//! ## Path
//!
//! The propagation path runs from the target up through `parent_of` to the
//! root. If the root is a document node, the [`TargetId::Window`]
//! pseudo-target is appended, except for `load` which stops at the document.
//! For detached roots the window joins only when
//! [`DispatchConfig::window_on_detached`] is set for the event type.
//! The path is computed once and not affected by tree changes made by handlers.
//!
//! ## Listener invocation
//!
//! Each visited node runs the snapshot of its registry for the current phase.
//! Listeners added or removed by a handler take effect on later node visits,
//! never on the list being iterated. No lock is held while a handler runs, so
//! handlers may freely re-enter the dispatcher.
//!
//! - After each listener: a property handler returning `Bool(false)` cancels
//!   the event; then immediate stop ends the dispatch.
//! - After each node: `stop_propagation` ends the dispatch.
//!
//! ## Default actions
//!
//! After a `click` that was neither stopped nor canceled, the nearest
//! label-like node at or above the target forwards a fresh `click` to its
//! labeled control (see [`DispatchConfig::with_label_forwarding`]).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::defaults::{CLICK, LOAD};
use crate::error::DispatchError;
use crate::event::Event;
use crate::target::EventTarget;
use crate::types::{DomLookup, HandlerInvoker, HandlerReturn, Phase, TargetId};

/// Policy switches for a [`Dispatcher`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DispatchConfig {
    window_on_detached: HashSet<String>,
    label_forwarding: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            window_on_detached: HashSet::new(),
            label_forwarding: true,
        }
    }
}

impl DispatchConfig {
    /// Whether the window joins the path of `event_type` when the target is
    /// not in a document. Off for every type by default.
    pub fn window_on_detached(&self, event_type: &str) -> bool {
        self.window_on_detached
            .contains(&event_type.to_ascii_lowercase())
    }

    /// Set [`window_on_detached`](Self::window_on_detached) for `event_type`.
    pub fn with_window_on_detached(mut self, event_type: &str, enabled: bool) -> Self {
        let key = event_type.to_ascii_lowercase();
        if enabled {
            self.window_on_detached.insert(key);
        } else {
            self.window_on_detached.remove(&key);
        }
        self
    }

    /// Whether `click` on a label forwards to its control. On by default.
    pub fn label_forwarding(&self) -> bool {
        self.label_forwarding
    }

    /// Enable or disable label click forwarding.
    pub fn with_label_forwarding(mut self, enabled: bool) -> Self {
        self.label_forwarding = enabled;
        self
    }
}

/// Event dispatcher over a document `D` with node keys `K` and host handles `H`.
///
/// All methods take `&self`; a dispatcher can be shared with the handler
/// invoker for re-entrant dispatch and listener changes.
#[derive(Debug)]
pub struct Dispatcher<K, H, D> {
    dom: D,
    config: DispatchConfig,
    targets: RwLock<HashMap<TargetId<K>, Arc<EventTarget<K, H>>>>,
}

impl<K, H, D> Dispatcher<K, H, D>
where
    K: Copy + Eq + core::hash::Hash + core::fmt::Debug,
    H: Clone + PartialEq,
    D: DomLookup<K>,
{
    /// Create a dispatcher with the default configuration.
    pub fn new(dom: D) -> Self {
        Self::with_config(dom, DispatchConfig::default())
    }

    /// Create a dispatcher with an explicit configuration.
    pub fn with_config(dom: D, config: DispatchConfig) -> Self {
        Self {
            dom,
            config,
            targets: RwLock::new(HashMap::new()),
        }
    }

    /// The document lookup.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutable access to the document lookup, for tree edits between dispatches.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: DispatchConfig) {
        self.config = config;
    }

    /// The target for `id`, created if it does not exist yet.
    ///
    /// Use [`existing_target`](Self::existing_target) for read-only lookups.
    /// Targets live until [`remove_target`](Self::remove_target) or
    /// [`retain_targets`](Self::retain_targets) drops them; the dispatcher
    /// does not observe tree removals itself.
    pub fn target(&self, id: impl Into<TargetId<K>>) -> Arc<EventTarget<K, H>> {
        let id = id.into();
        if let Some(target) = self.existing_target(id) {
            return target;
        }
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            targets
                .entry(id)
                .or_insert_with(|| Arc::new(EventTarget::new(id))),
        )
    }

    /// The target for `id`, if listeners were ever registered on it.
    pub fn existing_target(&self, id: impl Into<TargetId<K>>) -> Option<Arc<EventTarget<K, H>>> {
        let id = id.into();
        self.targets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Drop the target for `id` and all of its listeners.
    ///
    /// Returns `false` if there was none. In-flight dispatches keep using the
    /// snapshots they already hold.
    pub fn remove_target(&self, id: impl Into<TargetId<K>>) -> bool {
        let id = id.into();
        let removed = self
            .targets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            log::debug!("removed event target {id:?}");
        }
        removed
    }

    /// Keep only the targets for which `keep` returns true.
    ///
    /// Hosts call this after removing nodes from the tree. Returns the number
    /// of targets dropped. `keep` runs under the target map's write lock and
    /// must not call back into this dispatcher's target methods.
    pub fn retain_targets(&self, mut keep: impl FnMut(TargetId<K>) -> bool) -> usize {
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        let before = targets.len();
        targets.retain(|id, _| keep(*id));
        let dropped = before - targets.len();
        if dropped > 0 {
            log::debug!("pruned {dropped} event targets");
        }
        dropped
    }

    /// The propagation path of `event_type` from `target` outward.
    ///
    /// The first element is always `target`.
    pub fn propagation_path(&self, target: TargetId<K>, event_type: &str) -> Vec<TargetId<K>> {
        let TargetId::Node(node) = target else {
            return vec![TargetId::Window];
        };
        let mut path = vec![target];
        let mut root = node;
        while let Some(parent) = self.dom.parent_of(&root) {
            path.push(TargetId::Node(parent));
            root = parent;
        }
        let window = if event_type.eq_ignore_ascii_case(LOAD) {
            false
        } else if self.dom.is_document(&root) {
            true
        } else {
            self.config.window_on_detached(event_type)
        };
        if window {
            path.push(TargetId::Window);
        }
        path
    }

    /// Dispatch `event` to `target`.
    ///
    /// Returns `Ok(false)` when the default action must be suppressed (the
    /// event is cancelable and was canceled), `Ok(true)` otherwise.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::AlreadyDispatching`] if `event` is in flight.
    /// - [`DispatchError::Handler`] with the first handler failure; remaining
    ///   listeners and phases are skipped and the event is reset.
    pub fn dispatch<I>(
        &self,
        target: impl Into<TargetId<K>>,
        event: &mut Event<K>,
        invoker: &mut I,
    ) -> Result<bool, DispatchError<I::Error>>
    where
        I: HandlerInvoker<K, H>,
    {
        let target = target.into();
        if event.is_dispatching() {
            return Err(DispatchError::AlreadyDispatching {
                event_type: event.event_type().to_owned(),
            });
        }
        if let TargetId::Node(node) = target
            && !self.dom.handles(&node, event.event_type())
        {
            log::debug!("{target:?} ignores `{}`", event.event_type());
            return Ok(true);
        }

        event.begin_dispatch(target);
        let path = self.propagation_path(target, event.event_type());
        log::debug!(
            "dispatching `{}` to {target:?} ({} targets on path)",
            event.event_type(),
            path.len()
        );
        let result = self.run_phases(&path, event, invoker);
        event.end_dispatch();
        if result.is_err() {
            log::debug!("`{}` aborted by a handler failure", event.event_type());
        }
        result.map_err(DispatchError::Handler)?;
        log::debug!(
            "finished `{}` (stopped: {}, canceled: {})",
            event.event_type(),
            event.propagation_stopped(),
            event.default_prevented()
        );

        if let TargetId::Node(node) = target {
            self.forward_label_activation(node, event, invoker)?;
        }
        Ok(event.should_proceed())
    }

    fn run_phases<I>(
        &self,
        path: &[TargetId<K>],
        event: &mut Event<K>,
        invoker: &mut I,
    ) -> Result<(), I::Error>
    where
        I: HandlerInvoker<K, H>,
    {
        let Some((&target, ancestors)) = path.split_first() else {
            return Ok(());
        };

        event.set_phase(Phase::Capturing);
        for &node in ancestors.iter().rev() {
            if event.propagation_stopped() {
                return Ok(());
            }
            self.invoke_listeners(node, Phase::Capturing, event, invoker)?;
        }
        if event.propagation_stopped() {
            return Ok(());
        }

        event.set_phase(Phase::AtTarget);
        self.invoke_listeners(target, Phase::AtTarget, event, invoker)?;
        if !event.bubbles() {
            return Ok(());
        }

        event.set_phase(Phase::Bubbling);
        for &node in ancestors {
            if event.propagation_stopped() {
                return Ok(());
            }
            self.invoke_listeners(node, Phase::Bubbling, event, invoker)?;
        }
        Ok(())
    }

    fn invoke_listeners<I>(
        &self,
        node: TargetId<K>,
        phase: Phase,
        event: &mut Event<K>,
        invoker: &mut I,
    ) -> Result<(), I::Error>
    where
        I: HandlerInvoker<K, H>,
    {
        event.set_current_target(Some(node));
        let Some(target) = self.existing_target(node) else {
            return Ok(());
        };
        let snapshot = target.listeners(event.event_type(), phase);
        for listener in &snapshot {
            log::trace!("invoking `{}` listener on {node:?} ({phase:?})", event.event_type());
            let ret = invoker.invoke(listener, event)?;
            if listener.is_property_handler() && ret == HandlerReturn::Bool(false) {
                event.prevent_default();
            }
            if event.immediate_propagation_stopped() {
                break;
            }
        }
        Ok(())
    }

    fn forward_label_activation<I>(
        &self,
        target: K,
        event: &Event<K>,
        invoker: &mut I,
    ) -> Result<(), DispatchError<I::Error>>
    where
        I: HandlerInvoker<K, H>,
    {
        if !self.config.label_forwarding
            || !event.event_type().eq_ignore_ascii_case(CLICK)
            || event.is_forwarded_activation()
            || event.propagation_stopped()
            || event.default_prevented()
        {
            return Ok(());
        }
        let Some(label) = self.nearest_label(target) else {
            return Ok(());
        };
        let Some(control) = self.dom.labeled_control(&label) else {
            return Ok(());
        };
        if self.is_between(control, target, label) {
            return Ok(());
        }
        log::debug!("forwarding click from label {label:?} to {control:?}");
        let mut forwarded = event.forwarded_activation();
        self.dispatch(control, &mut forwarded, invoker)?;
        Ok(())
    }

    /// Whether `node` lies on the ancestor chain from `from` up to `until`.
    fn is_between(&self, node: K, from: K, until: K) -> bool {
        let mut cur = Some(from);
        while let Some(n) = cur {
            if n == node {
                return true;
            }
            if n == until {
                return false;
            }
            cur = self.dom.parent_of(&n);
        }
        false
    }

    fn nearest_label(&self, from: K) -> Option<K> {
        let mut node = Some(from);
        while let Some(n) = node {
            if self.dom.is_label(&n) {
                return Some(n);
            }
            node = self.dom.parent_of(&n);
        }
        None
    }
}
