// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-(target, event type) listener storage.
//!
//! ## Overview
//!
//! A [`ListenerRegistry`] keeps three ordered lists:
//!
//! - `capturing`: listeners added with `capture = true`.
//! - `bubbling`: listeners added with `capture = false`, plus the property
//!   handler slot.
//! - `at_target`: every registration in installation order, plus the
//!   property handler slot. Only the at-target phase reads it.
//!
//! ## Copy-on-write
//!
//! The lists live in an immutable [`ListenerLists`] value behind an [`Arc`].
//! Every mutation computes a new value from the current one and swaps it in
//! ([`RegistryState`] is either `Empty` or `Populated`). A
//! [`ListenerSnapshot`] keeps the value it was taken from alive, so a
//! dispatcher iterating a snapshot never observes listeners added or removed
//! by the handlers it is calling. The internal lock only guards the
//! compute-and-swap step and is never held while a handler runs.
//!
//! ## Property handler slot
//!
//! The first non-null [`set_property_handler`](ListenerRegistry::set_property_handler)
//! appends a [`Listener::PropertyHandler`] entry. Replacing the handler keeps
//! the entry where it is; clearing removes it, and the next handler is
//! appended at the end again.

use std::sync::{Arc, Mutex, PoisonError};

use crate::types::{Listener, Phase};

/// The three listener lists of one registry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListenerLists<H> {
    capturing: Vec<Listener<H>>,
    bubbling: Vec<Listener<H>>,
    at_target: Vec<Listener<H>>,
}

impl<H> Default for ListenerLists<H> {
    fn default() -> Self {
        Self {
            capturing: Vec::new(),
            bubbling: Vec::new(),
            at_target: Vec::new(),
        }
    }
}

impl<H> ListenerLists<H> {
    /// Capturing-phase listeners.
    pub fn capturing(&self) -> &[Listener<H>] {
        &self.capturing
    }

    /// Bubbling-phase listeners, including the property handler slot.
    pub fn bubbling(&self) -> &[Listener<H>] {
        &self.bubbling
    }

    /// At-target listeners in installation order, including the property handler slot.
    pub fn at_target(&self) -> &[Listener<H>] {
        &self.at_target
    }

    /// The list consulted in `phase`.
    pub fn for_phase(&self, phase: Phase) -> &[Listener<H>] {
        match phase {
            Phase::None => &[],
            Phase::Capturing => &self.capturing,
            Phase::AtTarget => &self.at_target,
            Phase::Bubbling => &self.bubbling,
        }
    }

    fn is_empty(&self) -> bool {
        self.capturing.is_empty() && self.bubbling.is_empty() && self.at_target.is_empty()
    }

    fn property_handler(&self) -> Option<&H> {
        self.at_target.iter().find_map(|l| match l {
            Listener::PropertyHandler(h) => Some(h),
            Listener::Plain { .. } => None,
        })
    }
}

impl<H: Clone + PartialEq> ListenerLists<H> {
    fn phase_list(&self, capture: bool) -> &Vec<Listener<H>> {
        if capture {
            &self.capturing
        } else {
            &self.bubbling
        }
    }

    fn with_added(&self, handler: H, capture: bool) -> Option<Self> {
        if self
            .phase_list(capture)
            .iter()
            .any(|l| l.is_plain(&handler, capture))
        {
            return None;
        }
        let mut next = self.clone();
        let entry = Listener::Plain { handler, capture };
        if capture {
            next.capturing.push(entry.clone());
        } else {
            next.bubbling.push(entry.clone());
        }
        next.at_target.push(entry);
        Some(next)
    }

    fn with_removed(&self, handler: &H, capture: bool) -> Option<Self> {
        let pos = self
            .phase_list(capture)
            .iter()
            .position(|l| l.is_plain(handler, capture))?;
        let mut next = self.clone();
        if capture {
            next.capturing.remove(pos);
        } else {
            next.bubbling.remove(pos);
        }
        if let Some(at) = next.at_target.iter().position(|l| l.is_plain(handler, capture)) {
            next.at_target.remove(at);
        }
        Some(next)
    }

    fn with_property_handler(&self, handler: Option<H>) -> Option<Self> {
        let slot = |list: &[Listener<H>]| list.iter().position(Listener::is_property_handler);
        let at = slot(&self.at_target);
        let bubble = slot(&self.bubbling);
        let mut next = self.clone();
        match (handler, at) {
            (None, None) => return None,
            (None, Some(at)) => {
                next.at_target.remove(at);
                if let Some(b) = bubble {
                    next.bubbling.remove(b);
                }
            }
            (Some(h), Some(at)) => {
                next.at_target[at] = Listener::PropertyHandler(h.clone());
                match bubble {
                    Some(b) => next.bubbling[b] = Listener::PropertyHandler(h),
                    None => next.bubbling.push(Listener::PropertyHandler(h)),
                }
            }
            (Some(h), None) => {
                next.at_target.push(Listener::PropertyHandler(h.clone()));
                next.bubbling.push(Listener::PropertyHandler(h));
            }
        }
        Some(next)
    }
}

/// The swappable state of a [`ListenerRegistry`].
#[derive(Debug)]
pub enum RegistryState<H> {
    /// No listeners and no property handler.
    Empty,
    /// At least one entry in some list.
    Populated(Arc<ListenerLists<H>>),
}

impl<H> Clone for RegistryState<H> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Populated(lists) => Self::Populated(Arc::clone(lists)),
        }
    }
}

impl<H> RegistryState<H> {
    /// The lists, if any.
    pub fn lists(&self) -> Option<&Arc<ListenerLists<H>>> {
        match self {
            Self::Empty => None,
            Self::Populated(lists) => Some(lists),
        }
    }

    fn from_lists(lists: ListenerLists<H>) -> Self {
        if lists.is_empty() {
            Self::Empty
        } else {
            Self::Populated(Arc::new(lists))
        }
    }
}

/// An immutable view of one phase's listeners.
///
/// Holds the lists it was taken from, so it is unaffected by later mutation
/// of the registry.
#[derive(Debug)]
pub struct ListenerSnapshot<H> {
    lists: Option<Arc<ListenerLists<H>>>,
    phase: Phase,
}

impl<H> Clone for ListenerSnapshot<H> {
    fn clone(&self) -> Self {
        Self {
            lists: self.lists.clone(),
            phase: self.phase,
        }
    }
}

impl<H> ListenerSnapshot<H> {
    /// An empty snapshot for `phase`.
    pub fn empty(phase: Phase) -> Self {
        Self { lists: None, phase }
    }

    /// The phase this snapshot was taken for.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The listeners, in invocation order.
    pub fn as_slice(&self) -> &[Listener<H>] {
        match self.lists.as_deref() {
            Some(lists) => lists.for_phase(self.phase),
            None => &[],
        }
    }

    /// Iterate in invocation order.
    pub fn iter(&self) -> core::slice::Iter<'_, Listener<H>> {
        self.as_slice().iter()
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if there is nothing to invoke.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<'a, H> IntoIterator for &'a ListenerSnapshot<H> {
    type Item = &'a Listener<H>;
    type IntoIter = core::slice::Iter<'a, Listener<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Listeners for one event type on one target.
///
/// All operations take `&self`; concurrent callers never lose each other's
/// updates.
#[derive(Debug)]
pub struct ListenerRegistry<H> {
    state: Mutex<RegistryState<H>>,
}

impl<H> Default for ListenerRegistry<H> {
    fn default() -> Self {
        Self {
            state: Mutex::new(RegistryState::Empty),
        }
    }
}

impl<H: Clone + PartialEq> ListenerRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state value.
    pub fn state(&self) -> RegistryState<H> {
        self.lock().clone()
    }

    /// Register `handler` for the capturing (`capture = true`) or bubbling phase.
    ///
    /// Returns `false` if the same handler is already registered for that phase.
    pub fn add(&self, handler: H, capture: bool) -> bool {
        self.compute(|lists| lists.with_added(handler, capture))
    }

    /// Unregister `handler` from the given phase.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&self, handler: &H, capture: bool) -> bool {
        self.compute(|lists| lists.with_removed(handler, capture))
    }

    /// Install, replace, or clear (`None`) the property handler.
    pub fn set_property_handler(&self, handler: Option<H>) {
        self.compute(|lists| lists.with_property_handler(handler));
    }

    /// The current property handler.
    pub fn property_handler(&self) -> Option<H> {
        self.state()
            .lists()
            .and_then(|lists| lists.property_handler().cloned())
    }

    /// A stable snapshot of the listeners `phase` invokes.
    pub fn listeners_for(&self, phase: Phase) -> ListenerSnapshot<H> {
        ListenerSnapshot {
            lists: self.state().lists().cloned(),
            phase,
        }
    }

    /// Number of listeners `phase` invokes.
    pub fn len(&self, phase: Phase) -> usize {
        self.listeners_for(phase).len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        matches!(*self.lock(), RegistryState::Empty)
    }

    /// Replace the state with `f(state)`; `f` returns `None` for "no change".
    ///
    /// Returns whether the state changed.
    fn compute(&self, f: impl FnOnce(&ListenerLists<H>) -> Option<ListenerLists<H>>) -> bool {
        let mut state = self.lock();
        let empty = ListenerLists::default();
        let current = state.lists().map_or(&empty, |lists| &**lists);
        match f(current) {
            Some(next) => {
                *state = RegistryState::from_lists(next);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState<H>> {
        // The state is only ever replaced whole, so a poisoned lock still holds a valid value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
