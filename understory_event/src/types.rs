// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the event runtime: phases, target identities, listeners,
//! and the collaborator traits.
//!
//! ## Overview
//!
//! These types describe the protocol between the engine and its two
//! collaborators: the document (via [`DomLookup`]) and the scripting host
//! (via [`HandlerInvoker`]).
//! They are referenced by the [`dispatcher`](crate::dispatcher) and the
//! [`registry`](crate::registry).

use crate::error::EventError;
use crate::event::Event;

/// Phases of event propagation.
///
/// The dispatcher moves an event through `None → Capturing → AtTarget →
/// Bubbling` and back to `None` once dispatch finishes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Phase {
    /// Not being dispatched.
    #[default]
    None,
    /// Root-to-parent traversal.
    Capturing,
    /// The target itself.
    AtTarget,
    /// Parent-to-root traversal.
    Bubbling,
}

impl Phase {
    /// The numeric `eventPhase` value scripts observe (0 through 3).
    pub const fn dom_code(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Capturing => 1,
            Self::AtTarget => 2,
            Self::Bubbling => 3,
        }
    }

    /// Parse a numeric `eventPhase` value.
    pub const fn from_dom_code(code: u16) -> Result<Self, EventError> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Capturing),
            2 => Ok(Self::AtTarget),
            3 => Ok(Self::Bubbling),
            other => Err(EventError::InvalidPhase(other)),
        }
    }
}

impl TryFrom<u16> for Phase {
    type Error = EventError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_dom_code(code)
    }
}

/// Identity of something that can own listeners.
///
/// Nodes are named by the document's own key type `K`. `Window` is the
/// root-level pseudo-target appended after the document node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetId<K> {
    /// A node of the document.
    Node(K),
    /// The window-equivalent root pseudo-target.
    Window,
}

impl<K: Copy> TargetId<K> {
    /// The node key, if this names a node.
    pub fn node(&self) -> Option<K> {
        match self {
            Self::Node(k) => Some(*k),
            Self::Window => None,
        }
    }
}

impl<K> From<K> for TargetId<K> {
    fn from(node: K) -> Self {
        Self::Node(node)
    }
}

/// An entry in a listener list.
///
/// `H` is the scripting host's handle for a callable. Two listeners are the
/// same registration when their handles compare equal and they were added for
/// the same phase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Listener<H> {
    /// Registered with `add_event_listener`.
    Plain {
        /// Host handle for the callable.
        handler: H,
        /// Whether it was registered for the capturing phase.
        capture: bool,
    },
    /// Installed through an `onX` property; at most one per event type.
    PropertyHandler(H),
}

impl<H> Listener<H> {
    /// The host handle.
    pub fn handler(&self) -> &H {
        match self {
            Self::Plain { handler, .. } | Self::PropertyHandler(handler) => handler,
        }
    }

    /// Returns true for the property handler slot.
    pub fn is_property_handler(&self) -> bool {
        matches!(self, Self::PropertyHandler(_))
    }

    pub(crate) fn is_plain(&self, handler: &H, capture: bool) -> bool
    where
        H: PartialEq,
    {
        matches!(self, Self::Plain { handler: h, capture: c } if h == handler && *c == capture)
    }
}

/// What a handler returned, as far as the engine cares.
///
/// A property handler returning `Bool(false)` cancels the event (the legacy
/// `return false` idiom). Plain listener return values are ignored.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum HandlerReturn {
    /// Nothing, or a value the engine does not interpret.
    #[default]
    Undefined,
    /// A boolean result.
    Bool(bool),
}

/// The scripting host: runs a listener's body against an event.
///
/// Implemented for any `FnMut(&Listener<H>, &mut Event<K>) -> Result<HandlerReturn, E>`.
/// An `Err` aborts the dispatch and is returned to the dispatch caller unchanged.
pub trait HandlerInvoker<K, H> {
    /// Failure raised by a handler body.
    type Error;

    /// Invoke one listener. The event's `current_target` and `phase` are already set.
    fn invoke(
        &mut self,
        listener: &Listener<H>,
        event: &mut Event<K>,
    ) -> Result<HandlerReturn, Self::Error>;
}

impl<K, H, E, F> HandlerInvoker<K, H> for F
where
    F: FnMut(&Listener<H>, &mut Event<K>) -> Result<HandlerReturn, E>,
{
    type Error = E;

    fn invoke(
        &mut self,
        listener: &Listener<H>,
        event: &mut Event<K>,
    ) -> Result<HandlerReturn, Self::Error> {
        self(listener, event)
    }
}

/// Read access to the document tree for path construction and default actions.
///
/// The dispatcher consults this to build the propagation path from a target
/// node up to its root, to decide whether the root is a document (and so
/// whether the [`TargetId::Window`] pseudo-target joins the path), and to find
/// label/control associations for click forwarding.
pub trait DomLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Returns true if `node` is a document-level node.
    fn is_document(&self, node: &K) -> bool;

    /// Whether `node` reacts to `event_type` at all. Defaults to `true`.
    fn handles(&self, _node: &K, _event_type: &str) -> bool {
        true
    }

    /// Returns true if `node` is label-like (can forward activation).
    fn is_label(&self, _node: &K) -> bool {
        false
    }

    /// The control a label-like `node` forwards activation to.
    fn labeled_control(&self, _node: &K) -> Option<K> {
        None
    }
}

impl<K, T: DomLookup<K> + ?Sized> DomLookup<K> for &T {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }

    fn is_document(&self, node: &K) -> bool {
        (**self).is_document(node)
    }

    fn handles(&self, node: &K, event_type: &str) -> bool {
        (**self).handles(node, event_type)
    }

    fn is_label(&self, node: &K) -> bool {
        (**self).is_label(node)
    }

    fn labeled_control(&self, node: &K) -> Option<K> {
        (**self).labeled_control(node)
    }
}

/// A lookup with no tree: every node is a detached singleton.
///
/// Useful for standalone targets and for tests that only exercise the
/// at-target phase.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDom;

impl<K> DomLookup<K> for NoDom {
    #[inline]
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }

    #[inline]
    fn is_document(&self, _node: &K) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_codes_round_trip() {
        for phase in [
            Phase::None,
            Phase::Capturing,
            Phase::AtTarget,
            Phase::Bubbling,
        ] {
            assert_eq!(Phase::from_dom_code(phase.dom_code()), Ok(phase));
        }
        assert_eq!(Phase::try_from(4), Err(EventError::InvalidPhase(4)));
    }

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::None < Phase::Capturing);
        assert!(Phase::Capturing < Phase::AtTarget);
        assert!(Phase::AtTarget < Phase::Bubbling);
    }

    #[test]
    fn listener_identity_includes_capture_flag() {
        let l = Listener::Plain {
            handler: 7_u32,
            capture: true,
        };
        assert!(l.is_plain(&7, true));
        assert!(!l.is_plain(&7, false));
        assert!(!Listener::PropertyHandler(7_u32).is_plain(&7, false));
        assert_eq!(*Listener::PropertyHandler(3_u32).handler(), 3);
    }

    #[test]
    fn target_id_from_node() {
        let t: TargetId<u32> = 5.into();
        assert_eq!(t.node(), Some(5));
        assert_eq!(TargetId::<u32>::Window.node(), None);
    }
}
