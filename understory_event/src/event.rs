// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The in-flight event: identity, dispatch state, and subtype payloads.
//!
//! ## Overview
//!
//! [`Event`] carries the state the dispatcher reads and listeners mutate:
//! the phase, the target and current target, the propagation flags and the
//! canceled flag. Subtype data (pointer position, key codes, progress, custom
//! detail) lives in [`EventPayload`] and never influences propagation.
//!
//! ## Cancellation
//!
//! - [`Event::stop_propagation`] finishes the current node's listener list,
//!   then stops.
//! - [`Event::stop_immediate_propagation`] stops after the current listener.
//! - [`Event::prevent_default`] only has an effect when the event is
//!   cancelable; otherwise it is silently ignored, as in browsers.
//!
//! The stop flags are monotonic: once set they stay set.

use kurbo::{Point, Vec2};

use crate::defaults::{EventDefaults, defaults_for};
use crate::types::{Phase, TargetId};

/// Explicit overrides for the per-type defaults.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EventInit {
    /// Overrides the table's `bubbles`.
    pub bubbles: Option<bool>,
    /// Overrides the table's `cancelable`.
    pub cancelable: Option<bool>,
}

/// An event being (or about to be) dispatched.
///
/// Construct with [`Event::new`] or [`Event::with_init`], then hand a mutable
/// reference to [`Dispatcher::dispatch`](crate::dispatcher::Dispatcher::dispatch).
/// `K` is the document's node key type.
#[derive(Clone, Debug)]
pub struct Event<K> {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    phase: Phase,
    target: Option<TargetId<K>>,
    current_target: Option<TargetId<K>>,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
    timestamp: u64,
    trusted: bool,
    // In-flight marker; re-dispatch while set is refused.
    dispatching: bool,
    // Set once the first dispatch starts; freezes the type.
    dispatched: bool,
    // Synthesized by label forwarding; never forwarded again.
    forwarded_activation: bool,
    payload: EventPayload,
}

impl<K: Copy> Event<K> {
    /// Create an event with the table defaults for `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::with_init(event_type, EventInit::default())
    }

    /// Create an event, overriding table defaults where `init` says so.
    pub fn with_init(event_type: impl Into<String>, init: EventInit) -> Self {
        let event_type = event_type.into();
        let EventDefaults {
            bubbles,
            cancelable,
        } = defaults_for(&event_type);
        Self {
            event_type,
            bubbles: init.bubbles.unwrap_or(bubbles),
            cancelable: init.cancelable.unwrap_or(cancelable),
            phase: Phase::None,
            target: None,
            current_target: None,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            default_prevented: false,
            timestamp: now_millis(),
            trusted: false,
            dispatching: false,
            dispatched: false,
            forwarded_activation: false,
            payload: EventPayload::None,
        }
    }

    /// Attach a subtype payload.
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Mark the event as generated by the runtime on behalf of the user.
    pub fn with_trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    /// Replace the construction timestamp (milliseconds since the Unix epoch).
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Legacy re-initialisation of type and flags.
    ///
    /// Returns `false` and changes nothing once the event has been dispatched.
    pub fn init_event(
        &mut self,
        event_type: impl Into<String>,
        bubbles: bool,
        cancelable: bool,
    ) -> bool {
        if self.dispatched {
            return false;
        }
        self.event_type = event_type.into();
        self.bubbles = bubbles;
        self.cancelable = cancelable;
        true
    }

    /// The event type, as given at construction.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Whether the event takes part in the bubbling phase.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Whether [`Event::prevent_default`] has an effect.
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Current propagation phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The dispatch target, once dispatch has started.
    pub fn target(&self) -> Option<TargetId<K>> {
        self.target
    }

    /// The target whose listeners are currently running.
    pub fn current_target(&self) -> Option<TargetId<K>> {
        self.current_target
    }

    /// Whether propagation to further targets was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Whether propagation to further listeners was stopped.
    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// Whether the default action was canceled.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Construction time in milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Whether the runtime (rather than a script) created the event.
    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// Whether the event is in flight.
    pub fn is_dispatching(&self) -> bool {
        self.dispatching
    }

    /// Whether this is an activation synthesized by label forwarding.
    pub fn is_forwarded_activation(&self) -> bool {
        self.forwarded_activation
    }

    /// Subtype payload.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Mutable subtype payload.
    pub fn payload_mut(&mut self) -> &mut EventPayload {
        &mut self.payload
    }

    /// Stop propagation once the current target's listeners have run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation immediately, skipping the current target's remaining listeners.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Cancel the default action. Ignored for non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Whether the default action should run: `false` only when a cancelable
    /// event was canceled.
    pub fn should_proceed(&self) -> bool {
        !(self.cancelable && self.default_prevented)
    }

    pub(crate) fn begin_dispatch(&mut self, target: TargetId<K>) {
        self.dispatching = true;
        self.dispatched = true;
        self.target = Some(target);
    }

    /// Advance the phase. Only forward moves (or the final reset) are legal;
    /// anything else is an engine bug.
    pub(crate) fn set_phase(&mut self, phase: Phase) {
        assert!(
            phase == Phase::None || phase > self.phase,
            "illegal phase transition {:?} -> {:?}",
            self.phase,
            phase
        );
        self.phase = phase;
    }

    pub(crate) fn set_current_target(&mut self, target: Option<TargetId<K>>) {
        self.current_target = target;
    }

    pub(crate) fn end_dispatch(&mut self) {
        self.set_phase(Phase::None);
        self.current_target = None;
        self.dispatching = false;
    }

    /// A fresh activation carrying this event's payload and trust, flagged
    /// so it is never forwarded again.
    pub(crate) fn forwarded_activation(&self) -> Self {
        let mut event = Self::new(self.event_type.clone())
            .with_payload(self.payload.clone())
            .with_trusted(self.trusted)
            .with_timestamp(self.timestamp);
        event.forwarded_activation = true;
        event
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Subtype-specific data.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventPayload {
    /// Plain `Event`.
    #[default]
    None,
    /// `UIEvent` with a detail count.
    Ui(UiDetail),
    /// `MouseEvent`.
    Mouse(MouseDetail),
    /// `WheelEvent`.
    Wheel(WheelDetail),
    /// `KeyboardEvent`.
    Keyboard(KeyboardDetail),
    /// `ProgressEvent`.
    Progress(ProgressDetail),
    /// Legacy `MutationEvent`.
    Mutation(MutationDetail),
    /// `CustomEvent`.
    Custom(CustomDetail),
}

/// `UIEvent` data.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UiDetail {
    /// Event-specific count (e.g. click count).
    pub detail: i32,
}

bitflags::bitflags! {
    /// Modifier keys held while the event was generated.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command.
        const META    = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Buttons held during a mouse event, using the DOM `buttons` bit values.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u16 {
        /// Usually the left button.
        const PRIMARY   = 1;
        /// Usually the right button.
        const SECONDARY = 2;
        /// Usually the wheel button.
        const AUXILIARY = 4;
        /// Browser back.
        const BACK      = 8;
        /// Browser forward.
        const FORWARD   = 16;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for MouseButtons {
    fn default() -> Self {
        Self::empty()
    }
}

/// The button whose state change caused a mouse event.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MouseButton {
    /// Usually the left button.
    #[default]
    Main,
    /// Usually the wheel button.
    Auxiliary,
    /// Usually the right button.
    Secondary,
    /// Browser back.
    Back,
    /// Browser forward.
    Forward,
}

impl MouseButton {
    /// The DOM `button` value.
    pub const fn dom_code(self) -> i16 {
        match self {
            Self::Main => 0,
            Self::Auxiliary => 1,
            Self::Secondary => 2,
            Self::Back => 3,
            Self::Forward => 4,
        }
    }
}

/// `MouseEvent` data.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MouseDetail {
    /// Position relative to the viewport.
    pub client: Point,
    /// Position relative to the screen.
    pub screen: Point,
    /// Button that changed state.
    pub button: MouseButton,
    /// Buttons held.
    pub buttons: MouseButtons,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Click count.
    pub detail: i32,
}

/// Units of a wheel delta.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DeltaMode {
    /// Pixels.
    #[default]
    Pixel,
    /// Lines.
    Line,
    /// Pages.
    Page,
}

/// `WheelEvent` data.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelDetail {
    /// Pointer state.
    pub mouse: MouseDetail,
    /// Horizontal and vertical scroll amount.
    pub delta: Vec2,
    /// Units of `delta`.
    pub delta_mode: DeltaMode,
}

/// Physical location of a key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum KeyLocation {
    /// Not a left/right/numpad key.
    #[default]
    Standard,
    /// Left-hand variant.
    Left,
    /// Right-hand variant.
    Right,
    /// Numeric keypad.
    Numpad,
}

/// `KeyboardEvent` data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyboardDetail {
    /// Key value, e.g. `"a"` or `"Enter"`.
    pub key: String,
    /// Physical key code, e.g. `"KeyA"`.
    pub code: String,
    /// Legacy `keyCode`.
    pub key_code: u32,
    /// Legacy `charCode`.
    pub char_code: u32,
    /// Key location.
    pub location: KeyLocation,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Auto-repeat.
    pub repeat: bool,
}

/// `ProgressEvent` data.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ProgressDetail {
    /// Bytes processed.
    pub loaded: u64,
    /// Total bytes, when known.
    pub total: Option<u64>,
}

impl ProgressDetail {
    /// Whether `total` is known.
    pub fn length_computable(&self) -> bool {
        self.total.is_some()
    }
}

/// Kind of attribute change in a mutation event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AttrChange {
    /// Value changed.
    Modification,
    /// Attribute added.
    Addition,
    /// Attribute removed.
    Removal,
}

/// Legacy `MutationEvent` data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MutationDetail {
    /// Attribute name for attribute mutations.
    pub attr_name: Option<String>,
    /// Previous value.
    pub prev_value: Option<String>,
    /// New value.
    pub new_value: Option<String>,
    /// Kind of attribute change.
    pub attr_change: Option<AttrChange>,
}

/// `CustomEvent` data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CustomDetail {
    /// Serialized detail value, if any.
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_table() {
        let change: Event<u32> = Event::new("change");
        assert!(change.bubbles());
        assert!(!change.cancelable());
        let load: Event<u32> = Event::new("load");
        assert!(!load.bubbles());
        let custom: Event<u32> = Event::new("x-thing");
        assert!(custom.bubbles() && custom.cancelable());
        assert_eq!(custom.phase(), Phase::None);
        assert_eq!(custom.target(), None);
    }

    #[test]
    fn init_overrides_table() {
        let e: Event<u32> = Event::with_init(
            "click",
            EventInit {
                bubbles: Some(false),
                cancelable: None,
            },
        );
        assert!(!e.bubbles());
        assert!(e.cancelable());
    }

    #[test]
    fn prevent_default_requires_cancelable() {
        let mut e: Event<u32> = Event::new("change");
        e.prevent_default();
        assert!(!e.default_prevented());
        assert!(e.should_proceed());

        let mut e: Event<u32> = Event::new("click");
        e.prevent_default();
        assert!(e.default_prevented());
        assert!(!e.should_proceed());
    }

    #[test]
    fn immediate_stop_implies_stop() {
        let mut e: Event<u32> = Event::new("click");
        e.stop_immediate_propagation();
        assert!(e.propagation_stopped());
        assert!(e.immediate_propagation_stopped());

        let mut e: Event<u32> = Event::new("click");
        e.stop_propagation();
        assert!(e.propagation_stopped());
        assert!(!e.immediate_propagation_stopped());
    }

    #[test]
    fn init_event_only_before_dispatch() {
        let mut e: Event<u32> = Event::new("click");
        assert!(e.init_event("keydown", false, false));
        assert_eq!(e.event_type(), "keydown");
        assert!(!e.bubbles());

        e.begin_dispatch(TargetId::Node(1));
        e.end_dispatch();
        assert!(!e.init_event("keyup", true, true));
        assert_eq!(e.event_type(), "keydown");
    }

    #[test]
    fn phase_moves_forward_then_resets() {
        let mut e: Event<u32> = Event::new("click");
        e.begin_dispatch(TargetId::Node(1));
        e.set_phase(Phase::Capturing);
        e.set_phase(Phase::AtTarget);
        e.set_phase(Phase::Bubbling);
        e.end_dispatch();
        assert_eq!(e.phase(), Phase::None);
        assert!(!e.is_dispatching());
        assert_eq!(e.target(), Some(TargetId::Node(1)));
        assert_eq!(e.current_target(), None);
    }

    #[test]
    #[should_panic(expected = "illegal phase transition")]
    fn backward_phase_is_a_bug() {
        let mut e: Event<u32> = Event::new("click");
        e.set_phase(Phase::Bubbling);
        e.set_phase(Phase::Capturing);
    }

    #[test]
    fn forwarded_activation_keeps_payload_and_trust() {
        let detail = MouseDetail {
            client: Point::new(3.0, 4.0),
            buttons: MouseButtons::PRIMARY,
            modifiers: Modifiers::SHIFT | Modifiers::CONTROL,
            detail: 1,
            ..MouseDetail::default()
        };
        let mut source: Event<u32> = Event::new("click")
            .with_payload(EventPayload::Mouse(detail))
            .with_trusted(true);
        source.prevent_default();
        let fwd = source.forwarded_activation();
        assert!(fwd.is_forwarded_activation());
        assert!(fwd.is_trusted());
        assert!(!fwd.default_prevented());
        assert_eq!(fwd.payload(), &EventPayload::Mouse(detail));
        assert_eq!(fwd.timestamp(), source.timestamp());
    }

    #[test]
    fn payload_helpers() {
        assert_eq!(MouseButton::Secondary.dom_code(), 2);
        assert!(
            ProgressDetail {
                loaded: 10,
                total: Some(20)
            }
            .length_computable()
        );
        assert!(!ProgressDetail::default().length_computable());
    }
}
