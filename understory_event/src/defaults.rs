// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type `bubbles`/`cancelable` defaults and well-known event type names.
//!
//! Types not listed here bubble and are cancelable. An explicit
//! [`EventInit`](crate::event::EventInit) overrides the table.

/// `bubbles` and `cancelable` for an event type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EventDefaults {
    /// Whether the event takes part in the bubbling phase.
    pub bubbles: bool,
    /// Whether `prevent_default` has an effect.
    pub cancelable: bool,
}

impl EventDefaults {
    /// Defaults for types missing from the table.
    pub const UNLISTED: Self = Self::new(true, true);

    const fn new(bubbles: bool, cancelable: bool) -> Self {
        Self {
            bubbles,
            cancelable,
        }
    }
}

/// The primary activation event.
pub const CLICK: &str = "click";
/// Fired on the document and window when loading completes.
pub const LOAD: &str = "load";
/// Fired when a form control's committed value changes.
pub const CHANGE: &str = "change";

const NN: EventDefaults = EventDefaults::new(false, false);
const NC: EventDefaults = EventDefaults::new(false, true);
const BN: EventDefaults = EventDefaults::new(true, false);
const BC: EventDefaults = EventDefaults::new(true, true);

/// Sorted by lower-cased name for binary search.
static TABLE: &[(&str, EventDefaults)] = &[
    ("abort", NN),
    ("afterprint", NN),
    ("animationend", BN),
    ("animationstart", BN),
    ("auxclick", BC),
    ("beforeinput", BC),
    ("beforeprint", NN),
    ("beforeunload", NC),
    ("blur", NN),
    ("cancel", NC),
    ("canplay", NN),
    ("change", BN),
    ("click", BC),
    ("close", NN),
    ("compositionend", BC),
    ("compositionstart", BC),
    ("contextmenu", BC),
    ("copy", BC),
    ("cut", BC),
    ("dblclick", BC),
    ("domattrmodified", BN),
    ("domcharacterdatamodified", BN),
    ("domcontentloaded", BC),
    ("domnodeinserted", BN),
    ("domnodeinsertedintodocument", NN),
    ("domnoderemoved", BN),
    ("domnoderemovedfromdocument", NN),
    ("domsubtreemodified", BN),
    ("drag", BC),
    ("dragend", BN),
    ("dragenter", BC),
    ("dragleave", BN),
    ("dragover", BC),
    ("dragstart", BC),
    ("drop", BC),
    ("ended", NN),
    ("error", NC),
    ("focus", NN),
    ("focusin", BN),
    ("focusout", BN),
    ("hashchange", NN),
    ("input", BN),
    ("invalid", NC),
    ("keydown", BC),
    ("keypress", BC),
    ("keyup", BC),
    ("load", NN),
    ("loadend", NN),
    ("loadstart", NN),
    ("message", NN),
    ("mousedown", BC),
    ("mouseenter", NN),
    ("mouseleave", NN),
    ("mousemove", BC),
    ("mouseout", BC),
    ("mouseover", BC),
    ("mouseup", BC),
    ("offline", NN),
    ("online", NN),
    ("pagehide", NN),
    ("pageshow", NN),
    ("paste", BC),
    ("pointercancel", BN),
    ("pointerdown", BC),
    ("pointerenter", NN),
    ("pointerleave", NN),
    ("pointermove", BC),
    ("pointerout", BC),
    ("pointerover", BC),
    ("pointerup", BC),
    ("popstate", NN),
    ("progress", NN),
    ("readystatechange", NN),
    ("reset", BC),
    ("resize", NN),
    ("scroll", NN),
    ("select", BN),
    ("selectionchange", NN),
    ("storage", NN),
    ("submit", BC),
    ("timeout", NN),
    ("toggle", NN),
    ("touchcancel", BN),
    ("touchend", BC),
    ("touchmove", BC),
    ("touchstart", BC),
    ("transitionend", BN),
    ("unload", NN),
    ("visibilitychange", BN),
    ("wheel", BC),
];

/// Look up the defaults for `event_type` (ASCII case-insensitive).
pub fn defaults_for(event_type: &str) -> EventDefaults {
    let key = event_type.to_ascii_lowercase();
    TABLE
        .binary_search_by(|(name, _)| (*name).cmp(key.as_str()))
        .map(|i| TABLE[i].1)
        .unwrap_or(EventDefaults::UNLISTED)
}
