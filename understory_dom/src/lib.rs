// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DOM: a minimal arena document tree for simulated interaction.
//!
//! This crate models just enough of a parsed document for an event runtime to
//! walk: node kinds, parent/child links, attributes, and a handful of
//! event-relevant queries (`handles`, disabled state, label association).
//! It does not parse HTML, compute styles, or lay anything out.
//!
//! ## API overview
//!
//! - [`Document`]: the arena; owns the document node and every created node.
//! - [`NodeId`]: generational handle of a node.
//! - [`NodeKind`]: document, element, text, or comment.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_dom::Document;
//!
//! let mut doc = Document::new();
//! let label = doc.create_element("label");
//! let input = doc.create_element("input");
//! doc.append_child(doc.root(), label);
//! doc.append_child(label, input);
//!
//! assert!(doc.is_connected(input));
//! assert_eq!(doc.labeled_control(label), Some(input));
//!
//! doc.set_attribute(input, "disabled", "");
//! assert!(!doc.handles(input, "click"));
//! ```

mod document;
mod types;

pub use document::Document;
pub use types::{NodeId, NodeKind};
