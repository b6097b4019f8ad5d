//! Touchplate command and event protocol
//!
//! This crate defines the textual protocol spoken over the panel's
//! transports (serial console, message-bus payloads):
//!
//! - inbound command lines, either a bare keyword or an object
//!   address path:
//!
//! ```text
//! keyword[=payload]
//! p[<page>].b[<object>].<attribute>[=payload]
//! ```
//!
//! - outbound state and object-attribute events, serialized as
//!   `topic = value` pairs and `{"p[1].b[2].txt":"..."}` documents.
//!
//! An empty payload means "query the current value"; a non-empty
//! payload means "set it". The dispatcher that acts on parsed commands
//! lives in `touchplate-core`; this crate never touches the widget tree.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod events;
pub mod line;

pub use command::{Command, ObjectPath, ParseError};
pub use events::{ButtonEvent, ObjectValue, EVENT_VALUE_LEN};
pub use line::{LineBuffer, LINE_BUFFER_SIZE};
