//! Outbound event sink.
//!
//! A transport is anything that can carry panel state to the outside:
//! the message-bus client, the serial console, a slave link. The
//! dispatcher hands over structured tuples; how they are framed is the
//! transport's business. A transport that is not currently connected
//! should log events locally rather than fail - the dispatcher never
//! receives a delivery error.

/// Sink for outbound state and object-attribute events
pub trait Transport {
    /// Whether the transport is currently connected/usable
    fn active(&self) -> bool;

    /// Publish a `topic = value` state event
    fn send_state(&mut self, topic: &str, value: &str);

    /// Publish an object attribute event for `p[page].b[obj].attr`
    fn send_object_attr(&mut self, page: u8, obj: u8, attr: &str, value: &str);

    /// Orderly shutdown ahead of a reboot; further sends are dropped
    fn stop(&mut self);
}
