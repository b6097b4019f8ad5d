//! Outbound events.
//!
//! Everything the panel reports travels as one of two shapes:
//!
//! - a state event, `topic = value` (current page, dim level, input N, ...)
//! - an object attribute event, serialized as a one-entry document:
//!   `{"p[<page>].b[<object>].<attribute>":"<value>"}`
//!
//! The transports decide where these strings go; this module only formats
//! them. Semantic button events carry the wire names the original panels
//! reported (`DOWN`, `UP`, `SHORT`, ...), so existing automations keep
//! matching.

use core::fmt::Write;

use heapless::String;

/// Capacity of a formatted attribute value
pub const EVENT_VALUE_LEN: usize = 64;

/// Capacity of a formatted object-attribute document
pub const EVENT_DOC_LEN: usize = 192;

/// A formatted attribute value
pub type ObjectValue = String<EVENT_VALUE_LEN>;

/// Semantic event from a debounced physical input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Press confirmed
    Down,
    /// Release after a long press cycle
    Up,
    /// Press and release within the click window
    Short,
    /// Held past the long-press threshold
    Long,
    /// Repeat fire while held past the long-press threshold
    Hold,
    /// Second short press within the double-click window
    Double,
    /// Interrupted or unrecognized transition, slot reset to idle
    Lost,
}

impl ButtonEvent {
    /// Wire name reported to transports
    pub fn name(self) -> &'static str {
        match self {
            ButtonEvent::Down => "DOWN",
            ButtonEvent::Up => "UP",
            ButtonEvent::Short => "SHORT",
            ButtonEvent::Long => "LONG",
            ButtonEvent::Hold => "HOLD",
            ButtonEvent::Double => "DOUBLE",
            ButtonEvent::Lost => "LOST",
        }
    }

    /// Boolean state this event drives onto output groups.
    ///
    /// Down and the held classifications assert the group; releases and
    /// completed click cycles deassert it.
    pub fn logical_state(self) -> bool {
        matches!(
            self,
            ButtonEvent::Down | ButtonEvent::Long | ButtonEvent::Hold | ButtonEvent::Double
        )
    }
}

/// Format an integer attribute value
pub fn value_str(val: i32) -> ObjectValue {
    let mut s = ObjectValue::new();
    // i32 always fits in EVENT_VALUE_LEN characters
    let _ = write!(s, "{}", val);
    s
}

/// Format an RGB color attribute value as `#rrggbb`
pub fn color_str(r: u8, g: u8, b: u8) -> ObjectValue {
    let mut s = ObjectValue::new();
    let _ = write!(s, "#{:02x}{:02x}{:02x}", r, g, b);
    s
}

/// Format an object attribute event document.
///
/// The value is truncated if the document would overflow its fixed
/// capacity; an oversized report is still better than none.
pub fn object_attr_doc(page: u8, obj: u8, attr: &str, value: &str) -> String<EVENT_DOC_LEN> {
    let mut doc = String::new();
    let _ = write!(doc, "{{\"p[{}].b[{}].{}\":\"{}\"}}", page, obj, attr, value);
    doc
}

/// State topic for a physical input slot, e.g. `input3`
pub fn input_topic(index: u8) -> String<8> {
    let mut topic = String::new();
    let _ = write!(topic, "input{}", index);
    topic
}
