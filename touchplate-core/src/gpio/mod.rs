//! Physical input/output handling.
//!
//! [`debounce`] holds the per-input state machine that turns raw pin
//! levels into semantic button events; [`engine`] owns the pin
//! configuration table, drives the slots and mirrors input state onto
//! output groups.

pub mod debounce;
pub mod engine;

pub use debounce::{DebounceTimings, InputSlot};
pub use engine::{GpioEngine, GpioError, PinConfig, PinKind, MAX_INPUTS, MAX_PIN_CONFIGS};
