//! Raw pin access.
//!
//! Pins are addressed by their board number, matching how the persisted
//! pin-function records refer to them. The implementation is expected to
//! map PWM-capable pins itself; the engine only ever writes a boolean
//! level.

/// Electrical pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    #[default]
    Input,
    InputPullup,
    InputPulldown,
    Output,
}

impl PinMode {
    /// Wire value used in packed pin-function records
    pub fn to_u8(self) -> u8 {
        match self {
            PinMode::Input => 0,
            PinMode::InputPullup => 1,
            PinMode::InputPulldown => 2,
            PinMode::Output => 3,
        }
    }

    /// Decode from a packed record; unknown values fall back to `Input`
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => PinMode::InputPullup,
            2 => PinMode::InputPulldown,
            3 => PinMode::Output,
            _ => PinMode::Input,
        }
    }
}

/// Board pin hardware, as seen by the GPIO engine
pub trait PinIo {
    /// Configure a pin's electrical mode
    fn configure(&mut self, pin: u8, mode: PinMode);

    /// Sample the current level; `true` is high
    fn read(&self, pin: u8) -> bool;

    /// Drive an output level; PWM pins map `true` to full duty
    fn write(&mut self, pin: u8, high: bool);

    /// Whether this pin belongs to the display/touch driver or another
    /// system-critical peripheral and must never be rebound
    fn is_reserved(&self, pin: u8) -> bool;
}
