//! Pin configuration table and the polling engine.
//!
//! Up to [`MAX_PIN_CONFIGS`] pins carry a persisted function record:
//! what the pin is (button, switch, relay, ...), which output group it
//! belongs to and its electrical mode. Records pack into a single `u32`
//! for the configuration document, one byte per field.
//!
//! Inputs get a debounce slot each; every semantic event is returned to
//! the caller for publishing, and the event's logical state is mirrored
//! onto all outputs sharing the input's group in the same poll cycle,
//! honoring each output's polarity.

use heapless::Vec;

use touchplate_protocol::ButtonEvent;

use super::debounce::{DebounceTimings, InputSlot};
use crate::settings::{Configurable, Settings};
use crate::traits::{PinIo, PinMode};

/// Maximum simultaneously debounced inputs
pub const MAX_INPUTS: usize = 4;

/// Maximum persisted pin function records
pub const MAX_PIN_CONFIGS: usize = 8;

/// Pin function, the role a board pin plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinKind {
    #[default]
    Free,
    Button,
    ButtonInverted,
    Switch,
    SwitchInverted,
    Relay,
    RelayInverted,
    Led,
    LedInverted,
    Pwm,
    PwmInverted,
}

impl PinKind {
    pub fn to_u8(self) -> u8 {
        match self {
            PinKind::Free => 0,
            PinKind::Button => 1,
            PinKind::ButtonInverted => 2,
            PinKind::Switch => 3,
            PinKind::SwitchInverted => 4,
            PinKind::Relay => 5,
            PinKind::RelayInverted => 6,
            PinKind::Led => 7,
            PinKind::LedInverted => 8,
            PinKind::Pwm => 9,
            PinKind::PwmInverted => 10,
        }
    }

    /// Decode from a packed record; unknown values free the pin
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => PinKind::Button,
            2 => PinKind::ButtonInverted,
            3 => PinKind::Switch,
            4 => PinKind::SwitchInverted,
            5 => PinKind::Relay,
            6 => PinKind::RelayInverted,
            7 => PinKind::Led,
            8 => PinKind::LedInverted,
            9 => PinKind::Pwm,
            10 => PinKind::PwmInverted,
            _ => PinKind::Free,
        }
    }

    pub fn is_input(self) -> bool {
        matches!(
            self,
            PinKind::Button | PinKind::ButtonInverted | PinKind::Switch | PinKind::SwitchInverted
        )
    }

    pub fn is_output(self) -> bool {
        matches!(
            self,
            PinKind::Relay
                | PinKind::RelayInverted
                | PinKind::Led
                | PinKind::LedInverted
                | PinKind::Pwm
                | PinKind::PwmInverted
        )
    }

    /// Electrically active-low / logically flipped variants
    pub fn inverted(self) -> bool {
        matches!(
            self,
            PinKind::ButtonInverted
                | PinKind::SwitchInverted
                | PinKind::RelayInverted
                | PinKind::LedInverted
                | PinKind::PwmInverted
        )
    }
}

/// One persisted pin function record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub pin: u8,
    pub group: u8,
    pub kind: PinKind,
    pub mode: PinMode,
}

impl PinConfig {
    /// Pack into the persisted `u32` layout: pin, group, kind, mode,
    /// one byte each from the low end
    pub fn packed(self) -> u32 {
        self.pin as u32
            | (self.group as u32) << 8
            | (self.kind.to_u8() as u32) << 16
            | (self.mode.to_u8() as u32) << 24
    }

    pub fn from_packed(v: u32) -> Self {
        Self {
            pin: v as u8,
            group: (v >> 8) as u8,
            kind: PinKind::from_u8((v >> 16) as u8),
            mode: PinMode::from_u8((v >> 24) as u8),
        }
    }

    pub fn is_free(self) -> bool {
        self.kind == PinKind::Free
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin belongs to the display or another critical peripheral
    ReservedPin,
    /// Configuration table full
    ConfigsFull,
}

/// Pin table, debounce slots and group mirroring
#[derive(Debug, Default)]
pub struct GpioEngine {
    configs: Vec<PinConfig, MAX_PIN_CONFIGS>,
    slots: Vec<InputSlot, MAX_INPUTS>,
    timings: DebounceTimings,
}

impl GpioEngine {
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            slots: Vec::new(),
            timings: DebounceTimings::default(),
        }
    }

    pub fn timings(&self) -> &DebounceTimings {
        &self.timings
    }

    pub fn set_timings(&mut self, timings: DebounceTimings) {
        self.timings = timings;
    }

    pub fn configs(&self) -> &[PinConfig] {
        &self.configs
    }

    /// Add one pin record; free records are dropped silently
    pub fn add_config<P: PinIo>(&mut self, pins: &P, cfg: PinConfig) -> Result<(), GpioError> {
        if cfg.is_free() {
            return Ok(());
        }
        if pins.is_reserved(cfg.pin) {
            return Err(GpioError::ReservedPin);
        }
        self.configs.push(cfg).map_err(|_| GpioError::ConfigsFull)
    }

    /// Apply the table to the hardware and claim debounce slots for the
    /// inputs. Clears any previously claimed slots first.
    ///
    /// An input past the slot capacity stays unbound; the rest of the
    /// table is still configured. Returns how many inputs went unbound.
    pub fn setup<P: PinIo>(&mut self, pins: &mut P) -> usize {
        self.slots.clear();
        let mut unbound = 0;
        for cfg in self.configs.iter() {
            pins.configure(cfg.pin, cfg.mode);
            if cfg.kind.is_input() {
                let slot = InputSlot::new(cfg.pin, cfg.group, cfg.kind.inverted());
                if self.slots.push(slot).is_err() {
                    unbound += 1;
                }
            }
        }
        unbound
    }

    /// Sample every input once. Returns `(slot index, event)` pairs and
    /// mirrors each event's logical state onto the slot's output group
    /// before returning.
    pub fn poll<P: PinIo>(&mut self, pins: &mut P, now: u32) -> Vec<(u8, ButtonEvent), MAX_INPUTS> {
        let mut events = Vec::new();
        let mut mirrors: Vec<(u8, bool), MAX_INPUTS> = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let raw = pins.read(slot.pin);
            if let Some(event) = slot.poll(&self.timings, now, raw) {
                if slot.group != 0 {
                    let _ = mirrors.push((slot.group, event.logical_state()));
                }
                let _ = events.push((index as u8, event));
            }
        }

        for (group, on) in mirrors {
            self.set_group_outputs(pins, group, on);
        }
        events
    }

    /// Drive every output in `group` to the logical state `on`,
    /// honoring each output's polarity
    pub fn set_group_outputs<P: PinIo>(&self, pins: &mut P, group: u8, on: bool) {
        for cfg in self.configs.iter() {
            if cfg.group == group && cfg.kind.is_output() {
                pins.write(cfg.pin, on ^ cfg.kind.inverted());
            }
        }
    }
}

impl Configurable for GpioEngine {
    fn get_config(&self, doc: &mut Settings) -> bool {
        let mut packed: Vec<u32, MAX_PIN_CONFIGS> = Vec::new();
        for cfg in self.configs.iter() {
            let _ = packed.push(cfg.packed());
        }
        // fixed-length array so documents compare stably
        while !packed.is_full() {
            let _ = packed.push(0);
        }
        doc.insert_array("config", &packed)
    }

    fn set_config(&mut self, doc: &Settings) -> bool {
        let Some(packed) = doc.array_of("config") else {
            return false;
        };
        let mut next: Vec<PinConfig, MAX_PIN_CONFIGS> = Vec::new();
        for &v in packed.iter().take(MAX_PIN_CONFIGS) {
            let cfg = PinConfig::from_packed(v);
            if !cfg.is_free() {
                let _ = next.push(cfg);
            }
        }
        if next == self.configs {
            return false;
        }
        self.configs = next;
        true
    }
}
