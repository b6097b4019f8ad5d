//! Per-input debounce and click classification.
//!
//! Raw levels go in at every poll, semantic events come out:
//!
//! - `Down` once a press survives the debounce window
//! - `Short` on release inside the click window
//! - `Double` instead of `Short` when a second click lands inside the
//!   double-click window
//! - `Long` once the hold passes the long-press threshold, then `Hold`
//!   at the repeat interval, and `Up` on the eventual release
//! - `Up` alone when the press outlives the click window without
//!   reaching the long threshold; such a release is not a click
//! - `Lost` when the clock runs backwards; the slot resets to idle
//!
//! Times are milliseconds on a monotonic 32-bit clock. Emission order
//! within one press cycle is fixed; at most one event per poll.

use touchplate_protocol::ButtonEvent;

/// Debounce and classification windows, milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceTimings {
    /// Stable time required to accept a level change
    pub debounce_ms: u16,
    /// Press released within this window classifies as a click; a
    /// slower non-long release reports plain `Up`
    pub click_ms: u16,
    /// Press longer than this fires `Long`
    pub long_ms: u16,
    /// `Hold` repeat interval after `Long`
    pub repeat_ms: u16,
    /// Second click within this window upgrades to `Double`
    pub double_ms: u16,
}

impl Default for DebounceTimings {
    fn default() -> Self {
        Self {
            debounce_ms: 20,
            click_ms: 400,
            long_ms: 400,
            repeat_ms: 100,
            double_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    DebouncePress,
    Pressed,
    DebounceRelease,
}

/// Debounce state for one physical input
#[derive(Debug, Clone, Copy)]
pub struct InputSlot {
    /// Board pin number
    pub pin: u8,
    /// Output group mirrored by this input; `0` means none
    pub group: u8,
    /// Active-low input; raw level is flipped before classification
    pub invert: bool,
    phase: Phase,
    /// Time the current phase was entered
    t_phase: u32,
    /// Time the press was confirmed (`Down` emitted)
    t_press: u32,
    /// `Long` already fired in this cycle
    long_fired: bool,
    /// Last `Hold` emission time
    t_hold: u32,
    /// Release time of the previous short click, for double detection
    last_short: Option<u32>,
}

impl InputSlot {
    pub fn new(pin: u8, group: u8, invert: bool) -> Self {
        Self {
            pin,
            group,
            invert,
            phase: Phase::Idle,
            t_phase: 0,
            t_press: 0,
            long_fired: false,
            t_hold: 0,
            last_short: None,
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.long_fired = false;
        self.last_short = None;
    }

    /// Feed one raw level sample. `now` must be monotonic; a regression
    /// resets the slot and reports `Lost`.
    pub fn poll(&mut self, timings: &DebounceTimings, now: u32, raw: bool) -> Option<ButtonEvent> {
        if now < self.t_phase {
            let was_active = self.phase != Phase::Idle;
            self.reset();
            self.t_phase = now;
            return was_active.then_some(ButtonEvent::Lost);
        }

        let pressed = raw ^ self.invert;
        match self.phase {
            Phase::Idle => {
                if pressed {
                    self.phase = Phase::DebouncePress;
                    self.t_phase = now;
                }
                None
            }
            Phase::DebouncePress => {
                if !pressed {
                    // bounce, never made it to a press
                    self.phase = Phase::Idle;
                    self.t_phase = now;
                    return None;
                }
                if now - self.t_phase >= timings.debounce_ms as u32 {
                    self.phase = Phase::Pressed;
                    self.t_phase = now;
                    self.t_press = now;
                    self.long_fired = false;
                    return Some(ButtonEvent::Down);
                }
                None
            }
            Phase::Pressed => {
                if !pressed {
                    self.phase = Phase::DebounceRelease;
                    self.t_phase = now;
                    return None;
                }
                let held = now - self.t_press;
                if !self.long_fired && held >= timings.long_ms as u32 {
                    self.long_fired = true;
                    self.t_hold = now;
                    return Some(ButtonEvent::Long);
                }
                if self.long_fired && now - self.t_hold >= timings.repeat_ms as u32 {
                    self.t_hold = now;
                    return Some(ButtonEvent::Hold);
                }
                None
            }
            Phase::DebounceRelease => {
                if pressed {
                    // bounce back into the press
                    self.phase = Phase::Pressed;
                    self.t_phase = now;
                    return None;
                }
                if now - self.t_phase >= timings.debounce_ms as u32 {
                    let held = self.t_phase - self.t_press;
                    self.phase = Phase::Idle;
                    self.t_phase = now;
                    if self.long_fired {
                        self.long_fired = false;
                        return Some(ButtonEvent::Up);
                    }
                    if held > timings.click_ms as u32 {
                        return Some(ButtonEvent::Up);
                    }
                    if let Some(t) = self.last_short {
                        if now - t <= timings.double_ms as u32 {
                            self.last_short = None;
                            return Some(ButtonEvent::Double);
                        }
                    }
                    self.last_short = Some(now);
                    return Some(ButtonEvent::Short);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: DebounceTimings = DebounceTimings {
        debounce_ms: 20,
        click_ms: 400,
        long_ms: 400,
        repeat_ms: 100,
        double_ms: 400,
    };

    fn drive(slot: &mut InputSlot, samples: &[(u32, bool)]) -> std::vec::Vec<ButtonEvent> {
        samples
            .iter()
            .filter_map(|&(now, raw)| slot.poll(&T, now, raw))
            .collect()
    }

    #[test]
    fn test_short_click() {
        let mut slot = InputSlot::new(5, 0, false);
        let events = drive(
            &mut slot,
            &[
                (0, true),
                (25, true),  // Down
                (50, false),
                (75, false), // Short
            ],
        );
        assert_eq!(events, [ButtonEvent::Down, ButtonEvent::Short]);
    }

    #[test]
    fn test_bounce_is_filtered() {
        let mut slot = InputSlot::new(5, 0, false);
        let events = drive(
            &mut slot,
            &[(0, true), (5, false), (10, true), (15, false), (30, false)],
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_long_press_cycle() {
        let mut slot = InputSlot::new(5, 0, false);
        let events = drive(
            &mut slot,
            &[
                (0, true),
                (25, true),   // Down
                (430, true),  // Long
                (540, true),  // Hold
                (650, true),  // Hold
                (660, false),
                (690, false), // Up
            ],
        );
        assert_eq!(
            events,
            [
                ButtonEvent::Down,
                ButtonEvent::Long,
                ButtonEvent::Hold,
                ButtonEvent::Hold,
                ButtonEvent::Up
            ]
        );
    }

    #[test]
    fn test_double_click() {
        let mut slot = InputSlot::new(5, 0, false);
        let events = drive(
            &mut slot,
            &[
                (0, true),
                (25, true),   // Down
                (50, false),
                (75, false),  // Short
                (120, true),
                (145, true),  // Down
                (170, false),
                (195, false), // Double
            ],
        );
        assert_eq!(
            events,
            [
                ButtonEvent::Down,
                ButtonEvent::Short,
                ButtonEvent::Down,
                ButtonEvent::Double
            ]
        );
    }

    #[test]
    fn test_slow_second_click_stays_short() {
        let mut slot = InputSlot::new(5, 0, false);
        let events = drive(
            &mut slot,
            &[
                (0, true),
                (25, true),
                (50, false),
                (75, false),
                (600, true),
                (625, true),
                (650, false),
                (675, false),
            ],
        );
        assert_eq!(
            events,
            [
                ButtonEvent::Down,
                ButtonEvent::Short,
                ButtonEvent::Down,
                ButtonEvent::Short
            ]
        );
    }

    #[test]
    fn test_clock_regression_reports_lost() {
        let mut slot = InputSlot::new(5, 0, false);
        assert_eq!(slot.poll(&T, 100, true), None);
        assert_eq!(slot.poll(&T, 130, true), Some(ButtonEvent::Down));
        assert_eq!(slot.poll(&T, 50, true), Some(ButtonEvent::Lost));
        // slot is usable again afterwards
        assert_eq!(slot.poll(&T, 60, false), None);
    }

    #[test]
    fn test_release_past_click_window_is_up() {
        let timings = DebounceTimings {
            click_ms: 100,
            long_ms: 1000,
            ..T
        };
        let mut slot = InputSlot::new(5, 0, false);
        let mut events = std::vec::Vec::new();
        for &(now, raw) in &[
            (0u32, true),
            (25, true),   // Down
            (500, true),  // held, long threshold not reached
            (525, false),
            (550, false), // released well past the click window
        ] {
            if let Some(e) = slot.poll(&timings, now, raw) {
                events.push(e);
            }
        }
        assert_eq!(events, [ButtonEvent::Down, ButtonEvent::Up]);
    }

    #[test]
    fn prop_poll_total() {
        use proptest::prelude::*;
        proptest!(|(samples in proptest::collection::vec(
            (0u32..100_000, proptest::bool::ANY),
            0..64,
        ))| {
            // any sample sequence, monotonic or not, must classify or
            // reset without getting stuck
            let mut slot = InputSlot::new(1, 0, false);
            for (now, raw) in samples {
                let _ = slot.poll(&T, now, raw);
            }
        });
    }

    #[test]
    fn test_inverted_input() {
        let mut slot = InputSlot::new(5, 0, true);
        // active-low: false means pressed
        let events = drive(
            &mut slot,
            &[(0, false), (25, false), (50, true), (75, true)],
        );
        assert_eq!(events, [ButtonEvent::Down, ButtonEvent::Short]);
    }
}
