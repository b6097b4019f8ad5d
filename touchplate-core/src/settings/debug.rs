//! Diagnostics settings: serial baud rate, telemetry period and the
//! remote syslog sink.
//!
//! The baud rate is stored divided by ten so the full range fits a
//! sixteen-bit persisted field; `baud()` gives the real rate.

use heapless::String;

use super::doc::{diff_set, diff_set_str, Settings};
use super::Configurable;

/// Capacity of the syslog hostname
pub const HOST_LEN: usize = 32;

/// Default telemetry interval in seconds
pub const DEFAULT_TELEPERIOD_S: u16 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSettings {
    /// Serial baud rate divided by 10
    pub baud_div10: u16,
    /// Seconds between unsolicited status reports; `0` disables them
    pub teleperiod_s: u16,
    /// Remote syslog host; empty disables remote logging
    pub host: String<HOST_LEN>,
    /// Remote syslog port
    pub port: u16,
    /// Syslog framing variant
    pub protocol: u8,
    /// Syslog facility offset
    pub facility: u8,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            baud_div10: 11520,
            teleperiod_s: DEFAULT_TELEPERIOD_S,
            host: String::new(),
            port: 514,
            protocol: 0,
            facility: 0,
        }
    }
}

impl DebugSettings {
    /// Actual serial baud rate
    pub fn baud(&self) -> u32 {
        self.baud_div10 as u32 * 10
    }
}

impl Configurable for DebugSettings {
    fn get_config(&self, doc: &mut Settings) -> bool {
        let mut changed = false;
        changed |= doc.insert_uint("baud", self.baud_div10 as u32);
        changed |= doc.insert_uint("tele", self.teleperiod_s as u32);
        changed |= doc.insert_str("host", self.host.as_str());
        changed |= doc.insert_uint("port", self.port as u32);
        changed |= doc.insert_uint("proto", self.protocol as u32);
        changed |= doc.insert_uint("log", self.facility as u32);
        changed
    }

    fn set_config(&mut self, doc: &Settings) -> bool {
        let mut changed = false;
        changed |= diff_set(
            &mut self.baud_div10,
            doc.uint_of("baud").map(|v| v.min(u16::MAX as u32) as u16),
        );
        changed |= diff_set(
            &mut self.teleperiod_s,
            doc.uint_of("tele").map(|v| v.min(u16::MAX as u32) as u16),
        );
        changed |= diff_set_str(&mut self.host, doc.str_of("host"));
        changed |= diff_set(
            &mut self.port,
            doc.uint_of("port").map(|v| v.min(u16::MAX as u32) as u16),
        );
        changed |= diff_set(
            &mut self.protocol,
            doc.uint_of("proto").map(|v| v.min(u8::MAX as u32) as u8),
        );
        changed |= diff_set(
            &mut self.facility,
            doc.uint_of("log").map(|v| v.min(u8::MAX as u32) as u8),
        );
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baud() {
        let dbg = DebugSettings::default();
        assert_eq!(dbg.baud(), 115_200);
    }

    #[test]
    fn test_teleperiod_update() {
        let mut dbg = DebugSettings::default();
        let mut doc = Settings::new();
        doc.insert_uint("tele", 60);
        assert!(dbg.set_config(&doc));
        assert_eq!(dbg.teleperiod_s, 60);

        // zero disables telemetry and is a legal value
        doc.insert_uint("tele", 0);
        assert!(dbg.set_config(&doc));
        assert_eq!(dbg.teleperiod_s, 0);
    }

    #[test]
    fn test_export_keys() {
        let dbg = DebugSettings::default();
        let mut doc = Settings::new();
        dbg.get_config(&mut doc);
        assert_eq!(doc.uint_of("baud"), Some(11520));
        assert_eq!(doc.uint_of("tele"), Some(300));
        assert_eq!(doc.uint_of("port"), Some(514));
    }
}
