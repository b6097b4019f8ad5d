//! Platform services.
//!
//! Everything the dispatcher can do to the device that is not a widget
//! mutation: display power and dimming, touch calibration, the spare
//! output pins, firmware update, configuration persistence and restart.

/// Device-side services consumed by the dispatcher
pub trait Platform {
    /// Set the backlight dim level (`0..=100`)
    fn set_dim(&mut self, level: u8);

    /// Current dim level
    fn dim(&self) -> u8;

    /// Switch the backlight on or off
    fn set_backlight(&mut self, on: bool);

    /// Current backlight state
    fn backlight(&self) -> bool;

    /// Start a touch calibration cycle
    fn calibrate(&mut self);

    /// Reset the display idle/sleep timer, as a touch would
    fn wake(&mut self);

    /// Drive one of the spare output channels
    fn set_output(&mut self, index: u8, on: bool);

    /// Trigger a firmware update from the given URL
    fn start_update(&mut self, url: &str);

    /// Enter access-point provisioning mode
    fn setup_ap(&mut self);

    /// Persist the current configuration; failure must not prevent a
    /// following restart
    fn save_config(&mut self);

    /// Restart the process. Does not return on hardware; test doubles
    /// record the call instead.
    fn restart(&mut self);
}
