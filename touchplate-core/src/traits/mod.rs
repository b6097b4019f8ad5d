//! Collaborator interfaces
//!
//! The control plane reaches every external subsystem through these
//! traits: the graphics toolkit that owns the widget tree, the raw pin
//! hardware, the outbound transports, and the platform services (display
//! power, OTA, restart). Implementations live in board/integration crates;
//! tests use the doubles in `crate::testing`.

pub mod io;
pub mod platform;
pub mod transport;
pub mod widget;

pub use io::{PinIo, PinMode};
pub use platform::Platform;
pub use transport::Transport;
pub use widget::{EventHook, WidgetKind, WidgetTree};
