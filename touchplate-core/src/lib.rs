//! Board-agnostic control-plane logic for the touchplate panel
//!
//! This crate contains the logic that glues transports, the widget tree
//! and physical inputs together without depending on any hardware:
//!
//! - Collaborator traits (widget toolkit, pin I/O, transports, platform)
//! - Page map and the page/object address resolver
//! - Command dispatcher and the bidirectional attribute protocol
//! - Bulk object loader for streamed page layouts
//! - Config diff protocol shared by every configurable subsystem
//! - GPIO debounce state machine with group-mirrored outputs
//!
//! Rendering, networking and storage stay on the other side of the traits
//! in [`traits`]; nothing in this crate blocks or allocates.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod dispatch;
pub mod gpio;
pub mod loader;
pub mod page;
pub mod resolve;
pub mod settings;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

/// Firmware version reported in status snapshots
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
