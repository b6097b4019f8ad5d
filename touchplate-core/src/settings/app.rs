//! Application-level settings: startup page, initial dim level, theme
//! and the pages-file path used by the bulk loader at boot.

use heapless::String;

use super::doc::{diff_set, diff_set_str, Settings};
use super::Configurable;

/// Capacity of the pages-file path
pub const PATH_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Page loaded as the active screen at startup
    pub start_page: u8,
    /// Backlight dim level applied at startup (`0..=100`)
    pub start_dim: u8,
    /// Theme index
    pub theme: u8,
    /// Path of the persisted pages file
    pub pages_path: String<PATH_LEN>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            start_page: 1,
            start_dim: 100,
            theme: 0,
            pages_path: String::try_from("/pages.bin").unwrap_or_default(),
        }
    }
}

impl Configurable for AppSettings {
    fn get_config(&self, doc: &mut Settings) -> bool {
        let mut changed = false;
        changed |= doc.insert_uint("startpage", self.start_page as u32);
        changed |= doc.insert_uint("startdim", self.start_dim as u32);
        changed |= doc.insert_uint("theme", self.theme as u32);
        changed |= doc.insert_str("pages", self.pages_path.as_str());
        changed
    }

    fn set_config(&mut self, doc: &Settings) -> bool {
        let mut changed = false;
        changed |= diff_set(
            &mut self.start_page,
            doc.uint_of("startpage").map(|v| v.min(u8::MAX as u32) as u8),
        );
        changed |= diff_set(
            &mut self.start_dim,
            doc.uint_of("startdim").map(|v| v.min(100) as u8),
        );
        changed |= diff_set(
            &mut self.theme,
            doc.uint_of("theme").map(|v| v.min(u8::MAX as u32) as u8),
        );
        changed |= diff_set_str(&mut self.pages_path, doc.str_of("pages"));
        changed
    }
}
