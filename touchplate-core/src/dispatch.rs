//! Command dispatcher.
//!
//! Every transport funnels its command text into [`Dispatcher::dispatch`]:
//! the serial console via [`Dispatcher::pump_serial`], message-bus
//! payloads directly. A line holds one or more `;`-separated commands,
//! executed strictly in order; a failing command does not stop the ones
//! after it and the first failure is reported.
//!
//! The dispatcher owns the page map and the device-level settings. It
//! talks to the widget toolkit, the outbound transport and the platform
//! only through their traits, so the whole command surface runs against
//! test doubles.

use core::fmt::Write;

use heapless::String;

use touchplate_protocol::command::{is_on, on_off, split_bulk};
use touchplate_protocol::{ButtonEvent, Command, LineBuffer, ParseError};

use crate::loader::{load_stream, LoadStats};
use crate::page::{PageError, PageMap};
use crate::resolve::{locate, resolve};
use crate::settings::{
    AppSettings, Configurable, DebugSettings, LinkSettings, Settings, WifiSettings,
};
use crate::traits::{Platform, Transport, WidgetTree};

/// Capacity of a formatted status report
const STATUS_DOC_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Command text did not parse
    Parse(ParseError),
    /// Keyword is not part of the command surface
    UnknownKeyword,
    /// Keyword recognized but its payload was not usable
    BadPayload,
    /// Page navigation or clear refused
    Page(PageError),
    /// Address path named an object that does not exist
    ObjectNotFound,
}

impl From<ParseError> for DispatchError {
    fn from(e: ParseError) -> Self {
        DispatchError::Parse(e)
    }
}

impl From<PageError> for DispatchError {
    fn from(e: PageError) -> Self {
        DispatchError::Page(e)
    }
}

/// Command surface, page map and device settings
pub struct Dispatcher<W: WidgetTree> {
    pages: PageMap<W::Node>,
    pub app: AppSettings,
    pub wifi: WifiSettings,
    pub link: LinkSettings,
    pub debug: DebugSettings,
    line: LineBuffer,
    config_dirty: bool,
    last_status_ms: u32,
}

impl<W: WidgetTree> Dispatcher<W> {
    /// Create the page map on the toolkit and start with defaults
    pub fn new(tree: &mut W) -> Self {
        Self {
            pages: PageMap::new(tree),
            app: AppSettings::default(),
            wifi: WifiSettings::default(),
            link: LinkSettings::default(),
            debug: DebugSettings::default(),
            line: LineBuffer::new(),
            config_dirty: false,
            last_status_ms: 0,
        }
    }

    pub fn pages(&self) -> &PageMap<W::Node> {
        &self.pages
    }

    /// Whether a settings write happened since the last persist
    pub fn config_dirty(&self) -> bool {
        self.config_dirty
    }

    /// Apply the startup page and dim level
    pub fn start<P: Platform>(&mut self, tree: &mut W, platform: &mut P) {
        platform.set_dim(self.app.start_dim);
        platform.set_backlight(true);
        if self.pages.set_current(tree, self.app.start_page).is_err() {
            let _ = self.pages.set_current(tree, 0);
        }
    }

    /// Execute one line of command text.
    ///
    /// The line may hold several `;`-separated commands; all of them
    /// run, and the first error (if any) is returned.
    pub fn dispatch<T: Transport, P: Platform>(
        &mut self,
        tree: &mut W,
        out: &mut T,
        platform: &mut P,
        line: &str,
    ) -> Result<(), DispatchError> {
        let mut first_err = Ok(());
        for part in split_bulk(line) {
            let result = self.run_one(tree, out, platform, part);
            if first_err.is_ok() {
                first_err = result;
            }
        }
        first_err
    }

    fn run_one<T: Transport, P: Platform>(
        &mut self,
        tree: &mut W,
        out: &mut T,
        platform: &mut P,
        text: &str,
    ) -> Result<(), DispatchError> {
        match Command::parse(text)? {
            Command::Attribute { path, payload } => {
                let node = resolve(tree, &self.pages, path.page, path.obj)
                    .ok_or(DispatchError::ObjectNotFound)?;
                tree.process_attribute(node, path.attr, payload, !payload.is_empty());
                Ok(())
            }
            Command::Keyword { name, payload } => self.run_keyword(tree, out, platform, name, payload),
        }
    }

    fn run_keyword<T: Transport, P: Platform>(
        &mut self,
        tree: &mut W,
        out: &mut T,
        platform: &mut P,
        name: &str,
        payload: &str,
    ) -> Result<(), DispatchError> {
        match name {
            "page" => self.cmd_page(tree, out, payload),
            "clearpage" => self.cmd_clearpage(tree, payload),
            "dim" | "brightness" => self.cmd_dim(out, platform, payload),
            "light" => self.cmd_light(out, platform, payload),
            "wakeup" => {
                platform.wake();
                Ok(())
            }
            "calibrate" => {
                platform.calibrate();
                Ok(())
            }
            "statusupdate" => {
                self.status_update(out, platform);
                Ok(())
            }
            "update" => {
                if payload.is_empty() {
                    return Err(DispatchError::BadPayload);
                }
                platform.start_update(payload);
                Ok(())
            }
            "setupap" => {
                platform.setup_ap();
                Ok(())
            }
            "reboot" | "restart" => {
                self.reboot(out, platform);
                Ok(())
            }
            "ssid" | "pass" => self.cmd_setting_str(name, payload, SettingTarget::Wifi),
            _ if name.starts_with("mqtt") => {
                let key = &name[4..];
                match key {
                    "host" | "user" | "pass" => {
                        self.cmd_setting_str(key, payload, SettingTarget::Link)
                    }
                    "port" => self.cmd_setting_uint(key, payload, SettingTarget::Link),
                    _ => Err(DispatchError::UnknownKeyword),
                }
            }
            _ if name.starts_with("output") => self.cmd_output(platform, &name[6..], payload),
            _ => Err(DispatchError::UnknownKeyword),
        }
    }

    /// `page` / `page=N`: query publishes the current page, a set
    /// navigates first and publishes only on success
    fn cmd_page<T: Transport>(
        &mut self,
        tree: &mut W,
        out: &mut T,
        payload: &str,
    ) -> Result<(), DispatchError> {
        if !payload.is_empty() {
            let page: u8 = payload.trim().parse().map_err(|_| DispatchError::BadPayload)?;
            self.pages.set_current(tree, page)?;
        }
        let mut value: String<8> = String::new();
        let _ = write!(value, "{}", self.pages.current());
        out.send_state("page", &value);
        Ok(())
    }

    /// `clearpage` / `clearpage=N` / `clearpage=all`
    fn cmd_clearpage(&mut self, tree: &mut W, payload: &str) -> Result<(), DispatchError> {
        match payload.trim() {
            "" => Ok(self.pages.clear(tree, self.pages.current())?),
            "all" => {
                for page in 0..crate::page::PAGE_COUNT as u8 {
                    self.pages.clear(tree, page)?;
                }
                Ok(())
            }
            n => {
                let page: u8 = n.parse().map_err(|_| DispatchError::BadPayload)?;
                Ok(self.pages.clear(tree, page)?)
            }
        }
    }

    /// `dim` / `dim=N` with N clamped to `0..=100`; the applied level is
    /// always published, so a query and a set answer the same way
    fn cmd_dim<T: Transport, P: Platform>(
        &mut self,
        out: &mut T,
        platform: &mut P,
        payload: &str,
    ) -> Result<(), DispatchError> {
        if !payload.is_empty() {
            let level: u32 = payload.trim().parse().map_err(|_| DispatchError::BadPayload)?;
            platform.set_dim(level.min(100) as u8);
        }
        let mut value: String<8> = String::new();
        let _ = write!(value, "{}", platform.dim());
        out.send_state("dim", &value);
        Ok(())
    }

    /// `light` / `light=ON|OFF`
    fn cmd_light<T: Transport, P: Platform>(
        &mut self,
        out: &mut T,
        platform: &mut P,
        payload: &str,
    ) -> Result<(), DispatchError> {
        if !payload.is_empty() {
            platform.set_backlight(is_on(payload.trim()) || payload.trim() == "1");
        }
        out.send_state("light", on_off(platform.backlight()));
        Ok(())
    }

    /// `output<N>=ON|OFF`
    fn cmd_output<P: Platform>(
        &mut self,
        platform: &mut P,
        index: &str,
        payload: &str,
    ) -> Result<(), DispatchError> {
        let index: u8 = index.parse().map_err(|_| DispatchError::UnknownKeyword)?;
        if payload.is_empty() {
            return Err(DispatchError::BadPayload);
        }
        platform.set_output(index, is_on(payload.trim()) || payload.trim() == "1");
        Ok(())
    }

    fn cmd_setting_str(
        &mut self,
        key: &str,
        payload: &str,
        target: SettingTarget,
    ) -> Result<(), DispatchError> {
        let mut doc = Settings::new();
        doc.insert_str(key, payload);
        self.apply_setting(&doc, target)
    }

    fn cmd_setting_uint(
        &mut self,
        key: &str,
        payload: &str,
        target: SettingTarget,
    ) -> Result<(), DispatchError> {
        let value: u32 = payload.trim().parse().map_err(|_| DispatchError::BadPayload)?;
        let mut doc = Settings::new();
        doc.insert_uint(key, value);
        self.apply_setting(&doc, target)
    }

    fn apply_setting(
        &mut self,
        doc: &Settings,
        target: SettingTarget,
    ) -> Result<(), DispatchError> {
        let changed = match target {
            SettingTarget::Wifi => self.wifi.set_config(doc),
            SettingTarget::Link => self.link.set_config(doc),
        };
        self.config_dirty |= changed;
        Ok(())
    }

    /// Publish the status snapshot: firmware version, active page, dim
    /// level and backlight state
    pub fn status_update<T: Transport, P: Platform>(&mut self, out: &mut T, platform: &P) {
        let mut doc: String<STATUS_DOC_LEN> = String::new();
        let _ = write!(
            doc,
            "{{\"version\":\"{}\",\"page\":{},\"dim\":{},\"light\":\"{}\"}}",
            crate::VERSION,
            self.pages.current(),
            platform.dim(),
            on_off(platform.backlight()),
        );
        out.send_state("statusupdate", &doc);
    }

    /// Publish an idle-state transition (`off`, `short`, `long`)
    pub fn send_idle<T: Transport>(&self, out: &mut T, state: &str) {
        out.send_state("idle", state);
    }

    /// Publish a debounced physical input event
    pub fn send_input_event<T: Transport>(&self, out: &mut T, index: u8, event: ButtonEvent) {
        let topic = touchplate_protocol::events::input_topic(index);
        out.send_state(&topic, event.name());
    }

    /// Publish a widget press event. Widgets that cannot be addressed
    /// (no id, transient screen) report nothing.
    pub fn send_object_event<T: Transport>(
        &self,
        tree: &W,
        out: &mut T,
        node: W::Node,
        event: ButtonEvent,
    ) {
        if let Some(addr) = locate(tree, &self.pages, node) {
            out.send_object_attr(addr.page, addr.obj, "event", event.name());
        }
    }

    /// Publish a widget value change
    pub fn send_object_value<T: Transport>(&self, tree: &W, out: &mut T, node: W::Node, val: i32) {
        if let Some(addr) = locate(tree, &self.pages, node) {
            let value = touchplate_protocol::events::value_str(val);
            out.send_object_attr(addr.page, addr.obj, "val", &value);
        }
    }

    /// Publish a widget value change together with its display text
    pub fn send_object_text<T: Transport>(
        &self,
        tree: &W,
        out: &mut T,
        node: W::Node,
        val: i32,
        txt: &str,
    ) {
        if let Some(addr) = locate(tree, &self.pages, node) {
            let value = touchplate_protocol::events::value_str(val);
            out.send_object_attr(addr.page, addr.obj, "val", &value);
            out.send_object_attr(addr.page, addr.obj, "txt", txt);
        }
    }

    /// Publish a widget color change as `#rrggbb`
    pub fn send_object_color<T: Transport>(
        &self,
        tree: &W,
        out: &mut T,
        node: W::Node,
        r: u8,
        g: u8,
        b: u8,
    ) {
        if let Some(addr) = locate(tree, &self.pages, node) {
            let value = touchplate_protocol::events::color_str(r, g, b);
            out.send_object_attr(addr.page, addr.obj, "color", &value);
        }
    }

    /// Feed one serial byte; a completed line dispatches immediately
    pub fn pump_serial<T: Transport, P: Platform>(
        &mut self,
        tree: &mut W,
        out: &mut T,
        platform: &mut P,
        byte: u8,
    ) -> Option<Result<(), DispatchError>> {
        let line = self.line.feed(byte)?;
        Some(self.dispatch(tree, out, platform, &line))
    }

    /// Apply an object record stream to the tree, starting on the
    /// currently active page
    pub fn load_objects(&mut self, tree: &mut W, stream: &[u8]) -> LoadStats {
        load_stream(tree, &self.pages, self.pages.current(), stream)
    }

    /// Periodic work: the unsolicited status report every teleperiod
    pub fn tick<T: Transport, P: Platform>(&mut self, out: &mut T, platform: &P, now_ms: u32) {
        let period = self.debug.teleperiod_s;
        if period == 0 {
            return;
        }
        if now_ms.wrapping_sub(self.last_status_ms) >= period as u32 * 1000 {
            self.last_status_ms = now_ms;
            self.status_update(out, platform);
        }
    }

    /// Orderly restart: persist settings, stop the transport, drop any
    /// half-received console line, then hand over to the platform
    pub fn reboot<T: Transport, P: Platform>(&mut self, out: &mut T, platform: &mut P) {
        platform.save_config();
        self.config_dirty = false;
        out.stop();
        self.line.clear();
        platform.restart();
    }
}

#[derive(Clone, Copy)]
enum SettingTarget {
    Wifi,
    Link,
}
