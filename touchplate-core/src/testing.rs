//! In-memory stand-ins for the collaborator traits, shared by the unit
//! tests across the crate.

use std::collections::BTreeMap;
use std::string::String;
use std::vec::Vec;

use crate::traits::{EventHook, PinIo, PinMode, Platform, Transport, WidgetKind, WidgetTree};

#[derive(Debug)]
struct NodeData {
    kind: Option<WidgetKind>,
    id: u8,
    parent: Option<usize>,
    children: Vec<usize>,
    tabs: Vec<usize>,
    screen: usize,
    attrs: BTreeMap<String, String>,
    hook: EventHook,
}

impl NodeData {
    fn screen(index: usize) -> Self {
        Self {
            kind: None,
            id: 0,
            parent: None,
            children: Vec::new(),
            tabs: Vec::new(),
            screen: index,
            attrs: BTreeMap::new(),
            hook: EventHook::None,
        }
    }
}

/// Widget tree backed by a flat node arena
#[derive(Debug)]
pub struct MockTree {
    nodes: Vec<NodeData>,
    layer_top: usize,
    layer_sys: usize,
    loaded: Option<usize>,
    queries: Vec<(usize, String)>,
    drop_ids: bool,
}

impl MockTree {
    pub fn new() -> Self {
        let nodes = std::vec![NodeData::screen(0), NodeData::screen(1)];
        Self {
            nodes,
            layer_top: 0,
            layer_sys: 1,
            loaded: None,
            queries: Vec::new(),
            drop_ids: false,
        }
    }

    /// Make `set_object_id` a silent no-op, simulating a toolkit that
    /// loses the id assignment
    pub fn drop_object_ids(&mut self) {
        self.drop_ids = true;
    }

    pub fn loaded_screen(&self) -> Option<usize> {
        self.loaded
    }

    pub fn attr_of(&self, node: usize, attr: &str) -> Option<&str> {
        self.nodes[node].attrs.get(attr).map(String::as_str)
    }

    pub fn hook_of(&self, node: usize) -> EventHook {
        self.nodes[node].hook
    }

    pub fn parent_of(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    pub fn last_query(&self) -> Option<(usize, &str)> {
        self.queries.last().map(|(n, a)| (*n, a.as_str()))
    }
}

impl WidgetTree for MockTree {
    type Node = usize;

    fn create_page(&mut self) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData::screen(index));
        index
    }

    fn layer_top(&self) -> usize {
        self.layer_top
    }

    fn layer_sys(&self) -> usize {
        self.layer_sys
    }

    fn create(&mut self, kind: WidgetKind, parent: usize) -> Option<usize> {
        let index = self.nodes.len();
        let screen = self.nodes[parent].screen;
        let mut node = NodeData::screen(index);
        node.kind = Some(kind);
        node.parent = Some(parent);
        node.screen = screen;
        self.nodes.push(node);
        self.nodes[parent].children.push(index);
        Some(index)
    }

    fn add_tab(&mut self, tab_view: usize, _title: &str) -> Option<usize> {
        let index = self.nodes.len();
        let screen = self.nodes[tab_view].screen;
        let mut node = NodeData::screen(index);
        node.kind = Some(WidgetKind::Object);
        node.parent = Some(tab_view);
        node.screen = screen;
        self.nodes.push(node);
        self.nodes[tab_view].tabs.push(index);
        Some(index)
    }

    fn set_event_hook(&mut self, node: usize, hook: EventHook) {
        self.nodes[node].hook = hook;
    }

    fn object_id(&self, node: usize) -> u8 {
        self.nodes[node].id
    }

    fn set_object_id(&mut self, node: usize, id: u8) {
        if !self.drop_ids {
            self.nodes[node].id = id;
        }
    }

    fn child_count(&self, node: usize) -> usize {
        self.nodes[node].children.len()
    }

    fn child(&self, node: usize, index: usize) -> Option<usize> {
        self.nodes[node].children.get(index).copied()
    }

    fn is_tab_view(&self, node: usize) -> bool {
        self.nodes[node].kind == Some(WidgetKind::TabView)
    }

    fn tab_count(&self, node: usize) -> usize {
        self.nodes[node].tabs.len()
    }

    fn tab(&self, node: usize, index: usize) -> Option<usize> {
        self.nodes[node].tabs.get(index).copied()
    }

    fn screen_of(&self, node: usize) -> usize {
        self.nodes[node].screen
    }

    fn process_attribute(&mut self, node: usize, attr: &str, payload: &str, update: bool) {
        if update {
            self.nodes[node].attrs.insert(attr.into(), payload.into());
        } else {
            self.queries.push((node, attr.into()));
        }
    }

    fn clear_children(&mut self, node: usize) {
        self.nodes[node].children.clear();
        self.nodes[node].tabs.clear();
    }

    fn load_screen(&mut self, node: usize) {
        self.loaded = Some(node);
    }
}

/// Pin hardware double: input levels are scripted, writes are recorded
#[derive(Debug, Default)]
pub struct MockPins {
    levels: BTreeMap<u8, bool>,
    written: BTreeMap<u8, bool>,
    modes: BTreeMap<u8, PinMode>,
    reserved: Vec<u8>,
}

impl MockPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserved(pins: &[u8]) -> Self {
        Self {
            reserved: pins.into(),
            ..Self::default()
        }
    }

    /// Script the level an input pin will read
    pub fn set_level(&mut self, pin: u8, high: bool) {
        self.levels.insert(pin, high);
    }

    /// Last level written to an output pin, if any
    pub fn level_of(&self, pin: u8) -> Option<bool> {
        self.written.get(&pin).copied()
    }

    pub fn mode_of(&self, pin: u8) -> Option<PinMode> {
        self.modes.get(&pin).copied()
    }
}

impl PinIo for MockPins {
    fn configure(&mut self, pin: u8, mode: PinMode) {
        self.modes.insert(pin, mode);
    }

    fn read(&self, pin: u8) -> bool {
        self.levels.get(&pin).copied().unwrap_or(false)
    }

    fn write(&mut self, pin: u8, high: bool) {
        self.written.insert(pin, high);
    }

    fn is_reserved(&self, pin: u8) -> bool {
        self.reserved.contains(&pin)
    }
}

/// Transport double that records everything sent through it
#[derive(Debug, Default)]
pub struct MockTransport {
    states: Vec<(String, String)>,
    objects: Vec<(u8, u8, String, String)>,
    pub stopped: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_state(&self) -> Option<(&str, &str)> {
        self.states.last().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn last_object(&self) -> Option<(u8, u8, &str, &str)> {
        self.objects
            .last()
            .map(|(p, o, a, v)| (*p, *o, a.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.objects.clear();
    }
}

impl Transport for MockTransport {
    fn active(&self) -> bool {
        !self.stopped
    }

    fn send_state(&mut self, topic: &str, value: &str) {
        if !self.stopped {
            self.states.push((topic.into(), value.into()));
        }
    }

    fn send_object_attr(&mut self, page: u8, obj: u8, attr: &str, value: &str) {
        if !self.stopped {
            self.objects.push((page, obj, attr.into(), value.into()));
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Platform double that records every side effect
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub dim_level: u8,
    pub backlight_on: bool,
    pub calibrated: bool,
    pub woken: bool,
    pub outputs: BTreeMap<u8, bool>,
    pub update_url: Option<String>,
    pub ap_started: bool,
    pub config_saved: bool,
    pub restarted: bool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for MockPlatform {
    fn set_dim(&mut self, level: u8) {
        self.dim_level = level;
    }

    fn dim(&self) -> u8 {
        self.dim_level
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight_on = on;
    }

    fn backlight(&self) -> bool {
        self.backlight_on
    }

    fn calibrate(&mut self) {
        self.calibrated = true;
    }

    fn wake(&mut self) {
        self.woken = true;
    }

    fn set_output(&mut self, index: u8, on: bool) {
        self.outputs.insert(index, on);
    }

    fn start_update(&mut self, url: &str) {
        self.update_url = Some(url.into());
    }

    fn setup_ap(&mut self) {
        self.ap_started = true;
    }

    fn save_config(&mut self) {
        self.config_saved = true;
    }

    fn restart(&mut self) {
        self.restarted = true;
    }
}
