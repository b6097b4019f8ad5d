//! Widget toolkit interface.
//!
//! The graphics toolkit owns the tree; this trait is the narrow surface
//! the control plane needs: create a widget under a parent, read and
//! assign the 8-bit local object id, traverse children (plus the special
//! tab-view children), and get/set attributes. Traversal methods must not
//! mutate the tree.

/// Widget type tags, as used in bulk object records.
///
/// Tag values are part of the external record format and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    Page,
    Object,
    Container,
    TabView,
    TileView,
    Button,
    Checkbox,
    Label,
    Image,
    Arc,
    ColorPicker,
    Spinner,
    Slider,
    Gauge,
    Bar,
    LineMeter,
    Switch,
    Led,
    DropDown,
    Roller,
}

impl WidgetKind {
    /// Numeric type tag used in object records
    pub fn tag(self) -> u8 {
        match self {
            WidgetKind::Page => 1,
            WidgetKind::Object => 2,
            WidgetKind::Container => 3,
            WidgetKind::TabView => 4,
            WidgetKind::TileView => 5,
            WidgetKind::Button => 10,
            WidgetKind::Checkbox => 11,
            WidgetKind::Label => 12,
            WidgetKind::Image => 13,
            WidgetKind::Arc => 14,
            WidgetKind::ColorPicker => 20,
            WidgetKind::Spinner => 21,
            WidgetKind::Slider => 30,
            WidgetKind::Gauge => 31,
            WidgetKind::Bar => 32,
            WidgetKind::LineMeter => 33,
            WidgetKind::Switch => 40,
            WidgetKind::Led => 41,
            WidgetKind::DropDown => 50,
            WidgetKind::Roller => 51,
        }
    }
}

/// Default event wiring attached to a widget at creation time.
///
/// The hook names the capability the widget reports through the outbound
/// attribute path: press-style events, a toggled boolean, a plain value,
/// a value with its display text, or a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventHook {
    /// No events reported (layout containers, spinners)
    None,
    /// DOWN/UP/SHORT/LONG/HOLD press events
    Press,
    /// Checked state as `val` 0/1
    Toggle,
    /// Current value as `val`
    Value,
    /// Current value as `val` plus selected text as `txt`
    ValueAndText,
    /// Current color as `color` `#rrggbb`
    Color,
}

/// The widget toolkit seen from the control plane
pub trait WidgetTree {
    /// Opaque widget handle
    type Node: Copy + PartialEq + core::fmt::Debug;

    /// Create an empty top-level screen (page root)
    fn create_page(&mut self) -> Self::Node;

    /// The permanently present top overlay layer
    fn layer_top(&self) -> Self::Node;

    /// The permanently present system overlay layer
    fn layer_sys(&self) -> Self::Node;

    /// Create a widget under `parent`; `None` when the toolkit refuses
    fn create(&mut self, kind: WidgetKind, parent: Self::Node) -> Option<Self::Node>;

    /// Append a tab to a tab-view widget
    fn add_tab(&mut self, tab_view: Self::Node, title: &str) -> Option<Self::Node>;

    /// Attach the default event wiring for the widget's kind
    fn set_event_hook(&mut self, node: Self::Node, hook: EventHook);

    /// Local object id stored on the node; `0` means unaddressable
    fn object_id(&self, node: Self::Node) -> u8;

    /// Assign the local object id (once, at creation)
    fn set_object_id(&mut self, node: Self::Node, id: u8);

    fn child_count(&self, node: Self::Node) -> usize;

    fn child(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    /// Whether this node is a tab-view container
    fn is_tab_view(&self, node: Self::Node) -> bool;

    fn tab_count(&self, node: Self::Node) -> usize;

    fn tab(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    /// The screen (page root or overlay) this node lives on
    fn screen_of(&self, node: Self::Node) -> Self::Node;

    /// Set (`update == true`) or query an attribute.
    ///
    /// Queries report the current value back through the toolkit's own
    /// event path; the dispatcher never sees the value directly.
    fn process_attribute(&mut self, node: Self::Node, attr: &str, payload: &str, update: bool);

    /// Remove all children of a page root
    fn clear_children(&mut self, node: Self::Node);

    /// Make this screen the active display
    fn load_screen(&mut self, node: Self::Node);
}
