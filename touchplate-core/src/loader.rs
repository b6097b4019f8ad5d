//! Bulk object loader.
//!
//! Page layouts arrive as a stream of serialized object records, one
//! widget each, framed back to back. Records are applied in order; a
//! record that cannot be applied is skipped and counted, a record that
//! cannot be decoded ends the stream (everything created before it is
//! kept). The same records come from the persisted pages file at boot
//! and from object-stream payloads pushed over a transport at runtime.
//!
//! Each record names its page, object id, widget type tag, an optional
//! parent object id and a list of attribute assignments. A record
//! without an id creates nothing and is treated as a comment. A record
//! without a page inherits the page of the previous record.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::page::PageMap;
use crate::resolve::{find_from_id, locate, resolve, Address};
use crate::traits::{EventHook, WidgetKind, WidgetTree};

/// Maximum attribute assignments in one record
pub const MAX_RECORD_ATTRS: usize = 8;

/// Capacity of an attribute name in a record
pub const ATTR_KEY_LEN: usize = 16;

/// Capacity of an attribute payload in a record
pub const ATTR_VAL_LEN: usize = 64;

/// One streamed widget description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Target page; `None` inherits from the previous record
    pub page: Option<u8>,
    /// Object id on that page; `None` makes this record a comment
    pub id: Option<u8>,
    /// Widget type tag
    pub kind: Option<u8>,
    /// Parent object id on the same page; `None` or unresolvable means
    /// the page root
    pub parent: Option<u8>,
    /// Attribute assignments applied after creation
    pub attrs: Vec<(String<ATTR_KEY_LEN>, String<ATTR_VAL_LEN>), MAX_RECORD_ATTRS>,
}

/// Widget class: the kind to instantiate and its default event wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetClass {
    pub kind: WidgetKind,
    pub hook: EventHook,
}

/// Class lookup by numeric type tag.
///
/// Pages are created once at boot and are not instantiable through
/// records, so tag `1` resolves to nothing.
pub fn class_for(tag: u8) -> Option<WidgetClass> {
    let (kind, hook) = match tag {
        2 => (WidgetKind::Object, EventHook::Press),
        3 => (WidgetKind::Container, EventHook::Press),
        4 => (WidgetKind::TabView, EventHook::None),
        5 => (WidgetKind::TileView, EventHook::None),
        10 => (WidgetKind::Button, EventHook::Press),
        11 => (WidgetKind::Checkbox, EventHook::Toggle),
        12 => (WidgetKind::Label, EventHook::Press),
        13 => (WidgetKind::Image, EventHook::Press),
        14 => (WidgetKind::Arc, EventHook::Press),
        20 => (WidgetKind::ColorPicker, EventHook::Color),
        21 => (WidgetKind::Spinner, EventHook::None),
        30 => (WidgetKind::Slider, EventHook::Value),
        31 => (WidgetKind::Gauge, EventHook::Press),
        32 => (WidgetKind::Bar, EventHook::Press),
        33 => (WidgetKind::LineMeter, EventHook::Press),
        40 => (WidgetKind::Switch, EventHook::Toggle),
        41 => (WidgetKind::Led, EventHook::Press),
        50 => (WidgetKind::DropDown, EventHook::ValueAndText),
        51 => (WidgetKind::Roller, EventHook::ValueAndText),
        _ => return None,
    };
    Some(WidgetClass { kind, hook })
}

/// Tabs synthesized under a new tab-view
const TAB_VIEW_TABS: u8 = 3;

/// Outcome counters for one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadStats {
    /// Widgets created
    pub created: usize,
    /// Records without an id
    pub comments: usize,
    /// Records skipped: unknown tag, unknown page, duplicate id or
    /// toolkit refusal
    pub skipped: usize,
    /// Created widgets that failed the address round-trip check; an
    /// internal defect, not bad input
    pub inconsistent: usize,
    /// Records whose parent id did not resolve and fell back to the
    /// page root
    pub parent_fallbacks: usize,
    /// Stream ended on a record that failed to decode
    pub truncated: bool,
}

/// Apply a framed record stream to the tree.
///
/// `default_page` seeds the page inherited by records that do not name
/// one; records naming a page move the default for those after them.
pub fn load_stream<T: WidgetTree>(
    tree: &mut T,
    pages: &PageMap<T::Node>,
    default_page: u8,
    mut stream: &[u8],
) -> LoadStats {
    let mut stats = LoadStats::default();
    let mut page = default_page;

    while !stream.is_empty() {
        let record: ObjectRecord = match postcard::take_from_bytes(stream) {
            Ok((record, rest)) => {
                stream = rest;
                record
            }
            Err(_) => {
                stats.truncated = true;
                break;
            }
        };

        if let Some(p) = record.page {
            page = p;
        }
        apply_record(tree, pages, page, &record, &mut stats);
    }
    stats
}

fn apply_record<T: WidgetTree>(
    tree: &mut T,
    pages: &PageMap<T::Node>,
    page: u8,
    record: &ObjectRecord,
    stats: &mut LoadStats,
) {
    let Some(id) = record.id.filter(|&id| id != 0) else {
        stats.comments += 1;
        return;
    };
    let Some(class) = record.kind.and_then(class_for) else {
        stats.skipped += 1;
        return;
    };
    let Some(root) = pages.get(page) else {
        stats.skipped += 1;
        return;
    };

    let parent = match record.parent.filter(|&p| p != 0) {
        Some(pid) => match find_from_id(tree, root, pid) {
            Some(node) => node,
            None => {
                stats.parent_fallbacks += 1;
                root
            }
        },
        None => root,
    };

    // an id is unique within its page, not just under its parent
    if find_from_id(tree, root, id).is_some() {
        stats.skipped += 1;
        return;
    }

    let Some(node) = tree.create(class.kind, parent) else {
        stats.skipped += 1;
        return;
    };
    tree.set_object_id(node, id);
    tree.set_event_hook(node, class.hook);

    if class.kind == WidgetKind::TabView {
        for n in 1..=TAB_VIEW_TABS {
            if let (Some(tab_id), Some(tab)) = (id.checked_add(n), tree.add_tab(node, "")) {
                tree.set_object_id(tab, tab_id);
            }
        }
    }

    for (attr, payload) in record.attrs.iter() {
        tree.process_attribute(node, attr.as_str(), payload.as_str(), true);
    }

    // the new widget must resolve back to the address it was given
    let consistent = locate(tree, pages, node) == Some(Address { page, obj: id })
        && resolve(tree, pages, page, id) == Some(node);
    if consistent {
        stats.created += 1;
    } else {
        stats.inconsistent += 1;
    }
}
