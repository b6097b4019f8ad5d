//! Page/object address resolution.
//!
//! Forward: `(page, object)` to a widget handle, by depth-first search
//! over the page's subtree. Object id `0` addresses the page root itself.
//! Tab-view children are not regular children in the toolkit, so the
//! search descends into them explicitly.
//!
//! Reverse: widget handle to `(page, object)`, by walking up to the
//! owning screen and matching it against the overlays and the page
//! array. Nodes without an id are not addressable and resolve to
//! nothing. Neither direction mutates the tree.

use crate::page::PageMap;
use crate::traits::WidgetTree;

/// A resolved page/object coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address {
    pub page: u8,
    pub obj: u8,
}

/// Depth-first search for an object id within a subtree.
///
/// `id == 0` returns the subtree root. First match wins; the order is
/// deterministic for a fixed tree (children in order, then each
/// tab-view's tabs).
pub fn find_from_id<T: WidgetTree>(tree: &T, parent: T::Node, id: u8) -> Option<T::Node> {
    if id == 0 {
        return Some(parent);
    }

    for i in 0..tree.child_count(parent) {
        let child = tree.child(parent, i)?;
        if tree.object_id(child) == id {
            return Some(child);
        }

        if let Some(hit) = find_from_id(tree, child, id) {
            return Some(hit);
        }

        if tree.is_tab_view(child) {
            for t in 0..tree.tab_count(child) {
                let tab = tree.tab(child, t)?;
                if tree.object_id(tab) == id {
                    return Some(tab);
                }
                if let Some(hit) = find_from_id(tree, tab, id) {
                    return Some(hit);
                }
            }
        }
    }

    None
}

/// Resolve a `(page, object)` address to a widget handle
pub fn resolve<T: WidgetTree>(
    tree: &T,
    pages: &PageMap<T::Node>,
    page: u8,
    obj: u8,
) -> Option<T::Node> {
    let root = pages.get(page)?;
    find_from_id(tree, root, obj)
}

/// Resolve a widget handle back to its address.
///
/// Fails for nodes without an object id and for nodes whose screen is
/// not a known page or overlay (transient toolkit internals).
pub fn locate<T: WidgetTree>(
    tree: &T,
    pages: &PageMap<T::Node>,
    node: T::Node,
) -> Option<Address> {
    let page = pages.id_of(tree.screen_of(node))?;
    let obj = tree.object_id(node);
    if obj == 0 {
        return None;
    }
    Some(Address { page, obj })
}
