//! Page map.
//!
//! The panel shows one of a fixed set of pages; two overlay layers (top
//! and system) exist permanently outside that sequence for modal and
//! system UI. Pages are created once at startup and never destroyed,
//! only cleared or loaded as the active screen. Both overlays are
//! protected from clearing and from navigation.

use crate::traits::WidgetTree;

/// Number of regular pages
pub const PAGE_COUNT: usize = 12;

/// Address of the top overlay layer
pub const PAGE_TOP: u8 = 254;

/// Address of the system overlay layer
pub const PAGE_SYS: u8 = 255;

/// Page-level operation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageError {
    /// Page id outside `0..PAGE_COUNT` and not an overlay
    UnknownPage,
    /// Operation refused on an overlay layer
    LayerProtected,
}

/// Fixed page array plus the two overlay handles and the active page
#[derive(Debug)]
pub struct PageMap<N> {
    pages: [N; PAGE_COUNT],
    layer_top: N,
    layer_sys: N,
    current: u8,
}

impl<N: Copy + PartialEq> PageMap<N> {
    /// Create all pages on the toolkit and capture the overlay handles
    pub fn new<T: WidgetTree<Node = N>>(tree: &mut T) -> Self {
        let pages = core::array::from_fn(|_| tree.create_page());
        Self {
            pages,
            layer_top: tree.layer_top(),
            layer_sys: tree.layer_sys(),
            current: 0,
        }
    }

    /// Whether `page` addresses one of the overlay layers
    pub fn is_layer(page: u8) -> bool {
        page == PAGE_TOP || page == PAGE_SYS
    }

    /// Root handle for a page id, overlays included
    pub fn get(&self, page: u8) -> Option<N> {
        match page {
            PAGE_TOP => Some(self.layer_top),
            PAGE_SYS => Some(self.layer_sys),
            p if (p as usize) < PAGE_COUNT => Some(self.pages[p as usize]),
            _ => None,
        }
    }

    /// Page id for a screen handle; overlays are matched first
    pub fn id_of(&self, screen: N) -> Option<u8> {
        if screen == self.layer_top {
            return Some(PAGE_TOP);
        }
        if screen == self.layer_sys {
            return Some(PAGE_SYS);
        }
        self.pages
            .iter()
            .position(|&p| p == screen)
            .map(|i| i as u8)
    }

    /// Currently active page id
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Navigate to `page`. Overlays and unknown ids are refused and the
    /// previous page stays active.
    pub fn set_current<T: WidgetTree<Node = N>>(
        &mut self,
        tree: &mut T,
        page: u8,
    ) -> Result<(), PageError> {
        if Self::is_layer(page) {
            return Err(PageError::LayerProtected);
        }
        let root = self.get(page).ok_or(PageError::UnknownPage)?;
        self.current = page;
        tree.load_screen(root);
        Ok(())
    }

    /// Remove all children from a page. Overlays are never cleared.
    pub fn clear<T: WidgetTree<Node = N>>(
        &self,
        tree: &mut T,
        page: u8,
    ) -> Result<(), PageError> {
        if Self::is_layer(page) {
            return Err(PageError::LayerProtected);
        }
        let root = self.get(page).ok_or(PageError::UnknownPage)?;
        tree.clear_children(root);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTree;

    #[test]
    fn test_every_page_resolves() {
        let mut tree = MockTree::new();
        let pages = PageMap::new(&mut tree);

        for id in 0..PAGE_COUNT as u8 {
            assert!(pages.get(id).is_some());
        }
        assert!(pages.get(PAGE_COUNT as u8).is_none());
        assert!(pages.get(200).is_none());
    }

    #[test]
    fn test_overlays_are_distinct_from_pages() {
        let mut tree = MockTree::new();
        let pages = PageMap::new(&mut tree);

        let top = pages.get(PAGE_TOP).unwrap();
        let sys = pages.get(PAGE_SYS).unwrap();
        assert_ne!(top, sys);
        for id in 0..PAGE_COUNT as u8 {
            let page = pages.get(id).unwrap();
            assert_ne!(page, top);
            assert_ne!(page, sys);
        }
    }

    #[test]
    fn test_id_of_roundtrip() {
        let mut tree = MockTree::new();
        let pages = PageMap::new(&mut tree);

        for id in [0u8, 5, 11, PAGE_TOP, PAGE_SYS] {
            let root = pages.get(id).unwrap();
            assert_eq!(pages.id_of(root), Some(id));
        }
    }

    #[test]
    fn test_navigation() {
        let mut tree = MockTree::new();
        let mut pages = PageMap::new(&mut tree);

        assert_eq!(pages.current(), 0);
        pages.set_current(&mut tree, 3).unwrap();
        assert_eq!(pages.current(), 3);
        assert_eq!(tree.loaded_screen(), pages.get(3));
    }

    #[test]
    fn test_navigation_to_layer_refused() {
        let mut tree = MockTree::new();
        let mut pages = PageMap::new(&mut tree);

        pages.set_current(&mut tree, 2).unwrap();
        assert_eq!(
            pages.set_current(&mut tree, PAGE_TOP),
            Err(PageError::LayerProtected)
        );
        assert_eq!(
            pages.set_current(&mut tree, PAGE_SYS),
            Err(PageError::LayerProtected)
        );
        assert_eq!(
            pages.set_current(&mut tree, 99),
            Err(PageError::UnknownPage)
        );
        assert_eq!(pages.current(), 2);
    }

    #[test]
    fn test_clear_protects_both_overlays() {
        let mut tree = MockTree::new();
        let pages = PageMap::new(&mut tree);

        assert_eq!(
            pages.clear(&mut tree, PAGE_TOP),
            Err(PageError::LayerProtected)
        );
        assert_eq!(
            pages.clear(&mut tree, PAGE_SYS),
            Err(PageError::LayerProtected)
        );
        assert!(pages.clear(&mut tree, 0).is_ok());
    }
}
