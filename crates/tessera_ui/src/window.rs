//! Windows and the window store.
//!
//! The store keeps windows in display order, back to front. Child windows
//! always sit above their parent, so a front-to-back scan reaches a child
//! before the window that contains it.

use std::fmt;

use tessera_shared::{Rect, Vec2};

use crate::draw::{DrawList, SharedDrawList};
use crate::error::{UiError, UiResult};

/// Unique identifier for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl WindowId {
    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Window behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowFlags(u32);

impl WindowFlags {
    /// No resize grips; the window gets no extra hover padding.
    pub const NO_RESIZE: u32 = 1 << 0;
    /// Wheel input passes through to the parent instead of scrolling.
    pub const NO_SCROLL_WITH_MOUSE: u32 = 1 << 1;
    /// Invisible to hit testing.
    pub const NO_MOUSE_INPUTS: u32 = 1 << 2;
    /// Embedded in a parent window.
    pub const CHILD_WINDOW: u32 = 1 << 3;
    /// Blocks input to every window outside its own tree.
    pub const MODAL: u32 = 1 << 4;

    /// Creates flags from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }
}

/// One window and the geometry routing needs.
#[derive(Debug)]
pub struct Window {
    /// Window identifier.
    pub id: WindowId,
    /// Unique name.
    pub name: String,
    /// Behavior flags.
    pub flags: WindowFlags,
    /// Top-left corner.
    pub pos: Vec2,
    /// Current size.
    pub size: Vec2,
    /// Size when expanded.
    pub size_full: Vec2,
    /// Scroll offset.
    pub scroll: Vec2,
    /// Largest scroll offset per axis. Zero means no room to scroll.
    pub scroll_max: Vec2,
    /// Content region, excluding title bar and scrollbars.
    pub inner_rect: Rect,
    /// Height of the title bar, the only part hit when collapsed.
    pub title_bar_height: f32,
    /// Collapsed to its title bar.
    pub collapsed: bool,
    /// Submitted this frame.
    pub active: bool,
    /// Submitted last frame.
    pub was_active: bool,
    /// Submitted but not shown.
    pub hidden: bool,
    /// Per-window font zoom, changed with Ctrl + wheel.
    pub font_window_scale: f32,
    /// Base font size.
    pub font_size: f32,
    /// Parent for child windows.
    pub parent: Option<WindowId>,
    /// Top-most ancestor, the window itself for roots.
    pub root: WindowId,
    /// Geometry submitted for this window.
    pub draw_list: SharedDrawList,
}

impl Window {
    fn new(id: WindowId, name: String, flags: WindowFlags, parent: Option<WindowId>, root: WindowId) -> Self {
        Self {
            id,
            name,
            flags,
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            size_full: Vec2::ZERO,
            scroll: Vec2::ZERO,
            scroll_max: Vec2::ZERO,
            inner_rect: Rect::ZERO,
            title_bar_height: 0.0,
            collapsed: false,
            active: false,
            was_active: false,
            hidden: false,
            font_window_scale: 1.0,
            font_size: 13.0,
            parent,
            root,
            draw_list: DrawList::new_shared(Rect::ZERO),
        }
    }

    /// Hit-test rectangle: the title bar when collapsed, the full window otherwise.
    #[must_use]
    pub fn rect(&self) -> Rect {
        if self.collapsed {
            Rect::from_pos_size(self.pos, Vec2::new(self.size.x, self.title_bar_height))
        } else {
            Rect::from_pos_size(self.pos, self.size)
        }
    }

    /// True for windows embedded in a parent.
    #[must_use]
    pub fn is_child(&self) -> bool {
        self.flags.has(WindowFlags::CHILD_WINDOW)
    }

    /// Effective font size after global and per-window scaling.
    #[must_use]
    pub fn calc_font_size(&self, global_scale: f32) -> f32 {
        self.font_size * global_scale * self.font_window_scale
    }

    /// Sets the horizontal scroll, clamped to `[0, scroll_max.x]`.
    pub fn set_scroll_x(&mut self, x: f32) {
        self.scroll.x = x.clamp(0.0, self.scroll_max.x.max(0.0));
    }

    /// Sets the vertical scroll, clamped to `[0, scroll_max.y]`.
    pub fn set_scroll_y(&mut self, y: f32) {
        self.scroll.y = y.clamp(0.0, self.scroll_max.y.max(0.0));
    }
}

/// All windows, in display order.
#[derive(Debug, Default)]
pub struct WindowStore {
    /// Back to front.
    windows: Vec<Window>,
    next_id: u32,
}

impl WindowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a window on top of its parent's tree, or on top of
    /// everything for a root window.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::DuplicateWindow`] if the name is taken and
    /// [`UiError::UnknownWindow`] if `parent` does not exist.
    pub fn create_window(&mut self, name: &str, flags: WindowFlags, parent: Option<WindowId>) -> UiResult<WindowId> {
        if self.windows.iter().any(|w| w.name == name) {
            return Err(UiError::DuplicateWindow(name.to_string()));
        }

        let id = WindowId(self.next_id);
        let mut flags = flags;
        let (root, insert_at) = match parent {
            Some(parent_id) => {
                let parent_window = self.window(parent_id)?;
                let root = parent_window.root;
                flags.set(WindowFlags::CHILD_WINDOW);
                (root, self.subtree_end(parent_id))
            }
            None => {
                flags.clear(WindowFlags::CHILD_WINDOW);
                (id, self.windows.len())
            }
        };

        self.next_id += 1;
        self.windows.insert(insert_at, Window::new(id, name.to_string(), flags, parent, root));
        tracing::debug!(window = %id, name, "window created");
        Ok(id)
    }

    /// Gets a window by ID.
    #[must_use]
    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Gets mutable access to a window.
    #[must_use]
    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// Gets a window by ID.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWindow`] if no such window exists.
    pub fn window(&self, id: WindowId) -> UiResult<&Window> {
        self.get(id).ok_or(UiError::UnknownWindow(id))
    }

    /// Gets mutable access to a window.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWindow`] if no such window exists.
    pub fn window_mut(&mut self, id: WindowId) -> UiResult<&mut Window> {
        self.get_mut(id).ok_or(UiError::UnknownWindow(id))
    }

    /// Finds a window by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<WindowId> {
        self.windows.iter().find(|w| w.name == name).map(|w| w.id)
    }

    /// Number of windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True if there are no windows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Windows back to front.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Window> + '_ {
        self.windows.iter()
    }

    /// Windows back to front, mutably.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Window> + '_ {
        self.windows.iter_mut()
    }

    /// Windows front to back, the hit-test order.
    pub fn iter_front_to_back(&self) -> impl Iterator<Item = &Window> + '_ {
        self.windows.iter().rev()
    }

    /// Moves the root tree of `id` above every other tree.
    pub fn bring_to_front(&mut self, id: WindowId) {
        let Some(root) = self.get(id).map(|w| w.root) else {
            return;
        };
        let (tree, rest): (Vec<Window>, Vec<Window>) =
            std::mem::take(&mut self.windows).into_iter().partition(|w| w.root == root);
        self.windows = rest;
        self.windows.extend(tree);
    }

    /// True if `potential_parent` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_child_of(&self, id: WindowId, potential_parent: WindowId) -> bool {
        let mut current = Some(id);
        // A parent chain can never be longer than the store.
        for _ in 0..=self.windows.len() {
            let Some(window_id) = current else {
                return false;
            };
            if window_id == potential_parent {
                return true;
            }
            current = self.get(window_id).and_then(|w| w.parent);
        }
        false
    }

    /// Top-most ancestor of `id`.
    #[must_use]
    pub fn root_of(&self, id: WindowId) -> Option<WindowId> {
        self.get(id).map(|w| w.root)
    }

    /// Front-most active modal window.
    #[must_use]
    pub fn top_modal(&self) -> Option<WindowId> {
        self.iter_front_to_back()
            .find(|w| w.active && w.flags.has(WindowFlags::MODAL))
            .map(|w| w.id)
    }

    /// Index one past the last descendant of `id`.
    fn subtree_end(&self, id: WindowId) -> usize {
        let mut end = self.windows.len();
        if let Some(start) = self.windows.iter().position(|w| w.id == id) {
            end = start + 1;
            while end < self.windows.len() && self.is_child_of(self.windows[end].id, id) {
                end += 1;
            }
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_stack_above_parent() {
        let mut store = WindowStore::new();
        let a = store.create_window("a", WindowFlags::default(), None).unwrap();
        let b = store.create_window("b", WindowFlags::default(), None).unwrap();
        let a_child = store.create_window("a/child", WindowFlags::default(), Some(a)).unwrap();

        let order: Vec<_> = store.iter().map(|w| w.id).collect();
        assert_eq!(order, vec![a, a_child, b]);
        assert!(store.window(a_child).unwrap().is_child());
        assert_eq!(store.root_of(a_child), Some(a));
    }

    #[test]
    fn test_bring_to_front_moves_tree() {
        let mut store = WindowStore::new();
        let a = store.create_window("a", WindowFlags::default(), None).unwrap();
        let a_child = store.create_window("a/child", WindowFlags::default(), Some(a)).unwrap();
        let b = store.create_window("b", WindowFlags::default(), None).unwrap();

        store.bring_to_front(a_child);
        let order: Vec<_> = store.iter().map(|w| w.id).collect();
        assert_eq!(order, vec![b, a, a_child]);
    }

    #[test]
    fn test_is_child_of() {
        let mut store = WindowStore::new();
        let a = store.create_window("a", WindowFlags::default(), None).unwrap();
        let mid = store.create_window("mid", WindowFlags::default(), Some(a)).unwrap();
        let leaf = store.create_window("leaf", WindowFlags::default(), Some(mid)).unwrap();
        let other = store.create_window("other", WindowFlags::default(), None).unwrap();

        assert!(store.is_child_of(leaf, a));
        assert!(store.is_child_of(leaf, leaf));
        assert!(!store.is_child_of(a, leaf));
        assert!(!store.is_child_of(leaf, other));
    }

    #[test]
    fn test_errors() {
        let mut store = WindowStore::new();
        store.create_window("a", WindowFlags::default(), None).unwrap();

        assert_eq!(
            store.create_window("a", WindowFlags::default(), None),
            Err(UiError::DuplicateWindow("a".to_string()))
        );
        assert_eq!(
            store.create_window("b", WindowFlags::default(), Some(WindowId(42))).unwrap_err(),
            UiError::UnknownWindow(WindowId(42))
        );
        assert_eq!(UiError::UnknownWindow(WindowId(42)).to_string(), "unknown window: #42");
    }

    #[test]
    fn test_collapsed_rect_and_scroll_clamp() {
        let mut store = WindowStore::new();
        let id = store.create_window("a", WindowFlags::default(), None).unwrap();
        let window = store.window_mut(id).unwrap();
        window.pos = Vec2::new(10.0, 10.0);
        window.size = Vec2::new(100.0, 200.0);
        window.title_bar_height = 20.0;
        window.scroll_max = Vec2::new(0.0, 50.0);

        window.collapsed = true;
        assert_eq!(window.rect(), Rect::from_coords(10.0, 10.0, 110.0, 30.0));

        window.set_scroll_y(80.0);
        window.set_scroll_x(5.0);
        assert_eq!(window.scroll, Vec2::new(0.0, 50.0));
        window.set_scroll_y(-3.0);
        assert_eq!(window.scroll.y, 0.0);
    }
}
