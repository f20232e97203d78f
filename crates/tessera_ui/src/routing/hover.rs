//! Hovered window resolution and mouse capture flags.

use tessera_shared::Vec2;

use crate::config::IoConfig;
use crate::input::{InputState, MouseButton};
use crate::window::{WindowFlags, WindowId, WindowStore};

/// Result of hover resolution for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    /// Window under the mouse, after modal and ownership filtering.
    pub hovered_window: Option<WindowId>,
    /// Root of `hovered_window`.
    pub hovered_root: Option<WindowId>,
    /// Window being dragged by its title bar.
    pub moving_window: Option<WindowId>,
    /// False while a button pressed outside the UI is held.
    pub mouse_avail: bool,
    /// The application should not handle mouse input this frame.
    pub want_capture_mouse: bool,
}

/// Front-most window under `mouse`.
///
/// Skips inactive, hidden and input-less windows. Resizable root windows
/// are hit `padding` pixels outside their rect.
#[must_use]
pub fn find_hovered_window(windows: &WindowStore, mouse: Option<Vec2>, padding: f32) -> Option<WindowId> {
    let mouse = mouse?;
    windows
        .iter_front_to_back()
        .filter(|w| w.active && !w.hidden && !w.flags.has(WindowFlags::NO_MOUSE_INPUTS))
        .find(|w| {
            let padded = !w.is_child() && !w.flags.has(WindowFlags::NO_RESIZE);
            let rect = if padded { w.rect().expand(padding) } else { w.rect() };
            rect.contains(mouse)
        })
        .map(|w| w.id)
}

impl HoverState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the hovered window and records which button presses the
    /// UI owns.
    pub fn update(&mut self, windows: &WindowStore, input: &mut InputState, config: &IoConfig) {
        let moving = self
            .moving_window
            .filter(|&id| windows.get(id).is_some_and(|w| !w.flags.has(WindowFlags::NO_MOUSE_INPUTS)));
        let mut hovered =
            moving.or_else(|| find_hovered_window(windows, input.mouse_pos, config.window_hover_padding));
        let mut hovered_root = hovered.and_then(|id| windows.root_of(id));

        if let Some(modal) = windows.top_modal() {
            if hovered_root.is_some_and(|root| !windows.is_child_of(root, modal)) {
                hovered = None;
                hovered_root = None;
            }
        }

        for button in MouseButton::ALL {
            if input.mouse_clicked(button) {
                input.set_mouse_owned(button, hovered.is_some());
            }
        }

        let mouse_avail = input.earliest_button_down().map_or(true, |b| input.mouse_owned(b));
        if !mouse_avail {
            hovered = None;
            hovered_root = None;
        }

        self.hovered_window = hovered;
        self.hovered_root = hovered_root;
        self.mouse_avail = mouse_avail;
        self.want_capture_mouse = mouse_avail && (hovered.is_some() || input.any_mouse_down());
        tracing::trace!(hovered = ?self.hovered_window, capture = self.want_capture_mouse, "hover resolved");
    }
}
