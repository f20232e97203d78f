//! Input state for the frame.
//!
//! The platform layer feeds raw events (position, buttons, wheel,
//! modifiers); `update_mouse_inputs` turns them into per-frame facts
//! (clicked, released, double-clicked, drag distance) once at frame start.

use tessera_shared::Vec2;

use crate::config::IoConfig;

/// Number of tracked mouse buttons.
pub const MOUSE_BUTTON_COUNT: usize = 3;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

impl MouseButton {
    /// All buttons, in index order.
    pub const ALL: [Self; MOUSE_BUTTON_COUNT] = [Self::Left, Self::Right, Self::Middle];

    /// Returns the slot index for a button.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

/// Per-button tracking.
#[derive(Debug, Clone, Copy)]
struct ButtonState {
    down: bool,
    clicked: bool,
    released: bool,
    double_clicked: bool,
    /// Pressed while over the UI (or with the UI already owning input).
    owned: bool,
    /// Seconds held, -1 when up.
    down_duration: f32,
    down_duration_prev: f32,
    clicked_time: f64,
    clicked_pos: Vec2,
    drag_max_distance_sqr: f32,
    drag_max_distance_abs: Vec2,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self {
            down: false,
            clicked: false,
            released: false,
            double_clicked: false,
            owned: false,
            down_duration: -1.0,
            down_duration_prev: -1.0,
            clicked_time: f64::NEG_INFINITY,
            clicked_pos: Vec2::ZERO,
            drag_max_distance_sqr: 0.0,
            drag_max_distance_abs: Vec2::ZERO,
        }
    }
}

/// Input state for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Mouse position, `None` when the mouse is outside every platform window.
    pub mouse_pos: Option<Vec2>,
    /// Mouse position at the previous frame start.
    pub mouse_pos_prev: Option<Vec2>,
    /// Movement since the previous frame. Zero if either position is unknown.
    pub mouse_delta: Vec2,
    /// Vertical wheel notches this frame (positive = away from the user).
    pub wheel: f32,
    /// Horizontal wheel notches this frame.
    pub wheel_h: f32,
    /// Modifier keys state.
    pub modifiers: Modifiers,
    /// Seconds since the previous frame.
    pub delta_time: f32,
    last_valid_mouse_pos: Vec2,
    buttons: [ButtonState; MOUSE_BUTTON_COUNT],
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates mouse position.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse_pos = Some(Vec2::new(x, y));
    }

    /// Marks the mouse as outside every window.
    pub fn clear_mouse_pos(&mut self) {
        self.mouse_pos = None;
    }

    /// Records a mouse button press.
    pub fn mouse_button_down(&mut self, button: MouseButton) {
        self.buttons[button.index()].down = true;
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        self.buttons[button.index()].down = false;
    }

    /// Records scroll input.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.wheel_h += dx;
        self.wheel += dy;
    }

    /// Replaces the modifier state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Last position the mouse was known at.
    #[must_use]
    pub fn last_valid_mouse_pos(&self) -> Vec2 {
        self.last_valid_mouse_pos
    }

    /// Turns raw button and position state into this frame's events.
    pub fn update_mouse_inputs(&mut self, now: f64, config: &IoConfig) {
        if let Some(pos) = self.mouse_pos {
            let pos = pos.floor();
            self.mouse_pos = Some(pos);
            self.last_valid_mouse_pos = pos;
        }

        self.mouse_delta = match (self.mouse_pos, self.mouse_pos_prev) {
            (Some(pos), Some(prev)) => pos - prev,
            _ => Vec2::ZERO,
        };
        self.mouse_pos_prev = self.mouse_pos;

        let double_click_dist_sqr = config.mouse_double_click_max_dist * config.mouse_double_click_max_dist;
        for button in &mut self.buttons {
            button.clicked = button.down && button.down_duration < 0.0;
            button.released = !button.down && button.down_duration >= 0.0;
            button.down_duration_prev = button.down_duration;
            button.down_duration = if !button.down {
                -1.0
            } else if button.down_duration < 0.0 {
                0.0
            } else {
                button.down_duration + self.delta_time
            };
            button.double_clicked = false;

            let from_click = self.mouse_pos.map_or(Vec2::ZERO, |pos| pos - button.clicked_pos);
            if button.clicked {
                if now - button.clicked_time < f64::from(config.mouse_double_click_time) {
                    if from_click.length_squared() < double_click_dist_sqr {
                        button.double_clicked = true;
                    }
                    // A third click starts over instead of chaining.
                    button.clicked_time = f64::NEG_INFINITY;
                } else {
                    button.clicked_time = now;
                }
                button.clicked_pos = self.mouse_pos.unwrap_or(self.last_valid_mouse_pos);
                button.drag_max_distance_sqr = 0.0;
                button.drag_max_distance_abs = Vec2::ZERO;
            } else if button.down {
                button.drag_max_distance_sqr = button.drag_max_distance_sqr.max(from_click.length_squared());
                button.drag_max_distance_abs = button.drag_max_distance_abs.max(from_click.abs());
            }
        }
    }

    /// Clears per-frame wheel input. Called when the frame is rendered.
    pub fn end_frame(&mut self) {
        self.wheel = 0.0;
        self.wheel_h = 0.0;
    }

    /// Returns true if the mouse button was clicked this frame.
    #[must_use]
    pub fn mouse_clicked(&self, button: MouseButton) -> bool {
        self.buttons[button.index()].clicked
    }

    /// Returns true if the mouse button was released this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.buttons[button.index()].released
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()].down
    }

    /// Returns true if a double-click occurred this frame.
    #[must_use]
    pub fn mouse_double_clicked(&self, button: MouseButton) -> bool {
        self.buttons[button.index()].double_clicked
    }

    /// Seconds the button has been held, or -1 when up.
    #[must_use]
    pub fn mouse_down_duration(&self, button: MouseButton) -> f32 {
        self.buttons[button.index()].down_duration
    }

    /// True if the button is held and has moved past `threshold` since the
    /// press. A negative threshold uses the configured drag threshold.
    #[must_use]
    pub fn is_mouse_dragging(&self, button: MouseButton, threshold: f32, config: &IoConfig) -> bool {
        let state = &self.buttons[button.index()];
        if !state.down {
            return false;
        }
        let threshold = if threshold < 0.0 { config.mouse_drag_threshold } else { threshold };
        state.drag_max_distance_sqr >= threshold * threshold
    }

    /// Largest per-axis distance from the press position while held.
    #[must_use]
    pub fn mouse_drag_max_distance_abs(&self, button: MouseButton) -> Vec2 {
        self.buttons[button.index()].drag_max_distance_abs
    }

    /// True if any button is held.
    #[must_use]
    pub fn any_mouse_down(&self) -> bool {
        self.buttons.iter().any(|b| b.down)
    }

    /// Held button pressed the earliest, if any.
    #[must_use]
    pub(crate) fn earliest_button_down(&self) -> Option<MouseButton> {
        MouseButton::ALL
            .into_iter()
            .filter(|b| self.buttons[b.index()].down)
            .min_by(|a, b| {
                self.buttons[a.index()]
                    .clicked_time
                    .total_cmp(&self.buttons[b.index()].clicked_time)
            })
    }

    /// Records whether the UI owns the press of `button`.
    pub(crate) fn set_mouse_owned(&mut self, button: MouseButton, owned: bool) {
        self.buttons[button.index()].owned = owned;
    }

    /// True if the UI owns the press of `button`.
    #[must_use]
    pub fn mouse_owned(&self, button: MouseButton) -> bool {
        self.buttons[button.index()].owned
    }
}
