//! Mouse wheel routing.
//!
//! Once a window has consumed wheel input it stays the wheel target for
//! `wheel_lock_timer` seconds, so scrolling an outer window does not get
//! captured by an inner one sliding under the mouse. Moving the mouse past
//! the drag threshold releases the lock early.

use tessera_shared::{
    Vec2, FONT_SCALE_MAX, FONT_SCALE_MIN, FONT_SCALE_STEP, SCROLL_STEP_FONT_X, SCROLL_STEP_FONT_Y,
    SCROLL_STEP_MAX_RATIO,
};

use crate::config::IoConfig;
use crate::input::InputState;
use crate::window::{Window, WindowFlags, WindowId, WindowStore};

/// Widgets that want the wheel for themselves this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelClaims {
    /// The active widget (being dragged or edited) reads the wheel.
    pub active_id_using_wheel: bool,
    /// The widget hovered last frame read the wheel.
    pub hovered_id_prev_using_wheel: bool,
}

impl WheelClaims {
    /// True if either claim holds.
    #[must_use]
    pub const fn any(self) -> bool {
        self.active_id_using_wheel || self.hovered_id_prev_using_wheel
    }
}

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Wheel lock: idle when `window` is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelState {
    /// Window currently receiving wheel input.
    pub window: Option<WindowId>,
    /// Seconds left before the lock expires.
    pub timer: f32,
    /// Mouse position when the lock was taken.
    pub ref_mouse_pos: Vec2,
}

impl WheelState {
    /// Creates an idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a window holds the wheel.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.window.is_some()
    }

    /// Routes this frame's wheel input.
    pub fn update(
        &mut self,
        windows: &mut WindowStore,
        input: &InputState,
        config: &IoConfig,
        hovered: Option<WindowId>,
        claims: WheelClaims,
    ) {
        self.decay(input, config);

        if input.wheel == 0.0 && input.wheel_h == 0.0 {
            return;
        }
        if claims.any() {
            return;
        }

        let Some(candidate) = self.window.or(hovered) else {
            return;
        };
        let Some(window) = windows.get(candidate) else {
            self.unlock();
            return;
        };
        if window.collapsed {
            return;
        }

        if input.modifiers.ctrl {
            if config.font_allow_user_scaling && input.wheel != 0.0 {
                self.lock(candidate, input, config);
                zoom(windows, candidate, input);
            }
            return;
        }

        let (mut wheel_x, mut wheel_y) = (input.wheel_h, input.wheel);
        if wheel_y != 0.0 && input.modifiers.shift && !config.mac_osx_behaviors {
            wheel_x = wheel_y;
            wheel_y = 0.0;
        }

        if wheel_y != 0.0 {
            let target = scroll_target(windows, candidate, Axis::Y);
            if let Some(window) = windows.get_mut(target) {
                scroll_window(window, Axis::Y, wheel_y, config.font_global_scale);
            }
            self.lock(target, input, config);
        }
        if wheel_x != 0.0 {
            let target = scroll_target(windows, candidate, Axis::X);
            if let Some(window) = windows.get_mut(target) {
                scroll_window(window, Axis::X, wheel_x, config.font_global_scale);
            }
            self.lock(target, input, config);
        }
    }

    fn decay(&mut self, input: &InputState, config: &IoConfig) {
        if self.window.is_none() {
            return;
        }
        self.timer -= input.delta_time;
        if let Some(pos) = input.mouse_pos {
            let threshold = config.mouse_drag_threshold;
            if (pos - self.ref_mouse_pos).length_squared() > threshold * threshold {
                self.timer = 0.0;
            }
        }
        if self.timer <= 0.0 {
            self.unlock();
        }
    }

    fn lock(&mut self, window: WindowId, input: &InputState, config: &IoConfig) {
        if self.window != Some(window) {
            tracing::debug!(window = %window, "wheel locked");
        }
        self.window = Some(window);
        self.timer = config.wheel_lock_timer;
        self.ref_mouse_pos = input.mouse_pos.unwrap_or_else(|| input.last_valid_mouse_pos());
    }

    fn unlock(&mut self) {
        if let Some(window) = self.window.take() {
            tracing::debug!(window = %window, "wheel released");
        }
        self.timer = 0.0;
    }
}

/// Walks from `start` up through child windows that cannot use the wheel
/// on `axis`.
fn scroll_target(windows: &WindowStore, start: WindowId, axis: Axis) -> WindowId {
    let mut current = start;
    // A parent chain can never be longer than the store.
    for _ in 0..windows.len() {
        let Some(window) = windows.get(current) else {
            break;
        };
        let scroll_max = match axis {
            Axis::X => window.scroll_max.x,
            Axis::Y => window.scroll_max.y,
        };
        let opts_out = window.flags.has(WindowFlags::NO_SCROLL_WITH_MOUSE)
            && !window.flags.has(WindowFlags::NO_MOUSE_INPUTS);
        let passes_through = window.is_child() && (scroll_max == 0.0 || opts_out);
        if !passes_through {
            break;
        }
        let Some(parent) = window.parent else {
            break;
        };
        current = parent;
    }
    current
}

fn scroll_window(window: &mut Window, axis: Axis, wheel: f32, font_global_scale: f32) {
    if window.flags.has(WindowFlags::NO_SCROLL_WITH_MOUSE) || window.flags.has(WindowFlags::NO_MOUSE_INPUTS) {
        return;
    }
    let font_size = window.calc_font_size(font_global_scale);
    match axis {
        Axis::Y => {
            let max_step = window.inner_rect.height() * SCROLL_STEP_MAX_RATIO;
            let step = (SCROLL_STEP_FONT_Y * font_size).min(max_step).floor();
            window.set_scroll_y(window.scroll.y - wheel * step);
        }
        Axis::X => {
            let max_step = window.inner_rect.width() * SCROLL_STEP_MAX_RATIO;
            let step = (SCROLL_STEP_FONT_X * font_size).min(max_step).floor();
            window.set_scroll_x(window.scroll.x - wheel * step);
        }
    }
}

/// Ctrl + wheel font zoom. Root windows also grow or shrink around the mouse.
fn zoom(windows: &mut WindowStore, id: WindowId, input: &InputState) {
    let Some(window) = windows.get_mut(id) else {
        return;
    };
    let old_scale = window.font_window_scale;
    let new_scale = (old_scale + input.wheel * FONT_SCALE_STEP).clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
    let ratio = new_scale / old_scale;
    window.font_window_scale = new_scale;

    if window.root == window.id {
        let mouse = input.mouse_pos.unwrap_or_else(|| input.last_valid_mouse_pos());
        let offset = (mouse - window.pos) * (1.0 - ratio);
        window.pos = (window.pos + offset).floor();
        window.size = (window.size * ratio).floor();
        window.size_full = (window.size_full * ratio).floor();
    }
    tracing::debug!(window = %id, scale = new_scale, "window font zoom");
}
