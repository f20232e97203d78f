//! Per-frame driver.
//!
//! A [`FrameContext`] owns everything that lives across frames: input,
//! windows, routing state and the draw data handed to the renderer. It is
//! passed around by `&mut`; there is no global instance.
//!
//! ```text
//! new_frame(dt) → begin_window(..) / draw ... → render() → DrawData
//! ```

use std::sync::Arc;

use tessera_shared::{Rect, Vec2};

use crate::config::IoConfig;
use crate::draw::{DrawData, SharedDrawList};
use crate::error::UiResult;
use crate::input::{InputState, MouseButton};
use crate::routing::{HoverState, WheelClaims, WheelState};
use crate::window::{WindowFlags, WindowId, WindowStore};

/// State carried from frame to frame.
#[derive(Debug)]
pub struct FrameContext {
    config: IoConfig,
    /// Raw input, filled by the platform layer between frames.
    pub input: InputState,
    /// All windows, back to front.
    pub windows: WindowStore,
    hover: HoverState,
    wheel: WheelState,
    wheel_claims: WheelClaims,
    hovered_id_using_wheel: bool,
    time: f64,
    frame_count: u64,
    draw_data: DrawData,
}

impl FrameContext {
    /// Creates a context from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::InvalidConfig`] if `config` is out of range.
    pub fn new(config: IoConfig) -> UiResult<Self> {
        config.validate()?;
        tracing::info!(
            display = ?config.display_size,
            user_scaling = config.font_allow_user_scaling,
            "frame context created"
        );
        Ok(Self {
            config,
            input: InputState::new(),
            windows: WindowStore::new(),
            hover: HoverState::new(),
            wheel: WheelState::new(),
            wheel_claims: WheelClaims::default(),
            hovered_id_using_wheel: false,
            time: 0.0,
            frame_count: 0,
            draw_data: DrawData::new(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &IoConfig {
        &self.config
    }

    /// Seconds elapsed across all frames.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of frames started.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Creates a window using the configured font size.
    ///
    /// # Errors
    ///
    /// See [`WindowStore::create_window`].
    pub fn create_window(&mut self, name: &str, flags: WindowFlags, parent: Option<WindowId>) -> UiResult<WindowId> {
        let id = self.windows.create_window(name, flags, parent)?;
        let window = self.windows.window_mut(id)?;
        window.font_size = self.config.font_size;
        Ok(id)
    }

    /// Starts a frame: updates the mouse, moves a dragged window, resolves
    /// hovering and routes the wheel.
    pub fn new_frame(&mut self, delta_time: f32) {
        self.draw_data.clear();
        self.frame_count += 1;
        self.time += f64::from(delta_time);
        self.input.delta_time = delta_time;

        self.input.update_mouse_inputs(self.time, &self.config);
        self.update_moving_window();
        self.hover.update(&self.windows, &mut self.input, &self.config);

        self.wheel_claims.hovered_id_prev_using_wheel = self.hovered_id_using_wheel;
        self.hovered_id_using_wheel = false;
        self.wheel.update(
            &mut self.windows,
            &self.input,
            &self.config,
            self.hover.hovered_window,
            self.wheel_claims,
        );

        for window in self.windows.iter_mut() {
            window.was_active = window.active;
            window.active = false;
        }
    }

    /// Marks a window as submitted this frame and returns its list, reset
    /// and clipped to the window.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::UnknownWindow`] if `id` does not exist.
    pub fn begin_window(&mut self, id: WindowId) -> UiResult<SharedDrawList> {
        let display = Rect::from_pos_size(Vec2::ZERO, self.config.display_size);
        let window = self.windows.window_mut(id)?;
        window.active = true;

        let clip = window.rect();
        let list = Arc::clone(&window.draw_list);
        {
            let mut guard = list.write();
            guard.reset_for_new_frame(display);
            guard.push_clip_rect(clip.min, clip.max, true);
        }
        Ok(list)
    }

    /// Starts dragging `id` by its title bar and brings its tree to the front.
    pub fn start_moving_window(&mut self, id: WindowId) {
        let Some(root) = self.windows.root_of(id) else {
            return;
        };
        self.windows.bring_to_front(root);
        self.hover.moving_window = Some(root);
        tracing::debug!(window = %root, "window move started");
    }

    /// The active widget reads the wheel this frame.
    pub fn set_active_id_using_wheel(&mut self, using: bool) {
        self.wheel_claims.active_id_using_wheel = using;
    }

    /// The hovered widget reads the wheel. Takes effect on the next frame.
    pub fn set_hovered_id_using_wheel(&mut self) {
        self.hovered_id_using_wheel = true;
    }

    /// Window under the mouse.
    #[must_use]
    pub fn hovered_window(&self) -> Option<WindowId> {
        self.hover.hovered_window
    }

    /// Root of the window under the mouse.
    #[must_use]
    pub fn hovered_root_window(&self) -> Option<WindowId> {
        self.hover.hovered_root
    }

    /// Window being dragged.
    #[must_use]
    pub fn moving_window(&self) -> Option<WindowId> {
        self.hover.moving_window
    }

    /// Window holding the wheel lock.
    #[must_use]
    pub fn wheeling_window(&self) -> Option<WindowId> {
        self.wheel.window
    }

    /// Full wheel lock state.
    #[must_use]
    pub fn wheel_state(&self) -> &WheelState {
        &self.wheel
    }

    /// The application should leave mouse input to the UI.
    #[must_use]
    pub fn want_capture_mouse(&self) -> bool {
        self.hover.want_capture_mouse
    }

    /// See [`InputState::is_mouse_dragging`].
    #[must_use]
    pub fn is_mouse_dragging(&self, button: MouseButton, threshold: f32) -> bool {
        self.input.is_mouse_dragging(button, threshold, &self.config)
    }

    /// True if `potential_parent` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_window_child_of(&self, id: WindowId, potential_parent: WindowId) -> bool {
        self.windows.is_child_of(id, potential_parent)
    }

    /// Ends the frame and collects every shown window's list, back to front.
    pub fn render(&mut self) -> &DrawData {
        self.input.end_frame();

        let data = &mut self.draw_data;
        data.clear();
        data.valid = true;
        data.display_pos = Vec2::ZERO;
        data.display_size = self.config.display_size;
        data.framebuffer_scale = self.config.framebuffer_scale;
        for window in self.windows.iter().filter(|w| w.active && !w.hidden) {
            data.add_draw_list(&window.draw_list);
        }

        tracing::trace!(
            frame = self.frame_count,
            lists = data.cmd_lists_count(),
            vertices = data.total_vtx_count,
            "frame rendered"
        );
        &self.draw_data
    }

    /// Draw data of the last rendered frame. Invalid until `render`.
    #[must_use]
    pub fn draw_data(&self) -> &DrawData {
        &self.draw_data
    }

    fn update_moving_window(&mut self) {
        let Some(id) = self.hover.moving_window else {
            return;
        };
        if !self.input.mouse_down(MouseButton::Left) {
            self.hover.moving_window = None;
            tracing::debug!(window = %id, "window move ended");
            return;
        }
        let delta = self.input.mouse_delta;
        match self.windows.get_mut(id) {
            Some(window) => window.pos = (window.pos + delta).floor(),
            None => self.hover.moving_window = None,
        }
    }
}
