//! Frame output handed to a renderer backend.

use std::sync::Arc;

use tessera_shared::Vec2;

use super::command::DrawCmd;
use super::list::{DrawList, SharedDrawList};

/// Backend side of the draw contract.
///
/// [`DrawData::render_with`] walks lists and commands in order and calls back here;
/// a backend only has to bind state and issue indexed draws.
pub trait RenderBackend {
    /// Restores the default pipeline state (viewport, blend, projection).
    fn setup_render_state(&mut self, draw_data: &DrawData);

    /// Draws `cmd.elem_count` indices starting at `cmd.idx_offset`, with
    /// `cmd.vtx_offset` added to each, after binding texture and clip rect.
    fn draw_elements(&mut self, list: &DrawList, cmd: &DrawCmd);
}

/// All draw lists of one frame, in back-to-front order.
///
/// Lists are shared with the context that produced them. `clone()` copies
/// the handles, not the buffers, so a snapshot is only stable as long as
/// nobody rebuilds those lists in place.
#[derive(Debug, Clone, Default)]
pub struct DrawData {
    /// True between `FrameContext::render` and the next frame start.
    pub valid: bool,
    /// Lists to render, in order.
    pub draw_lists: Vec<SharedDrawList>,
    /// Sum of all lists' vertex counts.
    pub total_vtx_count: usize,
    /// Sum of all lists' index counts.
    pub total_idx_count: usize,
    /// Upper-left of the rendered area.
    pub display_pos: Vec2,
    /// Size of the rendered area.
    pub display_size: Vec2,
    /// Framebuffer pixels per display unit.
    pub framebuffer_scale: Vec2,
}

impl DrawData {
    /// Creates an empty, invalid draw data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to the empty, invalid state.
    pub fn clear(&mut self) {
        self.valid = false;
        self.draw_lists.clear();
        self.total_vtx_count = 0;
        self.total_idx_count = 0;
        self.display_pos = Vec2::ZERO;
        self.display_size = Vec2::ZERO;
        self.framebuffer_scale = Vec2::ZERO;
    }

    /// Number of lists.
    #[must_use]
    pub fn cmd_lists_count(&self) -> usize {
        self.draw_lists.len()
    }

    /// Appends a list unless it has nothing to render.
    pub fn add_draw_list(&mut self, list: &SharedDrawList) {
        let guard = list.read();
        if guard.is_empty() {
            return;
        }
        self.total_vtx_count += guard.vtx_buffer.len();
        self.total_idx_count += guard.idx_buffer.len();
        drop(guard);
        self.draw_lists.push(Arc::clone(list));
    }

    /// Scales every clip rect in place; x by `scale.x`, y by `scale.y`.
    ///
    /// Used when the framebuffer resolution differs from the display size.
    pub fn scale_clip_rects(&self, scale: Vec2) {
        for list in &self.draw_lists {
            let mut list = list.write();
            for cmd in &mut list.cmd_buffer {
                cmd.clip_rect = cmd.clip_rect.scale(scale);
            }
        }
    }

    /// Calls `f` for every command of every list, in submission order.
    pub fn for_each_cmd(&self, mut f: impl FnMut(&DrawList, &DrawCmd)) {
        for list in &self.draw_lists {
            let list = list.read();
            for cmd in &list.cmd_buffer {
                f(&list, cmd);
            }
        }
    }

    /// Replays the frame into `backend`. Does nothing unless `valid`.
    pub fn render_with<B: RenderBackend>(&self, backend: &mut B) {
        if !self.valid {
            return;
        }
        backend.setup_render_state(self);

        self.for_each_cmd(|list, cmd| {
            if cmd.user_callback.is_some_and(|cb| cb.is_reset_render_state()) {
                backend.setup_render_state(self);
            } else if !cmd.invoke_callback(list) && cmd.elem_count > 0 {
                backend.draw_elements(list, cmd);
            }
        });
    }
}
