//! Draw list: the per-window command, index and vertex buffers.
//!
//! Widgets append geometry here. Every append lands in the trailing
//! command when its header still matches the list's current header;
//! a header change (clip rect, texture, vertex offset) opens a new
//! command. That is the whole batching strategy: fewer header changes,
//! fewer GPU draw calls.

use std::sync::Arc;

use parking_lot::RwLock;
use tessera_shared::{Rect, Vec2};

use super::command::{
    CallbackData, DrawCallback, DrawCmd, DrawCmdHeader, DrawIdx, DrawVert, TextureId, COL32_A_MASK,
};
use super::splitter::DrawListSplitter;

/// A draw list shared between the context that fills it and the draw data
/// a renderer reads.
pub type SharedDrawList = Arc<RwLock<DrawList>>;

/// Vertex count at which a 16-bit index backend needs a new `vtx_offset`.
const VTX_OFFSET_WRAP: u32 = 1 << 16;

/// Clip rect used when the owner never supplied one.
const DEFAULT_FULL_SCREEN_CLIP: Rect = Rect::from_coords(-8192.0, -8192.0, 8192.0, 8192.0);

/// Draw list behaviour flags (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawListFlags(u32);

impl DrawListFlags {
    /// Start a new command with a fresh `vtx_offset` before the vertex
    /// index would exceed 16 bits.
    pub const ALLOW_VTX_OFFSET: u32 = 1 << 0;

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

/// Command, index and vertex buffers for one rendering context.
///
/// `cmd_buffer` is never empty once a public call returns; the last entry is
/// the command new geometry goes into.
#[derive(Debug)]
pub struct DrawList {
    /// Draw commands, in submission order.
    pub cmd_buffer: Vec<DrawCmd>,
    /// Triangle indices, relative to each command's `vtx_offset`.
    pub idx_buffer: Vec<DrawIdx>,
    /// Vertices. Not split by channels.
    pub vtx_buffer: Vec<DrawVert>,
    /// Behaviour flags.
    pub flags: DrawListFlags,
    /// Header new commands inherit.
    pub(crate) cmd_header: DrawCmdHeader,
    /// Next vertex index, relative to `cmd_header.vtx_offset`.
    vtx_current_idx: u32,
    clip_rect_stack: Vec<Rect>,
    texture_id_stack: Vec<TextureId>,
    clip_rect_full_screen: Rect,
    splitter: DrawListSplitter,
}

impl DrawList {
    /// Creates an empty list ready for geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_full_screen_clip(DEFAULT_FULL_SCREEN_CLIP)
    }

    /// Creates an empty list whose outermost clip rect is `clip`.
    #[must_use]
    pub fn with_full_screen_clip(clip: Rect) -> Self {
        let mut list = Self {
            cmd_buffer: Vec::with_capacity(64),
            idx_buffer: Vec::with_capacity(1024),
            vtx_buffer: Vec::with_capacity(1024),
            flags: DrawListFlags::default(),
            cmd_header: DrawCmdHeader::default(),
            vtx_current_idx: 0,
            clip_rect_stack: Vec::with_capacity(16),
            texture_id_stack: Vec::with_capacity(4),
            clip_rect_full_screen: clip,
            splitter: DrawListSplitter::default(),
        };
        list.reset_for_new_frame(clip);
        list
    }

    /// Wraps a fresh list for sharing with draw data.
    #[must_use]
    pub fn new_shared(clip: Rect) -> SharedDrawList {
        Arc::new(RwLock::new(Self::with_full_screen_clip(clip)))
    }

    /// Clears all buffers and stacks, keeping their capacity.
    pub fn reset_for_new_frame(&mut self, clip_full_screen: Rect) {
        // A list must be merged before it is reused.
        assert!(
            self.splitter.channel_count() <= 1,
            "draw list reset while split into {} channels",
            self.splitter.channel_count()
        );

        self.cmd_buffer.clear();
        self.idx_buffer.clear();
        self.vtx_buffer.clear();
        self.clip_rect_stack.clear();
        self.texture_id_stack.clear();
        self.splitter.clear();
        self.vtx_current_idx = 0;
        self.clip_rect_full_screen = clip_full_screen;
        self.cmd_header = DrawCmdHeader {
            clip_rect: clip_full_screen,
            texture_id: TextureId::NULL,
            vtx_offset: 0,
        };
        self.cmd_buffer.push(DrawCmd::from_header(self.cmd_header, 0));
    }

    /// Returns the header new geometry will be drawn with.
    #[must_use]
    pub fn current_header(&self) -> DrawCmdHeader {
        self.cmd_header
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn clip_rect(&self) -> Rect {
        self.cmd_header.clip_rect
    }

    /// Returns the current texture.
    #[must_use]
    pub fn texture_id(&self) -> TextureId {
        self.cmd_header.texture_id
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Opens a new command carrying the current header.
    ///
    /// A trailing empty command is reused instead of duplicated.
    pub fn add_draw_cmd(&mut self) {
        let idx_offset = self.next_idx_offset();
        if let Some(last) = self.cmd_buffer.last_mut() {
            if last.is_unused() {
                last.set_header(self.cmd_header);
                last.idx_offset = idx_offset;
                return;
            }
        }
        self.cmd_buffer.push(DrawCmd::from_header(self.cmd_header, idx_offset));
    }

    /// Drops a trailing empty, callback-less command.
    pub fn pop_unused_draw_cmd(&mut self) {
        if self.cmd_buffer.last().is_some_and(DrawCmd::is_unused) {
            self.cmd_buffer.pop();
        }
    }

    /// Inserts a callback. Renderers call it instead of drawing.
    pub fn add_callback(&mut self, callback: DrawCallback, data: Option<CallbackData>) {
        let needs_new = self
            .cmd_buffer
            .last()
            .map_or(true, |cmd| cmd.elem_count != 0 || cmd.user_callback.is_some());
        if needs_new {
            self.push_cmd();
        }
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.user_callback = Some(callback);
            cmd.callback_data = data;
        }
        // Geometry after a callback always goes into its own command.
        self.push_cmd();
    }

    fn push_cmd(&mut self) {
        let idx_offset = self.next_idx_offset();
        self.cmd_buffer.push(DrawCmd::from_header(self.cmd_header, idx_offset));
    }

    fn next_idx_offset(&self) -> u32 {
        self.cmd_buffer
            .last()
            .map_or(0, |cmd| cmd.idx_offset + cmd.elem_count)
    }

    /// Makes the trailing command match `cmd_header` before new elements.
    fn ensure_current_cmd(&mut self) {
        let matches = self
            .cmd_buffer
            .last()
            .is_some_and(|cmd| cmd.user_callback.is_none() && cmd.header() == self.cmd_header);
        if !matches {
            self.add_draw_cmd();
        }
    }

    /// Brings the trailing command in line with a changed `cmd_header`.
    fn on_changed_header(&mut self) {
        let Some(curr) = self.cmd_buffer.last() else {
            self.add_draw_cmd();
            return;
        };
        if curr.elem_count != 0 || curr.user_callback.is_some() {
            if curr.header() != self.cmd_header {
                self.add_draw_cmd();
            }
            return;
        }

        // Empty command: fold back into the previous one if it matches again.
        let len = self.cmd_buffer.len();
        if len > 1 {
            let prev = &self.cmd_buffer[len - 2];
            if prev.user_callback.is_none() && prev.header() == self.cmd_header {
                self.cmd_buffer.pop();
                return;
            }
        }
        if let Some(curr) = self.cmd_buffer.last_mut() {
            curr.set_header(self.cmd_header);
        }
    }

    // =========================================================================
    // CLIP / TEXTURE STACKS
    // =========================================================================

    /// Pushes a clip rect, optionally intersected with the current one.
    pub fn push_clip_rect(&mut self, min: Vec2, max: Vec2, intersect_with_current: bool) {
        let mut clip = Rect::new(min, max);
        if intersect_with_current {
            clip = clip.clip_with(&self.cmd_header.clip_rect);
        }
        clip.max = clip.max.max(clip.min);

        self.clip_rect_stack.push(clip);
        self.cmd_header.clip_rect = clip;
        self.on_changed_header();
    }

    /// Pushes the full-screen clip rect.
    pub fn push_clip_rect_full_screen(&mut self) {
        let full = self.clip_rect_full_screen;
        self.push_clip_rect(full.min, full.max, false);
    }

    /// Pops the current clip rect.
    ///
    /// # Panics
    ///
    /// Panics if the clip stack is empty.
    pub fn pop_clip_rect(&mut self) {
        assert!(self.clip_rect_stack.pop().is_some(), "clip rect stack underflow");
        self.cmd_header.clip_rect = self
            .clip_rect_stack
            .last()
            .copied()
            .unwrap_or(self.clip_rect_full_screen);
        self.on_changed_header();
    }

    /// Pushes a texture.
    pub fn push_texture_id(&mut self, texture_id: TextureId) {
        self.texture_id_stack.push(texture_id);
        self.cmd_header.texture_id = texture_id;
        self.on_changed_header();
    }

    /// Pops the current texture.
    ///
    /// # Panics
    ///
    /// Panics if the texture stack is empty.
    pub fn pop_texture_id(&mut self) {
        assert!(self.texture_id_stack.pop().is_some(), "texture stack underflow");
        self.cmd_header.texture_id = self
            .texture_id_stack
            .last()
            .copied()
            .unwrap_or(TextureId::NULL);
        self.on_changed_header();
    }

    // =========================================================================
    // PRIMITIVES
    // =========================================================================

    /// Reserves `idx_count` indices and `vtx_count` vertices in the current
    /// command. The caller must then write exactly that many.
    pub fn prim_reserve(&mut self, idx_count: u32, vtx_count: u32) {
        debug_assert!(idx_count % 3 == 0, "index count must describe whole triangles");

        if self.flags.has(DrawListFlags::ALLOW_VTX_OFFSET)
            && self.vtx_current_idx + vtx_count >= VTX_OFFSET_WRAP
        {
            self.cmd_header.vtx_offset = self.vtx_buffer.len() as u32;
            self.vtx_current_idx = 0;
            self.on_changed_header();
        }

        self.ensure_current_cmd();
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.elem_count += idx_count;
        }
        self.vtx_buffer.reserve(vtx_count as usize);
        self.idx_buffer.reserve(idx_count as usize);
    }

    /// Releases part of a reservation that was not written.
    pub fn prim_unreserve(&mut self, idx_count: u32) {
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            debug_assert!(cmd.elem_count >= idx_count);
            cmd.elem_count -= idx_count;
        }
    }

    /// Writes one vertex.
    #[inline]
    pub fn prim_write_vtx(&mut self, pos: Vec2, uv: Vec2, col: u32) {
        self.vtx_buffer.push(DrawVert::new(pos.x, pos.y, uv.x, uv.y, col));
        self.vtx_current_idx += 1;
    }

    /// Writes one index.
    #[inline]
    pub fn prim_write_idx(&mut self, idx: DrawIdx) {
        self.idx_buffer.push(idx);
    }

    /// Axis aligned rectangle (2 triangles), using the white-pixel UV.
    pub fn prim_rect(&mut self, a: Vec2, c: Vec2, col: u32) {
        self.prim_rect_uv(a, c, Vec2::ZERO, Vec2::ZERO, col);
    }

    /// Axis aligned textured rectangle.
    pub fn prim_rect_uv(&mut self, a: Vec2, c: Vec2, uv_a: Vec2, uv_c: Vec2, col: u32) {
        let b = Vec2::new(c.x, a.y);
        let d = Vec2::new(a.x, c.y);
        let uv_b = Vec2::new(uv_c.x, uv_a.y);
        let uv_d = Vec2::new(uv_a.x, uv_c.y);
        self.prim_quad_uv([a, b, c, d], [uv_a, uv_b, uv_c, uv_d], col);
    }

    /// Arbitrary quad, corners in winding order.
    pub fn prim_quad_uv(&mut self, pos: [Vec2; 4], uv: [Vec2; 4], col: u32) {
        let idx = self.vtx_current_idx;
        for i in [0, 1, 2, 0, 2, 3] {
            self.prim_write_idx(idx + i);
        }
        for (p, t) in pos.into_iter().zip(uv) {
            self.prim_write_vtx(p, t, col);
        }
    }

    /// Filled rectangle. Fully transparent colors emit nothing.
    pub fn add_rect_filled(&mut self, min: Vec2, max: Vec2, col: u32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.prim_reserve(6, 4);
        self.prim_rect(min, max, col);
    }

    /// Filled triangle. Fully transparent colors emit nothing.
    pub fn add_triangle_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, col: u32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.prim_reserve(3, 3);
        let idx = self.vtx_current_idx;
        for (i, p) in [p1, p2, p3].into_iter().enumerate() {
            self.prim_write_idx(idx + i as u32);
            self.prim_write_vtx(p, Vec2::ZERO, col);
        }
    }

    /// Textured rectangle, switching texture only if it differs.
    pub fn add_image(&mut self, texture_id: TextureId, min: Vec2, max: Vec2, uv_min: Vec2, uv_max: Vec2, col: u32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        let push_texture = texture_id != self.cmd_header.texture_id;
        if push_texture {
            self.push_texture_id(texture_id);
        }
        self.prim_reserve(6, 4);
        self.prim_rect_uv(min, max, uv_min, uv_max, col);
        if push_texture {
            self.pop_texture_id();
        }
    }

    // =========================================================================
    // CHANNELS
    // =========================================================================

    /// Splits this list into `count` channels using its own splitter.
    pub fn channels_split(&mut self, count: usize) {
        let mut splitter = std::mem::take(&mut self.splitter);
        splitter.split(self, count);
        self.splitter = splitter;
    }

    /// Routes subsequent geometry into channel `idx`.
    pub fn channels_set_current(&mut self, idx: usize) {
        let mut splitter = std::mem::take(&mut self.splitter);
        splitter.set_current_channel(self, idx);
        self.splitter = splitter;
    }

    /// Flattens all channels back into this list.
    pub fn channels_merge(&mut self) {
        let mut splitter = std::mem::take(&mut self.splitter);
        splitter.merge(self);
        self.splitter = splitter;
    }

    /// Returns the list's own splitter.
    #[must_use]
    pub fn splitter(&self) -> &DrawListSplitter {
        &self.splitter
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Deep copy of the renderable output, detached from this list.
    #[must_use]
    pub fn clone_output(&self) -> Self {
        let mut out = Self::with_full_screen_clip(self.clip_rect_full_screen);
        out.cmd_buffer.clone_from(&self.cmd_buffer);
        out.idx_buffer.clone_from(&self.idx_buffer);
        out.vtx_buffer.clone_from(&self.vtx_buffer);
        out.flags = self.flags;
        out
    }

    /// Vertex buffer as raw bytes, for upload.
    #[must_use]
    pub fn vtx_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vtx_buffer)
    }

    /// Index buffer as raw bytes, for upload.
    #[must_use]
    pub fn idx_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.idx_buffer)
    }

    /// True if nothing in the list would reach a renderer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self.cmd_buffer.as_slice() {
            [] => true,
            [only] => only.is_unused(),
            _ => false,
        }
    }

    /// Swaps the live command/index buffers with a channel's.
    pub(crate) fn swap_buffers(&mut self, cmd_buffer: &mut Vec<DrawCmd>, idx_buffer: &mut Vec<DrawIdx>) {
        std::mem::swap(&mut self.cmd_buffer, cmd_buffer);
        std::mem::swap(&mut self.idx_buffer, idx_buffer);
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}
