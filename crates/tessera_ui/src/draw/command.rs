//! Draw command model.
//!
//! Plain data shared by the draw list, the splitter and renderer backends:
//! vertices, indices, texture handles and the batched command header.

use std::fmt;

use tessera_shared::Rect;

use super::list::DrawList;

/// Index type. Commands always reference triangles, so `elem_count` is a
/// multiple of 3.
pub type DrawIdx = u32;

/// Packs an RGBA color into the `0xAABBGGRR` layout stored in vertices.
#[must_use]
pub const fn col32(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32)
}

/// Alpha mask of a packed color.
pub const COL32_A_MASK: u32 = 0xFF00_0000;

/// Opaque white.
pub const COL32_WHITE: u32 = col32(255, 255, 255, 255);

/// Vertex for UI rendering.
///
/// Field order and the 20-byte size are part of the backend contract.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawVert {
    /// Position (x, y).
    pub pos: [f32; 2],
    /// UV coordinates.
    pub uv: [f32; 2],
    /// Packed `0xAABBGGRR` color.
    pub col: u32,
}

impl DrawVert {
    /// Creates a new vertex.
    #[must_use]
    pub const fn new(x: f32, y: f32, u: f32, v: f32, col: u32) -> Self {
        Self {
            pos: [x, y],
            uv: [u, v],
            col,
        }
    }
}

/// Opaque handle to a GPU texture. The core never looks inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

impl TextureId {
    /// No texture bound.
    pub const NULL: Self = Self(0);
}

/// Opaque payload handed back to a user callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackData(pub u64);

/// Signature of a user draw callback.
pub type DrawCallbackFn = fn(&DrawList, &DrawCmd);

/// What a renderer must do instead of drawing a command's elements.
#[derive(Clone, Copy)]
pub enum DrawCallback {
    /// Restore the backend's default pipeline state.
    ResetRenderState,
    /// Call back into user code with the originating list and command.
    User(DrawCallbackFn),
}

impl DrawCallback {
    /// Returns true for the reset-render-state sentinel.
    #[must_use]
    pub const fn is_reset_render_state(&self) -> bool {
        matches!(self, Self::ResetRenderState)
    }
}

impl fmt::Debug for DrawCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResetRenderState => f.write_str("ResetRenderState"),
            Self::User(_) => f.write_str("User(..)"),
        }
    }
}

/// The state a command binds before drawing.
///
/// Two commands can be folded into one draw call iff their headers are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawCmdHeader {
    /// Clip rectangle (x1, y1, x2, y2) in framebuffer space before scaling.
    pub clip_rect: Rect,
    /// Texture to bind.
    pub texture_id: TextureId,
    /// Value added to every index of the command.
    pub vtx_offset: u32,
}

/// One renderer-facing unit of work.
#[derive(Debug, Clone, Default)]
pub struct DrawCmd {
    /// Clip rectangle.
    pub clip_rect: Rect,
    /// Texture to bind.
    pub texture_id: TextureId,
    /// Start vertex for this command's indices.
    pub vtx_offset: u32,
    /// First index in the owning list's index buffer.
    pub idx_offset: u32,
    /// Number of indices (multiple of 3). Zero means placeholder.
    pub elem_count: u32,
    /// Replaces drawing when set.
    pub user_callback: Option<DrawCallback>,
    /// Passed through to the callback untouched.
    pub callback_data: Option<CallbackData>,
}

impl DrawCmd {
    /// Creates an empty command carrying `header`, starting at `idx_offset`.
    #[must_use]
    pub fn from_header(header: DrawCmdHeader, idx_offset: u32) -> Self {
        Self {
            clip_rect: header.clip_rect,
            texture_id: header.texture_id,
            vtx_offset: header.vtx_offset,
            idx_offset,
            ..Self::default()
        }
    }

    /// Returns the header fields of this command.
    #[must_use]
    pub fn header(&self) -> DrawCmdHeader {
        DrawCmdHeader {
            clip_rect: self.clip_rect,
            texture_id: self.texture_id,
            vtx_offset: self.vtx_offset,
        }
    }

    /// Overwrites the header fields, leaving offsets and counts intact.
    pub fn set_header(&mut self, header: DrawCmdHeader) {
        self.clip_rect = header.clip_rect;
        self.texture_id = header.texture_id;
        self.vtx_offset = header.vtx_offset;
    }

    /// True for an empty, callback-less placeholder.
    #[inline]
    #[must_use]
    pub fn is_unused(&self) -> bool {
        self.elem_count == 0 && self.user_callback.is_none()
    }

    /// True if `other` may be folded into this command.
    #[inline]
    #[must_use]
    pub fn can_merge_with(&self, other: &Self) -> bool {
        self.user_callback.is_none() && other.user_callback.is_none() && self.header() == other.header()
    }

    /// Runs a user callback if this command carries one.
    ///
    /// Returns true when the command is a callback of either kind and must
    /// not be drawn. The reset sentinel is left to the caller.
    pub fn invoke_callback(&self, list: &DrawList) -> bool {
        match self.user_callback {
            Some(DrawCallback::User(callback)) => {
                callback(list, self);
                true
            }
            Some(DrawCallback::ResetRenderState) => true,
            None => false,
        }
    }
}
