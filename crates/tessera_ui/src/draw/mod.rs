//! Draw command batching.
//!
//! Widgets append geometry to a [`DrawList`]; a [`DrawListSplitter`] lets
//! them do so out of order; [`DrawData`] gathers the frame's lists for a
//! [`RenderBackend`].

mod command;
mod data;
mod list;
mod splitter;

pub use command::{
    col32, CallbackData, DrawCallback, DrawCallbackFn, DrawCmd, DrawCmdHeader, DrawIdx, DrawVert,
    TextureId, COL32_A_MASK, COL32_WHITE,
};
pub use data::{DrawData, RenderBackend};
pub use list::{DrawList, DrawListFlags, SharedDrawList};
pub use splitter::{DrawChannel, DrawListSplitter};
