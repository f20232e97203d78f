//! # Tessera UI Core
//!
//! Immediate-mode draw command engine and mouse routing.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        FRAME PIPELINE                         │
//! ├───────────────────────────────────────────────────────────────┤
//! │  Input → Mouse Update → Hovered Window → Wheel Routing        │
//! │                                                               │
//! │  Widgets → DrawList (channels) → Merge → DrawData → Renderer  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Draw lists
//!
//! Geometry is appended to one vertex and one index buffer per list.
//! Commands slice the index buffer; consecutive geometry with the same clip
//! rect, texture and vertex offset lands in the same command. A
//! [`DrawListSplitter`] lets widgets draw out of order into channels that
//! are merged back in channel order.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod input;
pub mod routing;
pub mod window;

pub use config::IoConfig;
pub use context::FrameContext;
pub use draw::{
    col32, CallbackData, DrawCallback, DrawChannel, DrawCmd, DrawCmdHeader, DrawData, DrawIdx, DrawList,
    DrawListFlags, DrawListSplitter, DrawVert, RenderBackend, SharedDrawList, TextureId, COL32_WHITE,
};
pub use error::{UiError, UiResult};
pub use input::{InputState, Modifiers, MouseButton};
pub use routing::{HoverState, WheelClaims, WheelState};
pub use window::{Window, WindowFlags, WindowId, WindowStore};
