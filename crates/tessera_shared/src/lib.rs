//! # Tessera Shared
//!
//! Geometry and constants used by the draw core and the input router.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `wgpu`
//! - `raw-window-handle`
//! - Any GPU or window-related crate
//!
//! Renderer backends consume these types; they do not define them.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    FONT_SCALE_MAX, FONT_SCALE_MIN, FONT_SCALE_STEP, MOUSE_DOUBLE_CLICK_MAX_DIST,
    MOUSE_DOUBLE_CLICK_TIME, MOUSE_DRAG_THRESHOLD, SCROLL_STEP_FONT_X, SCROLL_STEP_FONT_Y,
    SCROLL_STEP_MAX_RATIO, WHEEL_LOCK_TIMER, WINDOW_HOVER_PADDING,
};
pub use math::{Rect, Vec2};
