//! # Routing Constants
//!
//! Default values for mouse and wheel routing.
//!
//! These seed `IoConfig::default()`; a config file may override the
//! timing and distance values, but the zoom and scroll-step factors are
//! fixed.

// =============================================================================
// MOUSE
// =============================================================================

/// Distance (pixels) the mouse must travel before a press counts as a drag.
pub const MOUSE_DRAG_THRESHOLD: f32 = 6.0;

/// Maximum time (seconds) between two clicks of a double-click.
pub const MOUSE_DOUBLE_CLICK_TIME: f32 = 0.30;

/// Maximum distance (pixels) between two clicks of a double-click.
pub const MOUSE_DOUBLE_CLICK_MAX_DIST: f32 = 6.0;

/// Extra hit area (pixels) around resizable root windows.
pub const WINDOW_HOVER_PADDING: f32 = 4.0;

// =============================================================================
// WHEEL
// =============================================================================

/// How long (seconds) a window keeps the wheel after the last wheel event.
pub const WHEEL_LOCK_TIMER: f32 = 0.70;

/// Font scale change per wheel notch when zooming.
pub const FONT_SCALE_STEP: f32 = 0.10;

/// Smallest per-window font scale reachable by zooming.
pub const FONT_SCALE_MIN: f32 = 0.50;

/// Largest per-window font scale reachable by zooming.
pub const FONT_SCALE_MAX: f32 = 2.50;

/// Vertical wheel step, in multiples of the window font size.
pub const SCROLL_STEP_FONT_Y: f32 = 5.0;

/// Horizontal wheel step, in multiples of the window font size.
pub const SCROLL_STEP_FONT_X: f32 = 2.0;

/// Upper bound of one wheel step as a fraction of the inner rect extent.
pub const SCROLL_STEP_MAX_RATIO: f32 = 0.67;
