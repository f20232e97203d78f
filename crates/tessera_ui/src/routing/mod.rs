//! Input-to-window routing.
//!
//! Runs once per frame, after the mouse update:
//! 1. [`HoverState::update`] decides which window is under the mouse and
//!    whether the UI wants mouse input at all.
//! 2. [`WheelState::update`] sends wheel input to the locked or hovered
//!    window, scrolling or zooming it.

mod hover;
mod wheel;

pub use hover::{find_hovered_window, HoverState};
pub use wheel::{WheelClaims, WheelState};
