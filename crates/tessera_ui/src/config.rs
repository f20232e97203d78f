//! IO configuration.
//!
//! Loaded once at startup, either from defaults or from a TOML file:
//!
//! ```toml
//! mouse_drag_threshold = 8.0
//! wheel_lock_timer = 0.5
//! font_allow_user_scaling = true
//! display_size = { x = 1920.0, y = 1080.0 }
//! ```

use serde::Deserialize;
use tessera_shared::{
    Vec2, MOUSE_DOUBLE_CLICK_MAX_DIST, MOUSE_DOUBLE_CLICK_TIME, MOUSE_DRAG_THRESHOLD, WHEEL_LOCK_TIMER,
    WINDOW_HOVER_PADDING,
};

use crate::error::{UiError, UiResult};

/// Input and display settings for a [`crate::FrameContext`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Pixels the mouse may travel before a press becomes a drag. Also
    /// releases the wheel lock.
    pub mouse_drag_threshold: f32,
    /// Seconds between the two clicks of a double-click.
    pub mouse_double_click_time: f32,
    /// Pixels between the two clicks of a double-click.
    pub mouse_double_click_max_dist: f32,
    /// Seconds a window keeps the wheel after the last wheel event.
    pub wheel_lock_timer: f32,
    /// Ctrl + wheel zooms the hovered window's font instead of scrolling.
    pub font_allow_user_scaling: bool,
    /// The OS already turns Shift + wheel into horizontal scrolling.
    pub mac_osx_behaviors: bool,
    /// Extra hit area around resizable root windows.
    pub window_hover_padding: f32,
    /// Base font size of new windows.
    pub font_size: f32,
    /// Global font multiplier.
    pub font_global_scale: f32,
    /// Display size in points.
    pub display_size: Vec2,
    /// Framebuffer pixels per point.
    pub framebuffer_scale: Vec2,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            mouse_drag_threshold: MOUSE_DRAG_THRESHOLD,
            mouse_double_click_time: MOUSE_DOUBLE_CLICK_TIME,
            mouse_double_click_max_dist: MOUSE_DOUBLE_CLICK_MAX_DIST,
            wheel_lock_timer: WHEEL_LOCK_TIMER,
            font_allow_user_scaling: false,
            mac_osx_behaviors: cfg!(target_os = "macos"),
            window_hover_padding: WINDOW_HOVER_PADDING,
            font_size: 13.0,
            font_global_scale: 1.0,
            display_size: Vec2::new(1280.0, 720.0),
            framebuffer_scale: Vec2::ONE,
        }
    }
}

impl IoConfig {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::ConfigParse`] for malformed TOML and
    /// [`UiError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| UiError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> UiResult<()> {
        let non_negative = [
            ("mouse_drag_threshold", self.mouse_drag_threshold),
            ("mouse_double_click_time", self.mouse_double_click_time),
            ("mouse_double_click_max_dist", self.mouse_double_click_max_dist),
            ("window_hover_padding", self.window_hover_padding),
            ("display_size.x", self.display_size.x),
            ("display_size.y", self.display_size.y),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(UiError::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }

        let positive = [
            ("wheel_lock_timer", self.wheel_lock_timer),
            ("font_size", self.font_size),
            ("font_global_scale", self.font_global_scale),
            ("framebuffer_scale.x", self.framebuffer_scale.x),
            ("framebuffer_scale.y", self.framebuffer_scale.y),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(UiError::InvalidConfig(format!("{name} must be > 0, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(IoConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = IoConfig::from_toml_str(
            "wheel_lock_timer = 0.5\nfont_allow_user_scaling = true\ndisplay_size = { x = 800.0, y = 600.0 }\n",
        )
        .unwrap();

        assert_eq!(config.wheel_lock_timer, 0.5);
        assert!(config.font_allow_user_scaling);
        assert_eq!(config.display_size, Vec2::new(800.0, 600.0));
        assert_eq!(config.mouse_drag_threshold, MOUSE_DRAG_THRESHOLD);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = IoConfig::from_toml_str("wheel_lock_timer = 0.0").unwrap_err();
        assert!(matches!(err, UiError::InvalidConfig(msg) if msg.contains("wheel_lock_timer")));

        let err = IoConfig::from_toml_str("mouse_drag_threshold = -1.0").unwrap_err();
        assert!(matches!(err, UiError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = IoConfig::from_toml_str("wheel_lock_timer = = 1").unwrap_err();
        assert!(matches!(err, UiError::ConfigParse(_)));
    }
}
