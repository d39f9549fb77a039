use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that points the binary at an alternative settings file.
pub const SETTINGS_ENV_VAR: &str = "SUBTITLE_BLOCKER_SETTINGS";

const SETTINGS_FILE_NAME: &str = "subtitle_blocker.json";

/// Static configuration of the overlay. Read once at startup and never
/// written back: widget position, size and opacity are not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlaySettings {
    /// Width of the invisible margin along each border that starts a resize.
    #[serde(default = "default_edge_handle_size")]
    pub edge_handle_size: i32,
    #[serde(default = "default_min_width")]
    pub min_width: i32,
    #[serde(default = "default_min_height")]
    pub min_height: i32,
    #[serde(default = "default_width")]
    pub default_width: i32,
    #[serde(default = "default_height")]
    pub default_height: i32,
    /// Gap between the widget's bottom edge and the bottom of the primary screen.
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin: i32,
    #[serde(default = "default_opacity")]
    pub default_opacity: f32,
    #[serde(default = "default_min_opacity")]
    pub min_opacity: f32,
    #[serde(default = "default_max_opacity")]
    pub max_opacity: f32,
    /// Wheel angle delta is divided by this before being added to the opacity.
    #[serde(default = "default_wheel_divisor")]
    pub wheel_divisor: f32,
    #[serde(default = "default_blur_radius")]
    pub blur_radius: f32,
    #[serde(default = "default_border_color")]
    pub border_color: [u8; 4],
    #[serde(default = "default_border_width")]
    pub border_width: u32,
    /// Opacity of the dark layer relative to the main opacity.
    #[serde(default = "default_dim_factor")]
    pub dim_factor: f32,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_edge_handle_size() -> i32 {
    15
}

fn default_min_width() -> i32 {
    50
}

fn default_min_height() -> i32 {
    20
}

fn default_width() -> i32 {
    600
}

fn default_height() -> i32 {
    100
}

fn default_bottom_margin() -> i32 {
    50
}

fn default_opacity() -> f32 {
    0.7
}

fn default_min_opacity() -> f32 {
    0.1
}

fn default_max_opacity() -> f32 {
    1.0
}

fn default_wheel_divisor() -> f32 {
    1200.0
}

fn default_blur_radius() -> f32 {
    10.0
}

fn default_border_color() -> [u8; 4] {
    [255, 140, 0, 255]
}

fn default_border_width() -> u32 {
    2
}

fn default_dim_factor() -> f32 {
    0.3
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            edge_handle_size: default_edge_handle_size(),
            min_width: default_min_width(),
            min_height: default_min_height(),
            default_width: default_width(),
            default_height: default_height(),
            bottom_margin: default_bottom_margin(),
            default_opacity: default_opacity(),
            min_opacity: default_min_opacity(),
            max_opacity: default_max_opacity(),
            wheel_divisor: default_wheel_divisor(),
            blur_radius: default_blur_radius(),
            border_color: default_border_color(),
            border_width: default_border_width(),
            dim_factor: default_dim_factor(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl OverlaySettings {
    /// Load settings from `path`. A missing or empty file yields the
    /// defaults; malformed JSON is an error.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings.normalized())
    }

    /// Load settings without failing startup. A malformed file falls back to
    /// the defaults; the error is returned alongside so the caller can log it
    /// once a subscriber is installed.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<anyhow::Error>) {
        match Self::load(path) {
            Ok(settings) => (settings, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    /// Location of the settings file: `$SUBTITLE_BLOCKER_SETTINGS` if set,
    /// otherwise `subtitle_blocker.json` in the platform config directory.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(SETTINGS_ENV_VAR) {
            return PathBuf::from(path);
        }
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_FILE_NAME)
    }

    /// Repair values that would break the overlay's geometry or opacity
    /// invariants.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        if self.edge_handle_size < 0 {
            tracing::warn!(
                "edge_handle_size {} is negative; using {}",
                self.edge_handle_size,
                defaults.edge_handle_size
            );
            self.edge_handle_size = defaults.edge_handle_size;
        }
        if self.min_width < 1 {
            self.min_width = defaults.min_width;
        }
        if self.min_height < 1 {
            self.min_height = defaults.min_height;
        }
        self.default_width = self.default_width.max(self.min_width);
        self.default_height = self.default_height.max(self.min_height);

        let opacity_range_valid = self.min_opacity.is_finite()
            && self.max_opacity.is_finite()
            && self.min_opacity > 0.0
            && self.min_opacity <= self.max_opacity
            && self.max_opacity <= 1.0;
        if !opacity_range_valid {
            tracing::warn!(
                "opacity range [{}, {}] is invalid; using [{}, {}]",
                self.min_opacity,
                self.max_opacity,
                defaults.min_opacity,
                defaults.max_opacity
            );
            self.min_opacity = defaults.min_opacity;
            self.max_opacity = defaults.max_opacity;
        }
        if !self.default_opacity.is_finite() {
            self.default_opacity = defaults.default_opacity;
        }
        self.default_opacity = self
            .default_opacity
            .clamp(self.min_opacity, self.max_opacity);

        if !self.wheel_divisor.is_finite() || self.wheel_divisor == 0.0 {
            self.wheel_divisor = defaults.wheel_divisor;
        }
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            self.blur_radius = defaults.blur_radius;
        }
        if !self.dim_factor.is_finite() {
            self.dim_factor = defaults.dim_factor;
        }
        self.dim_factor = self.dim_factor.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::OverlaySettings;

    #[test]
    fn partial_json_fills_remaining_fields_with_defaults() {
        let settings: OverlaySettings =
            serde_json::from_str(r#"{ "blur_radius": 4.0, "border_width": 3 }"#).unwrap();
        assert_eq!(settings.blur_radius, 4.0);
        assert_eq!(settings.border_width, 3);
        assert_eq!(settings.edge_handle_size, 15);
        assert_eq!(settings.default_opacity, 0.7);
        assert_eq!(settings.border_color, [255, 140, 0, 255]);
    }

    #[test]
    fn normalized_clamps_default_opacity_into_range() {
        let settings = OverlaySettings {
            default_opacity: 3.0,
            ..OverlaySettings::default()
        }
        .normalized();
        assert_eq!(settings.default_opacity, 1.0);
    }

    #[test]
    fn normalized_rejects_inverted_opacity_range() {
        let settings = OverlaySettings {
            min_opacity: 0.9,
            max_opacity: 0.2,
            ..OverlaySettings::default()
        }
        .normalized();
        assert_eq!(settings.min_opacity, 0.1);
        assert_eq!(settings.max_opacity, 1.0);
    }

    #[test]
    fn normalized_keeps_default_size_above_minimum() {
        let settings = OverlaySettings {
            default_width: 10,
            default_height: 5,
            ..OverlaySettings::default()
        }
        .normalized();
        assert_eq!(settings.default_width, 50);
        assert_eq!(settings.default_height, 20);
    }
}
