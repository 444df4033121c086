use crate::models::{Capability, CaptureOptions, MediaKind, PermissionPrompt, VideoQuality};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Config serialize error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Picker defaults and permission prompt texts.
///
/// Every field has a default, so a TOML file only needs to name the keys it
/// overrides:
///
/// ```toml
/// max_width = 1024
/// single_flight = true
///
/// [camera_prompt]
/// title = "Kamera"
/// message = "Die App braucht Zugriff auf die Kamera"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Upper bound for the returned image width in pixels
    pub max_width: u32,
    /// Upper bound for the returned image height in pixels
    pub max_height: u32,
    /// JPEG quality between 0 and 1
    pub quality: f32,
    /// Camera video quality
    pub video_quality: VideoQuality,
    /// Camera video length cap in seconds
    pub duration_limit_secs: u32,
    /// Store camera captures in the device library
    pub save_to_photos: bool,
    /// Ask launchers to return the payload as base64 as well
    pub include_base64: bool,
    /// Reject a second press of the same action while one is running
    pub single_flight: bool,
    pub camera_prompt: PermissionPrompt,
    pub storage_prompt: PermissionPrompt,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_width: 300,
            max_height: 550,
            quality: 1.0,
            video_quality: VideoQuality::Low,
            duration_limit_secs: 30,
            save_to_photos: true,
            include_base64: false,
            single_flight: false,
            camera_prompt: PermissionPrompt::new(
                "Camera permission",
                "The app needs access to your camera",
            ),
            storage_prompt: PermissionPrompt::new(
                "External storage permission",
                "The app needs permission to access external storage",
            ),
        }
    }
}

impl PickerConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: PickerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(ConfigError::Invalid(format!(
                "quality must be between 0 and 1, got {}",
                self.quality
            )));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError::Invalid(
                "max_width and max_height must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn prompt_for(&self, capability: Capability) -> &PermissionPrompt {
        match capability {
            Capability::Camera => &self.camera_prompt,
            Capability::ExternalStorage => &self.storage_prompt,
        }
    }

    /// Options for a camera capture
    pub fn camera_options(&self, kind: MediaKind) -> CaptureOptions {
        CaptureOptions {
            media_type: kind,
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
            video_quality: Some(self.video_quality),
            duration_limit: Some(self.duration_limit_secs),
            save_to_photos: Some(self.save_to_photos),
            include_base64: self.include_base64,
        }
    }

    /// Options for a gallery pick (no saving, no duration cap)
    pub fn library_options(&self, kind: MediaKind) -> CaptureOptions {
        CaptureOptions {
            media_type: kind,
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
            video_quality: None,
            duration_limit: None,
            save_to_photos: None,
            include_base64: self.include_base64,
        }
    }
}
