use dioxus_i18n::t;
use media_picker::{Capability, CaptureError, ConfigError};
use std::fmt;

/// Central error types for the capture preview app
#[derive(Debug)]
pub enum AppError {
    /// Picker configuration could not be loaded
    Config(ConfigError),
    /// A press did not reach the picker
    Capture(CaptureError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<CaptureError> for AppError {
    fn from(e: CaptureError) -> Self {
        AppError::Capture(e)
    }
}

pub fn capability_label(capability: Capability) -> String {
    match capability {
        Capability::Camera => t!("capability-camera"),
        Capability::ExternalStorage => t!("capability-storage"),
    }
}

/// User-facing message, if the error deserves one
impl AppError {
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::Capture(CaptureError::PermissionMissing(capability)) => Some(t!(
                "notice-permission-missing",
                capability: capability_label(*capability)
            )),
            // the library already reported the failed request
            AppError::Capture(CaptureError::PermissionRequestFailed(_)) => None,
            // the button is disabled while running
            AppError::Capture(CaptureError::AlreadyRunning(_)) => None,
            AppError::Config(_) => None,
        }
    }
}
