// Platform pickers
//
// A launcher opens the camera or the media library with the given options and
// resolves with the raw response envelope. On Android the activity does the
// work over JNI (see `android`); desktop builds use a native file dialog for
// the library and report the camera as unavailable.

use crate::models::{CaptureOptions, PickerResponse};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub enum LaunchError {
    /// Talking to the native side failed
    Bridge(String),
    /// The native side answered with something we could not read
    Malformed(String),
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchError::Bridge(msg) => write!(f, "Picker bridge error: {}", msg),
            LaunchError::Malformed(msg) => write!(f, "Malformed picker response: {}", msg),
        }
    }
}

impl std::error::Error for LaunchError {}

// Dialog futures are not Send on every backend, and launches always run on
// the UI task anyway.
#[async_trait(?Send)]
pub trait MediaLauncher {
    async fn launch(&self, options: &CaptureOptions) -> Result<PickerResponse, LaunchError>;
}

/// Camera stand-in for platforms without one
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCamera;

#[async_trait(?Send)]
impl MediaLauncher for UnavailableCamera {
    async fn launch(&self, _options: &CaptureOptions) -> Result<PickerResponse, LaunchError> {
        Ok(PickerResponse::error(
            crate::models::PickerErrorCode::CameraUnavailable,
            Some("Camera not available on this platform".to_string()),
        ))
    }
}

#[cfg(not(target_os = "android"))]
pub use desktop::DesktopLibraryLauncher;

#[cfg(not(target_os = "android"))]
mod desktop {
    use super::{LaunchError, MediaLauncher};
    use crate::models::{CaptureOptions, MediaKind, PickerResponse};
    use async_trait::async_trait;
    use std::path::Path;

    const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "heic"];
    const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "webm", "3gp"];

    /// Gallery picker backed by the system file dialog
    #[derive(Debug, Clone, Copy, Default)]
    pub struct DesktopLibraryLauncher;

    #[async_trait(?Send)]
    impl MediaLauncher for DesktopLibraryLauncher {
        async fn launch(&self, options: &CaptureOptions) -> Result<PickerResponse, LaunchError> {
            let (label, extensions) = match options.media_type {
                MediaKind::Photo => ("Images", IMAGE_EXTENSIONS),
                MediaKind::Video => ("Videos", VIDEO_EXTENSIONS),
            };

            let picked = rfd::AsyncFileDialog::new()
                .add_filter(label, extensions)
                .pick_file()
                .await;

            match picked {
                Some(handle) => describe_file(handle.path(), options),
                None => Ok(PickerResponse::cancelled()),
            }
        }
    }

    pub(super) fn describe_file(
        path: &Path,
        options: &CaptureOptions,
    ) -> Result<PickerResponse, LaunchError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| LaunchError::Bridge(format!("{}: {}", path.display(), e)))?;

        let (width, height) = match options.media_type {
            MediaKind::Photo => match image::image_dimensions(path) {
                Ok((w, h)) => (Some(w), Some(h)),
                Err(e) => {
                    log::debug!("No dimensions for {}: {}", path.display(), e);
                    (None, None)
                }
            },
            MediaKind::Video => (None, None),
        };

        let base64 = if options.include_base64 {
            use base64::{engine::general_purpose, Engine as _};
            let bytes = std::fs::read(path)
                .map_err(|e| LaunchError::Bridge(format!("{}: {}", path.display(), e)))?;
            Some(general_purpose::STANDARD.encode(&bytes))
        } else {
            None
        };

        Ok(PickerResponse {
            uri: Some(format!("file://{}", path.display())),
            base64,
            width,
            height,
            file_size: Some(metadata.len()),
            mime_type: mime_for_path(path).map(str::to_string),
            file_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string),
            ..Default::default()
        })
    }

    pub(super) fn mime_for_path(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let mime = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            "mp4" => "video/mp4",
            "mov" => "video/quicktime",
            "mkv" => "video/x-matroska",
            "webm" => "video/webm",
            "3gp" => "video/3gpp",
            _ => return None,
        };
        Some(mime)
    }
}
