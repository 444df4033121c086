// Wires the platform's permission provider and pickers into one MediaCapture.

use crate::error::AppError;
use media_picker::{ChannelNotifier, MediaCapture, PickerConfig};
use std::rc::Rc;

const PICKER_TOML: &str = include_str!("../assets/picker.toml");

/// Bundled picker settings, or the defaults if they do not parse
pub fn load_config() -> PickerConfig {
    match PickerConfig::from_toml(PICKER_TOML) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}, using defaults", AppError::from(e));
            PickerConfig::default()
        }
    }
}

#[cfg(target_os = "android")]
pub fn build_capture(config: PickerConfig, notifier: ChannelNotifier) -> MediaCapture {
    use media_picker::{AndroidBridgeConfig, AndroidLauncher, AndroidPermissions, MediaSource};

    let bridge = AndroidBridgeConfig::default();
    MediaCapture::new(
        Rc::new(AndroidPermissions::new(bridge.clone())),
        Rc::new(AndroidLauncher::new(MediaSource::Camera, bridge.clone())),
        Rc::new(AndroidLauncher::new(MediaSource::Library, bridge)),
        Rc::new(notifier),
        config,
    )
}

#[cfg(not(target_os = "android"))]
pub fn build_capture(config: PickerConfig, notifier: ChannelNotifier) -> MediaCapture {
    use media_picker::{DesktopLibraryLauncher, NoRuntimePermissions, UnavailableCamera};

    MediaCapture::new(
        Rc::new(NoRuntimePermissions),
        Rc::new(UnavailableCamera),
        Rc::new(DesktopLibraryLauncher),
        Rc::new(notifier),
        config,
    )
}
