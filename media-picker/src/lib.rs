//! # Media Picker
//!
//! Camera capture and gallery picking behind runtime permission checks.
//!
//! This crate provides:
//! - A permission gate that reduces OS answers to granted/denied
//! - Capture options built from a configurable set of defaults
//! - Launcher traits with Android (JNI) and desktop (file dialog) implementations
//! - Classification of picker responses into five outcomes
//! - A single-owner store for the most recently picked media
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use media_picker::{MediaCapture, MediaKind, NoRuntimePermissions, PickerConfig};
//! use std::rc::Rc;
//!
//! let capture = MediaCapture::new(
//!     Rc::new(NoRuntimePermissions),
//!     Rc::new(UnavailableCamera),
//!     Rc::new(DesktopLibraryLauncher),
//!     Rc::new(notifier),
//!     PickerConfig::default(),
//! );
//! capture.choose_file(MediaKind::Photo).await?;
//! let preview = capture.store().current();
//! ```

pub mod classify;
pub mod config;
pub mod models;
pub mod notice;
pub mod orchestrator;
pub mod permission;
pub mod picker;
pub mod store;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(feature = "components")]
pub mod components;

pub use classify::classify_response;
pub use config::{ConfigError, PickerConfig};
pub use models::{
    Capability, CaptureOptions, CaptureOutcome, MediaAction, MediaKind, MediaResult,
    PermissionPrompt, PermissionStatus, PickerErrorCode, PickerResponse, VideoQuality,
};
pub use notice::{ChannelNotifier, Notice, NoticeKind, Notifier, RecordingNotifier};
pub use orchestrator::{CaptureError, MediaCapture};
pub use permission::{
    request_permission, MissingPermission, NoRuntimePermissions, PermissionError, PermissionGate,
    PermissionProvider,
};
pub use picker::{LaunchError, MediaLauncher, UnavailableCamera};
pub use store::MediaStore;

#[cfg(not(target_os = "android"))]
pub use picker::DesktopLibraryLauncher;

#[cfg(target_os = "android")]
pub use android::{AndroidBridgeConfig, AndroidLauncher, AndroidPermissions, MediaSource};

#[cfg(feature = "components")]
pub use components::MediaPreview;
