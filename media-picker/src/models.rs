use serde::{Deserialize, Deserializer, Serialize};

/// OS-mediated permission category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Camera,
    ExternalStorage,
}

impl Capability {
    /// Android manifest permission name
    pub fn android_permission(&self) -> &'static str {
        match self {
            Capability::Camera => "android.permission.CAMERA",
            Capability::ExternalStorage => "android.permission.WRITE_EXTERNAL_STORAGE",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Camera => write!(f, "camera"),
            Capability::ExternalStorage => write!(f, "external storage"),
        }
    }
}

/// Title and message shown in the OS permission dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionPrompt {
    pub title: String,
    pub message: String,
}

impl PermissionPrompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Answer of the OS permission service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    NeverAskAgain,
    Dismissed,
}

impl PermissionStatus {
    /// Parses the status string reported by the Android bridge.
    /// Anything unknown counts as a dismissed dialog.
    pub fn from_bridge(s: &str) -> Self {
        match s.trim() {
            "granted" => PermissionStatus::Granted,
            "denied" => PermissionStatus::Denied,
            "never_ask_again" => PermissionStatus::NeverAskAgain,
            _ => PermissionStatus::Dismissed,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    Low,
    High,
}

/// Request handed to a launcher. Camera-only fields stay `None` for gallery picks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOptions {
    pub media_type: MediaKind,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_quality: Option<VideoQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_to_photos: Option<bool>,
    #[serde(default)]
    pub include_base64: bool,
}

/// Error codes a picker may report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerErrorCode {
    CameraUnavailable,
    Permission,
    Others,
    Unknown(String),
}

impl PickerErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            PickerErrorCode::CameraUnavailable => "camera_unavailable",
            PickerErrorCode::Permission => "permission",
            PickerErrorCode::Others => "others",
            PickerErrorCode::Unknown(code) => code,
        }
    }
}

impl From<&str> for PickerErrorCode {
    fn from(s: &str) -> Self {
        match s {
            "camera_unavailable" => PickerErrorCode::CameraUnavailable,
            "permission" => PickerErrorCode::Permission,
            "others" => PickerErrorCode::Others,
            other => PickerErrorCode::Unknown(other.to_string()),
        }
    }
}

impl Serialize for PickerErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PickerErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(PickerErrorCode::from(s.as_str()))
    }
}

/// Raw envelope a launcher resolves with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerResponse {
    #[serde(default)]
    pub did_cancel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<PickerErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl PickerResponse {
    pub fn cancelled() -> Self {
        Self {
            did_cancel: true,
            ..Default::default()
        }
    }

    pub fn error(code: PickerErrorCode, message: Option<String>) -> Self {
        Self {
            error_code: Some(code),
            error_message: message,
            ..Default::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// The most recently picked media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResult {
    pub uri: String,
    pub base64: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

impl MediaResult {
    pub fn is_video(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("video/"))
    }

    /// One-line label: name, type and size where known
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.file_name {
            parts.push(name.clone());
        }
        if let Some(mime) = &self.mime_type {
            parts.push(mime.clone());
        }
        if let (Some(w), Some(h)) = (self.width, self.height) {
            parts.push(format!("{}×{}", w, h));
        }
        if let Some(size) = self.file_size {
            parts.push(format_size(size));
        }
        parts.join(" · ")
    }
}

fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

/// Classified result of one picker invocation
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Cancelled,
    DeviceUnavailable,
    PermissionDenied,
    OtherError(String),
    Success(MediaResult),
}

impl CaptureOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CaptureOutcome::Success(_))
    }
}

/// The four user-triggered actions of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaAction {
    CapturePhoto,
    CaptureVideo,
    PickPhoto,
    PickVideo,
}

impl MediaAction {
    pub const ALL: [MediaAction; 4] = [
        MediaAction::CapturePhoto,
        MediaAction::CaptureVideo,
        MediaAction::PickPhoto,
        MediaAction::PickVideo,
    ];

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaAction::CapturePhoto | MediaAction::PickPhoto => MediaKind::Photo,
            MediaAction::CaptureVideo | MediaAction::PickVideo => MediaKind::Video,
        }
    }

    pub fn uses_camera(&self) -> bool {
        matches!(self, MediaAction::CapturePhoto | MediaAction::CaptureVideo)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            MediaAction::CapturePhoto => 0,
            MediaAction::CaptureVideo => 1,
            MediaAction::PickPhoto => 2,
            MediaAction::PickVideo => 3,
        }
    }
}

impl std::fmt::Display for MediaAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaAction::CapturePhoto => write!(f, "capture photo"),
            MediaAction::CaptureVideo => write!(f, "capture video"),
            MediaAction::PickPhoto => write!(f, "pick photo"),
            MediaAction::PickVideo => write!(f, "pick video"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_camel_case_json() {
        let json = r#"{"uri":"file://a.jpg","fileSize":1024,"type":"image/jpeg","fileName":"a.jpg"}"#;
        let resp = PickerResponse::from_json(json).unwrap();
        assert!(!resp.did_cancel);
        assert_eq!(resp.uri.as_deref(), Some("file://a.jpg"));
        assert_eq!(resp.file_size, Some(1024));
        assert_eq!(resp.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(resp.file_name.as_deref(), Some("a.jpg"));
        assert_eq!(resp.error_code, None);
    }

    #[test]
    fn test_error_codes_parse() {
        let resp =
            PickerResponse::from_json(r#"{"errorCode":"others","errorMessage":"disk full"}"#)
                .unwrap();
        assert_eq!(resp.error_code, Some(PickerErrorCode::Others));
        assert_eq!(resp.error_message.as_deref(), Some("disk full"));

        let resp = PickerResponse::from_json(r#"{"errorCode":"weird"}"#).unwrap();
        assert_eq!(
            resp.error_code,
            Some(PickerErrorCode::Unknown("weird".to_string()))
        );
    }

    #[test]
    fn test_permission_status_from_bridge() {
        assert_eq!(PermissionStatus::from_bridge("granted"), PermissionStatus::Granted);
        assert_eq!(PermissionStatus::from_bridge("denied"), PermissionStatus::Denied);
        assert_eq!(
            PermissionStatus::from_bridge("never_ask_again"),
            PermissionStatus::NeverAskAgain
        );
        assert_eq!(PermissionStatus::from_bridge(""), PermissionStatus::Dismissed);
        assert!(!PermissionStatus::from_bridge("GRANTED").is_granted());
    }

    #[test]
    fn test_summary() {
        let media = MediaResult {
            uri: "file://a.jpg".to_string(),
            base64: None,
            width: Some(300),
            height: Some(550),
            file_size: Some(2048),
            mime_type: Some("image/jpeg".to_string()),
            file_name: Some("a.jpg".to_string()),
        };
        assert_eq!(media.summary(), "a.jpg · image/jpeg · 300×550 · 2.0 KB");
        assert!(!media.is_video());
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(MediaAction::CaptureVideo.kind(), MediaKind::Video);
        assert!(MediaAction::CapturePhoto.uses_camera());
        assert!(!MediaAction::PickVideo.uses_camera());
    }
}
