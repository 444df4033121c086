// User-visible notices
//
// Every terminal outcome of a capture produces exactly one notice. The text
// is a default English message; UIs may localise by kind instead.

use crate::models::Capability;
use std::sync::Mutex;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Cancelled,
    DeviceUnavailable,
    PermissionDenied,
    OtherError,
    /// The OS permission call itself failed. `detail` is the raw error text.
    PermissionRequestFailed {
        capability: Capability,
        detail: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn cancelled() -> Self {
        Self {
            kind: NoticeKind::Cancelled,
            text: "User cancelled the picker.".to_string(),
        }
    }

    pub fn device_unavailable() -> Self {
        Self {
            kind: NoticeKind::DeviceUnavailable,
            text: "Camera not available on this device.".to_string(),
        }
    }

    pub fn permission_denied() -> Self {
        Self {
            kind: NoticeKind::PermissionDenied,
            text: "Permission not granted.".to_string(),
        }
    }

    /// The picker's own message is shown verbatim
    pub fn other_error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::OtherError,
            text: message.into(),
        }
    }

    pub fn permission_request_failed(capability: Capability, detail: &str) -> Self {
        Self {
            kind: NoticeKind::PermissionRequestFailed {
                capability,
                detail: detail.to_string(),
            },
            text: format!("Error requesting {} permission: {}", capability, detail),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to a receiver owned by the UI
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            log::warn!("Notice receiver dropped, notice lost");
        }
    }
}

/// Keeps every notice in memory, in order
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
