// Permission gate
//
// Normalises OS permission answers to a plain bool. Platforms without a
// runtime permission model are granted everything without a prompt.

use crate::config::PickerConfig;
use crate::models::{Capability, PermissionPrompt, PermissionStatus};
use crate::notice::{Notice, Notifier};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub enum PermissionError {
    /// The bridge to the OS could not be reached
    Bridge(String),
    /// The OS rejected the request itself
    Request(String),
}

impl std::fmt::Display for PermissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionError::Bridge(msg) => write!(f, "Permission bridge error: {}", msg),
            PermissionError::Request(msg) => write!(f, "Permission request failed: {}", msg),
        }
    }
}

impl std::error::Error for PermissionError {}

#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// `false` on platforms where permissions are not requested at runtime
    fn has_runtime_model(&self) -> bool {
        true
    }

    /// Shows the OS prompt and waits for the user's answer
    async fn request(
        &self,
        capability: Capability,
        prompt: &PermissionPrompt,
    ) -> Result<PermissionStatus, PermissionError>;
}

/// Provider for desktop and web targets
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRuntimePermissions;

#[async_trait]
impl PermissionProvider for NoRuntimePermissions {
    fn has_runtime_model(&self) -> bool {
        false
    }

    async fn request(
        &self,
        _capability: Capability,
        _prompt: &PermissionPrompt,
    ) -> Result<PermissionStatus, PermissionError> {
        Ok(PermissionStatus::Granted)
    }
}

/// Requests one capability. Returns `true` only for an explicit grant; a
/// failing OS call is reported once through `notifier` and counts as denied.
pub async fn request_permission(
    provider: &dyn PermissionProvider,
    notifier: &dyn Notifier,
    capability: Capability,
    prompt: &PermissionPrompt,
) -> bool {
    matches!(
        ask(provider, notifier, capability, prompt).await,
        Answer::Granted
    )
}

enum Answer {
    Granted,
    Refused,
    /// The request failed and a notice was already sent
    Failed,
}

async fn ask(
    provider: &dyn PermissionProvider,
    notifier: &dyn Notifier,
    capability: Capability,
    prompt: &PermissionPrompt,
) -> Answer {
    if !provider.has_runtime_model() {
        return Answer::Granted;
    }

    match provider.request(capability, prompt).await {
        Ok(status) => {
            log::debug!("Permission {} answered with {:?}", capability, status);
            if status.is_granted() {
                Answer::Granted
            } else {
                Answer::Refused
            }
        }
        Err(e) => {
            log::warn!("Permission request for {} failed: {}", capability, e);
            notifier.notify(Notice::permission_request_failed(capability, &e.to_string()));
            Answer::Failed
        }
    }
}

/// First capability the gate could not obtain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingPermission {
    pub capability: Capability,
    /// The OS call failed and the user was already notified
    pub reported: bool,
}

pub struct PermissionGate<'a> {
    provider: &'a dyn PermissionProvider,
    notifier: &'a dyn Notifier,
    config: &'a PickerConfig,
}

impl<'a> PermissionGate<'a> {
    pub fn new(
        provider: &'a dyn PermissionProvider,
        notifier: &'a dyn Notifier,
        config: &'a PickerConfig,
    ) -> Self {
        Self {
            provider,
            notifier,
            config,
        }
    }

    /// Asks for every capability in order, one prompt at a time, and returns
    /// the first one that was not granted.
    pub async fn check_all(&self, capabilities: &[Capability]) -> Option<MissingPermission> {
        let mut missing = None;
        for &capability in capabilities {
            let answer = ask(
                self.provider,
                self.notifier,
                capability,
                self.config.prompt_for(capability),
            )
            .await;
            let reported = match answer {
                Answer::Granted => continue,
                Answer::Refused => false,
                Answer::Failed => true,
            };
            if missing.is_none() {
                missing = Some(MissingPermission {
                    capability,
                    reported,
                });
            }
        }
        missing
    }
}
