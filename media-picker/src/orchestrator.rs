// Capture/pick orchestration
//
// One press runs: build options, gate on permissions (camera path only),
// launch the picker, classify the answer, then either replace the current
// media or emit a notice.

use crate::classify::classify_response;
use crate::config::PickerConfig;
use crate::models::{Capability, CaptureOptions, CaptureOutcome, MediaAction, MediaKind};
use crate::notice::{Notice, Notifier};
use crate::permission::{PermissionGate, PermissionProvider};
use crate::picker::MediaLauncher;
use crate::store::MediaStore;
use std::cell::Cell;
use std::rc::Rc;

/// Why a press did not reach the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    PermissionMissing(Capability),
    /// Asking for the permission failed; a notice has already been sent
    PermissionRequestFailed(Capability),
    AlreadyRunning(MediaAction),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::PermissionMissing(capability) => {
                write!(f, "Permission missing: {}", capability)
            }
            CaptureError::PermissionRequestFailed(capability) => {
                write!(f, "Permission request failed: {}", capability)
            }
            CaptureError::AlreadyRunning(action) => write!(f, "Already running: {}", action),
        }
    }
}

impl std::error::Error for CaptureError {}

const GATED_CAPABILITIES: [Capability; 2] = [Capability::Camera, Capability::ExternalStorage];

/// Clears the in-flight flag of an action when the press is over
struct InFlight<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

pub struct MediaCapture {
    permissions: Rc<dyn PermissionProvider>,
    camera: Rc<dyn MediaLauncher>,
    library: Rc<dyn MediaLauncher>,
    notifier: Rc<dyn Notifier>,
    store: MediaStore,
    config: PickerConfig,
    in_flight: [Cell<bool>; 4],
}

impl MediaCapture {
    pub fn new(
        permissions: Rc<dyn PermissionProvider>,
        camera: Rc<dyn MediaLauncher>,
        library: Rc<dyn MediaLauncher>,
        notifier: Rc<dyn Notifier>,
        config: PickerConfig,
    ) -> Self {
        Self {
            permissions,
            camera,
            library,
            notifier,
            store: MediaStore::new(),
            config,
            in_flight: Default::default(),
        }
    }

    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub async fn run(&self, action: MediaAction) -> Result<CaptureOutcome, CaptureError> {
        if action.uses_camera() {
            self.capture(action.kind()).await
        } else {
            self.choose_file(action.kind()).await
        }
    }

    /// Takes a photo or video with the camera. Both camera and storage
    /// permission must be granted before the camera is opened.
    pub async fn capture(&self, kind: MediaKind) -> Result<CaptureOutcome, CaptureError> {
        let action = match kind {
            MediaKind::Photo => MediaAction::CapturePhoto,
            MediaKind::Video => MediaAction::CaptureVideo,
        };
        let _guard = self.enter(action)?;
        let options = self.config.camera_options(kind);

        let gate = PermissionGate::new(
            self.permissions.as_ref(),
            self.notifier.as_ref(),
            &self.config,
        );
        if let Some(missing) = gate.check_all(&GATED_CAPABILITIES).await {
            log::info!(
                "{} skipped, {} permission not granted",
                action,
                missing.capability
            );
            return Err(if missing.reported {
                CaptureError::PermissionRequestFailed(missing.capability)
            } else {
                CaptureError::PermissionMissing(missing.capability)
            });
        }

        Ok(self.launch_and_apply(self.camera.as_ref(), &options).await)
    }

    /// Picks a photo or video from the library. The OS picker handles its own
    /// permissions.
    pub async fn choose_file(&self, kind: MediaKind) -> Result<CaptureOutcome, CaptureError> {
        let action = match kind {
            MediaKind::Photo => MediaAction::PickPhoto,
            MediaKind::Video => MediaAction::PickVideo,
        };
        let _guard = self.enter(action)?;
        let options = self.config.library_options(kind);
        Ok(self.launch_and_apply(self.library.as_ref(), &options).await)
    }

    fn enter(&self, action: MediaAction) -> Result<Option<InFlight<'_>>, CaptureError> {
        if !self.config.single_flight {
            return Ok(None);
        }
        let flag = &self.in_flight[action.index()];
        if flag.replace(true) {
            log::debug!("{} ignored, previous press still running", action);
            return Err(CaptureError::AlreadyRunning(action));
        }
        Ok(Some(InFlight { flag }))
    }

    async fn launch_and_apply(
        &self,
        launcher: &dyn MediaLauncher,
        options: &CaptureOptions,
    ) -> CaptureOutcome {
        let outcome = match launcher.launch(options).await {
            Ok(response) => classify_response(response),
            Err(e) => {
                log::warn!("Picker launch failed: {}", e);
                CaptureOutcome::OtherError(e.to_string())
            }
        };
        self.apply(&outcome);
        outcome
    }

    fn apply(&self, outcome: &CaptureOutcome) {
        let notice = match outcome {
            CaptureOutcome::Success(media) => {
                log::info!("Picked {} ({})", media.uri, media.summary());
                self.store.set_media_result(media.clone());
                return;
            }
            CaptureOutcome::Cancelled => Notice::cancelled(),
            CaptureOutcome::DeviceUnavailable => Notice::device_unavailable(),
            CaptureOutcome::PermissionDenied => Notice::permission_denied(),
            CaptureOutcome::OtherError(message) => Notice::other_error(message.clone()),
        };
        log::info!("Picker finished without media: {:?}", notice.kind);
        self.notifier.notify(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaResult, PermissionStatus, PickerErrorCode, PickerResponse};
    use crate::notice::{NoticeKind, RecordingNotifier};
    use crate::permission::tests::FakePermissions;
    use crate::permission::NoRuntimePermissions;
    use crate::picker::LaunchError;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    /// Answers every launch with the same result and remembers the options
    struct FakeLauncher {
        answer: Result<PickerResponse, LaunchError>,
        launched: RefCell<Vec<CaptureOptions>>,
    }

    impl FakeLauncher {
        fn new(answer: PickerResponse) -> Rc<Self> {
            Rc::new(Self {
                answer: Ok(answer),
                launched: RefCell::new(Vec::new()),
            })
        }

        fn failing(error: LaunchError) -> Rc<Self> {
            Rc::new(Self {
                answer: Err(error),
                launched: RefCell::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.launched.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl MediaLauncher for FakeLauncher {
        async fn launch(&self, options: &CaptureOptions) -> Result<PickerResponse, LaunchError> {
            self.launched.borrow_mut().push(options.clone());
            self.answer.clone()
        }
    }

    /// Waits for the test to hand over each response
    struct ManualLauncher {
        pending: RefCell<VecDeque<oneshot::Receiver<PickerResponse>>>,
    }

    #[async_trait(?Send)]
    impl MediaLauncher for ManualLauncher {
        async fn launch(&self, _options: &CaptureOptions) -> Result<PickerResponse, LaunchError> {
            let rx = self
                .pending
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| LaunchError::Bridge("no pending response".to_string()))?;
            rx.await.map_err(|e| LaunchError::Bridge(e.to_string()))
        }
    }

    struct Harness {
        capture: MediaCapture,
        permissions: Rc<FakePermissions>,
        camera: Rc<FakeLauncher>,
        library: Rc<FakeLauncher>,
        notifier: Rc<RecordingNotifier>,
    }

    fn harness(permissions: FakePermissions, answer: PickerResponse) -> Harness {
        let permissions = Rc::new(permissions);
        let camera = FakeLauncher::new(answer.clone());
        let library = FakeLauncher::new(answer);
        let notifier = Rc::new(RecordingNotifier::new());
        let capture = MediaCapture::new(
            permissions.clone(),
            camera.clone(),
            library.clone(),
            notifier.clone(),
            PickerConfig::default(),
        );
        Harness {
            capture,
            permissions,
            camera,
            library,
            notifier,
        }
    }

    fn jpeg_response() -> PickerResponse {
        PickerResponse {
            uri: Some("file://a.jpg".to_string()),
            file_size: Some(1024),
            mime_type: Some("image/jpeg".to_string()),
            file_name: Some("a.jpg".to_string()),
            ..Default::default()
        }
    }

    fn previous_media() -> MediaResult {
        MediaResult {
            uri: "file://old.png".to_string(),
            base64: Some("iVBORw0KGgo=".to_string()),
            width: Some(64),
            height: Some(64),
            file_size: Some(99),
            mime_type: Some("image/png".to_string()),
            file_name: Some("old.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_camera_denied_never_launches() {
        let h = harness(
            FakePermissions::new(PermissionStatus::Denied, PermissionStatus::Granted),
            jpeg_response(),
        );
        h.capture.store().set_media_result(previous_media());

        let result = h.capture.capture(MediaKind::Photo).await;

        assert_eq!(
            result,
            Err(CaptureError::PermissionMissing(Capability::Camera))
        );
        assert_eq!(h.camera.calls(), 0);
        assert_eq!(h.capture.store().current(), Some(previous_media()));
    }

    #[tokio::test]
    async fn test_camera_permission_fault_never_launches() {
        let h = harness(FakePermissions::failing(Capability::Camera), jpeg_response());
        h.capture.store().set_media_result(previous_media());

        let result = h.capture.capture(MediaKind::Photo).await;

        assert_eq!(
            result,
            Err(CaptureError::PermissionRequestFailed(Capability::Camera))
        );
        assert_eq!(h.camera.calls(), 0);
        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert!(matches!(
            notices[0].kind,
            NoticeKind::PermissionRequestFailed {
                capability: Capability::Camera,
                ..
            }
        ));
        assert_eq!(h.capture.store().current(), Some(previous_media()));
    }

    #[tokio::test]
    async fn test_storage_denied_never_launches() {
        let h = harness(
            FakePermissions::new(PermissionStatus::Granted, PermissionStatus::NeverAskAgain),
            jpeg_response(),
        );

        let result = h.capture.capture(MediaKind::Video).await;

        assert_eq!(
            result,
            Err(CaptureError::PermissionMissing(Capability::ExternalStorage))
        );
        assert_eq!(h.camera.calls(), 0);
        assert_eq!(h.capture.store().current(), None);
    }

    #[tokio::test]
    async fn test_permissions_asked_in_order() {
        let h = harness(FakePermissions::granted(), jpeg_response());
        h.capture.capture(MediaKind::Photo).await.unwrap();
        assert_eq!(
            h.permissions.asked(),
            vec![Capability::Camera, Capability::ExternalStorage]
        );
    }

    #[tokio::test]
    async fn test_cancel_leaves_media_untouched() {
        let h = harness(FakePermissions::granted(), PickerResponse::cancelled());
        h.capture.store().set_media_result(previous_media());

        let outcome = h.capture.capture(MediaKind::Photo).await.unwrap();

        assert_eq!(outcome, CaptureOutcome::Cancelled);
        assert_eq!(h.camera.calls(), 1);
        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Cancelled);
        assert_eq!(h.capture.store().current(), Some(previous_media()));
    }

    #[tokio::test]
    async fn test_success_replaces_media() {
        let h = harness(FakePermissions::granted(), jpeg_response());
        h.capture.store().set_media_result(previous_media());

        let outcome = h.capture.capture(MediaKind::Photo).await.unwrap();

        let expected = MediaResult {
            uri: "file://a.jpg".to_string(),
            base64: None,
            width: None,
            height: None,
            file_size: Some(1024),
            mime_type: Some("image/jpeg".to_string()),
            file_name: Some("a.jpg".to_string()),
        };
        assert_eq!(outcome, CaptureOutcome::Success(expected.clone()));
        assert_eq!(h.capture.store().current(), Some(expected));
        assert_eq!(
            h.capture.store().current().map(|m| m.uri),
            Some("file://a.jpg".to_string())
        );
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_gallery_other_error_shows_message() {
        let h = harness(
            FakePermissions::new(PermissionStatus::Denied, PermissionStatus::Denied),
            PickerResponse::error(PickerErrorCode::Others, Some("disk full".to_string())),
        );
        h.capture.store().set_media_result(previous_media());

        let outcome = h.capture.choose_file(MediaKind::Video).await.unwrap();

        assert_eq!(outcome, CaptureOutcome::OtherError("disk full".to_string()));
        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].text, "disk full");
        assert_eq!(h.capture.store().current(), Some(previous_media()));
    }

    #[tokio::test]
    async fn test_gallery_skips_permission_gate() {
        let h = harness(
            FakePermissions::new(PermissionStatus::Denied, PermissionStatus::Denied),
            jpeg_response(),
        );

        let outcome = h.capture.choose_file(MediaKind::Photo).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(h.library.calls(), 1);
        assert_eq!(h.camera.calls(), 0);
        assert!(h.permissions.asked().is_empty());
    }

    #[tokio::test]
    async fn test_options_per_path() {
        let h = harness(FakePermissions::granted(), jpeg_response());
        h.capture.run(MediaAction::CaptureVideo).await.unwrap();
        h.capture.run(MediaAction::PickPhoto).await.unwrap();

        let camera_opts = h.camera.launched.borrow()[0].clone();
        assert_eq!(camera_opts.media_type, MediaKind::Video);
        assert_eq!(camera_opts.save_to_photos, Some(true));
        assert_eq!(camera_opts.duration_limit, Some(30));

        let library_opts = h.library.launched.borrow()[0].clone();
        assert_eq!(library_opts.media_type, MediaKind::Photo);
        assert_eq!(library_opts.save_to_photos, None);
        assert_eq!(library_opts.duration_limit, None);
    }

    #[tokio::test]
    async fn test_device_unavailable_and_denied_notices() {
        for (code, kind) in [
            (PickerErrorCode::CameraUnavailable, NoticeKind::DeviceUnavailable),
            (PickerErrorCode::Permission, NoticeKind::PermissionDenied),
        ] {
            let h = harness(FakePermissions::granted(), PickerResponse::error(code, None));
            h.capture.capture(MediaKind::Photo).await.unwrap();
            let notices = h.notifier.notices();
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].kind, kind);
            assert_eq!(h.capture.store().current(), None);
        }
    }

    #[tokio::test]
    async fn test_launch_error_becomes_other_error() {
        let camera = FakeLauncher::failing(LaunchError::Bridge("activity gone".to_string()));
        let notifier = Rc::new(RecordingNotifier::new());
        let capture = MediaCapture::new(
            Rc::new(NoRuntimePermissions),
            camera.clone(),
            FakeLauncher::new(jpeg_response()),
            notifier.clone(),
            PickerConfig::default(),
        );

        let outcome = capture.capture(MediaKind::Photo).await.unwrap();

        assert_eq!(
            outcome,
            CaptureOutcome::OtherError("Picker bridge error: activity gone".to_string())
        );
        assert_eq!(notifier.notices().len(), 1);
        assert_eq!(capture.store().current(), None);
    }

    fn manual_capture(
        single_flight: bool,
    ) -> (MediaCapture, Vec<oneshot::Sender<PickerResponse>>) {
        let mut senders = Vec::new();
        let mut receivers = VecDeque::new();
        for _ in 0..2 {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        let library = Rc::new(ManualLauncher {
            pending: RefCell::new(receivers),
        });
        let config = PickerConfig {
            single_flight,
            ..Default::default()
        };
        let capture = MediaCapture::new(
            Rc::new(NoRuntimePermissions),
            FakeLauncher::new(PickerResponse::cancelled()),
            library,
            Rc::new(RecordingNotifier::new()),
            config,
        );
        (capture, senders)
    }

    fn uri_response(uri: &str) -> PickerResponse {
        PickerResponse {
            uri: Some(uri.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_concurrent_presses_last_answer_wins() {
        let (capture, mut senders) = manual_capture(false);
        let second = senders.pop().unwrap();
        let first = senders.pop().unwrap();

        let (a, b, _) = tokio::join!(
            capture.choose_file(MediaKind::Photo),
            capture.choose_file(MediaKind::Photo),
            async {
                second.send(uri_response("file://second.jpg")).unwrap();
                while capture.store().current().is_none() {
                    tokio::task::yield_now().await;
                }
                first.send(uri_response("file://first.jpg")).unwrap();
            }
        );

        assert!(a.unwrap().is_success());
        assert!(b.unwrap().is_success());
        assert_eq!(
            capture.store().current().map(|m| m.uri),
            Some("file://first.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_single_flight_rejects_second_press() {
        let (capture, mut senders) = manual_capture(true);
        let first = senders.remove(0);

        let (a, b, _) = tokio::join!(
            capture.choose_file(MediaKind::Photo),
            capture.choose_file(MediaKind::Photo),
            async {
                first.send(uri_response("file://first.jpg")).unwrap();
            }
        );

        assert!(a.unwrap().is_success());
        assert_eq!(b, Err(CaptureError::AlreadyRunning(MediaAction::PickPhoto)));

        // guard released once the first press finished
        let next = senders.remove(0);
        next.send(uri_response("file://next.jpg")).unwrap();
        let c = capture.choose_file(MediaKind::Photo).await;
        assert!(c.unwrap().is_success());
        assert_eq!(
            capture.store().current().map(|m| m.uri),
            Some("file://next.jpg".to_string())
        );
    }
}
