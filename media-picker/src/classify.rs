use crate::models::{CaptureOutcome, MediaResult, PickerErrorCode, PickerResponse};

/// Maps a raw picker response to an outcome. First match wins:
/// cancel, camera unavailable, permission, other error, success.
pub fn classify_response(response: PickerResponse) -> CaptureOutcome {
    if response.did_cancel {
        return CaptureOutcome::Cancelled;
    }

    match response.error_code {
        Some(PickerErrorCode::CameraUnavailable) => return CaptureOutcome::DeviceUnavailable,
        Some(PickerErrorCode::Permission) => return CaptureOutcome::PermissionDenied,
        Some(PickerErrorCode::Others) => {
            return CaptureOutcome::OtherError(response.error_message.unwrap_or_default())
        }
        Some(PickerErrorCode::Unknown(code)) => {
            log::debug!("Unrecognised picker error code {:?}, keeping the media", code);
        }
        None => {}
    }

    // Anything else is a pick, with whatever fields the picker filled in
    CaptureOutcome::Success(MediaResult {
        uri: response.uri.unwrap_or_default(),
        base64: response.base64,
        width: response.width,
        height: response.height,
        file_size: response.file_size,
        mime_type: response.mime_type,
        file_name: response.file_name,
    })
}
