mod capture_screen;

pub use capture_screen::{CaptureContext, CaptureScreen};
