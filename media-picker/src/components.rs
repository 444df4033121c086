//! Dioxus preview for the picked media
//!
//! The webview cannot always open `file://` URIs directly, so local photos are
//! inlined as data URLs the same way the picker's base64 payload is. Videos
//! keep their uri and are streamed by the player.

use crate::models::MediaResult;
use dioxus::prelude::*;

/// Builds the `src` for an `<img>`/`<video>` element, `None` if there is
/// nothing to show
pub fn media_source(media: &MediaResult) -> Option<String> {
    use base64::{engine::general_purpose, Engine as _};

    let mime = media.mime_type.as_deref().unwrap_or("image/jpeg");
    if let Some(data) = &media.base64 {
        return Some(format!("data:{};base64,{}", mime, data));
    }
    if media.uri.is_empty() {
        return None;
    }

    if !media.is_video() {
        if let Some(path) = media.uri.strip_prefix("file://") {
            match std::fs::read(path) {
                Ok(bytes) => {
                    let encoded = general_purpose::STANDARD.encode(&bytes);
                    return Some(format!("data:{};base64,{}", mime, encoded));
                }
                Err(e) => log::debug!("Preview falls back to uri for {}: {}", path, e),
            }
        }
    }

    Some(media.uri.clone())
}

/// Shows the current photo or video, or an empty frame
#[component]
pub fn MediaPreview(
    #[props(default = None)] media: Option<MediaResult>,
    #[props(default = 200)] size: u32,
) -> Element {
    // Only recomputed when a different item comes in
    let source = use_memo(use_reactive((&media,), |(media,)| {
        media.as_ref().and_then(media_source)
    }));

    let frame = format!(
        "width: {size}px; height: {size}px; margin: 5px; border-radius: 8px; overflow: hidden; background: #f0f0f0; display: flex; align-items: center; justify-content: center;"
    );

    rsx! {
        div { style: "{frame}",
            match (&media, source()) {
                (Some(m), Some(src)) if m.is_video() => rsx! {
                    video {
                        src: "{src}",
                        controls: true,
                        style: "max-width: 100%; max-height: 100%;",
                    }
                },
                (Some(m), Some(src)) => rsx! {
                    img {
                        src: "{src}",
                        alt: m.file_name.clone().unwrap_or_default(),
                        style: "max-width: 100%; max-height: 100%; object-fit: contain;",
                    }
                },
                _ => rsx! {
                    div { style: "color: #999; font-size: 48px;", "📷" }
                },
            }
        }
    }
}
