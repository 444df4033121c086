use crate::error::{capability_label, AppError};
use dioxus::prelude::*;
use dioxus_i18n::t;
use media_picker::{MediaAction, MediaCapture, MediaPreview, MediaResult, Notice, NoticeKind};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Capture flow and its notice stream, provided once by the app
#[derive(Clone)]
pub struct CaptureContext {
    pub capture: Rc<MediaCapture>,
    notices: Rc<RefCell<Option<UnboundedReceiver<Notice>>>>,
}

impl CaptureContext {
    pub fn new(capture: MediaCapture, notices: UnboundedReceiver<Notice>) -> Self {
        Self {
            capture: Rc::new(capture),
            notices: Rc::new(RefCell::new(Some(notices))),
        }
    }
}

/// Localised text for a notice. Picker error messages are shown as they are.
fn notice_text(notice: &Notice) -> String {
    match &notice.kind {
        NoticeKind::Cancelled => t!("notice-cancelled"),
        NoticeKind::DeviceUnavailable => t!("notice-device-unavailable"),
        NoticeKind::PermissionDenied => t!("notice-permission-denied"),
        NoticeKind::OtherError => notice.text.clone(),
        NoticeKind::PermissionRequestFailed { capability, detail } => t!(
            "notice-permission-error",
            capability: capability_label(*capability),
            detail: detail.clone()
        ),
    }
}

fn action_label(action: MediaAction) -> String {
    match action {
        MediaAction::CapturePhoto => t!("action-capture-photo"),
        MediaAction::CaptureVideo => t!("action-capture-video"),
        MediaAction::PickPhoto => t!("action-pick-photo"),
        MediaAction::PickVideo => t!("action-pick-video"),
    }
}

#[component]
pub fn CaptureScreen() -> Element {
    let ctx = use_context::<CaptureContext>();
    let mut current = use_signal(|| ctx.capture.store().current());
    let mut notice = use_signal(|| None::<String>);

    // Mirror the store into the view
    let store = ctx.capture.store().clone();
    use_future(move || {
        let mut rx = store.subscribe();
        async move {
            while rx.changed().await.is_ok() {
                let media = rx.borrow_and_update().clone();
                current.set(media);
            }
        }
    });

    use_future(move || {
        let rx = ctx.notices.borrow_mut().take();
        async move {
            let Some(mut rx) = rx else {
                return;
            };
            while let Some(n) = rx.recv().await {
                notice.set(Some(notice_text(&n)));
            }
        }
    });

    let media: Option<MediaResult> = current();
    let uri = media
        .as_ref()
        .map(|m| m.uri.clone())
        .filter(|uri| !uri.is_empty());
    let summary = media.as_ref().map(|m| m.summary()).unwrap_or_default();

    rsx! {
        div { style: "display: flex; flex-direction: column; min-height: 100vh;",
            h1 { class: "title", {t!("app-title")} }

            if let Some(text) = notice() {
                div { class: "notice",
                    span { style: "flex: 1;", "⚠️ {text}" }
                    button {
                        class: "btn-secondary",
                        onclick: move |_| notice.set(None),
                        {t!("action-dismiss")}
                    }
                }
            }

            div { class: "container",
                MediaPreview { media: media.clone() }
                if let Some(uri) = uri {
                    div { class: "uri", "{uri}" }
                    if !summary.is_empty() {
                        div { class: "uri", style: "color: #666;", "{summary}" }
                    }
                } else {
                    div { class: "uri", style: "color: #999;", {t!("media-none")} }
                }

                for action in MediaAction::ALL {
                    ActionButton { key: "{action:?}", action, notice }
                }
            }
        }
    }
}

#[component]
fn ActionButton(action: MediaAction, notice: Signal<Option<String>>) -> Element {
    let ctx = use_context::<CaptureContext>();
    let mut running = use_signal(|| false);
    let mut notice = notice;
    let single_flight = ctx.capture.config().single_flight;

    rsx! {
        button {
            class: "btn-primary",
            disabled: single_flight && running(),
            onclick: move |_| {
                let capture = ctx.capture.clone();
                running.set(true);
                spawn(async move {
                    match capture.run(action).await {
                        Ok(outcome) => log::debug!("{} finished: {:?}", action, outcome.is_success()),
                        Err(e) => {
                            let err = AppError::from(e);
                            log::info!("{}", err);
                            if let Some(msg) = err.user_message() {
                                notice.set(Some(msg));
                            }
                        }
                    }
                    running.set(false);
                });
            },
            {action_label(action)}
        }
    }
}
