use dioxus::prelude::*;
use dioxus_i18n::prelude::use_init_i18n;

mod camera;
mod components;
mod error;
mod i18n;

use components::{CaptureContext, CaptureScreen};
use media_picker::ChannelNotifier;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    init_logging();
    dioxus::launch(App);
}

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("capture-preview"),
    );
}

#[cfg(not(target_os = "android"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[component]
fn App() -> Element {
    use_init_i18n(i18n::init_i18n);

    use_context_provider(|| {
        let (notifier, notices) = ChannelNotifier::new();
        let capture = camera::build_capture(camera::load_config(), notifier);
        CaptureContext::new(capture, notices)
    });

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div { style: "font-family: sans-serif;",
            CaptureScreen {}
        }
    }
}
