use crate::models::MediaResult;
use tokio::sync::watch;

/// Holder of the current media item.
///
/// Clones share the same state. Only `set_media_result` writes; views read
/// through `current` or follow changes with `subscribe`.
#[derive(Clone)]
pub struct MediaStore {
    tx: watch::Sender<Option<MediaResult>>,
}

impl MediaStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<MediaResult> {
        self.tx.borrow().clone()
    }

    /// Replaces the current item entirely
    pub fn set_media_result(&self, media: MediaResult) {
        log::info!("Media result replaced: {}", media.uri);
        self.tx.send_replace(Some(media));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<MediaResult>> {
        self.tx.subscribe()
    }
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new()
    }
}
