use std::sync::Arc;

use tracing::info;
use url::Url;

use super::delegate::MediaStore;
use super::PlaybackPresenter;

/// Download management for tracks that should play from a local copy.
pub struct Downloader {
    store: Arc<dyn MediaStore>,
    presenter: Arc<PlaybackPresenter>,
}

impl Downloader {
    pub fn new(store: Arc<dyn MediaStore>, presenter: Arc<PlaybackPresenter>) -> Self {
        Self { store, presenter }
    }

    /// Registers the locator with the presenter, then starts the download.
    pub fn download<F>(&self, remote: &Url, on_complete: F)
    where
        F: FnOnce(Url) + Send + 'static,
    {
        self.presenter.add_url_to_key_map(remote);
        info!(url = %remote, "download requested");
        self.store.start_download(remote, Box::new(on_complete));
    }

    pub fn cancel_download(&self, remote: &Url) {
        self.store.delete_download(remote);
    }

    pub fn delete_download(&self, remote: &Url) {
        self.store.delete_download(remote);
    }

    pub fn is_downloaded(&self, remote: &Url) -> bool {
        self.store.persisted_url(remote).is_some()
    }
}
