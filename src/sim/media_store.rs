use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{info, warn};
use url::{form_urlencoded, Url};

use crate::key::TrackKey;
use crate::presenter::delegate::{DownloadCallback, MediaStore};

/// Media store whose "downloads" complete immediately into a virtual directory.
#[derive(Debug)]
pub struct InMemoryMediaStore {
    root: Url,
    persisted: Mutex<HashMap<Url, Url>>,
}

impl InMemoryMediaStore {
    /// `root` must be a directory locator ending in `/`, e.g. `file:///downloads/`.
    pub fn new(root: Url) -> Self {
        Self {
            root,
            persisted: Mutex::new(HashMap::new()),
        }
    }

    /// Marks `remote` as already downloaded to `saved`.
    pub fn insert(&self, remote: Url, saved: Url) {
        self.persisted.lock().insert(remote, saved);
    }

    /// One file per canonical remote key, so distinct remotes never share a copy.
    fn local_for(&self, remote: &Url) -> Result<Url, url::ParseError> {
        let key = TrackKey::from_locator(remote);
        let name: String = form_urlencoded::byte_serialize(key.as_str().as_bytes()).collect();
        self.root.join(&name)
    }
}

impl MediaStore for InMemoryMediaStore {
    fn persisted_url(&self, remote: &Url) -> Option<Url> {
        self.persisted.lock().get(remote).cloned()
    }

    fn start_download(&self, remote: &Url, on_complete: DownloadCallback) {
        let saved = match self.local_for(remote) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(url = %remote, error = %e, "cannot derive local path");
                return;
            }
        };
        self.insert(remote.clone(), saved.clone());
        info!(url = %remote, saved = %saved, "download complete");
        on_complete(saved);
    }

    fn delete_download(&self, remote: &Url) {
        if self.persisted.lock().remove(remote).is_some() {
            info!(url = %remote, "download deleted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryMediaStore {
        InMemoryMediaStore::new(Url::parse("file:///downloads/").unwrap())
    }

    fn download(store: &InMemoryMediaStore, remote: &str) -> Url {
        let remote = Url::parse(remote).unwrap();
        store.start_download(&remote, Box::new(|_| {}));
        store.persisted_url(&remote).unwrap()
    }

    #[test]
    fn same_file_name_on_different_hosts_gets_distinct_copies() {
        let store = store();
        let a = download(&store, "https://a.example.com/ep.mp3");
        let b = download(&store, "https://b.example.com/ep.mp3");
        assert_ne!(a, b);
        assert_ne!(TrackKey::from_locator(&a), TrackKey::from_locator(&b));
    }

    #[test]
    fn query_variants_get_distinct_copies() {
        let store = store();
        let plain = download(&store, "https://cdn.example.com/ep.mp3");
        let high = download(&store, "https://cdn.example.com/ep.mp3?quality=high");
        assert_ne!(plain, high);
    }

    #[test]
    fn deleting_one_download_keeps_the_other() {
        let store = store();
        let a = Url::parse("https://a.example.com/ep.mp3").unwrap();
        download(&store, a.as_str());
        let b = download(&store, "https://b.example.com/ep.mp3");

        store.delete_download(&a);

        assert!(store.persisted_url(&a).is_none());
        let b_remote = Url::parse("https://b.example.com/ep.mp3").unwrap();
        assert_eq!(store.persisted_url(&b_remote), Some(b));
    }

    #[test]
    fn copies_stay_under_the_root() {
        let saved = download(&store(), "https://cdn.example.com/show/ep.mp3");
        assert!(saved.as_str().starts_with("file:///downloads/"));
        assert_eq!(saved.path_segments().map(|s| s.count()), Some(2));
    }
}
