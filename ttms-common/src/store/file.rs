use super::Store;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file store serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// A [`Store`] of strings persisted as a single JSON object.
///
/// A missing file reads as an empty store. Every write rewrites the whole file.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a new [`JsonFileStore`] reading and writing the file at the given path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), lock: Mutex::new(()) }
    }
    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn load(&self) -> Result<BTreeMap<String, String>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), Error> {
        Ok(std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?)
    }
    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), Error> {
        let _guard = self.lock.lock().unwrap();
        // unparsable contents are replaced, not merged
        let mut map = match self.load() {
            Err(Error::SerdeJson(_)) => BTreeMap::new(),
            loaded => loaded?,
        };
        f(&mut map);
        self.save(&map)
    }
}

impl Store<String, String> for JsonFileStore {
    type Error = Error;

    async fn get(&self, key: &String) -> Result<Option<String>, Self::Error> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.remove(key))
    }
    async fn set(&self, key: String, value: String) -> Result<(), Self::Error> {
        self.update(|map| {
            map.insert(key, value);
        })
    }
    async fn del(&self, key: &String) -> Result<(), Self::Error> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            map.remove(key);
        })
    }
    async fn clear(&self) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().unwrap();
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ttms-common-{}-{name}.json", std::process::id()))
    }

    #[tokio::test]
    async fn persists_between_instances() {
        let path = temp_path("persist");
        {
            let store = JsonFileStore::new(&path);
            store.set("key".into(), r#"{"session_id":"abc"}"#.into()).await.expect("set");
        }
        let store = JsonFileStore::new(&path);
        assert_eq!(
            store.get(&"key".into()).await.expect("get"),
            Some(String::from(r#"{"session_id":"abc"}"#))
        );
        store.clear().await.expect("clear");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.get(&"key".into()).await.expect("get"), None);
        store.del(&"key".into()).await.expect("del");
        store.clear().await.expect("clear");
    }

    #[tokio::test]
    async fn malformed_file_is_unreadable_but_writable() {
        let path = temp_path("malformed");
        std::fs::write(&path, "not json").expect("write");
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get(&"key".into()).await, Err(Error::SerdeJson(_))));
        store.del(&"key".into()).await.expect("del over malformed file");
        assert_eq!(store.get(&"key".into()).await.expect("get"), None);

        std::fs::write(&path, "{oops").expect("write");
        store.set("key".into(), "value".into()).await.expect("set over malformed file");
        assert_eq!(store.get(&"key".into()).await.expect("get"), Some(String::from("value")));
        store.clear().await.expect("clear");
    }
}
