use super::{Config, Loader, Saver};
use anyhow::{bail, Context};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A `.json` file holding a [`Config`].
///
/// A missing file loads as [`Config::default`]. Saving creates the parent directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn check_extension(&self) -> anyhow::Result<()> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(()),
            _ => bail!("config file must have a .json extension: {:?}", self.path),
        }
    }
    fn read(&self) -> anyhow::Result<Config> {
        self.check_extension()?;
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("malformed config file {:?}", self.path)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read {:?}", self.path)),
        }
    }
    fn write(&self, config: &Config) -> anyhow::Result<()> {
        self.check_extension()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(config)?)
            .with_context(|| format!("cannot write {:?}", self.path))
    }
}

impl Loader for FileStore {
    async fn load(&self) -> core::result::Result<Config, BoxError> {
        Ok(self.read()?)
    }
}

impl Saver for FileStore {
    async fn save(&self, config: &Config) -> core::result::Result<(), BoxError> {
        Ok(self.write(config)?)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ttms-session-config-{}", std::process::id()))
            .join(format!("{name}.json"))
    }

    #[tokio::test]
    async fn save_and_load() {
        let path = temp_path("saved");
        let store = FileStore::new(&path);
        let config = Config { cookie_ttl_secs: 120, ..Default::default() };
        config.save(&store).await.expect("save");
        assert_eq!(Config::load(&store).await.expect("load"), config);
        std::fs::remove_file(&path).expect("cleanup");
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(Config::load(&store).await.expect("load"), Config::default());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "{not json").expect("write");
        assert!(matches!(
            Config::load(&FileStore::new(&path)).await,
            Err(crate::Error::ConfigLoad(_))
        ));
        std::fs::remove_file(&path).expect("cleanup");
    }

    #[tokio::test]
    async fn non_json_path_is_rejected() {
        let store = FileStore::new("config.yaml");
        assert!(matches!(Config::load(&store).await, Err(crate::Error::ConfigLoad(_))));
        assert!(matches!(
            Config::default().save(&store).await,
            Err(crate::Error::ConfigSave(_))
        ));
    }
}
