use anyhow::Context;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// String key-value storage backing the usage gate.
pub trait UsageStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

impl<S: UsageStore + ?Sized> UsageStore for &S {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> { (**self).set(key, value) }
}

#[derive(Clone, Default)]
pub struct MemoryStore(Arc<RwLock<BTreeMap<String, String>>>);

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl UsageStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.0.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.0.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in one JSON object file. The file is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// `<dir>/usage.json`
    pub fn in_dir(dir: &Path) -> Self { Self::new(dir.join("usage.json")) }

    pub fn path(&self) -> &Path { &self.path }

    fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", self.path.display())),
        };
        match serde_json::from_str(&text) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(error=%e, path=%self.path.display(), "usage store is not a JSON object; starting empty");
                Ok(BTreeMap::new())
            }
        }
    }
}

impl UsageStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        // temp file in the same dir, then rename over the target
        let mut tmp = tempfile::NamedTempFile::new_in(dir).with_context(|| format!("creating temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, &map)?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
