use super::{Adjustment, FavorStore};
use crate::config::FavorConfig;
use crate::error::{FavorError, FavorResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard};

/// Favorability store backed by a single JSON object on disk.
///
/// Every operation reads the whole document and every write replaces it.
/// Without `exclusive_writes`, two overlapping read-modify-write cycles on
/// the same file can both start from the same prior value; the later write
/// wins and the earlier change is lost.
pub struct JsonFileStore {
    path: PathBuf,
    config: FavorConfig,
    write_lock: Option<Mutex<()>>,
    // Distinguishes temp files of overlapping writers
    write_seq: AtomicU64,
}

impl JsonFileStore {
    /// Open the store at `config.data_path(data_dir)`, creating the directory
    /// and an empty document if needed.
    pub async fn open(config: FavorConfig, data_dir: &Path) -> FavorResult<Self> {
        let path = config.data_path(data_dir);
        Self::open_at(config, path).await
    }

    /// Open the store at an explicit file path.
    pub async fn open_at(config: FavorConfig, path: PathBuf) -> FavorResult<Self> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FavorError::io(parent, e))?;
        }

        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| FavorError::io(&path, e))?
        {
            tokio::fs::write(&path, b"{}")
                .await
                .map_err(|e| FavorError::io(&path, e))?;
            tracing::info!(path = %path.display(), "Created empty favorability data file");
        }

        let write_lock = config.storage.exclusive_writes.then(|| Mutex::new(()));

        Ok(Self {
            path,
            config,
            write_lock,
            write_seq: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn lock(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    async fn read_document(&self) -> FavorResult<BTreeMap<String, i64>> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FavorError::io(&self.path, e))?;
        serde_json::from_slice(&data).map_err(|e| FavorError::corrupt(&self.path, e))
    }

    /// Replace the document through a temp file and rename, so readers see
    /// either the old or the new content.
    async fn write_document(&self, document: &BTreeMap<String, i64>) -> FavorResult<()> {
        let content =
            serde_json::to_vec(document).map_err(|e| FavorError::corrupt(&self.path, e))?;

        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let mut tmp_name = self.path.clone().into_os_string();
        tmp_name.push(format!(".{}.{}.tmp", std::process::id(), seq));
        let tmp_path = PathBuf::from(tmp_name);

        if let Err(e) = tokio::fs::write(&tmp_path, &content).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(FavorError::io(&tmp_path, e));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(FavorError::io(&self.path, e));
        }

        Ok(())
    }

    async fn write_entry(&self, user_id: &str, value: i64) -> FavorResult<()> {
        let mut document = self.read_document().await?;
        document.insert(user_id.to_string(), value);
        self.write_document(&document).await?;
        tracing::debug!(user_id, value, "Stored favorability");
        Ok(())
    }
}

#[async_trait::async_trait]
impl FavorStore for JsonFileStore {
    fn config(&self) -> &FavorConfig {
        &self.config
    }

    async fn get(&self, user_id: &str) -> FavorResult<i64> {
        let document = self.read_document().await?;
        Ok(document
            .get(user_id)
            .copied()
            .unwrap_or(self.config.init_value))
    }

    async fn set(&self, user_id: &str, value: i64) -> FavorResult<()> {
        let _guard = self.lock().await;
        self.write_entry(user_id, value).await
    }

    async fn adjust_detailed(&self, user_id: &str, delta: i64) -> FavorResult<Adjustment> {
        let _guard = self.lock().await;
        let previous = self.get(user_id).await?;
        let adjustment = Adjustment::compute(&self.config, user_id, previous, delta);
        self.write_entry(user_id, adjustment.current).await?;
        tracing::debug!(
            user_id,
            previous = adjustment.previous,
            requested = adjustment.requested,
            current = adjustment.current,
            "Adjusted favorability"
        );
        Ok(adjustment)
    }

    async fn snapshot(&self) -> FavorResult<BTreeMap<String, i64>> {
        self.read_document().await
    }
}
