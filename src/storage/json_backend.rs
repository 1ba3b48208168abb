//! JSON file backend for whole-snapshot persistence.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::errors::LedgerResult;

use super::{SanitationReport, Snapshot, StorageBackend};

const SNAPSHOT_FILE: &str = "snapshot.json";
const TMP_SUFFIX: &str = "tmp";

/// Stores the snapshot as pretty JSON under a base directory, writing
/// through a tmp file and rename so a crashed save never truncates the
/// previous snapshot.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> LedgerResult<Self> {
        let root = root.unwrap_or_else(default_base_dir);
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> LedgerResult<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        let path = self.snapshot_path();
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn load(&self) -> LedgerResult<(Snapshot, SanitationReport)> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok((Snapshot::empty(), SanitationReport::default()));
        }
        let data = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&data)?;
        Ok(Snapshot::from_value(value))
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contribution_core")
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> LedgerResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
