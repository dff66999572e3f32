//! Dataset stores — flat JSON files for the knowledge base and the
//! interaction log.
//!
//! Reads are tolerant: a missing file, a leading BOM, or malformed JSON
//! all yield an empty collection (the curator owns file integrity, this
//! core must keep serving). Writes are pretty-printed with 2-space
//! indentation so the files stay hand-editable, and land via temp file +
//! rename so a half-written file is never observable.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use sd_protocol::{InteractionRecord, KnowledgeEntry};

use crate::error::{StoreError, StoreResult};

/// Parse a dataset array, stripping a UTF-8 BOM if present. Parse failure
/// is logged and treated as empty, never propagated.
fn parse_dataset<T: DeserializeOwned>(raw: &str, path: &Path) -> Vec<T> {
    let trimmed = raw.trim_start_matches('\u{feff}');
    if trimmed.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(trimmed) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "dataset unreadable, treating as empty");
            Vec::new()
        }
    }
}

async fn read_dataset<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => parse_dataset(&raw, path),
        Err(_) => Vec::new(),
    }
}

/// `logs.json` → `logs.json<suffix>`, in the same directory.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

enum KnowledgeBackend {
    File(PathBuf),
    /// In-memory entries, for tests and sample data.
    Fixed(Vec<KnowledgeEntry>),
}

/// Read-only access to the knowledge dataset (`faq.json`).
pub struct KnowledgeStore {
    backend: KnowledgeBackend,
}

impl KnowledgeStore {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: KnowledgeBackend::File(path.into()),
        }
    }

    pub fn fixed(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            backend: KnowledgeBackend::Fixed(entries),
        }
    }

    /// Load the full dataset. Re-reads the file on every call so curator
    /// edits are picked up without a restart.
    pub async fn load(&self) -> Vec<KnowledgeEntry> {
        match &self.backend {
            KnowledgeBackend::File(path) => read_dataset(path).await,
            KnowledgeBackend::Fixed(entries) => entries.clone(),
        }
    }
}

/// Append-only interaction log (`logs.json`).
///
/// Appends are read-modify-write of the whole file, guarded twice: the
/// internal mutex serializes tasks in this process, and an advisory lock
/// on a sidecar file serializes against the other process sharing the log
/// (the gateway's local fallback and the spawned tool provider both
/// append to the same file).
pub struct InteractionLog {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl InteractionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    pub async fn read_all(&self) -> Vec<InteractionRecord> {
        read_dataset(&self.path).await
    }

    /// Append one record. No dedup, no uniqueness constraint; the record
    /// is written exactly as the caller produced it.
    pub async fn append(&self, record: InteractionRecord) -> StoreResult<()> {
        let _guard = self.append_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_under_lock(&path, record))
            .await
            .map_err(|e| StoreError::Io(io::Error::other(e)))?
    }
}

/// The actual append, on the blocking pool: flock, read, rewrite, rename.
///
/// The advisory lock lives on a sidecar (`logs.json.lock`) rather than
/// the log itself: the final rename swaps the log's inode, and a lock
/// taken on a swapped-out inode excludes nobody. The rename is what keeps
/// a writer killed mid-rewrite from truncating the log.
fn append_under_lock(path: &Path, record: InteractionRecord) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let lock_file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(sibling(path, ".lock"))?;
    lock_file.lock_exclusive()?;

    let mut records: Vec<InteractionRecord> = match std::fs::read_to_string(path) {
        Ok(raw) => parse_dataset(&raw, path),
        Err(_) => Vec::new(),
    };
    records.push(record);
    let json = serde_json::to_string_pretty(&records)?;

    let tmp = sibling(path, ".tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    // The lock releases when lock_file drops.
    Ok(())
}
