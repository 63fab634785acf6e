//! File-backed persistence adapters
//!
//! Reservations are stored as JSON Lines (one object per record); the
//! structured encoding removes the embedded-delimiter hazard of a flat
//! comma-separated format. Both the record store and the ID counter are
//! replaced atomically (write to a temp file, then rename) so a crash
//! mid-write leaves the previous state intact. The audit log is a plain
//! append-only file of JSON lines.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::{
    AuditRecord, AuditSink, DomainError, DomainResult, IdSequence, Reservation, ReservationStore,
};

fn storage_err(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("{context}: {e}"))
}

/// Write `contents` to a sibling temp file, then rename over `path`.
async fn write_atomic(path: &Path, contents: &[u8]) -> DomainResult<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| storage_err("writing temp file", e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| storage_err("replacing file", e))?;
    Ok(())
}

/// JSON Lines reservation store.
pub struct JsonlReservationStore {
    path: PathBuf,
}

impl JsonlReservationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReservationStore for JsonlReservationStore {
    async fn load(&self) -> DomainResult<Vec<Reservation>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            // First run: nothing persisted yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_err("reading reservation store", e)),
        };
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| storage_err("parsing reservation record", e))
            })
            .collect()
    }

    async fn flush(&self, records: &[Reservation]) -> DomainResult<()> {
        let mut contents = String::new();
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| storage_err("encoding reservation record", e))?;
            contents.push_str(&line);
            contents.push('\n');
        }
        write_atomic(&self.path, contents.as_bytes()).await
    }
}

/// File-backed monotonic ID sequence.
///
/// The incremented counter is persisted *before* the id is returned, so a
/// crash between steps can only skip an id, never reissue one.
pub struct FileIdSequence {
    path: PathBuf,
    current: Mutex<u64>,
}

impl FileIdSequence {
    /// Open the sequence, resuming from the persisted counter if present.
    pub async fn open(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();
        let current = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents
                .trim()
                .parse::<u64>()
                .map_err(|e| storage_err("parsing id counter", e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(storage_err("reading id counter", e)),
        };
        Ok(Self {
            path,
            current: Mutex::new(current),
        })
    }
}

#[async_trait]
impl IdSequence for FileIdSequence {
    async fn next_id(&self) -> DomainResult<String> {
        let mut current = self.current.lock().await;
        let next = *current + 1;
        write_atomic(&self.path, next.to_string().as_bytes()).await?;
        *current = next;
        Ok(next.to_string())
    }
}

/// Append-only settlement audit log, one JSON line per settlement.
pub struct FileAuditSink {
    path: PathBuf,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn append(&self, record: AuditRecord) -> DomainResult<()> {
        let mut line = serde_json::to_string(&record)
            .map_err(|e| storage_err("encoding audit record", e))?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| storage_err("opening audit log", e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| storage_err("appending audit record", e))?;
        file.flush()
            .await
            .map_err(|e| storage_err("flushing audit log", e))?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
