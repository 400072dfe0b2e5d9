//! Append-only match log
//!
//! Every recorded match becomes one immutable [`MatchRecord`]. The file
//! implementation writes JSON Lines, one record per line.

use crate::error::CampError;
use crate::types::{MatchId, MatchRecord};
use anyhow::Context;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Proof of an append, used to take it back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendReceipt {
    pub match_id: MatchId,
    /// Log length before the append (entries in memory, bytes on disk)
    pub position: u64,
}

/// Trait for match log operations
pub trait MatchLog {
    /// All records in append order
    fn load_matches(&self) -> crate::error::Result<Vec<MatchRecord>>;

    /// Append one record at the end of the log
    fn append_match(&mut self, record: &MatchRecord) -> crate::error::Result<AppendReceipt>;

    /// Undo the append described by `receipt`; must be the latest append
    fn revert_append(&mut self, receipt: AppendReceipt) -> crate::error::Result<()>;
}

/// In-memory match log
#[derive(Debug, Default)]
pub struct InMemoryMatchLog {
    records: Vec<MatchRecord>,
}

impl InMemoryMatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MatchLog for InMemoryMatchLog {
    fn load_matches(&self) -> crate::error::Result<Vec<MatchRecord>> {
        Ok(self.records.clone())
    }

    fn append_match(&mut self, record: &MatchRecord) -> crate::error::Result<AppendReceipt> {
        let position = self.records.len() as u64;
        self.records.push(record.clone());
        Ok(AppendReceipt {
            match_id: record.id,
            position,
        })
    }

    fn revert_append(&mut self, receipt: AppendReceipt) -> crate::error::Result<()> {
        let index = receipt.position as usize;
        match self.records.get(index) {
            Some(record) if record.id == receipt.match_id && index + 1 == self.records.len() => {
                self.records.truncate(index);
                Ok(())
            }
            _ => Err(CampError::Storage {
                message: format!("match {} is not the latest append", receipt.match_id),
            }
            .into()),
        }
    }
}

/// Match log stored as a JSON Lines file
#[derive(Debug, Clone)]
pub struct JsonLinesMatchLog {
    path: PathBuf,
}

impl JsonLinesMatchLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchLog for JsonLinesMatchLog {
    fn load_matches(&self) -> crate::error::Result<Vec<MatchRecord>> {
        if !self.path.exists() {
            debug!("Match log {} not found, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)
            .with_context(|| format!("Failed to open match log {}", self.path.display()))?;

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read match log {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: MatchRecord =
                serde_json::from_str(&line).map_err(|e| CampError::Storage {
                    message: format!(
                        "Malformed record on line {} of {}: {}",
                        index + 1,
                        self.path.display(),
                        e
                    ),
                })?;
            records.push(record);
        }

        debug!(
            "Loaded {} matches from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn append_match(&mut self, record: &MatchRecord) -> crate::error::Result<AppendReceipt> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open match log {}", self.path.display()))?;
        let position = file
            .metadata()
            .with_context(|| format!("Failed to stat match log {}", self.path.display()))?
            .len();

        write_or_rewind(&mut &file, &file, position, line.as_bytes())
            .with_context(|| format!("Failed to append to match log {}", self.path.display()))?;

        info!("Appended match {} to {}", record.id, self.path.display());
        Ok(AppendReceipt {
            match_id: record.id,
            position,
        })
    }

    fn revert_append(&mut self, receipt: AppendReceipt) -> crate::error::Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open match log {}", self.path.display()))?;
        file.set_len(receipt.position)
            .and_then(|_| file.sync_all())
            .with_context(|| format!("Failed to truncate match log {}", self.path.display()))?;

        warn!(
            "Reverted match {} from {}",
            receipt.match_id,
            self.path.display()
        );
        Ok(())
    }
}

/// Write `bytes` through `out` and sync `file`, cutting `file` back to
/// `position` if any step fails so no torn line is left behind
fn write_or_rewind<W: Write>(
    out: &mut W,
    file: &File,
    position: u64,
    bytes: &[u8],
) -> std::io::Result<()> {
    let result = out
        .write_all(bytes)
        .and_then(|_| out.flush())
        .and_then(|_| file.sync_all());
    if result.is_err() {
        if let Err(e) = file.set_len(position) {
            warn!("Could not cut match log back to {} bytes: {}", position, e);
        }
    }
    result
}
