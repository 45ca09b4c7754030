//! Share inbox: statements handed to stmtx from elsewhere (a file manager "open with",
//! a mail client, another tool) are staged here until `stmtx inbox import` picks them up.
//!
//! Layout on disk:
//!   <inbox>/pending.json
//!   <inbox>/file-<id>-0.pdf
//!   <inbox>/file-<id>-1.pdf
//!
//! Only one share is pending at a time; staging a new one clears the old one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use stmtx_ingest::Document;

const PENDING_META: &str = "pending.json";

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("share did not include a PDF file")]
    Empty,

    #[error("pending share is {pending}, not {requested}")]
    Mismatch { pending: String, requested: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pending share metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> InboxError + '_ {
    move |source| InboxError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    /// Original file name, used for the output CSV
    pub name: String,
    pub size: u64,
    /// Staged copy inside the inbox
    pub path: PathBuf,
}

impl SharedFile {
    pub fn document(&self) -> Document {
        Document::named(&self.name, &self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingShare {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub files: Vec<SharedFile>,
}

#[derive(Debug, Clone)]
pub struct Inbox {
    dir: PathBuf,
}

impl Inbox {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(PENDING_META)
    }

    pub fn pending(&self) -> Result<Option<PendingShare>, InboxError> {
        let p = self.meta_path();
        if !p.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&p).map_err(io_err(&p))?;
        Ok(Some(serde_json::from_str(&s)?))
    }

    pub fn stage(&self, files: &[PathBuf]) -> Result<PendingShare, InboxError> {
        self.stage_at(files, Utc::now())
    }

    /// Copy the PDFs among `files` into the inbox as a new pending share.
    pub fn stage_at(&self, files: &[PathBuf], now: DateTime<Utc>) -> Result<PendingShare, InboxError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        self.clear()?;

        let pdfs: Vec<&PathBuf> = files
            .iter()
            .filter(|p| Document::from_path(p).is_pdf())
            .collect();
        if pdfs.is_empty() {
            return Err(InboxError::Empty);
        }

        let id = share_id(now);
        let mut staged = Vec::with_capacity(pdfs.len());
        for (index, src) in pdfs.into_iter().enumerate() {
            let name = src
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| format!("statement-{}.pdf", index + 1));
            let dest = self.dir.join(format!("file-{id}-{index}.pdf"));
            let size = fs::copy(src, &dest).map_err(io_err(src))?;
            debug!(name = %name, dest = %dest.display(), size, "staged shared file");
            staged.push(SharedFile { name, size, path: dest });
        }

        let share = PendingShare {
            id,
            created_at: now,
            files: staged,
        };
        let p = self.meta_path();
        let json = serde_json::to_string_pretty(&share)?;
        fs::write(&p, json).map_err(io_err(&p))?;
        info!(id = %share.id, files = share.files.len(), "share staged");
        Ok(share)
    }

    /// Release the pending share. `Ok(false)` when nothing was pending.
    pub fn consume(&self, id: Option<&str>) -> Result<bool, InboxError> {
        let Some(share) = self.pending()? else {
            return Ok(false);
        };
        if let Some(requested) = id {
            if requested != share.id {
                return Err(InboxError::Mismatch {
                    pending: share.id,
                    requested: requested.to_string(),
                });
            }
        }
        self.remove(&share)?;
        Ok(true)
    }

    fn clear(&self) -> Result<(), InboxError> {
        if let Some(share) = self.pending()? {
            debug!(id = %share.id, "clearing previous share");
            self.remove(&share)?;
        }
        Ok(())
    }

    fn remove(&self, share: &PendingShare) -> Result<(), InboxError> {
        for file in &share.files {
            match fs::remove_file(&file.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(io_err(&file.path)(e)),
            }
        }
        let p = self.meta_path();
        fs::remove_file(&p).map_err(io_err(&p))
    }
}

/// Epoch milliseconds in base 36, short and sortable enough for one pending share.
fn share_id(now: DateTime<Utc>) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = now.timestamp_millis().max(0) as u64;
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.iter().rev().collect()
}
