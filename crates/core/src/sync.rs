//! Upload, delete and restore
//!
//! Each operation walks its candidate set once and produces one
//! [`ItemOutcome`] per item. A failing item never stops the batch; only a
//! failed listing or a missing single-file source aborts the operation.
//! Outcomes are handed to an observer as they happen, so the caller can
//! print progress, and are also returned together in a [`SyncReport`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::ignore::IgnoreRules;
use crate::path::{
    Target, create_parent_dirs, ensure_local_root, normalize_key, to_local_path, to_remote_key,
};
use crate::traits::{ObjectStore, list_all};

/// Content type used when none can be guessed from the extension
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Why an item was not transferred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The key matched an ignore pattern
    Ignored { pattern: String },
    /// A zero-byte `prefix/` object that only marks a folder
    DirectoryMarker,
}

/// Result for a single item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Uploaded { bytes: u64, content_type: String },
    Downloaded { bytes: u64, path: PathBuf },
    Deleted,
    Skipped { reason: SkipReason },
    Failed { error: String },
}

/// A key and what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub key: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemOutcome {
    fn failed(key: impl Into<String>, error: impl ToString) -> Self {
        Self {
            key: key.into(),
            status: ItemStatus::Failed {
                error: error.to_string(),
            },
        }
    }

    fn skipped(key: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            key: key.into(),
            status: ItemStatus::Skipped { reason },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ItemStatus::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ItemStatus::Skipped { .. })
    }
}

/// Counts over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcomes of one operation, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub items: Vec<ItemOutcome>,
    /// Set when a whole-bucket operation found no objects
    pub empty_bucket: bool,
}

impl SyncReport {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in &self.items {
            if item.is_failed() {
                summary.failed += 1;
            } else if item.is_skipped() {
                summary.skipped += 1;
            } else {
                summary.succeeded += 1;
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.items.iter().any(ItemOutcome::is_failed)
    }

    fn record(&mut self, outcome: ItemOutcome, observer: &mut impl FnMut(&ItemOutcome)) {
        observer(&outcome);
        self.items.push(outcome);
    }
}

/// Content type for a local file, guessed from its extension
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}

/// Runs sync operations between one local root and one bucket
pub struct Syncer<'a> {
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    local_root: &'a Path,
    ignore: &'a IgnoreRules,
}

impl<'a> Syncer<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        bucket: &'a str,
        local_root: &'a Path,
        ignore: &'a IgnoreRules,
    ) -> Self {
        Self {
            store,
            bucket,
            local_root,
            ignore,
        }
    }

    /// Upload one file or every file under the local root
    ///
    /// A single target that does not exist locally is an
    /// [`Error::NotFound`]; nothing is sent in that case.
    pub async fn upload(
        &self,
        target: &Target,
        mut observer: impl FnMut(&ItemOutcome),
    ) -> Result<SyncReport> {
        ensure_local_root(self.local_root)?;
        let mut report = SyncReport::default();

        match target {
            Target::Key(key) => {
                let path = to_local_path(&normalize_key(key), self.local_root)?;
                if !path.is_file() {
                    return Err(Error::NotFound(format!(
                        "'{}' not found in local bucket folder",
                        path.display()
                    )));
                }
                let key = to_remote_key(&path, self.local_root)?;
                let outcome = self.upload_file(&path, key).await;
                report.record(outcome, &mut observer);
            }
            Target::All => {
                let walker = WalkDir::new(self.local_root)
                    .follow_links(false)
                    .sort_by_file_name();
                for entry in walker {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(e) => {
                            let key = e
                                .path()
                                .and_then(|p| to_remote_key(p, self.local_root).ok())
                                .unwrap_or_else(|| self.local_root.display().to_string());
                            report.record(ItemOutcome::failed(key, e), &mut observer);
                            continue;
                        }
                    };
                    // Symlinked files are uploaded with their target's content;
                    // symlinked directories are not descended into.
                    let is_file = if entry.path_is_symlink() {
                        entry.path().is_file()
                    } else {
                        entry.file_type().is_file()
                    };
                    if !is_file {
                        if entry.path_is_symlink() {
                            tracing::debug!(path = %entry.path().display(), "not following symlink");
                        }
                        continue;
                    }

                    let outcome = match to_remote_key(entry.path(), self.local_root) {
                        Ok(key) => self.upload_file(entry.path(), key).await,
                        Err(e) => ItemOutcome::failed(entry.path().display().to_string(), e),
                    };
                    report.record(outcome, &mut observer);
                }
            }
        }

        Ok(report)
    }

    async fn upload_file(&self, path: &Path, key: String) -> ItemOutcome {
        if let Some(pattern) = self.ignore.matched_by(&key) {
            tracing::debug!(key = %key, pattern, "ignored");
            return ItemOutcome::skipped(
                key,
                SkipReason::Ignored {
                    pattern: pattern.to_string(),
                },
            );
        }

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) => return ItemOutcome::failed(key, Error::Io(e)),
        };
        let bytes = data.len() as u64;
        let content_type = content_type_for(path);

        tracing::debug!(key = %key, bytes, content_type = %content_type, "put_object");
        match self
            .store
            .put_object(self.bucket, &key, data, &content_type)
            .await
        {
            Ok(()) => ItemOutcome {
                key,
                status: ItemStatus::Uploaded {
                    bytes,
                    content_type,
                },
            },
            Err(e) => ItemOutcome::failed(key, e),
        }
    }

    /// Delete one object or every object in the bucket
    ///
    /// Local files are never touched.
    pub async fn delete(
        &self,
        target: &Target,
        mut observer: impl FnMut(&ItemOutcome),
    ) -> Result<SyncReport> {
        let keys = match target {
            Target::Key(key) => vec![key.clone()],
            Target::All => self.listed_keys().await?,
        };

        let mut report = SyncReport {
            empty_bucket: target.is_all() && keys.is_empty(),
            ..Default::default()
        };

        for key in keys {
            tracing::debug!(key = %key, "delete_object");
            let outcome = match self.store.delete_object(self.bucket, &key).await {
                Ok(()) => ItemOutcome {
                    key,
                    status: ItemStatus::Deleted,
                },
                Err(e) => ItemOutcome::failed(key, e),
            };
            report.record(outcome, &mut observer);
        }

        Ok(report)
    }

    /// Download one object or every object into the local root
    ///
    /// Existing local files are overwritten.
    pub async fn restore(
        &self,
        target: &Target,
        mut observer: impl FnMut(&ItemOutcome),
    ) -> Result<SyncReport> {
        ensure_local_root(self.local_root)?;
        let keys = match target {
            Target::Key(key) => vec![key.clone()],
            Target::All => self.listed_keys().await?,
        };

        let mut report = SyncReport {
            empty_bucket: target.is_all() && keys.is_empty(),
            ..Default::default()
        };

        for key in keys {
            let outcome = self.restore_key(key).await;
            report.record(outcome, &mut observer);
        }

        Ok(report)
    }

    async fn restore_key(&self, key: String) -> ItemOutcome {
        if key.ends_with('/') {
            return ItemOutcome::skipped(key, SkipReason::DirectoryMarker);
        }

        let path = match to_local_path(&key, self.local_root) {
            Ok(path) => path,
            Err(e) => return ItemOutcome::failed(key, e),
        };

        tracing::debug!(key = %key, path = %path.display(), "get_object");
        let data = match self.store.get_object(self.bucket, &key).await {
            Ok(data) => data,
            Err(e) => return ItemOutcome::failed(key, e),
        };

        if let Err(e) = create_parent_dirs(&path) {
            return ItemOutcome::failed(key, e);
        }

        match tokio::fs::write(&path, &data).await {
            Ok(()) => ItemOutcome {
                key,
                status: ItemStatus::Downloaded {
                    bytes: data.len() as u64,
                    path,
                },
            },
            Err(e) => ItemOutcome::failed(key, Error::Io(e)),
        }
    }

    async fn listed_keys(&self) -> Result<Vec<String>> {
        let objects = list_all(self.store, self.bucket).await?;
        Ok(objects.into_iter().map(|o| o.key).collect())
    }
}
