//! The query facade: a swappable snapshot shared by concurrent readers.
//!
//! Readers clone the current `Arc<Snapshot>` under a short read lock and then
//! work on it without any locking. A reload builds the replacement first and
//! only takes the write lock for the pointer swap, so a failed build leaves
//! the active snapshot in place and no reader ever sees a partial graph.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Local;
use tracing::{info, warn};

use crate::config::LoadOptions;
use crate::error::Result;
use crate::record::{default_export_file_name, ExportMetadata, StatsRecord, TermRecord};
use crate::snapshot::{BuildReport, Snapshot};

pub struct OntologyService {
    current: RwLock<Arc<Snapshot>>,
    options: LoadOptions,
}

impl OntologyService {
    /// Build the initial snapshot from a file.
    pub fn open(path: &Path, options: LoadOptions) -> Result<Self> {
        let snapshot = Snapshot::from_path(path, &options)?;
        Ok(Self::from_snapshot(snapshot, options))
    }

    pub fn from_snapshot(snapshot: Snapshot, options: LoadOptions) -> Self {
        log_report(snapshot.report());
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            options,
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// The active snapshot. Holding the `Arc` pins it across later reloads.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn reload_from_path(&self, path: &Path) -> Result<BuildReport> {
        self.install(Snapshot::from_path(path, &self.options))
    }

    pub fn reload_from_bytes(&self, bytes: &[u8]) -> Result<BuildReport> {
        self.install(Snapshot::from_bytes(bytes, &self.options))
    }

    fn install(&self, built: Result<Snapshot>) -> Result<BuildReport> {
        let snapshot = match built {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "reload rejected; keeping the active snapshot");
                return Err(e);
            }
        };
        log_report(snapshot.report());
        let report = snapshot.report().clone();
        let terms = snapshot.len();

        let fresh = Arc::new(snapshot);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        info!(terms, "reloaded ontology snapshot");
        Ok(report)
    }

    pub fn get_by_id(&self, id: &str) -> Result<TermRecord> {
        let snapshot = self.snapshot();
        let node = snapshot.term(id)?;
        Ok(snapshot.record(node))
    }

    /// Lazily walk every term in build order. The walk stays on the snapshot
    /// that was active when it started.
    pub fn list_all(&self) -> Terms {
        Terms::new(self.snapshot())
    }

    pub fn search(&self, query: &str) -> Result<Vec<TermRecord>> {
        let snapshot = self.snapshot();
        let hits = snapshot.search(query)?;
        Ok(hits.into_iter().map(|node| snapshot.record(node)).collect())
    }

    pub fn stats(&self) -> StatsRecord {
        self.snapshot().stats().clone()
    }

    pub fn children_of(&self, id: &str) -> Result<Vec<TermRecord>> {
        let snapshot = self.snapshot();
        let node = snapshot.term(id)?;
        Ok(snapshot
            .children(node)
            .map(|(child, _)| snapshot.record(child))
            .collect())
    }

    pub fn parents_of(&self, id: &str) -> Result<Vec<TermRecord>> {
        let snapshot = self.snapshot();
        let node = snapshot.term(id)?;
        Ok(snapshot
            .parents(node)
            .map(|(parent, _)| snapshot.record(parent))
            .collect())
    }

    /// Write the full export document to `path`.
    pub fn export(&self, path: &Path) -> Result<ExportMetadata> {
        let document = self.snapshot().export_document();
        document.write_to(path)?;
        info!(path = %path.display(), terms = document.metadata.total_terms, "exported terms");
        Ok(document.metadata)
    }

    /// Export into `dir` under a timestamped file name; returns the file path.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(default_export_file_name(Local::now()));
        self.export(&path)?;
        Ok(path)
    }
}

fn log_report(report: &BuildReport) {
    for warning in &report.warnings {
        warn!("{warning}");
    }
    if report.dropped_statements > 0 {
        info!(
            dropped = report.dropped_statements,
            "statements outside the term vocabulary were ignored"
        );
    }
}

/// Restartable lazy sequence of term records.
#[derive(Debug, Clone)]
pub struct Terms {
    snapshot: Arc<Snapshot>,
    next: usize,
}

impl Terms {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Self { snapshot, next: 0 }
    }

    /// Start over from the first term.
    pub fn rewind(&mut self) {
        self.next = 0;
    }
}

impl Iterator for Terms {
    type Item = TermRecord;

    fn next(&mut self) -> Option<TermRecord> {
        let node = self.snapshot.nodes().get(self.next)?;
        self.next += 1;
        Some(self.snapshot.record(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.snapshot.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Terms {}
