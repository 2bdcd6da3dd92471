//! Per-file processing and the directory driver.
//!
//! `process` reads one file, rewrites it, and writes it back only when the
//! content changed. `run` walks a tree, isolates per-file failures, and
//! accumulates a `RunSummary`; `run_with_progress` also reports each file
//! as it goes.

use serde::Serialize;
use std::path::Path;

use super::rewrite::{rewrite, ContextCounts};
use super::rules::RuleSet;
use super::walk::{walk_files, WalkOptions};
use crate::error::{Error, Result};
use crate::utils::io;

/// Whether rewritten content is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    DryRun,
}

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub changes: usize,
    pub per_context: ContextCounts,
    pub written: bool,
}

/// Rewrite one file in place. Returns the number of pattern matches replaced.
///
/// Read, decode, and write failures are all reported as `fix.file_failed`.
pub fn process(rules: &RuleSet, path: &Path, mode: WriteMode) -> Result<Processed> {
    let display = path.display().to_string();

    let original = io::read_file(path, "read source file")
        .map_err(|e| Error::fix_file_failed(&display, e.detail_error(), Some("read".to_string())))?;

    let rewritten = rewrite(rules, &original);

    let written = if rewritten.content != original && mode == WriteMode::Write {
        io::write_file_atomic(path, &rewritten.content, "write source file").map_err(|e| {
            Error::fix_file_failed(&display, e.detail_error(), Some("write".to_string()))
        })?;
        true
    } else {
        false
    };

    Ok(Processed {
        changes: rewritten.changes,
        per_context: rewritten.per_context,
        written,
    })
}

/// Options for a full run.
#[derive(Debug, Clone)]
pub struct FixOptions {
    pub walk: WalkOptions,
    pub mode: WriteMode,
}

/// A file that had at least one replacement.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub file: String,
    pub changes: usize,
    pub per_context: ContextCounts,
    pub written: bool,
}

/// A file that could not be processed. The run continued past it.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Totals for one run over a directory tree.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: String,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_changed: usize,
    pub total_changes: usize,
    pub changed: Vec<FileOutcome>,
    pub failures: Vec<FileFailure>,
}

/// Per-file event emitted while a run is in progress.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    Changed(&'a FileOutcome),
    Failed(&'a FileFailure),
}

/// Walk `root` and process every candidate file, logging each changed or
/// failed file with `log_status!`.
///
/// Failures on individual files are recorded and counted as zero changes.
/// Only a directory listing failure aborts the run.
pub fn run(root: &Path, rules: &RuleSet, options: &FixOptions) -> Result<RunSummary> {
    run_with_progress(root, rules, options, |event| match event {
        Progress::Changed(outcome) => {
            log_status!("fix", "Fixed {} patterns in {}", outcome.changes, outcome.file);
        }
        Progress::Failed(failure) => {
            log_status!("fix", "Error processing {}: {}", failure.file, failure.error);
        }
    })
}

/// Like `run`, but hands each changed or failed file to `on_progress` as
/// soon as it has been processed.
pub fn run_with_progress<F>(
    root: &Path,
    rules: &RuleSet,
    options: &FixOptions,
    mut on_progress: F,
) -> Result<RunSummary>
where
    F: FnMut(Progress<'_>),
{
    let files = walk_files(root, &options.walk)?;
    log_status!("fix", "Scanning {} file(s) under {}", files.len(), root.display());

    let mut summary = RunSummary {
        root: root.display().to_string(),
        dry_run: options.mode == WriteMode::DryRun,
        files_scanned: files.len(),
        files_changed: 0,
        total_changes: 0,
        changed: Vec::new(),
        failures: Vec::new(),
    };

    for path in &files {
        let file = path.display().to_string();

        match process(rules, path, options.mode) {
            Ok(processed) if processed.changes > 0 => {
                let outcome = FileOutcome {
                    file,
                    changes: processed.changes,
                    per_context: processed.per_context,
                    written: processed.written,
                };
                on_progress(Progress::Changed(&outcome));
                summary.files_changed += 1;
                summary.total_changes += outcome.changes;
                summary.changed.push(outcome);
            }
            Ok(_) => {}
            Err(e) => {
                let failure = FileFailure {
                    file,
                    error: e.detail_error(),
                };
                on_progress(Progress::Failed(&failure));
                summary.failures.push(failure);
            }
        }
    }

    Ok(summary)
}
