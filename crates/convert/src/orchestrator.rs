//! Batch orchestrator that enumerates work items and drives each one
//! through the guard, the conversion capability, and the final write.

use crate::error::{ConvertError, Result};
use crate::guard::{assert_absent, assert_exists, ensure_directory};
use crate::invoker::{ConversionInvoker, Converter};
use crate::paths::{infer_target, is_test_file};
use crate::report::BatchReport;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// One source/target pair queued for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl WorkItem {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Pairs `source` with its inferred target.
    pub fn inferred(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let target = infer_target(&source);
        Self { source, target }
    }
}

/// How a run treats its source argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Exactly one item; any failure ends the run
    SingleFile,
    /// Every matching file below a directory; failures are isolated per item
    Directory,
}

impl RunMode {
    pub fn for_source(source: &Path) -> Self {
        if source.is_dir() {
            Self::Directory
        } else {
            Self::SingleFile
        }
    }
}

/// Progress and error channels for a run.
///
/// Progress goes to `out`, one line per item; failures go to `err`.
pub struct Console<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Console<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn progress(&mut self, item: &WorkItem) {
        let _ = writeln!(
            self.out,
            "Converting {} to {}",
            item.source.display(),
            item.target.display()
        );
    }

    pub fn failure(&mut self, error: &ConvertError) {
        let _ = writeln!(self.err, "ERROR: Failed to convert: {}", error);
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Lists every convertible file below `root`, sorted by path.
///
/// Hidden files and directories below the root are skipped and symlinks are
/// not followed.
pub fn discover_work_items(root: &Path) -> Vec<WorkItem> {
    let mut items = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_test_file(entry.path()) {
            items.push(WorkItem::inferred(entry.into_path()));
        }
    }
    items
}

/// Creates `path` and writes `contents`, refusing to replace an existing file.
fn write_new_file(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => ConvertError::TargetAlreadyExists {
                path: path.to_path_buf(),
            },
            _ => ConvertError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
    if let Err(source) = file.write_all(contents.as_bytes()) {
        drop(file);
        // We created it, so removing it cannot clobber user content.
        let _ = fs::remove_file(path);
        return Err(ConvertError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Runs conversions one item at a time with a fixed configuration.
pub struct BatchOrchestrator<C: Converter> {
    invoker: ConversionInvoker<C>,
}

impl<C: Converter> BatchOrchestrator<C> {
    pub fn new(invoker: ConversionInvoker<C>) -> Self {
        Self { invoker }
    }

    /// Converts `source`, choosing the mode from what it names.
    ///
    /// Directory runs always return `Ok`; inspect the report for per-item
    /// failures. Single-file runs return the item's error.
    pub fn run<O: Write, E: Write>(
        &self,
        source: &Path,
        target: Option<&Path>,
        console: &mut Console<O, E>,
    ) -> Result<BatchReport> {
        match RunMode::for_source(source) {
            RunMode::Directory => {
                if let Some(target) = target {
                    tracing::warn!(
                        target_arg = %target.display(),
                        "Ignoring explicit target for a directory source"
                    );
                }
                Ok(self.run_directory(source, console))
            }
            RunMode::SingleFile => {
                let item = match target {
                    Some(target) => WorkItem::new(source, target),
                    None => WorkItem::inferred(source),
                };
                self.run_single(item, console)
            }
        }
    }

    /// Converts one item; a failure is reported and returned.
    pub fn run_single<O: Write, E: Write>(
        &self,
        item: WorkItem,
        console: &mut Console<O, E>,
    ) -> Result<BatchReport> {
        if let Err(error) = self.convert_item(&item, console) {
            console.failure(&error);
            return Err(error);
        }
        let mut report = BatchReport::new();
        report.record_success(item);
        Ok(report)
    }

    /// Converts every test file below `root`.
    pub fn run_directory<O: Write, E: Write>(
        &self,
        root: &Path,
        console: &mut Console<O, E>,
    ) -> BatchReport {
        let items = discover_work_items(root);
        tracing::debug!(
            root = %root.display(),
            count = items.len(),
            "Discovered test files"
        );
        self.run_items(items, console)
    }

    /// Converts each item in order. A failed item is reported and recorded;
    /// the remaining items still run.
    pub fn run_items<O: Write, E: Write>(
        &self,
        items: impl IntoIterator<Item = WorkItem>,
        console: &mut Console<O, E>,
    ) -> BatchReport {
        let mut report = BatchReport::new();
        for item in items {
            match self.convert_item(&item, console) {
                Ok(()) => report.record_success(item),
                Err(error) => {
                    console.failure(&error);
                    tracing::warn!(
                        source = %item.source.display(),
                        kind = error.kind(),
                        "Conversion failed, continuing with remaining files"
                    );
                    report.record_failure(item, error);
                }
            }
        }
        tracing::info!(
            converter = self.invoker.converter_name(),
            "{}",
            report.format_summary()
        );
        report
    }

    /// Processes a single item: announce, check, create directory, convert,
    /// write. Nothing is written unless every earlier step succeeded.
    pub fn convert_item<O: Write, E: Write>(
        &self,
        item: &WorkItem,
        console: &mut Console<O, E>,
    ) -> Result<()> {
        console.progress(item);
        assert_exists(&item.source)?;
        assert_absent(&item.target)?;
        ensure_directory(&item.target)?;

        let text = fs::read_to_string(&item.source).map_err(|source| ConvertError::Io {
            path: item.source.clone(),
            source,
        })?;
        let converted = self.invoker.convert(&text, &item.source)?;
        write_new_file(&item.target, &converted)?;

        tracing::debug!(
            source = %item.source.display(),
            target = %item.target.display(),
            bytes = converted.len(),
            "Wrote converted file"
        );
        Ok(())
    }
}
