//! CSV output for generated tables.
//!
//! Each table is written to a temp file inside the output directory and only
//! renamed over the target once every table has been written and flushed.
//! Existing targets are moved aside first and put back if any rename fails, so
//! the directory holds either the whole new pair or the previous files.

use crate::generator::{AddressBookRecord, Dataset, FixtureTable, HeaderStyle, SalesOrderRecord};
use anyhow::Context;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// What was written for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub table: &'static str,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

/// What was written for a whole dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
}

/// Counts and hashes bytes on their way to the inner writer.
struct DigestWriter<W: Write> {
    inner: W,
    hasher: Sha256,
    bytes: u64,
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// A table fully written to a temp file, waiting to be renamed into place.
pub struct StagedTable {
    temp: NamedTempFile,
    target: PathBuf,
    report: FileReport,
}

impl StagedTable {
    /// Rename the temp file over the target.
    pub fn persist(self) -> anyhow::Result<FileReport> {
        self.temp
            .persist(&self.target)
            .map_err(|e| e.error)
            .with_context(|| format!("Cannot write output file: {}", self.target.display()))?;
        Ok(self.report)
    }
}

/// Writes one table as CSV: a header row, then one record per line.
pub struct TableWriter<T: FixtureTable> {
    writer: csv::Writer<DigestWriter<BufWriter<NamedTempFile>>>,
    target: PathBuf,
    rows: usize,
    _table: std::marker::PhantomData<T>,
}

impl<T: FixtureTable> TableWriter<T> {
    pub fn new(output_dir: &Path, style: HeaderStyle) -> anyhow::Result<Self> {
        let target = output_dir.join(T::file_name());
        let temp = NamedTempFile::new_in(output_dir).with_context(|| {
            format!("Cannot create temp file in: {}", output_dir.display())
        })?;
        let sink = DigestWriter {
            inner: BufWriter::with_capacity(WRITER_BUFFER_SIZE, temp),
            hasher: Sha256::new(),
            bytes: 0,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        writer.write_record(T::columns(style))?;

        Ok(Self {
            writer,
            target,
            rows: 0,
            _table: std::marker::PhantomData,
        })
    }

    pub fn write_row(&mut self, row: &T) -> anyhow::Result<()> {
        self.writer
            .serialize(row)
            .with_context(|| format!("Cannot serialize {} row {}", T::TABLE, self.rows + 1))?;
        self.rows += 1;
        Ok(())
    }

    /// Flush everything to disk without touching the target yet.
    pub fn finish(self) -> anyhow::Result<StagedTable> {
        let sink = self
            .writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Cannot flush {}: {}", T::TABLE, e.error()))?;
        let DigestWriter {
            inner,
            hasher,
            bytes,
        } = sink;
        let temp = inner.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;

        Ok(StagedTable {
            report: FileReport {
                table: T::TABLE,
                path: self.target.clone(),
                rows: self.rows,
                bytes,
                sha256: hex::encode(hasher.finalize()),
            },
            target: self.target,
            temp,
        })
    }
}

/// Stage one table into `output_dir`.
pub fn stage_table<T: FixtureTable>(
    output_dir: &Path,
    rows: &[T],
    style: HeaderStyle,
) -> anyhow::Result<StagedTable> {
    let mut writer = TableWriter::<T>::new(output_dir, style)?;
    for row in rows {
        writer.write_row(row)?;
    }
    writer.finish()
}

/// A previous output file moved aside while the new one is renamed in.
///
/// Dropping it deletes the saved copy.
struct Backup {
    target: PathBuf,
    saved: Option<TempPath>,
}

impl Backup {
    fn take(target: &Path, dir: &Path) -> anyhow::Result<Self> {
        if !target.exists() {
            return Ok(Self {
                target: target.to_path_buf(),
                saved: None,
            });
        }
        let saved = NamedTempFile::new_in(dir)
            .with_context(|| format!("Cannot create backup file in: {}", dir.display()))?
            .into_temp_path();
        fs::rename(target, &saved)
            .with_context(|| format!("Cannot move aside existing file: {}", target.display()))?;
        Ok(Self {
            target: target.to_path_buf(),
            saved: Some(saved),
        })
    }

    /// Put the previous file back, or remove the new one if there was none.
    fn restore(self) -> anyhow::Result<()> {
        match self.saved {
            Some(saved) => saved.persist(&self.target).map_err(|e| e.error)?,
            None if self.target.is_file() => fs::remove_file(&self.target)?,
            None => {}
        }
        Ok(())
    }
}

/// Undo every backup taken so far and return `err` with any restore failures attached.
fn roll_back(backups: Vec<Backup>, mut err: anyhow::Error) -> anyhow::Error {
    for backup in backups.into_iter().rev() {
        let target = backup.target.clone();
        if let Err(e) = backup.restore() {
            err = err.context(format!("Cannot restore {}: {:#}", target.display(), e));
        }
    }
    err
}

/// Write both tables of `data` into `output_dir`, creating it if needed.
///
/// Both files are staged before either is renamed into place; on failure the
/// previous files are restored.
pub fn write_dataset(
    output_dir: &Path,
    data: &Dataset,
    style: HeaderStyle,
) -> anyhow::Result<WriteReport> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory: {}", output_dir.display()))?;

    let staged = [
        stage_table::<AddressBookRecord>(output_dir, &data.address_book, style)?,
        stage_table::<SalesOrderRecord>(output_dir, &data.sales_orders, style)?,
    ];

    let mut backups = Vec::with_capacity(staged.len());
    for table in &staged {
        match Backup::take(&table.target, output_dir) {
            Ok(backup) => backups.push(backup),
            Err(e) => return Err(roll_back(backups, e)),
        }
    }

    let mut files = Vec::with_capacity(staged.len());
    for table in staged {
        match table.persist() {
            Ok(report) => files.push(report),
            Err(e) => return Err(roll_back(backups, e)),
        }
    }
    drop(backups);

    Ok(WriteReport {
        output_dir: output_dir.to_path_buf(),
        files,
    })
}
