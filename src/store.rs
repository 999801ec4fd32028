use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use crate::error::{BoardError, Result};
use crate::model::{HEADERS, MaintenanceRequest};

pub type Table = Vec<MaintenanceRequest>;

/// The board's backing CSV file. Every cycle reads and rewrites it whole.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

/// Exclusive lock on the sidecar `.lock` file; released on drop.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn write_table(path: &Path, table: &[MaintenanceRequest]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(HEADERS)?;
    for row in table {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

impl Store {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<LockGuard> {
        self.ensure_parent()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(sibling(&self.path, ".lock"))?;
        file.lock()?;
        Ok(LockGuard { file })
    }

    /// Reads the table, creating an empty file with the header when absent.
    pub fn load(&self) -> Result<Table> {
        if !self.path.exists() {
            self.save(&[])?;
            debug!(path = %self.path.display(), "created empty board file");
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut table = Vec::new();
        for result in rdr.deserialize() {
            table.push(result?);
        }
        debug!(path = %self.path.display(), rows = table.len(), "loaded board");
        Ok(table)
    }

    /// Overwrites the file with `table` via a temp file and rename.
    pub fn save(&self, table: &[MaintenanceRequest]) -> Result<()> {
        self.ensure_parent()?;
        let tmp = sibling(&self.path, ".tmp");
        let written = write_table(&tmp, table).and_then(|()| fs::rename(&tmp, &self.path).map_err(BoardError::from));
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written?;
        debug!(path = %self.path.display(), rows = table.len(), "saved board");
        Ok(())
    }

    /// Locked snapshot for read-only views.
    pub fn read(&self) -> Result<Table> {
        let _guard = self.lock()?;
        self.load()
    }

    /// One locked read-modify-write cycle. Nothing is written when `f` fails.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Table) -> Result<T>) -> Result<T> {
        let _guard = self.lock()?;
        let mut table = self.load()?;
        let out = f(&mut table)?;
        self.save(&table)?;
        Ok(out)
    }
}
