use crate::error::LogError;
use churnwatch_types::{FeatureRow, FEATURE_NAMES};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, instrument};

/// Append-only CSV log of the features seen at inference time.
///
/// Every append is committed with a single `write_all` on an `O_APPEND`
/// handle while holding the in-process lock, so concurrent callers never
/// interleave partial rows. The header is written together with the first
/// row when the file is missing or empty.
#[derive(Debug)]
pub struct ProductionLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ProductionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a handle and check that an existing log carries the expected header
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let log = Self::new(path);
        log.check_header()?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn check_header(&self) -> Result<(), LogError> {
        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => return Ok(()),
        };

        if is_empty {
            return Ok(());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let found = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        if found != FEATURE_NAMES {
            return Err(LogError::HeaderMismatch {
                path: self.path.clone(),
                expected: FEATURE_NAMES.map(String::from).to_vec(),
                found,
            });
        }

        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), LogError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| LogError::io(parent, e))
            }
            _ => Ok(()),
        }
    }

    /// Append one row to the log.
    ///
    /// On a failed write the file is truncated back to its previous length so
    /// a half-written row never survives.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn record(&self, row: &FeatureRow) -> Result<(), LogError> {
        let _guard = self.write_lock.lock().map_err(|_| LogError::LockPoisoned)?;

        self.ensure_parent()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LogError::io(&self.path, e))?;

        let previous_len = file
            .metadata()
            .map_err(|e| LogError::io(&self.path, e))?
            .len();

        let mut buffer = encode_row(row, previous_len == 0)?;

        // a hand-edited log may lack the final newline
        if previous_len > 0
            && !ends_with_newline(&self.path).map_err(|e| LogError::io(&self.path, e))?
        {
            buffer.insert(0, b'\n');
        }

        if let Err(e) = commit(&mut file, &buffer) {
            if let Err(rollback) = file.set_len(previous_len) {
                error!(
                    "Failed to roll back partial write to {}: {}",
                    self.path.display(),
                    rollback
                );
            }
            return Err(LogError::io(&self.path, e));
        }

        debug!("Appended {} bytes to production log", buffer.len());
        Ok(())
    }

    /// Read every logged row. A missing log reads as empty.
    pub fn read_rows(&self) -> Result<Vec<FeatureRow>, LogError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader
            .deserialize::<FeatureRow>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

fn encode_row(row: &FeatureRow, with_header: bool) -> Result<Vec<u8>, LogError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());

    writer.serialize(row)?;
    writer
        .into_inner()
        .map_err(|e| LogError::EncodeError(e.to_string()))
}

fn ends_with_newline(path: &Path) -> std::io::Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;

    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn commit(file: &mut File, buffer: &[u8]) -> std::io::Result<()> {
    file.write_all(buffer)?;
    file.flush()
}
