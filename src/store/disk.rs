//! Single-file durable cost store.
//!
//! Layout:
//! ```text
//! [HEADER][SLOT INDEX: rows*cols x u64 LE][RECORDS...]
//! ```
//! - HEADER is a bincode-encoded [`StoreHeader`].
//! - Each slot holds the absolute file offset of its record, or 0 if the
//!   pair has not been written. Record offsets are always past the index,
//!   so 0 is never a real offset.
//! - Records are a u64 LE payload length followed by a bincode-encoded
//!   [`Cost`] (packed BCD), appended in write order.
//!
//! The slot index is preallocated with `set_len`, which leaves it sparse on
//! filesystems that support holes. Only the handle and two offsets live in
//! memory.
//!
//! All file access goes through one mutex. A `get` holds it for one slot
//! read plus one exact-size record read and decodes after releasing it, so
//! concurrent readers still queue on the file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cost::Cost;
use crate::error::{Result, SupersequenceError};
use crate::store::slot_index;
use crate::traits::{CostStore, SuffixPair};

const MAGIC: [u8; 4] = *b"SSDP";
const FORMAT_VERSION: u32 = 1;
const SLOT_WIDTH: u64 = 8;
const LEN_WIDTH: u64 = 8;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StoreHeader {
    magic: [u8; 4],
    version: u32,
    rows: u64,
    cols: u64,
}

/// Cost store backed by one file at a caller-chosen path.
///
/// Reads go through a mutex so that `get(&self)` can be shared across
/// threads; there is still exactly one writer.
#[derive(Debug)]
pub struct DiskStore {
    path: PathBuf,
    file: Option<Mutex<File>>,
    rows: usize,
    cols: usize,
    index_start: u64,
    end: u64,
}

impl DiskStore {
    /// Create a fresh store file. Fails with `StaleCache` if anything
    /// already exists at `path`.
    pub fn create(path: impl AsRef<Path>, rows: usize, cols: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => SupersequenceError::StaleCache { path: path.clone() },
                _ => SupersequenceError::Storage(e),
            })?;

        let (index_start, end) = match write_layout(&mut file, rows, cols) {
            Ok(layout) => layout,
            Err(err) => {
                drop(file);
                if let Err(cleanup_err) = fs::remove_file(&path) {
                    warn!(
                        path = %path.display(),
                        error = %cleanup_err,
                        "could not remove partially created disk store"
                    );
                }
                return Err(err);
            }
        };
        debug!(path = %path.display(), rows, cols, index_bytes = end - index_start, "created disk store");

        Ok(Self {
            path,
            file: Some(Mutex::new(file)),
            rows,
            cols,
            index_start,
            end,
        })
    }

    /// Reopen a store previously written by [`DiskStore::create`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;
        let header: StoreHeader = bincode::deserialize_from(BufReader::new(&mut file))?;
        if header.magic != MAGIC {
            return Err(SupersequenceError::CorruptStore(format!(
                "bad magic {:?} in {}",
                header.magic,
                path.display()
            )));
        }
        if header.version != FORMAT_VERSION {
            return Err(SupersequenceError::CorruptStore(format!(
                "unsupported format version {}",
                header.version
            )));
        }
        let rows = usize::try_from(header.rows)
            .map_err(|e| SupersequenceError::CorruptStore(e.to_string()))?;
        let cols = usize::try_from(header.cols)
            .map_err(|e| SupersequenceError::CorruptStore(e.to_string()))?;
        let index_start = bincode::serialized_size(&header)?;
        let index_end = header
            .rows
            .checked_mul(header.cols)
            .and_then(|cells| cells.checked_mul(SLOT_WIDTH))
            .and_then(|len| len.checked_add(index_start))
            .ok_or_else(|| SupersequenceError::CorruptStore("slot index overflows".into()))?;
        let end = file.metadata()?.len();
        if end < index_end {
            return Err(SupersequenceError::CorruptStore(format!(
                "file is {end} bytes but the slot index needs {index_end}"
            )));
        }

        Ok(Self {
            path,
            file: Some(Mutex::new(file)),
            rows,
            cols,
            index_start,
            end,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written so far, index included.
    pub fn size_bytes(&self) -> u64 {
        self.end
    }

    fn slot_offset(&self, pair: SuffixPair) -> Result<u64> {
        let idx = slot_index(pair, self.rows, self.cols)?;
        Ok(self.index_start + idx as u64 * SLOT_WIDTH)
    }
}

/// Write the header and size the slot index. Returns `(index_start, end)`.
fn write_layout(file: &mut File, rows: usize, cols: usize) -> Result<(u64, u64)> {
    let header = StoreHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        rows: rows as u64,
        cols: cols as u64,
    };
    let header_bytes = bincode::serialize(&header)?;
    let index_start = header_bytes.len() as u64;
    let end = (rows as u64)
        .checked_mul(cols as u64)
        .and_then(|cells| cells.checked_mul(SLOT_WIDTH))
        .and_then(|len| len.checked_add(index_start))
        .ok_or_else(|| {
            SupersequenceError::CorruptStore(format!("{rows}x{cols} table cannot be indexed"))
        })?;

    file.write_all(&header_bytes)?;
    file.set_len(end)?;
    Ok((index_start, end))
}

fn read_record(file: &mut File, record_offset: u64, end: u64) -> Result<Vec<u8>> {
    let mut raw = [0u8; LEN_WIDTH as usize];
    file.seek(SeekFrom::Start(record_offset))?;
    file.read_exact(&mut raw)?;
    let len = u64::from_le_bytes(raw);
    let payload_start = record_offset + LEN_WIDTH;
    if len > end.saturating_sub(payload_start) {
        return Err(SupersequenceError::CorruptStore(format!(
            "record at {record_offset} claims {len} bytes past the end of the store"
        )));
    }
    let len = usize::try_from(len).map_err(|e| SupersequenceError::CorruptStore(e.to_string()))?;
    let mut payload = vec![0u8; len];
    file.read_exact(&mut payload)?;
    Ok(payload)
}

fn read_slot(file: &mut File, slot_offset: u64) -> Result<u64> {
    let mut raw = [0u8; SLOT_WIDTH as usize];
    file.seek(SeekFrom::Start(slot_offset))?;
    file.read_exact(&mut raw)?;
    Ok(u64::from_le_bytes(raw))
}

impl CostStore for DiskStore {
    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn put(&mut self, pair: SuffixPair, cost: Cost) -> Result<()> {
        let slot_offset = self.slot_offset(pair)?;
        let record_offset = self.end;
        let file = self
            .file
            .as_mut()
            .ok_or(SupersequenceError::Closed)?
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        if read_slot(file, slot_offset)? != 0 {
            return Err(SupersequenceError::DuplicateKey {
                i1: pair.i1,
                i2: pair.i2,
            });
        }

        let payload = bincode::serialize(&cost)?;
        let mut record = Vec::with_capacity(LEN_WIDTH as usize + payload.len());
        record.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        record.extend_from_slice(&payload);
        file.seek(SeekFrom::Start(record_offset))?;
        file.write_all(&record)?;
        file.seek(SeekFrom::Start(slot_offset))?;
        file.write_all(&record_offset.to_le_bytes())?;

        self.end = record_offset + record.len() as u64;
        Ok(())
    }

    fn get(&self, pair: SuffixPair) -> Result<Cost> {
        let slot_offset = self.slot_offset(pair)?;
        let mut file = self
            .file
            .as_ref()
            .ok_or(SupersequenceError::Closed)?
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let record_offset = read_slot(&mut file, slot_offset)?;
        if record_offset == 0 {
            return Err(SupersequenceError::MissingKey {
                i1: pair.i1,
                i2: pair.i2,
            });
        }
        let payload = read_record(&mut file, record_offset, self.end)?;
        drop(file);

        Ok(bincode::deserialize(&payload)?)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            let file = file.into_inner().unwrap_or_else(PoisonError::into_inner);
            file.sync_data()?;
            debug!(path = %self.path.display(), bytes = self.end, "closed disk store");
        }
        Ok(())
    }

    fn destroy(mut self) -> Result<()> {
        let closed = self.close();
        let removed = match fs::remove_file(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        };
        closed?;
        removed?;
        debug!(path = %self.path.display(), "removed disk store");
        Ok(())
    }
}
