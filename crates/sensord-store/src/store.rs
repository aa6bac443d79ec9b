// ABOUTME: The generic file-backed reading store: an ordered in-memory collection
// ABOUTME: mirrored to a flat file, appending on add and rewriting in full on update/delete.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use sensord_core::{Reading, ReadingKind};
use thiserror::Error;

use crate::codec::{CodecError, PressureCodec, RowCodec, TemperatureCodec};
use crate::row;

/// Errors that can occur during reading store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backing file path cannot be empty")]
    EmptyPath,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// A file-backed, ordered collection of readings for one sensor kind.
///
/// The whole backing file is decoded into memory at construction; reads are
/// served from memory and mutations are mirrored back to the file. Adds
/// append a single row; updates and deletes rewrite the file in full, since
/// a flat delimited file has no in-place update. The collection stays sorted
/// by sequence number ascending, with duplicate sequence numbers kept in
/// file order.
#[derive(Debug)]
pub struct ReadingStore<C: RowCodec> {
    path: PathBuf,
    codec: C,
    readings: Vec<Reading>,
}

/// Store over temperature rows.
pub type TemperatureStore = ReadingStore<TemperatureCodec>;

/// Store over pressure rows.
pub type PressureStore = ReadingStore<PressureCodec>;

impl<C: RowCodec> ReadingStore<C> {
    /// Open the store backed by the given file and decode every row into
    /// memory. Fails on an empty path and on the first row that does not
    /// decode; a failed open never yields a partially loaded store. Parent
    /// directories are created if needed and a missing file loads as an
    /// empty store.
    pub fn open(path: impl Into<PathBuf>, codec: C) -> Result<Self, StoreError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(StoreError::EmptyPath);
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let readings = Self::load(&path, &codec)?;
        Ok(Self {
            path,
            codec,
            readings,
        })
    }

    fn load(path: &Path, codec: &C) -> Result<Vec<Reading>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut readings = Vec::new();

        for line in reader.lines() {
            let line = line?;
            // Files written by other tooling may end lines with \r\n.
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let fields = row::split(line);
            readings.push(codec.decode(&fields)?);
        }

        // Stable sort: duplicate sequence numbers keep their file order.
        readings.sort_by_key(Reading::sequence_num);
        tracing::debug!(
            path = %path.display(),
            count = readings.len(),
            "loaded readings"
        );
        Ok(readings)
    }

    /// Path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The reading kind this store holds.
    pub fn kind(&self) -> ReadingKind {
        self.codec.kind()
    }

    /// Assign the next sequence number to the reading, append its encoded
    /// row to the backing file, and append it to the collection. The
    /// assigned number exceeds every sequence number already in the store,
    /// and the reading's own incoming one, by at least 1 — so the reading
    /// lands at the end of the ordered collection with no re-sort. Returns
    /// the assigned sequence number.
    pub fn add(&mut self, mut reading: Reading) -> Result<i64, StoreError> {
        // Bump up to the largest sequence number seen, then step past it.
        let mut seq = reading.sequence_num();
        for existing in &self.readings {
            if existing.sequence_num() > seq {
                seq = existing.sequence_num();
            }
        }
        reading.set_sequence_num(seq + 1);

        let line = self.codec.encode(&reading)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        file.sync_all()?;

        let assigned = reading.sequence_num();
        self.readings.push(reading);
        Ok(assigned)
    }

    /// Replace every reading whose sequence number matches, then rewrite
    /// the backing file. Returns the replacement count; 0 means not found.
    /// An empty store, or a reading of a kind this store does not hold,
    /// is rejected with 0 and the file is left untouched.
    pub fn update(&mut self, reading: Reading) -> Result<usize, StoreError> {
        if self.readings.is_empty() || reading.kind() != self.codec.kind() {
            return Ok(0);
        }

        let mut count = 0;
        for slot in &mut self.readings {
            if slot.sequence_num() == reading.sequence_num() {
                *slot = reading.clone();
                count += 1;
            }
        }
        self.rewrite()?;
        Ok(count)
    }

    /// Remove every reading whose sequence number matches, then rewrite
    /// the backing file. Returns the removal count; 0 means not found.
    pub fn delete(&mut self, seq_num: i64) -> Result<usize, StoreError> {
        let before = self.readings.len();
        self.readings.retain(|r| r.sequence_num() != seq_num);
        let count = before - self.readings.len();
        self.rewrite()?;
        Ok(count)
    }

    /// The last reading matching the sequence number, or None if absent.
    /// With duplicate sequence numbers the later entry wins.
    pub fn get(&self, seq_num: i64) -> Option<&Reading> {
        self.readings
            .iter()
            .rev()
            .find(|r| r.sequence_num() == seq_num)
    }

    /// Read-only view of the readings, ordered by sequence number ascending.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Rewrite the whole backing file from the in-memory collection using a
    /// temp file and atomic rename.
    fn rewrite(&self) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("csv.tmp");
        let mut tmp = File::create(&tmp_path)?;
        for reading in &self.readings {
            writeln!(tmp, "{}", self.codec.encode(reading)?)?;
        }
        tmp.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;

        // Fsync the parent directory so the rename metadata is durable.
        // Best-effort: the rename already succeeded and the data is consistent.
        if let Some(parent) = self.path.parent()
            && let Ok(dir) = File::open(parent)
        {
            let _ = dir.sync_all();
        }
        Ok(())
    }
}
