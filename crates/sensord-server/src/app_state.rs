// ABOUTME: Shared application state for the sensord HTTP server.
// ABOUTME: Holds the backing file path and access lock for each reading kind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sensord_core::ReadingKind;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One reading kind's backing file plus the lock serializing access to it.
///
/// Stores are rebuilt from the file on every request, so two mutating
/// requests would race read-modify-write on the same file without this.
/// Writers hold the write guard across the whole load-mutate-persist span;
/// readers share the read guard, so reads run concurrently with reads but
/// never with a write.
pub struct StoreSlot {
    path: PathBuf,
    lock: RwLock<()>,
}

impl StoreSlot {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: RwLock::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire shared access for a read-only operation.
    pub async fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().await
    }

    /// Acquire exclusive access for a mutating operation.
    pub async fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().await
    }
}

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    temperature: StoreSlot,
    pressure: StoreSlot,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create state with one backing file per reading kind under the given
    /// data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            temperature: StoreSlot::new(data_dir.join("temperature_readings.csv")),
            pressure: StoreSlot::new(data_dir.join("pressure_readings.csv")),
        }
    }

    /// The slot for a reading kind.
    pub fn slot(&self, kind: ReadingKind) -> &StoreSlot {
        match kind {
            ReadingKind::Temperature => &self.temperature,
            ReadingKind::Pressure => &self.pressure,
        }
    }
}
