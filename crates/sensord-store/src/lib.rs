// ABOUTME: Persistence layer for sensord, storing readings in flat comma-delimited files.
// ABOUTME: Provides the per-kind row codecs and the generic file-backed reading store.

pub mod codec;
pub mod row;
pub mod store;

pub use codec::{CodecError, PressureCodec, RowCodec, TemperatureCodec};
pub use store::{PressureStore, ReadingStore, StoreError, TemperatureStore};
