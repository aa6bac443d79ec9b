// ABOUTME: Core library for sensord, containing the reading value type and sensor kinds.
// ABOUTME: This crate defines the shared data model used across all sensord components.

pub mod kind;
pub mod reading;

pub use kind::{KindParseError, ReadingKind};
pub use reading::{Reading, ReadingError};
