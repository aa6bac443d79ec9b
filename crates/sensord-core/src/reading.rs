// ABOUTME: Defines the Reading struct representing a single validated sensor observation.
// ABOUTME: Validation happens at construction so no partially-valid reading ever exists.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::kind::ReadingKind;

/// Errors raised when constructing a reading from invalid field values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadingError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// Field names used in validation error messages.
const SENSOR_MODEL: &str = "sensor model";
const STATUS: &str = "status";

/// A single sensor observation: a timestamp, a store-assigned sequence
/// number, the originating sensor model, the min/avg/max values measured
/// over the sampling window, and a status code.
///
/// Fields are validated in [`Reading::new`] and exposed read-only. Only the
/// sequence number can change afterwards, since the store assigns the real
/// one when the reading is added.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    kind: ReadingKind,
    timestamp: NaiveDateTime,
    sequence_num: i64,
    sensor_model: String,
    min: f64,
    avg: f64,
    max: f64,
    status: String,
}

impl Reading {
    /// Create a validated reading. Fails if the sensor model or status is
    /// empty; no partially-valid reading is ever returned.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ReadingKind,
        timestamp: NaiveDateTime,
        sequence_num: i64,
        sensor_model: impl Into<String>,
        min: f64,
        avg: f64,
        max: f64,
        status: impl Into<String>,
    ) -> Result<Self, ReadingError> {
        let sensor_model = sensor_model.into();
        if sensor_model.is_empty() {
            return Err(ReadingError::EmptyField(SENSOR_MODEL));
        }
        let status = status.into();
        if status.is_empty() {
            return Err(ReadingError::EmptyField(STATUS));
        }

        Ok(Self {
            kind,
            timestamp,
            sequence_num,
            sensor_model,
            min,
            avg,
            max,
            status,
        })
    }

    /// The sensor kind this reading came from.
    pub fn kind(&self) -> ReadingKind {
        self.kind
    }

    /// When the sensor took the reading.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The store-assigned sequence number (0 until added to a store).
    pub fn sequence_num(&self) -> i64 {
        self.sequence_num
    }

    /// Reassign the sequence number. Only the store should call this.
    pub fn set_sequence_num(&mut self, sequence_num: i64) {
        self.sequence_num = sequence_num;
    }

    /// Identifier of the originating sensor.
    pub fn sensor_model(&self) -> &str {
        &self.sensor_model
    }

    /// Minimum value over the sampling window.
    pub fn min_value(&self) -> f64 {
        self.min
    }

    /// Average value over the sampling window.
    pub fn avg_value(&self) -> f64 {
        self.avg
    }

    /// Maximum value over the sampling window.
    pub fn max_value(&self) -> f64 {
        self.max
    }

    /// Derived spread between the maximum and minimum values.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// The sensor's status code for this reading.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// True when the status differs from this kind's OK code.
    pub fn is_error(&self) -> bool {
        self.status != self.kind.ok_status()
    }

    /// Human-readable description of an error reading, or None when the
    /// status is not one of the kind's known error codes.
    pub fn error_message(&self) -> Option<String> {
        let when = self.timestamp.format("%Y/%m/%d %H:%M");
        if self.status == self.kind.high_status() {
            Some(match self.kind {
                ReadingKind::Temperature => format!(
                    "High Temperature (100\u{b0}C) at {}, Sequence: {}",
                    when, self.sequence_num
                ),
                ReadingKind::Pressure => format!(
                    "High Pressure (100 kPa) at {}, Sequence: {}",
                    when, self.sequence_num
                ),
            })
        } else if self.status == self.kind.low_status() {
            Some(match self.kind {
                ReadingKind::Temperature => format!(
                    "Low Temperature (-50\u{b0}C) at {}, Sequence: {}",
                    when, self.sequence_num
                ),
                ReadingKind::Pressure => format!(
                    "Low Pressure (0 kPa) at {}, Sequence: {}",
                    when, self.sequence_num
                ),
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 9, 23)
            .unwrap()
            .and_hms_micro_opt(19, 56, 1, 345_000)
            .unwrap()
    }

    fn temp_reading(status: &str) -> Reading {
        Reading::new(
            ReadingKind::Temperature,
            ts(),
            1,
            "ABC Sensor Temp M301A",
            20.152,
            21.367,
            22.005,
            status,
        )
        .unwrap()
    }

    #[test]
    fn new_sets_all_fields() {
        let reading = temp_reading("OK");

        assert_eq!(reading.kind(), ReadingKind::Temperature);
        assert_eq!(reading.timestamp(), ts());
        assert_eq!(reading.sequence_num(), 1);
        assert_eq!(reading.sensor_model(), "ABC Sensor Temp M301A");
        assert_eq!(reading.min_value(), 20.152);
        assert_eq!(reading.avg_value(), 21.367);
        assert_eq!(reading.max_value(), 22.005);
        assert_eq!(reading.status(), "OK");
    }

    #[test]
    fn new_rejects_empty_model() {
        let err = Reading::new(
            ReadingKind::Temperature,
            ts(),
            1,
            "",
            20.0,
            21.0,
            22.0,
            "OK",
        )
        .unwrap_err();
        assert_eq!(err, ReadingError::EmptyField("sensor model"));
    }

    #[test]
    fn new_rejects_empty_status() {
        let err = Reading::new(
            ReadingKind::Pressure,
            ts(),
            1,
            "ABC Sensor Pres M100",
            50.0,
            51.0,
            52.0,
            "",
        )
        .unwrap_err();
        assert_eq!(err, ReadingError::EmptyField("status"));
    }

    #[test]
    fn range_is_max_minus_min() {
        let reading = temp_reading("OK");
        assert!((reading.range() - 1.853).abs() < 1e-9);
    }

    #[test]
    fn set_sequence_num_reassigns() {
        let mut reading = temp_reading("OK");
        reading.set_sequence_num(7);
        assert_eq!(reading.sequence_num(), 7);
    }

    #[test]
    fn ok_status_is_not_an_error() {
        assert!(!temp_reading("OK").is_error());
        assert!(temp_reading("OK").error_message().is_none());
    }

    #[test]
    fn non_ok_status_is_an_error() {
        assert!(temp_reading("HIGH_TEMP").is_error());
        assert!(temp_reading("LOW_TEMP").is_error());
        // An unknown status still counts as an error, just with no message.
        assert!(temp_reading("UPDATED").is_error());
        assert!(temp_reading("UPDATED").error_message().is_none());
    }

    #[test]
    fn error_message_names_the_condition() {
        let msg = temp_reading("HIGH_TEMP").error_message().unwrap();
        assert!(msg.contains("High Temperature"));
        assert!(msg.contains("2018/09/23 19:56"));
        assert!(msg.contains("Sequence: 1"));

        let low = Reading::new(
            ReadingKind::Pressure,
            ts(),
            3,
            "ABC Sensor Pres M100",
            0.0,
            0.0,
            0.0,
            "LOW_PRESSURE",
        )
        .unwrap();
        let msg = low.error_message().unwrap();
        assert!(msg.contains("Low Pressure"));
        assert!(msg.contains("Sequence: 3"));
    }
}
