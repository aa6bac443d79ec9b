// ABOUTME: Row codecs translating between a Reading and its positional flat-row fields.
// ABOUTME: One codec per reading kind; they differ only in field order and timestamp precision.

use chrono::NaiveDateTime;
use sensord_core::{Reading, ReadingError, ReadingKind};
use thiserror::Error;

use crate::row;

/// Every row carries the same seven fields, in a kind-specific order.
const FIELD_COUNT: usize = 7;

/// Errors raised when a row cannot be decoded or a reading cannot be encoded.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid data entry: expected 7 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid data entry: malformed timestamp: {0:?}")]
    Timestamp(String),

    #[error("invalid data entry: malformed number: {0:?}")]
    Number(String),

    #[error("invalid data entry: {0}")]
    Reading(#[from] ReadingError),

    #[error("cannot encode a {reading} reading with the {codec} codec")]
    KindMismatch {
        reading: ReadingKind,
        codec: ReadingKind,
    },
}

/// Translation between a reading and its flat comma-delimited row.
///
/// An implementation fixes the positional field order and the timestamp
/// precision for one reading kind; the store is generic over this capability
/// and never looks inside a row itself. Decoding an encoded reading yields
/// an equal reading, except that a kind with coarse timestamps loses the
/// finer precision.
pub trait RowCodec {
    /// The reading kind this codec understands.
    fn kind(&self) -> ReadingKind;

    /// Parse a timestamp string in this kind's format.
    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime, CodecError>;

    /// Format a timestamp at this kind's precision.
    fn format_timestamp(&self, timestamp: NaiveDateTime) -> String;

    /// Parse one row's fields into a validated reading.
    fn decode(&self, fields: &[String]) -> Result<Reading, CodecError>;

    /// Format a reading as one row line.
    fn encode(&self, reading: &Reading) -> Result<String, CodecError>;
}

fn expect_field_count(fields: &[String]) -> Result<(), CodecError> {
    if fields.len() != FIELD_COUNT {
        return Err(CodecError::FieldCount(fields.len()));
    }
    Ok(())
}

fn parse_number(value: &str) -> Result<f64, CodecError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CodecError::Number(value.to_string()))
}

fn parse_sequence(value: &str) -> Result<i64, CodecError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| CodecError::Number(value.to_string()))
}

fn check_kind(reading: &Reading, codec: ReadingKind) -> Result<(), CodecError> {
    if reading.kind() != codec {
        return Err(CodecError::KindMismatch {
            reading: reading.kind(),
            codec,
        });
    }
    Ok(())
}

/// Codec for temperature rows:
/// `[timestamp, sequence_num, sensor_model, min, avg, max, status]`
/// with microsecond timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureCodec;

impl TemperatureCodec {
    // Decoding accepts any sub-second fraction; encoding always writes six digits.
    const PARSE_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S%.f";
    const DISPLAY_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S%.6f";
}

impl RowCodec for TemperatureCodec {
    fn kind(&self) -> ReadingKind {
        ReadingKind::Temperature
    }

    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime, CodecError> {
        NaiveDateTime::parse_from_str(value, Self::PARSE_FORMAT)
            .map_err(|_| CodecError::Timestamp(value.to_string()))
    }

    fn format_timestamp(&self, timestamp: NaiveDateTime) -> String {
        timestamp.format(Self::DISPLAY_FORMAT).to_string()
    }

    fn decode(&self, fields: &[String]) -> Result<Reading, CodecError> {
        expect_field_count(fields)?;
        let reading = Reading::new(
            ReadingKind::Temperature,
            self.parse_timestamp(&fields[0])?,
            parse_sequence(&fields[1])?,
            fields[2].clone(),
            parse_number(&fields[3])?,
            parse_number(&fields[4])?,
            parse_number(&fields[5])?,
            fields[6].clone(),
        )?;
        Ok(reading)
    }

    fn encode(&self, reading: &Reading) -> Result<String, CodecError> {
        check_kind(reading, self.kind())?;
        let fields = vec![
            self.format_timestamp(reading.timestamp()),
            reading.sequence_num().to_string(),
            reading.sensor_model().to_string(),
            reading.min_value().to_string(),
            reading.avg_value().to_string(),
            reading.max_value().to_string(),
            reading.status().to_string(),
        ];
        Ok(row::join(&fields))
    }
}

/// Codec for pressure rows:
/// `[timestamp, sensor_model, sequence_num, min, avg, max, status]`
/// with minute-precision timestamps. Decoding an encoded reading drops any
/// sub-minute precision; that is a property of the format, not a bug.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureCodec;

impl PressureCodec {
    const FORMAT: &'static str = "%Y-%m-%d %H:%M";
}

impl RowCodec for PressureCodec {
    fn kind(&self) -> ReadingKind {
        ReadingKind::Pressure
    }

    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime, CodecError> {
        NaiveDateTime::parse_from_str(value, Self::FORMAT)
            .map_err(|_| CodecError::Timestamp(value.to_string()))
    }

    fn format_timestamp(&self, timestamp: NaiveDateTime) -> String {
        timestamp.format(Self::FORMAT).to_string()
    }

    fn decode(&self, fields: &[String]) -> Result<Reading, CodecError> {
        expect_field_count(fields)?;
        let reading = Reading::new(
            ReadingKind::Pressure,
            self.parse_timestamp(&fields[0])?,
            parse_sequence(&fields[2])?,
            fields[1].clone(),
            parse_number(&fields[3])?,
            parse_number(&fields[4])?,
            parse_number(&fields[5])?,
            fields[6].clone(),
        )?;
        Ok(reading)
    }

    fn encode(&self, reading: &Reading) -> Result<String, CodecError> {
        check_kind(reading, self.kind())?;
        let fields = vec![
            self.format_timestamp(reading.timestamp()),
            reading.sensor_model().to_string(),
            reading.sequence_num().to_string(),
            reading.min_value().to_string(),
            reading.avg_value().to_string(),
            reading.max_value().to_string(),
            reading.status().to_string(),
        ];
        Ok(row::join(&fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fields(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn temperature_decodes_row() {
        let codec = TemperatureCodec;
        let reading = codec
            .decode(&fields(&[
                "2018-09-23 19:56:01.345",
                "1",
                "ABC Sensor Temp M301A",
                "20.152",
                "21.367",
                "22.005",
                "OK",
            ]))
            .unwrap();

        assert_eq!(reading.kind(), ReadingKind::Temperature);
        assert_eq!(reading.sequence_num(), 1);
        assert_eq!(reading.sensor_model(), "ABC Sensor Temp M301A");
        assert_eq!(reading.min_value(), 20.152);
        assert_eq!(reading.status(), "OK");
        assert_eq!(
            reading.timestamp(),
            NaiveDate::from_ymd_opt(2018, 9, 23)
                .unwrap()
                .and_hms_micro_opt(19, 56, 1, 345_000)
                .unwrap()
        );
    }

    #[test]
    fn pressure_decodes_row_with_swapped_order() {
        let codec = PressureCodec;
        let reading = codec
            .decode(&fields(&[
                "2018-09-23 19:56",
                "ABC Sensor Pres M100",
                "1",
                "50.163",
                "51.435",
                "52.103",
                "GOOD",
            ]))
            .unwrap();

        assert_eq!(reading.kind(), ReadingKind::Pressure);
        assert_eq!(reading.sensor_model(), "ABC Sensor Pres M100");
        assert_eq!(reading.sequence_num(), 1);
        assert_eq!(reading.status(), "GOOD");
    }

    #[test]
    fn temperature_round_trip() {
        let codec = TemperatureCodec;
        let reading = Reading::new(
            ReadingKind::Temperature,
            NaiveDate::from_ymd_opt(2018, 9, 23)
                .unwrap()
                .and_hms_micro_opt(20, 0, 1, 453_000)
                .unwrap(),
            2,
            "ABC Sensor Temp M301A",
            100.0,
            100.0,
            100.0,
            "HIGH_TEMP",
        )
        .unwrap();

        let line = codec.encode(&reading).unwrap();
        let decoded = codec.decode(&row::split(&line)).unwrap();
        assert_eq!(decoded, reading);
    }

    #[test]
    fn pressure_round_trip_truncates_to_minute() {
        let codec = PressureCodec;
        let reading = Reading::new(
            ReadingKind::Pressure,
            NaiveDate::from_ymd_opt(2018, 9, 23)
                .unwrap()
                .and_hms_opt(19, 56, 42)
                .unwrap(),
            1,
            "ABC Sensor Pres M100",
            50.163,
            51.435,
            52.103,
            "GOOD",
        )
        .unwrap();

        let line = codec.encode(&reading).unwrap();
        let decoded = codec.decode(&row::split(&line)).unwrap();

        // Seconds are lost by the minute-precision format; all else survives.
        assert_eq!(
            decoded.timestamp(),
            NaiveDate::from_ymd_opt(2018, 9, 23)
                .unwrap()
                .and_hms_opt(19, 56, 0)
                .unwrap()
        );
        assert_eq!(decoded.sensor_model(), reading.sensor_model());
        assert_eq!(decoded.sequence_num(), reading.sequence_num());
        assert_eq!(decoded.min_value(), reading.min_value());
        assert_eq!(decoded.status(), reading.status());
    }

    #[test]
    fn model_with_embedded_comma_round_trips() {
        let codec = PressureCodec;
        let reading = Reading::new(
            ReadingKind::Pressure,
            NaiveDate::from_ymd_opt(2018, 9, 23)
                .unwrap()
                .and_hms_opt(19, 56, 0)
                .unwrap(),
            1,
            "Pres Sensor, rack 4",
            50.0,
            51.0,
            52.0,
            "GOOD",
        )
        .unwrap();

        let line = codec.encode(&reading).unwrap();
        let decoded = codec.decode(&row::split(&line)).unwrap();
        assert_eq!(decoded.sensor_model(), "Pres Sensor, rack 4");
    }

    #[test]
    fn decode_rejects_wrong_arity() {
        let err = TemperatureCodec
            .decode(&fields(&["2018-09-23 19:56:01.345", "1", "M301A"]))
            .unwrap_err();
        assert!(err.to_string().contains("invalid data entry"));
    }

    #[test]
    fn decode_rejects_bad_number() {
        let err = TemperatureCodec
            .decode(&fields(&[
                "2018-09-23 19:56:01.345",
                "1",
                "M301A",
                "not-a-number",
                "21.367",
                "22.005",
                "OK",
            ]))
            .unwrap_err();
        assert!(matches!(err, CodecError::Number(_)));
    }

    #[test]
    fn decode_rejects_bad_timestamp() {
        let err = PressureCodec
            .decode(&fields(&[
                "yesterday",
                "M100",
                "1",
                "50.0",
                "51.0",
                "52.0",
                "GOOD",
            ]))
            .unwrap_err();
        assert!(matches!(err, CodecError::Timestamp(_)));
    }

    #[test]
    fn decode_rejects_empty_status() {
        let err = PressureCodec
            .decode(&fields(&[
                "2018-09-23 19:56",
                "M100",
                "1",
                "50.0",
                "51.0",
                "52.0",
                "",
            ]))
            .unwrap_err();
        assert!(matches!(err, CodecError::Reading(_)));
    }

    #[test]
    fn encode_rejects_kind_mismatch() {
        let pressure = Reading::new(
            ReadingKind::Pressure,
            NaiveDate::from_ymd_opt(2018, 9, 23)
                .unwrap()
                .and_hms_opt(19, 56, 0)
                .unwrap(),
            1,
            "M100",
            50.0,
            51.0,
            52.0,
            "GOOD",
        )
        .unwrap();

        let err = TemperatureCodec.encode(&pressure).unwrap_err();
        assert!(matches!(err, CodecError::KindMismatch { .. }));
    }

    #[test]
    fn temperature_parse_accepts_whole_seconds() {
        let ts = TemperatureCodec
            .parse_timestamp("2018-09-23 20:00:01")
            .unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2018, 9, 23)
                .unwrap()
                .and_hms_opt(20, 0, 1)
                .unwrap()
        );
    }
}
