// ABOUTME: Defines the ReadingKind enum naming the supported sensor reading kinds.
// ABOUTME: Each kind carries the status codes its sensors report.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when parsing an unrecognized reading kind.
#[derive(Debug, Error)]
#[error("unknown reading kind: {0}")]
pub struct KindParseError(String);

/// The supported sensor reading kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Temperature,
    Pressure,
}

impl ReadingKind {
    /// Status code meaning the sensor reported no problem.
    pub fn ok_status(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "OK",
            ReadingKind::Pressure => "GOOD",
        }
    }

    /// Status code reported when the sensor exceeded its upper bound.
    pub fn high_status(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "HIGH_TEMP",
            ReadingKind::Pressure => "HIGH_PRESSURE",
        }
    }

    /// Status code reported when the sensor fell below its lower bound.
    pub fn low_status(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "LOW_TEMP",
            ReadingKind::Pressure => "LOW_PRESSURE",
        }
    }

    /// The lowercase name used in URLs and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "temperature",
            ReadingKind::Pressure => "pressure",
        }
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(ReadingKind::Temperature),
            "pressure" => Ok(ReadingKind::Pressure),
            other => Err(KindParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(
            "temperature".parse::<ReadingKind>().unwrap(),
            ReadingKind::Temperature
        );
        assert_eq!(
            "pressure".parse::<ReadingKind>().unwrap(),
            ReadingKind::Pressure
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "humidity".parse::<ReadingKind>().unwrap_err();
        assert!(err.to_string().contains("humidity"));
    }

    #[test]
    fn display_round_trips() {
        for kind in [ReadingKind::Temperature, ReadingKind::Pressure] {
            assert_eq!(kind.to_string().parse::<ReadingKind>().unwrap(), kind);
        }
    }

    #[test]
    fn status_codes_per_kind() {
        assert_eq!(ReadingKind::Temperature.ok_status(), "OK");
        assert_eq!(ReadingKind::Temperature.high_status(), "HIGH_TEMP");
        assert_eq!(ReadingKind::Pressure.ok_status(), "GOOD");
        assert_eq!(ReadingKind::Pressure.low_status(), "LOW_PRESSURE");
    }
}
