use chrono::{DateTime, SecondsFormat, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw accelerometer readings for the three axes. An axis whose IO element
/// was not present in the frame is `None`, which is distinct from a reading
/// of zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisAccel {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub z: Option<i32>,
}

/// One decoded vehicle position and motion sample.
///
/// Produced by the record decoder; the timestamp is always within the
/// protocol plausibility window (2015..2035 UTC).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AvlRecord {
    /// Milliseconds since the Unix epoch, UTC.
    pub timestamp_ms: u64,
    /// Packet priority class, 0..=3.
    pub priority: u8,
    /// Degrees, decoded from signed fixed-point (1e-7 degree units).
    pub longitude: f64,
    /// Degrees, decoded from signed fixed-point (1e-7 degree units).
    pub latitude: f64,
    /// Meters above sea level.
    pub altitude: i16,
    /// Heading in degrees.
    pub angle: u16,
    /// Satellites in view.
    pub satellites: u8,
    /// Speed in km/h.
    pub speed: u16,
    /// Raw triaxial accelerometer readings, where present.
    pub accel: AxisAccel,
}

impl AvlRecord {
    /// The record's instant as a UTC datetime.
    pub fn datetime(&self) -> DateTime<Utc> {
        // Timestamp is bounds-checked during decoding, so this is always
        // representable.
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_ms as i64)
            .unwrap_or_default()
    }

    /// ISO-8601 UTC timestamp with a `Z` suffix, e.g. `2021-05-01T00:00:00Z`.
    pub fn iso_timestamp(&self) -> String {
        self.datetime().to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Date-only projection of the timestamp, e.g. `2021-05-01`.
    pub fn date(&self) -> String {
        self.datetime().format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp_ms: u64) -> AvlRecord {
        AvlRecord {
            timestamp_ms,
            priority: 0,
            longitude: 14.5,
            latitude: 50.1,
            altitude: 300,
            angle: 180,
            satellites: 10,
            speed: 60,
            accel: AxisAccel::default(),
        }
    }

    #[test]
    fn test_iso_timestamp_uses_z_suffix() {
        let record = sample(1_619_827_200_000);
        assert_eq!(record.iso_timestamp(), "2021-05-01T00:00:00Z");
    }

    #[test]
    fn test_iso_timestamp_keeps_subseconds() {
        let record = sample(1_619_827_200_123);
        assert_eq!(record.iso_timestamp(), "2021-05-01T00:00:00.123Z");
    }

    #[test]
    fn test_date_projection() {
        let record = sample(1_619_870_400_000); // 2021-05-01T12:00:00Z
        assert_eq!(record.date(), "2021-05-01");
    }
}
