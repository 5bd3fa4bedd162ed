//! Export functionality for decoded AVL records
//!
//! CSV output for the record log (column set matches the device log format
//! consumed by the reporting side) and optional JSON export behind the
//! `json` feature.

use crate::error::{AvlError, Result};
use crate::types::AvlRecord;
#[cfg(feature = "csv")]
use std::fs::OpenOptions;
#[cfg(feature = "csv")]
use std::io;
#[cfg(feature = "csv")]
use std::path::Path;

/// CSV column set, in output order.
pub const CSV_COLUMNS: [&str; 12] = [
    "date",
    "deviceTimestamp",
    "gps_lat",
    "gps_lon",
    "gps_altitude",
    "gps_angle",
    "gps_satellites",
    "gps_speedKph",
    "acc_x",
    "acc_y",
    "acc_z",
    "priority",
];

fn format_axis(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// One record as CSV field values, aligned with [`CSV_COLUMNS`].
/// Coordinates are rendered to 7 decimal places.
pub fn record_row(record: &AvlRecord) -> [String; 12] {
    [
        record.date(),
        record.iso_timestamp(),
        format!("{:.7}", record.latitude),
        format!("{:.7}", record.longitude),
        record.altitude.to_string(),
        record.angle.to_string(),
        record.satellites.to_string(),
        record.speed.to_string(),
        format_axis(record.accel.x),
        format_axis(record.accel.y),
        format_axis(record.accel.z),
        record.priority.to_string(),
    ]
}

/// Write records as CSV to `writer`, header included.
#[cfg(feature = "csv")]
pub fn write_records_csv<W: io::Write>(writer: W, records: &[AvlRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(CSV_COLUMNS)
        .map_err(|e| AvlError::Export(e.to_string()))?;
    for record in records {
        csv_writer
            .write_record(record_row(record))
            .map_err(|e| AvlError::Export(e.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| AvlError::Export(e.to_string()))?;
    Ok(())
}

/// Write records as CSV to a new file at `path`, replacing any existing file.
#[cfg(feature = "csv")]
pub fn export_records_csv(path: &Path, records: &[AvlRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_records_csv(file, records)
}

/// Append records to the CSV file at `path`, writing the header first when
/// the file is new or empty. Used by the collector for rolling log files.
#[cfg(feature = "csv")]
pub fn append_records_csv(path: &Path, records: &[AvlRecord]) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut csv_writer = csv::Writer::from_writer(file);
    if needs_header {
        csv_writer
            .write_record(CSV_COLUMNS)
            .map_err(|e| AvlError::Export(e.to_string()))?;
    }
    for record in records {
        csv_writer
            .write_record(record_row(record))
            .map_err(|e| AvlError::Export(e.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| AvlError::Export(e.to_string()))?;
    Ok(())
}

/// Serialize records as a JSON array with the same field names as the CSV
/// columns. Absent accelerometer axes serialize as `null`.
#[cfg(feature = "json")]
pub fn records_to_json(records: &[AvlRecord]) -> Result<String> {
    fn round7(value: f64) -> f64 {
        (value * 10_000_000.0).round() / 10_000_000.0
    }

    let rows: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            serde_json::json!({
                "date": record.date(),
                "deviceTimestamp": record.iso_timestamp(),
                "gps_lat": round7(record.latitude),
                "gps_lon": round7(record.longitude),
                "gps_altitude": record.altitude,
                "gps_angle": record.angle,
                "gps_satellites": record.satellites,
                "gps_speedKph": record.speed,
                "acc_x": record.accel.x,
                "acc_y": record.accel.y,
                "acc_z": record.accel.z,
                "priority": record.priority,
            })
        })
        .collect();

    serde_json::to_string_pretty(&rows).map_err(|e| AvlError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AvlRecord, AxisAccel};

    fn sample() -> AvlRecord {
        AvlRecord {
            timestamp_ms: 1_619_827_200_000,
            priority: 1,
            longitude: 14.4123456,
            latitude: -50.4987654,
            altitude: -120,
            angle: 359,
            satellites: 11,
            speed: 87,
            accel: AxisAccel {
                x: Some(-200),
                y: Some(35),
                z: None,
            },
        }
    }

    #[test]
    fn test_record_row_shape_and_formatting() {
        let row = record_row(&sample());
        assert_eq!(row.len(), CSV_COLUMNS.len());
        assert_eq!(row[0], "2021-05-01");
        assert_eq!(row[1], "2021-05-01T00:00:00Z");
        assert_eq!(row[2], "-50.4987654");
        assert_eq!(row[3], "14.4123456");
        assert_eq!(row[8], "-200");
        assert_eq!(row[10], ""); // absent axis stays empty, not zero
        assert_eq!(row[11], "1");
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_header_and_rows() {
        let mut buf = Vec::new();
        write_records_csv(&mut buf, &[sample(), sample()]).expect("csv write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,deviceTimestamp,gps_lat"));
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), CSV_COLUMNS.len());
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_export_null_axes() {
        let json = records_to_json(&[sample()]).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");
        let row = &parsed[0];
        assert_eq!(row["gps_lat"], serde_json::json!(-50.4987654));
        assert_eq!(row["acc_x"], serde_json::json!(-200));
        assert!(row["acc_z"].is_null());
        assert_eq!(row["deviceTimestamp"], "2021-05-01T00:00:00Z");
    }
}
