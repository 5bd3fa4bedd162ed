//! Integration tests for CSV output validation.

#![cfg(feature = "csv")]

mod common;

use avl_parser::export::{append_records_csv, export_records_csv, CSV_COLUMNS};
use avl_parser::parse_avl_bytes;
use common::{bare_record, encode_record};
use std::fs;

const TS: u64 = 1_619_827_200_000; // 2021-05-01T00:00:00Z

#[test]
fn test_csv_field_count_consistency() {
    let mut stream = bare_record(TS, 10);
    stream.extend_from_slice(&encode_record(
        TS + 60_000,
        1,
        500_000_000,
        -500_000_000,
        120,
        45,
        14,
        33,
        &[(2, 0x0011, 0xFF38), (1, 0x0013, 0x05)],
    ));
    let records = parse_avl_bytes(&stream);
    assert_eq!(records.len(), 2);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("records.csv");
    export_records_csv(&path, &records).expect("export");

    let content = fs::read_to_string(&path).expect("read csv");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);

    let header_fields = lines[0].split(',').count();
    assert_eq!(header_fields, CSV_COLUMNS.len());
    for (i, line) in lines.iter().enumerate().skip(1) {
        assert_eq!(
            line.split(',').count(),
            header_fields,
            "row {} field count mismatch: {}",
            i + 1,
            line
        );
    }
}

#[test]
fn test_csv_values_match_decoded_record() {
    let data = encode_record(
        TS,
        3,
        144_123_456,
        -504_987_654,
        -120,
        359,
        11,
        87,
        &[(2, 0x0011, 0xFF38)],
    );
    let records = parse_avl_bytes(&data);
    assert_eq!(records.len(), 1);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("one.csv");
    export_records_csv(&path, &records).expect("export");

    let content = fs::read_to_string(&path).expect("read csv");
    let row = content.lines().nth(1).expect("data row");
    let fields: Vec<&str> = row.split(',').collect();
    assert_eq!(fields[0], "2021-05-01");
    assert_eq!(fields[1], "2021-05-01T00:00:00Z");
    assert_eq!(fields[2], "-50.4987654"); // gps_lat
    assert_eq!(fields[3], "14.4123456"); // gps_lon
    assert_eq!(fields[4], "-120");
    assert_eq!(fields[5], "359");
    assert_eq!(fields[6], "11");
    assert_eq!(fields[7], "87");
    assert_eq!(fields[8], "-200"); // acc_x from 2-byte group
    assert_eq!(fields[9], ""); // absent axis
    assert_eq!(fields[10], ""); // absent axis
    assert_eq!(fields[11], "3");
}

#[test]
fn test_append_writes_header_exactly_once() {
    let records = parse_avl_bytes(&bare_record(TS, 10));
    assert_eq!(records.len(), 1);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rolling.csv");
    append_records_csv(&path, &records).expect("first append");
    append_records_csv(&path, &records).expect("second append");

    let content = fs::read_to_string(&path).expect("read csv");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    let header_count = lines.iter().filter(|l| l.starts_with("date,")).count();
    assert_eq!(header_count, 1);
}
