//! AVL record decoding
//!
//! Decodes one record at a locator-confirmed offset: the fixed-width GPS
//! block in wire order, then the four width-partitioned IO element groups,
//! from which the accelerometer axes are extracted. Decoding never fails
//! with an error; a rejected candidate simply yields no record and a retry
//! offset one byte past the original candidate, so a scan always makes
//! forward progress without skipping a possibly valid nearby frame start.

use std::collections::HashMap;

use crate::conversion::convert_coordinate;
use crate::parser::helpers::{
    read_u16, read_u32, read_u64, read_uint, sign_extend_16bit, sign_extend_32bit,
    sign_extend_8bit,
};
use crate::parser::locate::{MAX_TS_MS, MIN_TS_MS};
use crate::types::{AvlRecord, AxisAccel};

/// IO element id carrying the X-axis accelerometer reading.
pub const IO_ID_ACCEL_X: u16 = 0x0011;
/// IO element id carrying the Y-axis accelerometer reading.
pub const IO_ID_ACCEL_Y: u16 = 0x0012;
/// IO element id carrying the Z-axis accelerometer reading.
pub const IO_ID_ACCEL_Z: u16 = 0x0013;

/// IO element value widths, in the order the wire format emits the groups.
const IO_GROUP_WIDTHS: [usize; 4] = [1, 2, 4, 8];

/// Highest plausible total-IO-element count; larger values mark the whole
/// candidate as a false positive.
const MAX_TOTAL_IO: u16 = 256;

/// Fewest bytes a record candidate may occupy: the GPS block plus the
/// event-id and total-count fields and the four group-count fields.
const MIN_RECORD_BYTES: usize = 32;

/// Outcome of one decode attempt: a possibly absent record plus the offset
/// where the caller should continue. Absence of a record at an offset is an
/// expected, common outcome during frame recovery, not an error.
#[derive(Debug, Clone, Copy)]
pub struct RecordOutcome {
    pub record: Option<AvlRecord>,
    pub next_offset: usize,
}

/// IO elements of a single record, keyed by id within each value width.
/// Lives only for the duration of one decode.
#[derive(Debug, Default)]
struct IoElementGroups {
    groups: HashMap<usize, HashMap<u16, u64>>,
}

impl IoElementGroups {
    fn insert(&mut self, width: usize, entries: HashMap<u16, u64>) {
        self.groups.insert(width, entries);
    }

    fn value(&self, width: usize, io_id: u16) -> Option<u64> {
        self.groups.get(&width)?.get(&io_id).copied()
    }
}

/// Decode one record starting at `ts_offset`.
///
/// Any structural violation (too few remaining bytes, timestamp outside the
/// plausibility window, implausible total-IO count) rejects the candidate
/// and reports `next_offset = ts_offset + 1`. A truncated IO group abandons
/// the remaining groups but keeps the record with the fields decoded so far;
/// axes that depend on an unreached group resolve to absent.
pub fn read_record(data: &[u8], ts_offset: usize) -> RecordOutcome {
    let reject = RecordOutcome {
        record: None,
        next_offset: ts_offset + 1,
    };

    if data.len().saturating_sub(ts_offset) < MIN_RECORD_BYTES {
        return reject;
    }
    let mut ptr = ts_offset;

    let timestamp_ms = match read_u64(data, ptr) {
        Some(ts) => ts,
        None => return reject,
    };
    if !(MIN_TS_MS..=MAX_TS_MS).contains(&timestamp_ms) {
        return reject;
    }
    ptr += 8;

    let priority = data[ptr];
    ptr += 1;

    let longitude = match read_u32(data, ptr) {
        Some(raw) => convert_coordinate(sign_extend_32bit(raw)),
        None => return reject,
    };
    ptr += 4;

    let latitude = match read_u32(data, ptr) {
        Some(raw) => convert_coordinate(sign_extend_32bit(raw)),
        None => return reject,
    };
    ptr += 4;

    let altitude = match read_u16(data, ptr) {
        Some(raw) => raw as i16,
        None => return reject,
    };
    ptr += 2;

    let angle = match read_u16(data, ptr) {
        Some(raw) => raw,
        None => return reject,
    };
    ptr += 2;

    let satellites = data[ptr];
    ptr += 1;

    let speed = match read_u16(data, ptr) {
        Some(raw) => raw,
        None => return reject,
    };
    ptr += 2;

    // Codec8 Extended layout: event id and total IO count, two bytes each.
    // The event id only advances the cursor; the total is a weak
    // plausibility gate and is not cross-checked against per-group counts.
    if data.len() - ptr < 4 {
        return reject;
    }
    let _event_id = read_u16(data, ptr);
    ptr += 2;
    let total_io = match read_u16(data, ptr) {
        Some(total) => total,
        None => return reject,
    };
    ptr += 2;
    if total_io > MAX_TOTAL_IO {
        return reject;
    }

    let mut groups = IoElementGroups::default();
    for &width in &IO_GROUP_WIDTHS {
        let count = match read_u16(data, ptr) {
            Some(count) => count,
            None => break,
        };
        ptr += 2;
        if count == 0 {
            continue;
        }
        let needed = count as usize * (2 + width);
        if data.len() - ptr < needed {
            // Truncated tail: abandon the remaining groups, keep the record.
            ptr = data.len();
            break;
        }
        let mut entries = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let io_id = match read_u16(data, ptr) {
                Some(id) => id,
                None => break,
            };
            ptr += 2;
            let value = match read_uint(data, ptr, width) {
                Some(value) => value,
                None => break,
            };
            ptr += width;
            entries.insert(io_id, value);
        }
        if !entries.is_empty() {
            groups.insert(width, entries);
        }
    }

    let accel = AxisAccel {
        x: accel_axis_value(&groups, IO_ID_ACCEL_X),
        y: accel_axis_value(&groups, IO_ID_ACCEL_Y),
        z: accel_axis_value(&groups, IO_ID_ACCEL_Z),
    };

    let record = AvlRecord {
        timestamp_ms,
        priority,
        longitude,
        latitude,
        altitude,
        angle,
        satellites,
        speed,
        accel,
    };

    RecordOutcome {
        record: Some(record),
        next_offset: ptr,
    }
}

/// Resolve one accelerometer axis, preferring the 2-byte group (signed
/// 16-bit) and falling back to the 1-byte group (signed 8-bit). Absent in
/// both groups means unknown, not zero.
fn accel_axis_value(groups: &IoElementGroups, io_id: u16) -> Option<i32> {
    if let Some(raw) = groups.value(2, io_id) {
        return Some(sign_extend_16bit(raw as u16));
    }
    groups
        .value(1, io_id)
        .map(|raw| sign_extend_8bit(raw as u8))
}
