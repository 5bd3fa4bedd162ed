//! Helper functions for AVL record decoding
//!
//! Big-endian field readers over a byte slice, plus the sign-extension
//! functions used to recover signed values from the fixed-width unsigned
//! wire representation. Readers return `None` when the slice is too short;
//! a short read is an expected outcome during frame recovery, not an error.

/// Read a big-endian u16 at `pos`, if two bytes remain.
pub fn read_u16(data: &[u8], pos: usize) -> Option<u16> {
    let bytes = data.get(pos..pos + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Read a big-endian u32 at `pos`, if four bytes remain.
pub fn read_u32(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a big-endian u64 at `pos`, if eight bytes remain.
pub fn read_u64(data: &[u8], pos: usize) -> Option<u64> {
    let bytes = data.get(pos..pos + 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

/// Read a big-endian unsigned integer of `width` bytes (1..=8) at `pos`.
pub fn read_uint(data: &[u8], pos: usize, width: usize) -> Option<u64> {
    let bytes = data.get(pos..pos + width)?;
    let mut value = 0u64;
    for &b in bytes {
        value = (value << 8) | b as u64;
    }
    Some(value)
}

/// Sign-extend an 8-bit value to i32
pub fn sign_extend_8bit(value: u8) -> i32 {
    value as i8 as i32
}

/// Sign-extend a 16-bit value to i32
pub fn sign_extend_16bit(value: u16) -> i32 {
    value as i16 as i32
}

/// Sign-extend a 32-bit value to i32
pub fn sign_extend_32bit(value: u32) -> i32 {
    value as i32
}
