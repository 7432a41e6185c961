//! Range-checked big-endian field encoders.

use crate::error::AfpError;

fn check(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), AfpError> {
    if value < min || value > max {
        return Err(AfpError::ValueOutOfRange { field, value, max });
    }
    Ok(())
}

pub(crate) fn u16_field(field: &'static str, value: i64) -> Result<[u8; 2], AfpError> {
    check(field, value, 0, 0xFFFF)?;
    Ok((value as u16).to_be_bytes())
}

pub(crate) fn i16_field(field: &'static str, value: i64) -> Result<[u8; 2], AfpError> {
    check(field, value, i64::from(i16::MIN), i64::from(i16::MAX))?;
    Ok((value as i16).to_be_bytes())
}

pub(crate) fn u24_field(field: &'static str, value: i64) -> Result<[u8; 3], AfpError> {
    check(field, value, 0, 0xFF_FFFF)?;
    let [_, a, b, c] = (value as u32).to_be_bytes();
    Ok([a, b, c])
}

/// Signed 3-byte field (two's complement), used for positions and offsets.
pub(crate) fn i24_field(field: &'static str, value: i64) -> Result<[u8; 3], AfpError> {
    check(field, value, -0x80_0000, 0x7F_FFFF)?;
    let [_, a, b, c] = (value as i32).to_be_bytes();
    Ok([a, b, c])
}
