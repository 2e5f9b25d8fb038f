//! Bit and bit-range access into telegram payloads.
//!
//! Bit 0 is the least significant bit of a byte. Byte offsets are relative to the start of the
//! payload handed in, which for VLD telegrams is the data right after the RORG byte.

use crate::error::DecodeError;

pub fn byte(bytes: &[u8], offset: usize) -> Result<u8, DecodeError> {
    bytes
        .get(offset)
        .copied()
        .ok_or(DecodeError::BufferBounds { offset, len: bytes.len() })
}

pub fn bit(bytes: &[u8], offset: usize, bit: u8) -> Result<bool, DecodeError> {
    let value = byte(bytes, offset)?;
    let shifted = value.checked_shr(u32::from(bit)).ok_or(DecodeError::BitIndex { bit })?;
    Ok(shifted & 1 == 1)
}

pub fn masked(bytes: &[u8], offset: usize, mask: u8) -> Result<u8, DecodeError> {
    Ok(byte(bytes, offset)? & mask)
}

/// `width` bits of the byte at `offset`, starting at bit `shift`.
pub fn bits(bytes: &[u8], offset: usize, shift: u8, width: u8) -> Result<u8, DecodeError> {
    let end = u16::from(shift) + u16::from(width);
    if width == 0 || end > 8 {
        return Err(DecodeError::BitIndex { bit: shift.saturating_add(width).saturating_sub(1) });
    }
    let mask = ((1u16 << width) - 1) as u8;
    Ok(byte(bytes, offset)? >> shift & mask)
}
