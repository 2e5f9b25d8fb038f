/// Failures decoding a single telegram.
///
/// These are deterministic functions of the input bytes; decoding the same buffer again will fail
/// in the same way.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{code} is not a valid {field} code")]
    InvalidEnumCode { field: &'static str, code: u8 },
    #[error("byte {offset} is out of range for a {len} byte telegram")]
    BufferBounds { offset: usize, len: usize },
    #[error("bit {bit} is out of range for a byte")]
    BitIndex { bit: u8 },
}
