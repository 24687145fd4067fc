use thiserror::Error;

/// Errors raised while reading a serialized stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// Attempted to read past the end of the buffer
    #[error("Attempted to read {requested_bits} bits with only {remaining_bits} remaining in the buffer")]
    UnexpectedEnd {
        requested_bits: u32,
        remaining_bits: u32,
    },

    /// A boolean byte held something other than 0 or 1
    #[error("Invalid boolean byte {value}, expected 0 or 1")]
    InvalidBool { value: u8 },

    /// Unread bytes remained after a fixed-length value was decoded
    #[error("Expected {expected_bytes} bytes but the buffer holds {actual_bytes}")]
    LengthMismatch {
        expected_bytes: usize,
        actual_bytes: usize,
    },
}
