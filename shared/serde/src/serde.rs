use crate::{BitReader, BitWrite, SerdeErr};

/// A type that can be written to and read from a bit stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes value into outgoing buffer
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Parse value from incoming buffer
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    /// Return length of value in bits
    fn bit_length(&self) -> u32;
}

/// A type whose serialized length never varies
pub trait ConstBitLength {
    fn const_bit_length() -> u32;

    fn const_byte_length() -> usize {
        Self::const_bit_length().div_ceil(8) as usize
    }
}
