use crate::SerdeErr;

/// Reads bits back out of a buffer produced by a `BitWrite` implementation.
pub struct BitReader<'b> {
    buffer: &'b [u8],
    bit_index: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            bit_index: 0,
        }
    }

    /// Saturates at `u32::MAX` for buffers too large to count in a `u32`
    pub fn bits_remaining(&self) -> u32 {
        u32::try_from(self.buffer.len() * 8 - self.bit_index).unwrap_or(u32::MAX)
    }

    fn ensure(&self, bits: u32) -> Result<(), SerdeErr> {
        let remaining_bits = self.bits_remaining();
        if bits > remaining_bits {
            return Err(SerdeErr::UnexpectedEnd {
                requested_bits: bits,
                remaining_bits,
            });
        }
        Ok(())
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        self.ensure(1)?;
        let byte = self.buffer[self.bit_index / 8];
        let bit = (byte >> (self.bit_index % 8)) & 1 != 0;
        self.bit_index += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        self.ensure(8)?;
        if self.bit_index % 8 == 0 {
            let byte = self.buffer[self.bit_index / 8];
            self.bit_index += 8;
            return Ok(byte);
        }
        let mut output = 0u8;
        for i in 0..8 {
            if self.read_bit()? {
                output |= 1 << i;
            }
        }
        Ok(output)
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        self.ensure(N as u32 * 8)?;
        let mut output = [0u8; N];
        for byte in output.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(output)
    }

    /// Fails unless every byte of the buffer has been consumed.
    pub fn finish(self) -> Result<(), SerdeErr> {
        let consumed_bytes = self.bit_index.div_ceil(8);
        if consumed_bytes != self.buffer.len() {
            return Err(SerdeErr::LengthMismatch {
                expected_bytes: consumed_bytes,
                actual_bytes: self.buffer.len(),
            });
        }
        Ok(())
    }
}
