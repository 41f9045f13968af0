//! Synthetic bitstream assembly for tests

/// Builds a byte stream out of bit strings and fixed-width fields.
#[derive(Default)]
pub struct BitstreamBuilder {
    bits: String,
}

impl BitstreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal bits. Spaces and underscores are ignored.
    pub fn bits(mut self, bits: &str) -> Self {
        self.bits
            .extend(bits.chars().filter(|c| *c == '0' || *c == '1'));
        self
    }

    /// Append the low `width` bits of `value`, most significant first.
    pub fn uint(mut self, value: u32, width: u32) -> Self {
        for shift in (0..width).rev() {
            self.bits.push(if (value >> shift) & 1 == 1 { '1' } else { '0' });
        }
        self
    }

    /// Pad with zero bits up to the next byte boundary.
    pub fn align(mut self) -> Self {
        while self.bits.len() % 8 != 0 {
            self.bits.push('0');
        }
        self
    }

    /// Append a byte-aligned start code with the given trailing byte.
    pub fn start_code(self, code: u8) -> Self {
        self.align().uint(0x000001, 24).uint(code as u32, 8)
    }

    pub fn build(self) -> Vec<u8> {
        let padded = self.align();

        padded
            .bits
            .as_bytes()
            .chunks(8)
            .map(|byte| byte.iter().fold(0, |acc, bit| (acc << 1) | (bit - b'0')))
            .collect()
    }
}
