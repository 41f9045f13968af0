//! Internal reader adapter for reading MPEG-1 video bitstreams.

use crate::error::{Error, Result};
use crate::traits::BitReadable;
use log::trace;
use std::collections::VecDeque;
use std::io::{ErrorKind as IoErrorKind, Read};

/// The 24-bit value shared by every start code.
const START_CODE_PREFIX_VALUE: u32 = 0x000001;

/// A saved bitstream position, measured in bits from the start of the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Checkpoint {
    bit_position: u64,
}

/// A bit cursor over an MPEG-1 video elementary stream.
///
/// Bytes are pulled from the source only once the bits already buffered have
/// been exhausted. Running out of source bytes is reported as
/// `Error::EndOfStream`; it is never papered over with zero bits.
///
/// The reader holds at most one checkpoint. While a checkpoint exists, bytes
/// that have been read past are retained so that `restore` can rewind to it.
pub struct MpegReader<R>
where
    R: Read,
{
    /// The data source to read bits from.
    source: R,

    /// Internal buffer of bitstream data that is not yet fully consumed.
    buffer: VecDeque<u8>,

    /// How many bits of the buffer have already been read.
    bits_read: usize,

    /// How many bytes have been dropped off the front of the buffer.
    bytes_released: u64,

    /// The single saved position for speculative parsing.
    checkpoint: Option<Checkpoint>,
}

impl<R> MpegReader<R>
where
    R: Read,
{
    /// Wrap a source file in a reader.
    pub fn from_source(source: R) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            bits_read: 0,
            bytes_released: 0,
            checkpoint: None,
        }
    }

    /// Fill the internal read buffer with a given number of bytes.
    fn buffer_bytes(&mut self, bytes_needed: usize) -> Result<()> {
        let mut byte = [0];
        for _ in 0..bytes_needed {
            match self.source.read_exact(&mut byte[..]) {
                Ok(()) => self.buffer.push_back(byte[0]),
                Err(e) if e.kind() == IoErrorKind::UnexpectedEof => {
                    return Err(Error::EndOfStream)
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Given a certain number of needed bits, return how many bytes would need
    /// to be buffered to read it.
    fn needed_bytes_for_bits(&self, bits_needed: u32) -> usize {
        let bits_available = (self.buffer.len() * 8).saturating_sub(self.bits_read);
        let bits_short = (bits_needed as usize).saturating_sub(bits_available);

        (bits_short + 7) / 8
    }

    /// Ensure that at least a certain number of additional bits can be read
    /// from the internal buffer.
    fn ensure_bits(&mut self, bits_needed: u32) -> Result<()> {
        let bytes = self.needed_bytes_for_bits(bits_needed);
        self.buffer_bytes(bytes)
    }

    /// The value of a buffered bit. `offset` counts from the buffer front.
    fn bit_at(&self, offset: usize) -> u8 {
        (self.buffer[offset / 8] >> (7 - offset % 8)) & 1
    }

    /// Drop fully consumed bytes, unless a checkpoint still needs them.
    fn release_consumed(&mut self) {
        if self.checkpoint.is_none() {
            let whole_bytes = self.bits_read / 8;
            self.buffer.drain(..whole_bytes);
            self.bytes_released += whole_bytes as u64;
            self.bits_read %= 8;
        }
    }

    /// How many bits have been consumed since the start of the source.
    pub fn bit_position(&self) -> u64 {
        self.bytes_released * 8 + self.bits_read as u64
    }

    /// Whether the next bit to be read starts a byte.
    pub fn is_byte_aligned(&self) -> bool {
        self.bits_read % 8 == 0
    }

    /// Copy an arbitrary number of bits from the stream out into a type,
    /// most significant bit first.
    ///
    /// This function does not remove bits from the buffer. Repeated calls to
    /// `peek_bits` return the same bits.
    ///
    /// The `bits_needed` must not exceed the width of the type. Any attempt to
    /// do so will result in an error.
    pub fn peek_bits<T: BitReadable>(&mut self, bits_needed: u32) -> Result<T> {
        if T::zero().checked_shl(bits_needed.saturating_sub(1)).is_none() {
            return Err(Error::InternalDecoderError);
        }

        self.ensure_bits(bits_needed)?;

        let mut accum = T::zero();
        for offset in self.bits_read..self.bits_read + bits_needed as usize {
            accum = accum.checked_shl(1).ok_or(Error::InternalDecoderError)?
                | T::from(self.bit_at(offset));
        }

        Ok(accum)
    }

    /// Skip forward a certain number of bits in the stream.
    ///
    /// If the source cannot supply that many bits, an error is returned and
    /// no skipping takes place.
    pub fn skip_bits(&mut self, bits_to_skip: u32) -> Result<()> {
        self.ensure_bits(bits_to_skip)?;

        self.bits_read += bits_to_skip as usize;
        self.release_consumed();

        Ok(())
    }

    /// Move an arbitrary number of bits from the stream out into a type.
    ///
    /// This operates like `peek_bits`, but the stream is advanced past the
    /// returned bits.
    pub fn read_bits<T: BitReadable>(&mut self, bits_needed: u32) -> Result<T> {
        let r = self.peek_bits(bits_needed)?;
        self.skip_bits(bits_needed)?;

        Ok(r)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<u8> {
        self.read_bits(1)
    }

    /// Fill `buf` with octets assembled from the next `8 * buf.len()` bits.
    ///
    /// The stream does not need to be byte aligned.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        for byte in buf.iter_mut() {
            *byte = 0;
            for _ in 0..8 {
                *byte = (*byte << 1) | self.read_bit()?;
            }
        }

        Ok(())
    }

    /// Compare upcoming bits against a literal string of `'0'` and `'1'`.
    ///
    /// Without `consume` the stream position never changes. With `consume`,
    /// bits are read one at a time and the comparison stops at the first
    /// mismatching bit, which leaves the stream advanced past every bit that
    /// was checked. Callers that need a non-destructive test of a consuming
    /// match should wrap it in `with_lookahead`.
    pub fn match_pattern(&mut self, pattern: &str, consume: bool) -> Result<bool> {
        if consume {
            for symbol in pattern.bytes() {
                let expected = pattern_bit(symbol)?;
                if self.read_bit()? != expected {
                    return Ok(false);
                }
            }

            return Ok(true);
        }

        self.ensure_bits(pattern.len() as u32)?;

        for (i, symbol) in pattern.bytes().enumerate() {
            if self.bit_at(self.bits_read + i) != pattern_bit(symbol)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Consume a mandatory literal, failing with a syntax violation naming
    /// `what` if the bitstream disagrees.
    pub fn expect_pattern(&mut self, pattern: &str, what: &'static str) -> Result<()> {
        if self.match_pattern(pattern, true)? {
            Ok(())
        } else {
            Err(Error::SyntaxViolation(what))
        }
    }

    /// Remember the current position so that `restore` can return to it.
    ///
    /// Only one position is held; saving again replaces it.
    pub fn save(&mut self) {
        self.checkpoint = Some(Checkpoint {
            bit_position: self.bit_position(),
        });
    }

    /// Rewind to the position remembered by the last `save`.
    ///
    /// The checkpoint is spent by this call.
    pub fn restore(&mut self) -> Result<()> {
        let checkpoint = self.checkpoint.take().ok_or(Error::InternalDecoderError)?;
        let offset = checkpoint
            .bit_position
            .checked_sub(self.bytes_released * 8)
            .ok_or(Error::InternalDecoderError)? as usize;

        if offset > self.buffer.len() * 8 {
            return Err(Error::InternalDecoderError);
        }

        self.bits_read = offset;
        self.release_consumed();

        Ok(())
    }

    /// Run some struct-parsing code in such a way that it will not advance the
    /// bitstream position, ever.
    ///
    /// The closure must not use `save` or `restore` itself.
    pub fn with_lookahead<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.save();

        let result = f(self);

        self.restore()?;

        result
    }

    /// Drop any partially read byte, then advance a byte at a time until the
    /// stream is positioned on a start code prefix.
    ///
    /// The start code itself is left unread.
    pub fn resync_to_start_code(&mut self) -> Result<()> {
        let partial_bits = self.bits_read % 8;
        if partial_bits != 0 {
            self.bits_read += 8 - partial_bits;
            self.release_consumed();
        }

        let mut skipped = 0;
        while self.peek_bits::<u32>(24)? != START_CODE_PREFIX_VALUE {
            self.skip_bits(8)?;
            skipped += 1;
        }

        if skipped > 0 {
            trace!("skipped {} bytes to reach the next start code", skipped);
        }

        Ok(())
    }
}

fn pattern_bit(symbol: u8) -> Result<u8> {
    match symbol {
        b'0' => Ok(0),
        b'1' => Ok(1),
        _ => Err(Error::InternalDecoderError),
    }
}
