//! Slice header

use crate::error::{Error, Result};
use crate::parser::picture::decode_extra_information;
use crate::parser::reader::MpegReader;
use crate::types::{Slice, SLICE_END_SENTINEL, SLICE_START_CODES, START_CODE_PREFIX};
use std::io::Read;

/// Decode a slice header from the bitstream referenced by `reader`.
///
/// The reader must be positioned on a slice start code, and is left on the
/// slice's first macroblock.
pub fn decode_slice_header<R>(reader: &mut MpegReader<R>) -> Result<Slice>
where
    R: Read,
{
    reader.expect_pattern(START_CODE_PREFIX, "slice start code")?;

    let vertical_position: u8 = reader.read_bits(8)?;
    if !SLICE_START_CODES.contains(&vertical_position) {
        return Err(Error::SyntaxViolation("slice start code"));
    }

    let quantizer_scale = reader.read_bits(5)?;
    let extra_information = decode_extra_information(reader)?;

    Ok(Slice {
        vertical_position,
        quantizer_scale,
        extra_information,
    })
}

/// Determine whether the macroblocks of the current slice have run out.
///
/// The reader does not move.
pub fn is_slice_end<R>(reader: &mut MpegReader<R>) -> Result<bool>
where
    R: Read,
{
    reader.match_pattern(SLICE_END_SENTINEL, false)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::parser::reader::MpegReader;
    use crate::parser::slice::{decode_slice_header, is_slice_end};
    use crate::test_util::BitstreamBuilder;

    #[test]
    fn slice_header() {
        let data = BitstreamBuilder::new()
            .start_code(0x03)
            .uint(17, 5)
            .bits("1")
            .uint(0x77, 8)
            .bits("0 1")
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        let slice = decode_slice_header(&mut reader).unwrap();

        assert_eq!(3, slice.vertical_position);
        assert_eq!(17, slice.quantizer_scale);
        assert_eq!(vec![0x77], slice.extra_information);
        assert_eq!(1, reader.read_bit().unwrap());
    }

    #[test]
    fn non_slice_start_code() {
        let data = BitstreamBuilder::new().start_code(0xB7).build();
        let mut reader = MpegReader::from_source(&data[..]);

        assert!(matches!(
            decode_slice_header(&mut reader),
            Err(Error::SyntaxViolation("slice start code"))
        ));
    }

    #[test]
    fn slice_end_sentinel() {
        let data = BitstreamBuilder::new()
            .bits("1")
            .start_code(0x01)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        assert!(!is_slice_end(&mut reader).unwrap());
        reader.skip_bits(1).unwrap();
        assert!(is_slice_end(&mut reader).unwrap());
        assert_eq!(1, reader.bit_position());
    }
}
