//! Picture header

use crate::error::{Error, Result};
use crate::parser::reader::MpegReader;
use crate::parser::sequence::skip_extension_and_user_data;
use crate::types::{
    MotionVectorRange, Picture, PictureCodingType, PICTURE_START_CODE, SLICE_START_CODES,
    START_CODE_PREFIX,
};
use std::io::Read;

fn decode_motion_vector_range<R>(reader: &mut MpegReader<R>) -> Result<MotionVectorRange>
where
    R: Read,
{
    let full_pel = reader.read_bit()? == 1;
    let f_code: u8 = reader.read_bits(3)?;

    if f_code == 0 {
        return Err(Error::SyntaxViolation("nonzero f_code"));
    }

    Ok(MotionVectorRange { full_pel, f_code })
}

/// Read an `extra_bit`-prefixed run of bytes, then its terminating zero bit.
///
/// Pictures and slices share this layout.
pub fn decode_extra_information<R>(reader: &mut MpegReader<R>) -> Result<Vec<u8>>
where
    R: Read,
{
    let mut extra_information = Vec::new();

    while reader.match_pattern("1", false)? {
        reader.skip_bits(1)?;
        extra_information.push(reader.read_bits::<u8>(8)?);
    }

    reader.expect_pattern("0", "end of extra information")?;

    Ok(extra_information)
}

/// Decode a picture header from the bitstream referenced by `reader`.
///
/// The reader must be positioned on the picture start code, and is left on
/// the start code of the picture's first slice.
pub fn decode_picture_header<R>(reader: &mut MpegReader<R>) -> Result<Picture>
where
    R: Read,
{
    reader.expect_pattern(PICTURE_START_CODE, "picture start code")?;

    let temporal_reference = reader.read_bits(10)?;
    let coding_type = PictureCodingType::from_code(reader.read_bits(3)?);
    let vbv_delay = reader.read_bits(16)?;

    let forward_motion = if coding_type.has_forward_motion() {
        Some(decode_motion_vector_range(reader)?)
    } else {
        None
    };

    let backward_motion = if coding_type.has_backward_motion() {
        Some(decode_motion_vector_range(reader)?)
    } else {
        None
    };

    let extra_information = decode_extra_information(reader)?;

    reader.resync_to_start_code()?;
    skip_extension_and_user_data(reader)?;

    Ok(Picture {
        temporal_reference,
        coding_type,
        vbv_delay,
        forward_motion,
        backward_motion,
        extra_information,
    })
}

/// Determine whether the reader is positioned on a slice start code.
///
/// The reader does not move.
pub fn is_slice_start_code<R>(reader: &mut MpegReader<R>) -> Result<bool>
where
    R: Read,
{
    reader.with_lookahead(|reader| {
        if !reader.match_pattern(START_CODE_PREFIX, true)? {
            return Ok(false);
        }

        let code: u8 = reader.read_bits(8)?;

        Ok(SLICE_START_CODES.contains(&code))
    })
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::parser::picture::{decode_picture_header, is_slice_start_code};
    use crate::parser::reader::MpegReader;
    use crate::test_util::BitstreamBuilder;
    use crate::types::{MotionVectorRange, PictureCodingType};

    #[test]
    fn intra_picture_header() {
        let data = BitstreamBuilder::new()
            .start_code(0x00)
            .uint(5, 10)
            .uint(1, 3)
            .uint(0xFFFF, 16)
            .bits("0")
            .start_code(0x01)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        let picture = decode_picture_header(&mut reader).unwrap();

        assert_eq!(5, picture.temporal_reference);
        assert_eq!(PictureCodingType::Intra, picture.coding_type);
        assert_eq!(0xFFFF, picture.vbv_delay);
        assert_eq!(None, picture.forward_motion);
        assert_eq!(None, picture.backward_motion);
        assert!(picture.extra_information.is_empty());
        assert!(is_slice_start_code(&mut reader).unwrap());
    }

    #[test]
    fn bidirectional_picture_header() {
        let data = BitstreamBuilder::new()
            .start_code(0x00)
            .uint(2, 10)
            .uint(3, 3)
            .uint(0, 16)
            .bits("1 010")
            .bits("0 111")
            .bits("1")
            .uint(0x5A, 8)
            .bits("1")
            .uint(0xC3, 8)
            .bits("0")
            .start_code(0x01)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        let picture = decode_picture_header(&mut reader).unwrap();

        assert_eq!(PictureCodingType::Bidirectional, picture.coding_type);
        assert_eq!(
            Some(MotionVectorRange {
                full_pel: true,
                f_code: 2
            }),
            picture.forward_motion
        );
        assert_eq!(
            Some(MotionVectorRange {
                full_pel: false,
                f_code: 7
            }),
            picture.backward_motion
        );
        assert_eq!(vec![0x5A, 0xC3], picture.extra_information);
    }

    #[test]
    fn zero_f_code_is_rejected() {
        let data = BitstreamBuilder::new()
            .start_code(0x00)
            .uint(0, 10)
            .uint(2, 3)
            .uint(0, 16)
            .bits("0 000 0")
            .start_code(0x01)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        assert!(matches!(
            decode_picture_header(&mut reader),
            Err(Error::SyntaxViolation("nonzero f_code"))
        ));
    }

    #[test]
    fn reserved_coding_type_survives_the_header() {
        let data = BitstreamBuilder::new()
            .start_code(0x00)
            .uint(0, 10)
            .uint(6, 3)
            .uint(0, 16)
            .bits("0")
            .start_code(0x01)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        let picture = decode_picture_header(&mut reader).unwrap();

        assert_eq!(PictureCodingType::Reserved(6), picture.coding_type);
    }

    #[test]
    fn slice_start_code_range() {
        for (code, is_slice) in [
            (0x00, false),
            (0x01, true),
            (0xAF, true),
            (0xB0, false),
            (0xB7, false),
        ] {
            let data = BitstreamBuilder::new().start_code(code).build();
            let mut reader = MpegReader::from_source(&data[..]);

            assert_eq!(is_slice, is_slice_start_code(&mut reader).unwrap());
            assert_eq!(0, reader.bit_position());
        }
    }

    #[test]
    fn slice_start_code_needs_a_prefix() {
        let data = [0x00, 0x01, 0x01, 0x01];
        let mut reader = MpegReader::from_source(&data[..]);

        assert!(!is_slice_start_code(&mut reader).unwrap());
        assert_eq!(0, reader.bit_position());
    }
}
