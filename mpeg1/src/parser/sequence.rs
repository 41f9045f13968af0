//! Sequence header

use crate::error::{Error, Result};
use crate::parser::reader::MpegReader;
use crate::parser::tables::{DEFAULT_INTRA_QUANT_MATRIX, DEFAULT_NON_INTRA_QUANT_MATRIX, ZIGZAG};
use crate::types::{
    SequenceHeader, EXTENSION_START_CODE, SEQUENCE_HEADER_CODE, START_CODE_PREFIX,
    USER_DATA_START_CODE,
};
use log::trace;
use std::io::Read;

/// Read a quantizer matrix, which is transmitted in zig-zag order, into
/// row-major order.
fn decode_quant_matrix<R>(reader: &mut MpegReader<R>) -> Result<[u8; 64]>
where
    R: Read,
{
    let mut transmitted = [0; 64];
    reader.read_bytes(&mut transmitted)?;

    let mut matrix = [0; 64];
    for (scan_index, weight) in transmitted.iter().enumerate() {
        if *weight == 0 {
            return Err(Error::SyntaxViolation("nonzero quantizer matrix entry"));
        }

        matrix[ZIGZAG[scan_index]] = *weight;
    }

    Ok(matrix)
}

/// Skip any extension and user data sections at the current position.
///
/// Both kinds of section are a start code followed by arbitrary bytes up to
/// the next start code. The reader is left on that next start code.
pub fn skip_extension_and_user_data<R>(reader: &mut MpegReader<R>) -> Result<()>
where
    R: Read,
{
    for (start_code, what) in [
        (EXTENSION_START_CODE, "extension start code"),
        (USER_DATA_START_CODE, "user data start code"),
    ] {
        if reader.match_pattern(start_code, false)? {
            reader.expect_pattern(start_code, what)?;

            let mut skipped = 0;
            while !reader.match_pattern(START_CODE_PREFIX, false)? {
                reader.skip_bits(8)?;
                skipped += 1;
            }

            trace!("skipped {} bytes after the {}", skipped, what);
            reader.resync_to_start_code()?;
        }
    }

    Ok(())
}

/// Decode a sequence header from the bitstream referenced by `reader`.
///
/// The reader must be positioned on the sequence header code. On return it
/// is positioned on the first start code after the header and any extension
/// or user data that follows it.
pub fn decode_sequence_header<R>(reader: &mut MpegReader<R>) -> Result<SequenceHeader>
where
    R: Read,
{
    reader.expect_pattern(SEQUENCE_HEADER_CODE, "sequence header code")?;

    let horizontal_size = reader.read_bits(12)?;
    let vertical_size = reader.read_bits(12)?;
    let pel_aspect_ratio = reader.read_bits(4)?;
    let picture_rate = reader.read_bits(4)?;
    let bit_rate = reader.read_bits(18)?;
    reader.expect_pattern("1", "sequence header marker bit")?;
    let vbv_buffer_size = reader.read_bits(10)?;
    let constrained_parameters = reader.read_bit()? == 1;

    let intra_quant_matrix = if reader.read_bit()? == 1 {
        decode_quant_matrix(reader)?
    } else {
        DEFAULT_INTRA_QUANT_MATRIX
    };

    let non_intra_quant_matrix = if reader.read_bit()? == 1 {
        decode_quant_matrix(reader)?
    } else {
        DEFAULT_NON_INTRA_QUANT_MATRIX
    };

    reader.resync_to_start_code()?;
    skip_extension_and_user_data(reader)?;

    Ok(SequenceHeader {
        horizontal_size,
        vertical_size,
        pel_aspect_ratio,
        picture_rate,
        bit_rate,
        vbv_buffer_size,
        constrained_parameters,
        intra_quant_matrix,
        non_intra_quant_matrix,
    })
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::parser::reader::MpegReader;
    use crate::parser::sequence::{decode_sequence_header, skip_extension_and_user_data};
    use crate::parser::tables::DEFAULT_INTRA_QUANT_MATRIX;
    use crate::test_util::BitstreamBuilder;

    fn header_fields(builder: BitstreamBuilder) -> BitstreamBuilder {
        builder
            .start_code(0xB3)
            .uint(352, 12)
            .uint(240, 12)
            .uint(1, 4)
            .uint(4, 4)
            .uint(0x3FFFF, 18)
            .bits("1")
            .uint(20, 10)
            .bits("0")
    }

    #[test]
    fn sequence_header_with_default_matrices() {
        let data = header_fields(BitstreamBuilder::new())
            .bits("0 0")
            .start_code(0xB8)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        let header = decode_sequence_header(&mut reader).unwrap();

        assert_eq!(352, header.horizontal_size);
        assert_eq!(240, header.vertical_size);
        assert_eq!(1, header.pel_aspect_ratio);
        assert_eq!(4, header.picture_rate);
        assert_eq!(0x3FFFF, header.bit_rate);
        assert_eq!(20, header.vbv_buffer_size);
        assert!(!header.constrained_parameters);
        assert_eq!(DEFAULT_INTRA_QUANT_MATRIX, header.intra_quant_matrix);
        assert_eq!([16; 64], header.non_intra_quant_matrix);
        assert_eq!(22, header.mb_width());
        assert_eq!(0x000001B8, reader.read_bits::<u32>(32).unwrap());
    }

    #[test]
    fn loaded_matrix_is_stored_in_row_major_order() {
        let mut builder = header_fields(BitstreamBuilder::new()).bits("0 1");
        for weight in 1..=64 {
            builder = builder.uint(weight, 8);
        }
        let data = builder.start_code(0xB8).build();
        let mut reader = MpegReader::from_source(&data[..]);

        let header = decode_sequence_header(&mut reader).unwrap();

        // Scan positions 0, 1 and 2 land on (0,0), (1,0) and (0,1).
        assert_eq!(1, header.non_intra_quant_matrix[0]);
        assert_eq!(2, header.non_intra_quant_matrix[1]);
        assert_eq!(3, header.non_intra_quant_matrix[8]);
        assert_eq!(64, header.non_intra_quant_matrix[63]);
        assert_eq!(DEFAULT_INTRA_QUANT_MATRIX, header.intra_quant_matrix);
    }

    #[test]
    fn missing_marker_bit() {
        let data = BitstreamBuilder::new()
            .start_code(0xB3)
            .uint(0, 25)
            .uint(0, 25)
            .bits("0")
            .start_code(0xB8)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        assert!(matches!(
            decode_sequence_header(&mut reader),
            Err(Error::SyntaxViolation("sequence header marker bit"))
        ));
    }

    #[test]
    fn extension_and_user_data_are_skipped() {
        let data = BitstreamBuilder::new()
            .start_code(0xB5)
            .uint(0xDEADBEEF, 32)
            .start_code(0xB2)
            .uint(0x4D504547, 32)
            .uint(0x31, 8)
            .start_code(0x00)
            .build();
        let mut reader = MpegReader::from_source(&data[..]);

        skip_extension_and_user_data(&mut reader).unwrap();

        assert_eq!(0x00000100, reader.read_bits::<u32>(32).unwrap());
    }

    #[test]
    fn nothing_to_skip() {
        let data = BitstreamBuilder::new().start_code(0xB8).build();
        let mut reader = MpegReader::from_source(&data[..]);

        skip_extension_and_user_data(&mut reader).unwrap();

        assert_eq!(0, reader.bit_position());
    }
}
