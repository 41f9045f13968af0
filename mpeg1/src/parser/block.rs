//! Block decoding

use crate::error::{Error, Result};
use crate::parser::reader::MpegReader;
use crate::parser::tables::CodeTables;
use crate::types::{Block, PictureCodingType, END_OF_BLOCK, RUN_LEVEL_ESCAPE};
use std::io::Read;

/// Expand a `dct_dc_differential` of `size` bits into a signed value.
///
/// A set top bit means the raw value is positive as read. Otherwise the raw
/// value encodes a negative number.
pub fn decode_dc_differential(size: u8, raw: u16) -> i16 {
    if size == 0 {
        0
    } else if raw & (1 << (size - 1)) != 0 {
        raw as i16
    } else {
        -(1 << size) | (raw as i16 + 1)
    }
}

fn decode_escaped_run_level<R>(reader: &mut MpegReader<R>) -> Result<(u8, i16)>
where
    R: Read,
{
    let run = reader.read_bits(6)?;
    let level = match reader.read_bits::<u8>(8)? {
        0x00 => -(reader.read_bits::<u8>(8)? as i16),
        0x80 => reader.read_bits::<u8>(8)? as i16 - 256,
        level => level as i8 as i16,
    };

    Ok((run, level))
}

/// Decode one run/level pair.
///
/// `first` selects the form used for the first coefficient of a non-intra
/// block, in which the short code `1s` means run 0, level 1. In every other
/// position that code is two bits long, which costs an extra bit here.
pub fn decode_run_level<R>(
    reader: &mut MpegReader<R>,
    tables: &CodeTables,
    first: bool,
) -> Result<(u8, i16)>
where
    R: Read,
{
    if reader.match_pattern(RUN_LEVEL_ESCAPE, false)? {
        reader.skip_bits(RUN_LEVEL_ESCAPE.len() as u32)?;

        return decode_escaped_run_level(reader);
    }

    let indicator = tables.dct_coefficient.decode(reader)?;
    let (run, magnitude) = tables.run_level(indicator)?;

    if !first && run == 0 && magnitude == 1 {
        reader.skip_bits(1)?;
    }

    let level = if reader.read_bit()? == 1 {
        -(magnitude as i16)
    } else {
        magnitude as i16
    };

    Ok((run, level))
}

/// Decode block `index` (0-3 luma, 4 Cb, 5 Cr) of a macroblock into its
/// zig-zag ordered levels.
///
/// Blocks of DC-only pictures end after their DC term. All other blocks end
/// with an end-of-block code.
pub fn decode_block<R>(
    reader: &mut MpegReader<R>,
    tables: &CodeTables,
    index: usize,
    intra: bool,
    coding_type: PictureCodingType,
) -> Result<Block>
where
    R: Read,
{
    let mut levels = [0; 64];

    let (intra_dc, mut position) = if intra {
        let size_tree = if index < 4 {
            &tables.dct_dc_size_luminance
        } else {
            &tables.dct_dc_size_chrominance
        };

        let size = size_tree.decode(reader)?;
        let raw = if size == 0 {
            0
        } else {
            reader.read_bits(size as u32)?
        };

        (Some(decode_dc_differential(size, raw)), 1)
    } else {
        let (run, level) = decode_run_level(reader, tables, true)?;
        let position = run as usize;

        *levels
            .get_mut(position)
            .ok_or(Error::CoefficientOverflow(position))? = level;

        (None, position + 1)
    };

    if coding_type != PictureCodingType::DcOnly {
        loop {
            if reader.match_pattern(END_OF_BLOCK, false)? {
                reader.skip_bits(END_OF_BLOCK.len() as u32)?;
                break;
            }

            let (run, level) = decode_run_level(reader, tables, false)?;
            position += run as usize;

            *levels
                .get_mut(position)
                .ok_or(Error::CoefficientOverflow(position))? = level;
            position += 1;
        }
    }

    Ok(Block { intra_dc, levels })
}
