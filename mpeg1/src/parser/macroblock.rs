//! Macroblock decoding

use crate::decoder::DecoderOption;
use crate::error::{Error, Result};
use crate::parser::reader::MpegReader;
use crate::parser::tables::CodeTables;
use crate::types::{
    Macroblock, MacroblockType, MotionCode, MotionVectorRange, Picture, PictureCodingType,
    ALL_BLOCKS_CODED, MACROBLOCK_ESCAPE, MACROBLOCK_ESCAPE_INCREMENT, MACROBLOCK_STUFFING,
};
use std::io::Read;

/// Decode the distance from the previous macroblock address, skipping any
/// stuffing in front of it.
///
/// Each escape code adds 33 to the increment that follows it.
pub fn decode_address_increment<R>(reader: &mut MpegReader<R>, tables: &CodeTables) -> Result<u32>
where
    R: Read,
{
    while reader.match_pattern(MACROBLOCK_STUFFING, false)? {
        reader.skip_bits(MACROBLOCK_STUFFING.len() as u32)?;
    }

    let mut increment = 0;
    while reader.match_pattern(MACROBLOCK_ESCAPE, false)? {
        reader.skip_bits(MACROBLOCK_ESCAPE.len() as u32)?;
        increment += MACROBLOCK_ESCAPE_INCREMENT;
    }

    Ok(increment + tables.macroblock_address_increment.decode(reader)? as u32)
}

fn decode_macroblock_type<R>(
    reader: &mut MpegReader<R>,
    tables: &CodeTables,
    coding_type: PictureCodingType,
) -> Result<MacroblockType>
where
    R: Read,
{
    let tree = match coding_type {
        PictureCodingType::Intra => &tables.macroblock_type_intra,
        PictureCodingType::Predicted => &tables.macroblock_type_predicted,
        PictureCodingType::Bidirectional => &tables.macroblock_type_bidirectional,
        PictureCodingType::DcOnly => &tables.macroblock_type_dc_only,
        PictureCodingType::Reserved(code) => return Err(Error::UnsupportedCodingType(code)),
    };

    Ok(MacroblockType::from_bits_truncate(tree.decode(reader)?))
}

fn decode_motion_residual<R>(
    reader: &mut MpegReader<R>,
    range: MotionVectorRange,
    code: i8,
) -> Result<u8>
where
    R: Read,
{
    if range.f() == 1 || code == 0 {
        Ok(0)
    } else {
        reader.read_bits(range.r_size())
    }
}

fn decode_motion_code<R>(
    reader: &mut MpegReader<R>,
    tables: &CodeTables,
    range: Option<MotionVectorRange>,
) -> Result<MotionCode>
where
    R: Read,
{
    let range = range.ok_or(Error::SyntaxViolation("motion vector range"))?;

    let horizontal_code = tables.motion_code.decode(reader)?;
    let horizontal_residual = decode_motion_residual(reader, range, horizontal_code)?;
    let vertical_code = tables.motion_code.decode(reader)?;
    let vertical_residual = decode_motion_residual(reader, range, vertical_code)?;

    Ok(MotionCode {
        horizontal_code,
        horizontal_residual,
        vertical_code,
        vertical_residual,
    })
}

/// Decode a macroblock header from the bitstream referenced by `reader`.
///
/// Everything up to the first block is read. Which macroblock type table
/// applies depends on the coding type of `picture`; a reserved coding type
/// cannot be decoded at all.
///
/// Without a coded block pattern in the bitstream, all six blocks are
/// treated as coded, unless `DecoderOption::STRICT_BLOCK_PATTERN` is set and
/// the macroblock is not intra coded.
pub fn decode_macroblock<R>(
    reader: &mut MpegReader<R>,
    tables: &CodeTables,
    picture: &Picture,
    decoder_options: DecoderOption,
) -> Result<Macroblock>
where
    R: Read,
{
    let address_increment = decode_address_increment(reader, tables)?;
    let mb_type = decode_macroblock_type(reader, tables, picture.coding_type)?;

    let quantizer_scale = if mb_type.contains(MacroblockType::QUANT) {
        Some(reader.read_bits(5)?)
    } else {
        None
    };

    let motion_forward = if mb_type.contains(MacroblockType::MOTION_FORWARD) {
        Some(decode_motion_code(reader, tables, picture.forward_motion)?)
    } else {
        None
    };

    let motion_backward = if mb_type.contains(MacroblockType::MOTION_BACKWARD) {
        Some(decode_motion_code(reader, tables, picture.backward_motion)?)
    } else {
        None
    };

    let coded_block_pattern = if mb_type.contains(MacroblockType::PATTERN) {
        tables.coded_block_pattern.decode(reader)?
    } else if !mb_type.contains(MacroblockType::INTRA)
        && decoder_options.contains(DecoderOption::STRICT_BLOCK_PATTERN)
    {
        0
    } else {
        ALL_BLOCKS_CODED
    };

    Ok(Macroblock {
        address_increment,
        mb_type,
        quantizer_scale,
        motion_forward,
        motion_backward,
        coded_block_pattern,
    })
}
