//! Group of pictures header

use crate::error::Result;
use crate::parser::reader::MpegReader;
use crate::parser::sequence::skip_extension_and_user_data;
use crate::types::{GroupOfPictures, TimeCode, GROUP_START_CODE};
use std::io::Read;

fn decode_time_code<R>(reader: &mut MpegReader<R>) -> Result<TimeCode>
where
    R: Read,
{
    let drop_frame = reader.read_bit()? == 1;
    let hours = reader.read_bits(5)?;
    let minutes = reader.read_bits(6)?;
    reader.expect_pattern("1", "time code marker bit")?;
    let seconds = reader.read_bits(6)?;
    let pictures = reader.read_bits(6)?;

    Ok(TimeCode {
        drop_frame,
        hours,
        minutes,
        seconds,
        pictures,
    })
}

/// Decode a group of pictures header from the bitstream referenced by
/// `reader`.
///
/// The reader must be positioned on the group start code, and is left on the
/// start code of the group's first picture.
pub fn decode_group_of_pictures<R>(reader: &mut MpegReader<R>) -> Result<GroupOfPictures>
where
    R: Read,
{
    reader.expect_pattern(GROUP_START_CODE, "group start code")?;

    let time_code = decode_time_code(reader)?;
    let closed_gop = reader.read_bit()? == 1;
    let broken_link = reader.read_bit()? == 1;

    reader.resync_to_start_code()?;
    skip_extension_and_user_data(reader)?;

    Ok(GroupOfPictures {
        time_code,
        closed_gop,
        broken_link,
    })
}
