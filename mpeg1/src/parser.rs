//! MPEG-1 video bitstream parser functions.

mod block;
mod gop;
mod macroblock;
mod picture;
mod reader;
mod sequence;
mod slice;
mod tables;
mod vlc;

pub use block::{decode_block, decode_dc_differential, decode_run_level};
pub use gop::decode_group_of_pictures;
pub use macroblock::{decode_address_increment, decode_macroblock};
pub use picture::{decode_extra_information, decode_picture_header, is_slice_start_code};
pub use reader::MpegReader;
pub use sequence::{decode_sequence_header, skip_extension_and_user_data};
pub use slice::{decode_slice_header, is_slice_end};
pub use tables::{CodeTables, DEFAULT_INTRA_QUANT_MATRIX, DEFAULT_NON_INTRA_QUANT_MATRIX, ZIGZAG};
pub use vlc::HuffmanTree;
