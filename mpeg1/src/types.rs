//! Parsed MPEG-1 video bitstream types

/// The 24-bit prefix shared by every start code.
pub const START_CODE_PREFIX: &str = "000000000000000000000001";

pub const PICTURE_START_CODE: &str = "00000000000000000000000100000000";
pub const USER_DATA_START_CODE: &str = "00000000000000000000000110110010";
pub const SEQUENCE_HEADER_CODE: &str = "00000000000000000000000110110011";
pub const SEQUENCE_ERROR_CODE: &str = "00000000000000000000000110110100";
pub const EXTENSION_START_CODE: &str = "00000000000000000000000110110101";
pub const SEQUENCE_END_CODE: &str = "00000000000000000000000110110111";
pub const GROUP_START_CODE: &str = "00000000000000000000000110111000";

/// Lowest and highest trailing byte of a slice start code.
pub const SLICE_START_CODES: std::ops::RangeInclusive<u8> = 0x01..=0xAF;

pub const MACROBLOCK_STUFFING: &str = "00000001111";
pub const MACROBLOCK_ESCAPE: &str = "00000001000";

/// No macroblock address increment begins with this many zero bits, so
/// seeing them means the slice is over.
pub const SLICE_END_SENTINEL: &str = "00000000000000000000000";

pub const RUN_LEVEL_ESCAPE: &str = "000001";
pub const END_OF_BLOCK: &str = "10";

/// Every macroblock address escape adds this much to the increment.
pub const MACROBLOCK_ESCAPE_INCREMENT: u32 = 33;

/// ISO/IEC 11172-2 2.4.2.3 `sequence_header`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceHeader {
    /// Width of the displayable picture in luma samples.
    pub horizontal_size: u16,

    /// Height of the displayable picture in luma samples.
    pub vertical_size: u16,

    /// Index into the pel aspect ratio table.
    pub pel_aspect_ratio: u8,

    /// Index into the picture rate table. See `frame_rate`.
    pub picture_rate: u8,

    /// Bit rate in units of 400 bits per second. `0x3FFFF` signals a variable
    /// bit rate.
    pub bit_rate: u32,

    /// Video buffering verifier size in units of 16 kilobits.
    pub vbv_buffer_size: u16,

    pub constrained_parameters: bool,

    /// Quantizer weights for intra blocks, in row-major order.
    pub intra_quant_matrix: [u8; 64],

    /// Quantizer weights for non-intra blocks, in row-major order.
    pub non_intra_quant_matrix: [u8; 64],
}

impl SequenceHeader {
    /// Number of macroblocks per row.
    pub fn mb_width(&self) -> usize {
        (self.horizontal_size as usize + 15) / 16
    }

    /// Number of macroblock rows.
    pub fn mb_height(&self) -> usize {
        (self.vertical_size as usize + 15) / 16
    }

    /// Pictures per second, if the picture rate code is not reserved.
    pub fn frame_rate(&self) -> Option<f64> {
        match self.picture_rate {
            1 => Some(24000.0 / 1001.0),
            2 => Some(24.0),
            3 => Some(25.0),
            4 => Some(30000.0 / 1001.0),
            5 => Some(30.0),
            6 => Some(50.0),
            7 => Some(60000.0 / 1001.0),
            8 => Some(60.0),
            _ => None,
        }
    }
}

/// SMPTE-style time code of the first picture of a group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeCode {
    pub drop_frame: bool,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub pictures: u8,
}

/// ISO/IEC 11172-2 2.4.2.4 `group_of_pictures`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GroupOfPictures {
    pub time_code: TimeCode,

    /// The group can be decoded without the previous group's pictures.
    pub closed_gop: bool,

    /// The B-pictures leading this group reference a picture that is gone.
    pub broken_link: bool,
}

/// The way a picture is predicted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PictureCodingType {
    /// Coded without reference to any other picture.
    Intra,

    /// Predicted from the previous intra or predicted picture.
    Predicted,

    /// Predicted from the surrounding intra or predicted pictures.
    Bidirectional,

    /// Only the DC coefficient of each block is coded.
    DcOnly,

    /// A coding type this decoder does not know about.
    Reserved(u8),
}

impl PictureCodingType {
    /// Interpret the 3-bit `picture_coding_type` field.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Intra,
            2 => Self::Predicted,
            3 => Self::Bidirectional,
            4 => Self::DcOnly,
            reserved => Self::Reserved(reserved),
        }
    }

    /// Whether pictures of this type carry forward motion range fields.
    pub fn has_forward_motion(self) -> bool {
        matches!(self, Self::Predicted | Self::Bidirectional)
    }

    /// Whether pictures of this type carry backward motion range fields.
    pub fn has_backward_motion(self) -> bool {
        matches!(self, Self::Bidirectional)
    }

    pub fn is_bidirectional(self) -> bool {
        matches!(self, Self::Bidirectional)
    }
}

/// The motion vector range of one prediction direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MotionVectorRange {
    /// Vectors are in whole pixels instead of half pixels.
    pub full_pel: bool,

    /// The 3-bit `f_code`. Never zero.
    pub f_code: u8,
}

impl MotionVectorRange {
    /// Number of residual bits following each nonzero motion code.
    pub fn r_size(self) -> u32 {
        self.f_code as u32 - 1
    }

    /// The scale factor applied to motion codes.
    pub fn f(self) -> i32 {
        1 << self.r_size()
    }
}

/// ISO/IEC 11172-2 2.4.2.5 `picture`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
    /// Display order of this picture within its group, modulo 1024.
    pub temporal_reference: u16,

    pub coding_type: PictureCodingType,

    pub vbv_delay: u16,

    /// Present on predicted and bidirectional pictures.
    pub forward_motion: Option<MotionVectorRange>,

    /// Present on bidirectional pictures.
    pub backward_motion: Option<MotionVectorRange>,

    /// Bytes of the `extra_information_picture` loop.
    pub extra_information: Vec<u8>,
}

/// ISO/IEC 11172-2 2.4.2.6 `slice`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slice {
    /// Macroblock row of the slice's first macroblock, counting from one.
    pub vertical_position: u8,

    pub quantizer_scale: u8,

    /// Bytes of the `extra_information_slice` loop.
    pub extra_information: Vec<u8>,
}

bitflags! {
    /// The contents of a macroblock, as signalled by `macroblock_type`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct MacroblockType : u8 {
        /// A new quantizer scale follows.
        const QUANT = 0x10;

        /// Forward motion codes follow.
        const MOTION_FORWARD = 0x08;

        /// Backward motion codes follow.
        const MOTION_BACKWARD = 0x04;

        /// A coded block pattern follows.
        const PATTERN = 0x02;

        /// Every block is intra coded.
        const INTRA = 0x01;
    }
}

/// The motion codes of one prediction direction of a macroblock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionCode {
    /// `motion_horizontal_*_code`, in the range -16 to 16.
    pub horizontal_code: i8,

    /// `motion_horizontal_*_r`; zero when not transmitted.
    pub horizontal_residual: u8,

    pub vertical_code: i8,
    pub vertical_residual: u8,
}

/// Every block of the macroblock is coded.
pub const ALL_BLOCKS_CODED: u8 = 0b111111;

/// ISO/IEC 11172-2 2.4.2.7 `macroblock`, up to but not including its blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Macroblock {
    /// How far this macroblock's address lies past the previous one,
    /// escapes included.
    pub address_increment: u32,

    pub mb_type: MacroblockType,

    /// Replacement quantizer scale, if the macroblock type carries one.
    pub quantizer_scale: Option<u8>,

    pub motion_forward: Option<MotionCode>,

    pub motion_backward: Option<MotionCode>,

    /// One bit per block, block 0 in the most significant of six bits.
    pub coded_block_pattern: u8,
}

impl Macroblock {
    pub fn is_intra(&self) -> bool {
        self.mb_type.contains(MacroblockType::INTRA)
    }

    /// Whether block `index` (0-3 luma, 4 Cb, 5 Cr) is present.
    pub fn codes_block(&self, index: usize) -> bool {
        self.coded_block_pattern & (0b100000 >> index) != 0
    }
}

/// ISO/IEC 11172-2 2.4.2.8 `block`, run-length expanded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The DC differential of an intra block.
    pub intra_dc: Option<i16>,

    /// Quantized coefficient levels in zig-zag order. For intra blocks the
    /// first entry is always zero; the DC term lives in `intra_dc`.
    pub levels: [i16; 64],
}

#[cfg(test)]
mod tests {
    use crate::types::{
        Macroblock, MacroblockType, MotionVectorRange, PictureCodingType, SequenceHeader,
    };

    #[test]
    fn picture_coding_types() {
        assert_eq!(PictureCodingType::Intra, PictureCodingType::from_code(1));
        assert_eq!(PictureCodingType::DcOnly, PictureCodingType::from_code(4));
        assert_eq!(
            PictureCodingType::Reserved(0),
            PictureCodingType::from_code(0)
        );
        assert!(PictureCodingType::Bidirectional.has_forward_motion());
        assert!(!PictureCodingType::Predicted.has_backward_motion());
    }

    #[test]
    fn motion_vector_range_scale() {
        let range = MotionVectorRange {
            full_pel: false,
            f_code: 3,
        };

        assert_eq!(2, range.r_size());
        assert_eq!(4, range.f());
    }

    #[test]
    fn macroblock_grid_rounds_up() {
        let header = SequenceHeader {
            horizontal_size: 352,
            vertical_size: 241,
            pel_aspect_ratio: 1,
            picture_rate: 3,
            bit_rate: 0x3FFFF,
            vbv_buffer_size: 20,
            constrained_parameters: false,
            intra_quant_matrix: [16; 64],
            non_intra_quant_matrix: [16; 64],
        };

        assert_eq!(22, header.mb_width());
        assert_eq!(16, header.mb_height());
        assert_eq!(Some(25.0), header.frame_rate());
    }

    #[test]
    fn coded_block_pattern_bits() {
        let macroblock = Macroblock {
            address_increment: 1,
            mb_type: MacroblockType::PATTERN,
            quantizer_scale: None,
            motion_forward: None,
            motion_backward: None,
            coded_block_pattern: 0b100001,
        };

        assert!(macroblock.codes_block(0));
        assert!(!macroblock.codes_block(1));
        assert!(macroblock.codes_block(5));
        assert!(!macroblock.is_intra());
    }
}
