//! Standard code tables

use crate::error::{Error, Result};
use crate::parser::vlc::HuffmanTree;

/// Zig-zag scan position to row-major (x + y*8) position.
pub const ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27,
    20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58,
    59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Intra quantizer weights in force until a sequence header loads its own,
/// in row-major order.
pub const DEFAULT_INTRA_QUANT_MATRIX: [u8; 64] = [
    8, 16, 19, 22, 26, 27, 29, 34, //
    16, 16, 22, 24, 27, 29, 34, 37, //
    19, 22, 26, 27, 29, 34, 34, 38, //
    22, 22, 26, 27, 29, 34, 37, 40, //
    22, 26, 27, 29, 32, 35, 40, 48, //
    26, 27, 29, 32, 35, 40, 48, 58, //
    26, 27, 29, 34, 38, 46, 56, 69, //
    27, 29, 35, 38, 46, 56, 69, 83, //
];

/// Non-intra quantizer weights in force until a sequence header loads its
/// own.
pub const DEFAULT_NON_INTRA_QUANT_MATRIX: [u8; 64] = [16; 64];

// Table B.1. Stuffing and escape are matched before the tree is consulted.
const MACROBLOCK_ADDRESS_INCREMENT_CODES: [(&str, u8); 33] = [
    ("1", 1),
    ("010", 3),
    ("011", 2),
    ("0010", 5),
    ("0011", 4),
    ("00010", 7),
    ("00011", 6),
    ("0000110", 9),
    ("0000111", 8),
    ("00000110", 15),
    ("00000111", 14),
    ("00001000", 13),
    ("00001001", 12),
    ("00001010", 11),
    ("00001011", 10),
    ("0000010010", 21),
    ("0000010011", 20),
    ("0000010100", 19),
    ("0000010101", 18),
    ("0000010110", 17),
    ("0000010111", 16),
    ("00000011000", 33),
    ("00000011001", 32),
    ("00000011010", 31),
    ("00000011011", 30),
    ("00000011100", 29),
    ("00000011101", 28),
    ("00000011110", 27),
    ("00000011111", 26),
    ("00000100000", 25),
    ("00000100001", 24),
    ("00000100010", 23),
    ("00000100011", 22),
];

// Tables B.2a through B.2d.
const MACROBLOCK_TYPE_INTRA_CODES: [(&str, u8); 2] = [
    ("1", 0x01),
    ("01", 0x11),
];

const MACROBLOCK_TYPE_PREDICTED_CODES: [(&str, u8); 7] = [
    ("1", 0x0A),
    ("01", 0x02),
    ("001", 0x08),
    ("00001", 0x12),
    ("00010", 0x1A),
    ("00011", 0x01),
    ("000001", 0x11),
];

const MACROBLOCK_TYPE_BIDIRECTIONAL_CODES: [(&str, u8); 11] = [
    ("10", 0x0C),
    ("11", 0x0E),
    ("010", 0x04),
    ("011", 0x06),
    ("0010", 0x08),
    ("0011", 0x0A),
    ("00010", 0x1E),
    ("00011", 0x01),
    ("000001", 0x11),
    ("000010", 0x16),
    ("000011", 0x1A),
];

const MACROBLOCK_TYPE_DC_ONLY_CODES: [(&str, u8); 1] = [("1", 0x01)];

// Table B.3.
const CODED_BLOCK_PATTERN_CODES: [(&str, u8); 63] = [
    ("111", 60),
    ("1010", 32),
    ("1011", 16),
    ("1100", 8),
    ("1101", 4),
    ("01000", 62),
    ("01001", 2),
    ("01010", 61),
    ("01011", 1),
    ("01100", 56),
    ("01101", 52),
    ("01110", 44),
    ("01111", 28),
    ("10000", 40),
    ("10001", 20),
    ("10010", 48),
    ("10011", 12),
    ("001100", 63),
    ("001101", 3),
    ("001110", 36),
    ("001111", 24),
    ("0010000", 34),
    ("0010001", 18),
    ("0010010", 10),
    ("0010011", 6),
    ("0010100", 33),
    ("0010101", 17),
    ("0010110", 9),
    ("0010111", 5),
    ("00000100", 58),
    ("00000101", 54),
    ("00000110", 46),
    ("00000111", 30),
    ("00001000", 57),
    ("00001001", 53),
    ("00001010", 45),
    ("00001011", 29),
    ("00001100", 38),
    ("00001101", 26),
    ("00001110", 37),
    ("00001111", 25),
    ("00010000", 43),
    ("00010001", 23),
    ("00010010", 51),
    ("00010011", 15),
    ("00010100", 42),
    ("00010101", 22),
    ("00010110", 50),
    ("00010111", 14),
    ("00011000", 41),
    ("00011001", 21),
    ("00011010", 49),
    ("00011011", 13),
    ("00011100", 35),
    ("00011101", 19),
    ("00011110", 11),
    ("00011111", 7),
    ("000000010", 39),
    ("000000011", 27),
    ("000000100", 59),
    ("000000101", 55),
    ("000000110", 47),
    ("000000111", 31),
];

// Table B.4.
const MOTION_CODES: [(&str, i8); 33] = [
    ("1", 0),
    ("010", 1),
    ("011", -1),
    ("0010", 2),
    ("0011", -2),
    ("00010", 3),
    ("00011", -3),
    ("0000110", 4),
    ("0000111", -4),
    ("00000110", 7),
    ("00000111", -7),
    ("00001000", 6),
    ("00001001", -6),
    ("00001010", 5),
    ("00001011", -5),
    ("0000010010", 10),
    ("0000010011", -10),
    ("0000010100", 9),
    ("0000010101", -9),
    ("0000010110", 8),
    ("0000010111", -8),
    ("00000011000", 16),
    ("00000011001", -16),
    ("00000011010", 15),
    ("00000011011", -15),
    ("00000011100", 14),
    ("00000011101", -14),
    ("00000011110", 13),
    ("00000011111", -13),
    ("00000100000", 12),
    ("00000100001", -12),
    ("00000100010", 11),
    ("00000100011", -11),
];

// Tables B.5a and B.5b.
const DCT_DC_SIZE_LUMINANCE_CODES: [(&str, u8); 9] = [
    ("00", 1),
    ("01", 2),
    ("100", 0),
    ("101", 3),
    ("110", 4),
    ("1110", 5),
    ("11110", 6),
    ("111110", 7),
    ("1111110", 8),
];

const DCT_DC_SIZE_CHROMINANCE_CODES: [(&str, u8); 9] = [
    ("00", 0),
    ("01", 1),
    ("10", 2),
    ("110", 3),
    ("1110", 4),
    ("11110", 5),
    ("111110", 6),
    ("1111110", 7),
    ("11111110", 8),
];

// Tables B.5c through B.5f. Each code yields a run-level indicator that
// selects an entry of `RUN_LEVEL_RUNS` and `RUN_LEVEL_LEVELS`. The escape code
// is matched before the tree is consulted, and the sign bit follows the code.
const DCT_COEFFICIENT_CODES: [(&str, u8); 111] = [
    ("1", 0),
    ("011", 1),
    ("0100", 2),
    ("0101", 3),
    ("00101", 4),
    ("00110", 5),
    ("00111", 6),
    ("000100", 7),
    ("000101", 8),
    ("000110", 9),
    ("000111", 10),
    ("0000100", 11),
    ("0000101", 12),
    ("0000110", 13),
    ("0000111", 14),
    ("00100000", 15),
    ("00100001", 16),
    ("00100010", 17),
    ("00100011", 18),
    ("00100100", 19),
    ("00100101", 20),
    ("00100110", 21),
    ("00100111", 22),
    ("0000001000", 23),
    ("0000001001", 24),
    ("0000001010", 25),
    ("0000001011", 26),
    ("0000001100", 27),
    ("0000001101", 28),
    ("0000001110", 29),
    ("0000001111", 30),
    ("000000010000", 31),
    ("000000010001", 32),
    ("000000010010", 33),
    ("000000010011", 34),
    ("000000010100", 35),
    ("000000010101", 36),
    ("000000010110", 37),
    ("000000010111", 38),
    ("000000011000", 39),
    ("000000011001", 40),
    ("000000011010", 41),
    ("000000011011", 42),
    ("000000011100", 43),
    ("000000011101", 44),
    ("000000011110", 45),
    ("000000011111", 46),
    ("0000000010000", 47),
    ("0000000010001", 48),
    ("0000000010010", 49),
    ("0000000010011", 50),
    ("0000000010100", 51),
    ("0000000010101", 52),
    ("0000000010110", 53),
    ("0000000010111", 54),
    ("0000000011000", 55),
    ("0000000011001", 56),
    ("0000000011010", 57),
    ("0000000011011", 58),
    ("0000000011100", 59),
    ("0000000011101", 60),
    ("0000000011110", 61),
    ("0000000011111", 62),
    ("00000000010000", 63),
    ("00000000010001", 64),
    ("00000000010010", 65),
    ("00000000010011", 66),
    ("00000000010100", 67),
    ("00000000010101", 68),
    ("00000000010110", 69),
    ("00000000010111", 70),
    ("00000000011000", 71),
    ("00000000011001", 72),
    ("00000000011010", 73),
    ("00000000011011", 74),
    ("00000000011100", 75),
    ("00000000011101", 76),
    ("00000000011110", 77),
    ("00000000011111", 78),
    ("000000000010000", 79),
    ("000000000010001", 80),
    ("000000000010010", 81),
    ("000000000010011", 82),
    ("000000000010100", 83),
    ("000000000010101", 84),
    ("000000000010110", 85),
    ("000000000010111", 86),
    ("000000000011000", 87),
    ("000000000011001", 88),
    ("000000000011010", 89),
    ("000000000011011", 90),
    ("000000000011100", 91),
    ("000000000011101", 92),
    ("000000000011110", 93),
    ("000000000011111", 94),
    ("0000000000010000", 95),
    ("0000000000010001", 96),
    ("0000000000010010", 97),
    ("0000000000010011", 98),
    ("0000000000010100", 99),
    ("0000000000010101", 100),
    ("0000000000010110", 101),
    ("0000000000010111", 102),
    ("0000000000011000", 103),
    ("0000000000011001", 104),
    ("0000000000011010", 105),
    ("0000000000011011", 106),
    ("0000000000011100", 107),
    ("0000000000011101", 108),
    ("0000000000011110", 109),
    ("0000000000011111", 110),
];

const RUN_LEVEL_RUNS: [u8; 111] = [
    0, 1, 0, 2, 0, 4, 3, 7, 6, 1, 5, 2, 9, 0, 8, 13,
    0, 12, 11, 3, 1, 0, 10, 16, 5, 0, 2, 1, 15, 14, 4, 0,
    8, 4, 0, 2, 7, 21, 20, 0, 19, 18, 1, 3, 0, 6, 17, 10,
    9, 5, 3, 2, 1, 1, 0, 0, 0, 0, 26, 25, 24, 23, 22, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 6, 16, 15, 14, 13, 12, 11, 31, 30, 29, 28, 27,
];

const RUN_LEVEL_LEVELS: [u8; 111] = [
    1, 1, 2, 1, 3, 1, 1, 1, 1, 2, 1, 2, 1, 4, 1, 1,
    6, 1, 1, 2, 3, 5, 1, 1, 2, 7, 3, 4, 1, 1, 2, 11,
    2, 3, 10, 4, 2, 1, 1, 9, 1, 1, 5, 3, 8, 2, 1, 2,
    2, 3, 4, 5, 7, 6, 15, 14, 13, 12, 1, 1, 1, 1, 1, 31,
    30, 29, 28, 27, 26, 25, 24, 23, 22, 21, 20, 19, 18, 17, 16, 40,
    39, 38, 37, 36, 35, 34, 33, 32, 14, 13, 12, 11, 10, 9, 8, 18,
    17, 16, 15, 3, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1,
];

/// Every code tree the syntax needs, plus the run/level lists that give
/// meaning to DCT coefficient symbols.
///
/// Tables are built once and shared read-only by all decoding calls.
#[derive(Clone, Debug)]
pub struct CodeTables {
    pub macroblock_address_increment: HuffmanTree<u8>,
    pub macroblock_type_intra: HuffmanTree<u8>,
    pub macroblock_type_predicted: HuffmanTree<u8>,
    pub macroblock_type_bidirectional: HuffmanTree<u8>,
    pub macroblock_type_dc_only: HuffmanTree<u8>,
    pub coded_block_pattern: HuffmanTree<u8>,
    pub motion_code: HuffmanTree<i8>,
    pub dct_dc_size_luminance: HuffmanTree<u8>,
    pub dct_dc_size_chrominance: HuffmanTree<u8>,

    /// Yields run-level indicators.
    pub dct_coefficient: HuffmanTree<u8>,

    /// Run of each run-level indicator.
    pub runs: Vec<u8>,

    /// Level magnitude of each run-level indicator.
    pub levels: Vec<u8>,
}

impl CodeTables {
    /// Build the tables defined by ISO/IEC 11172-2 Annex B.
    pub fn standard() -> Result<Self> {
        Ok(Self {
            macroblock_address_increment: HuffmanTree::from_codes(
                &MACROBLOCK_ADDRESS_INCREMENT_CODES,
            )?,
            macroblock_type_intra: HuffmanTree::from_codes(&MACROBLOCK_TYPE_INTRA_CODES)?,
            macroblock_type_predicted: HuffmanTree::from_codes(&MACROBLOCK_TYPE_PREDICTED_CODES)?,
            macroblock_type_bidirectional: HuffmanTree::from_codes(
                &MACROBLOCK_TYPE_BIDIRECTIONAL_CODES,
            )?,
            macroblock_type_dc_only: HuffmanTree::from_codes(&MACROBLOCK_TYPE_DC_ONLY_CODES)?,
            coded_block_pattern: HuffmanTree::from_codes(&CODED_BLOCK_PATTERN_CODES)?,
            motion_code: HuffmanTree::from_codes(&MOTION_CODES)?,
            dct_dc_size_luminance: HuffmanTree::from_codes(&DCT_DC_SIZE_LUMINANCE_CODES)?,
            dct_dc_size_chrominance: HuffmanTree::from_codes(&DCT_DC_SIZE_CHROMINANCE_CODES)?,
            dct_coefficient: HuffmanTree::from_codes(&DCT_COEFFICIENT_CODES)?,
            runs: RUN_LEVEL_RUNS.to_vec(),
            levels: RUN_LEVEL_LEVELS.to_vec(),
        })
    }

    /// The (run, level magnitude) pair named by a run-level indicator.
    pub fn run_level(&self, indicator: u8) -> Result<(u8, u8)> {
        let index = indicator as usize;

        match (self.runs.get(index), self.levels.get(index)) {
            (Some(run), Some(level)) => Ok((*run, *level)),
            _ => Err(Error::InvalidCode),
        }
    }
}
