//! Inverse quantization and DC prediction

use crate::parser::ZIGZAG;

/// The value every DC predictor restarts from: the DC term of a block of
/// mid-grey samples.
pub const DC_PREDICTOR_RESET: i32 = 1024;

const MIN_COEFFICIENT: i32 = -2048;
const MAX_COEFFICIENT: i32 = 2047;

/// Which DC predictor (luma, Cb, Cr) block `index` of a macroblock uses.
pub fn dc_plane(index: usize) -> usize {
    match index {
        0..=3 => 0,
        4 => 1,
        _ => 2,
    }
}

/// Inverse quantize a single level against its quantizer matrix weight.
///
/// Nonzero results are forced odd by moving even ones away from zero.
fn dequantize_level(level: i32, quantizer_scale: i32, weight: i32) -> i32 {
    let mut value = (2 * level * quantizer_scale * weight) / 16;

    if value != 0 && (value & 1) == 0 {
        value += value.signum();
    }

    value.clamp(MIN_COEFFICIENT, MAX_COEFFICIENT)
}

/// Inverse quantize a block of zig-zag ordered `levels`.
///
/// `matrix` is in row-major order. The returned coefficients are in
/// row-major (x + y*8) order, ready for the IDCT. The DC term of an intra
/// block comes from its predictor instead and must be replaced by the
/// caller.
pub fn dequantize(levels: &[i16; 64], matrix: &[u8; 64], quantizer_scale: u8) -> [i32; 64] {
    let mut coefficients = [0; 64];

    for (level, position) in levels.iter().zip(ZIGZAG.iter()) {
        let position = *position;

        if *level != 0 {
            coefficients[position] = dequantize_level(
                *level as i32,
                quantizer_scale as i32,
                matrix[position] as i32,
            );
        }
    }

    coefficients
}

/// The running DC predictors of the luma and both chroma planes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DcPredictors {
    predictors: [i32; 3],
}

impl Default for DcPredictors {
    fn default() -> Self {
        Self {
            predictors: [DC_PREDICTOR_RESET; 3],
        }
    }
}

impl DcPredictors {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reconstruct the DC coefficient of a block in `plane` from its decoded
    /// differential, and carry it forward as the next prediction.
    pub fn reconstruct(&mut self, plane: usize, differential: i16) -> i32 {
        let dc = differential as i32 * 8 + self.predictors[plane];
        self.predictors[plane] = dc;

        dc
    }
}

#[cfg(test)]
mod tests {
    use crate::decoder::cpu::dequant::{
        dc_plane, dequantize, dequantize_level, DcPredictors, DC_PREDICTOR_RESET,
    };
    use crate::parser::{DEFAULT_INTRA_QUANT_MATRIX, DEFAULT_NON_INTRA_QUANT_MATRIX};

    #[test]
    fn levels_are_forced_odd() {
        assert_eq!(0, dequantize_level(0, 8, 16));
        assert_eq!(17, dequantize_level(1, 8, 16));
        assert_eq!(-17, dequantize_level(-1, 8, 16));
        assert_eq!(49, dequantize_level(3, 8, 16));
        assert_eq!(1, dequantize_level(1, 1, 8));
        assert_eq!(0, dequantize_level(1, 1, 7));
    }

    #[test]
    fn levels_are_clamped() {
        assert_eq!(2047, dequantize_level(255, 31, 83));
        assert_eq!(-2048, dequantize_level(-255, 31, 83));
    }

    #[test]
    fn coefficients_leave_zigzag_order() {
        let mut levels = [0; 64];
        levels[1] = 1;
        levels[2] = -1;
        levels[63] = 2;

        let coefficients = dequantize(&levels, &DEFAULT_NON_INTRA_QUANT_MATRIX, 8);

        assert_eq!(17, coefficients[1]);
        assert_eq!(-17, coefficients[8]);
        assert_eq!(65, coefficients[63]);
        assert_eq!(3, coefficients.iter().filter(|c| **c != 0).count());
    }

    #[test]
    fn matrix_is_weighted_by_position() {
        let mut levels = [0; 64];
        levels[1] = 1;

        levels[3] = 1;

        let coefficients = dequantize(&levels, &DEFAULT_INTRA_QUANT_MATRIX, 8);

        assert_eq!(17, coefficients[1]);
        assert_eq!(19, coefficients[16]);
    }

    #[test]
    fn dc_prediction_runs_per_plane() {
        let mut predictors = DcPredictors::default();

        assert_eq!(DC_PREDICTOR_RESET, predictors.reconstruct(dc_plane(0), 0));
        assert_eq!(1032, predictors.reconstruct(dc_plane(1), 1));
        assert_eq!(1016, predictors.reconstruct(dc_plane(3), -2));
        assert_eq!(1024 - 40, predictors.reconstruct(dc_plane(4), -5));
        assert_eq!(1024 + 24, predictors.reconstruct(dc_plane(5), 3));
        assert_eq!(1016, predictors.reconstruct(dc_plane(2), 0));

        predictors.reset();
        assert_eq!(DC_PREDICTOR_RESET, predictors.reconstruct(dc_plane(4), 0));
    }
}
