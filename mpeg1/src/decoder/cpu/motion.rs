//! Motion vector reconstruction

use crate::types::{MotionCode, MotionVectorRange};

/// A reconstructed motion vector, in half-sample units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionVector {
    pub horizontal: i32,
    pub vertical: i32,
}

/// Running prediction for one direction of motion within a slice.
///
/// Motion codes are transmitted as differences against the previous vector
/// of the same direction, wrapped into the range allowed by the picture's
/// `f_code`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionPredictor {
    horizontal: i32,
    vertical: i32,
}

/// Reconstruct one component, updating its predictor.
fn reconstruct_component(previous: &mut i32, f: i32, code: i8, residual: u8) -> i32 {
    let code = code as i32;
    let complement_r = if f == 1 || code == 0 {
        0
    } else {
        f - 1 - residual as i32
    };

    let (little, big) = match code.signum() {
        1 => {
            let little = code * f - complement_r;
            (little, little - 32 * f)
        }
        -1 => {
            let little = code * f + complement_r;
            (little, little + 32 * f)
        }
        _ => (0, 0),
    };

    let candidate = *previous + little;
    let reconstructed = if (-16 * f..16 * f).contains(&candidate) {
        candidate
    } else {
        *previous + big
    };

    *previous = reconstructed;

    reconstructed
}

impl MotionPredictor {
    /// Forget the previous vector.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reconstruct the vector signalled by `code` for a picture with motion
    /// `range`.
    ///
    /// Full-sample vectors are scaled into half-sample units on the way out;
    /// the prediction itself stays in the units the bitstream uses.
    pub fn reconstruct(&mut self, range: MotionVectorRange, code: &MotionCode) -> MotionVector {
        let f = range.f();
        let horizontal = reconstruct_component(
            &mut self.horizontal,
            f,
            code.horizontal_code,
            code.horizontal_residual,
        );
        let vertical = reconstruct_component(
            &mut self.vertical,
            f,
            code.vertical_code,
            code.vertical_residual,
        );

        if range.full_pel {
            MotionVector {
                horizontal: horizontal << 1,
                vertical: vertical << 1,
            }
        } else {
            MotionVector {
                horizontal,
                vertical,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::decoder::cpu::motion::{reconstruct_component, MotionPredictor, MotionVector};
    use crate::types::{MotionCode, MotionVectorRange};

    #[test]
    fn component_accumulates() {
        let mut previous = 0;

        assert_eq!(1, reconstruct_component(&mut previous, 1, 1, 0));
        assert_eq!(2, reconstruct_component(&mut previous, 1, 1, 0));
        assert_eq!(-1, reconstruct_component(&mut previous, 1, -3, 0));
        assert_eq!(-1, reconstruct_component(&mut previous, 1, 0, 0));
        assert_eq!(-1, previous);
    }

    #[test]
    fn component_wraps_around_the_range() {
        let mut previous = 15;
        assert_eq!(-16, reconstruct_component(&mut previous, 1, 1, 0));

        let mut previous = -16;
        assert_eq!(15, reconstruct_component(&mut previous, 1, -1, 0));

        let mut previous = 60;
        assert_eq!(-62, reconstruct_component(&mut previous, 4, 2, 1));
    }

    #[test]
    fn residual_refines_scaled_codes() {
        let mut previous = 0;
        assert_eq!(2, reconstruct_component(&mut previous, 2, 1, 1));

        let mut previous = 0;
        assert_eq!(1, reconstruct_component(&mut previous, 2, 1, 0));

        let mut previous = 0;
        assert_eq!(-1, reconstruct_component(&mut previous, 2, -1, 0));

        let mut previous = 0;
        assert_eq!(-7, reconstruct_component(&mut previous, 4, -2, 2));
    }

    #[test]
    fn full_pel_vectors_are_doubled() {
        let mut predictor = MotionPredictor::default();
        let range = MotionVectorRange {
            full_pel: true,
            f_code: 1,
        };
        let code = MotionCode {
            horizontal_code: 3,
            horizontal_residual: 0,
            vertical_code: -2,
            vertical_residual: 0,
        };

        assert_eq!(
            MotionVector {
                horizontal: 6,
                vertical: -4
            },
            predictor.reconstruct(range, &code)
        );
        assert_eq!(
            MotionVector {
                horizontal: 12,
                vertical: -8
            },
            predictor.reconstruct(range, &code)
        );

        predictor.reset();
        assert_eq!(MotionPredictor::default(), predictor);
    }
}
