//! Inverse discrete cosine transform

use std::f32::consts::PI;

lazy_static! {
    /// `IDCT_BASIS[x][u]` is `C(u)/2 * cos((2x + 1) * u * pi / 16)`, where
    /// `C(0)` is `1/sqrt(2)` and every other `C(u)` is one.
    static ref IDCT_BASIS: [[f32; 8]; 8] = {
        let mut basis = [[0.0; 8]; 8];

        for (x, row) in basis.iter_mut().enumerate() {
            for (u, weight) in row.iter_mut().enumerate() {
                let cu = if u == 0 { 1.0 / f32::sqrt(2.0) } else { 1.0 };

                *weight = cu / 2.0 * f32::cos(PI * (2.0 * x as f32 + 1.0) * u as f32 / 16.0);
            }
        }

        basis
    };
}

/// Run the one-dimensional IDCT over every row of `block`.
fn idct_rows(block: &mut [f32; 64]) {
    for row in block.chunks_exact_mut(8) {
        let mut transformed = [0.0; 8];

        for (x, sample) in transformed.iter_mut().enumerate() {
            *sample = IDCT_BASIS[x]
                .iter()
                .zip(row.iter())
                .map(|(weight, coeff)| weight * coeff)
                .sum();
        }

        row.copy_from_slice(&transformed);
    }
}

fn transpose(block: &mut [f32; 64]) {
    for y in 0..8 {
        for x in y + 1..8 {
            block.swap(x + y * 8, y + x * 8);
        }
    }
}

/// Given a block of coefficients, transform it back to the spatial domain.
///
/// The input of this function, `coefficients`, is an 8x8 block of
/// dequantized, dezigzagged transform coefficients in row-major (x + y*8)
/// order. The output is written to `output` in the same order, rounded and
/// clamped to the range of a sample.
pub fn idct_block(coefficients: &[i32; 64], output: &mut [u8; 64]) {
    let mut block = [0.0; 64];
    for (sample, coeff) in block.iter_mut().zip(coefficients.iter()) {
        *sample = *coeff as f32;
    }

    idct_rows(&mut block);
    transpose(&mut block);
    idct_rows(&mut block);
    transpose(&mut block);

    for (pixel, sample) in output.iter_mut().zip(block.iter()) {
        *pixel = sample.round().clamp(0.0, 255.0) as u8;
    }
}
