//! Decoded block storage

use crate::decoder::picture::DecodedPicture;

/// Scatter an individual block into a pixel data array.
///
/// Pixel data and block data are assumed to be in row-major (x + y*width)
/// order.
fn scatter_block(
    pixel_data: &mut [u8],
    samples_per_row: usize,
    pos: (usize, usize),
    block_data: &[u8; 64],
) {
    for (v, row) in block_data.chunks_exact(8).enumerate() {
        let start = pos.0 + (pos.1 + v) * samples_per_row;

        if let Some(pixels) = pixel_data.get_mut(start..start + 8) {
            pixels.copy_from_slice(row);
        }
    }
}

/// Copy block `index` (0-3 luma, 4 Cb, 5 Cr) of the macroblock at `mb_pos`,
/// given in macroblock columns and rows, into a picture.
pub fn scatter(
    picture: &mut DecodedPicture,
    index: usize,
    mb_pos: (usize, usize),
    block_data: &[u8; 64],
) {
    match index {
        0..=3 => {
            let samples_per_row = picture.luma_samples_per_row();
            let pos = (
                mb_pos.0 * 16 + (index & 1) * 8,
                mb_pos.1 * 16 + (index >> 1) * 8,
            );

            scatter_block(picture.as_luma_mut(), samples_per_row, pos, block_data);
        }
        4 => {
            let samples_per_row = picture.chroma_samples_per_row();

            scatter_block(
                picture.as_chroma_b_mut(),
                samples_per_row,
                (mb_pos.0 * 8, mb_pos.1 * 8),
                block_data,
            );
        }
        _ => {
            let samples_per_row = picture.chroma_samples_per_row();

            scatter_block(
                picture.as_chroma_r_mut(),
                samples_per_row,
                (mb_pos.0 * 8, mb_pos.1 * 8),
                block_data,
            );
        }
    }
}
