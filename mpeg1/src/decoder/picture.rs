//! Decoded picture type

use crate::types::Picture;

/// A decoded picture.
///
/// Sample planes always cover whole macroblocks; the displayable area is the
/// top-left `width` by `height` luma samples of them.
pub struct DecodedPicture {
    /// The header of the picture last decoded into this buffer.
    picture_header: Option<Picture>,

    /// Displayable width in luma samples.
    width: u16,

    /// Displayable height in luma samples.
    height: u16,

    /// The luma data of the decoded picture.
    luma: Vec<u8>,

    /// The u-component chroma data of the decoded picture.
    chroma_b: Vec<u8>,

    /// The v-component chroma data of the decoded picture.
    chroma_r: Vec<u8>,
}

impl DecodedPicture {
    /// Construct an empty `DecodedPicture` large enough for pictures of the
    /// given displayable size.
    pub fn new(width: u16, height: u16) -> Self {
        let mb_width = (width as usize + 15) / 16;
        let mb_height = (height as usize + 15) / 16;

        let luma_samples = mb_width * 16 * mb_height * 16;
        let chroma_samples = luma_samples / 4;

        Self {
            picture_header: None,
            width,
            height,
            luma: vec![0; luma_samples],
            chroma_b: vec![0; chroma_samples],
            chroma_r: vec![0; chroma_samples],
        }
    }

    /// Get the header this picture was decoded with.
    ///
    /// `None` if nothing has been decoded into this buffer yet.
    pub fn as_header(&self) -> Option<&Picture> {
        self.picture_header.as_ref()
    }

    pub(crate) fn set_header(&mut self, picture_header: Picture) {
        self.picture_header = Some(picture_header);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the luma data for this picture.
    pub fn as_luma(&self) -> &[u8] {
        &self.luma
    }

    /// Get the luma data for this picture, mutably.
    pub fn as_luma_mut(&mut self) -> &mut [u8] {
        &mut self.luma
    }

    /// Get how many luma samples exist per row.
    pub fn luma_samples_per_row(&self) -> usize {
        (self.width as usize + 15) / 16 * 16
    }

    /// Get how many chroma samples exist per row.
    pub fn chroma_samples_per_row(&self) -> usize {
        self.luma_samples_per_row() / 2
    }

    /// Get the chroma-B data for this picture.
    pub fn as_chroma_b(&self) -> &[u8] {
        &self.chroma_b
    }

    /// Get the chroma-B data for this picture, mutably.
    pub fn as_chroma_b_mut(&mut self) -> &mut [u8] {
        &mut self.chroma_b
    }

    /// Get the chroma-R data for this picture.
    pub fn as_chroma_r(&self) -> &[u8] {
        &self.chroma_r
    }

    /// Get the chroma-R data for this picture, mutably.
    pub fn as_chroma_r_mut(&mut self) -> &mut [u8] {
        &mut self.chroma_r
    }
}
