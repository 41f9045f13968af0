//! MPEG-1 decoder core

use crate::decoder::cpu::{
    dc_plane, dequantize, idct_block, scatter, DcPredictors, MotionPredictor, MotionVector,
};
use crate::decoder::frame_store::{FrameSink, FrameStore};
use crate::decoder::types::DecoderOption;
use crate::error::{Error, Result};
use crate::parser::{self, CodeTables, MpegReader};
use crate::types::{
    GroupOfPictures, Picture, PictureCodingType, SequenceHeader, Slice, GROUP_START_CODE,
    PICTURE_START_CODE, SEQUENCE_END_CODE, SEQUENCE_ERROR_CODE, SEQUENCE_HEADER_CODE,
};
use log::{debug, trace, warn};
use std::io::Read;

/// The motion vectors reconstructed for the most recently decoded
/// macroblock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroblockVectors {
    pub forward: Option<MotionVector>,
    pub backward: Option<MotionVector>,
}

/// Mutable state that lives for one slice.
#[derive(Clone, Debug, Default)]
struct SliceState {
    /// The quantizer scale in force; macroblocks may override it.
    quantizer_scale: u8,

    /// Address of the last decoded macroblock.
    macroblock_address: isize,

    /// Address of the last intra coded macroblock.
    past_intra_address: isize,

    /// No macroblock of this slice has been decoded yet.
    at_start: bool,

    dc_predictors: DcPredictors,
    forward_predictor: MotionPredictor,
    backward_predictor: MotionPredictor,
}

impl SliceState {
    fn start(&mut self, slice: &Slice, mb_width: usize) {
        self.quantizer_scale = slice.quantizer_scale;
        self.macroblock_address = (slice.vertical_position as isize - 1) * mb_width as isize - 1;
        self.past_intra_address = -2;
        self.at_start = true;
        self.forward_predictor.reset();
        self.backward_predictor.reset();
    }
}

/// All state necessary to decode an MPEG-1 video elementary stream.
pub struct MpegState {
    /// External decoder options enabled on this decoder.
    decoder_options: DecoderOption,

    /// Code tables used to decode every variable-length field.
    tables: CodeTables,

    /// The sequence header in force.
    sequence: Option<SequenceHeader>,

    /// The header of the group of pictures being decoded.
    group: Option<GroupOfPictures>,

    /// The header of the picture being decoded.
    picture: Option<Picture>,

    /// Reference and in-progress picture buffers. Allocated by the first
    /// sequence header.
    frame_store: Option<FrameStore>,

    slice: SliceState,

    motion_vectors: MacroblockVectors,
}

impl MpegState {
    /// Construct a new `MpegState` with the standard code tables.
    pub fn new(decoder_options: DecoderOption) -> Result<Self> {
        Ok(Self::with_tables(decoder_options, CodeTables::standard()?))
    }

    /// Construct a new `MpegState` that decodes with the given code tables.
    pub fn with_tables(decoder_options: DecoderOption, tables: CodeTables) -> Self {
        Self {
            decoder_options,
            tables,
            sequence: None,
            group: None,
            picture: None,
            frame_store: None,
            slice: SliceState::default(),
            motion_vectors: MacroblockVectors::default(),
        }
    }

    /// Get the sequence header in force, if one has been decoded.
    pub fn sequence_header(&self) -> Option<&SequenceHeader> {
        self.sequence.as_ref()
    }

    /// Get the header of the last group of pictures decoded.
    pub fn group_of_pictures(&self) -> Option<&GroupOfPictures> {
        self.group.as_ref()
    }

    /// Get the header of the last picture decoded.
    pub fn picture_header(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }

    /// Get the motion vectors of the last macroblock decoded.
    ///
    /// Vectors are reconstructed in half-sample units, but nothing is
    /// predicted from the reference pictures with them.
    pub fn motion_vectors(&self) -> MacroblockVectors {
        self.motion_vectors
    }

    /// Get the frame store, if a sequence header has been decoded.
    pub fn frame_store(&self) -> Option<&FrameStore> {
        self.frame_store.as_ref()
    }

    /// Decode a video sequence from `reader` up to and including its
    /// sequence end code.
    ///
    /// Anything in front of the first start code is skipped. Pictures are
    /// handed to `sink` in display order; the last reference picture is
    /// handed over once the sequence end code is found.
    ///
    /// Errors stop decoding where they happen, unless
    /// `DecoderOption::RESYNC_ON_ERROR` is set and the error happened inside
    /// a slice. The state is left as it was at the point of failure.
    pub fn decode_sequence<R, S>(
        &mut self,
        reader: &mut MpegReader<R>,
        sink: &mut S,
    ) -> Result<()>
    where
        R: Read,
        S: FrameSink + ?Sized,
    {
        reader.resync_to_start_code()?;

        loop {
            self.decode_sequence_header(reader, sink)?;

            loop {
                self.decode_group(reader, sink)?;

                if !reader.match_pattern(GROUP_START_CODE, false)? {
                    break;
                }
            }

            if !reader.match_pattern(SEQUENCE_HEADER_CODE, false)? {
                break;
            }
        }

        reader.expect_pattern(SEQUENCE_END_CODE, "sequence end code")?;

        if let Some(frame_store) = self.frame_store.as_mut() {
            frame_store.flush(sink);
        }

        Ok(())
    }

    fn decode_sequence_header<R, S>(
        &mut self,
        reader: &mut MpegReader<R>,
        sink: &mut S,
    ) -> Result<()>
    where
        R: Read,
        S: FrameSink + ?Sized,
    {
        let header = parser::decode_sequence_header(reader)?;

        debug!(
            "sequence header: {}x{}, picture rate {:?}, bit rate {}",
            header.horizontal_size,
            header.vertical_size,
            header.frame_rate(),
            header.bit_rate
        );

        let resized = match &self.frame_store {
            Some(frame_store) => {
                frame_store.width() != header.horizontal_size
                    || frame_store.height() != header.vertical_size
            }
            None => true,
        };

        if resized {
            if let Some(frame_store) = self.frame_store.as_mut() {
                frame_store.flush(sink);
            }

            self.frame_store = Some(FrameStore::new(
                header.horizontal_size,
                header.vertical_size,
            ));
        }

        self.sequence = Some(header);

        Ok(())
    }

    fn decode_group<R, S>(&mut self, reader: &mut MpegReader<R>, sink: &mut S) -> Result<()>
    where
        R: Read,
        S: FrameSink + ?Sized,
    {
        let group = parser::decode_group_of_pictures(reader)?;
        let time_code = group.time_code;

        debug!(
            "group of pictures at {:02}:{:02}:{:02}.{:02}, closed: {}, broken link: {}",
            time_code.hours,
            time_code.minutes,
            time_code.seconds,
            time_code.pictures,
            group.closed_gop,
            group.broken_link
        );

        self.group = Some(group);

        loop {
            self.decode_picture(reader, sink)?;

            if !reader.match_pattern(PICTURE_START_CODE, false)? {
                break;
            }
        }

        Ok(())
    }

    fn decode_picture<R, S>(&mut self, reader: &mut MpegReader<R>, sink: &mut S) -> Result<()>
    where
        R: Read,
        S: FrameSink + ?Sized,
    {
        let picture = parser::decode_picture_header(reader)?;

        debug!(
            "picture {} ({:?}), vbv delay {}",
            picture.temporal_reference, picture.coding_type, picture.vbv_delay
        );

        if !parser::is_slice_start_code(reader)? {
            return Err(Error::SyntaxViolation("slice start code"));
        }

        self.frame_store
            .as_mut()
            .ok_or(Error::InternalDecoderError)?
            .begin_picture(&picture, sink);
        self.picture = Some(picture);

        while parser::is_slice_start_code(reader)? {
            match self.decode_slice(reader) {
                Ok(()) => {}
                Err(e)
                    if e.is_recoverable()
                        && self
                            .decoder_options
                            .contains(DecoderOption::RESYNC_ON_ERROR) =>
                {
                    warn!("abandoning slice at bit {}: {}", reader.bit_position(), e);
                    self.resync(reader)?;
                }
                Err(e) => return Err(e),
            }
        }

        self.frame_store
            .as_mut()
            .ok_or(Error::InternalDecoderError)?
            .end_picture(sink);

        Ok(())
    }

    /// Move to the next start code that is not a sequence error code.
    fn resync<R>(&mut self, reader: &mut MpegReader<R>) -> Result<()>
    where
        R: Read,
    {
        reader.resync_to_start_code()?;

        while reader.match_pattern(SEQUENCE_ERROR_CODE, false)? {
            debug!("skipping sequence error code");
            reader.skip_bits(SEQUENCE_ERROR_CODE.len() as u32)?;
            reader.resync_to_start_code()?;
        }

        Ok(())
    }

    fn decode_slice<R>(&mut self, reader: &mut MpegReader<R>) -> Result<()>
    where
        R: Read,
    {
        let mb_width = self
            .sequence
            .as_ref()
            .ok_or(Error::InternalDecoderError)?
            .mb_width();
        let slice = parser::decode_slice_header(reader)?;

        trace!(
            "slice at row {}, quantizer scale {}",
            slice.vertical_position,
            slice.quantizer_scale
        );

        self.slice.start(&slice, mb_width);

        loop {
            self.decode_macroblock(reader)?;

            if parser::is_slice_end(reader)? {
                break;
            }
        }

        reader.resync_to_start_code()
    }

    fn decode_macroblock<R>(&mut self, reader: &mut MpegReader<R>) -> Result<()>
    where
        R: Read,
    {
        let sequence = self.sequence.as_ref().ok_or(Error::InternalDecoderError)?;
        let picture = self.picture.as_ref().ok_or(Error::InternalDecoderError)?;
        let slice = &mut self.slice;

        let macroblock =
            parser::decode_macroblock(reader, &self.tables, picture, self.decoder_options)?;

        let mb_width = sequence.mb_width();
        let address = slice.macroblock_address + macroblock.address_increment as isize;
        if address < 0 || address as usize >= mb_width * sequence.mb_height() {
            return Err(Error::SyntaxViolation("macroblock address within the picture"));
        }

        let is_predicted = picture.coding_type == PictureCodingType::Predicted;
        if is_predicted && !slice.at_start && macroblock.address_increment > 1 {
            slice.forward_predictor.reset();
        }

        slice.macroblock_address = address;
        slice.at_start = false;

        if let Some(quantizer_scale) = macroblock.quantizer_scale {
            slice.quantizer_scale = quantizer_scale;
        }

        let intra = macroblock.is_intra();
        if intra {
            if address - slice.past_intra_address > 1 {
                slice.dc_predictors.reset();
            }

            slice.forward_predictor.reset();
            slice.backward_predictor.reset();
        }

        let forward = match (macroblock.motion_forward, picture.forward_motion) {
            (Some(code), Some(range)) => Some(slice.forward_predictor.reconstruct(range, &code)),
            _ => None,
        };
        if forward.is_none() && !intra && is_predicted {
            slice.forward_predictor.reset();
        }

        let backward = match (macroblock.motion_backward, picture.backward_motion) {
            (Some(code), Some(range)) => Some(slice.backward_predictor.reconstruct(range, &code)),
            _ => None,
        };

        self.motion_vectors = MacroblockVectors { forward, backward };

        trace!(
            "macroblock {} ({:?}), quantizer scale {}, pattern {:06b}",
            address,
            macroblock.mb_type,
            slice.quantizer_scale,
            macroblock.coded_block_pattern
        );

        let mb_pos = (address as usize % mb_width, address as usize / mb_width);
        let matrix = if intra {
            &sequence.intra_quant_matrix
        } else {
            &sequence.non_intra_quant_matrix
        };
        let current = self
            .frame_store
            .as_mut()
            .ok_or(Error::InternalDecoderError)?
            .current_mut();

        for index in 0..6 {
            if !macroblock.codes_block(index) {
                continue;
            }

            let block =
                parser::decode_block(reader, &self.tables, index, intra, picture.coding_type)?;

            let mut coefficients = dequantize(&block.levels, matrix, slice.quantizer_scale);
            if let Some(differential) = block.intra_dc {
                coefficients[0] = slice
                    .dc_predictors
                    .reconstruct(dc_plane(index), differential);
            }

            let mut samples = [0; 64];
            idct_block(&coefficients, &mut samples);
            scatter(current, index, mb_pos, &samples);
        }

        if picture.coding_type == PictureCodingType::DcOnly {
            reader.expect_pattern("1", "end of macroblock")?;
        }

        if intra {
            slice.past_intra_address = address;
        }

        Ok(())
    }
}
