//! Decoder types

bitflags! {
    /// Options which influence the decoding of a bitstream.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DecoderOption : u8 {
        /// Recover from a corrupt slice by skipping ahead to the next start
        /// code instead of abandoning the whole stream.
        ///
        /// Only syntax errors and out-of-range values inside slices are
        /// recovered from. Whatever the damaged slice had already written to
        /// the picture stays there.
        const RESYNC_ON_ERROR = 0b1;

        /// Treat non-intra macroblocks that carry no coded block pattern as
        /// having no coded blocks at all.
        ///
        /// By default such macroblocks are decoded as if all six blocks were
        /// present.
        const STRICT_BLOCK_PATTERN = 0b10;
    }
}
