//! MPEG-1 video decoder.

mod cpu;
mod frame_store;
mod picture;
mod state;
mod types;

pub use cpu::MotionVector;
pub use frame_store::{FrameSink, FrameStore};
pub use picture::DecodedPicture;
pub use state::{MacroblockVectors, MpegState};
pub use types::DecoderOption;
