//! Decoder primitives implemented on the CPU

mod dequant;
mod idct;
mod motion;
mod scatter;

pub use dequant::{dc_plane, dequantize, DcPredictors};
pub use idct::idct_block;
pub use motion::{MotionPredictor, MotionVector};
pub use scatter::scatter;
