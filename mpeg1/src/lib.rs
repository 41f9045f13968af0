//! Pure-rust MPEG-1 video decoder

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate lazy_static;

mod error;

pub mod decoder;
pub mod parser;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_util;

pub use decoder::{DecodedPicture, DecoderOption, FrameSink, MpegState};
pub use error::{Error, ErrorKind, Result};
pub use parser::MpegReader;
