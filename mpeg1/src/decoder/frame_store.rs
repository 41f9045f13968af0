//! Reference picture storage and display reordering
//!
//! Pictures arrive in coding order, in which every reference picture (I or
//! P) precedes the B-pictures displayed before it. Three buffers cover this:
//! the older reference, the newer reference, and the picture being decoded.

use crate::decoder::picture::DecodedPicture;
use crate::types::Picture;

/// A consumer of pictures in display order.
pub trait FrameSink {
    fn present(&mut self, picture: &DecodedPicture);
}

impl<F> FrameSink for F
where
    F: FnMut(&DecodedPicture),
{
    fn present(&mut self, picture: &DecodedPicture) {
        self(picture)
    }
}

/// Which buffer plays which part at the moment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Roles {
    /// The older of the two reference pictures.
    forward: usize,

    /// The newer of the two reference pictures.
    backward: usize,

    /// The picture being decoded.
    current: usize,
}

/// The forward, backward and current picture buffers of a sequence.
pub struct FrameStore {
    buffers: [DecodedPicture; 3],

    /// Buffers holding a decoded picture that has not been presented yet.
    undisplayed: [bool; 3],

    roles: Roles,
}

impl FrameStore {
    /// Allocate buffers for pictures of the given displayable size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffers: [
                DecodedPicture::new(width, height),
                DecodedPicture::new(width, height),
                DecodedPicture::new(width, height),
            ],
            undisplayed: [false; 3],
            roles: Roles {
                forward: 0,
                backward: 1,
                current: 2,
            },
        }
    }

    pub fn width(&self) -> u16 {
        self.buffers[0].width()
    }

    pub fn height(&self) -> u16 {
        self.buffers[0].height()
    }

    fn present<S>(&mut self, slot: usize, sink: &mut S)
    where
        S: FrameSink + ?Sized,
    {
        if self.undisplayed[slot] {
            self.undisplayed[slot] = false;
            sink.present(&self.buffers[slot]);
        }
    }

    /// Prepare the current buffer for a picture with the given header.
    ///
    /// A new reference picture makes the previous newer reference the older
    /// one, which is then due for display.
    pub fn begin_picture<S>(&mut self, picture_header: &Picture, sink: &mut S)
    where
        S: FrameSink + ?Sized,
    {
        if !picture_header.coding_type.is_bidirectional() {
            std::mem::swap(&mut self.roles.forward, &mut self.roles.backward);
            self.present(self.roles.forward, sink);
        }

        let current = self.roles.current;
        self.undisplayed[current] = false;
        self.buffers[current].set_header(picture_header.clone());
    }

    /// The buffer the picture being decoded is written into.
    pub fn current(&self) -> &DecodedPicture {
        &self.buffers[self.roles.current]
    }

    pub fn current_mut(&mut self) -> &mut DecodedPicture {
        &mut self.buffers[self.roles.current]
    }

    /// The older reference picture.
    pub fn forward_reference(&self) -> &DecodedPicture {
        &self.buffers[self.roles.forward]
    }

    /// The newer reference picture.
    pub fn backward_reference(&self) -> &DecodedPicture {
        &self.buffers[self.roles.backward]
    }

    /// Finish the current picture.
    ///
    /// B-pictures are displayed straight away. Reference pictures become the
    /// newer reference and wait for the next reference picture.
    pub fn end_picture<S>(&mut self, sink: &mut S)
    where
        S: FrameSink + ?Sized,
    {
        let current = self.roles.current;
        let bidirectional = self.buffers[current]
            .as_header()
            .map(|header| header.coding_type.is_bidirectional())
            .unwrap_or(false);

        self.undisplayed[current] = true;

        if bidirectional {
            self.present(current, sink);
        } else {
            std::mem::swap(&mut self.roles.current, &mut self.roles.backward);
        }
    }

    /// Display the last reference picture, if it is still waiting.
    pub fn flush<S>(&mut self, sink: &mut S)
    where
        S: FrameSink + ?Sized,
    {
        self.present(self.roles.backward, sink);
    }
}
