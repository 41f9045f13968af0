//! Traits

use num_traits::{CheckedShl, Zero};
use std::ops::BitOr;

/// An unsigned integer type that bits can be shifted into, most significant
/// bit first.
pub trait BitReadable: Copy + CheckedShl + BitOr<Self, Output = Self> + Zero + From<u8> {}

impl<T> BitReadable for T where T: Copy + CheckedShl + BitOr<Self, Output = Self> + Zero + From<u8>
{}
