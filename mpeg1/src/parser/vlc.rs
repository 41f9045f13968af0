//! Variable-length-code trees

use crate::error::{Error, Result};
use crate::parser::reader::MpegReader;
use std::io::Read;

/// A single node in a code tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Entry<T> {
    /// A completed code.
    ///
    /// The value in `End` will be returned when it is reached in the tree.
    End(T),

    /// A fork in the tree.
    ///
    /// Upon encountering a fork, another bit in the bitstream should be read
    /// and used to index the children. A missing child means that no code
    /// continues with that bit.
    Fork([Option<usize>; 2]),
}

/// A binary prefix-code tree yielding `T`.
///
/// Nodes live in a flat arena with the root at index zero. The tree is built
/// once from `(bit string, value)` pairs and only read afterwards.
#[derive(Clone, Debug)]
pub struct HuffmanTree<T> {
    entries: Vec<Entry<T>>,
}

impl<T: Copy> HuffmanTree<T> {
    /// Construct a tree that contains no codes.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::Fork([None, None])],
        }
    }

    /// Construct a tree holding every listed code.
    pub fn from_codes(codes: &[(&str, T)]) -> Result<Self> {
        let mut tree = Self::new();

        for (code, value) in codes {
            tree.insert(code, *value)?;
        }

        Ok(tree)
    }

    /// Add a code to the tree.
    ///
    /// Fails if the code is empty or not made of `'0'` and `'1'`, and if it
    /// would make the tree ambiguous: extending an existing code, being a
    /// prefix of existing codes, or repeating one.
    pub fn insert(&mut self, code: &str, value: T) -> Result<()> {
        if code.is_empty() {
            return Err(Error::MalformedCode(code.to_string()));
        }

        let mut index = 0;
        for symbol in code.bytes() {
            let bit = match symbol {
                b'0' => 0,
                b'1' => 1,
                _ => return Err(Error::MalformedCode(code.to_string())),
            };

            let child = match &self.entries[index] {
                Entry::End(_) => return Err(Error::ConflictingCode(code.to_string())),
                Entry::Fork(children) => children[bit],
            };

            index = match child {
                Some(child) => child,
                None => {
                    let child = self.entries.len();
                    self.entries.push(Entry::Fork([None, None]));
                    if let Entry::Fork(children) = &mut self.entries[index] {
                        children[bit] = Some(child);
                    }

                    child
                }
            };
        }

        match self.entries[index] {
            Entry::Fork([None, None]) => {
                self.entries[index] = Entry::End(value);
                Ok(())
            }
            _ => Err(Error::ConflictingCode(code.to_string())),
        }
    }

    /// Read one code from the bitstream and yield its value.
    ///
    /// A bit sequence that leaves the tree yields `Error::InvalidCode`. The
    /// bits read up to that point stay consumed.
    pub fn decode<R: Read>(&self, reader: &mut MpegReader<R>) -> Result<T> {
        let mut index = 0;

        loop {
            match &self.entries[index] {
                Entry::End(value) => return Ok(*value),
                Entry::Fork(children) => {
                    let bit = reader.read_bit()?;
                    index = children[bit as usize].ok_or(Error::InvalidCode)?;
                }
            }
        }
    }
}

impl<T: Copy> Default for HuffmanTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::parser::reader::MpegReader;
    use crate::parser::vlc::HuffmanTree;

    const CODES: [(&str, u8); 5] = [("1", 0), ("010", 1), ("011", 2), ("0010", 3), ("0011", 4)];

    #[test]
    #[allow(clippy::inconsistent_digit_grouping)]
    fn decode_every_inserted_code() {
        let tree = HuffmanTree::from_codes(&CODES).unwrap();
        let bit_pattern = [0b1_010_011_0, 0b010_0011_0];
        let mut reader = MpegReader::from_source(&bit_pattern[..]);

        assert_eq!(0, tree.decode(&mut reader).unwrap());
        assert_eq!(1, tree.decode(&mut reader).unwrap());
        assert_eq!(2, tree.decode(&mut reader).unwrap());
        assert_eq!(3, tree.decode(&mut reader).unwrap());
        assert_eq!(4, tree.decode(&mut reader).unwrap());
        assert_eq!(15, reader.bit_position());
    }

    #[test]
    fn missing_leaf_is_an_error() {
        let tree = HuffmanTree::from_codes(&CODES).unwrap();
        let bit_pattern = [0b0001_0000];
        let mut reader = MpegReader::from_source(&bit_pattern[..]);

        assert!(matches!(tree.decode(&mut reader), Err(Error::InvalidCode)));
    }

    #[test]
    fn empty_tree_decodes_nothing() {
        let tree = HuffmanTree::<u8>::new();
        let bit_pattern = [0xFF];
        let mut reader = MpegReader::from_source(&bit_pattern[..]);

        assert!(matches!(tree.decode(&mut reader), Err(Error::InvalidCode)));
    }

    #[test]
    fn conflicting_codes_are_rejected() {
        let mut tree = HuffmanTree::from_codes(&CODES).unwrap();

        assert!(matches!(
            tree.insert("10", 9),
            Err(Error::ConflictingCode(code)) if code == "10"
        ));
        assert!(matches!(
            tree.insert("01", 9),
            Err(Error::ConflictingCode(_))
        ));
        assert!(matches!(
            tree.insert("010", 9),
            Err(Error::ConflictingCode(_))
        ));

        tree.insert("0001", 5).unwrap();
    }

    #[test]
    fn malformed_codes_are_rejected() {
        let mut tree = HuffmanTree::new();

        assert!(matches!(tree.insert("", 1), Err(Error::MalformedCode(_))));
        assert!(matches!(tree.insert("012", 1), Err(Error::MalformedCode(_))));
    }
}
