use serde::{Deserialize, Serialize};

/// Byte layouts a public key can be serialized to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `0x02 | 0x03` parity tag followed by X.
    Compressed,
    /// `0x04` followed by X and Y.
    Uncompressed,
    /// X only, Y parity implied even (BIP-340).
    XOnly,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::XOnly, Format::Compressed, Format::Uncompressed];

    pub const fn length(self) -> usize {
        match self {
            Format::Compressed => 33,
            Format::Uncompressed => 65,
            Format::XOnly => 32,
        }
    }

    /// Infers the format from an encoded length.
    pub fn from_length(length: usize) -> Option<Format> {
        Format::ALL
            .into_iter()
            .find(|format| format.length() == length)
    }

    /// Lengths accepted when no format is declared.
    pub fn acceptable_lengths() -> Vec<usize> {
        Format::ALL.iter().map(|format| format.length()).collect()
    }

    /// Leading tag byte, if the format carries one.
    pub const fn tag(self, y_is_odd: bool) -> Option<u8> {
        match self {
            Format::Compressed if y_is_odd => Some(0x03),
            Format::Compressed => Some(0x02),
            Format::Uncompressed => Some(0x04),
            Format::XOnly => None,
        }
    }
}
