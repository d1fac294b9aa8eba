//! Assets blob header (12 bytes).
//!
//! Layout:
//! - 0-3: magic `~eez`
//! - 4: major version, 5: minor version
//! - 6: assets type (project type code)
//! - 7: reserved
//! - 8-11: size of the payload after decompression

use crate::FormatError;
use crate::constants::{HEADER_SIZE, MAGIC, MAJOR_VERSION, MINOR_VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Header {
    pub magic: [u8; 4],
    pub major: u8,
    pub minor: u8,
    pub assets_type: u8,
    pub reserved: u8,
    pub decompressed_size: u32,
}

const _: () = assert!(std::mem::size_of::<Header>() == HEADER_SIZE);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            major: MAJOR_VERSION,
            minor: MINOR_VERSION,
            assets_type: 0,
            reserved: 0,
            decompressed_size: 0,
        }
    }
}

impl Header {
    pub fn new(assets_type: u8, decompressed_size: u32) -> Self {
        Self {
            assets_type,
            decompressed_size,
            ..Self::default()
        }
    }

    /// Decode a header from the first 12 bytes of `bytes`.
    ///
    /// Only the length is checked here; use [`Header::validate`] for the rest.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::Truncated {
                needed: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            major: bytes[4],
            minor: bytes[5],
            assets_type: bytes[6],
            reserved: bytes[7],
            decompressed_size: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.major;
        bytes[5] = self.minor;
        bytes[6] = self.assets_type;
        bytes[7] = self.reserved;
        bytes[8..12].copy_from_slice(&self.decompressed_size.to_le_bytes());
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.major == MAJOR_VERSION
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        if !self.validate_magic() {
            return Err(FormatError::InvalidMagic(self.magic));
        }
        if !self.validate_version() {
            return Err(FormatError::UnsupportedVersion {
                major: self.major,
                minor: self.minor,
            });
        }
        Ok(())
    }
}
