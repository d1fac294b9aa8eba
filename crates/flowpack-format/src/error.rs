/// Fatal errors of the asset format layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("write to a data buffer after it was finalized")]
    WriteAfterFinalize,
    #[error("data buffer is not finalized")]
    NotFinalized,
    #[error("compression failed: {0}")]
    Compression(String),
    #[error("decompression failed: {0}")]
    Decompression(String),
    #[error("invalid magic {0:?}")]
    InvalidMagic([u8; 4]),
    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },
    #[error("truncated data: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("data buffer exceeds the 4 GiB offset range")]
    TooLarge,
}
