//! LZ4 block compression of the assets payload and blob packing.
//!
//! The payload is compressed in the raw block format (no frame, no size
//! prefix); its decompressed size travels in the [`Header`].

use lz4_flex::block;

use crate::FormatError;
use crate::constants::HEADER_SIZE;
use crate::header::Header;

pub fn compress(data: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut out = vec![0u8; block::get_maximum_output_size(data.len())];
    let len = block::compress_into(data, &mut out)
        .map_err(|e| FormatError::Compression(e.to_string()))?;
    out.truncate(len);
    Ok(out)
}

pub fn decompress(data: &[u8], size: usize) -> Result<Vec<u8>, FormatError> {
    block::decompress(data, size).map_err(|e| FormatError::Decompression(e.to_string()))
}

/// Header followed by the compressed payload.
pub fn pack(assets_type: u8, payload: &[u8]) -> Result<Vec<u8>, FormatError> {
    let size = u32::try_from(payload.len()).map_err(|_| FormatError::TooLarge)?;
    let compressed = compress(payload)?;
    log::debug!(
        "packed assets: {} bytes -> {} bytes",
        payload.len(),
        compressed.len()
    );

    let mut blob = Vec::with_capacity(HEADER_SIZE + compressed.len());
    blob.extend_from_slice(&Header::new(assets_type, size).to_bytes());
    blob.extend_from_slice(&compressed);
    Ok(blob)
}

/// Validate the header of `blob` and decompress its payload.
pub fn unpack(blob: &[u8]) -> Result<(Header, Vec<u8>), FormatError> {
    let header = Header::from_bytes(blob)?;
    header.validate()?;
    let payload = decompress(&blob[HEADER_SIZE..], header.decompressed_size as usize)?;
    if payload.len() != header.decompressed_size as usize {
        return Err(FormatError::Truncated {
            needed: header.decompressed_size as usize,
            actual: payload.len(),
        });
    }
    Ok((header, payload))
}
