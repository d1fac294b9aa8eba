use crate::FormatError;
use crate::compress::{compress, decompress, pack, unpack};
use crate::constants::HEADER_SIZE;

fn sample() -> Vec<u8> {
    (0..2048u32).map(|i| (i % 7) as u8).collect()
}

#[test]
fn compress_shrinks_repetitive_data() {
    let data = sample();
    let compressed = compress(&data).unwrap();
    assert!(compressed.len() < data.len());
    assert_eq!(decompress(&compressed, data.len()).unwrap(), data);
}

#[test]
fn compress_empty() {
    let compressed = compress(&[]).unwrap();
    assert_eq!(decompress(&compressed, 0).unwrap(), Vec::<u8>::new());
}

#[test]
fn pack_writes_header() {
    let data = sample();
    let blob = pack(1, &data).unwrap();

    assert_eq!(&blob[0..4], b"~eez");
    assert_eq!(blob[4], 3);
    assert_eq!(blob[5], 0);
    assert_eq!(blob[6], 1);
    assert_eq!(u32::from_le_bytes([blob[8], blob[9], blob[10], blob[11]]), 2048);

    let (header, payload) = unpack(&blob).unwrap();
    assert_eq!(header.assets_type, 1);
    assert_eq!(payload, data);
}

#[test]
fn unpack_rejects_bad_magic() {
    let mut blob = pack(2, &sample()).unwrap();
    blob[0] = b'!';
    assert_eq!(
        unpack(&blob).unwrap_err(),
        FormatError::InvalidMagic(*b"!eez")
    );
}

#[test]
fn unpack_rejects_corrupt_payload() {
    let blob = pack(2, &sample()).unwrap();
    let err = unpack(&blob[..HEADER_SIZE + 4]).unwrap_err();
    assert!(
        matches!(
            err,
            FormatError::Decompression(_) | FormatError::Truncated { .. }
        ),
        "{err:?}"
    );
}
