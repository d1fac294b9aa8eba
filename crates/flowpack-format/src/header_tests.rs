use crate::FormatError;
use crate::constants::{MAGIC, MAJOR_VERSION};
use crate::header::Header;

#[test]
fn header_size() {
    assert_eq!(std::mem::size_of::<Header>(), 12);
}

#[test]
fn header_default() {
    let h = Header::default();
    assert!(h.validate_magic());
    assert!(h.validate_version());
    assert_eq!(h.decompressed_size, 0);
}

#[test]
fn header_bytes() {
    let h = Header::new(2, 0x0102_0304);
    assert_eq!(
        h.to_bytes(),
        [b'~', b'e', b'e', b'z', 3, 0, 2, 0, 0x04, 0x03, 0x02, 0x01]
    );
}

#[test]
fn header_roundtrip() {
    let h = Header {
        magic: MAGIC,
        major: MAJOR_VERSION,
        minor: 7,
        assets_type: 1,
        reserved: 0,
        decompressed_size: 4096,
    };
    let decoded = Header::from_bytes(&h.to_bytes()).unwrap();
    assert_eq!(decoded, h);
}

#[test]
fn header_truncated() {
    let err = Header::from_bytes(&[b'~', b'e', b'e']).unwrap_err();
    assert_eq!(
        err,
        FormatError::Truncated {
            needed: 12,
            actual: 3
        }
    );
}

#[test]
fn header_validate() {
    let mut h = Header::default();
    h.magic = *b"PTKQ";
    assert_eq!(h.validate(), Err(FormatError::InvalidMagic(*b"PTKQ")));

    let mut h = Header::default();
    h.major = 2;
    assert_eq!(
        h.validate(),
        Err(FormatError::UnsupportedVersion { major: 2, minor: 0 })
    );

    assert_eq!(Header::default().validate(), Ok(()));
}
