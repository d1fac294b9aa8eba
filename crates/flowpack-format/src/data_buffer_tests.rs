use crate::FormatError;
use crate::data_buffer::{DataBuffer, TextEncoding};

fn words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[test]
fn scalars_little_endian() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_u8(1);
    buf.write_u16(0x0203);
    buf.write_u32(0x0405_0607);
    buf.write_i16(-2);
    buf.write_i8(-1);
    buf.finalize().unwrap();

    assert_eq!(
        buf.as_bytes().unwrap(),
        &[1, 0x03, 0x02, 0x07, 0x06, 0x05, 0x04, 0xFE, 0xFF, 0xFF]
    );
}

#[test]
fn strings_by_encoding() {
    let mut utf8 = DataBuffer::new(TextEncoding::Utf8);
    utf8.write_string("Aé");
    utf8.finalize().unwrap();
    assert_eq!(utf8.as_bytes().unwrap(), &[0x41, 0xC3, 0xA9, 0]);

    let mut utf16 = DataBuffer::new(TextEncoding::Utf16);
    utf16.write_string("Aé");
    utf16.finalize().unwrap();
    assert_eq!(utf16.as_bytes().unwrap(), &[0x41, 0, 0xE9, 0, 0, 0]);
}

#[test]
fn object_offset_is_backpatched_after_alignment() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_u32(7);
    buf.write_object_offset(4, |b| b.write_u16(0xAABB));
    buf.write_u8(9);
    buf.finalize().unwrap();

    assert_eq!(
        buf.as_bytes().unwrap(),
        &[7, 0, 0, 0, 12, 0, 0, 0, 9, 0, 0, 0, 0xBB, 0xAA]
    );
}

#[test]
fn objects_are_written_breadth_first() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_object_offset(4, |b| {
        b.write_u32(1);
        b.write_object_offset(4, |b| b.write_u32(3));
    });
    buf.write_object_offset(4, |b| b.write_u32(2));
    buf.finalize().unwrap();

    assert_eq!(words(buf.as_bytes().unwrap()), vec![8, 16, 1, 20, 2, 3]);
}

#[test]
fn empty_list_is_two_zero_words() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_list(Vec::<u32>::new(), 4, |b, v| b.write_u32(v));
    buf.finalize().unwrap();
    assert_eq!(buf.as_bytes().unwrap(), &[0; 8]);
}

#[test]
fn list_writes_offset_table() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_list(vec!["a", "bc"], 1, |b, s| b.write_string(s));
    buf.finalize().unwrap();

    assert_eq!(
        buf.as_bytes().unwrap(),
        &[
            2, 0, 0, 0, // count
            8, 0, 0, 0, // table
            16, 0, 0, 0, // "a"
            18, 0, 0, 0, // "bc"
            b'a', 0, b'b', b'c', 0,
        ]
    );
}

#[test]
fn array_items_are_inline_and_aligned() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_array(&[1u8, 2, 3], 2, |b, v| b.write_u8(*v));
    buf.finalize().unwrap();
    assert_eq!(buf.as_bytes().unwrap(), &[3, 0, 0, 0, 1, 0, 2, 0, 3]);
}

#[test]
fn array_offset_points_at_count() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_array_offset(vec![0x1111u16, 0x2222], 2, |b, v| b.write_u16(*v));
    buf.finalize().unwrap();
    assert_eq!(
        buf.as_bytes().unwrap(),
        &[4, 0, 0, 0, 2, 0, 0, 0, 0x11, 0x11, 0x22, 0x22]
    );
}

#[test]
fn utf16_string_offset_is_two_aligned() {
    let mut buf = DataBuffer::new(TextEncoding::Utf16);
    buf.write_u8(0xEE);
    buf.write_string_offset("A");
    buf.finalize().unwrap();
    // slot sits at 1..5, the string at 6 after one byte of padding
    assert_eq!(
        buf.as_bytes().unwrap(),
        &[0xEE, 6, 0, 0, 0, 0, 0x41, 0, 0, 0]
    );
}

#[test]
fn bytes_require_finalize() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_u8(1);
    assert_eq!(buf.as_bytes(), Err(FormatError::NotFinalized));
    assert_eq!(buf.compress(), Err(FormatError::NotFinalized));
}

#[test]
fn write_after_finalize_is_sticky() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_u8(1);
    buf.finalize().unwrap();

    buf.write_u32(5);
    assert_eq!(buf.len(), 1);
    assert_eq!(buf.as_bytes(), Err(FormatError::WriteAfterFinalize));
    assert_eq!(buf.finalize(), Err(FormatError::WriteAfterFinalize));
    assert_eq!(buf.into_bytes(), Err(FormatError::WriteAfterFinalize));
}

#[test]
fn finalize_is_idempotent() {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_object_offset(4, |b| b.write_u8(1));
    buf.finalize().unwrap();
    buf.finalize().unwrap();
    assert_eq!(buf.into_bytes().unwrap(), vec![4, 0, 0, 0, 1]);
}
