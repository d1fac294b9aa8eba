use flowpack_core::Colors;
use indoc::indoc;

use crate::compress::pack;
use crate::constants::assets_type;
use crate::data_buffer::{DataBuffer, TextEncoding};
use crate::dump::{dump, dump_payload};
use crate::header::Header;

/// Smallest LVGL payload: settings plus empty tables.
fn lvgl_payload() -> Vec<u8> {
    let mut buf = DataBuffer::new(TextEncoding::Utf8);
    buf.write_object_offset(4, |b| {
        b.write_u16(480);
        b.write_u16(272);
    });
    buf.write_u32(0);
    buf.write_list(Vec::<u32>::new(), 4, |b, v| b.write_u32(v));
    buf.write_list(Vec::<u32>::new(), 4, |b, v| b.write_u32(v));
    buf.write_u32(0);
    buf.write_list(Vec::<u32>::new(), 8, |b, v| b.write_u32(v));
    buf.finalize().unwrap();
    buf.into_bytes().unwrap()
}

#[test]
fn dump_lvgl_payload() {
    let payload = lvgl_payload();
    let header = Header::new(assets_type::LVGL, payload.len() as u32);
    let out = dump_payload(&header, &payload, Colors::OFF).unwrap();

    insta::assert_snapshot!(out, @r"
    [header]
    magic        ~eez
    version      3.0
    assets_type  2
    size         40

    [top]
    settings        @00000024
    colors          @00000000
    action_names    0 @00000000
    variable_names  0 @00000000
    flow_definition @00000000
    languages       0 @00000000

    [settings]
    display         480x272

    [data]
    00000000  24 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
    00000010  00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
    00000020  00 00 00 00 e0 01 10 01
    ");
}

#[test]
fn dump_blob_reports_compressed_size() {
    let payload = lvgl_payload();
    let blob = pack(assets_type::LVGL, &payload).unwrap();
    let out = dump(&blob, Colors::OFF).unwrap();

    let expected_head = indoc! {"
        [header]
        magic        ~eez
        version      3.0
        assets_type  2
        size         40
    "};
    assert!(out.starts_with(expected_head), "{out}");
    assert!(out.contains(&format!("compressed   {}\n\n[top]", blob.len() - 12)));
}

#[test]
fn dump_truncated_payload() {
    let header = Header::new(assets_type::FIRMWARE, 8);
    let err = dump_payload(&header, &[0; 8], Colors::OFF).unwrap_err();
    assert_eq!(
        err,
        crate::FormatError::Truncated {
            needed: 12,
            actual: 8
        }
    );
}
