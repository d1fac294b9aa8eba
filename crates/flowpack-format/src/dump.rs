//! Human-readable dump of an assets blob for debugging.

use std::fmt::Write as _;

use flowpack_core::Colors;

use crate::FormatError;
use crate::compress::unpack;
use crate::constants::{HEADER_SIZE, assets_type};
use crate::header::Header;

/// Field of the top-level payload struct.
#[derive(Clone, Copy)]
enum Field {
    Ptr(&'static str),
    List(&'static str),
}

fn top_level_fields(assets_type: u8) -> Vec<Field> {
    let mut fields = vec![Field::Ptr("settings")];
    if assets_type != assets_type::LVGL {
        fields.extend([
            Field::List("pages"),
            Field::List("styles"),
            Field::List("fonts"),
            Field::List("bitmaps"),
        ]);
    }
    fields.extend([
        Field::Ptr("colors"),
        Field::List("action_names"),
        Field::List("variable_names"),
        Field::Ptr("flow_definition"),
        Field::List("languages"),
    ]);
    fields
}

fn read_u16(payload: &[u8], offset: usize) -> Result<u16, FormatError> {
    match payload.get(offset..offset + 2) {
        Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
        None => Err(FormatError::Truncated {
            needed: offset + 2,
            actual: payload.len(),
        }),
    }
}

fn read_u32(payload: &[u8], offset: usize) -> Result<u32, FormatError> {
    match payload.get(offset..offset + 4) {
        Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(FormatError::Truncated {
            needed: offset + 4,
            actual: payload.len(),
        }),
    }
}

/// Validate, decompress and describe a complete blob.
pub fn dump(blob: &[u8], colors: Colors) -> Result<String, FormatError> {
    let (header, payload) = unpack(blob)?;
    let mut out = dump_payload(&header, &payload, colors)?;
    let c = &colors;
    let compressed = format!(
        "{}compressed{}   {}\n",
        c.blue,
        c.reset,
        blob.len() - HEADER_SIZE
    );
    // Keep the compressed size inside the [header] block.
    let at = out.find("\n\n").map_or(out.len(), |i| i + 1);
    out.insert_str(at, &compressed);
    Ok(out)
}

/// Describe an already decompressed payload.
pub fn dump_payload(header: &Header, payload: &[u8], colors: Colors) -> Result<String, FormatError> {
    let c = &colors;
    let mut out = String::new();

    writeln!(out, "{}[header]{}", c.blue, c.reset).unwrap();
    writeln!(
        out,
        "{}magic{}        {}{}{}",
        c.blue,
        c.reset,
        c.green,
        String::from_utf8_lossy(&header.magic),
        c.reset
    )
    .unwrap();
    writeln!(out, "{}version{}      {}.{}", c.blue, c.reset, header.major, header.minor).unwrap();
    writeln!(out, "{}assets_type{}  {}", c.blue, c.reset, header.assets_type).unwrap();
    writeln!(out, "{}size{}         {}", c.blue, c.reset, header.decompressed_size).unwrap();
    out.push('\n');

    writeln!(out, "{}[top]{}", c.blue, c.reset).unwrap();
    let mut settings = 0;
    let mut offset = 0;
    for field in top_level_fields(header.assets_type) {
        match field {
            Field::Ptr(name) => {
                let ptr = read_u32(payload, offset)?;
                if name == "settings" {
                    settings = ptr as usize;
                }
                writeln!(out, "{name:<16}{}@{ptr:08x}{}", c.dim, c.reset).unwrap();
                offset += 4;
            }
            Field::List(name) => {
                let count = read_u32(payload, offset)?;
                let table = read_u32(payload, offset + 4)?;
                writeln!(out, "{name:<16}{count} {}@{table:08x}{}", c.dim, c.reset).unwrap();
                offset += 8;
            }
        }
    }
    out.push('\n');

    if settings != 0 {
        let width = read_u16(payload, settings)?;
        let height = read_u16(payload, settings + 2)?;
        writeln!(out, "{}[settings]{}", c.blue, c.reset).unwrap();
        writeln!(out, "display         {width}x{height}").unwrap();
        out.push('\n');
    }

    writeln!(out, "{}[data]{}", c.blue, c.reset).unwrap();
    for (line, chunk) in payload.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        writeln!(out, "{}{:08x}{}  {}", c.dim, line * 16, c.reset, hex.join(" ")).unwrap();
    }

    Ok(out)
}
