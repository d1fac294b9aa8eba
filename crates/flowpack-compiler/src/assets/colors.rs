//! Color indices and RGB565 conversion.

use flowpack_format::TRANSPARENT_COLOR;

/// Color table of one build.
///
/// Named colors come from the master project when there is one, else from
/// the root project. Literal colors used by styles are pooled after them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    named: Vec<String>,
    extra: Vec<String>,
    layered: bool,
}

impl ColorTable {
    pub fn new(named: Vec<String>, layered: bool) -> Self {
        Self {
            named,
            extra: Vec::new(),
            layered,
        }
    }

    /// Index of a style color value, pooling unknown literals.
    ///
    /// Layered builds cannot extend the master's table, so unknown values
    /// resolve to 0 there.
    pub fn index(&mut self, color: &str) -> u16 {
        if color == "transparent" {
            return TRANSPARENT_COLOR;
        }
        if let Some(i) = self.named.iter().position(|c| c == color) {
            return i as u16;
        }
        if self.layered {
            return 0;
        }
        let i = match self.extra.iter().position(|c| c == color) {
            Some(i) => i,
            None => {
                self.extra.push(color.to_string());
                self.extra.len() - 1
            }
        };
        (self.named.len() + i) as u16
    }

    pub fn named(&self) -> &[String] {
        &self.named
    }

    /// Pooled literal colors, in first-use order.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }
}

/// RGB565 value of `#rrggbb` or `#rgb`. Anything else is black.
pub fn rgb565(color: &str) -> u16 {
    let Some((r, g, b)) = parse_hex(color) else {
        return 0;
    };
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// `0xRRGGBB` of a hex color, for generated C code.
pub fn rgb888(color: &str) -> Option<u32> {
    let (r, g, b) = parse_hex(color)?;
    Some(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}
