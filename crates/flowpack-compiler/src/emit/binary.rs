//! Assets blob payload writer.
//!
//! Writes the uncompressed payload; [`flowpack_format::pack`] adds the
//! header and compresses it. Fields inside a struct are fixed-size, so
//! nested arrays and strings are always stored behind an object offset.

use flowpack_format::{DataBuffer, FormatError, TextEncoding, UNREGISTERED_ITEM};

use crate::assets::AssetRef;
use crate::constant_pool::FlowValue;
use crate::model::{
    ActionRecord, BitmapRecord, ColorsRecord, FontRecord, GlyphRecord, ItemTarget,
    LanguageRecord, ResolvedComponent, ResolvedFlow, ResolvedModel, ResolvedPage,
    ResolvedWidget, StyleRecord, VariableRecord, WidgetSpecific,
};

use super::visitor::ModelVisitor;

/// Serializes a [`ResolvedModel`] when driven by [`walk_model`](super::walk_model).
pub struct BinaryWriter<'m> {
    model: &'m ResolvedModel,
    buf: DataBuffer<'m>,
}

impl<'m> BinaryWriter<'m> {
    pub fn new(model: &'m ResolvedModel) -> Self {
        Self {
            model,
            buf: DataBuffer::new(model.encoding),
        }
    }

    /// Write the deferred objects and return the payload.
    pub fn finish(mut self) -> Result<Vec<u8>, FormatError> {
        self.buf.finalize()?;
        let bytes = self.buf.into_bytes()?;
        log::debug!("assets payload: {} bytes", bytes.len());
        Ok(bytes)
    }

    fn layered(&self) -> bool {
        self.model.layered
    }

    fn string_align(&self) -> usize {
        match self.model.encoding {
            TextEncoding::Utf8 => 1,
            TextEncoding::Utf16 => 2,
        }
    }
}

impl<'m> ModelVisitor<'m> for BinaryWriter<'m> {
    fn visit_settings(&mut self, model: &'m ResolvedModel) {
        let (width, height) = (model.display_width, model.display_height);
        self.buf.write_object_offset(4, move |buf| {
            buf.write_u16(width);
            buf.write_u16(height);
        });
    }

    fn visit_pages(&mut self, pages: &'m [ResolvedPage]) {
        if self.model.is_lvgl() {
            return;
        }
        let layered = self.layered();
        let roots: Vec<_> = pages.iter().map(|page| &page.root).collect();
        self.buf
            .write_list(roots, 4, move |buf, widget| write_widget(buf, widget, layered));
    }

    fn visit_styles(&mut self, styles: &'m [StyleRecord]) {
        if self.model.is_lvgl() {
            return;
        }
        let layered = self.layered();
        self.buf.write_list(styles.iter().collect(), 4, move |buf, style| {
            write_style(buf, style, layered)
        });
    }

    fn visit_fonts(&mut self, fonts: &'m [FontRecord]) {
        if self.model.is_lvgl() {
            return;
        }
        self.buf.write_list(fonts.iter().collect(), 4, write_font);
    }

    fn visit_bitmaps(&mut self, bitmaps: &'m [BitmapRecord]) {
        if self.model.is_lvgl() {
            return;
        }
        self.buf.write_list(bitmaps.iter().collect(), 4, write_bitmap);
    }

    fn visit_colors(&mut self, colors: &'m ColorsRecord) {
        self.buf.write_object_offset(4, move |buf| {
            buf.write_list(colors.themes.iter().collect(), 4, |buf, theme| {
                buf.write_string_offset(theme.name.as_str());
                write_u16_array_offset(buf, &theme.colors);
            });
            write_u16_array_offset(buf, &colors.extra);
        });
    }

    fn visit_actions(&mut self, actions: &'m [ActionRecord]) {
        let align = self.string_align();
        let names: Vec<_> = actions.iter().map(|a| a.name.as_str()).collect();
        self.buf
            .write_list(names, align, |buf, name| buf.write_string(name));
    }

    fn visit_variables(&mut self, variables: &'m [VariableRecord]) {
        let align = self.string_align();
        let names: Vec<_> = variables.iter().map(|v| v.name.as_str()).collect();
        self.buf
            .write_list(names, align, |buf, name| buf.write_string(name));
    }

    fn visit_flows(&mut self, model: &'m ResolvedModel) {
        if !model.flow_support {
            self.buf.write_u32(0);
            return;
        }
        self.buf.write_object_offset(4, move |buf| {
            buf.write_list(model.flows.iter().collect(), 4, write_flow);
            buf.write_list(model.constants.iter().collect(), 8, write_value);
            buf.write_list(model.global_defaults().collect(), 8, write_value);
        });
    }

    fn visit_languages(&mut self, languages: &'m [LanguageRecord]) {
        let align = self.string_align();
        self.buf.write_list(languages.iter().collect(), 8, move |buf, language| {
            buf.write_string_offset(language.language_id.as_str());
            let translations: Vec<_> = language.translations.iter().map(String::as_str).collect();
            buf.write_list(translations, align, |buf, text| buf.write_string(text));
        });
    }
}

fn coord(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

fn string_offset<'m>(buf: &mut DataBuffer<'m>, text: &'m Option<String>) {
    match text {
        Some(text) => buf.write_string_offset(text.as_str()),
        None => buf.write_u32(0),
    }
}

fn write_u16_array_offset<'m>(buf: &mut DataBuffer<'m>, items: &'m [u16]) {
    buf.write_object_offset(4, move |buf| {
        buf.write_array(items, 2, |buf, &item| buf.write_u16(item))
    });
}

fn write_u8_array_offset<'m>(buf: &mut DataBuffer<'m>, bytes: &'m [u8]) {
    buf.write_object_offset(4, move |buf| {
        buf.write_u32(bytes.len() as u32);
        buf.write_u8_array(bytes);
    });
}

fn write_widget<'m>(buf: &mut DataBuffer<'m>, widget: &'m ResolvedWidget, layered: bool) {
    let asset = |r: AssetRef| r.encode_i16(layered);

    buf.write_u8(widget.type_code);
    buf.write_u8(0);
    buf.write_i16(widget.data.encode(layered));
    buf.write_i16(widget.action.encode(layered));
    buf.write_i16(coord(widget.left));
    buf.write_i16(coord(widget.top));
    buf.write_i16(coord(widget.width));
    buf.write_i16(coord(widget.height));
    buf.write_i16(asset(widget.style));

    match &widget.specific {
        WidgetSpecific::None | WidgetSpecific::Lvgl(_) => {}
        WidgetSpecific::Container {
            children,
            overlay,
            flags,
        } => {
            write_children(buf, children, layered);
            buf.write_i16(overlay.encode(layered));
            buf.write_u16(*flags);
        }
        WidgetSpecific::List {
            item,
            list_type: mode,
            gap,
        }
        | WidgetSpecific::Grid {
            item,
            grid_flow: mode,
            gap,
        } => {
            match item {
                Some(item) => {
                    buf.write_object_offset(4, move |buf| write_widget(buf, item, layered))
                }
                None => buf.write_u32(0),
            }
            buf.write_u8(*mode);
            buf.write_u8(0);
            buf.write_u16(*gap);
        }
        WidgetSpecific::Select { children } => write_children(buf, children, layered),
        WidgetSpecific::Text { text, flags } => {
            string_offset(buf, text);
            buf.write_u8(*flags);
            buf.write_u8_array(&[0; 3]);
        }
        WidgetSpecific::MultilineText {
            text,
            first_line_indent,
            hanging_indent,
        } => {
            string_offset(buf, text);
            buf.write_i16(*first_line_indent);
            buf.write_i16(*hanging_indent);
        }
        WidgetSpecific::Rectangle { flags } => {
            buf.write_u8(*flags);
            buf.write_u8_array(&[0; 3]);
        }
        WidgetSpecific::Bitmap { bitmap } => buf.write_i16(asset(*bitmap)),
        WidgetSpecific::Button {
            text,
            enabled,
            disabled_style,
        } => {
            string_offset(buf, text);
            buf.write_i16(enabled.encode(layered));
            buf.write_i16(asset(*disabled_style));
        }
        WidgetSpecific::ToggleButton { text1, text2 } => {
            string_offset(buf, text1);
            string_offset(buf, text2);
        }
        WidgetSpecific::ButtonGroup { selected_style } => {
            buf.write_i16(asset(*selected_style));
            buf.write_u16(0);
        }
        WidgetSpecific::BarGraph {
            orientation,
            flags,
            text_style,
            line1_data,
            line1_style,
            line2_data,
            line2_style,
        } => {
            buf.write_u8(*orientation);
            buf.write_u8(*flags);
            buf.write_i16(asset(*text_style));
            buf.write_i16(line1_data.encode(layered));
            buf.write_i16(asset(*line1_style));
            buf.write_i16(line2_data.encode(layered));
            buf.write_i16(asset(*line2_style));
        }
        WidgetSpecific::LayoutView { layout, context } => {
            buf.write_i16(asset(*layout));
            buf.write_i16(context.encode(layered));
        }
        WidgetSpecific::YtGraph { y2_data, y2_style } => {
            buf.write_i16(y2_data.encode(layered));
            buf.write_i16(asset(*y2_style));
        }
        WidgetSpecific::UpDown {
            down_text,
            up_text,
            buttons_style,
        } => {
            string_offset(buf, down_text);
            string_offset(buf, up_text);
            buf.write_i16(asset(*buttons_style));
            buf.write_u16(0);
        }
        WidgetSpecific::ListGraph {
            dwell_data,
            y1_data,
            y1_style,
            y2_data,
            y2_style,
            cursor_data,
            cursor_style,
        } => {
            buf.write_i16(dwell_data.encode(layered));
            buf.write_i16(y1_data.encode(layered));
            buf.write_i16(asset(*y1_style));
            buf.write_i16(y2_data.encode(layered));
            buf.write_i16(asset(*y2_style));
            buf.write_i16(cursor_data.encode(layered));
            buf.write_i16(asset(*cursor_style));
            buf.write_u16(0);
        }
        WidgetSpecific::ScrollBar {
            left_text,
            right_text,
            thumb_style,
            buttons_style,
        } => {
            string_offset(buf, left_text);
            string_offset(buf, right_text);
            buf.write_i16(asset(*thumb_style));
            buf.write_i16(asset(*buttons_style));
        }
        WidgetSpecific::Progress { orientation } => {
            buf.write_u8(*orientation);
            buf.write_u8_array(&[0; 3]);
        }
    }
}

fn write_children<'m>(buf: &mut DataBuffer<'m>, children: &'m [ResolvedWidget], layered: bool) {
    buf.write_list(children.iter().collect(), 4, move |buf, child| {
        write_widget(buf, child, layered)
    });
}

fn write_style(buf: &mut DataBuffer<'_>, style: &StyleRecord, layered: bool) {
    buf.write_u16(style.flags);
    buf.write_u16(style.background_color);
    buf.write_u16(style.color);
    buf.write_u16(style.active_background_color);
    buf.write_u16(style.active_color);
    buf.write_u16(style.border_color);
    buf.write_i16(style.font.encode_i16(layered));
    buf.write_u8(style.opacity);
    buf.write_u8(style.border_size);
    buf.write_u8(style.border_radius);
    buf.write_u8_array(&style.padding);
    buf.write_u8(0);
}

fn write_font<'m>(buf: &mut DataBuffer<'m>, font: &'m FontRecord) {
    let (start, end) = font.encoding_range();
    buf.write_u8(font.ascent);
    buf.write_u8(font.descent);
    buf.write_u8(font.bpp);
    buf.write_u8(font.height);
    buf.write_u32(start);
    buf.write_u32(end);
    buf.write_list(font.glyphs.iter().collect(), 4, write_glyph);
}

fn write_glyph<'m>(buf: &mut DataBuffer<'m>, glyph: &'m GlyphRecord) {
    buf.write_u32(glyph.encoding);
    buf.write_i8(glyph.dx);
    buf.write_u8(glyph.width);
    buf.write_u8(glyph.height);
    buf.write_i8(glyph.x);
    buf.write_i8(glyph.y);
    buf.write_u8_array(&[0; 3]);
    write_u8_array_offset(buf, &glyph.pixels);
}

fn write_bitmap<'m>(buf: &mut DataBuffer<'m>, bitmap: &'m BitmapRecord) {
    buf.write_i16(bitmap.width as i16);
    buf.write_i16(bitmap.height as i16);
    buf.write_i16(bitmap.bpp as i16);
    buf.write_i16(0);
    write_u8_array_offset(buf, &bitmap.pixels);
}

fn write_flow<'m>(buf: &mut DataBuffer<'m>, flow: &'m ResolvedFlow) {
    buf.write_list(flow.components.iter().collect(), 4, write_component);
    buf.write_list(flow.local_defaults.iter().collect(), 8, write_value);
    write_u8_array_offset(buf, &flow.input_flags);
    buf.write_list(flow.widget_data_items.iter().collect(), 4, write_item_target);
    buf.write_list(flow.widget_actions.iter().collect(), 4, write_item_target);
}

fn write_item_target(buf: &mut DataBuffer<'_>, item: &ItemTarget) {
    let (component, index) = item
        .target
        .unwrap_or((UNREGISTERED_ITEM, UNREGISTERED_ITEM));
    buf.write_u16(component);
    buf.write_u16(index);
}

fn write_component<'m>(buf: &mut DataBuffer<'m>, component: &'m ResolvedComponent) {
    buf.write_u16(component.type_code);
    buf.write_u16(0);
    let inputs = &component.inputs;
    buf.write_object_offset(4, move |buf| {
        buf.write_array(inputs.as_slice(), 2, |buf, (_, index)| buf.write_u16(*index))
    });
    buf.write_list(component.properties.iter().collect(), 4, |buf, property| {
        buf.write_array(&property.instructions, 2, |buf, &instruction| {
            buf.write_u16(instruction)
        })
    });
    buf.write_list(component.outputs.iter().collect(), 4, |buf, output| {
        buf.write_list(output.targets.iter().collect(), 4, |buf, &(target, input)| {
            buf.write_u16(target);
            buf.write_u16(input);
        });
        buf.write_u32(output.is_sequence as u32);
    });
    buf.write_i16(component.error_catch_output);
    buf.write_u16(0);
    if let Some(call) = component.call {
        buf.write_i16(call.flow_index);
        buf.write_u8(call.inputs_start);
        buf.write_u8(call.outputs_start);
    }
}

/// 16-byte value: tag, unit, options, reserved, then an 8-byte payload.
fn write_value<'m>(buf: &mut DataBuffer<'m>, value: &'m FlowValue) {
    buf.write_u8(value.type_code() as u8);
    buf.write_u8(0);
    buf.write_u16(0);
    buf.write_u32(0);
    match value {
        FlowValue::Undefined | FlowValue::Null => buf.write_i64(0),
        FlowValue::Boolean(v) => {
            buf.write_i32(*v as i32);
            buf.write_u32(0);
        }
        FlowValue::Integer(v) => match i32::try_from(*v) {
            Ok(v) => {
                buf.write_i32(v);
                buf.write_u32(0);
            }
            Err(_) => buf.write_i64(*v),
        },
        FlowValue::Float(v) => {
            buf.write_f32(*v);
            buf.write_u32(0);
        }
        FlowValue::Double(v) => buf.write_f64(*v),
        FlowValue::String(text) => {
            buf.write_string_offset(text.as_str());
            buf.write_u32(0);
        }
        FlowValue::Json(json) => {
            buf.write_string_offset(json.to_string());
            buf.write_u32(0);
        }
    }
}
