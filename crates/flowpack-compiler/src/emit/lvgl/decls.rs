//! Declarations of images, fonts, native actions and variables.

use flowpack_core::ValueType;
use flowpack_core::utils::to_upper_snake_case;

use crate::model::{ActionRecord, BitmapRecord, FontRecord, VariableRecord};

use super::source::{Source, c_string};
use super::{action_function, font_variable, getter_function, image_variable, setter_function};

pub(super) fn images_decl(bitmaps: &[BitmapRecord]) -> String {
    let mut src = Source::default();
    let real: Vec<_> = bitmaps.iter().filter(|b| !b.filler).collect();
    for bitmap in &real {
        src.line(format!(
            "extern const lv_img_dsc_t {};",
            image_variable(&bitmap.name)
        ));
    }
    if !real.is_empty() {
        src.blank();
    }
    src.line("#ifndef EXT_IMG_DESC_T");
    src.line("#define EXT_IMG_DESC_T");
    src.line("typedef struct _ext_img_desc_t {");
    src.indent();
    src.line("const char *name;");
    src.line("const lv_img_dsc_t *img_dsc;");
    src.unindent();
    src.line("} ext_img_desc_t;");
    src.line("#endif");
    src.blank();
    src.line(format!(
        "extern const ext_img_desc_t images[{}];",
        real.len().max(1)
    ));
    src.finish()
}

pub(super) fn images_def(bitmaps: &[BitmapRecord]) -> String {
    let real: Vec<_> = bitmaps.iter().filter(|b| !b.filler).collect();
    let mut src = Source::default();
    src.line(format!(
        "const ext_img_desc_t images[{}] = {{",
        real.len().max(1)
    ));
    src.indent();
    if real.is_empty() {
        src.line("0");
    }
    for bitmap in &real {
        src.line(format!(
            "{{ {}, &{} }},",
            c_string(&bitmap.name),
            image_variable(&bitmap.name)
        ));
    }
    src.unindent();
    src.line("};");
    src.finish()
}

pub(super) fn fonts_decl(fonts: &[FontRecord]) -> String {
    let mut src = Source::default();
    for font in fonts.iter().filter(|f| !f.filler) {
        src.line(format!("extern const lv_font_t {};", font_variable(&font.name)));
    }
    src.finish()
}

/// Native actions; without flow support every action is native.
pub(super) fn actions_decl(actions: &[ActionRecord], flow_support: bool) -> String {
    let mut src = Source::default();
    for action in actions.iter().filter(|a| a.native || !flow_support) {
        src.line(format!(
            "extern void {}(lv_event_t * e);",
            action_function(&action.name)
        ));
    }
    src.finish()
}

pub(super) fn vars_decl(variables: &[VariableRecord], flow_support: bool) -> String {
    let mut src = Source::default();

    if flow_support {
        src.line("enum FlowGlobalVariables {");
        src.indent();
        for (i, variable) in variables.iter().enumerate().filter(|(_, v)| !v.native) {
            src.line(format!(
                "FLOW_GLOBAL_VARIABLE_{} = {i},",
                to_upper_snake_case(&variable.name)
            ));
        }
        src.unindent();
        src.line("};");
        src.blank();
    }

    for variable in variables.iter().filter(|v| v.native || !flow_support) {
        let ctype = c_type(&variable.value_type);
        src.line(format!(
            "extern {};",
            declare(ctype, &format!("{}()", getter_function(&variable.name)))
        ));
        src.line(format!(
            "extern void {}({});",
            setter_function(&variable.name),
            declare(ctype, "value")
        ));
    }
    src.finish()
}

/// Runtime table of native variable accessors; empty without flow support.
pub(super) fn native_vars_table_def(variables: &[VariableRecord], flow_support: bool) -> String {
    if !flow_support {
        return String::new();
    }
    let mut src = Source::default();
    src.line("native_var_t native_vars[] = {");
    src.indent();
    src.line("{ NATIVE_VAR_TYPE_NONE, 0, 0 },");
    for variable in variables.iter().filter(|v| v.native) {
        src.line(format!(
            "{{ NATIVE_VAR_TYPE_{}, {}, {} }},",
            native_type(&variable.value_type),
            getter_function(&variable.name),
            setter_function(&variable.name)
        ));
    }
    src.unindent();
    src.line("};");
    src.finish()
}

fn c_type(value_type: &ValueType) -> &'static str {
    match value_type {
        ValueType::Integer | ValueType::Enum(_) => "int32_t",
        ValueType::Float => "float",
        ValueType::Double => "double",
        ValueType::Boolean => "bool",
        ValueType::String => "const char *",
        _ => "void *",
    }
}

fn native_type(value_type: &ValueType) -> String {
    match value_type {
        ValueType::Enum(_) => "INTEGER".to_string(),
        other => other.to_string().to_ascii_uppercase(),
    }
}

/// `int32_t name` or `const char *name`.
fn declare(ctype: &str, name: &str) -> String {
    if ctype.ends_with('*') {
        format!("{ctype}{name}")
    } else {
        format!("{ctype} {name}")
    }
}
