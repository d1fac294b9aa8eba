//! Screen construction, tick functions and event callbacks.

use flowpack_core::project::{HorizontalAlign, LvglKind, StyleProps};
use flowpack_core::utils::{to_lower_snake_case, to_upper_snake_case};

use crate::assets::rgb888;
use crate::model::{
    BindingSource, EventTarget, LvglBinding, LvglEvent, LvglProperty, LvglWidget, ResolvedPage,
    ResolvedWidget,
};

use super::identifiers::{ObjectKey, for_each_widget, user_widget_target};
use super::source::{Source, c_string};
use super::{LvglSections, action_function, font_variable, getter_function, image_variable, setter_function};

const SELECTOR: &str = "LV_PART_MAIN | LV_STATE_DEFAULT";

impl LvglSections<'_> {
    pub(super) fn screens_decl(&self) -> String {
        let mut src = Source::default();
        src.line("typedef struct _objects_t {");
        src.indent();
        if self.objects.fields.is_empty() {
            src.line("void *dummy;");
        }
        for field in &self.objects.fields {
            src.line(format!("lv_obj_t *{field};"));
        }
        src.unindent();
        src.line("} objects_t;");
        src.blank();
        src.line("extern objects_t objects;");
        src.blank();

        src.line("enum ScreensEnum {");
        src.indent();
        for (position, (_, page)) in self.pages().enumerate() {
            if !page.is_user_widget {
                src.line(format!(
                    "SCREEN_ID_{} = {},",
                    to_upper_snake_case(&page.name),
                    position + 1
                ));
            }
        }
        src.unindent();
        src.line("};");

        for (_, page) in self.pages() {
            src.blank();
            src.line(format!("void {};", self.create_signature(page)));
            src.line(format!("void {};", self.tick_signature(page)));
        }
        src.finish()
    }

    pub(super) fn screens_def(&self) -> String {
        let mut src = Source::default();
        src.line("objects_t objects;");
        src.line("lv_obj_t *tick_value_change_obj;");
        src.blank();

        for (p, page) in self.pages() {
            for_each_widget(page.root.children(), &mut |widget| {
                self.event_handler(&mut src, p, widget);
            });
        }

        for (p, page) in self.pages() {
            src.block(format!("void {}", self.create_signature(page)), |src| {
                self.create_page(src, p, page);
            });
            src.blank();
            src.block(format!("void {}", self.tick_signature(page)), |src| {
                if self.flow_support() && !page.is_user_widget {
                    src.line(self.page_flow_state(page));
                }
                for_each_widget(page.root.children(), &mut |widget| {
                    self.tick_widget(src, p, widget);
                });
            });
            src.blank();
        }
        src.finish()
    }

    pub(super) fn screens_decl_ext(&self) -> String {
        let mut src = Source::default();
        src.line("void create_screens();");
        src.line("void tick_screen(int screen_index);");
        src.finish()
    }

    pub(super) fn screens_def_ext(&self) -> String {
        let mut src = Source::default();
        src.block("void create_screens()", |src| {
            src.line("lv_disp_t *dispp = lv_disp_get_default();");
            src.line(
                "lv_theme_t *theme = lv_theme_default_init(dispp, \
                 lv_palette_main(LV_PALETTE_BLUE), lv_palette_main(LV_PALETTE_RED), \
                 false, LV_FONT_DEFAULT);",
            );
            src.line("lv_disp_set_theme(dispp, theme);");
            src.blank();
            for (_, page) in self.pages().filter(|(_, p)| !p.is_user_widget) {
                src.line(format!("create_screen_{}();", page_ident(page)));
            }
        });
        src.blank();

        src.line("typedef void (*tick_screen_func_t)();");
        src.blank();
        src.line("tick_screen_func_t tick_screen_funcs[] = {");
        src.indent();
        let mut any = false;
        for (_, page) in self.pages() {
            any = true;
            if page.is_user_widget {
                src.line("0,");
            } else {
                src.line(format!("tick_screen_{},", page_ident(page)));
            }
        }
        if !any {
            src.line("0");
        }
        src.unindent();
        src.line("};");
        src.blank();

        src.block("void tick_screen(int screen_index)", |src| {
            src.line("tick_screen_funcs[screen_index]();");
        });
        src.finish()
    }

    fn create_signature(&self, page: &ResolvedPage) -> String {
        let ident = page_ident(page);
        match (page.is_user_widget, self.flow_support()) {
            (false, _) => format!("create_screen_{ident}()"),
            (true, true) => format!(
                "create_user_widget_{ident}(lv_obj_t *parent_obj, void *flowState, int startWidgetIndex)"
            ),
            (true, false) => {
                format!("create_user_widget_{ident}(lv_obj_t *parent_obj, int startWidgetIndex)")
            }
        }
    }

    fn tick_signature(&self, page: &ResolvedPage) -> String {
        let ident = page_ident(page);
        match (page.is_user_widget, self.flow_support()) {
            (false, _) => format!("tick_screen_{ident}()"),
            (true, true) => {
                format!("tick_user_widget_{ident}(void *flowState, int startWidgetIndex)")
            }
            (true, false) => format!("tick_user_widget_{ident}(int startWidgetIndex)"),
        }
    }

    fn page_flow_state(&self, page: &ResolvedPage) -> String {
        format!(
            "void *flowState = getFlowState(0, {});",
            page.flow_index.unwrap_or(0)
        )
    }

    fn create_page(&self, src: &mut Source, p: usize, page: &ResolvedPage) {
        if page.is_user_widget {
            src.line("lv_obj_t *obj = parent_obj;");
        } else {
            if self.flow_support() {
                src.line(self.page_flow_state(page));
            }
            src.line("lv_obj_t *obj = lv_obj_create(0);");
            if let Some(accessor) = self.objects.accessor((p, None)) {
                src.line(format!("{accessor} = obj;"));
            }
            let root = &page.root;
            src.line(format!("lv_obj_set_pos(obj, {}, {});", root.left, root.top));
            src.line(format!(
                "lv_obj_set_size(obj, {}, {});",
                root.width, root.height
            ));
            if let Some(lvgl) = root.lvgl() {
                style_lines(src, &lvgl.props);
            }
        }
        self.create_children(src, p, page.root.children());
    }

    fn create_children(&self, src: &mut Source, p: usize, children: &[ResolvedWidget]) {
        if children.iter().all(|c| c.lvgl().is_none()) {
            return;
        }
        src.block("", |src| {
            src.line("lv_obj_t *parent_obj = obj;");
            for child in children.iter().filter(|c| c.lvgl().is_some()) {
                src.block("", |src| self.create_widget(src, p, child));
            }
        });
    }

    fn create_widget(&self, src: &mut Source, p: usize, widget: &ResolvedWidget) {
        let Some(lvgl) = widget.lvgl() else {
            return;
        };
        let key = (p, widget.component);
        if let Some(name) = widget.name.as_deref().filter(|n| !n.is_empty()) {
            src.line(format!("// {name}"));
        }
        src.line(format!(
            "lv_obj_t *obj = {}(parent_obj);",
            create_function(lvgl.kind)
        ));
        if let Some(accessor) = self.objects.accessor(key) {
            src.line(format!("{accessor} = obj;"));
        }
        src.line(format!("lv_obj_set_pos(obj, {}, {});", widget.left, widget.top));
        src.line(format!(
            "lv_obj_set_size(obj, {}, {});",
            widget.width, widget.height
        ));

        match lvgl.kind {
            LvglKind::Label | LvglKind::Checkbox | LvglKind::Textarea => {
                if let (Some(text), Some((_, setter))) = (&lvgl.text, text_api(lvgl.kind)) {
                    src.line(format!("{setter}(obj, {});", c_string(text)));
                }
            }
            LvglKind::Image => {
                if let Some(image) = &lvgl.image {
                    src.line(format!("lv_img_set_src(obj, &{});", image_variable(image)));
                }
            }
            LvglKind::UserWidget => self.create_user_widget(src, key, widget, lvgl),
            _ => {}
        }

        if needs_callback(lvgl) {
            let user_data = if self.flow_support() { "flowState" } else { "0" };
            src.line(format!(
                "lv_obj_add_event_cb(obj, {}, LV_EVENT_ALL, {user_data});",
                self.callback_name(key)
            ));
        }
        style_lines(src, &lvgl.props);
        self.create_children(src, p, &lvgl.children);
    }

    fn create_user_widget(
        &self,
        src: &mut Source,
        key: ObjectKey,
        widget: &ResolvedWidget,
        lvgl: &LvglWidget,
    ) {
        let Some(user_widget) = &lvgl.user_widget else {
            return;
        };
        if user_widget.cyclic {
            src.line(format!(
                "// user widget `{}` not expanded: cyclic reference",
                user_widget.page
            ));
            return;
        }
        let Some(target) = user_widget_target(self.model, lvgl) else {
            return;
        };
        let callee = page_ident(&self.model.pages[target]);
        let start = self.objects.block_start(key).unwrap_or_else(|| "0".to_string());
        if self.flow_support() {
            src.line(format!(
                "create_user_widget_{callee}(obj, getFlowState(flowState, {}), {start});",
                widget.component_index.unwrap_or(0)
            ));
        } else {
            src.line(format!("create_user_widget_{callee}(obj, {start});"));
        }
    }

    fn callback_name(&self, key: ObjectKey) -> String {
        let screen = to_lower_snake_case(&self.model.pages[key.0].name);
        let ident = self.objects.identifier(key).unwrap_or("obj");
        format!("event_handler_cb_{screen}_{ident}")
    }

    fn event_handler(&self, src: &mut Source, p: usize, widget: &ResolvedWidget) {
        let Some(lvgl) = widget.lvgl() else {
            return;
        };
        if !needs_callback(lvgl) {
            return;
        }
        let head = format!("static void {}(lv_event_t *e)", self.callback_name((p, widget.component)));
        src.block(head, |src| {
            src.line("lv_event_code_t event = lv_event_get_code(e);");
            if self.flow_support() {
                src.line("void *flowState = lv_event_get_user_data(e);");
            }
            let checks_state = lvgl
                .events
                .iter()
                .any(|e| matches!(e.event.as_str(), "CHECKED" | "UNCHECKED"));
            if checks_state {
                src.line("lv_obj_t *ta = lv_event_get_target(e);");
            }
            for event in &lvgl.events {
                src.block(format!("if ({})", event_condition(&event.event)), |src| {
                    src.line(dispatch(event));
                });
            }
            for binding in &lvgl.bindings {
                if let Some(api) = write_back_api(lvgl.kind, binding.property) {
                    write_back(src, binding, api);
                }
            }
        });
        src.blank();
    }

    fn tick_widget(&self, src: &mut Source, p: usize, widget: &ResolvedWidget) {
        let Some(lvgl) = widget.lvgl() else {
            return;
        };
        let key = (p, widget.component);
        let Some(accessor) = self.objects.accessor(key) else {
            return;
        };
        for binding in &lvgl.bindings {
            tick_binding(src, &accessor, lvgl.kind, binding);
        }

        let Some(target) = user_widget_target(self.model, lvgl) else {
            return;
        };
        let callee = page_ident(&self.model.pages[target]);
        let start = self.objects.block_start(key).unwrap_or_else(|| "0".to_string());
        if self.flow_support() {
            src.line(format!(
                "tick_user_widget_{callee}(getFlowState(flowState, {}), {start});",
                widget.component_index.unwrap_or(0)
            ));
        } else {
            src.line(format!("tick_user_widget_{callee}({start});"));
        }
    }
}

fn page_ident(page: &ResolvedPage) -> String {
    to_lower_snake_case(&page.name)
}

fn create_function(kind: LvglKind) -> &'static str {
    match kind {
        LvglKind::Screen | LvglKind::Panel | LvglKind::UserWidget => "lv_obj_create",
        LvglKind::Label => "lv_label_create",
        LvglKind::Button => "lv_btn_create",
        LvglKind::Image => "lv_img_create",
        LvglKind::Slider => "lv_slider_create",
        LvglKind::Bar => "lv_bar_create",
        LvglKind::Arc => "lv_arc_create",
        LvglKind::Checkbox => "lv_checkbox_create",
        LvglKind::Switch => "lv_switch_create",
        LvglKind::Textarea => "lv_textarea_create",
    }
}

/// Getter and setter of a widget's text.
fn text_api(kind: LvglKind) -> Option<(&'static str, &'static str)> {
    match kind {
        LvglKind::Label => Some(("lv_label_get_text", "lv_label_set_text")),
        LvglKind::Textarea => Some(("lv_textarea_get_text", "lv_textarea_set_text")),
        LvglKind::Checkbox => Some(("lv_checkbox_get_text", "lv_checkbox_set_text")),
        _ => None,
    }
}

/// Getter and setter of a widget's value. Arcs take no animation flag.
fn value_api(kind: LvglKind) -> Option<(&'static str, &'static str, bool)> {
    match kind {
        LvglKind::Slider => Some(("lv_slider_get_value", "lv_slider_set_value", true)),
        LvglKind::Bar => Some(("lv_bar_get_value", "lv_bar_set_value", true)),
        LvglKind::Arc => Some(("lv_arc_get_value", "lv_arc_set_value", false)),
        _ => None,
    }
}

struct WriteBack {
    c_type: &'static str,
    read: &'static str,
    assign: &'static str,
}

fn write_back_api(kind: LvglKind, property: LvglProperty) -> Option<WriteBack> {
    match (property, kind) {
        (LvglProperty::Value, LvglKind::Slider) => Some(WriteBack {
            c_type: "int32_t",
            read: "lv_slider_get_value(ta)",
            assign: "assignIntegerProperty",
        }),
        (LvglProperty::Value, LvglKind::Arc) => Some(WriteBack {
            c_type: "int32_t",
            read: "lv_arc_get_value(ta)",
            assign: "assignIntegerProperty",
        }),
        (LvglProperty::Checked, _) => Some(WriteBack {
            c_type: "bool",
            read: "lv_obj_has_state(ta, LV_STATE_CHECKED)",
            assign: "assignBooleanProperty",
        }),
        _ => None,
    }
}

fn needs_callback(lvgl: &LvglWidget) -> bool {
    !lvgl.events.is_empty()
        || lvgl
            .bindings
            .iter()
            .any(|b| write_back_api(lvgl.kind, b.property).is_some())
}

fn event_condition(event: &str) -> String {
    match event {
        "CHECKED" => {
            "event == LV_EVENT_VALUE_CHANGED && lv_obj_has_state(ta, LV_STATE_CHECKED)".to_string()
        }
        "UNCHECKED" => {
            "event == LV_EVENT_VALUE_CHANGED && !lv_obj_has_state(ta, LV_STATE_CHECKED)".to_string()
        }
        other => format!("event == LV_EVENT_{other}"),
    }
}

fn dispatch(event: &LvglEvent) -> String {
    match &event.target {
        EventTarget::Output {
            component_index: c,
            output_index: o,
        } => match event.event.as_str() {
            "KEY" => format!("flowPropagateValueUint32(flowState, {c}, {o}, lv_event_get_key(e));"),
            "ROTARY" => format!(
                "flowPropagateValueInt32(flowState, {c}, {o}, lv_event_get_rotary_diff(e));"
            ),
            "GESTURE" => format!(
                "flowPropagateValueUint32(flowState, {c}, {o}, \
                 (uint32_t)lv_indev_get_gesture_dir(lv_indev_active()));"
            ),
            _ => format!("flowPropagateValue(flowState, {c}, {o});"),
        },
        EventTarget::NativeAction(name) => format!("{}(e);", action_function(name)),
        EventTarget::FlowAction(index) => format!("flowPropagateValue(flowState, -1, {index});"),
    }
}

fn write_back(src: &mut Source, binding: &LvglBinding, api: WriteBack) {
    src.block("if (event == LV_EVENT_VALUE_CHANGED)", |src| {
        src.line("lv_obj_t *ta = lv_event_get_target(e);");
        src.block("if (tick_value_change_obj != ta)", |src| {
            src.line(format!("{} value = {};", api.c_type, api.read));
            match &binding.source {
                BindingSource::Flow {
                    component_index,
                    property_index,
                } => src.line(format!(
                    "{}(flowState, {component_index}, {property_index}, value, \"Failed to assign {}\");",
                    api.assign,
                    binding.property.label()
                )),
                BindingSource::Variable(name) => {
                    src.line(format!("{}(value);", setter_function(name)))
                }
            }
        });
    });
}

fn read_binding(binding: &LvglBinding, evaluator: &str) -> String {
    match &binding.source {
        BindingSource::Flow {
            component_index,
            property_index,
        } => format!(
            "{evaluator}(flowState, {component_index}, {property_index}, \"Failed to evaluate {}\")",
            binding.property.label()
        ),
        BindingSource::Variable(name) => format!("{}()", getter_function(name)),
    }
}

fn tick_binding(src: &mut Source, accessor: &str, kind: LvglKind, binding: &LvglBinding) {
    match binding.property {
        LvglProperty::Text => {
            let Some((getter, setter)) = text_api(kind) else {
                return;
            };
            src.block("", |src| {
                src.line(format!(
                    "const char *new_val = {};",
                    read_binding(binding, "evalTextProperty")
                ));
                src.line(format!("const char *cur_val = {getter}({accessor});"));
                src.line(format!(
                    "if (strcmp(new_val, cur_val) != 0) {setter}({accessor}, new_val);"
                ));
            });
        }
        LvglProperty::Value => {
            let Some((getter, setter, animated)) = value_api(kind) else {
                return;
            };
            src.block("", |src| {
                src.line(format!(
                    "int32_t new_val = {};",
                    read_binding(binding, "evalIntegerProperty")
                ));
                src.line(format!("int32_t cur_val = {getter}({accessor});"));
                src.block("if (new_val != cur_val)", |src| {
                    src.line(format!("tick_value_change_obj = {accessor};"));
                    if animated {
                        src.line(format!("{setter}({accessor}, new_val, LV_ANIM_OFF);"));
                    } else {
                        src.line(format!("{setter}({accessor}, new_val);"));
                    }
                    src.line("tick_value_change_obj = NULL;");
                });
            });
        }
        LvglProperty::Checked => tick_state(src, accessor, binding, "LV_STATE_CHECKED"),
        LvglProperty::Disabled => tick_state(src, accessor, binding, "LV_STATE_DISABLED"),
        LvglProperty::Hidden => {
            src.block("", |src| {
                src.line(format!(
                    "bool new_val = {};",
                    read_binding(binding, "evalBooleanProperty")
                ));
                src.line(format!(
                    "bool cur_val = lv_obj_has_flag({accessor}, LV_OBJ_FLAG_HIDDEN);"
                ));
                src.block("if (new_val != cur_val)", |src| {
                    src.line(format!("tick_value_change_obj = {accessor};"));
                    src.line(format!(
                        "if (new_val) lv_obj_add_flag({accessor}, LV_OBJ_FLAG_HIDDEN);"
                    ));
                    src.line(format!(
                        "else lv_obj_clear_flag({accessor}, LV_OBJ_FLAG_HIDDEN);"
                    ));
                    src.line("tick_value_change_obj = NULL;");
                });
            });
        }
    }
}

fn tick_state(src: &mut Source, accessor: &str, binding: &LvglBinding, state: &str) {
    src.block("", |src| {
        src.line(format!(
            "bool new_val = {};",
            read_binding(binding, "evalBooleanProperty")
        ));
        src.line(format!("bool cur_val = lv_obj_has_state({accessor}, {state});"));
        src.block("if (new_val != cur_val)", |src| {
            src.line(format!("tick_value_change_obj = {accessor};"));
            src.line(format!("if (new_val) lv_obj_add_state({accessor}, {state});"));
            src.line(format!("else lv_obj_clear_state({accessor}, {state});"));
            src.line("tick_value_change_obj = NULL;");
        });
    });
}

fn style_lines(src: &mut Source, props: &StyleProps) {
    let mut color = |property: &str, value: &Option<String>| {
        if let Some(rgb) = value.as_deref().and_then(rgb888) {
            src.line(format!(
                "lv_obj_set_style_{property}(obj, lv_color_hex(0x{rgb:06x}), {SELECTOR});"
            ));
        }
    };
    color("bg_color", &props.background_color);
    color("text_color", &props.color);
    color("border_color", &props.border_color);

    let mut number = |property: &str, value: Option<u8>| {
        if let Some(value) = value {
            src.line(format!("lv_obj_set_style_{property}(obj, {value}, {SELECTOR});"));
        }
    };
    number("border_width", props.border_size);
    number("radius", props.border_radius);
    number("opa", props.opacity);
    if let Some([top, right, bottom, left]) = props.padding {
        number("pad_top", Some(top));
        number("pad_right", Some(right));
        number("pad_bottom", Some(bottom));
        number("pad_left", Some(left));
    }

    if let Some(font) = &props.font {
        src.line(format!(
            "lv_obj_set_style_text_font(obj, &{}, {SELECTOR});",
            font_variable(font)
        ));
    }
    if let Some(align) = props.align_horizontal {
        let align = match align {
            HorizontalAlign::Left => "LV_TEXT_ALIGN_LEFT",
            HorizontalAlign::Center => "LV_TEXT_ALIGN_CENTER",
            HorizontalAlign::Right => "LV_TEXT_ALIGN_RIGHT",
        };
        src.line(format!(
            "lv_obj_set_style_text_align(obj, {align}, {SELECTOR});"
        ));
    }
}
