//! Resolved model.
//!
//! Everything the backends need, with every reference already turned into
//! an index. The model owns its data and does not borrow the project
//! graph, so emitters can hand `&'m` references to deferred buffer writers.

use indexmap::IndexMap;

use flowpack_core::ValueType;
use flowpack_core::project::{ComponentId, LvglKind, ProjectType, StyleProps};
use flowpack_format::TextEncoding;

use crate::assets::AssetRef;
use crate::constant_pool::FlowValue;

#[derive(Debug, Clone)]
pub struct ResolvedModel {
    pub project_name: String,
    pub project_type: ProjectType,
    pub flow_support: bool,
    /// The root is a layer on top of a master project.
    pub layered: bool,
    pub encoding: TextEncoding,
    pub display_width: u16,
    pub display_height: u16,
    /// One entry per page slot, fillers included.
    pub pages: Vec<ResolvedPage>,
    pub styles: Vec<StyleRecord>,
    pub fonts: Vec<FontRecord>,
    pub bitmaps: Vec<BitmapRecord>,
    pub colors: ColorsRecord,
    pub actions: Vec<ActionRecord>,
    pub variables: Vec<VariableRecord>,
    pub flows: Vec<ResolvedFlow>,
    pub constants: Vec<FlowValue>,
    pub languages: Vec<LanguageRecord>,
    /// Dynamic component type codes of dashboard projects.
    pub dashboard_component_types: IndexMap<u16, String>,
}

impl ResolvedModel {
    pub fn is_lvgl(&self) -> bool {
        self.project_type == ProjectType::Lvgl
    }

    /// Pages that are not back-fill copies.
    pub fn real_pages(&self) -> impl Iterator<Item = &ResolvedPage> {
        self.pages.iter().filter(|p| !p.filler)
    }

    pub fn global_defaults(&self) -> impl Iterator<Item = &FlowValue> {
        self.variables.iter().map(|v| &v.default_value)
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub name: String,
    pub flow_index: Option<u16>,
    pub is_user_widget: bool,
    pub filler: bool,
    /// The page itself as a container (or LVGL screen) widget.
    pub root: ResolvedWidget,
}

/// Data or action reference of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetBinding {
    #[default]
    Unbound,
    /// Global variable or action of a project without flow support.
    Asset(AssetRef),
    /// 0-based widget data item or widget action of the owning flow.
    FlowItem(u32),
    /// 1-based position among native actions.
    NativeAction(u32),
}

impl WidgetBinding {
    /// Signed wire value. Flow items are negated and 1-based.
    pub fn encode(self, layered: bool) -> i16 {
        match self {
            Self::Unbound => 0,
            Self::Asset(asset) => asset.encode_i16(layered),
            Self::FlowItem(i) => -(i as i32 + 1) as i16,
            Self::NativeAction(n) => n as i16,
        }
    }

    /// Binding for an index handed out by the flow state table.
    pub fn flow_item(negated: i32) -> Self {
        Self::FlowItem((-negated - 1) as u32)
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedWidget {
    /// `None` for a page root.
    pub component: Option<ComponentId>,
    pub component_index: Option<u16>,
    pub type_name: String,
    pub name: Option<String>,
    pub type_code: u8,
    pub data: WidgetBinding,
    pub action: WidgetBinding,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub style: AssetRef,
    pub specific: WidgetSpecific,
}

impl ResolvedWidget {
    /// Child widgets in drawing order.
    pub fn children(&self) -> &[ResolvedWidget] {
        match &self.specific {
            WidgetSpecific::Container { children, .. } | WidgetSpecific::Select { children } => {
                children
            }
            WidgetSpecific::Lvgl(lvgl) => &lvgl.children,
            _ => &[],
        }
    }

    pub fn lvgl(&self) -> Option<&LvglWidget> {
        match &self.specific {
            WidgetSpecific::Lvgl(lvgl) => Some(lvgl),
            _ => None,
        }
    }
}

/// Type-specific widget fields, in wire order.
#[derive(Debug, Clone, Default)]
pub enum WidgetSpecific {
    #[default]
    None,
    Container {
        children: Vec<ResolvedWidget>,
        overlay: WidgetBinding,
        flags: u16,
    },
    List {
        item: Option<Box<ResolvedWidget>>,
        list_type: u8,
        gap: u16,
    },
    Grid {
        item: Option<Box<ResolvedWidget>>,
        grid_flow: u8,
        gap: u16,
    },
    Select {
        children: Vec<ResolvedWidget>,
    },
    Text {
        text: Option<String>,
        flags: u8,
    },
    MultilineText {
        text: Option<String>,
        first_line_indent: i16,
        hanging_indent: i16,
    },
    Rectangle {
        flags: u8,
    },
    Bitmap {
        bitmap: AssetRef,
    },
    Button {
        text: Option<String>,
        enabled: WidgetBinding,
        disabled_style: AssetRef,
    },
    ToggleButton {
        text1: Option<String>,
        text2: Option<String>,
    },
    ButtonGroup {
        selected_style: AssetRef,
    },
    BarGraph {
        orientation: u8,
        flags: u8,
        text_style: AssetRef,
        line1_data: WidgetBinding,
        line1_style: AssetRef,
        line2_data: WidgetBinding,
        line2_style: AssetRef,
    },
    LayoutView {
        layout: AssetRef,
        context: WidgetBinding,
    },
    YtGraph {
        y2_data: WidgetBinding,
        y2_style: AssetRef,
    },
    UpDown {
        down_text: Option<String>,
        up_text: Option<String>,
        buttons_style: AssetRef,
    },
    ListGraph {
        dwell_data: WidgetBinding,
        y1_data: WidgetBinding,
        y1_style: AssetRef,
        y2_data: WidgetBinding,
        y2_style: AssetRef,
        cursor_data: WidgetBinding,
        cursor_style: AssetRef,
    },
    ScrollBar {
        left_text: Option<String>,
        right_text: Option<String>,
        thumb_style: AssetRef,
        buttons_style: AssetRef,
    },
    Progress {
        orientation: u8,
    },
    Lvgl(Box<LvglWidget>),
}

/// Widget of the source-generation family.
#[derive(Debug, Clone)]
pub struct LvglWidget {
    pub kind: LvglKind,
    pub text: Option<String>,
    /// Bitmap shown by an image widget.
    pub image: Option<String>,
    /// Effective style properties.
    pub props: StyleProps,
    pub bindings: Vec<LvglBinding>,
    pub events: Vec<LvglEvent>,
    pub user_widget: Option<UserWidgetRef>,
    pub children: Vec<ResolvedWidget>,
}

/// Widget state kept in sync with a flow property or a native variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LvglProperty {
    Text,
    Value,
    Checked,
    Hidden,
    Disabled,
}

impl LvglProperty {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "text" => Self::Text,
            "value" => Self::Value,
            "checked" => Self::Checked,
            "hidden" => Self::Hidden,
            "disabled" => Self::Disabled,
            _ => return None,
        })
    }

    /// Written back when the user changes the widget.
    pub fn is_writable(self) -> bool {
        matches!(self, Self::Value | Self::Checked)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Value => "Value",
            Self::Checked => "Checked state",
            Self::Hidden => "Hidden flag",
            Self::Disabled => "Disabled state",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSource {
    Flow {
        component_index: u16,
        property_index: u16,
    },
    /// Native variable accessed through `get_var_`/`set_var_`.
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LvglBinding {
    pub property: LvglProperty,
    pub source: BindingSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
    /// Propagate through an output of the widget's flow component.
    Output {
        component_index: u16,
        output_index: u16,
    },
    NativeAction(String),
    /// Start a flow-implemented action.
    FlowAction(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LvglEvent {
    /// Event name without the `LV_EVENT_` prefix.
    pub event: String,
    pub target: EventTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWidgetRef {
    pub page: String,
    /// Part of a user-widget cycle; emitted as a placeholder.
    pub cyclic: bool,
}

/// Style as written to the blob: colors are color table indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    pub name: String,
    pub filler: bool,
    pub flags: u16,
    pub background_color: u16,
    pub color: u16,
    pub active_background_color: u16,
    pub active_color: u16,
    pub border_color: u16,
    pub font: AssetRef,
    pub opacity: u8,
    pub border_size: u8,
    pub border_radius: u8,
    pub padding: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRecord {
    pub encoding: u32,
    pub dx: i8,
    pub width: u8,
    pub height: u8,
    pub x: i8,
    pub y: i8,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRecord {
    pub name: String,
    pub filler: bool,
    pub ascent: u8,
    pub descent: u8,
    pub bpp: u8,
    pub height: u8,
    /// Sorted by encoding.
    pub glyphs: Vec<GlyphRecord>,
}

impl FontRecord {
    /// First and last encoded character, `(0, 0)` for an empty font.
    pub fn encoding_range(&self) -> (u32, u32) {
        match (self.glyphs.first(), self.glyphs.last()) {
            (Some(first), Some(last)) => (first.encoding, last.encoding),
            _ => (0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapRecord {
    pub name: String,
    pub filler: bool,
    pub width: u16,
    pub height: u16,
    pub bpp: u8,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeRecord {
    pub name: String,
    /// RGB565, one per named color.
    pub colors: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorsRecord {
    /// Names of the color table entries.
    pub names: Vec<String>,
    pub themes: Vec<ThemeRecord>,
    /// RGB565 of literal colors pooled after the named ones.
    pub extra: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub name: String,
    pub native: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableRecord {
    pub name: String,
    pub value_type: ValueType,
    pub native: bool,
    pub default_value: FlowValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRecord {
    pub language_id: String,
    /// One per text resource; missing translations are empty.
    pub translations: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedFlow {
    pub flow_index: u16,
    /// Readable path, e.g. `pages/Main`.
    pub path: String,
    pub name: String,
    /// The flow is a flow action of the root project.
    pub root_action: bool,
    pub components: Vec<ResolvedComponent>,
    pub local_variables: Vec<String>,
    pub local_defaults: Vec<FlowValue>,
    pub input_flags: Vec<u8>,
    /// `(component, input name)` per flow-wide input index.
    pub inputs: Vec<(u16, String)>,
    pub widget_data_items: Vec<ItemTarget>,
    pub widget_actions: Vec<ItemTarget>,
}

/// Owner of a widget data item or widget action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTarget {
    /// `(component index, property value or output index)`, `None` when no
    /// component registered the item.
    pub target: Option<(u16, u16)>,
}

#[derive(Debug, Clone)]
pub struct ResolvedComponent {
    pub id: ComponentId,
    pub path: String,
    pub type_name: String,
    pub identifier: Option<String>,
    pub type_code: u16,
    /// Flow-wide input index of every declared input.
    pub inputs: Vec<(String, u16)>,
    pub properties: Vec<ResolvedProperty>,
    pub outputs: Vec<ResolvedOutput>,
    /// Index of the `@error` output, -1 when errors are not caught.
    pub error_catch_output: i16,
    pub call: Option<CallTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    pub name: String,
    pub instructions: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    pub name: String,
    /// `(target component index, target input index)`.
    pub targets: Vec<(u16, u16)>,
    pub is_sequence: bool,
}

/// Callee of a call-action or user-widget component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTarget {
    /// -1 when the callee could not be resolved.
    pub flow_index: i16,
    pub inputs_start: u8,
    pub outputs_start: u8,
}
