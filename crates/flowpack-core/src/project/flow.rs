//! Flow bodies: component arenas shared by pages and flow actions.

use indexmap::IndexMap;

use crate::value_type::ValueType;

use super::types::StyleRef;

/// Position of a component inside its flow's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub u32);

impl ComponentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Widgets of the binary target family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Container,
    List,
    Grid,
    Select,
    DisplayData,
    Text,
    MultilineText,
    Rectangle,
    Bitmap,
    Button,
    ToggleButton,
    ButtonGroup,
    BarGraph,
    LayoutView,
    YtGraph,
    UpDown,
    ListGraph,
    AppView,
    ScrollBar,
    Progress,
    Canvas,
}

/// Widgets of the source-generation target family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LvglKind {
    Screen,
    Label,
    Button,
    Panel,
    Image,
    Slider,
    Bar,
    Arc,
    Checkbox,
    Switch,
    Textarea,
    UserWidget,
}

/// Non-visual flow components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Start,
    End,
    Input,
    Output,
    WatchVariable,
    EvalExpr,
    SetVariable,
    SwitchCase,
    Compare,
    IsTrue,
    Constant,
    Log,
    CallAction,
    Delay,
    Error,
    CatchError,
    Counter,
    Loop,
    ShowPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentKind {
    Widget(WidgetKind),
    Lvgl(LvglKind),
    Action(ActionKind),
    /// Anything else; the original type name is kept on the component.
    #[default]
    Unknown,
}

impl ComponentKind {
    pub fn parse(type_name: &str) -> Self {
        use ActionKind as A;
        use LvglKind as L;
        use WidgetKind as W;

        match type_name {
            "Container" => Self::Widget(W::Container),
            "List" => Self::Widget(W::List),
            "Grid" => Self::Widget(W::Grid),
            "Select" => Self::Widget(W::Select),
            "DisplayData" => Self::Widget(W::DisplayData),
            "Text" => Self::Widget(W::Text),
            "MultilineText" => Self::Widget(W::MultilineText),
            "Rectangle" => Self::Widget(W::Rectangle),
            "Bitmap" => Self::Widget(W::Bitmap),
            "Button" => Self::Widget(W::Button),
            "ToggleButton" => Self::Widget(W::ToggleButton),
            "ButtonGroup" => Self::Widget(W::ButtonGroup),
            "BarGraph" => Self::Widget(W::BarGraph),
            "LayoutView" => Self::Widget(W::LayoutView),
            "YTGraph" => Self::Widget(W::YtGraph),
            "UpDown" => Self::Widget(W::UpDown),
            "ListGraph" => Self::Widget(W::ListGraph),
            "AppView" => Self::Widget(W::AppView),
            "ScrollBar" => Self::Widget(W::ScrollBar),
            "Progress" => Self::Widget(W::Progress),
            "Canvas" => Self::Widget(W::Canvas),

            "LVGLScreen" => Self::Lvgl(L::Screen),
            "LVGLLabel" => Self::Lvgl(L::Label),
            "LVGLButton" => Self::Lvgl(L::Button),
            "LVGLPanel" => Self::Lvgl(L::Panel),
            "LVGLImage" => Self::Lvgl(L::Image),
            "LVGLSlider" => Self::Lvgl(L::Slider),
            "LVGLBar" => Self::Lvgl(L::Bar),
            "LVGLArc" => Self::Lvgl(L::Arc),
            "LVGLCheckbox" => Self::Lvgl(L::Checkbox),
            "LVGLSwitch" => Self::Lvgl(L::Switch),
            "LVGLTextarea" => Self::Lvgl(L::Textarea),
            "LVGLUserWidget" => Self::Lvgl(L::UserWidget),

            "StartAction" => Self::Action(A::Start),
            "EndAction" => Self::Action(A::End),
            "InputAction" => Self::Action(A::Input),
            "OutputAction" => Self::Action(A::Output),
            "WatchVariable" => Self::Action(A::WatchVariable),
            "EvalExpr" => Self::Action(A::EvalExpr),
            "SetVariable" => Self::Action(A::SetVariable),
            "SwitchCase" => Self::Action(A::SwitchCase),
            "Compare" => Self::Action(A::Compare),
            "IsTrue" => Self::Action(A::IsTrue),
            "Constant" => Self::Action(A::Constant),
            "Log" => Self::Action(A::Log),
            "CallAction" => Self::Action(A::CallAction),
            "Delay" => Self::Action(A::Delay),
            "Error" => Self::Action(A::Error),
            "CatchError" => Self::Action(A::CatchError),
            "Counter" => Self::Action(A::Counter),
            "Loop" => Self::Action(A::Loop),
            "ShowPage" => Self::Action(A::ShowPage),
            _ => Self::Unknown,
        }
    }

    /// Whether this component is drawn on screen.
    pub fn is_widget(self) -> bool {
        matches!(self, Self::Widget(_) | Self::Lvgl(_))
    }

    /// Whether this component embeds another page.
    pub fn is_user_widget(self) -> bool {
        matches!(
            self,
            Self::Widget(WidgetKind::LayoutView) | Self::Lvgl(LvglKind::UserWidget)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortKind {
    Sequence,
    #[default]
    Data,
}

/// A named input or output of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub kind: PortKind,
    pub optional: bool,
}

impl Port {
    pub fn sequence(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Sequence,
            optional: true,
        }
    }

    pub fn data(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Data,
            optional: false,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.kind == PortKind::Sequence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlerType {
    #[default]
    Flow,
    Action,
}

/// Reaction to a widget event in the source-generation family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHandler {
    /// Event name, e.g. `CLICKED`, `CHECKED`, `VALUE_CHANGED`.
    pub event: String,
    pub handler_type: HandlerType,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Component {
    pub kind: ComponentKind,
    pub type_name: String,
    /// Object id referenced by connection lines.
    pub object_id: Option<String>,
    /// Identifier, or port name for input/output marker components.
    pub name: Option<String>,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub style: Option<StyleRef>,
    /// Flow-evaluated properties: expression text, or a variable name in
    /// projects without flow support.
    pub properties: IndexMap<String, String>,
    /// Static widget attributes.
    pub attrs: IndexMap<String, serde_json::Value>,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    pub as_output_properties: Vec<String>,
    pub event_handlers: Vec<EventHandler>,
    pub catch_error: bool,
    pub used_in: Option<Vec<String>>,
    pub parent: Option<ComponentId>,
    pub children: Vec<ComponentId>,
    pub item_widget: Option<ComponentId>,
}

impl Component {
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(|v| v.as_str())
    }

    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attrs.get(name).and_then(|v| v.as_i64())
    }

    pub fn attr_bool(&self, name: &str) -> bool {
        self.attrs
            .get(name)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Style attribute other than the main `style` (e.g. `disabledStyle`).
    pub fn attr_style(&self, name: &str) -> Option<StyleRef> {
        super::json::style_ref_from_value(self.attrs.get(name)?)
    }

    /// Outputs in emission order: declared outputs, then `asOutputProperties`
    /// that were not declared explicitly.
    pub fn build_outputs(&self) -> Vec<Port> {
        let mut outputs = self.outputs.clone();
        for name in &self.as_output_properties {
            if !outputs.iter().any(|o| &o.name == name) {
                outputs.push(Port::data(name.clone()));
            }
        }
        outputs
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionLine {
    pub source: String,
    pub output: String,
    pub target: String,
    pub input: String,
}

#[derive(Debug, Clone, Default)]
pub struct LocalVariable {
    pub name: String,
    pub value_type: ValueType,
    pub default_value: String,
}

/// Components of one flow in a flat arena, plus wiring.
#[derive(Debug, Clone, Default)]
pub struct FlowBody {
    pub components: Vec<Component>,
    /// Top-level components in declaration order.
    pub roots: Vec<ComponentId>,
    pub connection_lines: Vec<ConnectionLine>,
    pub local_variables: Vec<LocalVariable>,
}

impl FlowBody {
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.index()]
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.index())
    }

    /// All components, parents before children.
    pub fn preorder(&self) -> Vec<ComponentId> {
        let mut out = Vec::with_capacity(self.components.len());
        let mut stack: Vec<ComponentId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let c = self.component(id);
            if let Some(item) = c.item_widget {
                stack.push(item);
            }
            stack.extend(c.children.iter().rev().copied());
        }
        out
    }

    pub fn find_by_object_id(&self, object_id: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .position(|c| c.object_id.as_deref() == Some(object_id))
            .map(|i| ComponentId(i as u32))
    }

    pub fn find_local_variable(&self, name: &str) -> Option<usize> {
        self.local_variables.iter().position(|v| v.name == name)
    }

    /// Marker components of the given kind, sorted by vertical position.
    pub fn markers_by_top(&self, kind: ActionKind) -> Vec<ComponentId> {
        let mut ids: Vec<ComponentId> = (0..self.components.len())
            .map(|i| ComponentId(i as u32))
            .filter(|id| self.component(*id).kind == ComponentKind::Action(kind))
            .collect();
        ids.sort_by_key(|id| self.component(*id).top);
        ids
    }
}
