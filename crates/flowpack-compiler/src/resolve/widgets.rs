//! Widget trees of pages.

use flowpack_core::project::{
    Action, Component, ComponentId, ComponentKind, HandlerType, LvglKind, Page, Port, ProjectType,
    StyleProps, WidgetKind,
};
use flowpack_core::{FlowRef, Handle, ProjectId};
use flowpack_format::constants::widget_type;

use super::{Resolver, flow_project, user_widget_page};
use crate::assets::AssetRef;
use crate::diagnostics::SourceRef;
use crate::model::{
    BindingSource, EventTarget, LvglBinding, LvglEvent, LvglProperty, LvglWidget, ResolvedPage,
    ResolvedWidget, UserWidgetRef, WidgetBinding, WidgetSpecific,
};

impl Resolver<'_, '_> {
    pub(super) fn resolve_page(&mut self, handle: Handle<Page>) -> ResolvedPage {
        let graph = self.graph;
        let page = graph.get(handle);
        let flow = FlowRef::Page(handle);
        let flow_index = self.flow_support.then(|| self.register_flow(flow) as u16);
        let source = SourceRef::new(graph.flow_path(flow));

        let style = self
            .index
            .style_ref(handle.project, page.style.as_ref(), self.diag, &source);
        let children = self.children(flow, &page.flow.roots);
        let specific = if self.project_type == ProjectType::Lvgl {
            let props = self.effective_props(style);
            self.mark_font(handle.project, &props, &source);
            WidgetSpecific::Lvgl(Box::new(LvglWidget {
                kind: LvglKind::Screen,
                text: None,
                image: None,
                props,
                bindings: Vec::new(),
                events: Vec::new(),
                user_widget: None,
                children,
            }))
        } else {
            WidgetSpecific::Container {
                children,
                overlay: WidgetBinding::Unbound,
                flags: 0,
            }
        };

        ResolvedPage {
            name: page.name.clone(),
            flow_index,
            is_user_widget: page.is_used_as_user_widget,
            filler: false,
            root: ResolvedWidget {
                component: None,
                component_index: None,
                type_name: "Page".to_string(),
                name: Some(page.name.clone()),
                type_code: widget_type::CONTAINER,
                data: WidgetBinding::Unbound,
                action: WidgetBinding::Unbound,
                left: page.left,
                top: page.top,
                width: page.width,
                height: page.height,
                style,
                specific,
            },
        }
    }

    /// Widgets among `ids` that the selected configuration includes.
    fn children(&mut self, flow: FlowRef, ids: &[ComponentId]) -> Vec<ResolvedWidget> {
        let body = self.graph.flow_body(flow);
        ids.iter()
            .filter(|&&id| {
                let c = body.component(id);
                c.kind.is_widget() && self.index.includes(c.used_in.as_deref())
            })
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|id| self.resolve_widget(flow, id))
            .collect()
    }

    pub(super) fn resolve_widget(&mut self, flow: FlowRef, id: ComponentId) -> ResolvedWidget {
        let graph = self.graph;
        let c = graph.flow_body(flow).component(id);
        let project = flow_project(flow);
        let source = SourceRef::new(graph.component_path(flow, id));

        let component_index = self
            .flow_support
            .then(|| self.table.component_index(flow, id) as u16);
        let style = self
            .index
            .style_ref(project, c.style.as_ref(), self.diag, &source);

        let (type_code, data, action, specific) = match c.kind {
            ComponentKind::Widget(kind) => (
                widget_type_code(kind),
                self.data_binding(flow, id, "data", &source),
                self.action_binding(flow, id, &source),
                self.widget_specific(flow, id, kind, &source),
            ),
            ComponentKind::Lvgl(kind) => {
                let lvgl = self.lvgl_widget(flow, id, kind, style, &source);
                (
                    widget_type::NONE,
                    WidgetBinding::Unbound,
                    WidgetBinding::Unbound,
                    WidgetSpecific::Lvgl(Box::new(lvgl)),
                )
            }
            _ => (
                widget_type::NONE,
                WidgetBinding::Unbound,
                WidgetBinding::Unbound,
                WidgetSpecific::None,
            ),
        };

        ResolvedWidget {
            component: Some(id),
            component_index,
            type_name: c.type_name.clone(),
            name: c.name.clone(),
            type_code,
            data,
            action,
            left: c.left,
            top: c.top,
            width: c.width,
            height: c.height,
            style,
            specific,
        }
    }

    /// Binding of a data-like widget property.
    ///
    /// Flow projects bind it to a widget data item of the page flow, the
    /// others name a global variable.
    fn data_binding(
        &mut self,
        flow: FlowRef,
        id: ComponentId,
        property: &str,
        source: &SourceRef,
    ) -> WidgetBinding {
        let c = self.graph.flow_body(flow).component(id);
        let Some(value) = c.properties.get(property).map(|v| v.trim()) else {
            return WidgetBinding::Unbound;
        };
        if value.is_empty() {
            return WidgetBinding::Unbound;
        }
        if self.flow_support {
            return WidgetBinding::flow_item(self.table.widget_data_item_index(flow, id, property));
        }
        let source = source.clone().property(property);
        WidgetBinding::Asset(
            self.index
                .variable_ref(flow_project(flow), value, self.diag, &source),
        )
    }

    /// Binding of the widget's `action`.
    ///
    /// A native action named directly is called by its 1-based position;
    /// anything routed through the flow becomes a widget action item.
    fn action_binding(&mut self, flow: FlowRef, id: ComponentId, source: &SourceRef) -> WidgetBinding {
        let c = self.graph.flow_body(flow).component(id);
        let name = c.attr_str("action").unwrap_or("");
        if !self.flow_support {
            if name.is_empty() {
                return WidgetBinding::Unbound;
            }
            let source = source.clone().property("action");
            return WidgetBinding::Asset(
                self.index
                    .action_ref(flow_project(flow), name, self.diag, &source),
            );
        }

        if !c.as_output_properties.iter().any(|p| p == "action") {
            if name.is_empty() {
                return WidgetBinding::Unbound;
            }
            if let Some(position) = self.index.native_action_position(name) {
                return WidgetBinding::NativeAction(position);
            }
        }
        WidgetBinding::flow_item(self.table.widget_action_index(flow, id, "action"))
    }

    fn attr_style(
        &mut self,
        project: ProjectId,
        c: &Component,
        attr: &str,
        source: &SourceRef,
    ) -> AssetRef {
        match c.attr_style(attr) {
            Some(style) => {
                let source = source.clone().property(attr);
                self.index.style_ref(project, Some(&style), self.diag, &source)
            }
            None => AssetRef::Unresolved,
        }
    }

    fn widget_specific(
        &mut self,
        flow: FlowRef,
        id: ComponentId,
        kind: WidgetKind,
        source: &SourceRef,
    ) -> WidgetSpecific {
        let graph = self.graph;
        let c = graph.flow_body(flow).component(id);
        let project = flow_project(flow);
        let text = |name: &str| c.attr_str(name).map(str::to_string);
        let gap = c.attr_i64("gap").unwrap_or(0).clamp(0, u16::MAX as i64) as u16;

        match kind {
            WidgetKind::Container => WidgetSpecific::Container {
                children: self.children(flow, &c.children),
                overlay: self.data_binding(flow, id, "overlay", source),
                flags: flag_bits(c, &["shadow"]) as u16,
            },
            WidgetKind::List => WidgetSpecific::List {
                item: self.item_widget(flow, c),
                list_type: (c.attr_str("listType") == Some("horizontal")) as u8,
                gap,
            },
            WidgetKind::Grid => WidgetSpecific::Grid {
                item: self.item_widget(flow, c),
                grid_flow: (c.attr_str("gridFlow") == Some("column")) as u8,
                gap,
            },
            WidgetKind::Select => WidgetSpecific::Select {
                children: self.children(flow, &c.children),
            },
            WidgetKind::Text => WidgetSpecific::Text {
                text: text("text"),
                flags: flag_bits(c, &["ignoreLuminosity"]),
            },
            WidgetKind::MultilineText => WidgetSpecific::MultilineText {
                text: text("text"),
                first_line_indent: c.attr_i64("firstLineIndent").unwrap_or(0) as i16,
                hanging_indent: c.attr_i64("hangingIndent").unwrap_or(0) as i16,
            },
            WidgetKind::Rectangle => WidgetSpecific::Rectangle {
                flags: flag_bits(c, &["invertColors", "ignoreLuminosity"]),
            },
            WidgetKind::Bitmap => {
                let bitmap = match c.attr_str("bitmap") {
                    Some(name) if !name.is_empty() => {
                        let source = source.clone().property("bitmap");
                        self.index.bitmap_ref(project, name, self.diag, &source)
                    }
                    _ => AssetRef::Unresolved,
                };
                WidgetSpecific::Bitmap { bitmap }
            }
            WidgetKind::Button => WidgetSpecific::Button {
                text: text("text"),
                enabled: self.data_binding(flow, id, "enabled", source),
                disabled_style: self.attr_style(project, c, "disabledStyle", source),
            },
            WidgetKind::ToggleButton => WidgetSpecific::ToggleButton {
                text1: text("text1"),
                text2: text("text2"),
            },
            WidgetKind::ButtonGroup => WidgetSpecific::ButtonGroup {
                selected_style: self.attr_style(project, c, "selectedStyle", source),
            },
            WidgetKind::BarGraph => WidgetSpecific::BarGraph {
                orientation: orientation(c.attr_str("orientation")),
                flags: flag_bits(c, &["displayValue"]),
                text_style: self.attr_style(project, c, "textStyle", source),
                line1_data: self.data_binding(flow, id, "line1Data", source),
                line1_style: self.attr_style(project, c, "line1Style", source),
                line2_data: self.data_binding(flow, id, "line2Data", source),
                line2_style: self.attr_style(project, c, "line2Style", source),
            },
            WidgetKind::LayoutView => {
                let layout = match user_widget_page(c) {
                    _ if self.cycles.contains(&(flow, id)) => AssetRef::Unresolved,
                    Some((attr, name)) => {
                        let source = source.clone().property(attr);
                        self.index.page_ref(project, name, self.diag, &source)
                    }
                    None => AssetRef::Unresolved,
                };
                WidgetSpecific::LayoutView {
                    layout,
                    context: self.data_binding(flow, id, "context", source),
                }
            }
            WidgetKind::YtGraph => WidgetSpecific::YtGraph {
                y2_data: self.data_binding(flow, id, "y2Data", source),
                y2_style: self.attr_style(project, c, "y2Style", source),
            },
            WidgetKind::UpDown => WidgetSpecific::UpDown {
                down_text: text("downButtonText"),
                up_text: text("upButtonText"),
                buttons_style: self.attr_style(project, c, "buttonsStyle", source),
            },
            WidgetKind::ListGraph => WidgetSpecific::ListGraph {
                dwell_data: self.data_binding(flow, id, "dwellData", source),
                y1_data: self.data_binding(flow, id, "y1Data", source),
                y1_style: self.attr_style(project, c, "y1Style", source),
                y2_data: self.data_binding(flow, id, "y2Data", source),
                y2_style: self.attr_style(project, c, "y2Style", source),
                cursor_data: self.data_binding(flow, id, "cursorData", source),
                cursor_style: self.attr_style(project, c, "cursorStyle", source),
            },
            WidgetKind::ScrollBar => WidgetSpecific::ScrollBar {
                left_text: text("leftButtonText"),
                right_text: text("rightButtonText"),
                thumb_style: self.attr_style(project, c, "thumbStyle", source),
                buttons_style: self.attr_style(project, c, "buttonsStyle", source),
            },
            WidgetKind::Progress => WidgetSpecific::Progress {
                orientation: orientation(c.attr_str("orientation")),
            },
            WidgetKind::DisplayData | WidgetKind::AppView | WidgetKind::Canvas => {
                WidgetSpecific::None
            }
        }
    }

    fn item_widget(&mut self, flow: FlowRef, c: &Component) -> Option<Box<ResolvedWidget>> {
        let id = c.item_widget?;
        Some(Box::new(self.resolve_widget(flow, id)))
    }

    /// Properties of the style slot `style` resolved to, for code generation.
    fn effective_props(&self, style: AssetRef) -> StyleProps {
        match style {
            AssetRef::Local(n) => self
                .index
                .styles
                .get(n as usize - 1)
                .map(|s| s.props.clone())
                .unwrap_or_default(),
            AssetRef::Master(_) | AssetRef::Unresolved => StyleProps::default(),
        }
    }

    /// Generated code references fonts by name; keep them in the font table.
    fn mark_font(&mut self, project: ProjectId, props: &StyleProps, source: &SourceRef) {
        if let Some(font) = props.font.as_deref() {
            let source = source.clone().property("font");
            self.index.font_ref(project, font, self.diag, &source);
        }
    }

    fn lvgl_widget(
        &mut self,
        flow: FlowRef,
        id: ComponentId,
        kind: LvglKind,
        style: AssetRef,
        source: &SourceRef,
    ) -> LvglWidget {
        let graph = self.graph;
        let c = graph.flow_body(flow).component(id);
        let project = flow_project(flow);

        let props = self.effective_props(style);
        self.mark_font(project, &props, source);

        let image = match c.attr_str("image") {
            Some(name) if kind == LvglKind::Image && !name.is_empty() => {
                let source = source.clone().property("image");
                self.index
                    .bitmap_ref(project, name, self.diag, &source)
                    .is_resolved()
                    .then(|| name.to_string())
            }
            _ => None,
        };

        let mut bindings = Vec::new();
        for (i, (name, value)) in c.properties.iter().enumerate() {
            let Some(property) = LvglProperty::parse(name) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let source = if self.flow_support {
                BindingSource::Flow {
                    component_index: self.table.component_index(flow, id) as u16,
                    property_index: i as u16,
                }
            } else {
                let src = source.clone().property(name.as_str());
                if !self
                    .index
                    .variable_ref(project, value, self.diag, &src)
                    .is_resolved()
                {
                    continue;
                }
                BindingSource::Variable(value.to_string())
            };
            bindings.push(LvglBinding { property, source });
        }

        let events = self.lvgl_events(flow, id, source);

        let user_widget = match user_widget_page(c) {
            Some((_, page)) if self.cycles.contains(&(flow, id)) => Some(UserWidgetRef {
                page: page.to_string(),
                cyclic: true,
            }),
            Some((attr, page)) => {
                let source = source.clone().property(attr);
                self.index
                    .page_ref(project, page, self.diag, &source)
                    .is_resolved()
                    .then(|| UserWidgetRef {
                        page: page.to_string(),
                        cyclic: false,
                    })
            }
            None => None,
        };

        LvglWidget {
            kind,
            text: c.attr_str("text").map(str::to_string),
            image,
            props,
            bindings,
            events,
            user_widget,
            children: self.children(flow, &c.children),
        }
    }

    fn lvgl_events(&mut self, flow: FlowRef, id: ComponentId, source: &SourceRef) -> Vec<LvglEvent> {
        let graph = self.graph;
        let c = graph.flow_body(flow).component(id);
        let project = flow_project(flow);
        let (_, outputs) = self.component_ports(flow, id);

        let mut events = Vec::new();
        for handler in &c.event_handlers {
            let target = match handler.handler_type {
                HandlerType::Flow => {
                    if !self.flow_support {
                        continue;
                    }
                    let Some(output_index) = outputs.iter().position(|o| o.name == handler.event)
                    else {
                        continue;
                    };
                    EventTarget::Output {
                        component_index: self.table.component_index(flow, id) as u16,
                        output_index: output_index as u16,
                    }
                }
                HandlerType::Action => {
                    let name = handler.action.as_deref().unwrap_or("");
                    if name.is_empty() {
                        continue;
                    }
                    let src = source.clone().property("eventHandlers");
                    if !self
                        .index
                        .action_ref(project, name, self.diag, &src)
                        .is_resolved()
                    {
                        continue;
                    }
                    match self.index.find::<Action>(project, name) {
                        Some(action) if self.flow_support && !graph.get(action).is_native() => {
                            EventTarget::FlowAction(self.register_flow(FlowRef::Action(action)) as u16)
                        }
                        _ => EventTarget::NativeAction(name.to_string()),
                    }
                }
            };
            events.push(LvglEvent {
                event: handler.event.clone(),
                target,
            });
        }
        events
    }
}

/// Outputs of a component in index order. Widgets of the source-generation
/// family also get one sequence output per flow event handler.
pub(super) fn component_outputs(c: &Component) -> Vec<Port> {
    let mut outputs = c.build_outputs();
    if c.catch_error && !outputs.iter().any(|o| o.name == "@error") {
        outputs.push(Port::data("@error"));
    }
    if matches!(c.kind, ComponentKind::Lvgl(_)) {
        for handler in &c.event_handlers {
            if handler.handler_type == HandlerType::Flow
                && !outputs.iter().any(|o| o.name == handler.event)
            {
                outputs.push(Port::sequence(handler.event.clone()));
            }
        }
    }
    outputs
}

pub(super) fn widget_type_code(kind: WidgetKind) -> u8 {
    use widget_type as T;
    match kind {
        WidgetKind::Container => T::CONTAINER,
        WidgetKind::List => T::LIST,
        WidgetKind::Grid => T::GRID,
        WidgetKind::Select => T::SELECT,
        WidgetKind::DisplayData => T::DISPLAY_DATA,
        WidgetKind::Text => T::TEXT,
        WidgetKind::MultilineText => T::MULTILINE_TEXT,
        WidgetKind::Rectangle => T::RECTANGLE,
        WidgetKind::Bitmap => T::BITMAP,
        WidgetKind::Button => T::BUTTON,
        WidgetKind::ToggleButton => T::TOGGLE_BUTTON,
        WidgetKind::ButtonGroup => T::BUTTON_GROUP,
        WidgetKind::BarGraph => T::BAR_GRAPH,
        WidgetKind::LayoutView => T::LAYOUT_VIEW,
        WidgetKind::YtGraph => T::YT_GRAPH,
        WidgetKind::UpDown => T::UP_DOWN,
        WidgetKind::ListGraph => T::LIST_GRAPH,
        WidgetKind::AppView => T::APP_VIEW,
        WidgetKind::ScrollBar => T::SCROLL_BAR,
        WidgetKind::Progress => T::PROGRESS,
        WidgetKind::Canvas => T::CANVAS,
    }
}

fn orientation(value: Option<&str>) -> u8 {
    match value {
        Some("right-left") => 1,
        Some("top-bottom") => 2,
        Some("bottom-top") => 3,
        _ => 0,
    }
}

/// Bit `i` is set when boolean attribute `names[i]` is true.
fn flag_bits(c: &Component, names: &[&str]) -> u8 {
    names
        .iter()
        .enumerate()
        .filter(|(_, name)| c.attr_bool(name))
        .fold(0, |bits, (i, _)| bits | 1 << i)
}
