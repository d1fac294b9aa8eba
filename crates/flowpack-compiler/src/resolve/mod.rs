//! Resolution of a project graph into a [`ResolvedModel`].
//!
//! Runs after the asset indexer. Flows are registered first (pages, then
//! flow actions) with their components pre-registered in pre-order, so
//! component indices are stable before any widget asks for one. Widgets are
//! resolved next because they allocate widget data items and widget actions,
//! then the flow components, which register the owners of those items.
//! Asset tables are read back last: widget and style resolution keeps
//! appending to them until then.

mod flows;
mod user_widgets;
mod widgets;

#[cfg(test)]
mod flows_tests;
#[cfg(test)]
mod user_widgets_tests;
#[cfg(test)]
mod widgets_tests;

use std::collections::HashSet;

use indexmap::IndexMap;

use flowpack_core::project::{AssetKind, ComponentId, HorizontalAlign, ProjectType, VerticalAlign};
use flowpack_core::{FlowRef, ProjectGraph, ProjectId, ValueType};
use flowpack_format::TextEncoding;
use flowpack_format::constants::style_flags;

use crate::assets::{AssetIndex, AssetRef, rgb565};
use crate::constant_pool::{ConstantPool, FlowValue};
use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceRef};
use crate::expr::literal_value;
use crate::flow_state::FlowStateTable;
use crate::model::{
    ActionRecord, BitmapRecord, ColorsRecord, FontRecord, GlyphRecord, ItemTarget, LanguageRecord,
    ResolvedFlow, ResolvedModel, ResolvedPage, StyleRecord, ThemeRecord, VariableRecord,
};

pub(crate) use user_widgets::user_widget_page;

/// Resolve every flow and widget of the indexed projects.
pub fn resolve(index: &mut AssetIndex<'_>, diag: &mut Diagnostics) -> ResolvedModel {
    Resolver::new(index, diag).run()
}

struct Resolver<'r, 'g> {
    index: &'r mut AssetIndex<'g>,
    diag: &'r mut Diagnostics,
    graph: &'g ProjectGraph,
    table: FlowStateTable,
    constants: ConstantPool,
    project_type: ProjectType,
    flow_support: bool,
    /// User-widget components that embed a page which embeds them back.
    cycles: HashSet<(FlowRef, ComponentId)>,
    dashboard_types: IndexMap<String, u16>,
}

impl<'r, 'g> Resolver<'r, 'g> {
    fn new(index: &'r mut AssetIndex<'g>, diag: &'r mut Diagnostics) -> Self {
        let graph = index.graph();
        let settings = &graph.root_project().settings;
        let project_type = settings.project_type;
        let cycles = user_widgets::find_cycles(index, diag);
        Self {
            index,
            diag,
            graph,
            table: FlowStateTable::new(),
            constants: ConstantPool::new(),
            project_type,
            flow_support: settings.flow_support || project_type == ProjectType::Dashboard,
            cycles,
            dashboard_types: IndexMap::new(),
        }
    }

    fn run(mut self) -> ResolvedModel {
        let graph = self.graph;
        let root = graph.root_project();

        if self.flow_support {
            for flow in self.index.flows() {
                self.register_flow(flow);
            }
        }

        let pages = self.pages();
        let mut flows = self.flows();
        let variables = self.variables();
        let styles = self.styles();
        let fonts = self.fonts();
        let bitmaps = self.bitmaps();
        let colors = self.colors();
        let actions = self.actions();
        let languages = languages(graph);

        let finalized = std::mem::take(&mut self.table).finalize();
        for (flow, finalized) in flows.iter_mut().zip(finalized) {
            flow.input_flags = finalized.input_flags;
            flow.inputs = finalized
                .inputs
                .into_iter()
                .map(|(component, name)| (component_position(flow, component), name))
                .collect();
            flow.widget_data_items = finalized
                .widget_data_items
                .into_iter()
                .map(|item| ItemTarget {
                    target: item.target,
                })
                .collect();
            flow.widget_actions = finalized
                .widget_actions
                .into_iter()
                .map(|item| ItemTarget {
                    target: item.target,
                })
                .collect();
        }

        let (display_width, display_height) = self.display_size(&pages);
        log::debug!(
            "resolved {} pages, {} flows, {} constants",
            pages.len(),
            flows.len(),
            self.constants.len()
        );

        ResolvedModel {
            project_name: root.name.clone(),
            project_type: self.project_type,
            flow_support: self.flow_support,
            layered: self.index.is_layered(),
            encoding: if root.settings.flow_support {
                TextEncoding::Utf8
            } else {
                TextEncoding::Utf16
            },
            display_width,
            display_height,
            pages,
            styles,
            fonts,
            bitmaps,
            colors,
            actions,
            variables,
            flows,
            constants: self.constants.into_values(),
            languages,
            dashboard_component_types: self
                .dashboard_types
                .into_iter()
                .map(|(name, code)| (code, name))
                .collect(),
        }
    }

    /// Flow index, pre-registering the flow's components on first sight.
    fn register_flow(&mut self, flow: FlowRef) -> usize {
        let known = self.table.find_flow_index(flow).is_some();
        let index = self.table.flow_index(flow);
        if !known {
            for id in self.graph.flow_body(flow).preorder() {
                self.table.component_index(flow, id);
            }
        }
        index
    }

    /// Pages in slot order. Back-filled slots copy the first real page.
    fn pages(&mut self) -> Vec<ResolvedPage> {
        let mut resolved: Vec<Option<ResolvedPage>> = Vec::new();
        // The list grows while layout views are resolved.
        let mut i = 0;
        while i < self.index.pages.len() {
            let slot = &self.index.pages.slots()[i];
            let (handle, filler) = (slot.item, slot.filler);
            resolved.push((!filler).then(|| self.resolve_page(handle)));
            i += 1;
        }

        let first = resolved.iter().flatten().next().cloned();
        resolved
            .into_iter()
            .filter_map(|page| {
                page.or_else(|| {
                    first.clone().map(|mut copy| {
                        copy.filler = true;
                        copy
                    })
                })
            })
            .collect()
    }

    fn flows(&mut self) -> Vec<ResolvedFlow> {
        let mut flows = Vec::new();
        let globals: Vec<String> = self
            .index
            .variables
            .items()
            .map(|&h| self.graph.get(h).name.clone())
            .collect();
        // Call actions may register further flows.
        for i in 0.. {
            let Some(flow) = self.table.flows().nth(i) else {
                break;
            };
            flows.push(self.resolve_flow(flow, i, &globals));
        }
        flows
    }

    fn variables(&mut self) -> Vec<VariableRecord> {
        let graph = self.graph;
        let native: HashSet<_> = self.index.native_variables().collect();
        let handles: Vec<_> = self.index.variables.items().copied().collect();
        handles
            .into_iter()
            .map(|h| {
                let variable = graph.get(h);
                let source = SourceRef::new(format!("variables/{}", variable.name))
                    .property("defaultValue");
                VariableRecord {
                    name: variable.name.clone(),
                    value_type: variable.value_type.clone(),
                    native: native.contains(&h),
                    default_value: self.default_value(
                        &variable.name,
                        &variable.value_type,
                        &variable.default_value,
                        source,
                    ),
                }
            })
            .collect()
    }

    /// Literal default of a global or local variable; anything else warns
    /// and defaults to `undefined`.
    fn default_value(
        &mut self,
        name: &str,
        value_type: &ValueType,
        text: &str,
        source: SourceRef,
    ) -> FlowValue {
        match literal_value(text) {
            Ok(Some(value)) => value.coerce(value_type),
            _ => {
                self.diag
                    .report(DiagnosticKind::NonLiteralDefault, source)
                    .message(name)
                    .emit();
                FlowValue::Undefined
            }
        }
    }

    fn styles(&mut self) -> Vec<StyleRecord> {
        let slots: Vec<_> = self.index.styles.slots().to_vec();
        slots
            .into_iter()
            .map(|slot| {
                let style = slot.item;
                let props = &style.props;
                let source = SourceRef::new(format!("{}/{}", AssetKind::Style.collection(), style.name));

                let font = match props.font.as_deref() {
                    Some(font) => {
                        let source = source.clone().property("font");
                        self.index.font_ref(style.project, font, self.diag, &source)
                    }
                    None => AssetRef::Unresolved,
                };
                let mut color = |value: Option<&str>, default: &str| {
                    self.index.color_index(value.unwrap_or(default))
                };

                let mut flags = match props.align_horizontal {
                    Some(HorizontalAlign::Left) | None => style_flags::ALIGN_LEFT,
                    Some(HorizontalAlign::Center) => style_flags::ALIGN_CENTER,
                    Some(HorizontalAlign::Right) => style_flags::ALIGN_RIGHT,
                };
                flags |= match props.align_vertical {
                    Some(VerticalAlign::Top) | None => style_flags::ALIGN_TOP,
                    Some(VerticalAlign::Center) => style_flags::ALIGN_MIDDLE,
                    Some(VerticalAlign::Bottom) => style_flags::ALIGN_BOTTOM,
                };
                if props.blink == Some(true) {
                    flags |= style_flags::BLINK;
                }

                StyleRecord {
                    name: style.name.clone(),
                    filler: slot.filler,
                    flags,
                    background_color: color(props.background_color.as_deref(), "transparent"),
                    color: color(props.color.as_deref(), "#000000"),
                    active_background_color: color(
                        props.active_background_color.as_deref(),
                        "transparent",
                    ),
                    active_color: color(props.active_color.as_deref(), "#000000"),
                    border_color: color(props.border_color.as_deref(), "transparent"),
                    font,
                    opacity: props.opacity.unwrap_or(255),
                    border_size: props.border_size.unwrap_or(0),
                    border_radius: props.border_radius.unwrap_or(0),
                    padding: props.padding.unwrap_or_default(),
                }
            })
            .collect()
    }

    fn fonts(&self) -> Vec<FontRecord> {
        let graph = self.graph;
        self.index
            .fonts
            .slots()
            .iter()
            .map(|slot| {
                let font = graph.get(slot.item);
                let mut glyphs: Vec<GlyphRecord> = font
                    .glyphs
                    .iter()
                    .map(|g| GlyphRecord {
                        encoding: g.encoding,
                        dx: g.dx,
                        width: g.width,
                        height: g.height,
                        x: g.x,
                        y: g.y,
                        pixels: g.pixels.clone(),
                    })
                    .collect();
                glyphs.sort_by_key(|g| g.encoding);
                FontRecord {
                    name: font.name.clone(),
                    filler: slot.filler,
                    ascent: font.ascent,
                    descent: font.descent,
                    bpp: font.bpp,
                    height: font.height,
                    glyphs,
                }
            })
            .collect()
    }

    fn bitmaps(&self) -> Vec<BitmapRecord> {
        let graph = self.graph;
        self.index
            .bitmaps
            .slots()
            .iter()
            .map(|slot| {
                let bitmap = graph.get(slot.item);
                BitmapRecord {
                    name: bitmap.name.clone(),
                    filler: slot.filler,
                    width: bitmap.width,
                    height: bitmap.height,
                    bpp: bitmap.bpp,
                    pixels: bitmap.pixels.clone(),
                }
            })
            .collect()
    }

    fn colors(&self) -> ColorsRecord {
        let graph = self.graph;
        let owner = graph.master_project().unwrap_or_else(|| graph.root_project());
        ColorsRecord {
            names: self.index.colors.named().to_vec(),
            themes: owner
                .themes
                .iter()
                .map(|theme| ThemeRecord {
                    name: theme.name.clone(),
                    colors: theme.colors.iter().map(|c| rgb565(c)).collect(),
                })
                .collect(),
            extra: self.index.colors.extra().iter().map(|c| rgb565(c)).collect(),
        }
    }

    fn actions(&self) -> Vec<ActionRecord> {
        let graph = self.graph;
        let native: HashSet<_> = self.index.native_actions().collect();
        self.index
            .actions
            .items()
            .map(|&h| ActionRecord {
                name: graph.get(h).name.clone(),
                native: native.contains(&h),
            })
            .collect()
    }

    fn display_size(&self, pages: &[ResolvedPage]) -> (u16, u16) {
        let settings = &self.graph.root_project().settings;
        match self.project_type {
            ProjectType::Dashboard => (1, 1),
            ProjectType::Lvgl => (settings.display_width, settings.display_height),
            ProjectType::Firmware => {
                let initial = if self.flow_support {
                    (settings.display_width as i32, settings.display_height as i32)
                } else {
                    (0, 0)
                };
                let (w, h) = pages.iter().fold(initial, |(w, h), page| {
                    (w.max(page.root.width), h.max(page.root.height))
                });
                (w.clamp(0, u16::MAX as i32) as u16, h.clamp(0, u16::MAX as i32) as u16)
            }
        }
    }
}

/// Project a flow belongs to.
fn flow_project(flow: FlowRef) -> ProjectId {
    match flow {
        FlowRef::Page(h) => h.project,
        FlowRef::Action(h) => h.project,
    }
}

fn component_position(flow: &ResolvedFlow, component: ComponentId) -> u16 {
    flow.components
        .iter()
        .position(|c| c.id == component)
        .map_or(u16::MAX, |i| i as u16)
}

/// Translations of the root project, one per text resource.
fn languages(graph: &ProjectGraph) -> Vec<LanguageRecord> {
    let texts = &graph.root_project().texts;
    texts
        .languages
        .iter()
        .map(|language| LanguageRecord {
            language_id: language.language_id.clone(),
            translations: texts
                .resources
                .iter()
                .map(|resource| {
                    language
                        .translations
                        .get(resource)
                        .cloned()
                        .unwrap_or_default()
                })
                .collect(),
        })
        .collect()
}
