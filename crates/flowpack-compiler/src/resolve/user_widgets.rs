//! User-widget cycle detection.
//!
//! A user widget embeds another page. Pages that embed each other, directly
//! or through a chain, would recurse forever when built, so every user-widget
//! component on such a chain is found up front and later built empty.

use std::collections::HashSet;

use flowpack_core::project::{Component, ComponentId, ComponentKind, LvglKind, Page, WidgetKind};
use flowpack_core::{FlowRef, Handle};

use crate::assets::AssetIndex;
use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceRef};

/// Attribute naming the embedded page, and its value.
pub(crate) fn user_widget_page(component: &Component) -> Option<(&'static str, &str)> {
    let attr = match component.kind {
        ComponentKind::Widget(WidgetKind::LayoutView) => "layout",
        ComponentKind::Lvgl(LvglKind::UserWidget) => "userWidgetPageName",
        _ => return None,
    };
    let name = component.attr_str(attr).filter(|n| !n.is_empty())?;
    Some((attr, name))
}

/// User widgets of `page` with the page each one embeds.
fn embedded(index: &AssetIndex<'_>, page: Handle<Page>) -> Vec<(ComponentId, Handle<Page>)> {
    let body = &index.graph().get(page).flow;
    body.components
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let (_, name) = user_widget_page(c)?;
            Some((ComponentId(i as u32), index.find::<Page>(page.project, name)?))
        })
        .collect()
}

fn reaches(
    index: &AssetIndex<'_>,
    from: Handle<Page>,
    to: Handle<Page>,
    visited: &mut HashSet<Handle<Page>>,
) -> bool {
    if from == to {
        return true;
    }
    if !visited.insert(from) {
        return false;
    }
    embedded(index, from)
        .into_iter()
        .any(|(_, next)| reaches(index, next, to, visited))
}

/// Every user-widget component whose embedded page leads back to its own
/// page. Each one is reported once as an error on its page attribute.
pub(super) fn find_cycles(
    index: &AssetIndex<'_>,
    diag: &mut Diagnostics,
) -> HashSet<(FlowRef, ComponentId)> {
    let graph = index.graph();
    let mut cycles = HashSet::new();

    for &project in index.projects() {
        for page in graph.handles::<Page>(project) {
            for (component, target) in embedded(index, page) {
                if !reaches(index, target, page, &mut HashSet::new()) {
                    continue;
                }
                let flow = FlowRef::Page(page);
                if !cycles.insert((flow, component)) {
                    continue;
                }
                let c = graph.flow_body(flow).component(component);
                let (attr, name) = user_widget_page(c).unwrap_or(("layout", ""));
                log::debug!("user widget cycle through `{name}` at {}", graph.flow_path(flow));
                diag.report(
                    DiagnosticKind::UserWidgetCycle,
                    SourceRef::new(graph.component_path(flow, component)).property(attr),
                )
                .message(name)
                .emit();
            }
        }
    }
    cycles
}
