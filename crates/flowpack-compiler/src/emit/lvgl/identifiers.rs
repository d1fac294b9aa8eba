//! Field layout of the generated `objects_t` struct.
//!
//! Screens come first, then every screen-level widget in preorder. A user
//! widget instance is followed by a contiguous block holding the fields of
//! the embedded page (`<instance>__<inner>`), so the page's own functions
//! can address them through `startWidgetIndex`.

use std::collections::{HashMap, HashSet};

use flowpack_core::project::ComponentId;
use flowpack_core::utils::to_lower_snake_case;

use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceRef};
use crate::model::{LvglWidget, ResolvedModel, ResolvedWidget};

/// Page slot plus component; `None` is the page root.
pub(super) type ObjectKey = (usize, Option<ComponentId>);

const GENERATED_PREFIX: &str = "obj";

#[derive(Debug, Default)]
pub(super) struct ObjectTable {
    pub fields: Vec<String>,
    used: HashSet<String>,
    /// Identifier before de-duplication.
    names: HashMap<ObjectKey, String>,
    /// Field index of screens and screen-level widgets.
    global: HashMap<ObjectKey, usize>,
    /// Offset inside the owning user-widget page's block.
    local: HashMap<ObjectKey, usize>,
    /// Block layout of user-widget pages, by page slot.
    layouts: HashMap<usize, Vec<String>>,
}

/// Where generated code reaches an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ObjectSlot {
    Field(usize),
    Local(usize),
}

impl ObjectTable {
    pub fn build(model: &ResolvedModel, diag: &mut Diagnostics) -> Self {
        let mut table = Self::default();

        let mut generated = 0;
        for (p, page) in model.pages.iter().enumerate().filter(|(_, p)| !p.filler) {
            for_each_widget(page.root.children(), &mut |widget| {
                if widget.lvgl().is_none() {
                    return;
                }
                let name = match widget.name.as_deref() {
                    Some(name) if !name.is_empty() => to_lower_snake_case(name),
                    _ => {
                        generated += 1;
                        format!("{GENERATED_PREFIX}{}", generated - 1)
                    }
                };
                table.names.insert((p, widget.component), name);
            });
        }

        let screens: Vec<usize> = model
            .pages
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.filler && !p.is_user_widget)
            .map(|(i, _)| i)
            .collect();

        for &p in &screens {
            let page = &model.pages[p];
            let source = || SourceRef::new(format!("pages/{}", page.name));
            let index = table.push_field(to_lower_snake_case(&page.name), diag, source);
            table.global.insert((p, None), index);
        }
        for &p in &screens {
            table.place(model, p, model.pages[p].root.children(), diag);
        }

        for (p, page) in model.pages.iter().enumerate() {
            if !page.filler && page.is_user_widget {
                table.layout(model, p, &mut HashSet::new());
            }
        }
        table
    }

    pub fn slot(&self, key: ObjectKey) -> Option<ObjectSlot> {
        if let Some(&index) = self.global.get(&key) {
            return Some(ObjectSlot::Field(index));
        }
        self.local.get(&key).map(|&offset| ObjectSlot::Local(offset))
    }

    /// Expression evaluating to the object's `lv_obj_t *`.
    pub fn accessor(&self, key: ObjectKey) -> Option<String> {
        Some(match self.slot(key)? {
            ObjectSlot::Field(index) => format!("objects.{}", self.fields[index]),
            ObjectSlot::Local(offset) => {
                format!("((lv_obj_t **)&objects)[startWidgetIndex + {offset}]")
            }
        })
    }

    /// Start of the block that follows a user widget instance.
    pub fn block_start(&self, key: ObjectKey) -> Option<String> {
        Some(match self.slot(key)? {
            ObjectSlot::Field(index) => (index + 1).to_string(),
            ObjectSlot::Local(offset) => format!("startWidgetIndex + {}", offset + 1),
        })
    }

    /// Identifier used in generated function names.
    pub fn identifier(&self, key: ObjectKey) -> Option<&str> {
        match self.slot(key)? {
            ObjectSlot::Field(index) => Some(&self.fields[index]),
            ObjectSlot::Local(_) => self.names.get(&key).map(String::as_str),
        }
    }

    fn push_field(
        &mut self,
        name: String,
        diag: &mut Diagnostics,
        source: impl FnOnce() -> SourceRef,
    ) -> usize {
        let mut field = name.clone();
        if self.used.contains(&field) {
            diag.report(DiagnosticKind::DuplicateIdentifier, source())
                .message(name.as_str())
                .emit();
            let mut suffix = 1;
            while self.used.contains(&format!("{name}_{suffix}")) {
                suffix += 1;
            }
            field = format!("{name}_{suffix}");
        }
        self.used.insert(field.clone());
        self.fields.push(field);
        self.fields.len() - 1
    }

    fn place(
        &mut self,
        model: &ResolvedModel,
        page: usize,
        widgets: &[ResolvedWidget],
        diag: &mut Diagnostics,
    ) {
        for widget in widgets {
            let Some(lvgl) = widget.lvgl() else {
                continue;
            };
            let key = (page, widget.component);
            let name = self.names.get(&key).cloned().unwrap_or_default();
            let source = || widget_source(model, key);
            let index = self.push_field(name, diag, source);
            self.global.insert(key, index);

            if let Some(target) = user_widget_target(model, lvgl) {
                let prefix = self.fields[index].clone();
                for inner in self.layout(model, target, &mut HashSet::new()) {
                    self.push_field(format!("{prefix}__{inner}"), diag, source);
                }
            }
            self.place(model, page, &lvgl.children, diag);
        }
    }

    fn layout(
        &mut self,
        model: &ResolvedModel,
        page: usize,
        visiting: &mut HashSet<usize>,
    ) -> Vec<String> {
        if let Some(layout) = self.layouts.get(&page) {
            return layout.clone();
        }
        if !visiting.insert(page) {
            return Vec::new();
        }
        let mut entries = Vec::new();
        self.lay_out(model, page, model.pages[page].root.children(), &mut entries, visiting);
        visiting.remove(&page);
        self.layouts.insert(page, entries.clone());
        entries
    }

    fn lay_out(
        &mut self,
        model: &ResolvedModel,
        page: usize,
        widgets: &[ResolvedWidget],
        entries: &mut Vec<String>,
        visiting: &mut HashSet<usize>,
    ) {
        for widget in widgets {
            let Some(lvgl) = widget.lvgl() else {
                continue;
            };
            let key = (page, widget.component);
            let name = self.names.get(&key).cloned().unwrap_or_default();
            self.local.insert(key, entries.len());
            entries.push(name.clone());

            if let Some(target) = user_widget_target(model, lvgl) {
                for inner in self.layout(model, target, visiting) {
                    entries.push(format!("{name}__{inner}"));
                }
            }
            self.lay_out(model, page, &lvgl.children, entries, visiting);
        }
    }
}

/// Page slot embedded by a non-cyclic user widget.
pub(super) fn user_widget_target(model: &ResolvedModel, lvgl: &LvglWidget) -> Option<usize> {
    let user_widget = lvgl.user_widget.as_ref().filter(|u| !u.cyclic)?;
    model
        .pages
        .iter()
        .position(|p| !p.filler && p.name == user_widget.page)
}

pub(super) fn for_each_widget<'a, F>(widgets: &'a [ResolvedWidget], f: &mut F)
where
    F: FnMut(&'a ResolvedWidget),
{
    for widget in widgets {
        f(widget);
        for_each_widget(widget.children(), f);
    }
}

fn widget_source(model: &ResolvedModel, (page, component): ObjectKey) -> SourceRef {
    let path = format!("pages/{}", model.pages[page].name);
    match component {
        Some(id) => SourceRef::new(format!("{path}/components/{}", id.index())),
        None => SourceRef::new(path),
    }
}
