//! Style resolution.
//!
//! Named styles are deduplicated by handle, inline styles by their
//! effective properties. A style that adds nothing to its parent resolves
//! to the parent's slot.

use flowpack_core::project::{AssetKind, Style, StyleProps, StyleRef};
use flowpack_core::{Handle, ProjectId};

use super::indexer::{AssetIndex, master_ref, report_not_found};
use super::{AssetRef, MAX_ASSET_ID};
use crate::diagnostics::{Diagnostics, SourceRef};

/// Entry of the resolved style table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub name: String,
    /// Named style this entry stands for. `None` for inline definitions.
    pub source: Option<Handle<Style>>,
    /// Parent of an inline definition.
    pub parent: Option<Handle<Style>>,
    /// Project the style is defined in; its font is looked up from there.
    pub project: ProjectId,
    /// Properties with the inheritance chain applied.
    pub props: StyleProps,
}

impl ResolvedStyle {
    /// First named style in this entry's inheritance chain.
    pub fn origin(&self) -> Option<Handle<Style>> {
        self.source.or(self.parent)
    }
}

impl AssetIndex<'_> {
    pub(super) fn resolved_style(&self, handle: Handle<Style>) -> ResolvedStyle {
        ResolvedStyle {
            name: self.graph.get(handle).name.clone(),
            source: Some(handle),
            parent: None,
            project: handle.project,
            props: self.effective_props(handle),
        }
    }

    fn parent_of(&self, project: ProjectId, style: &Style) -> Option<Handle<Style>> {
        let parent = style.inherit_from.as_deref()?;
        self.find::<Style>(project, parent)
    }

    /// The style itself followed by its ancestors. Stops at the first cycle.
    pub fn ancestry(&self, handle: Handle<Style>) -> Vec<Handle<Style>> {
        let mut chain = vec![handle];
        let mut current = handle;
        while let Some(parent) = self.parent_of(current.project, self.graph.get(current)) {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn effective_props(&self, handle: Handle<Style>) -> StyleProps {
        let mut props = StyleProps::default();
        for ancestor in self.ancestry(handle) {
            props.inherit(&self.graph.get(ancestor).props);
        }
        props
    }

    /// Style index of a widget.
    ///
    /// Widgets without a style use the root project's `default` style when
    /// it exists.
    pub fn style_ref(
        &mut self,
        from: ProjectId,
        style: Option<&StyleRef>,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        match style {
            Some(StyleRef::Named(name)) => self.named_style_ref(from, name, diag, source),
            Some(StyleRef::Inline(style)) => self.inline_style_ref(from, style, diag, source),
            None => {
                let root = self.graph.root();
                if self.graph.find::<Style>(root, "default").is_none() {
                    return AssetRef::Unresolved;
                }
                self.named_style_ref(root, "default", diag, source)
            }
        }
    }

    pub fn named_style_ref(
        &mut self,
        from: ProjectId,
        name: &str,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        if name.is_empty() {
            return AssetRef::Unresolved;
        }
        let Some(handle) = self.find::<Style>(from, name) else {
            report_not_found(diag, AssetKind::Style, name, source);
            return AssetRef::Unresolved;
        };
        self.style_handle_ref(handle, diag, source, &mut Vec::new())
    }

    fn style_handle_ref(
        &mut self,
        handle: Handle<Style>,
        diag: &mut Diagnostics,
        source: &SourceRef,
        visiting: &mut Vec<Handle<Style>>,
    ) -> AssetRef {
        if let Some(i) = self.styles.position(|s| s.source == Some(handle)) {
            return AssetRef::Local(i as u32 + 1);
        }

        let graph = self.graph;
        let style = graph.get(handle);
        if graph.is_master(handle.project) {
            return master_ref(diag, AssetKind::Style, style.id.filter(|&id| id > 0), source);
        }
        if let Some(id) = style.id.filter(|&id| (1..=MAX_ASSET_ID).contains(&id)) {
            return AssetRef::Local(id);
        }

        // Nothing added on top of the parent: share its slot.
        if style.props.is_empty()
            && let Some(parent) = self.parent_of(handle.project, style)
            && !visiting.contains(&parent)
        {
            visiting.push(handle);
            return self.style_handle_ref(parent, diag, source, visiting);
        }

        let resolved = self.resolved_style(handle);
        if let Some(i) = self
            .styles
            .position(|s| s.source.is_none() && s.props == resolved.props)
        {
            return AssetRef::Local(i as u32 + 1);
        }
        AssetRef::Local(self.styles.push(resolved))
    }

    pub fn inline_style_ref(
        &mut self,
        from: ProjectId,
        style: &Style,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        let parent = self.parent_of(from, style);
        if let Some(parent_name) = style.inherit_from.as_deref()
            && parent.is_none()
        {
            report_not_found(diag, AssetKind::Style, parent_name, source);
        }

        if style.props.is_empty() {
            return match parent {
                Some(parent) => self.style_handle_ref(parent, diag, source, &mut Vec::new()),
                None => AssetRef::Unresolved,
            };
        }

        let mut props = style.props.clone();
        if let Some(parent) = parent {
            let inherited = self.effective_props(parent);
            props.inherit(&inherited);
            if props == inherited {
                return self.style_handle_ref(parent, diag, source, &mut Vec::new());
            }
        }
        if let Some(i) = self.styles.position(|s| s.props == props) {
            return AssetRef::Local(i as u32 + 1);
        }

        AssetRef::Local(self.styles.push(ResolvedStyle {
            name: style.name.clone(),
            source: None,
            parent,
            project: from,
            props,
        }))
    }
}
