use flowpack_core::project::{
    Action, Asset, AssetKind, Bitmap, Font, Page, ProjectType, Style, Variable,
};
use flowpack_core::{FlowRef, Handle, ProjectGraph, ProjectId};

use super::styles::ResolvedStyle;
use super::{AssetList, AssetRef, ColorTable, MAX_ASSET_ID};
use crate::build::BuildMode;
use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceRef};

/// Resolved asset arrays of one build.
#[derive(Debug)]
pub struct AssetIndex<'g> {
    pub(super) graph: &'g ProjectGraph,
    mode: BuildMode,
    configuration: Option<String>,
    /// Root first, then imports depth-first.
    projects: Vec<ProjectId>,
    pub pages: AssetList<Handle<Page>>,
    pub actions: AssetList<Handle<Action>>,
    native_actions_start: usize,
    pub variables: AssetList<Handle<Variable>>,
    native_variables_start: usize,
    pub styles: AssetList<ResolvedStyle>,
    pub fonts: AssetList<Handle<Font>>,
    pub bitmaps: AssetList<Handle<Bitmap>>,
    pub colors: ColorTable,
}

impl<'g> AssetIndex<'g> {
    pub fn new(
        graph: &'g ProjectGraph,
        mode: BuildMode,
        configuration: Option<&str>,
        diag: &mut Diagnostics,
    ) -> Self {
        let mut projects = Vec::new();
        collect_projects(graph, graph.root(), &mut projects);

        let named_colors = graph
            .master_project()
            .unwrap_or_else(|| graph.root_project())
            .colors
            .clone();

        let mut index = Self {
            graph,
            mode,
            configuration: configuration.map(str::to_string),
            projects,
            pages: AssetList::new(),
            actions: AssetList::new(),
            native_actions_start: 0,
            variables: AssetList::new(),
            native_variables_start: 0,
            styles: AssetList::new(),
            fonts: AssetList::new(),
            bitmaps: AssetList::new(),
            colors: ColorTable::new(named_colors, graph.master().is_some()),
        };

        index.pages = index.place::<Page>(|_| true, |_| true, diag);

        let build_files = mode == BuildMode::BuildFiles;
        let native_variable = |v: &Variable| v.native && (build_files || v.id.is_some());
        (index.variables, index.native_variables_start) =
            index.partitioned::<Variable>(native_variable, diag);

        let native_action = |a: &Action| a.is_native() && (build_files || a.id.is_some());
        (index.actions, index.native_actions_start) =
            index.partitioned::<Action>(native_action, diag);

        if graph.root_project().settings.project_type != ProjectType::Dashboard {
            let styles = index.place::<Style>(|_| true, |s| s.always_build, diag);
            index.styles = styles.map(|h| index.resolved_style(h));
            index.fonts = index.place::<Font>(|_| true, |f| f.always_build, diag);
            index.bitmaps = index.place::<Bitmap>(|_| true, |b| b.always_build, diag);
        }

        log::debug!(
            "indexed {} pages, {} actions, {} variables, {} styles, {} fonts, {} bitmaps",
            index.pages.len(),
            index.actions.len(),
            index.variables.len(),
            index.styles.len(),
            index.fonts.len(),
            index.bitmaps.len()
        );
        index
    }

    pub fn graph(&self) -> &'g ProjectGraph {
        self.graph
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Projects whose assets are indexed: the root and its imports.
    pub fn projects(&self) -> &[ProjectId] {
        &self.projects
    }

    /// Whether the root is a layer on top of a master project.
    pub fn is_layered(&self) -> bool {
        self.graph.master().is_some()
    }

    /// Configuration filter: assets without `usedIn` are always included.
    pub fn includes(&self, used_in: Option<&[String]>) -> bool {
        match (&self.configuration, used_in) {
            (Some(configuration), Some(used_in)) => used_in.contains(configuration),
            _ => true,
        }
    }

    fn candidates<T: Asset>(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<Handle<T>> {
        let graph = self.graph;
        self.projects
            .iter()
            .flat_map(|&p| graph.handles::<T>(p))
            .filter(|&h| {
                let asset = graph.get(h);
                self.includes(asset.used_in()) && pred(asset)
            })
            .collect()
    }

    /// Ided candidates at `id - 1`, then un-ided ones accepted by `unided`.
    fn place<T: Asset>(
        &self,
        pred: impl Fn(&T) -> bool,
        unided: impl Fn(&T) -> bool,
        diag: &mut Diagnostics,
    ) -> AssetList<Handle<T>> {
        let graph = self.graph;
        let ided = self
            .candidates(|a: &T| pred(a) && persisted_id(a).is_some())
            .into_iter()
            .filter_map(|h| Some((persisted_id(graph.get(h))?, h)))
            .collect();
        let rest = self.candidates(|a: &T| pred(a) && persisted_id(a).is_none() && unided(a));
        AssetList::place(T::KIND, ided, rest, diag)
    }

    /// Non-native partition first, then the native one, each placed by id.
    /// Also returns where the native partition starts.
    fn partitioned<T: Asset>(
        &self,
        native: impl Fn(&T) -> bool + Copy,
        diag: &mut Diagnostics,
    ) -> (AssetList<Handle<T>>, usize) {
        let mut list = self.place(move |a: &T| !native(a), |_| true, diag);
        let start = list.len();
        list.append(self.place(native, |_| true, diag));
        (list, start)
    }

    /// Find an asset visible from `from`: its own project, its imports, the
    /// root and the other imported projects, then the master.
    pub fn find<T: Asset>(&self, from: ProjectId, name: &str) -> Option<Handle<T>> {
        if name.is_empty() {
            return None;
        }
        let graph = self.graph;
        std::iter::once(from)
            .chain(graph.project(from).imports.iter().copied())
            .chain(self.projects.iter().copied())
            .chain(graph.master())
            .find_map(|p| graph.find::<T>(p, name))
    }

    /// Flows in index order: resolved pages, then flow-implemented actions.
    pub fn flows(&self) -> Vec<FlowRef> {
        let mut flows: Vec<FlowRef> = Vec::new();
        for (_, &page) in self.pages.real() {
            let flow = FlowRef::Page(page);
            if !flows.contains(&flow) {
                flows.push(flow);
            }
        }
        flows.extend(
            self.candidates(|a: &Action| !a.is_native())
                .into_iter()
                .map(FlowRef::Action),
        );
        flows
    }

    /// 1-based position of a native action among the native partition.
    pub fn native_action_position(&self, name: &str) -> Option<u32> {
        let graph = self.graph;
        self.actions.slots()[self.native_actions_start..]
            .iter()
            .position(|s| graph.get(s.item).name == name)
            .map(|i| i as u32 + 1)
    }

    /// Resolved action by name.
    pub fn action_by_name(&self, name: &str) -> Option<Handle<Action>> {
        let graph = self.graph;
        self.actions
            .items()
            .find(|&&h| graph.get(h).name == name)
            .copied()
    }

    pub fn native_actions(&self) -> impl Iterator<Item = Handle<Action>> + '_ {
        self.actions.slots()[self.native_actions_start..]
            .iter()
            .map(|s| s.item)
    }

    pub fn native_variables(&self) -> impl Iterator<Item = Handle<Variable>> + '_ {
        self.variables.slots()[self.native_variables_start..]
            .iter()
            .map(|s| s.item)
    }

    /// 0-based position of a global variable, used by expressions.
    pub fn variable_position(&self, name: &str) -> Option<usize> {
        let graph = self.graph;
        self.variables.position(|&h| graph.get(h).name == name)
    }

    pub fn page_ref(
        &mut self,
        from: ProjectId,
        name: &str,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        let found = self.find::<Page>(from, name);
        resolve(self.graph, found, name, &mut self.pages, diag, source)
    }

    pub fn variable_ref(
        &mut self,
        from: ProjectId,
        name: &str,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        let found = self.find::<Variable>(from, name);
        resolve(self.graph, found, name, &mut self.variables, diag, source)
    }

    pub fn action_ref(
        &mut self,
        from: ProjectId,
        name: &str,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        let found = self.find::<Action>(from, name);
        resolve(self.graph, found, name, &mut self.actions, diag, source)
    }

    pub fn font_ref(
        &mut self,
        from: ProjectId,
        name: &str,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        let found = self.find::<Font>(from, name);
        resolve(self.graph, found, name, &mut self.fonts, diag, source)
    }

    pub fn bitmap_ref(
        &mut self,
        from: ProjectId,
        name: &str,
        diag: &mut Diagnostics,
        source: &SourceRef,
    ) -> AssetRef {
        let found = self.find::<Bitmap>(from, name);
        resolve(self.graph, found, name, &mut self.bitmaps, diag, source)
    }

    pub fn color_index(&mut self, color: &str) -> u16 {
        self.colors.index(color)
    }

    /// Info diagnostics for root project styles, fonts and bitmaps that
    /// nothing referenced.
    pub fn report_unused(&self, diag: &mut Diagnostics) {
        let graph = self.graph;
        let root = graph.root();

        for handle in graph.handles::<Style>(root) {
            if !self.is_style_used(handle) {
                report_unused(diag, graph.get(handle));
            }
        }
        for handle in graph.handles::<Font>(root) {
            if !self.fonts.items().any(|&h| h == handle) {
                report_unused(diag, graph.get(handle));
            }
        }
        for handle in graph.handles::<Bitmap>(root) {
            if !self.bitmaps.items().any(|&h| h == handle) {
                report_unused(diag, graph.get(handle));
            }
        }
    }

    /// A style is used when it is resolved or an ancestor of a resolved style.
    fn is_style_used(&self, handle: Handle<Style>) -> bool {
        self.styles.items().any(|used| {
            let Some(origin) = used.origin() else {
                return false;
            };
            self.ancestry(origin).contains(&handle)
        })
    }
}

/// Persisted ids start at 1; 0 counts as unassigned.
fn persisted_id<T: Asset>(asset: &T) -> Option<u32> {
    asset.id().filter(|&id| id > 0)
}

fn collect_projects(graph: &ProjectGraph, project: ProjectId, out: &mut Vec<ProjectId>) {
    if out.contains(&project) {
        return;
    }
    out.push(project);
    for &import in &graph.project(project).imports {
        collect_projects(graph, import, out);
    }
}

fn report_unused<T: Asset>(diag: &mut Diagnostics, asset: &T) {
    let label = T::KIND.label();
    diag.report(
        DiagnosticKind::UnusedAsset,
        SourceRef::new(format!("{}/{}", T::KIND.collection(), asset.name())),
    )
    .message(format!("{label}: {}", asset.name()))
    .emit();
}

/// Position of `found` in `list`, appending it on first use.
///
/// Master project assets are never copied: they resolve to their persisted
/// id, and without one they cannot be referenced at all.
fn resolve<T: Asset>(
    graph: &ProjectGraph,
    found: Option<Handle<T>>,
    name: &str,
    list: &mut AssetList<Handle<T>>,
    diag: &mut Diagnostics,
    source: &SourceRef,
) -> AssetRef {
    let Some(handle) = found else {
        if !name.is_empty() {
            report_not_found(diag, T::KIND, name, source);
        }
        return AssetRef::Unresolved;
    };

    if let Some(i) = list.position(|&h| h == handle) {
        return AssetRef::Local(i as u32 + 1);
    }
    if graph.is_master(handle.project) {
        return master_ref(diag, T::KIND, persisted_id(graph.get(handle)), source);
    }
    AssetRef::Local(list.push(handle))
}

pub(super) fn master_ref(
    diag: &mut Diagnostics,
    kind: AssetKind,
    id: Option<u32>,
    source: &SourceRef,
) -> AssetRef {
    match id {
        Some(id) if id > MAX_ASSET_ID => {
            diag.report(DiagnosticKind::AssetIdOutOfRange, source.clone())
                .message(format!("master project {} with ID = {id}", kind.label()))
                .emit();
            AssetRef::Unresolved
        }
        Some(id) => AssetRef::Master(id),
        None => {
            diag.report(DiagnosticKind::MasterAssetWithoutId, source.clone())
                .message(kind.label())
                .emit();
            AssetRef::Unresolved
        }
    }
}

pub(super) fn report_not_found(
    diag: &mut Diagnostics,
    kind: AssetKind,
    name: &str,
    source: &SourceRef,
) {
    diag.report(DiagnosticKind::AssetNotFound, source.clone())
        .message(format!("{} `{name}`", kind.label()))
        .emit();
}
