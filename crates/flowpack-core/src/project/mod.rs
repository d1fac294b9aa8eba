//! Project graph: a root project, its transitive imports and an optional
//! master project.
//!
//! Projects live in an arena addressed by [`ProjectId`]; assets inside them are
//! addressed by typed [`Handle`]s, so a page handle can never be used to look
//! up a style.

mod flow;
mod json;
mod loader;
mod types;

#[cfg(test)]
mod loader_tests;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub use flow::{
    ActionKind, Component, ComponentId, ComponentKind, ConnectionLine, EventHandler, FlowBody,
    HandlerType, LocalVariable, LvglKind, Port, PortKind, WidgetKind,
};
pub use loader::{GraphBuilder, ProjectError};
pub use types::{
    Action, ActionImplementation, Bitmap, BuildFile, Font, Glyph, HorizontalAlign, Language, Page, Project,
    ProjectType, Settings, Style, StyleProps, StyleRef, Texts, Theme, Variable, VerticalAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProjectId(pub u32);

impl ProjectId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Asset kinds addressable through a [`Handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Page,
    Action,
    Variable,
    Style,
    Font,
    Bitmap,
}

impl AssetKind {
    /// Singular noun used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Action => "action",
            Self::Variable => "global variable",
            Self::Style => "style",
            Self::Font => "font",
            Self::Bitmap => "bitmap",
        }
    }

    /// Name of the owning collection in a project (`pages`, `styles`, ...).
    pub fn collection(self) -> &'static str {
        match self {
            Self::Page => "pages",
            Self::Action => "actions",
            Self::Variable => "variables",
            Self::Style => "styles",
            Self::Font => "fonts",
            Self::Bitmap => "bitmaps",
        }
    }
}

/// Common view over named, optionally ided project assets.
pub trait Asset: Sized {
    const KIND: AssetKind;

    fn all(project: &Project) -> &[Self];
    fn name(&self) -> &str;
    fn id(&self) -> Option<u32>;
    fn used_in(&self) -> Option<&[String]>;
}

macro_rules! impl_asset {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Asset for $ty {
            const KIND: AssetKind = AssetKind::$kind;

            fn all(project: &Project) -> &[Self] {
                &project.$field
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn id(&self) -> Option<u32> {
                self.id
            }

            fn used_in(&self) -> Option<&[String]> {
                self.used_in.as_deref()
            }
        }
    };
}

impl_asset!(Page, Page, pages);
impl_asset!(Action, Action, actions);
impl_asset!(Variable, Variable, variables);
impl_asset!(Style, Style, styles);
impl_asset!(Font, Font, fonts);
impl_asset!(Bitmap, Bitmap, bitmaps);

/// Typed reference to an asset: owning project plus position in its collection.
pub struct Handle<T> {
    pub project: ProjectId,
    pub index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn new(project: ProjectId, index: usize) -> Self {
        Self {
            project,
            index: index as u32,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.project == other.project && self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.project.hash(state);
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}:{})", self.project.0, self.index)
    }
}

/// A flow is either a page or a flow-implemented action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowRef {
    Page(Handle<Page>),
    Action(Handle<Action>),
}

#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    projects: Vec<Project>,
    root: ProjectId,
    master: Option<ProjectId>,
}

impl ProjectGraph {
    /// Single-project graph from JSON text. Imports are not followed.
    pub fn from_json_str(json: &str) -> Result<Self, ProjectError> {
        let mut builder = GraphBuilder::new();
        let root = builder.add_json("project", json)?;
        Ok(builder.build(root))
    }

    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn root(&self) -> ProjectId {
        self.root
    }

    pub fn root_project(&self) -> &Project {
        self.project(self.root)
    }

    pub fn master(&self) -> Option<ProjectId> {
        self.master
    }

    pub fn master_project(&self) -> Option<&Project> {
        self.master.map(|id| self.project(id))
    }

    pub fn project(&self, id: ProjectId) -> &Project {
        &self.projects[id.index()]
    }

    pub fn projects(&self) -> impl Iterator<Item = (ProjectId, &Project)> {
        self.projects
            .iter()
            .enumerate()
            .map(|(i, p)| (ProjectId(i as u32), p))
    }

    pub fn is_master(&self, id: ProjectId) -> bool {
        self.master == Some(id)
    }

    pub fn get<T: Asset>(&self, handle: Handle<T>) -> &T {
        &T::all(self.project(handle.project))[handle.index as usize]
    }

    /// Handles of every asset of kind `T` in one project, in declaration order.
    pub fn handles<T: Asset>(&self, project: ProjectId) -> impl Iterator<Item = Handle<T>> + '_ {
        (0..T::all(self.project(project)).len()).map(move |i| Handle::new(project, i))
    }

    /// Find an asset by name in one project.
    pub fn find<T: Asset>(&self, project: ProjectId, name: &str) -> Option<Handle<T>> {
        T::all(self.project(project))
            .iter()
            .position(|a| a.name() == name)
            .map(|i| Handle::new(project, i))
    }

    pub fn flow_body(&self, flow: FlowRef) -> &FlowBody {
        match flow {
            FlowRef::Page(h) => &self.get(h).flow,
            FlowRef::Action(h) => &self.get(h).flow,
        }
    }

    pub fn flow_name(&self, flow: FlowRef) -> &str {
        match flow {
            FlowRef::Page(h) => &self.get(h).name,
            FlowRef::Action(h) => &self.get(h).name,
        }
    }

    /// Readable object path of a flow, e.g. `pages/Main`.
    pub fn flow_path(&self, flow: FlowRef) -> String {
        match flow {
            FlowRef::Page(h) => format!("pages/{}", self.get(h).name),
            FlowRef::Action(h) => format!("actions/{}", self.get(h).name),
        }
    }

    /// Readable object path of a component, e.g. `pages/Main/components/3`.
    pub fn component_path(&self, flow: FlowRef, component: ComponentId) -> String {
        format!("{}/components/{}", self.flow_path(flow), component.0)
    }
}
