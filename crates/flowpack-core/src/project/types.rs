//! Typed project model.
//!
//! These types are what the compiler walks. They are produced from the raw
//! JSON layer in `json.rs` and never mutated afterwards.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::value_type::ValueType;

use super::ProjectId;
use super::flow::FlowBody;

/// Target runtime family of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Firmware,
    Lvgl,
    Dashboard,
}

impl ProjectType {
    /// Code written to the `assetsType` header byte.
    pub fn code(self) -> u8 {
        match self {
            Self::Firmware => 1,
            Self::Lvgl => 2,
            Self::Dashboard => 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub project_type: ProjectType,
    pub flow_support: bool,
    /// Import paths as written in the file, relative to the project file.
    pub import_paths: Vec<String>,
    pub master_project_path: Option<String>,
    pub configurations: Vec<String>,
    pub build_files: Vec<BuildFile>,
    pub display_width: u16,
    pub display_height: u16,
}

/// Output file generated from a template with `//${eez-studio SECTION}` markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFile {
    /// May contain `<configuration>`, expanded once per build configuration.
    pub file_name: String,
    pub template: String,
}

#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Display name, the file stem for loaded projects.
    pub name: String,
    pub path: Option<PathBuf>,
    pub settings: Settings,
    /// Resolved imports, in declaration order.
    pub imports: Vec<ProjectId>,
    pub pages: Vec<Page>,
    pub actions: Vec<Action>,
    pub variables: Vec<Variable>,
    pub styles: Vec<Style>,
    pub fonts: Vec<Font>,
    pub bitmaps: Vec<Bitmap>,
    pub colors: Vec<String>,
    pub themes: Vec<Theme>,
    pub texts: Texts,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub name: String,
    pub id: Option<u32>,
    pub used_in: Option<Vec<String>>,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub style: Option<StyleRef>,
    pub is_used_as_user_widget: bool,
    pub flow: FlowBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionImplementation {
    #[default]
    Native,
    Flow,
}

#[derive(Debug, Clone, Default)]
pub struct Action {
    pub name: String,
    pub id: Option<u32>,
    pub used_in: Option<Vec<String>>,
    pub implementation: ActionImplementation,
    pub flow: FlowBody,
}

impl Action {
    pub fn is_native(&self) -> bool {
        self.implementation == ActionImplementation::Native
    }
}

#[derive(Debug, Clone, Default)]
pub struct Variable {
    pub name: String,
    pub id: Option<u32>,
    pub used_in: Option<Vec<String>>,
    pub value_type: ValueType,
    /// Expression text evaluated once at startup.
    pub default_value: String,
    pub native: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Visual properties of a style. `None` means "inherit".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleProps {
    pub font: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub active_color: Option<String>,
    pub active_background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_size: Option<u8>,
    pub border_radius: Option<u8>,
    pub align_horizontal: Option<HorizontalAlign>,
    pub align_vertical: Option<VerticalAlign>,
    pub padding: Option<[u8; 4]>,
    pub opacity: Option<u8>,
    pub blink: Option<bool>,
}

impl StyleProps {
    /// Fill every unset property from `parent`.
    pub fn inherit(&mut self, parent: &StyleProps) {
        macro_rules! fill {
            ($($field:ident),*) => {
                $(if self.$field.is_none() {
                    self.$field = parent.$field.clone();
                })*
            };
        }
        fill!(
            font,
            color,
            background_color,
            active_color,
            active_background_color,
            border_color,
            border_size,
            border_radius,
            align_horizontal,
            align_vertical,
            padding,
            opacity,
            blink
        );
    }

    pub fn is_empty(&self) -> bool {
        *self == StyleProps::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub name: String,
    pub id: Option<u32>,
    pub used_in: Option<Vec<String>>,
    pub inherit_from: Option<String>,
    pub always_build: bool,
    pub props: StyleProps,
}

/// A style reference on a widget: either a named style or an inline definition.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleRef {
    Named(String),
    Inline(Box<Style>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    pub encoding: u32,
    pub dx: i8,
    pub x: i8,
    pub y: i8,
    pub width: u8,
    pub height: u8,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct Font {
    pub name: String,
    pub id: Option<u32>,
    pub used_in: Option<Vec<String>>,
    pub always_build: bool,
    pub bpp: u8,
    pub height: u8,
    pub ascent: u8,
    pub descent: u8,
    pub glyphs: Vec<Glyph>,
}

#[derive(Debug, Clone, Default)]
pub struct Bitmap {
    pub name: String,
    pub id: Option<u32>,
    pub used_in: Option<Vec<String>>,
    pub always_build: bool,
    pub bpp: u8,
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub name: String,
    /// One value per entry of `Project::colors`.
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Language {
    pub language_id: String,
    pub translations: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Texts {
    pub resources: Vec<String>,
    pub languages: Vec<Language>,
}
