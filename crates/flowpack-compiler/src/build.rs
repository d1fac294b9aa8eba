//! Build entry point.
//!
//! One call runs the whole pipeline on a fresh state: index assets, resolve
//! flows into a [`ResolvedModel`], then run the backends that the requested
//! sections need. Nothing survives between builds.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use flowpack_core::ProjectGraph;

use crate::assets::AssetIndex;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Section};
use crate::emit::{self, BinaryWriter, EnumSections, LvglSections, walk_model};
use crate::map::AssetsMap;
use crate::model::ResolvedModel;
use crate::{Error, Result, resolve};

/// What a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Validate only; diagnostics are the sole output.
    Check,
    /// Map and bytes, no text sections.
    #[default]
    BuildAssets,
    /// Everything, including build-time-only native resources.
    BuildFiles,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::BuildAssets => "assets",
            Self::BuildFiles => "files",
        }
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "check" => Ok(Self::Check),
            "assets" | "buildAssets" => Ok(Self::BuildAssets),
            "files" | "buildFiles" => Ok(Self::BuildFiles),
            _ => Err(format!("unknown build mode `{s}` (expected check, assets or files)")),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! section_names {
    ($($variant:ident => $name:literal, $ext:literal;)*) => {
        /// Named output of a build.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SectionName {
            $($variant,)*
        }

        impl SectionName {
            pub const ALL: &[SectionName] = &[$(Self::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// File extension used when the section is written to disk.
            pub fn extension(self) -> &'static str {
                match self {
                    $(Self::$variant => $ext,)*
                }
            }
        }

        impl FromStr for SectionName {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name => Ok(Self::$variant),)*
                    _ => Err(Error::InvalidSection(s.to_string())),
                }
            }
        }
    };
}

section_names! {
    PagesEnum => "GUI_PAGES_ENUM", "h";
    StylesEnum => "GUI_STYLES_ENUM", "h";
    FontsEnum => "GUI_FONTS_ENUM", "h";
    BitmapsEnum => "GUI_BITMAPS_ENUM", "h";
    ThemesEnum => "GUI_THEMES_ENUM", "h";
    ColorsEnum => "GUI_COLORS_ENUM", "h";
    FlowDefs => "FLOW_DEFS", "h";
    AssetsDecl => "GUI_ASSETS_DECL", "h";
    AssetsDeclCompressed => "GUI_ASSETS_DECL_COMPRESSED", "h";
    AssetsDef => "GUI_ASSETS_DEF", "c";
    AssetsDefCompressed => "GUI_ASSETS_DEF_COMPRESSED", "c";
    AssetsData => "GUI_ASSETS_DATA", "bin";
    AssetsDataMap => "GUI_ASSETS_DATA_MAP", "json";
    AssetsDataMapJs => "GUI_ASSETS_DATA_MAP_JS", "js";
    LvglScreensDecl => "LVGL_SCREENS_DECL", "h";
    LvglScreensDef => "LVGL_SCREENS_DEF", "c";
    LvglScreensDeclExt => "LVGL_SCREENS_DECL_EXT", "h";
    LvglScreensDefExt => "LVGL_SCREENS_DEF_EXT", "c";
    LvglImagesDecl => "LVGL_IMAGES_DECL", "h";
    LvglImagesDef => "LVGL_IMAGES_DEF", "c";
    LvglFontsDecl => "LVGL_FONTS_DECL", "h";
    LvglActionsDecl => "LVGL_ACTIONS_DECL", "h";
    LvglVarsDecl => "LVGL_VARS_DECL", "h";
    LvglNativeVarsTableDef => "LVGL_NATIVE_VARS_TABLE_DEF", "c";
}

impl SectionName {
    /// Produced only for projects of the source-generation family.
    pub fn is_lvgl(self) -> bool {
        self >= Self::LvglScreensDecl
    }

    /// Needs the serialized assets blob.
    pub fn needs_blob(self) -> bool {
        matches!(
            self,
            Self::AssetsDecl
                | Self::AssetsDeclCompressed
                | Self::AssetsDef
                | Self::AssetsDefCompressed
                | Self::AssetsData
        )
    }

    /// Produced in every output mode, not only when building files.
    pub fn is_asset_data(self) -> bool {
        matches!(
            self,
            Self::AssetsData | Self::AssetsDataMap | Self::AssetsDataMapJs
        )
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutput {
    Text(String),
    Binary(Vec<u8>),
}

impl SectionOutput {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub mode: BuildMode,
    /// Sections to produce; `None` builds all of them.
    pub sections: Option<Vec<SectionName>>,
    /// Only assets used in this configuration (or in every configuration).
    pub configuration: Option<String>,
}

impl BuildOptions {
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn sections(mut self, sections: impl IntoIterator<Item = SectionName>) -> Self {
        self.sections = Some(sections.into_iter().collect());
        self
    }

    pub fn configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = Some(configuration.into());
        self
    }

    /// Requested sections; layered builds default to the data blob and its map.
    fn requested(&self, layered: bool) -> Vec<SectionName> {
        match &self.sections {
            Some(sections) => sections.clone(),
            None if layered => vec![SectionName::AssetsData, SectionName::AssetsDataMap],
            None => SectionName::ALL.to_vec(),
        }
    }
}

#[derive(Debug)]
pub struct BuildResult {
    pub sections: IndexMap<SectionName, SectionOutput>,
    pub diagnostics: Diagnostics,
    /// Debugger map, absent in check mode.
    pub map: Option<AssetsMap>,
}

impl BuildResult {
    pub fn section(&self, name: SectionName) -> Option<&SectionOutput> {
        self.sections.get(&name)
    }

    pub fn text(&self, name: SectionName) -> Option<&str> {
        self.section(name).and_then(SectionOutput::as_text)
    }
}

/// Build `graph`.
///
/// Data problems are reported in the result's diagnostics; only fatal
/// serialization failures return `Err`.
pub fn build(graph: &ProjectGraph, options: &BuildOptions) -> Result<BuildResult> {
    let mode = options.mode;
    let section = match mode {
        BuildMode::Check => Section::Checks,
        _ => Section::Output,
    };
    let mut diag = Diagnostics::for_section(section);
    log::info!(
        "building `{}` ({mode} mode)",
        graph.root_project().name
    );

    let mut index = AssetIndex::new(graph, mode, options.configuration.as_deref(), &mut diag);
    let model = resolve::resolve(&mut index, &mut diag);
    index.report_unused(&mut diag);

    let mut result = BuildResult {
        sections: IndexMap::new(),
        diagnostics: Diagnostics::new(),
        map: None,
    };
    if mode == BuildMode::Check {
        result.diagnostics = diag;
        return Ok(result);
    }

    let requested = options.requested(model.layered);
    let wanted = |s: SectionName| {
        requested.contains(&s)
            && (mode == BuildMode::BuildFiles || s.is_asset_data())
            && (!s.is_lvgl() || model.is_lvgl())
    };

    let mut outputs: IndexMap<SectionName, SectionOutput> = IndexMap::new();

    if mode == BuildMode::BuildFiles {
        let mut enums = EnumSections::default();
        walk_model(&model, &mut enums);
        for (name, text) in enums.into_sections() {
            if wanted(name) {
                outputs.insert(name, SectionOutput::Text(text));
            }
        }
    }

    if SectionName::ALL.iter().any(|&s| s.needs_blob() && wanted(s)) {
        let blob = assets_blob(&model, &mut diag)?;
        for (name, output) in emit::blob_sections(&blob) {
            if wanted(name) {
                outputs.insert(name, output);
            }
        }
    }

    let map = AssetsMap::new(&model);
    if wanted(SectionName::AssetsDataMap) || wanted(SectionName::AssetsDataMapJs) {
        let json = map.to_json();
        if wanted(SectionName::AssetsDataMapJs) {
            outputs.insert(
                SectionName::AssetsDataMapJs,
                SectionOutput::Text(format!("export default {json};\n")),
            );
        }
        if wanted(SectionName::AssetsDataMap) {
            outputs.insert(SectionName::AssetsDataMap, SectionOutput::Text(json));
        }
    }

    if mode == BuildMode::BuildFiles && model.is_lvgl() {
        let mut lvgl = LvglSections::new(&model, &mut diag);
        walk_model(&model, &mut lvgl);
        for (name, text) in lvgl.into_sections() {
            if wanted(name) {
                outputs.insert(name, SectionOutput::Text(text));
            }
        }
    }

    // Report in request order.
    for name in requested {
        if let Some(output) = outputs.swap_remove(&name) {
            result.sections.insert(name, output);
        }
    }
    result.map = Some(map);
    result.diagnostics = diag;
    log::info!(
        "build finished: {} sections, {} errors, {} warnings",
        result.sections.len(),
        result.diagnostics.error_count(),
        result.diagnostics.warning_count()
    );
    Ok(result)
}

/// Header plus compressed payload.
fn assets_blob(model: &ResolvedModel, diag: &mut Diagnostics) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::new(model);
    walk_model(model, &mut writer);
    let payload = writer.finish()?;
    let blob = flowpack_format::pack(model.project_type.code(), &payload)?;

    diag.report_global(DiagnosticKind::BuildInfo)
        .message(format!("Uncompressed size: {}", payload.len()))
        .emit();
    diag.report_global(DiagnosticKind::BuildInfo)
        .message(format!(
            "Compressed size: {}",
            blob.len() - flowpack_format::HEADER_SIZE
        ))
        .emit();
    Ok(blob)
}
