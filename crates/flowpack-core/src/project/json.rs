//! JSON deserialization for project files.
//!
//! The raw layer mirrors the file 1:1 (camelCase keys, lenient defaults) and
//! is converted into the typed model with `From` impls. Nested components are
//! flattened into the per-flow arena here.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::value_type::ValueType;

use super::flow::{
    Component, ComponentId, ComponentKind, ConnectionLine, EventHandler, FlowBody, HandlerType,
    LocalVariable, Port, PortKind,
};
use super::types::{
    Action, ActionImplementation, Bitmap, BuildFile, Font, Glyph, Language, Page, Project, ProjectType,
    Settings, Style, StyleProps, StyleRef, Texts, Theme, Variable,
};

pub(crate) fn parse_project(json: &str) -> Result<Project, serde_json::Error> {
    let raw: RawProject = serde_json::from_str(json)?;
    Ok(raw.into())
}

/// Interpret a JSON value as a style reference (name or inline object).
pub(crate) fn style_ref_from_value(value: &serde_json::Value) -> Option<StyleRef> {
    match value {
        serde_json::Value::String(name) if !name.is_empty() => Some(StyleRef::Named(name.clone())),
        serde_json::Value::Object(_) => {
            let raw: RawStyle = serde_json::from_value(value.clone()).ok()?;
            Some(StyleRef::Inline(Box::new(raw.into())))
        }
        _ => None,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawProject {
    settings: RawSettings,
    pages: Vec<RawPage>,
    actions: Vec<RawAction>,
    variables: Vec<RawVariable>,
    styles: Vec<RawStyle>,
    fonts: Vec<RawFont>,
    bitmaps: Vec<RawBitmap>,
    colors: Vec<RawNamed>,
    themes: Vec<RawTheme>,
    texts: RawTexts,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSettings {
    general: RawGeneral,
    build: RawBuild,
    display: RawDisplay,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawGeneral {
    project_type: ProjectType,
    flow_support: bool,
    imports: Vec<RawImport>,
    master_project: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawImport {
    project_file_path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBuild {
    configurations: Vec<RawNamed>,
    files: Vec<RawBuildFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawBuildFile {
    file_name: String,
    template: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDisplay {
    width: u16,
    height: u16,
}

impl Default for RawDisplay {
    fn default() -> Self {
        Self {
            width: 480,
            height: 272,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNamed {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPage {
    name: String,
    id: Option<u32>,
    used_in: Option<Vec<String>>,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    style: Option<serde_json::Value>,
    is_used_as_user_widget: bool,
    components: Vec<RawComponent>,
    connection_lines: Vec<RawConnectionLine>,
    local_variables: Vec<RawLocalVariable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawAction {
    name: String,
    id: Option<u32>,
    used_in: Option<Vec<String>>,
    implementation_type: Option<String>,
    components: Vec<RawComponent>,
    connection_lines: Vec<RawConnectionLine>,
    local_variables: Vec<RawLocalVariable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawVariable {
    name: String,
    id: Option<u32>,
    used_in: Option<Vec<String>>,
    #[serde(rename = "type")]
    value_type: String,
    default_value: String,
    native: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLocalVariable {
    name: String,
    #[serde(rename = "type")]
    value_type: String,
    default_value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStyle {
    name: String,
    id: Option<u32>,
    used_in: Option<Vec<String>>,
    inherit_from: Option<String>,
    always_build: bool,
    #[serde(flatten)]
    props: StyleProps,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawGlyph {
    encoding: u32,
    dx: i8,
    x: i8,
    y: i8,
    width: u8,
    height: u8,
    pixels: Vec<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFont {
    name: String,
    id: Option<u32>,
    used_in: Option<Vec<String>>,
    always_build: bool,
    bpp: u8,
    height: u8,
    ascent: u8,
    descent: u8,
    glyphs: Vec<RawGlyph>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawBitmap {
    name: String,
    id: Option<u32>,
    used_in: Option<Vec<String>>,
    always_build: bool,
    bpp: u8,
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTheme {
    name: String,
    colors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTexts {
    resources: Vec<RawResource>,
    languages: Vec<RawLanguage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawResource {
    resource_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLanguage {
    language_id: String,
    translations: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPort {
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    optional: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawEventHandler {
    event: String,
    handler_type: Option<String>,
    action: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawComponent {
    #[serde(rename = "type")]
    type_name: String,
    id: Option<String>,
    name: Option<String>,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    style: Option<serde_json::Value>,
    properties: IndexMap<String, String>,
    attrs: IndexMap<String, serde_json::Value>,
    inputs: Vec<RawPort>,
    outputs: Vec<RawPort>,
    as_output_properties: Vec<String>,
    event_handlers: Vec<RawEventHandler>,
    catch_error: bool,
    used_in: Option<Vec<String>>,
    children: Vec<RawComponent>,
    item_widget: Option<Box<RawComponent>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConnectionLine {
    source: String,
    output: String,
    target: String,
    input: String,
}

impl From<RawProject> for Project {
    fn from(raw: RawProject) -> Self {
        let general = raw.settings.general;
        Self {
            name: String::new(),
            path: None,
            settings: Settings {
                project_type: general.project_type,
                flow_support: general.flow_support,
                import_paths: general
                    .imports
                    .into_iter()
                    .map(|i| i.project_file_path)
                    .filter(|p| !p.is_empty())
                    .collect(),
                master_project_path: general.master_project.filter(|p| !p.is_empty()),
                configurations: raw
                    .settings
                    .build
                    .configurations
                    .into_iter()
                    .map(|c| c.name)
                    .collect(),
                build_files: raw
                    .settings
                    .build
                    .files
                    .into_iter()
                    .map(|f| BuildFile {
                        file_name: f.file_name,
                        template: f.template,
                    })
                    .collect(),
                display_width: raw.settings.display.width,
                display_height: raw.settings.display.height,
            },
            imports: Vec::new(),
            pages: raw.pages.into_iter().map(Into::into).collect(),
            actions: raw.actions.into_iter().map(Into::into).collect(),
            variables: raw.variables.into_iter().map(Into::into).collect(),
            styles: raw.styles.into_iter().map(Into::into).collect(),
            fonts: raw.fonts.into_iter().map(Into::into).collect(),
            bitmaps: raw.bitmaps.into_iter().map(Into::into).collect(),
            colors: raw.colors.into_iter().map(|c| c.name).collect(),
            themes: raw
                .themes
                .into_iter()
                .map(|t| Theme {
                    name: t.name,
                    colors: t.colors,
                })
                .collect(),
            texts: Texts {
                resources: raw
                    .texts
                    .resources
                    .into_iter()
                    .map(|r| r.resource_id)
                    .collect(),
                languages: raw
                    .texts
                    .languages
                    .into_iter()
                    .map(|l| Language {
                        language_id: l.language_id,
                        translations: l.translations,
                    })
                    .collect(),
            },
        }
    }
}

impl From<RawPage> for Page {
    fn from(raw: RawPage) -> Self {
        Self {
            name: raw.name,
            id: raw.id,
            used_in: raw.used_in,
            left: raw.left,
            top: raw.top,
            width: raw.width,
            height: raw.height,
            style: raw.style.as_ref().and_then(style_ref_from_value),
            is_used_as_user_widget: raw.is_used_as_user_widget,
            flow: build_flow(raw.components, raw.connection_lines, raw.local_variables),
        }
    }
}

impl From<RawAction> for Action {
    fn from(raw: RawAction) -> Self {
        let implementation = match raw.implementation_type.as_deref() {
            Some("flow") => ActionImplementation::Flow,
            _ => ActionImplementation::Native,
        };
        Self {
            name: raw.name,
            id: raw.id,
            used_in: raw.used_in,
            implementation,
            flow: build_flow(raw.components, raw.connection_lines, raw.local_variables),
        }
    }
}

impl From<RawVariable> for Variable {
    fn from(raw: RawVariable) -> Self {
        Self {
            name: raw.name,
            id: raw.id,
            used_in: raw.used_in,
            value_type: ValueType::parse(&raw.value_type),
            default_value: raw.default_value,
            native: raw.native,
        }
    }
}

impl From<RawStyle> for Style {
    fn from(raw: RawStyle) -> Self {
        Self {
            name: raw.name,
            id: raw.id,
            used_in: raw.used_in,
            inherit_from: raw.inherit_from.filter(|s| !s.is_empty()),
            always_build: raw.always_build,
            props: raw.props,
        }
    }
}

impl From<RawFont> for Font {
    fn from(raw: RawFont) -> Self {
        Self {
            name: raw.name,
            id: raw.id,
            used_in: raw.used_in,
            always_build: raw.always_build,
            bpp: raw.bpp,
            height: raw.height,
            ascent: raw.ascent,
            descent: raw.descent,
            glyphs: raw
                .glyphs
                .into_iter()
                .map(|g| Glyph {
                    encoding: g.encoding,
                    dx: g.dx,
                    x: g.x,
                    y: g.y,
                    width: g.width,
                    height: g.height,
                    pixels: g.pixels,
                })
                .collect(),
        }
    }
}

impl From<RawBitmap> for Bitmap {
    fn from(raw: RawBitmap) -> Self {
        Self {
            name: raw.name,
            id: raw.id,
            used_in: raw.used_in,
            always_build: raw.always_build,
            bpp: raw.bpp,
            width: raw.width,
            height: raw.height,
            pixels: raw.pixels,
        }
    }
}

impl From<RawPort> for Port {
    fn from(raw: RawPort) -> Self {
        let kind = match raw.kind.as_deref() {
            Some("sequence") => PortKind::Sequence,
            _ if raw.name.starts_with('@') => PortKind::Sequence,
            _ => PortKind::Data,
        };
        Self {
            optional: raw.optional.unwrap_or(kind == PortKind::Sequence),
            name: raw.name,
            kind,
        }
    }
}

impl From<RawEventHandler> for EventHandler {
    fn from(raw: RawEventHandler) -> Self {
        let handler_type = match raw.handler_type.as_deref() {
            Some("action") => HandlerType::Action,
            _ => HandlerType::Flow,
        };
        Self {
            event: raw.event.to_ascii_uppercase(),
            handler_type,
            action: raw.action.filter(|a| !a.is_empty()),
        }
    }
}

fn build_flow(
    components: Vec<RawComponent>,
    lines: Vec<RawConnectionLine>,
    locals: Vec<RawLocalVariable>,
) -> FlowBody {
    let mut body = FlowBody::default();
    for raw in components {
        let id = push_component(&mut body, raw, None);
        body.roots.push(id);
    }
    body.connection_lines = lines
        .into_iter()
        .map(|l| ConnectionLine {
            source: l.source,
            output: l.output,
            target: l.target,
            input: l.input,
        })
        .collect();
    body.local_variables = locals
        .into_iter()
        .map(|v| LocalVariable {
            name: v.name,
            value_type: ValueType::parse(&v.value_type),
            default_value: v.default_value,
        })
        .collect();
    body
}

fn push_component(body: &mut FlowBody, raw: RawComponent, parent: Option<ComponentId>) -> ComponentId {
    let id = ComponentId(body.components.len() as u32);
    let RawComponent {
        type_name,
        id: object_id,
        name,
        left,
        top,
        width,
        height,
        style,
        properties,
        attrs,
        inputs,
        outputs,
        as_output_properties,
        event_handlers,
        catch_error,
        used_in,
        children,
        item_widget,
    } = raw;

    body.components.push(Component {
        kind: ComponentKind::parse(&type_name),
        type_name,
        object_id,
        name: name.filter(|n| !n.is_empty()),
        left,
        top,
        width,
        height,
        style: style.as_ref().and_then(style_ref_from_value),
        properties,
        attrs,
        inputs: inputs.into_iter().map(Into::into).collect(),
        outputs: outputs.into_iter().map(Into::into).collect(),
        as_output_properties,
        event_handlers: event_handlers.into_iter().map(Into::into).collect(),
        catch_error,
        used_in,
        parent,
        children: Vec::new(),
        item_widget: None,
    });

    let child_ids: Vec<ComponentId> = children
        .into_iter()
        .map(|child| push_component(body, child, Some(id)))
        .collect();
    let item_id = item_widget.map(|item| push_component(body, *item, Some(id)));

    let component = &mut body.components[id.index()];
    component.children = child_ids;
    component.item_widget = item_id;
    id
}
