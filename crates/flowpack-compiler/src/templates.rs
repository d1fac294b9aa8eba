//! Build file templates.
//!
//! A template is plain text in which every `//${eez-studio NAME}` marker is
//! replaced by the text of section `NAME`. `//${eez-studio NAME CONFIG}`
//! takes the section from a build for configuration `CONFIG` instead of the
//! selected one. A `<configuration>` placeholder in a file name renders the
//! file once per build configuration.

use std::ops::Range;

use indexmap::IndexMap;
use indexmap::map::Entry;

use flowpack_core::ProjectGraph;

use crate::build::{BuildMode, BuildOptions, BuildResult, SectionName, build};
use crate::diagnostics::Diagnostics;
use crate::Result;

const MARKER_START: &str = "//${eez-studio ";
const MARKER_END: char = '}';
const CONFIGURATION_PLACEHOLDER: &str = "<configuration>";

/// One `//${eez-studio ...}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'t> {
    /// Byte range of the whole marker.
    pub range: Range<usize>,
    pub section: &'t str,
    pub configuration: Option<&'t str>,
}

/// Markers of `template` in order. Unterminated markers are ignored.
pub fn markers(template: &str) -> Vec<Marker<'_>> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(offset) = template[from..].find(MARKER_START) {
        let start = from + offset;
        let body_start = start + MARKER_START.len();
        let Some(len) = template[body_start..].find(MARKER_END) else {
            break;
        };
        let body = &template[body_start..body_start + len];
        let end = body_start + len + 1;
        let mut words = body.split_whitespace();
        if let Some(section) = words.next() {
            found.push(Marker {
                range: start..end,
                section,
                configuration: words.next(),
            });
        }
        from = end;
    }
    found
}

/// Replace every marker with the text `section` returns for it.
///
/// Unknown section names fail with [`Error::InvalidSection`](crate::Error::InvalidSection).
pub fn render<F>(template: &str, mut section: F) -> Result<String>
where
    F: FnMut(SectionName, Option<&str>) -> Result<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for marker in markers(template) {
        let name: SectionName = marker.section.parse()?;
        out.push_str(&template[last..marker.range.start]);
        out.push_str(&section(name, marker.configuration)?);
        last = marker.range.end;
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Concrete file names of a build file, with the configuration each one is
/// rendered for.
pub fn expand_file_name(file_name: &str, configurations: &[String]) -> Vec<(String, Option<String>)> {
    if !file_name.contains(CONFIGURATION_PLACEHOLDER) {
        return vec![(file_name.to_string(), None)];
    }
    configurations
        .iter()
        .map(|configuration| {
            (
                file_name.replace(CONFIGURATION_PLACEHOLDER, configuration),
                Some(configuration.clone()),
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub file_name: String,
    pub contents: String,
}

/// Render the root project's build files.
///
/// Runs one `files` build per configuration the templates ask for and
/// returns the diagnostics of all of them.
pub fn render_build_files(
    graph: &ProjectGraph,
    options: &BuildOptions,
) -> Result<(Vec<RenderedFile>, Diagnostics)> {
    let settings = &graph.root_project().settings;
    let mut builds: IndexMap<Option<String>, BuildResult> = IndexMap::new();
    let mut files = Vec::new();

    for file in &settings.build_files {
        for (file_name, file_configuration) in
            expand_file_name(&file.file_name, &settings.configurations)
        {
            let selected = file_configuration.or_else(|| options.configuration.clone());
            let contents = render(&file.template, |section, configuration| {
                let configuration = configuration
                    .map(str::to_string)
                    .or_else(|| selected.clone());
                let result = match builds.entry(configuration) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => {
                        let mut options = BuildOptions::new(BuildMode::BuildFiles);
                        options.configuration = entry.key().clone();
                        let result = build(graph, &options)?;
                        entry.insert(result)
                    }
                };
                Ok(result.text(section).unwrap_or_default().to_string())
            })?;
            log::debug!("rendered build file `{file_name}` ({} bytes)", contents.len());
            files.push(RenderedFile {
                file_name,
                contents,
            });
        }
    }

    let mut diagnostics = Diagnostics::new();
    for (_, result) in builds {
        diagnostics.extend(result.diagnostics);
    }
    Ok((files, diagnostics))
}
