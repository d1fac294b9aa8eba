//! Loading project files and assembling the project graph.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::json::parse_project;
use super::{Project, ProjectGraph, ProjectId};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file `{name}`: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Incremental graph construction.
///
/// Used by [`ProjectGraph::load`] for files on disk and directly by tools and
/// tests that assemble multi-project graphs in memory.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    projects: Vec<Project>,
    master: Option<ProjectId>,
    by_path: HashMap<PathBuf, ProjectId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project parsed from JSON text.
    pub fn add_json(&mut self, name: &str, json: &str) -> Result<ProjectId, ProjectError> {
        let mut project = parse_project(json).map_err(|source| ProjectError::Json {
            name: name.to_string(),
            source,
        })?;
        project.name = name.to_string();
        Ok(self.add(project))
    }

    pub fn add(&mut self, project: Project) -> ProjectId {
        let id = ProjectId(self.projects.len() as u32);
        self.projects.push(project);
        id
    }

    /// Record that `from` imports `to`.
    pub fn import(&mut self, from: ProjectId, to: ProjectId) -> &mut Self {
        let imports = &mut self.projects[from.index()].imports;
        if !imports.contains(&to) {
            imports.push(to);
        }
        self
    }

    pub fn master(&mut self, master: ProjectId) -> &mut Self {
        self.master = Some(master);
        self
    }

    pub fn build(self, root: ProjectId) -> ProjectGraph {
        ProjectGraph {
            projects: self.projects,
            root,
            master: self.master,
        }
    }

    /// Load a file and, recursively, the files it imports.
    ///
    /// Files are keyed by canonical path, so diamond and circular imports load
    /// each file once.
    fn load_file(&mut self, path: &Path) -> Result<ProjectId, ProjectError> {
        let canonical = path.canonicalize().map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(&id) = self.by_path.get(&canonical) {
            return Ok(id);
        }

        log::debug!("loading project {}", canonical.display());
        let text = std::fs::read_to_string(&canonical).map_err(|source| ProjectError::Io {
            path: canonical.clone(),
            source,
        })?;
        let name = canonical
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let id = self.add_json(&name, &text)?;
        self.projects[id.index()].path = Some(canonical.clone());
        self.by_path.insert(canonical.clone(), id);

        let dir = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
        let import_paths = self.projects[id.index()].settings.import_paths.clone();
        for import in import_paths {
            let imported = self.load_file(&dir.join(import))?;
            self.import(id, imported);
        }
        Ok(id)
    }
}

impl ProjectGraph {
    /// Load a root project file with its imports and master project.
    ///
    /// Relative paths resolve against the directory of the file that names them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let mut builder = GraphBuilder::new();
        let root = builder.load_file(path.as_ref())?;

        let root_project = &builder.projects[root.index()];
        if let Some(master_path) = root_project.settings.master_project_path.clone() {
            let dir = root_project
                .path
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let master = builder.load_file(&dir.join(master_path))?;
            builder.master(master);
        }

        let graph = builder.build(root);
        log::info!(
            "loaded {} project(s), master: {}",
            graph.projects.len(),
            graph.master.is_some()
        );
        Ok(graph)
    }
}
