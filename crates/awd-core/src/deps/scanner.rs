//! Workflow scanner: extracts dependency references from a project.
//!
//! Sources, in order:
//!   1. `dependencies.mcp` in `awd.yml`
//!   2. the `mcp:` frontmatter list of every prompt template referenced by a
//!      script command or by `entrypoint`
//!
//! Artifacts are read fresh on every scan.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AwdError, Result};
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::prompt::{find_prompt_references, parse_frontmatter, PROMPT_SUFFIX};

/// What an artifact is, decided by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Manifest,
    Prompt,
}

impl ArtifactKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        if name == MANIFEST_FILE {
            Some(ArtifactKind::Manifest)
        } else if name.ends_with(PROMPT_SUFFIX) {
            Some(ArtifactKind::Prompt)
        } else {
            None
        }
    }
}

/// A project file read during a scan.
#[derive(Debug, Clone)]
pub struct WorkflowArtifact {
    /// Path relative to the project root
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Mcp,
}

/// One dependency reference and the artifact that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRequirement {
    pub name: String,
    pub source: PathBuf,
    pub kind: DependencyKind,
}

impl DependencyRequirement {
    pub fn mcp(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            kind: DependencyKind::Mcp,
        }
    }
}

pub struct WorkflowScanner {
    project_root: PathBuf,
}

impl WorkflowScanner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Read the manifest and every prompt template it references.
    ///
    /// Referenced templates that do not exist are skipped with a warning;
    /// they surface again as errors when the script is compiled.
    pub fn artifacts(&self) -> Result<Vec<WorkflowArtifact>> {
        let manifest_path = Manifest::path_in(&self.project_root);
        if !manifest_path.is_file() {
            return Err(AwdError::ManifestNotFound(self.project_root.clone()));
        }
        let manifest_content = std::fs::read_to_string(&manifest_path)?;
        let manifest = Manifest::from_yaml(&manifest_content)?;

        let mut artifacts = vec![WorkflowArtifact {
            path: PathBuf::from(MANIFEST_FILE),
            kind: ArtifactKind::Manifest,
            content: manifest_content,
        }];

        for rel in prompt_paths(&manifest) {
            let full = self.project_root.join(&rel);
            if !full.is_file() {
                tracing::warn!(
                    "[WorkflowScanner] Referenced prompt '{}' does not exist, skipping",
                    rel
                );
                continue;
            }
            artifacts.push(WorkflowArtifact {
                path: PathBuf::from(&rel),
                kind: ArtifactKind::Prompt,
                content: std::fs::read_to_string(&full)?,
            });
        }

        Ok(artifacts)
    }

    /// All requirements in discovery order (duplicates included).
    pub fn scan(&self) -> Result<Vec<DependencyRequirement>> {
        let mut requirements = Vec::new();
        for artifact in self.artifacts()? {
            requirements.extend(requirements_from(&artifact)?);
        }
        tracing::debug!(
            "[WorkflowScanner] {} requirement(s) in {}",
            requirements.len(),
            self.project_root.display()
        );
        Ok(requirements)
    }
}

/// Requirements declared by a single artifact.
pub fn requirements_from(artifact: &WorkflowArtifact) -> Result<Vec<DependencyRequirement>> {
    let names = match artifact.kind {
        ArtifactKind::Manifest => Manifest::from_yaml(&artifact.content)?.dependencies.mcp,
        ArtifactKind::Prompt => parse_frontmatter(&artifact.content)?.mcp,
    };
    Ok(names
        .into_iter()
        .map(|name| DependencyRequirement::mcp(name, &artifact.path))
        .collect())
}

/// Distinct prompt paths referenced by the manifest, scripts first then entrypoint.
fn prompt_paths(manifest: &Manifest) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    let mut push = |p: String| {
        if !paths.contains(&p) {
            paths.push(p);
        }
    };

    for command in manifest.scripts.values() {
        for reference in find_prompt_references(command) {
            push(reference.path);
        }
    }
    if let Some(entry) = manifest.entrypoint.as_deref() {
        if entry.ends_with(PROMPT_SUFFIX) {
            push(entry.to_string());
        }
    }
    paths
}
