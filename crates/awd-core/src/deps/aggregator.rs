//! Dependency aggregation across workflow artifacts.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::scanner::{DependencyRequirement, WorkflowScanner};
use crate::error::Result;
use crate::manifest::Manifest;

/// Requirements merged by name, each with the artifacts that asked for it.
///
/// Names iterate in first-seen order; each name's sources are distinct and
/// also in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyAggregator {
    entries: IndexMap<String, Vec<PathBuf>>,
}

impl DependencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge several requirement sequences at once.
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = DependencyRequirement>,
    {
        let mut agg = Self::new();
        for seq in sequences {
            agg.merge(seq);
        }
        agg
    }

    /// Add one requirement.
    pub fn add(&mut self, requirement: DependencyRequirement) {
        let sources = self.entries.entry(requirement.name).or_default();
        if !sources.contains(&requirement.source) {
            sources.push(requirement.source);
        }
    }

    /// Add a sequence of requirements.
    pub fn merge(&mut self, requirements: impl IntoIterator<Item = DependencyRequirement>) {
        for req in requirements {
            self.add(req);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn sources(&self, name: &str) -> Option<&[PathBuf]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(name, sources)| (name.as_str(), sources.as_slice()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan a project and aggregate everything it requires.
pub fn scan_workflows_for_dependencies(project_root: &Path) -> Result<DependencyAggregator> {
    let requirements = WorkflowScanner::new(project_root).scan()?;
    let mut agg = DependencyAggregator::new();
    agg.merge(requirements);
    tracing::info!(
        "[DependencyAggregator] {} unique MCP dependenc{} in {}",
        agg.len(),
        if agg.len() == 1 { "y" } else { "ies" },
        project_root.display()
    );
    Ok(agg)
}

/// Write dependencies discovered in prompt templates back into `awd.yml`.
///
/// Existing entries keep their order; new names are appended in first-seen
/// order. Returns the names that were added (empty means nothing changed and
/// the manifest was not rewritten).
pub fn sync_workflow_dependencies(project_root: &Path) -> Result<Vec<String>> {
    let agg = scan_workflows_for_dependencies(project_root)?;
    let mut manifest = Manifest::load(project_root)?;

    let added: Vec<String> = agg
        .names()
        .filter(|name| !manifest.dependencies.mcp.iter().any(|d| d == name))
        .map(str::to_string)
        .collect();

    if !added.is_empty() {
        manifest.dependencies.mcp.extend(added.iter().cloned());
        manifest.save(project_root)?;
        tracing::info!(
            "[DependencyAggregator] Added {} dependenc{} to awd.yml",
            added.len(),
            if added.len() == 1 { "y" } else { "ies" }
        );
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reqs(source: &str, names: &[&str]) -> Vec<DependencyRequirement> {
        names
            .iter()
            .map(|n| DependencyRequirement::mcp(*n, source))
            .collect()
    }

    #[test]
    fn test_merge_keeps_provenance() {
        let agg = DependencyAggregator::from_sequences([
            reqs("A", &["x", "y"]),
            reqs("B", &["y", "z"]),
        ]);
        let names: Vec<_> = agg.names().collect();
        assert_eq!(names, ["x", "y", "z"]);
        assert_eq!(
            agg.sources("y").unwrap(),
            [PathBuf::from("A"), PathBuf::from("B")]
        );
        assert_eq!(agg.sources("x").unwrap(), [PathBuf::from("A")]);
    }

    #[test]
    fn test_merge_is_order_independent_for_names() {
        let ab = DependencyAggregator::from_sequences([reqs("A", &["x", "y"]), reqs("B", &["y", "z"])]);
        let ba = DependencyAggregator::from_sequences([reqs("B", &["y", "z"]), reqs("A", &["x", "y"])]);
        let mut left: Vec<_> = ab.names().collect();
        let mut right: Vec<_> = ba.names().collect();
        left.sort();
        right.sort();
        assert_eq!(left, right);
        assert_eq!(ba.sources("y").unwrap(), [PathBuf::from("B"), PathBuf::from("A")]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut agg = DependencyAggregator::from_sequences([reqs("A", &["x"])]);
        let before = agg.clone();
        agg.merge(reqs("A", &["x"]));
        assert_eq!(agg, before);
    }

    #[test]
    fn test_sync_appends_prompt_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("awd.yml"),
            "name: demo\ndependencies:\n  mcp: [github]\nscripts:\n  start: codex main.prompt.md\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("main.prompt.md"),
            "---\nmcp: [slack, github]\n---\nbody",
        )
        .unwrap();

        let added = sync_workflow_dependencies(dir.path()).unwrap();
        assert_eq!(added, ["slack"]);
        let manifest = Manifest::load(dir.path()).unwrap();
        assert_eq!(manifest.mcp_dependencies(), ["github", "slack"]);

        assert!(sync_workflow_dependencies(dir.path()).unwrap().is_empty());
    }
}
