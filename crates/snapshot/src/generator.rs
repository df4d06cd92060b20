use crate::config::SnapshotConfig;
use crate::error::{Result, SnapshotError};
use crate::index::SourceIndex;
use crate::render::{header_text, Renderer};
use crate::resolver::{fold_targets, locate, resolve};
use crate::types::{Dependency, DependencyKind, Snapshot};
use codeslice_chunker::Chunk;
use std::collections::HashSet;

/// Builds minimal, self-contained excerpts around target chunks
#[derive(Debug, Clone, Default)]
pub struct SnapshotGenerator {
    config: SnapshotConfig,
}

impl SnapshotGenerator {
    pub fn new(config: SnapshotConfig) -> Result<Self> {
        config.validate().map_err(SnapshotError::invalid_config)?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Render one snapshot for targets that all come from the same file
    pub fn generate<I>(&self, index: &I, targets: &[Chunk]) -> Result<Snapshot>
    where
        I: SourceIndex + ?Sized,
    {
        let first = targets.first().ok_or(SnapshotError::NoTargets)?;

        let paths = distinct_paths(targets);
        if paths.len() > 1 {
            return Err(SnapshotError::MixedFiles { paths });
        }

        let file = index.file(&first.file_path).ok_or_else(|| {
            log::warn!("Snapshot requested for unindexed file {}", first.file_path);
            SnapshotError::file_not_indexed(&first.file_path)
        })?;
        let lines: Vec<&str> = file.source.lines().collect();

        let mut seen = HashSet::new();
        let unique: Vec<&Chunk> = targets
            .iter()
            .filter(|chunk| seen.insert(chunk.id.as_str()))
            .collect();
        let target_count = unique.len();

        let located = unique
            .into_iter()
            .map(|chunk| locate(file, &lines, chunk))
            .collect();
        let folded = fold_targets(located);
        let resolution = resolve(file, &lines, &folded);

        let snapshot = Renderer {
            config: &self.config,
            lines: &lines,
            targets: &folded,
            dependencies: &resolution.dependencies,
        }
        .render(file.relative_path());

        let mut dependencies: Vec<Dependency> = resolution
            .dependencies
            .iter()
            .map(|dep| Dependency {
                start_line: dep.range.start_line,
                end_line: dep.range.end_line,
                kind: dep.kind,
                name: dep.name.clone(),
                source_text: dep.text.clone(),
            })
            .collect();
        dependencies.extend(resolution.containers.iter().map(|container| Dependency {
            start_line: container.start_line(),
            end_line: container.end_line(),
            kind: DependencyKind::ContainerDeclaration,
            name: container.name.clone(),
            source_text: header_text(container, &lines),
        }));
        dependencies.sort_by_key(|dep| (dep.start_line, dep.end_line));

        log::debug!(
            "Snapshot of {}: {} targets, {} dependencies",
            file.relative_path(),
            target_count,
            dependencies.len()
        );

        Ok(Snapshot {
            snapshot,
            relative_path: file.relative_path().to_string(),
            target_count,
            dependency_count: dependencies.len(),
            dependencies,
        })
    }

    /// Group targets by file (first-seen order) and render one snapshot per file
    pub fn generate_batch<I>(&self, index: &I, targets: &[Chunk]) -> Vec<Result<Snapshot>>
    where
        I: SourceIndex + ?Sized,
    {
        let mut groups: Vec<(&str, Vec<Chunk>)> = Vec::new();
        for chunk in targets {
            match groups
                .iter_mut()
                .find(|(path, _)| *path == chunk.file_path)
            {
                Some((_, group)) => group.push(chunk.clone()),
                None => groups.push((chunk.file_path.as_str(), vec![chunk.clone()])),
            }
        }

        groups
            .into_iter()
            .map(|(_, group)| self.generate(index, &group))
            .collect()
    }
}

fn distinct_paths(targets: &[Chunk]) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for chunk in targets {
        if !paths.contains(&chunk.file_path) {
            paths.push(chunk.file_path.clone());
        }
    }
    paths
}

/// Render a snapshot with the default configuration
pub fn generate_snapshot<I>(index: &I, targets: &[Chunk]) -> Result<Snapshot>
where
    I: SourceIndex + ?Sized,
{
    SnapshotGenerator::default().generate(index, targets)
}

/// Render one snapshot per file with the default configuration
pub fn generate_snapshots<I>(index: &I, targets: &[Chunk]) -> Vec<Result<Snapshot>>
where
    I: SourceIndex + ?Sized,
{
    SnapshotGenerator::default().generate_batch(index, targets)
}
