//! Loading of graph, annotation and configuration files.

use anyhow::{anyhow, Context as AnyhowContext, Result};
use std::fs;
use std::path::Path;
use termprune_graph::{AnnotationMap, CleanerConfig, TermGraph, TermGraphDocument};

pub fn load_graph(path: &Path) -> Result<TermGraph> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read graph {}", path.display()))?;
    let document: TermGraphDocument = serde_json::from_slice(&bytes)
        .with_context(|| format!("Invalid graph document {}", path.display()))?;
    let graph = TermGraph::from_document(document)
        .with_context(|| format!("Invalid graph document {}", path.display()))?;

    log::info!(
        "Loaded {}: {} terms, {} edges",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// A missing path means no annotations at all.
pub fn load_annotations(path: Option<&Path>) -> Result<AnnotationMap> {
    let Some(path) = path else {
        log::warn!("No annotation map given; every category will shrink to its root");
        return Ok(AnnotationMap::new());
    };

    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read annotations {}", path.display()))?;
    let annotations: AnnotationMap = serde_json::from_slice(&bytes)
        .with_context(|| format!("Invalid annotation map {}", path.display()))?;

    log::info!("Loaded {} annotated identifiers", annotations.len());
    Ok(annotations)
}

/// Cleaner configuration from a JSON or TOML file
pub fn load_config(path: &Path) -> Result<CleanerConfig> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&bytes).with_context(|| format!("Invalid config {}", path.display()))
}

fn parse_config(bytes: &[u8]) -> Result<CleanerConfig> {
    let config: CleanerConfig = match serde_json::from_slice(bytes) {
        Ok(config) => config,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            toml::from_str(utf8).map_err(|toml_err| {
                anyhow!("Config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
            })?
        }
    };

    config.validate().map_err(|err| anyhow!(err))?;
    Ok(config)
}
