use crate::annotate::{map_annotations, AnnotationMap, AnnotationTrace};
use crate::boundary::{mark_boundaries, MarkOutcome};
use crate::config::CleanerConfig;
use crate::error::{PruneError, Result};
use crate::frontier::Frontier;
use crate::layering::{verify_layering, BfsLayering, Layering, LayeringOracle};
use crate::leaf::{default_pass_limit, prune_leaves};
use crate::outer::prune_outer_layers;
use crate::types::{TermGraph, TermId};
use rayon::prelude::*;

/// Cleaned subgraph of one category, ready for rendering
#[derive(Debug, Clone)]
pub struct CleanedCategory {
    pub root: TermId,
    pub graph: TermGraph,
    pub leaves: Vec<TermId>,
    pub max_layer: usize,
}

impl CleanedCategory {
    /// The cleaned graph with synthetic connector nodes left out
    pub fn render_graph(&self) -> TermGraph {
        self.graph.without_connectors()
    }
}

/// Outcome of a full cleaning run
#[derive(Debug, Clone)]
pub struct CleaningReport {
    /// One entry per final category root, in root order
    pub categories: Vec<CleanedCategory>,

    /// Final root set; a single connector when repair fired
    pub roots: Vec<TermId>,

    /// Number of disconnection repairs performed
    pub repairs: usize,

    pub trace: AnnotationTrace,
}

impl CleaningReport {
    pub fn category(&self, root: &str) -> Option<&CleanedCategory> {
        self.categories.iter().find(|category| category.root == root)
    }
}

/// Runs annotation mapping, layering, boundary marking and both pruners,
/// repairing disconnected root sets with a connector node.
pub struct GraphCleaner<O: LayeringOracle = BfsLayering> {
    config: CleanerConfig,
    oracle: O,
}

impl GraphCleaner<BfsLayering> {
    pub fn new(config: CleanerConfig) -> Result<Self> {
        Self::with_oracle(config, BfsLayering)
    }
}

impl Default for GraphCleaner<BfsLayering> {
    fn default() -> Self {
        Self {
            config: CleanerConfig::default(),
            oracle: BfsLayering,
        }
    }
}

impl<O: LayeringOracle> GraphCleaner<O> {
    pub fn with_oracle(config: CleanerConfig, oracle: O) -> Result<Self> {
        config.validate().map_err(PruneError::InvalidConfig)?;
        Ok(Self { config, oracle })
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Clean `graph` for every root in `roots`.
    pub fn clean(
        &self,
        annotations: &AnnotationMap,
        mut graph: TermGraph,
        roots: &[TermId],
    ) -> Result<CleaningReport> {
        if roots.is_empty() {
            return Err(PruneError::NoRoots);
        }
        if let Some(missing) = roots.iter().find(|root| !graph.contains(root)) {
            return Err(PruneError::TermNotFound(missing.clone()));
        }

        graph.clear_layers();
        let trace = map_annotations(annotations, &mut graph);
        let mut roots = roots.to_vec();
        let mut attempt = 0;

        loop {
            let mut working = graph.clone();
            let layerings = self.layer_all(&mut working, &roots, attempt)?;

            match mark_boundaries(&mut working, &roots) {
                MarkOutcome::Disconnected(disconnection) => {
                    if attempt >= self.config.max_repairs {
                        return Err(PruneError::RepairExhausted {
                            attempt,
                            start: disconnection.start,
                            ontology: disconnection.ontology,
                        });
                    }

                    let connector = graph.add_connector(&self.config.connector_id, &roots);
                    log::warn!(
                        "Roots {:?} do not cover terms reached from {}; joining them under {}",
                        roots,
                        disconnection.start,
                        connector
                    );
                    roots = vec![connector];
                    attempt += 1;
                }
                MarkOutcome::Marked { .. } => {
                    let categories = self.prune_all(&working, layerings, attempt)?;
                    return Ok(CleaningReport {
                        categories,
                        roots,
                        repairs: attempt,
                        trace,
                    });
                }
            }
        }
    }

    fn layer_all(
        &self,
        graph: &mut TermGraph,
        roots: &[TermId],
        attempt: usize,
    ) -> Result<Vec<Layering>> {
        let mut layerings = Vec::with_capacity(roots.len());
        for root in roots {
            let layering = self
                .oracle
                .layer(graph, root)
                .map_err(|e| e.in_category(root, attempt))?;

            if self.config.verify_layering {
                verify_layering(graph, &layering).map_err(|e| e.in_category(root, attempt))?;
            }
            layerings.push(layering);
        }
        Ok(layerings)
    }

    fn prune_all(
        &self,
        graph: &TermGraph,
        layerings: Vec<Layering>,
        attempt: usize,
    ) -> Result<Vec<CleanedCategory>> {
        if self.config.parallel_categories {
            layerings
                .into_par_iter()
                .map(|layering| self.prune_category(graph, layering, attempt))
                .collect()
        } else {
            layerings
                .into_iter()
                .map(|layering| self.prune_category(graph, layering, attempt))
                .collect()
        }
    }

    /// Prune one category on its own copy of the reachable subgraph
    fn prune_category(
        &self,
        graph: &TermGraph,
        layering: Layering,
        attempt: usize,
    ) -> Result<CleanedCategory> {
        let root = layering.root.clone();

        let run = || -> Result<CleanedCategory> {
            let mut sub = graph.subgraph(&layering.reachable);
            let leaves: Frontier = layering
                .leaves
                .iter()
                .filter(|leaf| **leaf != root)
                .cloned()
                .collect();

            let outer = prune_outer_layers(&mut sub, &root, leaves, layering.max_layer)?;
            let max_passes = self
                .config
                .max_leaf_passes
                .unwrap_or_else(|| default_pass_limit(sub.node_count(), outer.max_layer));
            let leaf = prune_leaves(&mut sub, &root, outer.leaves, outer.max_layer, max_passes)?;

            log::info!(
                "Cleaned {}: {} of {} terms kept, max layer {}",
                root,
                sub.node_count(),
                layering.reachable.len(),
                outer.max_layer
            );

            Ok(CleanedCategory {
                root: root.clone(),
                graph: sub,
                leaves: leaf.leaves.into_vec(),
                max_layer: outer.max_layer,
            })
        };

        run().map_err(|e| e.in_category(&root, attempt))
    }
}
