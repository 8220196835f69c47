//! Layering pre-pass: per-category distances from the root.
//!
//! The pruning engine only consumes a [`Layering`]; any [`LayeringOracle`] can
//! produce it. [`BfsLayering`] is the default breadth-first implementation.

use crate::error::{PruneError, Result};
use crate::types::{TermGraph, TermId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Snapshot produced by a layering oracle for one category root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layering {
    pub root: TermId,

    /// Terms reachable from the root, root included
    pub reachable: HashSet<TermId>,

    /// Reachable terms without children, in discovery order
    pub leaves: Vec<TermId>,

    pub max_layer: usize,
}

/// Computes layers for one category and writes them onto the graph.
pub trait LayeringOracle: Send + Sync {
    fn layer(&self, graph: &mut TermGraph, root: &str) -> Result<Layering>;
}

/// Breadth-first walk from the root towards more specific terms
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsLayering;

impl LayeringOracle for BfsLayering {
    fn layer(&self, graph: &mut TermGraph, root: &str) -> Result<Layering> {
        if !graph.contains(root) {
            return Err(PruneError::TermNotFound(root.to_string()));
        }

        let mut distances: HashMap<TermId, usize> = HashMap::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        distances.insert(root.to_string(), 0);
        queue.push_back(root.to_string());

        while let Some(current) = queue.pop_front() {
            let dst = distances[&current];
            for child in graph.children(&current) {
                if !distances.contains_key(&child) {
                    distances.insert(child.clone(), dst + 1);
                    queue.push_back(child);
                }
            }
            order.push(current);
        }

        for (id, &dst) in &distances {
            graph.set_layer(id, root, dst);
        }

        let leaves: Vec<TermId> = order
            .iter()
            .filter(|id| graph.child_count(id) == 0)
            .cloned()
            .collect();
        let max_layer = distances.values().copied().max().unwrap_or(0);

        log::debug!(
            "Layered {}: {} terms, {} leaves, max layer {}",
            root,
            order.len(),
            leaves.len(),
            max_layer
        );

        Ok(Layering {
            root: root.to_string(),
            reachable: order.into_iter().collect(),
            leaves,
            max_layer,
        })
    }
}

/// Check that a layering is breadth-first consistent.
///
/// Every reachable term except the root must sit exactly one layer below its
/// shallowest reachable parent. Without this the leaf frontier can keep
/// moving outward on malformed input.
pub fn verify_layering(graph: &TermGraph, layering: &Layering) -> Result<()> {
    let ontology = layering.root.as_str();
    let inconsistent = |term: &str, reason: String| PruneError::InconsistentLayering {
        ontology: ontology.to_string(),
        term: term.to_string(),
        reason,
    };

    if !layering.reachable.contains(ontology) {
        return Err(inconsistent(ontology, "root is not reachable".to_string()));
    }

    let mut deepest = 0;
    for id in &layering.reachable {
        let layer = graph.require_layer(id, ontology)?;
        deepest = deepest.max(layer);

        if id == ontology {
            if layer != 0 {
                return Err(inconsistent(id, format!("root has layer {layer}")));
            }
            continue;
        }

        let shallowest_parent = graph
            .parents(id)
            .iter()
            .filter(|parent| layering.reachable.contains(*parent))
            .filter_map(|parent| graph.layer(parent, ontology))
            .min();

        match shallowest_parent {
            Some(parent_layer) if parent_layer + 1 == layer => {}
            Some(parent_layer) => {
                return Err(inconsistent(
                    id,
                    format!("layer {layer} but shallowest parent has layer {parent_layer}"),
                ));
            }
            None => {
                return Err(inconsistent(id, "no reachable parent".to_string()));
            }
        }
    }

    if deepest != layering.max_layer {
        return Err(inconsistent(
            ontology,
            format!(
                "max layer {} but deepest term has layer {deepest}",
                layering.max_layer
            ),
        ));
    }

    if let Some(stray) = layering
        .leaves
        .iter()
        .find(|leaf| !layering.reachable.contains(*leaf))
    {
        return Err(inconsistent(stray, "leaf is not reachable".to_string()));
    }

    Ok(())
}
