//! Leaf pruning: strip unmarked leaf chains from the frontier toward the root.
//!
//! A shared parent is only promoted to the frontier once every one of its
//! children is gone or queued for removal in the same pass. When a promoted
//! parent sits at or beyond the working layer the frontier moves out to it
//! before retreating, because converging branches reach it at different
//! depths.

use crate::error::{PruneError, Result};
use crate::frontier::Frontier;
use crate::types::{TermGraph, TermId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafPrune {
    pub leaves: Frontier,
    pub removed: usize,
    pub passes: usize,
}

/// Upper bound on passes for a graph of this shape
pub fn default_pass_limit(node_count: usize, max_layer: usize) -> usize {
    (node_count + 1) * (max_layer + 1)
}

/// Remove the removable queue, promoting parents. Returns the new working layer
/// and whether it was adopted from a promoted parent.
fn process_removable(
    graph: &mut TermGraph,
    root: &str,
    leaves: &mut Frontier,
    mut removable: Vec<TermId>,
    mut dst: usize,
) -> Result<(usize, bool, usize)> {
    let ontology = root;
    let mut updated = false;
    let mut removed = 0;

    while let Some(leaf) = removable.pop() {
        for parent in graph.parents(&leaf) {
            if parent == root {
                continue;
            }

            let children = graph.children(&parent);
            let promote = if children.len() > 1 {
                !leaves.contains(&parent)
                    && children
                        .iter()
                        .all(|child| *child == leaf || removable.contains(child))
            } else {
                true
            };

            if promote {
                leaves.insert(parent.clone());
                let layer = graph.require_layer(&parent, ontology)?;
                if layer >= dst {
                    updated = true;
                    dst = layer;
                }
            }
        }

        leaves.remove(&leaf);
        graph.remove_term(&leaf);
        removed += 1;
    }

    Ok((dst, updated, removed))
}

/// Strip unmarked leaves starting at `max_layer` until the root layer.
///
/// A leaf is removable when it is unmarked and has no remaining children.
/// Fails with [`PruneError::LeafPruningDiverged`] after `max_passes` passes.
pub fn prune_leaves(
    graph: &mut TermGraph,
    root: &str,
    mut leaves: Frontier,
    max_layer: usize,
    max_passes: usize,
) -> Result<LeafPrune> {
    let ontology = root;
    let mut dst = max_layer;
    let mut passes = 0;
    let mut removed = 0;

    while dst > 0 {
        if passes == max_passes {
            return Err(PruneError::LeafPruningDiverged {
                ontology: ontology.to_string(),
                passes,
            });
        }
        passes += 1;

        let removable: Vec<TermId> = graph
            .terms_at_layer(ontology, dst, leaves.iter())
            .into_iter()
            .filter(|id| !graph.is_marked(id) && graph.child_count(id) == 0)
            .collect();

        let (next_dst, updated, count) =
            process_removable(graph, root, &mut leaves, removable, dst)?;
        removed += count;

        if updated {
            log::debug!("{ontology}: frontier moved from layer {dst} to {next_dst}");
            dst = next_dst;
        } else {
            dst -= 1;
        }
    }

    log::debug!("{ontology}: leaf pruning removed {removed} terms in {passes} passes");

    Ok(LeafPrune {
        leaves,
        removed,
        passes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layering::{BfsLayering, LayeringOracle};
    use crate::types::Relation;
    use pretty_assertions::assert_eq;

    fn layered(edges: &[(&str, &str)], annotated: &[&str]) -> (TermGraph, Frontier, usize) {
        let mut graph = TermGraph::new();
        for (specific, general) in edges {
            graph.add_edge(specific, general, Relation::IsA);
        }
        for id in annotated {
            graph.term_mut(id).unwrap().annotation.attach("P05067");
        }
        let layering = BfsLayering.layer(&mut graph, "R").unwrap();
        let leaves = layering.leaves.into_iter().collect();
        (graph, leaves, layering.max_layer)
    }

    fn sorted_ids(graph: &TermGraph) -> Vec<String> {
        let mut ids = graph.term_ids();
        ids.sort();
        ids
    }

    #[test]
    fn test_removes_unannotated_chain() {
        let (mut graph, leaves, max_layer) = layered(
            &[("A", "R"), ("B", "R"), ("X", "A"), ("C", "B"), ("D", "C")],
            &["X"],
        );
        // D is deeper than X; cut it away first as outer pruning would
        graph.remove_term("D");
        let leaves: Frontier = leaves
            .iter()
            .filter(|id| id.as_str() != "D")
            .cloned()
            .chain(["C".to_string()])
            .collect();

        let result = prune_leaves(&mut graph, "R", leaves, max_layer - 1, 100).unwrap();

        assert_eq!(sorted_ids(&graph), vec!["A", "R", "X"]);
        assert_eq!(result.leaves.into_vec(), vec!["X".to_string()]);
        assert_eq!(result.removed, 2);
    }

    #[test]
    fn test_shared_parent_kept_while_a_child_remains() {
        let (mut graph, leaves, max_layer) =
            layered(&[("P", "R"), ("X", "P"), ("U", "P")], &["X"]);

        prune_leaves(&mut graph, "R", leaves, max_layer, 100).unwrap();

        assert_eq!(sorted_ids(&graph), vec!["P", "R", "X"]);
    }

    #[test]
    fn test_shared_parent_removed_with_all_children() {
        let (mut graph, leaves, max_layer) = layered(
            &[("P", "R"), ("Q", "R"), ("U", "P"), ("V", "P"), ("X", "Q")],
            &["X"],
        );

        prune_leaves(&mut graph, "R", leaves, max_layer, 100).unwrap();

        assert_eq!(sorted_ids(&graph), vec!["Q", "R", "X"]);
    }

    #[test]
    fn test_frontier_advances_to_converging_branch() {
        // L sits on layer 2 under A but also under P on layer 3
        let (mut graph, leaves, max_layer) = layered(
            &[
                ("A", "R"),
                ("B", "R"),
                ("C", "B"),
                ("L", "A"),
                ("P", "C"),
                ("L", "P"),
                ("M", "C"),
            ],
            &["M"],
        );
        assert_eq!(graph.layer("P", "R"), Some(3));
        assert_eq!(max_layer, 3);

        let result = prune_leaves(&mut graph, "R", leaves, max_layer, 100).unwrap();

        assert_eq!(sorted_ids(&graph), vec!["B", "C", "M", "R"]);
        assert_eq!(result.leaves.into_vec(), vec!["M".to_string()]);
    }

    #[test]
    fn test_pass_limit_is_enforced() {
        let (mut graph, leaves, max_layer) = layered(
            &[
                ("A", "R"),
                ("B", "R"),
                ("C", "B"),
                ("L", "A"),
                ("P", "C"),
                ("L", "P"),
                ("M", "C"),
            ],
            &["M"],
        );

        let err = prune_leaves(&mut graph, "R", leaves, max_layer, 1).unwrap_err();
        assert!(matches!(err, PruneError::LeafPruningDiverged { passes: 1, .. }));
    }

    #[test]
    fn test_default_pass_limit_covers_removals() {
        assert_eq!(default_pass_limit(0, 0), 1);
        assert!(default_pass_limit(10, 3) >= 10 + 3);
    }
}
