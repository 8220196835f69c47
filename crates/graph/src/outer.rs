//! Outer-layer pruning: drop whole unmarked layers from the deepest one inward.

use crate::error::Result;
use crate::frontier::Frontier;
use crate::types::{TermGraph, TermId};
use rayon::prelude::*;

/// Result of outer-layer pruning for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuterPrune {
    pub leaves: Frontier,

    /// Deepest layer left in the graph; the first one holding a marked term
    pub max_layer: usize,

    pub removed: usize,
}

/// Any term of the layer carries a marker. Read-only, evaluated in parallel.
fn layer_has_marker(graph: &TermGraph, layer_terms: &[TermId]) -> bool {
    layer_terms.par_iter().any(|id| graph.is_marked(id))
}

/// True when every remaining child of `id` lies strictly deeper than `id`.
pub fn no_lower_layer_edge(graph: &TermGraph, id: &str, ontology: &str) -> Result<bool> {
    let layer = graph.require_layer(id, ontology)?;
    for child in graph.children(id) {
        if layer >= graph.require_layer(&child, ontology)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Delete unmarked layers starting at `max_layer`.
///
/// Stops at the first layer that holds a marked term. Neighbors exposed by a
/// deletion join the leaf frontier. The root (layer 0) is never deleted and
/// never becomes a leaf, so a category without markers shrinks to its root.
pub fn prune_outer_layers(
    graph: &mut TermGraph,
    root: &str,
    mut leaves: Frontier,
    max_layer: usize,
) -> Result<OuterPrune> {
    let ontology = root;
    let mut dst = max_layer;
    let mut removed = 0;

    while dst > 0 {
        let layer_terms: Vec<TermId> = graph
            .terms()
            .filter(|node| node.layer(ontology) == Some(dst))
            .map(|node| node.id.clone())
            .collect();

        if layer_has_marker(graph, &layer_terms) {
            log::debug!("{ontology}: layer {dst} holds a marked term, stopping");
            break;
        }

        for id in &layer_terms {
            let mut neighbors = graph.parents(id);
            neighbors.extend(graph.children(id));

            for neighbor in neighbors {
                if neighbor == root || leaves.contains(&neighbor) {
                    continue;
                }
                if no_lower_layer_edge(graph, &neighbor, ontology)? {
                    leaves.insert(neighbor);
                }
            }

            leaves.remove(id);
            graph.remove_term(id);
        }

        log::debug!("{ontology}: removed layer {dst} ({} terms)", layer_terms.len());
        removed += layer_terms.len();
        dst -= 1;
    }

    Ok(OuterPrune {
        leaves,
        max_layer: dst,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layering::{BfsLayering, LayeringOracle};
    use crate::types::{Annotation, Relation};

    /// R <- A <- B <- C <- D, plus R <- A <- E
    fn chain() -> (TermGraph, Frontier, usize) {
        let mut graph = TermGraph::new();
        graph.add_edge("A", "R", Relation::IsA);
        graph.add_edge("B", "A", Relation::IsA);
        graph.add_edge("E", "A", Relation::IsA);
        graph.add_edge("C", "B", Relation::IsA);
        graph.add_edge("D", "C", Relation::IsA);
        let layering = BfsLayering.layer(&mut graph, "R").unwrap();
        let leaves = layering.leaves.into_iter().collect();
        (graph, leaves, layering.max_layer)
    }

    #[test]
    fn test_stops_at_first_marked_layer() {
        let (mut graph, leaves, max_layer) = chain();
        graph.term_mut("B").unwrap().annotation.attach("P05067");

        let result = prune_outer_layers(&mut graph, "R", leaves, max_layer).unwrap();

        assert_eq!(result.max_layer, 2);
        assert_eq!(result.removed, 2);
        assert!(!graph.contains("C"));
        assert!(!graph.contains("D"));
        assert!(graph.contains("E"));
        assert!(result.leaves.contains("B"));
        assert!(result.leaves.contains("E"));
        assert!(!result.leaves.contains("D"));
    }

    #[test]
    fn test_unmarked_category_shrinks_to_root() {
        let (mut graph, leaves, max_layer) = chain();

        let result = prune_outer_layers(&mut graph, "R", leaves, max_layer).unwrap();

        assert_eq!(result.max_layer, 0);
        assert!(result.leaves.is_empty());
        assert_eq!(graph.term_ids(), vec!["R".to_string()]);
    }

    #[test]
    fn test_boundary_marker_protects_layer() {
        let (mut graph, leaves, max_layer) = chain();
        graph.term_mut("D").unwrap().annotation = Annotation::Boundary;

        let result = prune_outer_layers(&mut graph, "R", leaves, max_layer).unwrap();

        assert_eq!(result.max_layer, 4);
        assert_eq!(result.removed, 0);
        assert_eq!(graph.node_count(), 6);
    }

    #[test]
    fn test_no_lower_layer_edge() {
        let (graph, _, _) = chain();
        assert!(no_lower_layer_edge(&graph, "B", "R").unwrap());
        assert!(no_lower_layer_edge(&graph, "D", "R").unwrap());

        let mut graph = graph;
        // C now has a child on its own layer
        graph.add_edge("F", "C", Relation::IsA);
        graph.set_layer("F", "R", 3);
        assert!(!no_lower_layer_edge(&graph, "C", "R").unwrap());
    }
}
