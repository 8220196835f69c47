//! Boundary marking.
//!
//! From every annotated term walk the subsumption edges depth-first and mark
//! the deepest term reached. The walk also detects terms that the layering
//! oracle never reached from the category root: that disagreement is returned
//! as [`MarkOutcome::Disconnected`] and triggers root repair.

use crate::types::{Annotation, TermGraph, TermId};
use std::collections::HashSet;

/// A traversal left the terms layered for its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnection {
    /// Annotated term the traversal started from
    pub start: TermId,

    /// Category whose layering missed a visited term
    pub ontology: TermId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Terms newly set to `Annotation::Boundary`
    Marked { boundaries: Vec<TermId> },

    Disconnected(Disconnection),
}

/// Deepest term reachable from `start` along outgoing edges.
///
/// Ties keep the term found first; `start` is the initial candidate and must
/// carry a layer for `ontology`.
pub fn find_farthest(
    graph: &TermGraph,
    ontology: &str,
    start: &str,
) -> Result<TermId, Disconnection> {
    let disconnected = || Disconnection {
        start: start.to_string(),
        ontology: ontology.to_string(),
    };

    let mut farthest = start.to_string();
    let mut farthest_layer = graph.layer(start, ontology).ok_or_else(disconnected)?;

    let mut visited = HashSet::from([start.to_string()]);
    let mut stack: Vec<TermId> = graph.parents(start).into_iter().rev().collect();

    while let Some(current) = stack.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }

        let layer = graph.layer(&current, ontology).ok_or_else(disconnected)?;
        if layer > farthest_layer {
            farthest_layer = layer;
            farthest = current.clone();
        }

        stack.extend(graph.parents(&current).into_iter().rev());
    }

    Ok(farthest)
}

/// Mark boundary terms for every category root.
///
/// Real annotations are never overwritten; `Transit` and `Boundary` terms are
/// not used as starting points.
pub fn mark_boundaries(graph: &mut TermGraph, roots: &[TermId]) -> MarkOutcome {
    let mut boundaries = Vec::new();

    for ontology in roots {
        let starts: Vec<TermId> = graph
            .terms()
            .filter(|node| node.annotation.is_real() && node.layer(ontology).is_some())
            .map(|node| node.id.clone())
            .collect();

        for start in starts {
            let farthest = match find_farthest(graph, ontology, &start) {
                Ok(farthest) => farthest,
                Err(disconnection) => {
                    log::info!(
                        "Traversal from {} left category {}",
                        disconnection.start,
                        disconnection.ontology
                    );
                    return MarkOutcome::Disconnected(disconnection);
                }
            };

            if let Some(node) = graph.term_mut(&farthest) {
                if node.annotation == Annotation::Unannotated {
                    log::debug!("Boundary for {start} in {ontology}: {farthest}");
                    node.annotation = Annotation::Boundary;
                    boundaries.push(farthest);
                }
            }
        }
    }

    log::info!("Marked {} boundary terms", boundaries.len());
    MarkOutcome::Marked { boundaries }
}
