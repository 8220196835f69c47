use crate::types::{TermGraph, TermId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// External identifier -> term ids it annotates
pub type AnnotationMap = BTreeMap<String, Vec<TermId>>;

/// Which terms each identifier was attached to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationTrace {
    pub matched: BTreeMap<String, Vec<TermId>>,

    /// Identifiers none of whose terms exist in the graph
    pub unmatched: Vec<String>,
}

impl AnnotationTrace {
    pub fn matched_terms(&self) -> HashSet<&str> {
        self.matched
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// Attach every identifier to the terms of the graph it names.
///
/// Purely additive; attaching the same identifier twice is a no-op.
pub fn map_annotations(annotations: &AnnotationMap, graph: &mut TermGraph) -> AnnotationTrace {
    let mut trace = AnnotationTrace::default();

    for (identifier, terms) in annotations {
        let mut seen = HashSet::new();
        let matches: Vec<TermId> = terms
            .iter()
            .filter(|term| graph.contains(term) && seen.insert(term.as_str()))
            .cloned()
            .collect();

        if matches.is_empty() {
            log::warn!("Identifier {identifier} has no matching terms in the graph");
            trace.unmatched.push(identifier.clone());
            continue;
        }

        for term in &matches {
            if let Some(node) = graph.term_mut(term) {
                node.annotation.attach(identifier);
            }
        }
        trace.matched.insert(identifier.clone(), matches);
    }

    log::info!(
        "Mapped {} identifiers onto {} terms ({} unmatched)",
        trace.matched.len(),
        trace.matched_terms().len(),
        trace.unmatched.len()
    );

    trace
}
