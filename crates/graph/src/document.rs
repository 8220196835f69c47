//! JSON document form of a term graph.

use crate::error::{PruneError, Result};
use crate::types::{Annotation, Relation, TermGraph, TermId, TermKind, TermNode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermGraphDocument {
    pub terms: Vec<TermRecord>,

    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub id: TermId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub transit: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub boundary: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub connector: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layers: BTreeMap<TermId, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// More specific term
    pub from: TermId,

    /// More general term
    pub to: TermId,

    #[serde(default)]
    pub relation: Relation,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<&TermNode> for TermRecord {
    fn from(node: &TermNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            namespace: node.namespace.clone(),
            transit: node.annotation == Annotation::Transit,
            boundary: node.annotation == Annotation::Boundary,
            connector: node.kind == TermKind::Connector,
            annotations: node.annotation.identifiers().to_vec(),
            layers: node.layers.clone(),
        }
    }
}

impl TermRecord {
    fn into_node(self) -> Result<TermNode> {
        let annotation = match (self.annotations.is_empty(), self.transit, self.boundary) {
            (true, false, false) => Annotation::Unannotated,
            (false, false, false) => Annotation::Real(self.annotations),
            (true, true, false) => Annotation::Transit,
            (true, false, true) => Annotation::Boundary,
            _ => {
                return Err(PruneError::invalid_graph(format!(
                    "term {} has conflicting annotation markers",
                    self.id
                )))
            }
        };

        Ok(TermNode {
            id: self.id,
            name: self.name,
            namespace: self.namespace,
            kind: if self.connector {
                TermKind::Connector
            } else {
                TermKind::Term
            },
            annotation,
            layers: self.layers,
        })
    }
}

impl TermGraph {
    /// Build a graph from its document form.
    ///
    /// Terms must be unique and every edge must name declared terms.
    pub fn from_document(document: TermGraphDocument) -> Result<Self> {
        let mut graph = TermGraph::new();
        let mut seen = HashSet::new();

        for record in document.terms {
            if !seen.insert(record.id.clone()) {
                return Err(PruneError::invalid_graph(format!(
                    "duplicate term {}",
                    record.id
                )));
            }
            graph.add_term(record.into_node()?);
        }

        for edge in document.edges {
            for end in [&edge.from, &edge.to] {
                if !graph.contains(end) {
                    return Err(PruneError::invalid_graph(format!(
                        "edge {} -> {} names unknown term {}",
                        edge.from, edge.to, end
                    )));
                }
            }
            graph.add_edge(&edge.from, &edge.to, edge.relation);
        }

        log::debug!(
            "Loaded term graph: {} terms, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }

    pub fn to_document(&self) -> TermGraphDocument {
        TermGraphDocument {
            terms: self.terms().map(TermRecord::from).collect(),
            edges: self
                .edges()
                .map(|(from, to, relation)| EdgeRecord {
                    from: from.to_string(),
                    to: to.to_string(),
                    relation,
                })
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: TermGraphDocument = serde_json::from_str(json)
            .map_err(|e| PruneError::invalid_graph(format!("malformed graph document: {e}")))?;
        Self::from_document(document)
    }
}
