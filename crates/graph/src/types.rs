use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Term identifier (e.g., "GO:0003674")
pub type TermId = String;

/// What an annotation pass has attached to a term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ids", rename_all = "snake_case")]
pub enum Annotation {
    /// No evidence and no marker
    #[default]
    Unannotated,

    /// External identifiers with evidence at this term, in insertion order
    Real(Vec<String>),

    /// Farthest term reached from an annotated term; bounds pruning
    Boundary,

    /// Pass-through term, never used as a boundary starting point
    Transit,
}

impl Annotation {
    /// Any state other than `Unannotated`. Marked terms are never pruned.
    pub fn is_marked(&self) -> bool {
        !matches!(self, Annotation::Unannotated)
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Annotation::Real(_))
    }

    pub fn identifiers(&self) -> &[String] {
        match self {
            Annotation::Real(ids) => ids,
            _ => &[],
        }
    }

    /// Attach an identifier. Returns false when it was already present.
    ///
    /// Real evidence replaces a `Boundary` or `Transit` marker.
    pub fn attach(&mut self, identifier: &str) -> bool {
        match self {
            Annotation::Real(ids) => {
                if ids.iter().any(|id| id == identifier) {
                    return false;
                }
                ids.push(identifier.to_string());
                true
            }
            _ => {
                *self = Annotation::Real(vec![identifier.to_string()]);
                true
            }
        }
    }
}

/// Origin of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    #[default]
    Term,

    /// Synthetic node joining category roots after a disconnection
    Connector,
}

/// Relationship carried by an edge (specific term -> general term)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relation {
    #[default]
    IsA,
    PartOf,
    Regulates,
    PositivelyRegulates,
    NegativelyRegulates,
    OccursIn,
    CapableOf,
    CapableOfPartOf,
    HasPart,
    Other,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::IsA => "is_a",
            Relation::PartOf => "part_of",
            Relation::Regulates => "regulates",
            Relation::PositivelyRegulates => "positively_regulates",
            Relation::NegativelyRegulates => "negatively_regulates",
            Relation::OccursIn => "occurs_in",
            Relation::CapableOf => "capable_of",
            Relation::CapableOfPartOf => "capable_of_part_of",
            Relation::HasPart => "has_part",
            Relation::Other => "other",
        }
    }
}

impl From<&str> for Relation {
    /// Unknown relation names map to `Other`
    fn from(name: &str) -> Self {
        match name {
            "is_a" => Relation::IsA,
            "part_of" => Relation::PartOf,
            "regulates" => Relation::Regulates,
            "positively_regulates" => Relation::PositivelyRegulates,
            "negatively_regulates" => Relation::NegativelyRegulates,
            "occurs_in" => Relation::OccursIn,
            "capable_of" => Relation::CapableOf,
            "capable_of_part_of" => Relation::CapableOfPartOf,
            "has_part" => Relation::HasPart,
            _ => Relation::Other,
        }
    }
}

impl From<String> for Relation {
    fn from(name: String) -> Self {
        Relation::from(name.as_str())
    }
}

impl From<Relation> for String {
    fn from(relation: Relation) -> Self {
        relation.as_str().to_string()
    }
}

/// Node in a term graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermNode {
    pub id: TermId,

    /// Human readable label (e.g., "molecular_function")
    pub name: Option<String>,

    /// Ontology namespace, used by renderers for coloring
    pub namespace: Option<String>,

    pub kind: TermKind,

    pub annotation: Annotation,

    /// Distance from each category root, keyed by root id
    pub layers: BTreeMap<TermId, usize>,
}

impl TermNode {
    pub fn new(id: impl Into<TermId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            namespace: None,
            kind: TermKind::Term,
            annotation: Annotation::Unannotated,
            layers: BTreeMap::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn layer(&self, ontology: &str) -> Option<usize> {
        self.layers.get(ontology).copied()
    }
}

/// Edge in a term graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEdge {
    pub relation: Relation,
}

/// Ontology graph; edges point from the more specific term to the more general one
#[derive(Debug, Clone, Default)]
pub struct TermGraph {
    /// Stable indices survive node removal during pruning
    pub(crate) graph: StableDiGraph<TermNode, TermEdge>,

    /// Term id -> NodeIndex mapping for fast lookup
    pub(crate) index: HashMap<TermId, NodeIndex>,
}

impl TermGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term; an existing term with the same id is left untouched.
    pub fn add_term(&mut self, node: TermNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Add an edge `specific -> general`, creating missing terms.
    pub fn add_edge(&mut self, specific: &str, general: &str, relation: Relation) {
        let from = self.add_term(TermNode::new(specific));
        let to = self.add_term(TermNode::new(general));
        self.graph.add_edge(from, to, TermEdge { relation });
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn term(&self, id: &str) -> Option<&TermNode> {
        self.index.get(id).and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn term_mut(&mut self, id: &str) -> Option<&mut TermNode> {
        let idx = *self.index.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    /// All terms in insertion order
    pub fn terms(&self) -> impl Iterator<Item = &TermNode> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx))
    }

    pub fn term_ids(&self) -> Vec<TermId> {
        self.terms().map(|node| node.id.clone()).collect()
    }

    /// All edges as (specific, general, relation)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Relation)> {
        self.graph.edge_indices().filter_map(move |edge| {
            let (from, to) = self.graph.edge_endpoints(edge)?;
            let relation = self.graph.edge_weight(edge)?.relation;
            Some((
                self.graph[from].id.as_str(),
                self.graph[to].id.as_str(),
                relation,
            ))
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
