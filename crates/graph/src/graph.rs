use crate::error::{PruneError, Result};
use crate::types::{Annotation, Relation, TermGraph, TermId, TermKind, TermNode};
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use std::collections::HashSet;

impl TermGraph {
    /// Distinct neighbors in one direction, in edge order
    fn distinct_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<TermId> {
        // petgraph lists the newest edge first
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.reverse();

        let mut seen = HashSet::new();
        neighbors
            .into_iter()
            .filter(|&n| seen.insert(n))
            .map(|n| self.graph[n].id.clone())
            .collect()
    }

    /// More general terms this term points to (outgoing edges)
    pub fn parents(&self, id: &str) -> Vec<TermId> {
        match self.index.get(id) {
            Some(&idx) => self.distinct_neighbors(idx, Direction::Outgoing),
            None => Vec::new(),
        }
    }

    /// More specific terms pointing to this term (incoming edges)
    pub fn children(&self, id: &str) -> Vec<TermId> {
        match self.index.get(id) {
            Some(&idx) => self.distinct_neighbors(idx, Direction::Incoming),
            None => Vec::new(),
        }
    }

    pub fn child_count(&self, id: &str) -> usize {
        self.children(id).len()
    }

    pub fn layer(&self, id: &str, ontology: &str) -> Option<usize> {
        self.term(id).and_then(|node| node.layer(ontology))
    }

    /// Layer of a term that must carry one for this category
    pub fn require_layer(&self, id: &str, ontology: &str) -> Result<usize> {
        self.layer(id, ontology)
            .ok_or_else(|| PruneError::missing_layer(id, ontology))
    }

    pub fn set_layer(&mut self, id: &str, ontology: &str, layer: usize) {
        if let Some(node) = self.term_mut(id) {
            node.layers.insert(ontology.to_string(), layer);
        }
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.term(id).map(|node| &node.annotation)
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.annotation(id).is_some_and(Annotation::is_marked)
    }

    /// Terms of `candidates` still in the graph whose layer equals `dst`
    pub fn terms_at_layer<'a, I>(&self, ontology: &str, dst: usize, candidates: I) -> Vec<TermId>
    where
        I: IntoIterator<Item = &'a TermId>,
    {
        candidates
            .into_iter()
            .filter(|id| self.layer(id, ontology) == Some(dst))
            .cloned()
            .collect()
    }

    /// Remove a term together with all its edges
    pub fn remove_term(&mut self, id: &str) -> Option<TermNode> {
        let idx = self.index.remove(id)?;
        self.graph.remove_node(idx)
    }

    /// Mark a term as pass-through
    pub fn mark_transit(&mut self, id: &str) -> Result<()> {
        let node = self
            .term_mut(id)
            .ok_or_else(|| PruneError::TermNotFound(id.to_string()))?;
        node.annotation = Annotation::Transit;
        Ok(())
    }

    /// Drop every layer computed so far
    pub fn clear_layers(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.layers.clear();
        }
    }

    /// Owned copy of the induced subgraph over `ids`, attributes included
    pub fn subgraph(&self, ids: &HashSet<TermId>) -> TermGraph {
        let mut sub = TermGraph::new();
        for node in self.terms().filter(|node| ids.contains(&node.id)) {
            sub.add_term(node.clone());
        }
        for (from, to, relation) in self.edges() {
            if ids.contains(from) && ids.contains(to) {
                sub.add_edge(from, to, relation);
            }
        }
        sub
    }

    /// Add a connector node above `roots` and return its id.
    ///
    /// The id starts from `base` and gets a numeric suffix if already taken.
    pub fn add_connector(&mut self, base: &str, roots: &[TermId]) -> TermId {
        let mut id = base.to_string();
        let mut suffix = 2;
        while self.contains(&id) {
            id = format!("{base}#{suffix}");
            suffix += 1;
        }

        let mut node = TermNode::new(id.clone()).named("Temporary connecting node");
        node.kind = TermKind::Connector;
        self.add_term(node);

        for root in roots {
            self.add_edge(root, &id, Relation::Other);
        }
        id
    }

    /// Copy of the graph without synthetic connector nodes
    pub fn without_connectors(&self) -> TermGraph {
        let keep: HashSet<TermId> = self
            .terms()
            .filter(|node| node.kind != TermKind::Connector)
            .map(|node| node.id.clone())
            .collect();
        self.subgraph(&keep)
    }

    /// Every term reachable along outgoing edges, the term itself excluded
    pub fn ancestors(&self, id: &str) -> HashSet<TermId> {
        let mut seen = HashSet::new();
        let mut stack = self.parents(id);
        while let Some(current) = stack.pop() {
            if seen.insert(current.clone()) {
                stack.extend(self.parents(&current));
            }
        }
        seen
    }
}
