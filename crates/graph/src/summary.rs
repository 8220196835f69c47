//! Annotation statistics over the full term graph.

use crate::annotate::AnnotationMap;
use crate::types::{TermGraph, TermId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

const TOP_TERMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub root: TermId,
    pub name: Option<String>,

    /// Distinct annotated terms that are the root or one of its descendants
    pub terms: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub term: TermId,
    pub name: Option<String>,
    pub annotations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSummary {
    pub identifiers: usize,
    pub unique_terms: usize,
    pub categories: Vec<CategoryCount>,
    pub top_terms: Vec<TermFrequency>,
}

impl AnnotationSummary {
    pub fn build(annotations: &AnnotationMap, graph: &TermGraph, roots: &[TermId]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for term in annotations.values().flatten() {
            *counts.entry(term.as_str()).or_default() += 1;
        }

        let mut per_root: BTreeMap<&str, usize> = roots.iter().map(|r| (r.as_str(), 0)).collect();
        for term in counts.keys().filter(|term| graph.contains(term)) {
            let ancestors = graph.ancestors(term);
            for root in roots {
                if root == term || ancestors.contains(root) {
                    if let Some(count) = per_root.get_mut(root.as_str()) {
                        *count += 1;
                    }
                }
            }
        }

        let categories = roots
            .iter()
            .map(|root| CategoryCount {
                root: root.clone(),
                name: graph.term(root).and_then(|node| node.name.clone()),
                terms: per_root.get(root.as_str()).copied().unwrap_or(0),
            })
            .collect();

        let mut ranked: Vec<(&str, usize)> = counts.iter().map(|(t, c)| (*t, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let top_terms = ranked
            .into_iter()
            .take(TOP_TERMS)
            .map(|(term, annotations)| TermFrequency {
                term: term.to_string(),
                name: graph.term(term).and_then(|node| node.name.clone()),
                annotations,
            })
            .collect();

        Self {
            identifiers: annotations.len(),
            unique_terms: counts.len(),
            categories,
            top_terms,
        }
    }
}

impl fmt::Display for AnnotationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Annotation summary:")?;
        writeln!(f, "  - Total identifiers: {}", self.identifiers)?;
        writeln!(f, "  - Total unique terms: {}", self.unique_terms)?;
        writeln!(f)?;
        writeln!(f, "Category breakdown:")?;
        for category in &self.categories {
            writeln!(
                f,
                "  - {} ({}): {} terms",
                category.root,
                category.name.as_deref().unwrap_or("Unknown"),
                category.terms
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Top {} terms by frequency:", TOP_TERMS)?;
        for entry in &self.top_terms {
            writeln!(
                f,
                "  - {} ({}): {} annotations",
                entry.term,
                entry.name.as_deref().unwrap_or("Unknown"),
                entry.annotations
            )?;
        }
        Ok(())
    }
}
