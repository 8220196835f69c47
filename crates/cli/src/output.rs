use serde::Serialize;
use termprune_graph::{AnnotationTrace, CleaningReport, TermGraphDocument};

#[derive(Debug, Serialize)]
pub struct CleanOutput {
    pub roots: Vec<String>,
    pub repairs: usize,
    pub trace: AnnotationTrace,
    pub categories: Vec<CategoryOutput>,
}

#[derive(Debug, Serialize)]
pub struct CategoryOutput {
    pub root: String,
    pub max_layer: usize,
    pub leaves: Vec<String>,
    pub graph: TermGraphDocument,
}

impl CleanOutput {
    pub fn from_report(report: &CleaningReport, strip_connectors: bool) -> Self {
        let categories = report
            .categories
            .iter()
            .map(|category| {
                let graph = if strip_connectors {
                    category.render_graph().to_document()
                } else {
                    category.graph.to_document()
                };
                CategoryOutput {
                    root: category.root.clone(),
                    max_layer: category.max_layer,
                    leaves: category.leaves.clone(),
                    graph,
                }
            })
            .collect();

        Self {
            roots: report.roots.clone(),
            repairs: report.repairs,
            trace: report.trace.clone(),
            categories,
        }
    }
}
