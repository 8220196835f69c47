//! # Term Graph Pruning
//!
//! Annotation-driven cleaning of ontology term graphs (e.g. Gene Ontology).
//!
//! ## Features
//!
//! - **Annotation mapping** - attach external identifiers to the terms they annotate
//! - **Layering** - breadth-first distance of every term from each category root
//! - **Boundary marking** - protect the most general terms reached from evidence
//! - **Outer and leaf pruning** - drop unannotated terms that no evidence needs
//! - **Disconnection repair** - join root sets under a connector and retry
//!
//! ## Architecture
//!
//! ```text
//! TermGraph + AnnotationMap
//!     │
//!     ├──> Annotation mapping (Real evidence on terms)
//!     │
//!     ├──> Layering oracle, per root (BFS against edge direction)
//!     │      └─ optional consistency check
//!     │
//!     ├──> Boundary marker (DFS along edges from evidence)
//!     │      └─ disconnected? add connector above roots, retry
//!     │
//!     └──> Per category (rayon)
//!            ├─ Outer pruner: strip unmarked outermost layers
//!            └─ Leaf pruner: strip unmarked leaves, promote parents
//! ```
//!
//! Edges always point from the more specific term to the more general one.

mod annotate;
mod boundary;
mod cleaner;
mod config;
mod document;
mod error;
mod frontier;
mod graph;
mod layering;
mod leaf;
mod outer;
mod summary;
mod types;

pub use annotate::{map_annotations, AnnotationMap, AnnotationTrace};
pub use boundary::{find_farthest, mark_boundaries, Disconnection, MarkOutcome};
pub use cleaner::{CleanedCategory, CleaningReport, GraphCleaner};
pub use config::CleanerConfig;
pub use document::{EdgeRecord, TermGraphDocument, TermRecord};
pub use error::{PruneError, Result};
pub use frontier::Frontier;
pub use layering::{verify_layering, BfsLayering, Layering, LayeringOracle};
pub use leaf::{default_pass_limit, prune_leaves, LeafPrune};
pub use outer::{no_lower_layer_edge, prune_outer_layers, OuterPrune};
pub use summary::{AnnotationSummary, CategoryCount, TermFrequency};
pub use types::{Annotation, Relation, TermEdge, TermGraph, TermId, TermKind, TermNode};
