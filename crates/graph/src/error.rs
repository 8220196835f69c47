use thiserror::Error;

pub type Result<T> = std::result::Result<T, PruneError>;

#[derive(Error, Debug)]
pub enum PruneError {
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Term not found: {0}")]
    TermNotFound(String),

    #[error("No category roots given")]
    NoRoots,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A node inside a category's working subgraph has no layer for it
    #[error("Term {term} has no layer for category {ontology}")]
    MissingLayer { term: String, ontology: String },

    #[error("Inconsistent layering for category {ontology} at {term}: {reason}")]
    InconsistentLayering {
        ontology: String,
        term: String,
        reason: String,
    },

    #[error("Leaf pruning for category {ontology} did not settle after {passes} passes")]
    LeafPruningDiverged { ontology: String, passes: usize },

    #[error(
        "Repair attempt {attempt} failed: traversal from {start} left category {ontology}"
    )]
    RepairExhausted {
        attempt: usize,
        start: String,
        ontology: String,
    },

    #[error("Cleaning category {ontology} failed on attempt {attempt}: {source}")]
    Category {
        ontology: String,
        attempt: usize,
        #[source]
        source: Box<PruneError>,
    },
}

impl PruneError {
    pub fn invalid_graph(msg: impl Into<String>) -> Self {
        Self::InvalidGraph(msg.into())
    }

    pub fn missing_layer(term: impl Into<String>, ontology: impl Into<String>) -> Self {
        Self::MissingLayer {
            term: term.into(),
            ontology: ontology.into(),
        }
    }

    /// Wrap an error raised while cleaning one category.
    pub fn in_category(self, ontology: impl Into<String>, attempt: usize) -> Self {
        Self::Category {
            ontology: ontology.into(),
            attempt,
            source: Box::new(self),
        }
    }
}
