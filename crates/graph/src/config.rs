use serde::{Deserialize, Serialize};

/// Configuration for graph cleaning behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// How many times a disconnected root set may be repaired before giving up
    pub max_repairs: usize,

    /// Id given to the synthetic connector node (suffixed if taken)
    pub connector_id: String,

    /// Check that layering output is breadth-first consistent before pruning
    pub verify_layering: bool,

    /// Clean categories on the rayon thread pool
    pub parallel_categories: bool,

    /// Hard cap on leaf pruning passes per category (None = derived from graph size)
    pub max_leaf_passes: Option<usize>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            max_repairs: 3,
            connector_id: "new_connecting_node".to_string(),
            verify_layering: true,
            parallel_categories: true,
            max_leaf_passes: None,
        }
    }
}

impl CleanerConfig {
    /// Sequential, fully checked cleaning; handy for debugging
    pub fn for_debugging() -> Self {
        Self {
            parallel_categories: false,
            verify_layering: true,
            ..Default::default()
        }
    }

    /// Trust the layering oracle and never repair
    pub fn strict() -> Self {
        Self {
            max_repairs: 0,
            verify_layering: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connector_id.trim().is_empty() {
            return Err("connector_id must not be empty".to_string());
        }

        if self.max_leaf_passes == Some(0) {
            return Err("max_leaf_passes must be > 0".to_string());
        }

        Ok(())
    }
}
