use crate::ScalarGraph;
use migrad_core::error::{Error, Result};

impl ScalarGraph {
    /// JSON dump of the arena (op tags, parent ids, data and gradients).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.snapshot())
            .map_err(|e| Error::Serialization(format!("Failed to serialize scalar graph to JSON: {}", e)))
    }
}
