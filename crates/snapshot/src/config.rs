use serde::{Deserialize, Serialize};

/// Rendering options for snapshots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Line-comment token used for the file header
    pub header_prefix: String,

    /// Indentation added to container members that are not indented in the source
    pub indent_unit: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            header_prefix: "//".to_string(),
            indent_unit: "  ".to_string(),
        }
    }
}

impl SnapshotConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.header_prefix.trim().is_empty() {
            return Err("header_prefix must not be empty".to_string());
        }

        if self.indent_unit.is_empty() || !self.indent_unit.chars().all(|c| c == ' ' || c == '\t')
        {
            return Err("indent_unit must be a non-empty run of spaces or tabs".to_string());
        }

        Ok(())
    }
}
