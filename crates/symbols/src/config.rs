use serde::{Deserialize, Serialize};

/// Configuration for symbol extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Longest aliased type text that is still inlined into a type-alias signature
    pub max_inline_type_chars: usize,

    /// Length of the preview used to name bare top-level expressions (in graphemes)
    pub expression_preview_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_inline_type_chars: 100,
            expression_preview_chars: 40,
        }
    }
}

impl ExtractorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.expression_preview_chars == 0 {
            return Err("expression_preview_chars must be > 0".to_string());
        }
        Ok(())
    }
}
