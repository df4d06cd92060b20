use serde::{Deserialize, Serialize};

/// Configuration for chunking behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Attach the imports each chunk actually references
    pub include_relevant_imports: bool,

    /// Maximum number of imports to attach per chunk (0 = no limit)
    pub max_imports_per_chunk: usize,

    /// Advisory token budget downstream embedders check chunks against
    pub token_budget: usize,

    /// Characters per token used for estimates
    pub chars_per_token: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            include_relevant_imports: true,
            max_imports_per_chunk: 0,
            token_budget: 32_000,
            chars_per_token: 4,
        }
    }
}

impl ChunkerConfig {
    /// Create config without import context (embedding text only)
    pub fn without_imports() -> Self {
        Self {
            include_relevant_imports: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chars_per_token == 0 {
            return Err("chars_per_token must be > 0".to_string());
        }

        if self.token_budget == 0 {
            return Err("token_budget must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ChunkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.token_budget, 32_000);
        assert_eq!(config.chars_per_token, 4);
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(ChunkerConfig::without_imports().validate().is_ok());
        assert!(!ChunkerConfig::without_imports().include_relevant_imports);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ChunkerConfig::default();

        // Invalid: zero ratio
        config.chars_per_token = 0;
        assert!(config.validate().is_err());

        // Invalid: zero budget
        config.chars_per_token = 4;
        config.token_budget = 0;
        assert!(config.validate().is_err());

        config.token_budget = 8_000;
        assert!(config.validate().is_ok());
    }
}
