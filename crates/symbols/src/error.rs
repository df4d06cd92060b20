use thiserror::Error;

/// Result type for symbol extraction
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while extracting symbols from a source file
#[derive(Error, Debug)]
pub enum ParseError {
    /// The file extension does not belong to a supported language
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// The grammar could not produce a syntax tree at all
    #[error("Failed to parse {path}: {reason}")]
    SyntaxInvalid { path: String, reason: String },

    /// Tree-sitter setup error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Create an unsupported extension error
    pub fn unsupported_extension(ext: impl Into<String>) -> Self {
        Self::UnsupportedExtension(ext.into())
    }

    /// Create a syntax-invalid error for a file
    pub fn syntax_invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SyntaxInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }
}
