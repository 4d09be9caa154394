use relabel_engine::RenameError;
use thiserror::Error;

/// Result type for front-end operations
pub type Result<T> = std::result::Result<T, JsError>;

/// Errors raised by the JavaScript front end
#[derive(Error, Debug)]
pub enum JsError {
    /// Failed to parse the source code
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unsupported language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// Renamed program no longer forms valid source
    #[error("Generation error: {0}")]
    GenerationError(String),
}

impl JsError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationError(msg.into())
    }
}

impl From<JsError> for RenameError {
    fn from(err: JsError) -> Self {
        match err {
            JsError::GenerationError(msg) => RenameError::Generation(msg),
            JsError::ParseError(msg) => RenameError::Parse(msg),
            other => RenameError::Parse(other.to_string()),
        }
    }
}
