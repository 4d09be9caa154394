use thiserror::Error;

/// Result type for rename operations
pub type Result<T> = std::result::Result<T, RenameError>;

/// Errors that abort a rename pass
#[derive(Error, Debug)]
pub enum RenameError {
    /// Input source does not parse; nothing was mutated
    #[error("Parse error: {0}")]
    Parse(String),

    /// Renamed program could not be rendered back to source
    #[error("Generation error: {0}")]
    Generation(String),

    /// The naming oracle rejected a request
    #[error("Oracle error while naming '{name}': {source}")]
    Oracle {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RenameError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create an oracle error for the binding originally called `name`
    pub fn oracle(name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Oracle {
            name: name.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
