use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiScopeError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The XML document as a whole could not be parsed. Fatal for the
    /// analysis that received it; the pipeline reports it through a failed
    /// `PageAnalysis`, never a panic.
    #[error("XML syntax error: {0}")]
    XmlSyntax(String),

    /// A single node carried an unusable `bounds` attribute. Recoverable:
    /// the node is dropped with a warning and the analysis continues.
    #[error("Malformed bounds attribute: {0}")]
    MalformedBounds(String),

    /// The caller asked for an action the element does not support. Rejected
    /// before any device command is built.
    #[error("Action {action} not supported by element {element_id}")]
    UnsupportedAction { element_id: String, action: String },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl serde::Serialize for UiScopeError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type UiScopeResult<T> = Result<T, UiScopeError>;
