use std::path::PathBuf;

/// Failures of the host-facing layer: decoding documents, locating nodes and
/// wiring recipes to targets. The generators themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },

    #[error("no type declaration named `{0}`")]
    TypeNotFound(String),

    #[error("type name `{name}` is ambiguous: {candidates:?}")]
    AmbiguousType { name: String, candidates: Vec<String> },

    #[error("type `{type_name}` declares no property `{property}`")]
    PropertyNotFound { type_name: String, property: String },

    #[error("recipe `{recipe}` cannot be applied to {target}")]
    TargetMismatch { recipe: &'static str, target: String },

    #[error("the replaced node is not part of this tree")]
    NodeNotInTree,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
