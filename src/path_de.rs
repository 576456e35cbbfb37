//! JSON decoding with JSON-path context in error messages.
use std::path::Path;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::syntax::SyntaxTree;

pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_decode_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_decode_error)
}

pub fn tree_from_str(src: &str) -> Result<SyntaxTree> {
    from_str_with_path(src)
}

pub fn tree_from_slice(bytes: &[u8]) -> Result<SyntaxTree> {
    from_slice_with_path(bytes)
}

/// Read and decode any JSON document from disk.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_slice_with_path(&bytes)
}

fn into_decode_error(err: serde_path_to_error::Error<serde_json::Error>) -> Error {
    let path = err.path().to_string();
    Error::Decode { path, message: err.into_inner().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_name_the_offending_path() {
        let src = r#"{
            "items": [
                {"type": {"kind": "class", "name": "Point", "members": [
                    {"property": {"modifiers": ["public"], "ty": "int", "name": "X", "accessors": ["fetch"]}}
                ]}}
            ]
        }"#;
        let err = tree_from_str(src).unwrap_err();
        match err {
            Error::Decode { path, .. } => {
                assert!(path.starts_with("items[0]"), "{path}");
                assert!(path.contains("members[0]"), "{path}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn minimal_document_decodes() {
        let tree = tree_from_str(r#"{"items": [{"type": {"kind": "struct", "name": "Money"}}]}"#).unwrap();
        assert_eq!(tree.items.len(), 1);
    }
}
