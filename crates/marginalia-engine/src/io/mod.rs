//! Portable document representations: a JSON tree and HTML-subset markup.
//! Both carry anchors as marks holding only the annotation id.

pub mod json;
pub mod markup;

use crate::models::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a {expected} node, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),
}

pub use json::{from_json, from_json_value, to_json, to_json_pretty, to_json_value};
pub use markup::{from_markup, to_markup};
