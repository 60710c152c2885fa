//! Serde integration for structptr documents.
//!
//! This layer bridges [`Value`] documents and the serde ecosystem:
//! - `json_to_value` / `value_to_json`: lossless-enough JSON conversion
//! - `to_value` / `from_value`: any serde type to and from a document
//! - `TypedDocument`: read and write Rust types through pointers
//!
//! # Example
//!
//! ```rust
//! use structptr_core::pointer;
//! use structptr_serde::{json_to_open_value, value_to_json};
//!
//! let mut doc = json_to_open_value(serde_json::json!({"a": {"b": 1}}));
//! pointer!("/a/c").set(&mut doc, "x".into()).unwrap();
//! assert_eq!(value_to_json(doc), serde_json::json!({"a": {"b": 1, "c": "x"}}));
//! ```

mod convert;
mod error;
mod typed;

pub use convert::{
    from_value, json_to_open_value, json_to_value, to_open_value, to_value, value_to_json,
};
pub use error::{Error, Result};
pub use typed::TypedDocument;

// Re-export core types for convenience
pub use structptr_core::{Config, Pointer, Value};
