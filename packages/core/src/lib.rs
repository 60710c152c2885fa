//! structptr core: pointers into generic documents.
//!
//! This crate resolves RFC 6901 style pointers against in-memory documents:
//! - `Pointer`: Parsed, unescaped segment list with parent/child/ordering
//! - `Value`: Document tree whose containers remember their declared types
//! - `coerce`: Weak conversion of segments and written values into those types
//! - `Config`: Field tag name and value hook for a traversal
//!
//! Reads (`get`), writes (`set`) and deletes (`delete`) all walk the document
//! one segment at a time, converting each segment into the key, index or
//! field name the container at that point expects.
//!
//! # Example
//!
//! ```rust
//! use structptr_core::{pointer, KeyKind, List, Map, Type, Value};
//!
//! let mut doc = Value::from(
//!     Map::new(KeyKind::String, Type::Any).with("items", List::new(Type::Int).with(1)),
//! );
//!
//! pointer!("/items/-").set(&mut doc, Value::from("2")).unwrap();
//! assert_eq!(pointer!("/items/1").get(&doc).unwrap(), &Value::Int(2));
//! ```

mod coerce;
mod config;
mod error;
mod pointer;
mod traverse;
mod value;

pub use coerce::{coerce, coerce_index, coerce_key, field_position, CoercionError, HIDDEN_FIELD};
pub use config::{Config, FieldUnwrap, ValueHook, DEFAULT_TAG_NAME};
pub use error::{Error, ErrorKind, Result};
pub use pointer::{sort_for_removal, sort_pointers, Pointer};
pub use traverse::{delete, get, set, APPEND};
pub use value::{Array, Field, Key, KeyKind, Kind, List, Map, Record, Type, Value};

/// Parse pointer text. Shorthand for [`Pointer::parse`].
pub fn parse(input: &str) -> Result<Pointer> {
    Pointer::parse(input)
}
