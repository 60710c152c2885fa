//! Typed read and write extension trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

use structptr_core::{Config, Pointer, Value};

use crate::convert::{from_value, to_value};
use crate::error::Result;

/// Extension trait for typed access through pointers.
///
/// This trait is implemented for [`Value`]. Reads clone the referenced
/// value and deserialize the copy, writes serialize first and then go
/// through the same coercing set as [`Pointer::set`].
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use structptr_core::pointer;
/// use structptr_serde::{json_to_value, TypedDocument};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// let mut doc = json_to_value(serde_json::json!({
///     "server": {"host": "localhost", "port": 8080}
/// }));
///
/// let server: Server = doc.read_as(&pointer!("/server")).unwrap();
/// assert_eq!(server.port, 8080);
///
/// doc.write_as(&pointer!("/server/port"), &9090).unwrap();
/// let port: u16 = doc.read_as(&pointer!("/server/port")).unwrap();
/// assert_eq!(port, 9090);
/// ```
pub trait TypedDocument {
    /// Read the value at `from` and deserialize it into a Rust type.
    fn read_as<T: DeserializeOwned>(&self, from: &Pointer) -> Result<T> {
        self.read_as_with(from, &Config::default())
    }

    fn read_as_with<T: DeserializeOwned>(&self, from: &Pointer, config: &Config) -> Result<T>;

    /// Read a value as a serde_json::Value.
    ///
    /// Convenience method when you don't know the exact type.
    fn read_json(&self, from: &Pointer) -> Result<serde_json::Value> {
        self.read_as(from)
    }

    /// Serialize a Rust type and store it at `to`.
    fn write_as<T: Serialize>(&mut self, to: &Pointer, data: &T) -> Result<()> {
        self.write_as_with(to, data, &Config::default())
    }

    fn write_as_with<T: Serialize>(
        &mut self,
        to: &Pointer,
        data: &T,
        config: &Config,
    ) -> Result<()>;

    /// Store a serde_json::Value at `to`.
    fn write_json(&mut self, to: &Pointer, data: &serde_json::Value) -> Result<()> {
        self.write_as(to, data)
    }
}

impl TypedDocument for Value {
    fn read_as_with<T: DeserializeOwned>(&self, from: &Pointer, config: &Config) -> Result<T> {
        let value = from.get_with(self, config)?;
        from_value(value.clone())
    }

    fn write_as_with<T: Serialize>(
        &mut self,
        to: &Pointer,
        data: &T,
        config: &Config,
    ) -> Result<()> {
        let value = to_value(data)?;
        to.set_with(self, value, config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::json_to_value;
    use crate::error::Error;
    use serde::Deserialize;
    use structptr_core::{pointer, ErrorKind, Field, FieldUnwrap, KeyKind, List, Map, Record, Type};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    fn users() -> Value {
        json_to_value(serde_json::json!({
            "users": [{"name": "Alice", "age": 30}],
            "count": 1
        }))
    }

    #[test]
    fn read_struct() {
        let doc = users();
        let user: User = doc.read_as(&pointer!("/users/0")).unwrap();
        assert_eq!(
            user,
            User {
                name: "Alice".to_string(),
                age: 30
            }
        );
    }

    #[test]
    fn read_missing_is_pointer_error() {
        let doc = users();
        let err = doc.read_as::<User>(&pointer!("/users/3")).unwrap_err();
        match err {
            Error::Pointer(e) => assert_eq!(e.kind(), ErrorKind::OutOfRange),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_wrong_shape_is_decode_error() {
        let doc = users();
        let err = doc.read_as::<User>(&pointer!("/count")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn write_appends_struct() {
        let mut doc = users();
        let bob = User {
            name: "Bob".to_string(),
            age: 25,
        };
        doc.write_as(&pointer!("/users/-"), &bob).unwrap();

        let back: User = doc.read_as(&pointer!("/users/1")).unwrap();
        assert_eq!(back, bob);
        assert_eq!(
            doc.read_json(&pointer!("/users/1/name")).unwrap(),
            serde_json::json!("Bob")
        );
    }

    #[test]
    fn write_into_typed_slot_coerces() {
        let mut doc = Value::from(
            Map::new(KeyKind::String, Type::Any).with("ports", List::new(Type::Int).with(80)),
        );
        doc.write_json(&pointer!("/ports/0"), &serde_json::json!("8080"))
            .unwrap();
        let port: i64 = doc.read_as(&pointer!("/ports/0")).unwrap();
        assert_eq!(port, 8080);

        let err = doc.write_as(&pointer!("/ports/0"), &"http").unwrap_err();
        assert!(matches!(err, Error::Pointer(e) if e.kind() == ErrorKind::Coercion));
    }

    #[test]
    fn config_reaches_traversal() {
        let wrapped = Record::new("Optional").field(Field::new("value", Type::Any, 5));
        let doc = Value::from(Map::new(KeyKind::String, Type::Any).with("n", wrapped));
        let config = Config::new().with_hook(FieldUnwrap::new("Optional", "value"));

        let n: i32 = doc.read_as_with(&pointer!("/n"), &config).unwrap();
        assert_eq!(n, 5);
    }
}
