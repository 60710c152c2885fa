//! Resolving pointers against documents.
//!
//! Traversal walks the document one segment at a time. At each step the
//! current value is unboxed and dispatched on its kind:
//!
//! - maps coerce the segment into their key kind and look the key up
//! - lists and arrays coerce the segment into an index and bounds-check it
//! - records resolve the segment against their (possibly tagged) field names
//! - anything else can't be stepped into
//!
//! After each step the new value is unboxed and handed to the configured
//! [`ValueHook`](crate::ValueHook), if any. Mutations resolve the parent of
//! the pointer this way and then apply the last segment to it in place, so
//! a failed mutation never leaves the document half-written.

use crate::coerce::{coerce, coerce_index, coerce_key, field_position};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pointer::Pointer;
use crate::value::{Record, Value};

/// Segment that appends to a list when setting.
pub const APPEND: &str = "-";

impl Pointer {
    /// Read the value this pointer refers to.
    pub fn get<'a>(&self, doc: &'a Value) -> Result<&'a Value> {
        self.get_with(doc, &Config::default())
    }

    pub fn get_with<'a>(&self, doc: &'a Value, config: &Config) -> Result<&'a Value> {
        if self.is_root() {
            return Ok(doc);
        }
        self.walk(doc, self.len(), config)
    }

    /// Mutable access to the value this pointer refers to.
    pub fn get_mut<'a>(&self, doc: &'a mut Value) -> Result<&'a mut Value> {
        self.get_mut_with(doc, &Config::default())
    }

    pub fn get_mut_with<'a>(
        &self,
        doc: &'a mut Value,
        config: &Config,
    ) -> Result<&'a mut Value> {
        if self.is_root() {
            return Ok(doc);
        }
        self.walk_mut(doc, self.len(), config)
    }

    /// Write `value` at this pointer.
    ///
    /// The parent of the target must already exist. Maps only accept keys
    /// they already hold unless they are open; lists take the segment `-`
    /// as an append. The value is coerced to the slot's declared type.
    /// Setting the root replaces the whole document.
    pub fn set(&self, doc: &mut Value, value: Value) -> Result<()> {
        self.set_with(doc, value, &Config::default())
    }

    pub fn set_with(&self, doc: &mut Value, value: Value, config: &Config) -> Result<()> {
        let Some(last) = self.last() else {
            log::debug!("set: replacing whole document");
            *doc = value;
            return Ok(());
        };
        let at = self.len() - 1;
        let parent = self.walk_mut(doc, at, config)?;

        log::debug!("set {}", self);
        match parent.unboxed_mut() {
            Value::Map(map) => {
                let key =
                    coerce_key(last, map.key_kind()).map_err(|e| Error::coercion(self, at, e))?;
                if !map.is_open() && !map.contains_key(&key) {
                    return Err(Error::not_found(self, at, format!("key {}", key)));
                }
                let value =
                    coerce(value, map.value_type()).map_err(|e| Error::coercion(self, at, e))?;
                map.insert(key, value);
            }
            Value::List(list) => {
                if last == APPEND {
                    let value =
                        coerce(value, list.elem_type()).map_err(|e| Error::coercion(self, at, e))?;
                    list.push(value);
                } else {
                    let index = self.checked_index(at, last, list.len())?;
                    let value =
                        coerce(value, list.elem_type()).map_err(|e| Error::coercion(self, at, e))?;
                    if let Some(slot) = list.get_mut(index) {
                        *slot = value;
                    }
                }
            }
            Value::Array(array) => {
                if last == APPEND {
                    return Err(Error::out_of_range(self, at, array.len() as i64, array.len()));
                }
                let index = self.checked_index(at, last, array.len())?;
                let value =
                    coerce(value, array.elem_type()).map_err(|e| Error::coercion(self, at, e))?;
                if let Some(slot) = array.get_mut(index) {
                    *slot = value;
                }
            }
            Value::Record(record) => {
                let index = self.field_index(at, last, record, config)?;
                let field = &mut record.fields_mut()[index];
                let value = coerce(value, field.ty()).map_err(|e| Error::coercion(self, at, e))?;
                *field.value_mut() = value;
            }
            other => return Err(Error::invalid_kind(self, at, other.kind())),
        }

        Ok(())
    }

    /// Remove the value at this pointer, returning it.
    ///
    /// Deleting a map key that isn't there is not an error and returns
    /// `None`, even though reading the same key is. List elements after the
    /// removed one shift down. Arrays and records have fixed shapes and
    /// can't be deleted from. Deleting the root leaves `Null` behind.
    pub fn delete(&self, doc: &mut Value) -> Result<Option<Value>> {
        self.delete_with(doc, &Config::default())
    }

    pub fn delete_with(&self, doc: &mut Value, config: &Config) -> Result<Option<Value>> {
        let Some(last) = self.last() else {
            log::debug!("delete: clearing whole document");
            return Ok(Some(std::mem::take(doc)));
        };
        let at = self.len() - 1;
        let parent = self.walk_mut(doc, at, config)?;

        log::debug!("delete {}", self);
        match parent.unboxed_mut() {
            Value::Map(map) => {
                let key =
                    coerce_key(last, map.key_kind()).map_err(|e| Error::coercion(self, at, e))?;
                Ok(map.remove(&key))
            }
            Value::List(list) => {
                let index = self.checked_index(at, last, list.len())?;
                Ok(Some(list.remove(index)))
            }
            other => Err(Error::invalid_kind(self, at, other.kind())),
        }
    }

    /// Resolve the first `depth` segments.
    fn walk<'a>(&self, doc: &'a Value, depth: usize, config: &Config) -> Result<&'a Value> {
        let mut current = doc;
        for (at, segment) in self.iter().take(depth).enumerate() {
            let next = self.step(at, segment, current.unboxed(), config)?;
            current = self.settle(at, next, config)?;
        }
        Ok(current)
    }

    fn walk_mut<'a>(
        &self,
        doc: &'a mut Value,
        depth: usize,
        config: &Config,
    ) -> Result<&'a mut Value> {
        let mut current = doc;
        for (at, segment) in self.iter().take(depth).enumerate() {
            let next = self.step_mut(at, segment, current.unboxed_mut(), config)?;
            current = self.settle_mut(at, next, config)?;
        }
        Ok(current)
    }

    fn step<'a>(
        &self,
        at: usize,
        segment: &str,
        value: &'a Value,
        config: &Config,
    ) -> Result<&'a Value> {
        log::trace!("{}: part {} steps into {}", self, at, value.kind());
        match value {
            Value::Map(map) => {
                let key =
                    coerce_key(segment, map.key_kind()).map_err(|e| Error::coercion(self, at, e))?;
                map.get(&key)
                    .ok_or_else(|| Error::not_found(self, at, format!("key {}", key)))
            }
            Value::List(list) => {
                let index = self.checked_index(at, segment, list.len())?;
                Ok(&list.as_slice()[index])
            }
            Value::Array(array) => {
                let index = self.checked_index(at, segment, array.len())?;
                Ok(&array.as_slice()[index])
            }
            Value::Record(record) => {
                let index = self.field_index(at, segment, record, config)?;
                Ok(record.fields()[index].value())
            }
            other => Err(Error::invalid_kind(self, at, other.kind())),
        }
    }

    fn step_mut<'a>(
        &self,
        at: usize,
        segment: &str,
        value: &'a mut Value,
        config: &Config,
    ) -> Result<&'a mut Value> {
        log::trace!("{}: part {} steps into {}", self, at, value.kind());
        match value {
            Value::Map(map) => {
                let key =
                    coerce_key(segment, map.key_kind()).map_err(|e| Error::coercion(self, at, e))?;
                map.get_mut(&key)
                    .ok_or_else(|| Error::not_found(self, at, format!("key {}", key)))
            }
            Value::List(list) => {
                let len = list.len();
                let index = self.checked_index(at, segment, len)?;
                list.get_mut(index)
                    .ok_or_else(|| Error::out_of_range(self, at, index as i64, len))
            }
            Value::Array(array) => {
                let len = array.len();
                let index = self.checked_index(at, segment, len)?;
                array
                    .get_mut(index)
                    .ok_or_else(|| Error::out_of_range(self, at, index as i64, len))
            }
            Value::Record(record) => {
                let index = self.field_index(at, segment, record, config)?;
                Ok(record.fields_mut()[index].value_mut())
            }
            other => Err(Error::invalid_kind(self, at, other.kind())),
        }
    }

    /// Unbox the value a step landed on and run the hook over it.
    fn settle<'a>(&self, at: usize, value: &'a Value, config: &Config) -> Result<&'a Value> {
        let value = value.unboxed();
        match config.hook() {
            Some(hook) => hook
                .transform(value)
                .ok_or_else(|| Error::hook_rejected(self, at, value.kind())),
            None => Ok(value),
        }
    }

    fn settle_mut<'a>(
        &self,
        at: usize,
        value: &'a mut Value,
        config: &Config,
    ) -> Result<&'a mut Value> {
        let value = value.unboxed_mut();
        match config.hook() {
            Some(hook) => {
                let kind = value.kind();
                hook.transform_mut(value)
                    .ok_or_else(|| Error::hook_rejected(self, at, kind))
            }
            None => Ok(value),
        }
    }

    fn checked_index(&self, at: usize, segment: &str, len: usize) -> Result<usize> {
        let index = coerce_index(segment).map_err(|e| Error::coercion(self, at, e))?;
        usize::try_from(index)
            .ok()
            .filter(|i| *i < len)
            .ok_or_else(|| Error::out_of_range(self, at, index, len))
    }

    fn field_index(
        &self,
        at: usize,
        segment: &str,
        record: &Record,
        config: &Config,
    ) -> Result<usize> {
        field_position(record, segment, config.tag_name())
            .map_err(|e| Error::coercion(self, at, e))?
            .ok_or_else(|| {
                Error::not_found(
                    self,
                    at,
                    format!("field {:?} in record {}", segment, record.name()),
                )
            })
    }
}

/// Read the value at `pointer` in `doc`.
///
/// ```rust
/// use structptr_core::{get, KeyKind, List, Map, Type, Value};
///
/// let bob = Map::new(KeyKind::String, Type::Any).with("name", "Bob");
/// let doc = Value::from(
///     Map::new(KeyKind::String, Type::Any)
///         .with("alice", 42)
///         .with("bob", List::new(Type::Any).with(bob)),
/// );
///
/// assert_eq!(get(&doc, "/bob/0/name").unwrap(), &Value::from("Bob"));
/// ```
pub fn get<'a>(doc: &'a Value, pointer: &str) -> Result<&'a Value> {
    Pointer::parse(pointer)?.get(doc)
}

/// Write `value` at `pointer` and return the updated document.
///
/// For the root pointer this is just `value`.
pub fn set(mut doc: Value, pointer: &str, value: Value) -> Result<Value> {
    Pointer::parse(pointer)?.set(&mut doc, value)?;
    Ok(doc)
}

/// Delete the value at `pointer` and return the updated document.
///
/// For the root pointer this is `Null`.
pub fn delete(mut doc: Value, pointer: &str) -> Result<Value> {
    Pointer::parse(pointer)?.delete(&mut doc)?;
    Ok(doc)
}
