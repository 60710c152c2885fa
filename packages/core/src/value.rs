//! The Value type - the generic document a pointer is resolved against.
//!
//! A document is a dynamically-typed tree. Unlike a plain JSON tree, every
//! container here remembers the type it was declared with: maps know their
//! key kind and value type, sequences know their element type, and records
//! carry a typed, annotated field list. Traversal uses these declarations to
//! coerce path segments and written values into the shape the document
//! expects.

use std::collections::BTreeMap;
use std::fmt;

/// The kind of a concrete value, as observed during traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Bytes,
    Map,
    List,
    Array,
    Record,
    Boxed,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Map => "map",
            Kind::List => "list",
            Kind::Array => "array",
            Kind::Record => "record",
            Kind::Boxed => "boxed",
        };
        f.write_str(name)
    }
}

/// The kinds a map key can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Bool,
    Int,
    Uint,
    String,
}

impl KeyKind {
    /// The value type a segment must be coerced into to form a key of this kind.
    pub fn as_type(self) -> Type {
        match self {
            KeyKind::Bool => Type::Bool,
            KeyKind::Int => Type::Int,
            KeyKind::Uint => Type::Uint,
            KeyKind::String => Type::String,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_type())
    }
}

/// A map key.
///
/// Keys are ordered so maps iterate deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(String),
}

impl Key {
    pub fn kind(&self) -> KeyKind {
        match self {
            Key::Bool(_) => KeyKind::Bool,
            Key::Int(_) => KeyKind::Int,
            Key::Uint(_) => KeyKind::Uint,
            Key::String(_) => KeyKind::String,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::Uint(u) => write!(f, "{}", u),
            Key::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Key {
    fn from(v: bool) -> Self {
        Key::Bool(v)
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Int(v as i64)
    }
}

impl From<u64> for Key {
    fn from(v: u64) -> Self {
        Key::Uint(v)
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::String(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::String(v.to_string())
    }
}

/// A declared type: what a container slot is allowed to hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Anything at all; values are stored unchanged.
    Any,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Bytes,
    Map { key: KeyKind, value: Box<Type> },
    List(Box<Type>),
    Array(Box<Type>, usize),
    /// A record with the given name.
    Record(String),
}

impl Type {
    pub fn map(key: KeyKind, value: Type) -> Self {
        Type::Map {
            key,
            value: Box::new(value),
        }
    }

    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    pub fn array(elem: Type, len: usize) -> Self {
        Type::Array(Box::new(elem), len)
    }

    pub fn record(name: impl Into<String>) -> Self {
        Type::Record(name.into())
    }

    /// Whether a slot of this type accepts a container declared as `declared`.
    pub fn accepts(&self, declared: &Type) -> bool {
        matches!(self, Type::Any) || self == declared
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => f.write_str("any"),
            Type::Bool => f.write_str("bool"),
            Type::Int => f.write_str("int"),
            Type::Uint => f.write_str("uint"),
            Type::Float => f.write_str("float"),
            Type::String => f.write_str("string"),
            Type::Bytes => f.write_str("bytes"),
            Type::Map { key, value } => write!(f, "map[{}]{}", key, value),
            Type::List(elem) => write!(f, "list[{}]", elem),
            Type::Array(elem, len) => write!(f, "array[{}; {}]", elem, len),
            Type::Record(name) => write!(f, "record {}", name),
        }
    }
}

/// A keyed container.
///
/// Maps only accept writes to keys they already hold unless built with
/// [`Map::open`].
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    key: KeyKind,
    value: Type,
    open: bool,
    entries: BTreeMap<Key, Value>,
}

impl Map {
    pub fn new(key: KeyKind, value: Type) -> Self {
        Map {
            key,
            value,
            open: false,
            entries: BTreeMap::new(),
        }
    }

    /// Allow writes to create keys that don't exist yet.
    #[must_use]
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn key_kind(&self) -> KeyKind {
        self.key
    }

    pub fn value_type(&self) -> &Type {
        &self.value
    }

    /// The type this map was declared with.
    pub fn declared_type(&self) -> Type {
        Type::map(self.key, self.value.clone())
    }

    /// Insert without coercion. The caller is responsible for using keys of
    /// the declared kind; keys of another kind are unreachable by pointer.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }
}

impl IntoIterator for Map {
    type Item = (Key, Value);
    type IntoIter = std::collections::btree_map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A growable indexed sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct List {
    elem: Type,
    items: Vec<Value>,
}

impl List {
    pub fn new(elem: Type) -> Self {
        List {
            elem,
            items: Vec::new(),
        }
    }

    pub fn from_items(elem: Type, items: Vec<Value>) -> Self {
        List { elem, items }
    }

    /// Builder-style push.
    #[must_use]
    pub fn with(mut self, item: impl Into<Value>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn elem_type(&self) -> &Type {
        &self.elem
    }

    pub fn declared_type(&self) -> Type {
        Type::list(self.elem.clone())
    }

    pub fn push(&mut self, item: impl Into<Value>) {
        self.items.push(item.into());
    }

    /// Ordered removal; later elements shift down by one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, like [`Vec::remove`].
    pub fn remove(&mut self, index: usize) -> Value {
        self.items.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

/// A fixed-length indexed sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    elem: Type,
    items: Box<[Value]>,
}

impl Array {
    pub fn new(elem: Type, items: Vec<Value>) -> Self {
        Array {
            elem,
            items: items.into_boxed_slice(),
        }
    }

    pub fn elem_type(&self) -> &Type {
        &self.elem
    }

    pub fn declared_type(&self) -> Type {
        Type::array(self.elem.clone(), self.items.len())
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items.into_vec()
    }
}

/// One named, typed field of a [`Record`].
///
/// Tags are free-form annotations keyed by tag name, e.g. `pointer` →
/// `"display-name,omitempty"`. Traversal consults the tag selected by its
/// configuration to decide which name the field answers to.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    ty: Type,
    tags: BTreeMap<String, String>,
    value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type, value: impl Into<Value>) -> Self {
        Field {
            name: name.into(),
            ty,
            tags: BTreeMap::new(),
            value: value.into(),
        }
    }

    /// Attach an annotation under `tag_name`.
    #[must_use]
    pub fn tag(mut self, tag_name: impl Into<String>, tag_value: impl Into<String>) -> Self {
        self.tags.insert(tag_name.into(), tag_value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn tag_value(&self, tag_name: &str) -> Option<&str> {
        self.tags.get(tag_name).map(String::as_str)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Split into declared name and value.
    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}

/// A value with a fixed, ordered set of named fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    name: String,
    fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field declaration.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Mutable access to the fields. The field set itself can't change.
    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    /// Look up a field by its declared name, ignoring tags.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// A generic document node.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Map(Map),
    List(List),
    Array(Array),
    Record(Record),
    /// A value of unknown static type behind one layer of indirection.
    Boxed(Box<Value>),
}

impl Value {
    pub fn boxed(inner: impl Into<Value>) -> Self {
        Value::Boxed(Box::new(inner.into()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Bytes(_) => Kind::Bytes,
            Value::Map(_) => Kind::Map,
            Value::List(_) => Kind::List,
            Value::Array(_) => Kind::Array,
            Value::Record(_) => Kind::Record,
            Value::Boxed(_) => Kind::Boxed,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Strip every layer of `Boxed` indirection.
    pub fn unboxed(&self) -> &Value {
        match self {
            Value::Boxed(inner) => inner.unboxed(),
            other => other,
        }
    }

    pub fn unboxed_mut(&mut self) -> &mut Value {
        match self {
            Value::Boxed(inner) => inner.unboxed_mut(),
            other => other,
        }
    }

    pub fn into_unboxed(self) -> Value {
        match self {
            Value::Boxed(inner) => (*inner).into_unboxed(),
            other => other,
        }
    }

    /// Whether this value can be stored as-is in a slot of type `ty`.
    pub fn conforms_to(&self, ty: &Type) -> bool {
        match (self.unboxed(), ty) {
            (_, Type::Any) => true,
            (Value::Bool(_), Type::Bool)
            | (Value::Int(_), Type::Int)
            | (Value::Uint(_), Type::Uint)
            | (Value::Float(_), Type::Float)
            | (Value::String(_), Type::String)
            | (Value::Bytes(_), Type::Bytes) => true,
            (Value::Map(m), Type::Map { key, value }) => {
                m.key_kind() == *key && value.accepts(m.value_type())
            }
            (Value::List(l), Type::List(elem)) => elem.accepts(l.elem_type()),
            (Value::Array(a), Type::Array(elem, len)) => {
                a.len() == *len && elem.accepts(a.elem_type())
            }
            (Value::Record(r), Type::Record(name)) => r.name() == name,
            _ => false,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self.unboxed() {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self.unboxed() {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self.unboxed() {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.unboxed() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.unboxed() {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::List(l) => write_seq(f, l.as_slice()),
            Value::Array(a) => write_seq(f, a.as_slice()),
            Value::Record(r) => {
                write!(f, "{} {{", r.name())?;
                for (i, field) in r.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", field.name(), field.value())?;
                }
                f.write_str(" }")
            }
            Value::Boxed(inner) => write!(f, "{}", inner),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Value::List(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(List::from_items(
            Type::Any,
            v.into_iter().map(Into::into).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_iteration_keeps_key_order() {
        let map = Map::new(KeyKind::Int, Type::String).with(10, "b").with(2, "a");
        let entries: Vec<(Key, Value)> = map.into_iter().collect();
        assert_eq!(
            entries,
            [(Key::Int(2), Value::from("a")), (Key::Int(10), Value::from("b"))]
        );

        let array = Array::new(Type::Int, vec![Value::from(1), Value::from(2)]);
        assert_eq!(array.into_items(), [Value::Int(1), Value::Int(2)]);

        let record = Record::new("P").field(Field::new("X", Type::Int, 1).tag("pointer", "x"));
        let parts: Vec<_> = record.into_fields().into_iter().map(Field::into_parts).collect();
        assert_eq!(parts, [("X".to_string(), Value::Int(1))]);
    }

    #[test]
    fn unboxed_strips_every_layer() {
        let v = Value::boxed(Value::boxed(Value::from(42)));
        assert_eq!(v.kind(), Kind::Boxed);
        assert_eq!(v.unboxed(), &Value::Int(42));
        assert_eq!(v.into_unboxed(), Value::Int(42));
    }

    #[test]
    fn scalars_conform_to_their_own_type() {
        assert!(Value::from(1).conforms_to(&Type::Int));
        assert!(Value::from("a").conforms_to(&Type::String));
        assert!(Value::Null.conforms_to(&Type::Any));
        assert!(!Value::Null.conforms_to(&Type::String));
        assert!(!Value::from(1).conforms_to(&Type::Uint));
    }

    #[test]
    fn containers_conform_by_declaration() {
        let m = Value::from(Map::new(KeyKind::String, Type::Int));
        assert!(m.conforms_to(&Type::map(KeyKind::String, Type::Int)));
        assert!(m.conforms_to(&Type::map(KeyKind::String, Type::Any)));
        assert!(!m.conforms_to(&Type::map(KeyKind::Int, Type::Int)));

        let a = Value::from(Array::new(Type::Int, vec![Value::from(1), Value::from(2)]));
        assert!(a.conforms_to(&Type::array(Type::Int, 2)));
        assert!(!a.conforms_to(&Type::array(Type::Int, 3)));

        let r = Value::from(Record::new("User"));
        assert!(r.conforms_to(&Type::record("User")));
        assert!(!r.conforms_to(&Type::record("Group")));
    }

    #[test]
    fn boxed_values_conform_through_the_box() {
        let v = Value::boxed(List::new(Type::String));
        assert!(v.conforms_to(&Type::list(Type::String)));
    }

    #[test]
    fn map_builder_and_lookup() {
        let m = Map::new(KeyKind::Int, Type::Any).with(42, "baz");
        assert_eq!(m.get(&Key::Int(42)), Some(&Value::from("baz")));
        assert!(!m.is_open());
        assert!(m.clone().open().is_open());
    }

    #[test]
    fn record_get_by_declared_name() {
        let r = Record::new("User")
            .field(Field::new("Name", Type::String, "alice").tag("pointer", "name"));
        assert_eq!(r.get("Name").map(Field::value), Some(&Value::from("alice")));
        assert_eq!(r.get("Name").and_then(|f| f.tag_value("pointer")), Some("name"));
        assert!(r.get("name").is_none());
    }

    #[test]
    fn vec_converts_to_untyped_list() {
        let v = Value::from(vec![1, 2, 3]);
        let list = v.as_list().unwrap();
        assert_eq!(list.elem_type(), &Type::Any);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn display_renders_nested_values() {
        let v = Value::from(
            Map::new(KeyKind::String, Type::Any).with("foo", vec![Value::from(1), Value::Null]),
        );
        assert_eq!(v.to_string(), r#"{"foo": [1, null]}"#);

        let r = Value::from(Record::new("P").field(Field::new("X", Type::Int, 3)));
        assert_eq!(r.to_string(), "P { X: 3 }");
    }

    #[test]
    fn type_display() {
        assert_eq!(Type::map(KeyKind::String, Type::Any).to_string(), "map[string]any");
        assert_eq!(Type::list(Type::Int).to_string(), "list[int]");
        assert_eq!(Type::array(Type::Float, 3).to_string(), "array[float; 3]");
        assert_eq!(Type::record("User").to_string(), "record User");
    }
}
