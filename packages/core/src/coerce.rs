//! Weak type coercion.
//!
//! Path segments are always text, and values written through a pointer are
//! whatever the caller had at hand. Both get converted into the type the
//! document declares for the slot being addressed, using a small fixed table
//! of conversions that preserve meaning. Anything outside the table is a
//! [`CoercionError`].

use crate::value::{Key, KeyKind, Record, Type, Value};

/// Tag annotation hiding a field from pointer lookup.
pub const HIDDEN_FIELD: &str = "-";

/// Characters allowed in a tag name besides identifier characters.
const TAG_PUNCTUATION: &[char] = &['-', '.', '$', '@', ':', '+'];

/// A value or segment couldn't be converted to the required type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("couldn't convert {input} to {target}")]
pub struct CoercionError {
    /// Rendering of the offending input.
    pub input: String,
    /// The type it was being converted to.
    pub target: String,
}

impl CoercionError {
    fn segment(segment: &str, target: impl ToString) -> Self {
        CoercionError {
            input: format!("{:?}", segment),
            target: target.to_string(),
        }
    }
}

/// Convert `value` into something storable in a slot of type `target`.
///
/// Values that already conform are returned unchanged (minus any `Boxed`
/// indirection, unless the target is [`Type::Any`]). Scalars convert along
/// the weak table:
///
/// | target   | accepted                                                    |
/// |----------|-------------------------------------------------------------|
/// | `bool`   | `1 t T TRUE true True 0 f F FALSE false False`              |
/// | `int`    | in-range `uint`, integral in-range `float`, decimal string  |
/// | `uint`   | non-negative `int`, integral in-range `float`, decimal string |
/// | `float`  | `int`, `uint`, numeric string                               |
/// | `string` | `bool`, `int`, `uint`, `float`, UTF-8 `bytes`               |
/// | `bytes`  | `string`                                                    |
///
/// Containers and records never convert; they must already conform.
pub fn coerce(value: Value, target: &Type) -> Result<Value, CoercionError> {
    if matches!(target, Type::Any) {
        return Ok(value);
    }

    let value = value.into_unboxed();
    if value.conforms_to(target) {
        return Ok(value);
    }

    weak(&value, target).ok_or_else(|| CoercionError {
        input: value.to_string(),
        target: target.to_string(),
    })
}

fn weak(value: &Value, target: &Type) -> Option<Value> {
    match (value, target) {
        (Value::String(s), Type::Bool) => parse_bool(s).map(Value::Bool),

        (Value::Uint(u), Type::Int) => i64::try_from(*u).ok().map(Value::Int),
        (Value::Float(x), Type::Int) => float_to_i64(*x).map(Value::Int),
        (Value::String(s), Type::Int) => s.parse().ok().map(Value::Int),

        (Value::Int(i), Type::Uint) => u64::try_from(*i).ok().map(Value::Uint),
        (Value::Float(x), Type::Uint) => float_to_u64(*x).map(Value::Uint),
        (Value::String(s), Type::Uint) => s.parse().ok().map(Value::Uint),

        (Value::Int(i), Type::Float) => Some(Value::Float(*i as f64)),
        (Value::Uint(u), Type::Float) => Some(Value::Float(*u as f64)),
        (Value::String(s), Type::Float) => s.parse().ok().map(Value::Float),

        (Value::Bool(b), Type::String) => Some(Value::String(b.to_string())),
        (Value::Int(i), Type::String) => Some(Value::String(i.to_string())),
        (Value::Uint(u), Type::String) => Some(Value::String(u.to_string())),
        (Value::Float(x), Type::String) => Some(Value::String(x.to_string())),
        (Value::Bytes(b), Type::String) => std::str::from_utf8(b)
            .ok()
            .map(|s| Value::String(s.to_string())),

        (Value::String(s), Type::Bytes) => Some(Value::Bytes(s.as_bytes().to_vec())),

        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// i64::MAX and u64::MAX round up when converted to f64, hence the strict
// upper bounds.
fn float_to_i64(x: f64) -> Option<i64> {
    (x.is_finite() && x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64)
        .then_some(x as i64)
}

fn float_to_u64(x: f64) -> Option<u64> {
    (x.is_finite() && x.fract() == 0.0 && x >= 0.0 && x < u64::MAX as f64).then_some(x as u64)
}

/// Convert a path segment into a map key of the given kind.
pub fn coerce_key(segment: &str, kind: KeyKind) -> Result<Key, CoercionError> {
    let key = match kind {
        KeyKind::String => Some(Key::String(segment.to_string())),
        KeyKind::Int => segment.parse().ok().map(Key::Int),
        KeyKind::Uint => segment.parse().ok().map(Key::Uint),
        KeyKind::Bool => parse_bool(segment).map(Key::Bool),
    };
    key.ok_or_else(|| CoercionError::segment(segment, kind))
}

/// Convert a path segment into a sequence index.
///
/// Negative numbers convert fine here; bounds are checked by the caller so
/// they surface as out-of-range rather than coercion failures.
pub fn coerce_index(segment: &str) -> Result<i64, CoercionError> {
    segment
        .parse()
        .map_err(|_| CoercionError::segment(segment, "index"))
}

/// Find the position of the field a segment names.
///
/// A field answers to the name in its `tag_name` annotation when it has one,
/// and to its declared name otherwise. Only the text before the first `,` of
/// an annotation counts; an empty name falls back to the declared name. The
/// annotation `-` hides the field entirely. Fields are scanned in order and
/// the first match wins, so a malformed annotation on a field scanned before
/// the match is an error.
pub fn field_position(
    record: &Record,
    segment: &str,
    tag_name: &str,
) -> Result<Option<usize>, CoercionError> {
    for (i, field) in record.fields().iter().enumerate() {
        let name = match field.tag_value(tag_name) {
            None => field.name(),
            Some(HIDDEN_FIELD) => continue,
            Some(tag) => {
                let token = tag.split_once(',').map_or(tag, |(name, _)| name);
                if token.is_empty() {
                    field.name()
                } else if is_valid_tag_name(token) {
                    token
                } else {
                    return Err(CoercionError {
                        input: format!("{:?}", tag),
                        target: format!("field name for {}.{}", record.name(), field.name()),
                    });
                }
            }
        };

        if name == segment {
            return Ok(Some(i));
        }
    }

    Ok(None)
}

fn is_valid_tag_name(name: &str) -> bool {
    name.chars()
        .all(|c| unicode_ident::is_xid_continue(c) || TAG_PUNCTUATION.contains(&c))
}
