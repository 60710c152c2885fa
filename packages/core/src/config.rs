//! Per-call traversal configuration.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Tag name consulted for record field names when none is configured.
pub const DEFAULT_TAG_NAME: &str = "pointer";

/// A substitution applied to every value traversal steps onto.
///
/// The hook runs exactly once per segment boundary, after `Boxed`
/// indirection has been stripped and before the next segment is dispatched
/// on the value's kind. It never sees the document passed in at the root.
/// Returning `None` fails the traversal with an invalid-kind error.
///
/// Both methods must agree: `transform_mut` is used on the paths that
/// mutate, `transform` on the ones that read.
pub trait ValueHook: Send + Sync {
    fn transform<'a>(&self, value: &'a Value) -> Option<&'a Value>;

    fn transform_mut<'a>(&self, value: &'a mut Value) -> Option<&'a mut Value>;
}

/// Replaces records of one name with the value of one of their fields.
///
/// This is the usual way to make wrapper records (optional values, typed
/// handles) transparent to pointers. A matching record without the field
/// yields nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldUnwrap {
    record: String,
    field: String,
}

impl FieldUnwrap {
    pub fn new(record: impl Into<String>, field: impl Into<String>) -> Self {
        FieldUnwrap {
            record: record.into(),
            field: field.into(),
        }
    }
}

impl ValueHook for FieldUnwrap {
    fn transform<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match value {
            Value::Record(r) if r.name() == self.record => r.get(&self.field).map(|f| f.value()),
            other => Some(other),
        }
    }

    fn transform_mut<'a>(&self, value: &'a mut Value) -> Option<&'a mut Value> {
        if !matches!(&*value, Value::Record(r) if r.name() == self.record) {
            return Some(value);
        }
        match value {
            Value::Record(r) => r.get_mut(&self.field).map(|f| f.value_mut()),
            _ => unreachable!(),
        }
    }
}

/// Options for one traversal.
#[derive(Clone)]
pub struct Config {
    tag_name: Cow<'static, str>,
    hook: Option<Arc<dyn ValueHook>>,
}

impl Config {
    pub fn new() -> Self {
        Config {
            tag_name: Cow::Borrowed(DEFAULT_TAG_NAME),
            hook: None,
        }
    }

    /// Honor field annotations under `tag_name` instead of `pointer`.
    #[must_use]
    pub fn with_tag_name(mut self, tag_name: impl Into<Cow<'static, str>>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    #[must_use]
    pub fn with_hook(mut self, hook: impl ValueHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn hook(&self) -> Option<&dyn ValueHook> {
        self.hook.as_deref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tag_name", &self.tag_name)
            .field("hook", &self.hook.as_ref().map(|_| "<hook>"))
            .finish()
    }
}
