//! Pointer type: an RFC 6901 style path into a document.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A pointer to a value nested inside a document.
///
/// A pointer is an ordered list of segments. Segments are stored unescaped:
/// the text `/a~1b` parses to the single segment `a/b`. The empty pointer
/// refers to the whole document.
///
/// Pointers compare segment by segment, so the root sorts before everything
/// and a pointer sorts directly before the pointers it is a prefix of.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// The root pointer.
    pub fn root() -> Self {
        Pointer::default()
    }

    /// Parse pointer text.
    ///
    /// # Syntax
    ///
    /// - The empty string is the root pointer
    /// - Anything else must start with `/`; segments are separated by `/`
    /// - `~1` decodes to `/` and `~0` to `~`, in that order
    /// - A trailing `/` yields a final empty segment
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structptr_core::Pointer;
    ///
    /// let p = Pointer::parse("/foo/a~1b").unwrap();
    /// assert_eq!(p.segments(), ["foo", "a/b"]);
    /// assert!(Pointer::parse("foo").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Ok(Pointer::root());
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Err(Error::parse(input, "first char must be '/'"));
        };

        Ok(Pointer {
            segments: rest.split('/').map(unescape).collect(),
        })
    }

    /// Build a pointer from already-unescaped segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Pointer {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Same as [`Pointer::is_root`].
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.segments.iter()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The pointer one level up. The parent of the root is the root.
    #[must_use]
    pub fn parent(&self) -> Pointer {
        match self.segments.split_last() {
            Some((_, init)) => Pointer {
                segments: init.to_vec(),
            },
            None => Pointer::root(),
        }
    }

    /// A new pointer with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Pointer {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Pointer { segments }
    }

    /// Join this pointer with another.
    #[must_use]
    pub fn join(&self, other: &Pointer) -> Pointer {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Pointer { segments }
    }

    /// Check if this pointer starts with `prefix`.
    pub fn has_prefix(&self, prefix: &Pointer) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

fn unescape(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace("~1", "/").replace("~0", "~")
}

fn escape(segment: &str) -> Cow<'_, str> {
    if !segment.contains(['~', '/']) {
        return Cow::Borrowed(segment);
    }
    Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape(segment))?;
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pointer::parse(s)
    }
}

impl std::ops::Index<usize> for Pointer {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.segments[i]
    }
}

impl Serialize for Pointer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Pointer, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;

        Pointer::parse(&s).map_err(D::Error::custom)
    }
}

/// Sort pointers into application order: root first, then segment by
/// segment, with every pointer directly before the pointers it prefixes.
pub fn sort_pointers(pointers: &mut [Pointer]) {
    pointers.sort();
}

/// Order pointers so they can be deleted one after another.
///
/// Later siblings come before earlier ones and descendants before their
/// ancestors, so no deletion shifts the target of a pointer still to come.
/// Segments that are both decimal indices compare by value, which keeps
/// `/xs/10` ahead of `/xs/2`. Pointers naming the same target (`/xs/1` and
/// `/xs/01`) are collapsed to one.
pub fn sort_for_removal(pointers: &mut Vec<Pointer>) {
    pointers.sort_by(|a, b| removal_cmp(b, a));
    pointers.dedup_by(|a, b| removal_cmp(a, b) == Ordering::Equal);
}

fn removal_cmp(a: &Pointer, b: &Pointer) -> Ordering {
    for (x, y) in a.segments.iter().zip(&b.segments) {
        let order = match (x.parse::<usize>(), y.parse::<usize>()) {
            (Ok(i), Ok(j)) => i.cmp(&j),
            _ => x.cmp(y),
        };
        if order != Ordering::Equal {
            return order;
        }
    }
    a.len().cmp(&b.len())
}

/// Macro for creating pointers from literals.
///
/// # Example
///
/// ```rust
/// use structptr_core::pointer;
///
/// let p = pointer!("/users/0/name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! pointer {
    ($s:expr) => {
        $crate::Pointer::parse($s).expect("invalid pointer literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn segments(input: &str) -> Vec<String> {
        Pointer::parse(input).unwrap().segments().to_vec()
    }

    #[test]
    fn parse_empty_is_root() {
        let p = Pointer::parse("").unwrap();
        assert!(p.is_root());
        assert_eq!(p.len(), 0);
    }

    #[test]
    fn parse_relative_is_rejected() {
        let err = Pointer::parse("foo").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.pointer(), "foo");
    }

    #[test]
    fn parse_basic() {
        assert_eq!(segments("/foo/bar"), ["foo", "bar"]);
        assert_eq!(segments("/foo/bar/baz"), ["foo", "bar", "baz"]);
    }

    #[test]
    fn parse_escapes() {
        assert_eq!(segments("/foo/a~1b"), ["foo", "a/b"]);
        assert_eq!(segments("/foo/a~0b"), ["foo", "a~b"]);
        assert_eq!(segments("/foo/a~01b"), ["foo", "a~1b"]);
    }

    #[test]
    fn parse_empty_segments() {
        assert_eq!(segments("/"), [""]);
        assert_eq!(segments("/foo/"), ["foo", ""]);
        assert_eq!(segments("//"), ["", ""]);
    }

    #[test]
    fn display_round_trips() {
        for input in ["", "/", "/foo", "/foo/bar", "/a~1b/c~0d", "/foo/a~01b", "/foo/", "/-"] {
            assert_eq!(Pointer::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn display_escapes_tilde_before_slash() {
        let p = Pointer::from_segments(["~1", "a/b~"]);
        assert_eq!(p.to_string(), "/~01/a~1b~0");
        assert_eq!(Pointer::parse(&p.to_string()).unwrap(), p);
    }

    #[test]
    fn parent() {
        assert_eq!(pointer!("/foo/bar").parent(), pointer!("/foo"));
        assert_eq!(pointer!("/foo").parent(), Pointer::root());
        assert!(Pointer::root().parent().is_root());
    }

    #[test]
    fn child_does_not_mutate() {
        let p = pointer!("/foo");
        let c = p.child("bar");
        assert_eq!(p.to_string(), "/foo");
        assert_eq!(c.to_string(), "/foo/bar");
        assert_eq!(c.last(), Some("bar"));
    }

    #[test]
    fn join_and_prefix() {
        let joined = pointer!("/a").join(&pointer!("/b/c"));
        assert_eq!(joined, pointer!("/a/b/c"));
        assert!(joined.has_prefix(&pointer!("/a/b")));
        assert!(joined.has_prefix(&Pointer::root()));
        assert!(!joined.has_prefix(&pointer!("/b")));
    }

    #[test]
    fn index_trait() {
        let p = pointer!("/foo/bar");
        assert_eq!(&p[0], "foo");
        assert_eq!(&p[1], "bar");
    }

    #[test]
    fn from_str_parses() {
        let p: Pointer = "/x/0".parse().unwrap();
        assert_eq!(p.segments(), ["x", "0"]);
    }

    #[test]
    fn sort_root_first() {
        let mut ps = vec![pointer!("/foo"), pointer!("")];
        sort_pointers(&mut ps);
        assert_eq!(ps, [pointer!(""), pointer!("/foo")]);
    }

    #[test]
    fn sort_prefix_before_descendant() {
        let mut ps = vec![pointer!("/foo"), pointer!(""), pointer!("/foo/0")];
        sort_pointers(&mut ps);
        let out: Vec<String> = ps.iter().map(ToString::to_string).collect();
        assert_eq!(out, ["", "/foo", "/foo/0"]);
    }

    #[test]
    fn sort_lexicographic_by_segment() {
        let mut ps = vec![pointer!("/foo"), pointer!(""), pointer!("/bar/0")];
        sort_pointers(&mut ps);
        let out: Vec<String> = ps.iter().map(ToString::to_string).collect();
        assert_eq!(out, ["", "/bar/0", "/foo"]);
    }

    #[test]
    fn removal_order_compares_indices_by_value() {
        let mut ps = vec![pointer!("/xs/2"), pointer!("/xs/10"), pointer!("/xs/9")];
        sort_for_removal(&mut ps);
        let out: Vec<String> = ps.iter().map(ToString::to_string).collect();
        assert_eq!(out, ["/xs/10", "/xs/9", "/xs/2"]);
    }

    #[test]
    fn removal_order_puts_descendants_first() {
        let mut ps = vec![pointer!("/a"), pointer!("/a/b/0"), pointer!("/b"), pointer!("/a/b")];
        sort_for_removal(&mut ps);
        let out: Vec<String> = ps.iter().map(ToString::to_string).collect();
        assert_eq!(out, ["/b", "/a/b/0", "/a/b", "/a"]);
    }

    #[test]
    fn removal_order_collapses_same_target() {
        let mut ps = vec![
            pointer!("/xs/1"),
            pointer!("/xs/3"),
            pointer!("/xs/01"),
            pointer!("/xs/1"),
        ];
        sort_for_removal(&mut ps);
        assert_eq!(ps.len(), 2);
        assert_eq!(ps[0], pointer!("/xs/3"));
        assert_eq!(ps[1].last(), Some("1"));
    }

    #[test]
    fn serde_uses_pointer_text() {
        let p = pointer!("/a~1b/0");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#""/a~1b/0""#);
        let back: Pointer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Pointer>(r#""nope""#).is_err());
    }

    #[test]
    #[should_panic(expected = "invalid pointer literal")]
    fn macro_panics_on_bad_literal() {
        pointer!("relative");
    }
}
