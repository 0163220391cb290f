//! Secret values and the types that keep them out of logs.
//!
//! A [`Secret`] pairs a key with a [`SecretValue`], which is either a scalar
//! leaf or an ordered tree of nested values. Scalar strings are held in a
//! [`SecretString`] so they are zeroed on drop and redacted in `Debug` and
//! `Display` output. None of these types implement `Serialize`; use
//! [`SecretValue::expose_json`] when the raw structure is actually needed.

use indexmap::IndexMap;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::parameter_store::PATH_SEPARATOR;

const REDACTED: &str = "[REDACTED]";

/// A string wrapper that redacts its contents in Debug and Display.
///
/// The underlying memory is overwritten with zeros when the value is dropped.
/// The actual value is only reachable through [`expose_secret`](Self::expose_secret).
///
/// # Example
///
/// ```rust
/// use ssm_secrets::secrets::SecretString;
///
/// let secret = SecretString::new("my-secret-key");
/// assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
/// assert_eq!(secret.expose_secret(), "my-secret-key");
/// ```
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying secret value. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Value of a secret: a scalar leaf or an ordered tree of nested values.
///
/// Tree equality ignores entry order; iteration follows insertion order.
#[derive(Clone, PartialEq)]
pub enum SecretValue {
    String(SecretString),
    Number(serde_json::Number),
    Bool(bool),
    Tree(IndexMap<String, SecretValue>),
}

impl SecretValue {
    /// Builds a tree from `(sub-key, value)` pairs, keeping their order.
    pub fn tree<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SecretValue>,
    {
        Self::Tree(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_tree()
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }

    /// The string value, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.expose_secret()),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&IndexMap<String, SecretValue>> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Direct child of a tree.
    pub fn get(&self, segment: &str) -> Option<&SecretValue> {
        self.as_tree().and_then(|tree| tree.get(segment))
    }

    /// Walks a `/`-separated path of sub-keys, e.g. `"extra/test1"`.
    pub fn pointer(&self, path: &str) -> Option<&SecretValue> {
        path.split(PATH_SEPARATOR).try_fold(self, |node, segment| node.get(segment))
    }

    /// Renders a scalar the way it is written to a parameter store.
    ///
    /// Returns `None` for trees.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.expose_secret().to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Tree(_) => None,
        }
    }

    /// Exposes the full value as JSON. Never log the result.
    pub fn expose_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.expose_secret().to_string()),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Tree(tree) => serde_json::Value::Object(
                tree.iter().map(|(k, v)| (k.clone(), v.expose_json())).collect(),
            ),
        }
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(_) => write!(f, "String({})", REDACTED),
            Self::Number(_) => write!(f, "Number({})", REDACTED),
            Self::Bool(_) => write!(f, "Bool({})", REDACTED),
            Self::Tree(tree) => f.debug_map().entries(tree.iter()).finish(),
        }
    }
}

impl From<SecretString> for SecretValue {
    fn from(s: SecretString) -> Self {
        Self::String(s)
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<bool> for SecretValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SecretValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for SecretValue {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<IndexMap<String, SecretValue>> for SecretValue {
    fn from(tree: IndexMap<String, SecretValue>) -> Self {
        Self::Tree(tree)
    }
}

/// A keyed secret. Built fresh on every read or write, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Secret {
    key: String,
    value: SecretValue,
}

impl Secret {
    pub fn new(key: impl Into<String>, value: impl Into<SecretValue>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &SecretValue {
        &self.value
    }

    pub fn into_value(self) -> SecretValue {
        self.value
    }
}
