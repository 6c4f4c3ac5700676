use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::error::{EffectError, PredicateError};
use super::record::InputRecord;

type PredicateFn = dyn Fn(&str) -> Result<bool, PredicateError> + Send + Sync;
type CallbackFn = dyn Fn(&InputRecord) -> Result<RawValue, EffectError> + Send + Sync;

/// A user-supplied string test, usable as a condition.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new(f: impl Fn(&str) -> Result<bool, PredicateError> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Wrap a predicate that cannot fail.
    pub fn infallible(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(move |v: &str| Ok(f(v))))
    }

    /// Invoke the predicate.
    ///
    /// # Errors
    ///
    /// Returns whatever [`PredicateError`] the wrapped function raises.
    pub fn call(&self, value: &str) -> Result<bool, PredicateError> {
        (self.0)(value)
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A user-supplied function of the input record, evaluated at classification
/// time. Used for record-dependent loader lists.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    pub fn new(
        f: impl Fn(&InputRecord) -> Result<RawValue, EffectError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    ///
    /// # Errors
    ///
    /// Returns whatever [`EffectError`] the wrapped function raises.
    pub fn call(&self, record: &InputRecord) -> Result<RawValue, EffectError> {
        (self.0)(record)
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// A user-authored configuration value, before compilation.
#[derive(Debug, Clone)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A regular expression; matches anywhere unless anchored.
    Pattern(Regex),
    Predicate(Predicate),
    Callback(Callback),
    List(Vec<RawValue>),
    Object(RawObject),
}

impl RawValue {
    /// Truthiness as understood by rule configuration: `null`, `false`, zero,
    /// `NaN` and the empty string are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Bool(b) => *b,
            RawValue::Int(i) => *i != 0,
            RawValue::Float(f) => *f != 0.0 && !f.is_nan(),
            RawValue::String(s) => !s.is_empty(),
            RawValue::Pattern(_)
            | RawValue::Predicate(_)
            | RawValue::Callback(_)
            | RawValue::List(_)
            | RawValue::Object(_) => true,
        }
    }

    /// Short type name used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Int(_) | RawValue::Float(_) => "number",
            RawValue::String(_) => "string",
            RawValue::Pattern(_) => "pattern",
            RawValue::Predicate(_) | RawValue::Callback(_) => "function",
            RawValue::List(_) => "array",
            RawValue::Object(_) => "object",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&RawObject> {
        match self {
            RawValue::Object(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// Build a pattern value from regex source.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the source is not a valid expression.
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(RawValue::Pattern)
    }

    /// Build an infallible predicate value.
    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        RawValue::Predicate(Predicate::infallible(f))
    }

    /// Build a callback value.
    pub fn callback(
        f: impl Fn(&InputRecord) -> Result<RawValue, EffectError> + Send + Sync + 'static,
    ) -> Self {
        RawValue::Callback(Callback::new(f))
    }
}

impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RawValue::Null, RawValue::Null) => true,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Int(a), RawValue::Int(b)) => a == b,
            (RawValue::Float(a), RawValue::Float(b)) => a == b,
            (RawValue::String(a), RawValue::String(b)) => a == b,
            (RawValue::Pattern(a), RawValue::Pattern(b)) => a.as_str() == b.as_str(),
            (RawValue::Predicate(a), RawValue::Predicate(b)) => a.ptr_eq(b),
            (RawValue::Callback(a), RawValue::Callback(b)) => a.ptr_eq(b),
            (RawValue::List(a), RawValue::List(b)) => a == b,
            (RawValue::Object(a), RawValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::String(v.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::String(v)
    }
}

impl From<Regex> for RawValue {
    fn from(v: Regex) -> Self {
        RawValue::Pattern(v)
    }
}

impl From<Predicate> for RawValue {
    fn from(v: Predicate) -> Self {
        RawValue::Predicate(v)
    }
}

impl From<Callback> for RawValue {
    fn from(v: Callback) -> Self {
        RawValue::Callback(v)
    }
}

impl From<RawObject> for RawValue {
    fn from(v: RawObject) -> Self {
        RawValue::Object(v)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(v: Vec<T>) -> Self {
        RawValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(v) => write!(f, "{v}"),
            RawValue::Int(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::String(v) => write!(f, "{v:?}"),
            RawValue::Pattern(re) => write!(f, "/{}/", re.as_str()),
            RawValue::Predicate(_) | RawValue::Callback(_) => write!(f, "[function]"),
            RawValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            RawValue::Object(obj) => write!(f, "{obj}"),
        }
    }
}

/// Insertion-ordered string-keyed map of raw values.
///
/// Order is observable: handlers see keys in the order they were written, and
/// leftover-key diagnostics list them the same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObject {
    entries: Vec<(String, RawValue)>,
}

impl RawObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Insert a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: &str, value: RawValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key.to_owned(), value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut obj = RawObject::new();
        for (k, v) in iter {
            let key: String = k.into();
            obj.insert(&key, v.into());
        }
        obj
    }
}

impl fmt::Display for RawObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k:?}: {v}")?;
        }
        write!(f, "}}")
    }
}
