use std::collections::HashMap;

use super::raw::RawValue;

/// Named configuration values captured during compilation.
///
/// Handlers write here (e.g. loader options registered under an ident) so the
/// caller can resolve them later. Once compilation finishes the registry is
/// only reachable through `&RuleSet`, so it is read-only from then on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceRegistry {
    values: HashMap<String, RawValue>,
}

impl ReferenceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a value under `name`, replacing any earlier one.
    pub fn insert(&mut self, name: &str, value: RawValue) {
        self.values.insert(name.to_owned(), value);
    }

    /// Look up a captured value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all (name, value) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
