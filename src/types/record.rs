use std::collections::HashMap;

/// Description of one candidate resource, handed to [`RuleSet::exec`](super::RuleSet::exec).
///
/// Attributes are strings, optionally nested: `"descriptionData.type"` lives
/// under `descriptionData`. The engine only reads attributes named by the
/// compiled rule conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    data: HashMap<String, RecordValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RecordValue {
    Leaf(String),
    Nested(HashMap<String, RecordValue>),
}

impl InputRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dot-separated path. Creates intermediate maps as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<String>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a value at a dot-separated path (mutable reference version).
    pub fn insert(&mut self, path: &str, value: String) {
        let segments: Vec<&str> = path.split('.').collect();
        self.insert_path(&segments, value);
    }

    /// Insert a value at an explicit segment path; segments may contain dots.
    /// A leaf standing where a map is needed is replaced by one.
    pub fn insert_path<S: AsRef<str>>(&mut self, segments: &[S], value: String) {
        let Some((last, init)) = segments.split_last() else {
            return;
        };
        let mut map = &mut self.data;
        for segment in init {
            let slot = map
                .entry(segment.as_ref().to_owned())
                .or_insert_with(|| RecordValue::Nested(HashMap::new()));
            if matches!(*slot, RecordValue::Leaf(_)) {
                *slot = RecordValue::Nested(HashMap::new());
            }
            map = match slot {
                RecordValue::Nested(nested) => nested,
                RecordValue::Leaf(_) => return,
            };
        }
        map.insert(last.as_ref().to_owned(), RecordValue::Leaf(value));
    }

    /// Look up a value by dot-separated path.
    /// Returns `None` if the path does not exist or points to a nested map.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        let segments: Vec<&str> = path.split('.').collect();
        self.get_path(&segments)
    }

    /// Look up a value by explicit segments.
    #[must_use]
    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&str> {
        let mut map = &self.data;
        let (last, init) = segments.split_last()?;
        for segment in init {
            match map.get(segment.as_ref())? {
                RecordValue::Nested(nested) => map = nested,
                RecordValue::Leaf(_) => return None,
            }
        }
        match map.get(last.as_ref())? {
            RecordValue::Leaf(v) => Some(v),
            RecordValue::Nested(_) => None,
        }
    }

    /// Whether no attribute has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
