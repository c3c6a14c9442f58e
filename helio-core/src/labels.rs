//! Minimal label selectors for filtering cached objects.
use std::{collections::BTreeMap, fmt};

/// An equality-based label selector
///
/// The empty selector matches everything. Non-empty selectors require every
/// listed `key=value` pair to be present on an object's labels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector(Vec<(String, String)>);

impl Selector {
    /// A selector matching every object
    pub fn everything() -> Self {
        Self::default()
    }

    /// Add an equality requirement to the selector
    #[must_use]
    pub fn eq(mut self, key: &str, value: &str) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Whether this selector matches everything
    pub fn is_everything(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a given label set satisfies every requirement
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.0
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }
}

impl FromIterator<(String, String)> for Selector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}
