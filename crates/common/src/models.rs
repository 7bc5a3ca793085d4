//! Domain models

use std::collections::HashMap;
use std::path::PathBuf;

/// Label under which the default secret is stored.
///
/// Used whenever a request carries no label, or its label has no entry of its
/// own.
pub const DEFAULT_KEY_LABEL: &str = "<default>";

/// A key file to load, and the label its secret is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFileEntry {
    pub label: String,
    pub file: PathBuf,
}

impl KeyFileEntry {
    pub fn new(label: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            file: file.into(),
        }
    }
}

/// Label to secret mapping.
///
/// Built once at startup and shared read-only afterwards. Collecting from an
/// iterator keeps the last secret seen for each label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDictionary {
    keys: HashMap<String, String>,
}

impl KeyDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Secret stored under exactly this label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.keys.get(label).map(String::as_str)
    }

    /// Secret for `label`, falling back to the default secret
    pub fn secret_for(&self, label: &str) -> Option<&str> {
        self.get(label).or_else(|| self.get(DEFAULT_KEY_LABEL))
    }

    pub fn default_secret(&self) -> Option<&str> {
        self.get(DEFAULT_KEY_LABEL)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

impl<L, S> FromIterator<(L, S)> for KeyDictionary
where
    L: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, S)>>(iter: I) -> Self {
        let mut keys = HashMap::new();
        for (label, secret) in iter {
            keys.insert(label.into(), secret.into());
        }
        Self { keys }
    }
}
