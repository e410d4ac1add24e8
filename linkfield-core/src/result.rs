//! Search results and the ordered, key-unique result set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One selectable row produced by a type strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchResult {
    /// Value written back into the item on selection
    pub key: String,
    /// Display title (may carry a depth prefix for hierarchical kinds)
    pub title: String,
    /// Link target of the content
    pub url: String,
}

impl SearchResult {
    pub fn new(key: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Insertion-ordered results with unique keys.
///
/// Inserting a key that is already present replaces the earlier entry in
/// place, so the first position of a key wins and keys never repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SearchResult>", into = "Vec<SearchResult>")]
pub struct ResultSet {
    entries: Vec<SearchResult>,
    index: HashMap<String, usize>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, returning the entry it replaced.
    pub fn insert(&mut self, result: SearchResult) -> Option<SearchResult> {
        match self.index.get(&result.key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position], result)),
            None => {
                self.index.insert(result.key.clone(), self.entries.len());
                self.entries.push(result);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&SearchResult> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn into_vec(self) -> Vec<SearchResult> {
        self.entries
    }
}

impl From<Vec<SearchResult>> for ResultSet {
    fn from(results: Vec<SearchResult>) -> Self {
        results.into_iter().collect()
    }
}

impl From<ResultSet> for Vec<SearchResult> {
    fn from(set: ResultSet) -> Self {
        set.entries
    }
}

impl FromIterator<SearchResult> for ResultSet {
    fn from_iter<T: IntoIterator<Item = SearchResult>>(iter: T) -> Self {
        let mut set = ResultSet::new();
        for result in iter {
            set.insert(result);
        }
        set
    }
}

impl IntoIterator for ResultSet {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut set = ResultSet::new();
        set.insert(SearchResult::new("3", "c", "/c"));
        set.insert(SearchResult::new("1", "a", "/a"));
        set.insert(SearchResult::new("2", "b", "/b"));

        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let mut set = ResultSet::new();
        set.insert(SearchResult::new("1", "first", "/1"));
        set.insert(SearchResult::new("2", "second", "/2"));
        let replaced = set.insert(SearchResult::new("1", "again", "/1b"));

        assert_eq!(replaced.map(|r| r.title), Some("first".to_string()));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().map(|r| r.title.as_str()), Some("again"));
    }

    #[test]
    fn test_serializes_as_sequence() {
        let set: ResultSet = vec![SearchResult::new("7", "Seven", "/7")].into();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["key"], "7");
        let back: ResultSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
