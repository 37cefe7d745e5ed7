use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A row with a unique key within its series.
pub trait Keyed {
    type Key: Eq + Hash + Clone + Debug;

    fn key(&self) -> Self::Key;
}

/// Ordered rows with a key index kept in sync on every change.
#[derive(Clone, Debug)]
pub struct KeyedRows<R: Keyed> {
    rows: Vec<R>,
    index: HashMap<R::Key, usize>,
}

impl<R: Keyed> Default for KeyedRows<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Keyed> KeyedRows<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn last(&self) -> Option<&R> {
        self.rows.last()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.rows
    }

    /// Replace the row with the same key, or append. Returns `true` when an
    /// existing row was replaced.
    pub fn insert(&mut self, row: R) -> bool {
        match self.index.get(&row.key()) {
            Some(&i) => {
                self.rows[i] = row;
                true
            }
            None => {
                self.append(row);
                false
            }
        }
    }

    /// Append without a uniqueness check. A later row with a duplicate key
    /// shadows the earlier one in the index.
    pub fn append(&mut self, row: R) {
        self.index.insert(row.key(), self.rows.len());
        self.rows.push(row);
    }

    /// Sort rows and rebuild the index.
    pub fn sort_by_key<K: Ord, F: FnMut(&R) -> K>(&mut self, f: F) {
        self.rows.sort_by_key(f);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.key(), i))
            .collect();
    }
}

impl<R: Keyed> FromIterator<R> for KeyedRows<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut rows = Self::new();
        for row in iter {
            rows.append(row);
        }
        rows
    }
}

impl<'a, R: Keyed> IntoIterator for &'a KeyedRows<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
