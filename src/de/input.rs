use std::collections::HashMap;

use crate::values::Values;

/// Read state for one decode call.
///
/// Wraps the multimap being decoded and remembers, per key, how many of its
/// values have been consumed.
#[derive(Debug)]
pub struct Input<'v> {
    values: &'v Values,
    cursors: HashMap<&'v str, usize>,
    max_index: usize,
}

impl<'v> Input<'v> {
    pub(crate) fn new(values: &'v Values, max_index: usize) -> Self {
        Input {
            values,
            cursors: HashMap::new(),
            max_index,
        }
    }

    /// The multimap being decoded.
    ///
    /// The reference is not tied to `self`, so keys found while scanning it
    /// can be held across further reads.
    pub fn values(&self) -> &'v Values {
        self.values
    }

    /// Largest element index accepted for `numbered` and `indexed`
    /// sequences.
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Whether `key` still has unread values.
    pub fn contains(&self, key: &str) -> bool {
        match self.values.inner.get(key) {
            Some(all) => self.cursors.get(key).copied().unwrap_or(0) < all.len(),
            None => false,
        }
    }

    /// Takes the next unread value of `key`.
    pub fn take(&mut self, key: &str) -> Option<&'v str> {
        let values = self.values;
        let (stored, all) = values.inner.get_key_value(key)?;
        let cursor = self.cursors.entry(stored.as_str()).or_insert(0);
        let value = all.get(*cursor)?;
        *cursor += 1;
        Some(value.as_str())
    }

    /// Takes every unread value of `key`, or `None` when there are none.
    pub fn take_all(&mut self, key: &str) -> Option<&'v [String]> {
        let values = self.values;
        let (stored, all) = values.inner.get_key_value(key)?;
        let cursor = self.cursors.entry(stored.as_str()).or_insert(0);
        let rest = all.get(*cursor..).filter(|rest| !rest.is_empty())?;
        *cursor = all.len();
        Some(rest)
    }
}
