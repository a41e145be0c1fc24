//! Building and taking apart bracketed key paths.
//!
//! Every key the encoder writes and every key the decoder looks up is built
//! here, which keeps the two directions in agreement on the grammar:
//!
//! - `field` at the top level,
//! - `outer[inner]` (and `a[b][c]`) for nested records and map entries,
//! - `field[]` for the `brackets` sequence style,
//! - `field0`, `field1` for `numbered`,
//! - `field[0]`, `field[1]` for `indexed`.

use std::borrow::Cow;

/// Joins a scope and a field name. The empty scope is the top level.
pub fn compose(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        return name.to_owned();
    }
    let mut key = String::with_capacity(scope.len() + name.len() + 2);
    key.push_str(scope);
    key.push('[');
    key.push_str(name);
    key.push(']');
    key
}

/// `key[]`
pub fn brackets(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push_str(key);
    out.push_str("[]");
    out
}

/// `key3`
pub fn numbered(key: &str, index: usize) -> String {
    let mut buffer = itoa::Buffer::new();
    let mut out = String::with_capacity(key.len() + 4);
    out.push_str(key);
    out.push_str(buffer.format(index));
    out
}

/// `key[3]`
pub fn indexed(key: &str, index: usize) -> String {
    let mut buffer = itoa::Buffer::new();
    compose(key, buffer.format(index))
}

/// Returns the map entry key carried by `key` when it has the shape
/// `scope[entry]`, optionally followed by the sub-key of the entry's value:
/// `scope[entry][...]` for nested values and `indexed` or `brackets`
/// sequences, `scope[entry]N` for `numbered` sequences.
///
/// The entry ends at the first `]`, so entry keys cannot contain one.
pub fn map_entry<'k>(key: &'k str, scope: &str) -> Option<&'k str> {
    let rest = key.strip_prefix(scope)?.strip_prefix('[')?;
    let end = rest.find(']')?;
    let entry = &rest[..end];
    let after = &rest[end + 1..];
    let value_key = after.starts_with('[') || after.bytes().all(|b| b.is_ascii_digit());
    (!entry.is_empty() && value_key).then_some(entry)
}

/// Parses the element index of a `numbered` key.
///
/// Keys that merely share the prefix (`scope_other`, `scopeX`) belong to a
/// different field and yield `None`.
pub fn numbered_index(key: &str, scope: &str) -> Option<usize> {
    let rest = key.strip_prefix(scope)?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Parses the element index of an `indexed` key: `scope[i]` or
/// `scope[i][...]`. Also returns the element's own key, `scope[i]` exactly as
/// written, so that `v[01]` is read back from `v[01]` and not `v[1]`.
pub fn indexed_index<'k>(key: &'k str, scope: &str) -> Option<(usize, &'k str)> {
    let rest = key.strip_prefix(scope)?.strip_prefix('[')?;
    let end = rest.find(']')?;
    let digits = &rest[..end];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let after = &rest[end + 1..];
    if !after.is_empty() && !after.starts_with('[') {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((index, &key[..key.len() - after.len()]))
}

/// A map key that can be carried inside brackets.
///
/// Implemented for `String` and the integer types.
pub trait MapKey: Sized {
    fn parse_key(text: &str) -> Result<Self, String>;

    fn key_text(&self) -> Cow<'_, str>;
}

impl MapKey for String {
    fn parse_key(text: &str) -> Result<Self, String> {
        Ok(text.to_owned())
    }

    fn key_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

macro_rules! integer_map_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                fn parse_key(text: &str) -> Result<Self, String> {
                    text.parse().map_err(|e: std::num::ParseIntError| e.to_string())
                }

                fn key_text(&self) -> Cow<'_, str> {
                    Cow::Owned(itoa::Buffer::new().format(*self).to_owned())
                }
            }
        )*
    };
}

integer_map_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
