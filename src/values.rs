//! The multimap both directions work on.

mod decode;
mod encode;

use std::io::{self, Write};
use std::str;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

/// An ordered multimap of keys to one or more values.
///
/// Keys keep the order in which they were first added and each key keeps its
/// values in insertion order, so encoding the same record always produces
/// the same `Values`.
///
/// ```
/// use struct_qs::Values;
///
/// let mut values = Values::new();
/// values.add("tag", "a");
/// values.add("tag", "b");
/// values.add("page", "2");
///
/// assert_eq!(values.get("tag"), Some("a"));
/// assert_eq!(values.get_all("tag"), Some(&["a".to_string(), "b".to_string()][..]));
/// assert_eq!(values.keys().collect::<Vec<_>>(), ["tag", "page"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Values {
    pub(crate) inner: IndexMap<String, Vec<String>>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// The first value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key)?.first().map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Removes `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.shift_remove(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Parses a querystring such as `a=1&b[c]=2&b[c]=3`.
    ///
    /// Pairs are split on `&`, the key from the value on the first `=`. Both
    /// halves are `+`/percent-decoded and must be valid UTF-8. A pair without
    /// `=` gets an empty value and empty pairs are skipped.
    pub fn parse(input: &str) -> Result<Values> {
        let mut values = Values::new();
        for pair in input.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode::decode(key.as_bytes());
            let value = decode::decode(value.as_bytes());
            values.add(str::from_utf8(&key)?, str::from_utf8(&value)?);
        }
        Ok(values)
    }

    /// Writes every pair as `key=value` joined with `&`.
    pub(crate) fn write_to<W: Write>(&self, writer: &mut W, use_form_encoding: bool) -> io::Result<()> {
        let mut first = true;
        for (key, values) in &self.inner {
            for value in values {
                if !first {
                    writer.write_all(b"&")?;
                }
                first = false;
                for chunk in encode::encode_key(key.as_bytes(), use_form_encoding) {
                    writer.write_all(&chunk)?;
                }
                writer.write_all(b"=")?;
                for chunk in encode::encode_value(value.as_bytes(), use_form_encoding) {
                    writer.write_all(&chunk)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn render(&self, use_form_encoding: bool) -> String {
        let mut buffer = Vec::with_capacity(128);
        // writing into a Vec never fails
        let _ = self.write_to(&mut buffer, use_form_encoding);
        // every chunk is either ASCII or a slice of a `String`
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        values.extend(iter);
        values
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Values {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl Serialize for Values {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Values {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IndexMap::deserialize(deserializer).map(|inner| Values { inner })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_replaces_and_remove_keeps_order() {
        let mut values: Values = [("a", "1"), ("b", "2"), ("a", "3"), ("c", "4")]
            .into_iter()
            .collect();
        assert_eq!(values.get_all("a").map(<[String]>::len), Some(2));

        values.set("a", "x");
        assert_eq!(values.get_all("a"), Some(&["x".to_string()][..]));

        assert_eq!(values.remove("b"), Some(vec!["2".to_string()]));
        assert_eq!(values.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(values.len(), 2);
        assert!(values.get("b").is_none());
    }

    #[test]
    fn parse_pairs() {
        let values = Values::parse("a=1&&b[c]=x+y&b[c]=%26&flag").unwrap();
        assert_eq!(values.get("a"), Some("1"));
        assert_eq!(
            values.get_all("b[c]"),
            Some(&["x y".to_string(), "&".to_string()][..])
        );
        assert_eq!(values.get("flag"), Some(""));
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        assert!(matches!(
            Values::parse("a=%FF"),
            Err(crate::Error::Utf8(_))
        ));
    }

    #[test]
    fn render_round_trips() {
        let values: Values = [("q", "a b&c"), ("n[k]", "1"), ("n[k]", "2")]
            .into_iter()
            .collect();
        let query = values.render(false);
        assert_eq!(query, "q=a+b%26c&n[k]=1&n[k]=2");
        assert_eq!(Values::parse(&query).unwrap(), values);

        let form = values.render(true);
        assert_eq!(form, "q=a%20b%26c&n%5Bk%5D=1&n%5Bk%5D=2");
        assert_eq!(Values::parse(&form).unwrap(), values);
    }

    #[test]
    fn escapes_survive_render_and_parse() {
        let values: Values = [("k", "50%25"), ("%41", "%41"), ("p", "100%")]
            .into_iter()
            .collect();
        for use_form_encoding in [false, true] {
            let rendered = values.render(use_form_encoding);
            assert_eq!(Values::parse(&rendered).unwrap(), values, "{rendered}");
        }
        assert_eq!(values.render(false), "k=50%2525&%2541=%2541&p=100%25");
    }
}
