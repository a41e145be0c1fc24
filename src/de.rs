//! Decoding [`Values`] into records.
//!
//! ### An overview of the design of the decoder
//!
//! The decoder walks the same plan as the encoder (see [`Schema`]) and asks
//! each field to fill itself from the key the encoder would have written it
//! under. Every field reports whether it was *populated*, that is whether at
//! least one value was found for it. Composites are populated when one of
//! their children is, which is what lets an `Option<Record>` stay `None` when
//! nothing in the input mentions it.
//!
//! Values are read through an [`Input`], which keeps a cursor per key.
//! A scalar read takes the next unread value of its key, so when several
//! fields share a key (an outer field and a promoted inner field of the same
//! name) they receive the values in the order the encoder wrote them, and a
//! lone value goes to whichever field comes first in the plan.
//!
//! Sequences in `numbered` and `indexed` style, as well as maps, are not
//! stored under a single key. For those the decoder scans the keys of the
//! whole multimap for ones that extend the field's key, and decodes each
//! element under the key it found.
//!
//! [`Schema`]: crate::schema::Schema

mod impls;
mod input;

use std::collections::BTreeSet;

use indexmap::IndexSet;
use tracing::trace;

pub use self::input::Input;

use crate::error::{Error, Result};
use crate::key::{self, MapKey};
use crate::schema::{Record, Shape};
use crate::tag::{SequenceStyle, Tag};
use crate::values::Values;

/// Decodes a record from a [`Values`] multimap.
///
/// ```
/// use struct_qs::{Record, Values};
///
/// #[derive(Debug, Default, PartialEq, Record)]
/// struct Options {
///     #[qs("q")]
///     query: String,
///     page: u32,
///     #[qs(",comma")]
///     tags: Vec<String>,
/// }
///
/// let values: Values = [("q", "foo"), ("page", "2"), ("tags", "a,b")]
///     .into_iter()
///     .collect();
/// let options: Options = struct_qs::from_values(&values).unwrap();
/// assert_eq!(
///     options,
///     Options {
///         query: "foo".to_owned(),
///         page: 2,
///         tags: vec!["a".to_owned(), "b".to_owned()],
///     }
/// );
/// ```
pub fn from_values<T: Target + Default>(values: &Values) -> Result<T> {
    crate::Config::default().decode_values(values)
}

/// Decodes a record from a querystring.
///
/// ```
/// use struct_qs::Record;
///
/// #[derive(Debug, Default, PartialEq, Record)]
/// struct Query {
///     name: String,
///     #[qs(",int")]
///     verbose: bool,
/// }
///
/// let q: Query = struct_qs::from_str("name=Alice+Smith&verbose=1").unwrap();
/// assert_eq!(q.name, "Alice Smith");
/// assert!(q.verbose);
/// ```
pub fn from_str<T: Target + Default>(input: &str) -> Result<T> {
    crate::Config::default().decode_str(input)
}

/// Decodes into an existing value. Fields the input does not mention keep
/// their current contents.
pub fn decode_into<T: Target + ?Sized>(values: &Values, target: &mut T) -> Result<()> {
    crate::Config::default().decode_into(values, target)
}

/// A value that can be decoded at the top level.
///
/// Records get this from `#[derive(Record)]`. An `Option` target must
/// already hold a value; an unset one fails with [`Error::InvalidTarget`].
pub trait Target {
    fn decode_target(&mut self, input: &mut Input<'_>) -> Result<()>;
}

impl<T: Target + ?Sized> Target for &mut T {
    fn decode_target(&mut self, input: &mut Input<'_>) -> Result<()> {
        (**self).decode_target(input)
    }
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn decode_target(&mut self, input: &mut Input<'_>) -> Result<()> {
        (**self).decode_target(input)
    }
}

impl<T: Target> Target for Option<T> {
    fn decode_target(&mut self, input: &mut Input<'_>) -> Result<()> {
        match self {
            Some(inner) => inner.decode_target(input),
            None => Err(Error::InvalidTarget {
                type_name: std::any::type_name::<Self>(),
            }),
        }
    }
}

/// A field type with a built-in decoding.
pub trait Decode: Shape {
    /// Fills `self` from the values stored under `key`. Returns whether
    /// anything was found.
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool>;

    /// Parses a single string, as found in a sequence element. `key` is only
    /// used to report errors.
    fn decode_text(&mut self, key: &str, text: &str, tag: &Tag<'_>) -> Result<()> {
        let _ = (key, text, tag);
        Err(Error::unsupported::<Self>(
            "as a sequence element (use the `indexed` option)",
        ))
    }
}

/// Walks the plan of `record`, reading its fields from under `scope`.
pub fn record<R: Record>(record: &mut R, scope: &str, input: &mut Input<'_>) -> Result<bool> {
    let mut populated = false;
    for field in R::schema().fields() {
        let key = field.key(scope);
        populated |= record.decode_field(field.index(), &key, field.tag(), input)?;
    }
    Ok(populated)
}

/// Decodes one field.
pub fn field<T: Decode + ?Sized>(
    value: &mut T,
    key: &str,
    tag: &Tag<'_>,
    input: &mut Input<'_>,
) -> Result<bool> {
    value.decode(key, tag, input)
}

pub(crate) fn scalar<T: Decode + ?Sized>(
    value: &mut T,
    key: &str,
    tag: &Tag<'_>,
    input: &mut Input<'_>,
) -> Result<bool> {
    match input.take(key) {
        Some(text) => {
            value.decode_text(key, text, tag)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn elements<T: Decode + Default>(key: &str, parts: &[&str], tag: &Tag<'_>) -> Result<Vec<T>> {
    parts
        .iter()
        .map(|part| {
            let mut item = T::default();
            item.decode_text(key, part, tag)?;
            Ok(item)
        })
        .collect()
}

fn check_index(key: &str, index: usize, input: &Input<'_>) -> Result<()> {
    if index > input.max_index() {
        return Err(Error::IndexOutOfRange {
            key: key.to_owned(),
            index,
            max: input.max_index(),
        });
    }
    Ok(())
}

/// Reads a sequence in the style the tag selects. `None` when the input
/// holds nothing for it.
pub(crate) fn sequence<T: Decode + Default>(
    key: &str,
    tag: &Tag<'_>,
    input: &mut Input<'_>,
) -> Result<Option<Vec<T>>> {
    match tag.sequence_style() {
        SequenceStyle::Joined(delimiter) => {
            let Some(text) = input.take(key) else {
                return Ok(None);
            };
            if text.is_empty() {
                return Ok(Some(Vec::new()));
            }
            let parts: Vec<&str> = text.split(delimiter).collect();
            elements(key, &parts, tag).map(Some)
        }
        SequenceStyle::Brackets => repeated(key, &key::brackets(key), tag, input),
        SequenceStyle::Repeated => repeated(key, key, tag, input),
        SequenceStyle::Numbered => {
            let mut found = Vec::new();
            for candidate in input.values().keys() {
                if let Some(index) = key::numbered_index(candidate, key) {
                    check_index(candidate, index, input)?;
                    found.push((index, candidate));
                } else if candidate.starts_with(key) && candidate != key {
                    trace!(key, candidate, "skipping key without a numeric suffix");
                }
            }
            scattered(found, tag, input)
        }
        SequenceStyle::Indexed => {
            // one entry per element, however many sub-keys a record element has
            let mut found = BTreeSet::new();
            for candidate in input.values().keys() {
                if let Some((index, element_key)) = key::indexed_index(candidate, key) {
                    check_index(candidate, index, input)?;
                    found.insert((index, element_key));
                }
            }
            scattered(found.into_iter().collect(), tag, input)
        }
    }
}

fn repeated<T: Decode + Default>(
    key: &str,
    element_key: &str,
    tag: &Tag<'_>,
    input: &mut Input<'_>,
) -> Result<Option<Vec<T>>> {
    let Some(raw) = input.take_all(element_key) else {
        return Ok(None);
    };
    let parts: Vec<&str> = raw.iter().map(String::as_str).collect();
    elements(key, &parts, tag).map(Some)
}

/// Decodes elements that each live under a key of their own. Gaps keep the
/// default value.
fn scattered<T, K>(found: Vec<(usize, K)>, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<Option<Vec<T>>>
where
    T: Decode + Default,
    K: AsRef<str>,
{
    let Some(len) = found.iter().map(|(index, _)| index + 1).max() else {
        return Ok(None);
    };
    let mut items: Vec<T> = std::iter::repeat_with(T::default).take(len).collect();
    let mut populated = false;
    for (index, element_key) in &found {
        populated |= items[*index].decode(element_key.as_ref(), tag, input)?;
    }
    Ok(populated.then_some(items))
}

/// Reads the entries of a map stored under `key[entry]`.
pub(crate) fn mapping<K: MapKey, V: Decode + Default>(
    key: &str,
    tag: &Tag<'_>,
    input: &mut Input<'_>,
) -> Result<Option<Vec<(K, V)>>> {
    let mut entries = IndexSet::new();
    for candidate in input.values().keys() {
        if let Some(entry) = key::map_entry(candidate, key) {
            entries.insert(entry);
        }
    }
    if entries.is_empty() {
        return Ok(None);
    }

    let mut decoded = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry_key = key::compose(key, entry);
        let map_key =
            K::parse_key(entry).map_err(|reason| Error::invalid_value(&entry_key, entry, reason))?;
        let mut value = V::default();
        if value.decode(&entry_key, tag, input)? {
            decoded.push((map_key, value));
        }
    }
    Ok((!decoded.is_empty()).then_some(decoded))
}
