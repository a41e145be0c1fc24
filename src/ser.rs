//! Encoding records into [`Values`].

mod impls;

use tracing::debug;

use crate::error::{CodecError, Error, Result};
use crate::key;
use crate::schema::{Record, Shape};
use crate::tag::{SequenceStyle, Tag};
use crate::values::Values;

/// Encodes a record into a fresh [`Values`].
///
/// ```
/// use struct_qs::Record;
///
/// #[derive(Record)]
/// struct Options {
///     #[qs("q")]
///     query: String,
///     #[qs("all")]
///     show_all: bool,
///     page: u32,
/// }
///
/// let options = Options {
///     query: "foo".to_owned(),
///     show_all: true,
///     page: 2,
/// };
/// let values = struct_qs::to_values(&options).unwrap();
/// assert_eq!(values.get("q"), Some("foo"));
/// assert_eq!(values.get("all"), Some("true"));
/// assert_eq!(values.get("page"), Some("2"));
/// ```
pub fn to_values<T: Source + ?Sized>(input: &T) -> Result<Values> {
    crate::Config::default().encode_values(input)
}

/// Encodes a record straight into a querystring.
///
/// ```
/// use struct_qs::Record;
///
/// #[derive(Record)]
/// struct Query {
///     name: String,
///     #[qs(",comma")]
///     tags: Vec<String>,
/// }
///
/// let q = Query {
///     name: "Alice Smith".to_owned(),
///     tags: vec!["a".to_owned(), "b".to_owned()],
/// };
/// assert_eq!(struct_qs::to_string(&q).unwrap(), "name=Alice+Smith&tags=a,b");
/// ```
pub fn to_string<T: Source + ?Sized>(input: &T) -> Result<String> {
    crate::Config::default().encode_string(input)
}

/// A value that can be encoded at the top level.
///
/// Records get this from `#[derive(Record)]`. An unset `Option` encodes to
/// an empty [`Values`].
pub trait Source {
    fn encode_source(&self, out: &mut Values) -> Result<()>;
}

impl<T: Source + ?Sized> Source for &T {
    fn encode_source(&self, out: &mut Values) -> Result<()> {
        (**self).encode_source(out)
    }
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn encode_source(&self, out: &mut Values) -> Result<()> {
        (**self).encode_source(out)
    }
}

impl<T: Source> Source for Option<T> {
    fn encode_source(&self, out: &mut Values) -> Result<()> {
        match self {
            Some(inner) => inner.encode_source(out),
            None => Ok(()),
        }
    }
}

/// A field type with a built-in encoding.
pub trait Encode: Shape {
    /// Whether `omitempty` drops the field.
    fn is_empty(&self) -> bool;

    /// Adds this value to `out` under `key`.
    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()>;

    /// Renders the value as a single string. Used for sequence elements,
    /// which share their key with their siblings.
    fn to_text(&self, tag: &Tag<'_>) -> Result<String> {
        let _ = tag;
        Err(Error::unsupported::<Self>(
            "as a sequence element (use the `indexed` option)",
        ))
    }
}

/// A type that writes its own entries.
///
/// Selected with `#[qs(custom)]`. The encoder hands over the key the field
/// would be stored under, and the implementation may add any number of
/// entries.
///
/// ```
/// use struct_qs::{CodecError, EncodeValues, Record, Values};
///
/// struct Flags(Vec<&'static str>);
///
/// impl EncodeValues for Flags {
///     fn encode_values(&self, key: &str, values: &mut Values) -> Result<(), CodecError> {
///         for (i, flag) in self.0.iter().enumerate() {
///             values.set(format!("{key}.{i}"), *flag);
///         }
///         Ok(())
///     }
/// }
///
/// #[derive(Record)]
/// struct Request {
///     #[qs(custom)]
///     flags: Flags,
/// }
///
/// let values = struct_qs::to_values(&Request { flags: Flags(vec!["a", "b"]) }).unwrap();
/// assert_eq!(values.get("flags.1"), Some("b"));
/// ```
pub trait EncodeValues {
    fn encode_values(&self, key: &str, values: &mut Values) -> Result<(), CodecError>;

    /// Whether `omitempty` drops the field.
    fn is_empty(&self) -> bool {
        false
    }

    /// Called in place of [`encode_values`](EncodeValues::encode_values)
    /// for an `Option<Self>` field that is `None`.
    fn encode_unset(key: &str, values: &mut Values) -> Result<(), CodecError>
    where
        Self: Sized,
    {
        let _ = (key, values);
        Ok(())
    }
}

impl<T: EncodeValues> EncodeValues for Option<T> {
    fn encode_values(&self, key: &str, values: &mut Values) -> Result<(), CodecError> {
        match self {
            Some(inner) => inner.encode_values(key, values),
            None => T::encode_unset(key, values),
        }
    }

    /// Only an unset option is empty; `Some` of an empty value is still
    /// encoded.
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl<T: EncodeValues + ?Sized> EncodeValues for &T {
    fn encode_values(&self, key: &str, values: &mut Values) -> Result<(), CodecError> {
        (**self).encode_values(key, values)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<T: EncodeValues> EncodeValues for Box<T> {
    fn encode_values(&self, key: &str, values: &mut Values) -> Result<(), CodecError> {
        (**self).encode_values(key, values)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn encode_unset(key: &str, values: &mut Values) -> Result<(), CodecError> {
        T::encode_unset(key, values)
    }
}

/// Walks the plan of `record`, storing its fields under `scope`.
pub fn record<R: Record>(record: &R, scope: &str, out: &mut Values) -> Result<()> {
    for field in R::schema().fields() {
        let key = field.key(scope);
        record.encode_field(field.index(), &key, field.tag(), out)?;
    }
    Ok(())
}

/// Encodes one field, honouring `omitempty`.
pub fn field<T: Encode + ?Sized>(value: &T, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
    if tag.omit_empty() && value.is_empty() {
        return Ok(());
    }
    value.encode(key, tag, out)
}

/// Encodes one `#[qs(custom)]` field, honouring `omitempty`.
pub fn custom<T: EncodeValues + ?Sized>(
    value: &T,
    key: &str,
    tag: &Tag<'_>,
    out: &mut Values,
) -> Result<()> {
    if tag.omit_empty() && value.is_empty() {
        return Ok(());
    }
    value.encode_values(key, out).map_err(|source| {
        debug!(key, error = %source, "custom encoder failed");
        Error::Codec {
            key: key.to_owned(),
            source,
        }
    })
}

pub(crate) fn scalar<T: Encode + ?Sized>(
    value: &T,
    key: &str,
    tag: &Tag<'_>,
    out: &mut Values,
) -> Result<()> {
    out.add(key, value.to_text(tag)?);
    Ok(())
}

pub(crate) fn sequence<T: Encode>(
    items: &[T],
    key: &str,
    tag: &Tag<'_>,
    out: &mut Values,
) -> Result<()> {
    match tag.sequence_style() {
        SequenceStyle::Joined(delimiter) => {
            let mut joined = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    joined.push_str(delimiter);
                }
                joined.push_str(&item.to_text(tag)?);
            }
            out.add(key, joined);
        }
        SequenceStyle::Brackets => {
            let element_key = key::brackets(key);
            for item in items {
                out.add(element_key.as_str(), item.to_text(tag)?);
            }
        }
        SequenceStyle::Numbered => {
            for (i, item) in items.iter().enumerate() {
                out.add(key::numbered(key, i), item.to_text(tag)?);
            }
        }
        SequenceStyle::Indexed => {
            for (i, item) in items.iter().enumerate() {
                item.encode(&key::indexed(key, i), tag, out)?;
            }
        }
        SequenceStyle::Repeated => {
            for item in items {
                out.add(key, item.to_text(tag)?);
            }
        }
    }
    Ok(())
}

pub(crate) fn mapping<'a, K, V, I>(entries: I, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()>
where
    K: key::MapKey + 'a,
    V: Encode + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    for (k, v) in entries {
        v.encode(&key::compose(key, &k.key_text()), tag, out)?;
    }
    Ok(())
}
