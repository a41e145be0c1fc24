use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

use super::{Encode, mapping, scalar, sequence};
use crate::error::Result;
use crate::key::MapKey;
use crate::tag::Tag;
use crate::values::Values;

impl Encode for str {
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        scalar(self, key, tag, out)
    }

    fn to_text(&self, _tag: &Tag<'_>) -> Result<String> {
        Ok(self.to_owned())
    }
}

impl Encode for String {
    fn is_empty(&self) -> bool {
        String::is_empty(self)
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        scalar(self, key, tag, out)
    }

    fn to_text(&self, _tag: &Tag<'_>) -> Result<String> {
        Ok(self.clone())
    }
}

impl Encode for bool {
    fn is_empty(&self) -> bool {
        !*self
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        scalar(self, key, tag, out)
    }

    fn to_text(&self, tag: &Tag<'_>) -> Result<String> {
        let (yes, no) = tag.bool_tokens();
        Ok(if *self { yes } else { no }.to_owned())
    }
}

impl Encode for char {
    fn is_empty(&self) -> bool {
        *self == '\0'
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        scalar(self, key, tag, out)
    }

    fn to_text(&self, _tag: &Tag<'_>) -> Result<String> {
        Ok(self.to_string())
    }
}

macro_rules! encode_integer {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn is_empty(&self) -> bool {
                    *self == 0
                }

                fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
                    scalar(self, key, tag, out)
                }

                fn to_text(&self, _tag: &Tag<'_>) -> Result<String> {
                    Ok(itoa::Buffer::new().format(*self).to_owned())
                }
            }
        )*
    };
}

encode_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Shortest representation that reads back to the same value, without the
/// `.0` ryu puts on whole numbers.
fn float_text<F: ryu::Float>(value: F) -> String {
    let mut buffer = ryu::Buffer::new();
    let text = buffer.format(value);
    text.strip_suffix(".0").unwrap_or(text).to_owned()
}

macro_rules! encode_float {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn is_empty(&self) -> bool {
                    *self == 0.0
                }

                fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
                    scalar(self, key, tag, out)
                }

                fn to_text(&self, _tag: &Tag<'_>) -> Result<String> {
                    Ok(float_text(*self))
                }
            }
        )*
    };
}

encode_float!(f32, f64);

impl<T: Encode> Encode for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        match self {
            Some(inner) => inner.encode(key, tag, out),
            None => Ok(()),
        }
    }

    fn to_text(&self, tag: &Tag<'_>) -> Result<String> {
        match self {
            Some(inner) => inner.to_text(tag),
            None => Ok(String::new()),
        }
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        (**self).encode(key, tag, out)
    }

    fn to_text(&self, tag: &Tag<'_>) -> Result<String> {
        (**self).to_text(tag)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        (**self).encode(key, tag, out)
    }

    fn to_text(&self, tag: &Tag<'_>) -> Result<String> {
        (**self).to_text(tag)
    }
}

impl<T: Encode> Encode for [T] {
    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        sequence(self, key, tag, out)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        sequence(self, key, tag, out)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn is_empty(&self) -> bool {
        N == 0
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        sequence(self, key, tag, out)
    }
}

impl<K: MapKey, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        mapping::<K, V, _>(self, key, tag, out)
    }
}

impl<K: MapKey, V: Encode> Encode for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        mapping::<K, V, _>(self, key, tag, out)
    }
}

impl<K: MapKey, V: Encode, S: BuildHasher> Encode for IndexMap<K, V, S> {
    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        mapping::<K, V, _>(self, key, tag, out)
    }
}
