use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;

use super::{Decode, Input, mapping, scalar, sequence};
use crate::error::{Error, Result};
use crate::key::MapKey;
use crate::tag::Tag;

impl Decode for String {
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        scalar(self, key, tag, input)
    }

    fn decode_text(&mut self, _key: &str, text: &str, _tag: &Tag<'_>) -> Result<()> {
        text.clone_into(self);
        Ok(())
    }
}

impl Decode for bool {
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        scalar(self, key, tag, input)
    }

    fn decode_text(&mut self, key: &str, text: &str, tag: &Tag<'_>) -> Result<()> {
        let (true_token, false_token) = tag.bool_tokens();
        *self = match text {
            t if t == true_token => true,
            t if t == false_token => false,
            _ => {
                return Err(Error::InvalidBool {
                    key: key.to_owned(),
                    value: text.to_owned(),
                    true_token,
                    false_token,
                });
            }
        };
        Ok(())
    }
}

macro_rules! decode_parsed {
    ($($ty:ty),*) => {
        $(
            impl Decode for $ty {
                fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
                    scalar(self, key, tag, input)
                }

                fn decode_text(&mut self, key: &str, text: &str, _tag: &Tag<'_>) -> Result<()> {
                    *self = text
                        .parse::<$ty>()
                        .map_err(|e| Error::invalid_value(key, text, e))?;
                    Ok(())
                }
            }
        )*
    };
}

decode_parsed!(
    char, f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

impl<T: Decode + Default> Decode for Option<T> {
    /// An unset option is only filled in when the input has something for
    /// it. A set one is decoded in place.
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        if let Some(inner) = self {
            return inner.decode(key, tag, input);
        }
        let mut inner = T::default();
        let populated = inner.decode(key, tag, input)?;
        if populated {
            *self = Some(inner);
        }
        Ok(populated)
    }

    fn decode_text(&mut self, key: &str, text: &str, tag: &Tag<'_>) -> Result<()> {
        if text.is_empty() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.decode_text(key, text, tag)?;
        *self = Some(inner);
        Ok(())
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        (**self).decode(key, tag, input)
    }

    fn decode_text(&mut self, key: &str, text: &str, tag: &Tag<'_>) -> Result<()> {
        (**self).decode_text(key, text, tag)
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        match sequence(key, tag, input)? {
            Some(items) => {
                *self = items;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<T: Decode + Default, const N: usize> Decode for [T; N] {
    /// Fills as many slots as there are elements; the rest are untouched.
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        let Some(items) = sequence::<T>(key, tag, input)? else {
            return Ok(false);
        };
        for (slot, item) in self.iter_mut().zip(items) {
            *slot = item;
        }
        Ok(true)
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Decode + Default,
    S: BuildHasher + Default,
{
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        match mapping(key, tag, input)? {
            Some(entries) => {
                *self = entries.into_iter().collect();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Decode + Default,
{
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        match mapping(key, tag, input)? {
            Some(entries) => {
                *self = entries.into_iter().collect();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<K, V, S> Decode for IndexMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Decode + Default,
    S: BuildHasher + Default,
{
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        match mapping(key, tag, input)? {
            Some(entries) => {
                *self = entries.into_iter().collect();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
