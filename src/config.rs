use std::io::Write;

use crate::de::{Input, Target};
use crate::error::Result;
use crate::ser::Source;
use crate::values::Values;

/// Configuration for encoding and decoding.
///
/// ## Index limit
///
/// `numbered` and `indexed` sequences size themselves from the largest index
/// found among the input keys. `max_index` caps that index so a single key
/// such as `ids[4000000000]=1` cannot make the decoder allocate a huge
/// sequence. Inputs that exceed it fail with
/// [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange).
///
/// Default value: `max_index = 1000`
///
/// ```
/// use struct_qs::{Config, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct Query {
///     #[qs("ids,indexed")]
///     ids: Vec<u32>,
/// }
///
/// let config = Config::new().max_index(10);
/// assert!(config.decode_str::<Query>("ids[10]=1").is_ok());
/// assert!(config.decode_str::<Query>("ids[11]=1").is_err());
/// ```
///
/// ## Querystring encoding
///
/// `max_index` only matters to decoding. `use_form_encoding` only matters
/// when a [`Values`] is turned into a querystring, see
/// [`Config::use_form_encoding`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    max_index: usize,
    use_form_encoding: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            max_index: 1000,
            use_form_encoding: cfg!(feature = "default_to_form_encoding"),
        }
    }

    /// Specifies the largest `numbered` or `indexed` element index that
    /// will be decoded. Default is 1000.
    pub const fn max_index(mut self, max_index: usize) -> Self {
        self.max_index = max_index;
        self
    }

    /// By default querystrings are written with query-string encoding, as
    /// defined in [WHATWG](https://url.spec.whatwg.org/#query-percent-encode-set).
    /// It leaves most punctuation alone, writes spaces as `+` and keeps the
    /// brackets of keys like `a[b][0]` readable.
    ///
    /// Set this to `true` to percent-encode everything outside the
    /// `application/x-www-form-urlencoded` safe set instead, brackets in
    /// keys included. The `default_to_form_encoding` Cargo feature flips the
    /// default.
    ///
    /// ```
    /// use struct_qs::{Config, Values};
    ///
    /// let values: Values = [("a[b]", "x y")].into_iter().collect();
    /// assert_eq!(Config::new().render(&values), "a[b]=x+y");
    /// assert_eq!(
    ///     Config::new().use_form_encoding(true).render(&values),
    ///     "a%5Bb%5D=x%20y"
    /// );
    /// ```
    pub const fn use_form_encoding(mut self, use_form_encoding: bool) -> Self {
        self.use_form_encoding = use_form_encoding;
        self
    }

    /// Encodes a record into a [`Values`].
    pub fn encode_values<T: Source + ?Sized>(self, input: &T) -> Result<Values> {
        let mut values = Values::new();
        input.encode_source(&mut values)?;
        Ok(values)
    }

    /// Encodes a record into a querystring.
    pub fn encode_string<T: Source + ?Sized>(self, input: &T) -> Result<String> {
        Ok(self.render(&self.encode_values(input)?))
    }

    /// Encodes a record as a querystring written to `writer`.
    pub fn encode_to_writer<T: Source + ?Sized, W: Write>(
        self,
        input: &T,
        writer: &mut W,
    ) -> Result<()> {
        let values = self.encode_values(input)?;
        values.write_to(writer, self.use_form_encoding)?;
        Ok(())
    }

    /// Decodes a fresh `T` from a [`Values`].
    pub fn decode_values<T: Target + Default>(self, values: &Values) -> Result<T> {
        let mut target = T::default();
        self.decode_into(values, &mut target)?;
        Ok(target)
    }

    /// Decodes a fresh `T` from a querystring.
    pub fn decode_str<T: Target + Default>(self, input: &str) -> Result<T> {
        self.decode_values(&self.parse(input)?)
    }

    /// Decodes into an existing value, leaving fields the input does not
    /// mention as they are.
    pub fn decode_into<T: Target + ?Sized>(self, values: &Values, target: &mut T) -> Result<()> {
        let mut input = Input::new(values, self.max_index);
        target.decode_target(&mut input)
    }

    /// Writes `values` as a querystring.
    pub fn render(self, values: &Values) -> String {
        values.render(self.use_form_encoding)
    }

    /// Parses a querystring into a [`Values`].
    pub fn parse(self, input: &str) -> Result<Values> {
        Values::parse(input)
    }
}
