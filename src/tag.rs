//! Per-field tags.
//!
//! A tag is the `name[,option]*` string attached to a field with
//! `#[qs("...")]`. The first segment renames the field (an empty name keeps
//! the declared one), the remaining segments are option flags. Flags are
//! matched by membership, so order does not matter and unknown flags are
//! simply ignored.
//!
//! Both directions read a field's behaviour through the accessors on [`Tag`]
//! so that whatever the encoder writes, the decoder reads back from the same
//! place.

pub const OMIT_EMPTY: &str = "omitempty";
pub const COMMA: &str = "comma";
pub const SPACE: &str = "space";
pub const SEMICOLON: &str = "semicolon";
pub const BRACKETS: &str = "brackets";
pub const NUMBERED: &str = "numbered";
pub const INDEXED: &str = "indexed";
pub const INT: &str = "int";
pub const UNIX: &str = "unix";
pub const UNIX_MILLI: &str = "unixmilli";
pub const UNIX_NANO: &str = "unixnano";

/// The parsed tag of a single field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag<'a> {
    name: &'a str,
    options: Vec<&'a str>,
    excluded: bool,
    layout: Option<&'a str>,
    delimiter: Option<&'a str>,
}

/// How the elements of a sequence are laid out over keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceStyle<'a> {
    /// One value, elements joined with the delimiter: `a=1,2`.
    Joined(&'a str),
    /// Repeated values under `key[]`: `a[]=1&a[]=2`.
    Brackets,
    /// One key per element with the index appended: `a0=1&a1=2`.
    Numbered,
    /// One key per element with a bracketed index: `a[0]=1&a[1]=2`.
    ///
    /// Record elements are written in place, at the position of their field,
    /// so their keys come before those of any promoted field of the parent.
    Indexed,
    /// Repeated values under the bare key: `a=1&a=2`.
    Repeated,
}

/// How a time value is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeFormat<'a> {
    Rfc3339,
    Unix,
    UnixMilli,
    UnixNano,
    /// A chrono `strftime` layout.
    Layout(&'a str),
}

impl<'a> Tag<'a> {
    /// Splits a raw tag into its name and options.
    ///
    /// ```
    /// use struct_qs::Tag;
    ///
    /// let tag = Tag::parse("page,omitempty");
    /// assert_eq!(tag.name(), "page");
    /// assert!(tag.omit_empty());
    /// ```
    pub fn parse(raw: &'a str) -> Self {
        let mut segments = raw.split(',');
        let name = segments.next().unwrap_or_default();
        Tag {
            name,
            options: segments.collect(),
            excluded: raw == "-",
            layout: None,
            delimiter: None,
        }
    }

    /// Sets the `layout` override used for time values.
    pub fn with_layout(mut self, layout: &'a str) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Sets the `del` override used to join sequences.
    pub fn with_delimiter(mut self, delimiter: &'a str) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// The explicit name, empty when the declared name should be used.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Whether the field is hidden from both directions (`"-"`).
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| *o == option)
    }

    pub fn omit_empty(&self) -> bool {
        self.contains(OMIT_EMPTY)
    }

    pub fn layout(&self) -> Option<&'a str> {
        self.layout
    }

    /// The `(true, false)` tokens used for booleans.
    pub fn bool_tokens(&self) -> (&'static str, &'static str) {
        if self.contains(INT) {
            ("1", "0")
        } else {
            ("true", "false")
        }
    }

    pub fn sequence_style(&self) -> SequenceStyle<'a> {
        if self.contains(COMMA) {
            SequenceStyle::Joined(",")
        } else if self.contains(SPACE) {
            SequenceStyle::Joined(" ")
        } else if self.contains(SEMICOLON) {
            SequenceStyle::Joined(";")
        } else if self.contains(BRACKETS) {
            SequenceStyle::Brackets
        } else if let Some(delimiter) = self.delimiter.filter(|d| !d.is_empty()) {
            SequenceStyle::Joined(delimiter)
        } else if self.contains(INDEXED) {
            SequenceStyle::Indexed
        } else if self.contains(NUMBERED) {
            SequenceStyle::Numbered
        } else {
            SequenceStyle::Repeated
        }
    }

    pub fn time_format(&self) -> TimeFormat<'a> {
        if self.contains(UNIX) {
            TimeFormat::Unix
        } else if self.contains(UNIX_MILLI) {
            TimeFormat::UnixMilli
        } else if self.contains(UNIX_NANO) {
            TimeFormat::UnixNano
        } else if let Some(layout) = self.layout.filter(|l| !l.is_empty()) {
            TimeFormat::Layout(layout)
        } else {
            TimeFormat::Rfc3339
        }
    }
}
