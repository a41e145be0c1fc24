use std::io;
use std::str;

use thiserror::Error;

/// Boxed error returned by custom codecs.
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for `struct_qs`.
#[derive(Debug, Error)]
pub enum Error {
    /// The decode target cannot hold a record (an unset `Option`).
    #[error("cannot decode into an unset `{type_name}`")]
    InvalidTarget { type_name: &'static str },

    /// The value's type has no encoding in the requested position.
    #[error("`{type_name}` is unsupported {context}")]
    UnsupportedType {
        type_name: &'static str,
        context: &'static str,
    },

    /// A raw value could not be parsed into the field's type.
    #[error("invalid value {value:?} for key {key:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A boolean field held neither of its expected tokens.
    #[error(
        "invalid boolean value {value:?} for key {key:?} (expected true: {true_token:?}, false: {false_token:?})"
    )]
    InvalidBool {
        key: String,
        value: String,
        true_token: &'static str,
        false_token: &'static str,
    },

    /// A `layout` override that chrono cannot render.
    #[error("invalid time layout {layout:?}")]
    InvalidLayout { layout: String },

    /// A numbered or indexed element beyond the configured maximum.
    #[error("index {index} for key {key:?} exceeds the maximum of {max}")]
    IndexOutOfRange {
        key: String,
        index: usize,
        max: usize,
    },

    /// Failure reported by a custom codec.
    #[error("custom encoder for key {key:?} failed: {source}")]
    Codec {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("invalid UTF-8 in querystring: {0}")]
    Utf8(#[from] str::Utf8Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Generate error to show a type cannot be handled in some position.
    pub fn unsupported<T: ?Sized>(context: &'static str) -> Self {
        Error::UnsupportedType {
            type_name: std::any::type_name::<T>(),
            context,
        }
    }

    /// Generate a parse failure for `value` found under `key`.
    pub fn invalid_value(key: &str, value: &str, reason: impl ToString) -> Self {
        Error::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
