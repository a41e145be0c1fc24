//! Typed records to and from query parameters.
//!
//! Query parameters are a flat multimap: every key maps to one or more
//! string values. This crate flattens nested, strongly typed records into
//! that shape and rebuilds them from it, with the key naming rules shared by
//! both directions:
//!
//! - a field is stored under its name, or the name given in its tag,
//! - fields of a nested record are stored under `outer[inner]`,
//! - fields of an embedded record (`#[qs(embed)]`) are stored as if they
//!   were declared in the parent,
//! - sequences are stored as repeated values, or in the style the tag
//!   selects (`comma`, `space`, `semicolon`, `brackets`, `numbered`,
//!   `indexed` or a `del` delimiter),
//! - map entries are stored under `field[key]`.
//!
//! ## Field tags
//!
//! Fields are configured with `#[qs(...)]`:
//!
//! | attribute | effect |
//! |---|---|
//! | `#[qs("name")]` | store the field under `name` |
//! | `#[qs(",omitempty")]` | skip the field when encoding an empty value |
//! | `#[qs("-")]` | ignore the field entirely |
//! | `#[qs(",indexed")]` | sequences as `field[0]`, `field[1]`; record elements as `field[0][inner]`, written in place |
//! | `#[qs(",int")]` | booleans as `1`/`0` |
//! | `#[qs(",unix")]`, `unixmilli`, `unixnano` | times as Unix timestamps |
//! | `#[qs(layout = "%Y-%m-%d")]` | times with a `strftime` layout |
//! | `#[qs(del = "!")]` | sequences joined with a custom delimiter |
//! | `#[qs(embed)]` | hoist the fields of a nested record into the parent |
//! | `#[qs(custom)]` | encode through the field's [`EncodeValues`] impl |
//!
//! ## Usage
//!
//! ```
//! use struct_qs::Record;
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Address {
//!     city: String,
//!     postcode: String,
//! }
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     phone: u32,
//!     #[qs(",brackets")]
//!     user_ids: Vec<u8>,
//! }
//!
//! let params = QueryParams {
//!     id: 42,
//!     name: "Acme".to_string(),
//!     phone: 12345,
//!     address: Address {
//!         city: "Carrot City".to_string(),
//!         postcode: "12345".to_string(),
//!     },
//!     user_ids: vec![1, 2, 3, 4],
//! };
//!
//! let encoded = struct_qs::to_string(&params).unwrap();
//! assert_eq!(
//!     encoded,
//!     "id=42&name=Acme&address[city]=Carrot+City&address[postcode]=12345&\
//!      phone=12345&user_ids[]=1&user_ids[]=2&user_ids[]=3&user_ids[]=4"
//! );
//!
//! let decoded: QueryParams = struct_qs::from_str(&encoded).unwrap();
//! assert_eq!(decoded, params);
//! ```
//!
//! The multimap itself is a [`Values`]; [`to_values`] and [`from_values`]
//! work on it directly for callers that already have their own URL parser.

extern crate self as struct_qs;

mod config;
pub mod de;
mod error;
pub mod key;
pub mod schema;
pub mod ser;
pub mod tag;
mod time;
mod values;

pub use config::Config;
pub use de::{Decode, Input, Target, decode_into, from_str, from_values};
pub use error::{CodecError, Error, Result};
pub use schema::{FieldDef, Kind, Record, Schema, Shape};
pub use ser::{Encode, EncodeValues, Source, to_string, to_values};
pub use tag::Tag;
pub use values::Values;

pub use struct_qs_derive::Record;
