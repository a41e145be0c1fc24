//! `chrono` date-times as field values.
//!
//! Any `DateTime<Tz>` encodes. Decoding is available for the time zones
//! that can be rebuilt from a parsed offset: `Utc`, `FixedOffset` and
//! `Local`.

use std::fmt::{self, Write};

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};

use crate::de::{self, Decode, Input};
use crate::error::{Error, Result};
use crate::schema::{Kind, Shape};
use crate::ser::{self, Encode};
use crate::tag::{Tag, TimeFormat};
use crate::values::Values;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

impl<Tz: TimeZone> Shape for DateTime<Tz> {
    const KIND: Kind = Kind::Time;
}

impl<Tz: TimeZone> Encode for DateTime<Tz>
where
    Tz::Offset: fmt::Display,
{
    /// The Unix epoch counts as empty.
    fn is_empty(&self) -> bool {
        self.timestamp() == 0 && self.timestamp_subsec_nanos() == 0
    }

    fn encode(&self, key: &str, tag: &Tag<'_>, out: &mut Values) -> Result<()> {
        ser::scalar(self, key, tag, out)
    }

    fn to_text(&self, tag: &Tag<'_>) -> Result<String> {
        let mut buffer = itoa::Buffer::new();
        let text = match tag.time_format() {
            TimeFormat::Unix => buffer.format(self.timestamp()).to_owned(),
            // truncated towards zero, unlike `timestamp_millis`
            TimeFormat::UnixMilli => buffer.format(unix_nanos(self) / NANOS_PER_MILLI).to_owned(),
            TimeFormat::UnixNano => buffer.format(unix_nanos(self)).to_owned(),
            TimeFormat::Layout(layout) => {
                let mut text = String::new();
                write!(text, "{}", self.format(layout)).map_err(|_| Error::InvalidLayout {
                    layout: layout.to_owned(),
                })?;
                text
            }
            TimeFormat::Rfc3339 => self.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        };
        Ok(text)
    }
}

fn unix_nanos<Tz: TimeZone>(time: &DateTime<Tz>) -> i128 {
    i128::from(time.timestamp()) * NANOS_PER_SECOND + i128::from(time.timestamp_subsec_nanos())
}

fn from_unix(seconds: i64, nanos: u32) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(seconds, nanos).map(|t| t.fixed_offset())
}

/// Parses `text` in the format the tag selects.
fn parse(key: &str, text: &str, tag: &Tag<'_>) -> Result<DateTime<FixedOffset>> {
    let invalid = |reason: &dyn fmt::Display| Error::invalid_value(key, text, reason);
    let out_of_range = || invalid(&"timestamp out of range");

    match tag.time_format() {
        TimeFormat::Unix => {
            let seconds: i64 = text.parse().map_err(|e| invalid(&e))?;
            from_unix(seconds, 0).ok_or_else(out_of_range)
        }
        TimeFormat::UnixMilli => {
            let millis: i64 = text.parse().map_err(|e| invalid(&e))?;
            DateTime::from_timestamp_millis(millis)
                .map(|t| t.fixed_offset())
                .ok_or_else(out_of_range)
        }
        TimeFormat::UnixNano => {
            let nanos: i128 = text.parse().map_err(|e| invalid(&e))?;
            let seconds = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).map_err(|e| invalid(&e))?;
            // rem_euclid is always in 0..1e9
            let subsec = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
            from_unix(seconds, subsec).ok_or_else(out_of_range)
        }
        TimeFormat::Layout(layout) => DateTime::parse_from_str(text, layout)
            .or_else(|_| NaiveDateTime::parse_from_str(text, layout).map(|t| t.and_utc().fixed_offset()))
            .or_else(|_| {
                NaiveDate::parse_from_str(text, layout)
                    .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset())
            })
            .map_err(|e| invalid(&e)),
        TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(text).map_err(|e| invalid(&e)),
    }
}

macro_rules! decode_time {
    ($($tz:ty => $zone:expr),*) => {
        $(
            impl Decode for DateTime<$tz> {
                fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
                    de::scalar(self, key, tag, input)
                }

                fn decode_text(&mut self, key: &str, text: &str, tag: &Tag<'_>) -> Result<()> {
                    *self = parse(key, text, tag)?.with_timezone(&$zone);
                    Ok(())
                }
            }
        )*
    };
}

decode_time!(Utc => Utc, Local => Local);

impl Decode for DateTime<FixedOffset> {
    fn decode(&mut self, key: &str, tag: &Tag<'_>, input: &mut Input<'_>) -> Result<bool> {
        de::scalar(self, key, tag, input)
    }

    fn decode_text(&mut self, key: &str, text: &str, tag: &Tag<'_>) -> Result<()> {
        *self = parse(key, text, tag)?;
        Ok(())
    }
}
