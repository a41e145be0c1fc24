use std::borrow::Cow;

use percent_encoding::AsciiSet;

/// The WHATWG query percent-encode set
/// (https://url.spec.whatwg.org/#query-percent-encode-set) plus the bytes
/// that delimit pairs in a querystring, and `%` itself so that text which
/// already looks escaped survives a parse.
///
/// Spaces are in the set but are written as `+`, see [`encode`].
const VALUE_SET: &AsciiSet = &percent_encoding::CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'+')
    .add(b'%')
    .add(b'=')
    .add(b'&')
    .add(b'[')
    .add(b']');

/// Keys carry the bracket grammar (`a[b][0]`), so brackets stay literal.
const KEY_SET: &AsciiSet = &VALUE_SET.remove(b'[').remove(b']');

/// The application/x-www-form-urlencoded percent-encode set
/// (https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set):
/// everything except ASCII alphanumerics and `*`, `-`, `.`, `_`.
const FORM_URLENCODED_SET: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Percent-encodes a key.
pub fn encode_key(b: &[u8], use_form_encoding: bool) -> impl Iterator<Item = Cow<'_, [u8]>> + '_ {
    encode(b, KEY_SET, use_form_encoding)
}

/// Percent-encodes a value.
pub fn encode_value(
    b: &[u8],
    use_form_encoding: bool,
) -> impl Iterator<Item = Cow<'_, [u8]>> + '_ {
    encode(b, VALUE_SET, use_form_encoding)
}

/// In query mode `set` applies and spaces become `+`. Form mode ignores
/// `set` and uses the form-urlencoded set, where a space is `%20` like any
/// other reserved byte.
///
/// Returns an iterator of chunks so that nothing is allocated when no byte
/// needs escaping.
fn encode<'a>(
    b: &'a [u8],
    set: &'static AsciiSet,
    use_form_encoding: bool,
) -> impl Iterator<Item = Cow<'a, [u8]>> + 'a {
    let set = if use_form_encoding {
        FORM_URLENCODED_SET
    } else {
        set
    };
    percent_encoding::percent_encode(b, set).map(move |chunk| {
        if !use_form_encoding && chunk == "%20" {
            Cow::Borrowed(&b"+"[..])
        } else {
            Cow::Borrowed(chunk.as_bytes())
        }
    })
}
