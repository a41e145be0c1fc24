use std::borrow::Cow;

#[inline(always)]
fn hex_digit(c: u8) -> Option<u8> {
    char::from(c).to_digit(16).map(|d| d as u8)
}

/// Undoes query encoding: `+` becomes a space and `%XX` escapes become the
/// byte they name.
///
/// A `%` that is not followed by two hex digits is kept as it is. The input
/// is borrowed back unchanged when it holds neither `+` nor `%`.
pub fn decode(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.iter().any(|&b| b == b'+' || b == b'%') {
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        match input[idx] {
            b'+' => {
                decoded.push(b' ');
                idx += 1;
            }
            b'%' => {
                let escaped = input
                    .get(idx + 1..idx + 3)
                    .and_then(|pair| Some(hex_digit(pair[0])? << 4 | hex_digit(pair[1])?));
                match escaped {
                    Some(byte) => {
                        decoded.push(byte);
                        idx += 3;
                    }
                    None => {
                        decoded.push(b'%');
                        idx += 1;
                    }
                }
            }
            b => {
                decoded.push(b);
                idx += 1;
            }
        }
    }
    Cow::Owned(decoded)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_input_is_borrowed() {
        assert!(matches!(decode(b"abc"), Cow::Borrowed(_)));
    }

    #[test]
    fn plus_and_escapes() {
        assert_eq!(&*decode(b"a+b%20c"), b"a b c");
        assert_eq!(&*decode(b"%5Bx%5d"), b"[x]");
        assert_eq!(&*decode(b"caf%C3%A9"), "café".as_bytes());
    }

    #[test]
    fn broken_escapes_are_kept() {
        assert_eq!(&*decode(b"100%"), b"100%");
        assert_eq!(&*decode(b"%zz1"), b"%zz1");
        assert_eq!(&*decode(b"%4"), b"%4");
    }
}
