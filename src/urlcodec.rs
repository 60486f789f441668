use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrlDecodeError {
    #[error("truncated % escape at byte {0}")]
    TruncatedEscape(usize),
    #[error("invalid hex digits in % escape at byte {0}")]
    InvalidHex(usize),
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Percent-encode a URL component. Alphanumerics and `-_.!~*'()` pass
/// through; every other byte of the UTF-8 form becomes %XX with uppercase
/// hex. A space encodes as %20, never '+'.
pub fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for b in text.bytes() {
        let keep = b.is_ascii_alphanumeric()
            || matches!(b, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')');
        if keep {
            out.push(b as char);
        } else {
            use std::fmt::Write as _;
            write!(out, "%{b:02X}").ok();
        }
    }
    out
}

/// Reverse of [`encode_component`]. Accepts either hex case. A literal '+'
/// stays a '+'. Malformed escapes and non-UTF-8 results are reported with
/// the byte offset of the offending escape where there is one.
pub fn decode_component(text: &str) -> Result<String, UrlDecodeError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let (Some(&hi), Some(&lo)) = (bytes.get(i + 1), bytes.get(i + 2)) else {
                return Err(UrlDecodeError::TruncatedEscape(i));
            };
            let hi = hex_value(hi).ok_or(UrlDecodeError::InvalidHex(i))?;
            let lo = hex_value(lo).ok_or(UrlDecodeError::InvalidHex(i))?;
            out.push(hi * 16 + lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| UrlDecodeError::InvalidUtf8)
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|v| v as u8)
}

#[cfg(test)]
mod tests {
    use super::{UrlDecodeError, decode_component, encode_component};

    #[test]
    fn unreserved_characters_pass_through() {
        let text = "AZaz09-_.!~*'()";
        assert_eq!(encode_component(text), text);
    }

    #[test]
    fn reserved_and_multibyte_characters_are_escaped() {
        assert_eq!(encode_component("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(encode_component("😀"), "%F0%9F%98%80");
        assert_eq!(encode_component("+"), "%2B");
    }

    #[test]
    fn decode_accepts_both_hex_cases_and_literal_plus() {
        assert_eq!(decode_component("%41%62").unwrap(), "Ab");
        assert_eq!(decode_component("%c3%a9").unwrap(), "é");
        assert_eq!(decode_component("a+b").unwrap(), "a+b");
    }

    #[test]
    fn encode_then_decode_is_identity() {
        for text in ["hello world", "é ü 😀", "a/b?c=d&e=f", "100% done"] {
            assert_eq!(decode_component(&encode_component(text)).unwrap(), text);
        }
    }

    #[test]
    fn malformed_escapes_are_reported_with_offsets() {
        assert_eq!(
            decode_component("abc%"),
            Err(UrlDecodeError::TruncatedEscape(3))
        );
        assert_eq!(decode_component("%4"), Err(UrlDecodeError::TruncatedEscape(0)));
        assert_eq!(decode_component("%zz"), Err(UrlDecodeError::InvalidHex(0)));
        assert_eq!(decode_component("ok%FF"), Err(UrlDecodeError::InvalidUtf8));
    }
}
