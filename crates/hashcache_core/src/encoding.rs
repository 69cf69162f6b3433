//! Text encodings used to decode file contents before hashing.
//!
//! A file is read as bytes, decoded to text with the selected encoding, and
//! the resulting text is hashed as UTF-8. With the default `utf-8` encoding
//! this is the identity for valid UTF-8 input; invalid sequences are replaced
//! with U+FFFD.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::CacheError;

/// Encoding applied when turning file bytes into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    /// UTF-8, lossy.
    #[default]
    Utf8,
    /// UTF-16 little endian. A trailing odd byte is ignored.
    Utf16Le,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    /// 7-bit ASCII: the high bit of every byte is cleared.
    Ascii,
    /// Lowercase hexadecimal rendering of the bytes.
    Hex,
    /// Standard padded base64 rendering of the bytes.
    Base64,
}

impl Encoding {
    /// Canonical name of the encoding.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Latin1 => "latin1",
            Encoding::Ascii => "ascii",
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
        }
    }

    /// Decodes raw bytes to text.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Utf16Le => {
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
            Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Encoding::Ascii => bytes.iter().map(|&b| char::from(b & 0x7f)).collect(),
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base64 => STANDARD.encode(bytes),
        }
    }
}

impl FromStr for Encoding {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "utf8" => Ok(Encoding::Utf8),
            "utf16le" | "ucs2" => Ok(Encoding::Utf16Le),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            "ascii" => Ok(Encoding::Ascii),
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            _ => Err(CacheError::UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("utf-8", Encoding::Utf8)]
    #[case("UTF8", Encoding::Utf8)]
    #[case("utf16le", Encoding::Utf16Le)]
    #[case("ucs-2", Encoding::Utf16Le)]
    #[case("binary", Encoding::Latin1)]
    #[case("Latin1", Encoding::Latin1)]
    #[case("ascii", Encoding::Ascii)]
    #[case("hex", Encoding::Hex)]
    #[case("base64", Encoding::Base64)]
    fn test_parse_encoding_names(#[case] name: &str, #[case] expected: Encoding) {
        assert_eq!(name.parse::<Encoding>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_encoding() {
        let err = "ebcdic".parse::<Encoding>().unwrap_err();
        assert!(matches!(err, CacheError::UnknownEncoding(name) if name == "ebcdic"));
    }

    #[test]
    fn test_utf8_decode_is_lossy() {
        assert_eq!(Encoding::Utf8.decode(b"hello"), "hello");
        assert_eq!(Encoding::Utf8.decode(&[0x66, 0xff, 0x6f]), "f\u{fffd}o");
    }

    #[test]
    fn test_utf16le_decode() {
        let bytes: Vec<u8> = "héllo"
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect();
        assert_eq!(Encoding::Utf16Le.decode(&bytes), "héllo");

        // trailing odd byte is dropped
        assert_eq!(Encoding::Utf16Le.decode(&[0x61, 0x00, 0x62]), "a");
    }

    #[test]
    fn test_latin1_and_ascii_decode() {
        assert_eq!(Encoding::Latin1.decode(&[0x63, 0x61, 0x66, 0xe9]), "café");
        assert_eq!(Encoding::Ascii.decode(&[0xe1]), "a");
    }

    #[test]
    fn test_hex_and_base64_decode() {
        assert_eq!(Encoding::Hex.decode(&[0xde, 0xad]), "dead");
        assert_eq!(Encoding::Base64.decode(b"hi"), "aGk=");
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Encoding::Utf16Le).unwrap();
        assert_eq!(json, "\"utf-16le\"");

        let parsed: Encoding = serde_json::from_str("\"UTF-8\"").unwrap();
        assert_eq!(parsed, Encoding::Utf8);

        assert!(serde_json::from_str::<Encoding>("\"klingon\"").is_err());
    }
}
