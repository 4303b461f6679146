/// Text encodings an object may be decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1; every byte maps to the code point of the same value
    Latin1,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => f.write_str("utf-8"),
            Self::Latin1 => f.write_str("latin-1"),
        }
    }
}

/// Text decoded from an object's bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: Encoding,
}

/// Decodes `bytes` as UTF-8, falling back to Latin-1 when they are not valid UTF-8.
/// A leading UTF-8 byte-order mark is dropped.
/// # Implementation
/// This never fails: Latin-1 accepts any byte.
pub fn decode(bytes: Vec<u8>) -> Decoded {
    match String::from_utf8(bytes) {
        Ok(mut text) => {
            if text.starts_with('\u{feff}') {
                text.remove(0);
            }
            Decoded {
                text,
                encoding: Encoding::Utf8,
            }
        }
        Err(e) => Decoded {
            text: latin1(e.as_bytes()),
            encoding: Encoding::Latin1,
        },
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
