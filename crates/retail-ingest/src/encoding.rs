//! Ordered encoding candidates and strict decoding.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Labels of the default chain. `latin1` resolves to windows-1252 under the
/// WHATWG rules `encoding_rs` follows.
pub const DEFAULT_ENCODING_LABELS: &[&str] = &["utf-8", "latin1", "windows-1252"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodings to try, highest priority first. Never empty, never repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct EncodingChain {
    encodings: Vec<&'static Encoding>,
}

impl EncodingChain {
    pub fn new(encodings: impl IntoIterator<Item = &'static Encoding>) -> Result<Self> {
        let mut chain: Vec<&'static Encoding> = Vec::new();
        for encoding in encodings {
            if !chain.contains(&encoding) {
                chain.push(encoding);
            }
        }
        if chain.is_empty() {
            return Err(IngestError::NoEncodings);
        }
        Ok(Self { encodings: chain })
    }

    /// Build a chain from WHATWG labels such as `utf-8`, `latin1` or `cp1252`.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let encodings = labels
            .into_iter()
            .map(|label| {
                let label = label.as_ref();
                Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                    IngestError::UnknownEncoding {
                        label: label.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(encodings)
    }

    pub fn encodings(&self) -> &[&'static Encoding] {
        &self.encodings
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.encodings.iter().map(|encoding| encoding.name()).collect()
    }
}

impl Default for EncodingChain {
    fn default() -> Self {
        Self {
            encodings: vec![UTF_8, WINDOWS_1252],
        }
    }
}

impl TryFrom<Vec<String>> for EncodingChain {
    type Error = IngestError;

    fn try_from(labels: Vec<String>) -> Result<Self> {
        Self::from_labels(labels)
    }
}

impl From<EncodingChain> for Vec<String> {
    fn from(chain: EncodingChain) -> Self {
        chain.names().into_iter().map(str::to_string).collect()
    }
}

/// Decode `bytes` as `encoding`, failing instead of substituting
/// replacement characters. A UTF-8 byte-order mark is dropped.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let body = if encoding == UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
}
