//! JSON backend selection
//!
//! Backends are tried in preference order and the first one compiled into
//! the binary wins. The choice is made once and never revisited.

use super::error::{JsonError, JsonResult};
use lazy_static::lazy_static;
use log::debug;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::{Formatter, Serializer};
use std::io;

lazy_static! {
    static ref DEFAULT_CODEC: Codec = {
        let backend = select_backend();
        debug!("JSON backend selected: {}", backend.name());
        backend.codec()
    };
}

/// JSON implementations known to the field, fastest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `sonic-rs` (cargo feature `sonic`)
    SonicRs,
    /// SIMD-accelerated `simd-json` (cargo feature `simd`)
    SimdJson,
    /// `serde_json`, always present
    SerdeJson,
}

impl Backend {
    pub const PREFERENCE: [Backend; 3] =
        [Backend::SonicRs, Backend::SimdJson, Backend::SerdeJson];

    pub fn is_available(&self) -> bool {
        match self {
            Backend::SonicRs => cfg!(feature = "sonic"),
            Backend::SimdJson => cfg!(feature = "simd"),
            Backend::SerdeJson => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::SonicRs => "sonic-rs",
            Backend::SimdJson => "simd-json",
            Backend::SerdeJson => "serde_json",
        }
    }

    /// Encode/decode pair of this backend.
    ///
    /// ASCII escaping always goes through the serde_json formatter; the fast
    /// backends only handle plain output.
    pub fn codec(self) -> Codec {
        match self {
            Backend::SonicRs => Codec {
                backend: self,
                encode: sonic_encode,
                decode: sonic_decode,
            },
            Backend::SimdJson => Codec {
                backend: self,
                encode: simd_encode,
                decode: simd_decode,
            },
            Backend::SerdeJson => Codec {
                backend: self,
                encode: serde_encode,
                decode: serde_decode,
            },
        }
    }
}

/// First available backend in [`Backend::PREFERENCE`] order
pub fn select_backend() -> Backend {
    Backend::PREFERENCE
        .into_iter()
        .find(Backend::is_available)
        .unwrap_or(Backend::SerdeJson)
}

/// Encode/decode function pair of one backend
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    backend: Backend,
    encode: fn(&JsonValue, bool) -> JsonResult<String>,
    decode: fn(&str) -> JsonResult<JsonValue>,
}

impl Codec {
    /// Process-wide codec, selected on first use
    pub fn default_codec() -> Codec {
        *DEFAULT_CODEC
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Compact JSON text; with `ensure_ascii` every non-ASCII character is
    /// written as a `\uXXXX` escape.
    pub fn encode(&self, value: &JsonValue, ensure_ascii: bool) -> JsonResult<String> {
        (self.encode)(value, ensure_ascii)
    }

    /// Strict decode; malformed text is an error
    pub fn decode(&self, text: &str) -> JsonResult<JsonValue> {
        (self.decode)(text)
    }
}

fn serde_encode(value: &JsonValue, ensure_ascii: bool) -> JsonResult<String> {
    if ensure_ascii {
        return ascii_encode(value);
    }
    serde_json::to_string(value).map_err(|e| JsonError::EncodeError(e.to_string()))
}

fn ascii_encode(value: &JsonValue) -> JsonResult<String> {
    let mut out = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut out, AsciiFormatter);
    value
        .serialize(&mut ser)
        .map_err(|e| JsonError::EncodeError(e.to_string()))?;
    String::from_utf8(out).map_err(|e| JsonError::EncodeError(e.to_string()))
}

fn serde_decode(text: &str) -> JsonResult<JsonValue> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(feature = "sonic")]
fn sonic_encode(value: &JsonValue, ensure_ascii: bool) -> JsonResult<String> {
    if ensure_ascii {
        return ascii_encode(value);
    }
    sonic_rs::to_string(value).map_err(|e| JsonError::EncodeError(e.to_string()))
}

#[cfg(feature = "sonic")]
fn sonic_decode(text: &str) -> JsonResult<JsonValue> {
    sonic_rs::from_str(text).map_err(|e| JsonError::InvalidJson(e.to_string()))
}

#[cfg(feature = "simd")]
fn simd_encode(value: &JsonValue, ensure_ascii: bool) -> JsonResult<String> {
    if ensure_ascii {
        return ascii_encode(value);
    }
    simd_json::serde::to_string(value).map_err(|e| JsonError::EncodeError(e.to_string()))
}

#[cfg(feature = "simd")]
fn simd_decode(text: &str) -> JsonResult<JsonValue> {
    // simd-json parses in place
    let mut bytes = text.as_bytes().to_vec();
    simd_json::serde::from_slice(&mut bytes).map_err(|e| JsonError::InvalidJson(e.to_string()))
}

// Backends compiled out are never selected; these keep their codecs constructible
#[cfg(not(feature = "sonic"))]
use self::{serde_decode as sonic_decode, serde_encode as sonic_encode};

#[cfg(not(feature = "simd"))]
use self::{serde_decode as simd_decode, serde_encode as simd_encode};

/// Compact formatter that escapes everything outside ASCII
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            if start < idx {
                writer.write_all(fragment[start..idx].as_bytes())?;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
