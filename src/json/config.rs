use super::error::JsonResult;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied encoder, used instead of the selected backend
pub type EncodeFn = Arc<dyn Fn(&JsonValue) -> JsonResult<String> + Send + Sync>;

/// Caller-supplied decoder; its errors are absorbed on the read path
pub type DecodeFn = Arc<dyn Fn(&str) -> JsonResult<JsonValue> + Send + Sync>;

/// JSON field configuration
///
/// Fixed once the field is built.
#[derive(Clone)]
pub struct FieldConfig {
    /// Store `{}` instead of NULL for null values
    pub null_to_empty: bool,

    /// Escape non-ASCII characters when encoding with the default backend
    pub ensure_ascii: bool,

    /// Custom encoder
    pub encoder: Option<EncodeFn>,

    /// Custom decoder
    pub decoder: Option<DecodeFn>,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set null handling
    pub fn null_to_empty(mut self, null_to_empty: bool) -> Self {
        self.null_to_empty = null_to_empty;
        self
    }

    /// Set ASCII escaping
    pub fn ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    /// Use a custom encoder
    pub fn encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&JsonValue) -> JsonResult<String> + Send + Sync + 'static,
    {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    /// Use a custom decoder
    pub fn decoder<F>(mut self, decoder: F) -> Self
    where
        F: Fn(&str) -> JsonResult<JsonValue> + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(decoder));
        self
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            null_to_empty: true,
            ensure_ascii: false,
            encoder: None,
            decoder: None,
        }
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("null_to_empty", &self.null_to_empty)
            .field("ensure_ascii", &self.ensure_ascii)
            .field("encoder", &self.encoder.as_ref().map(|_| "custom"))
            .field("decoder", &self.decoder.as_ref().map(|_| "custom"))
            .finish()
    }
}
