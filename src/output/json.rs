//! JSON output formatting

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Envelope around every JSON document the CLI prints
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Meta,
}

/// When and by which version the document was produced
#[derive(Debug, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub version: &'static str,
}

impl<'a, T: ?Sized> JsonEnvelope<'a, T> {
    pub fn new(data: &'a T) -> Self {
        Self {
            data,
            meta: Meta {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Pretty-print `data` inside a [`JsonEnvelope`]
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonEnvelope::new(data))
}
