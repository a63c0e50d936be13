//! `Server-Timing` response header parsing
//!
//! The search endpoints attach a breakdown of server-side phase durations in
//! the standard `Server-Timing` format, e.g. `"db;dur=12,embed;dur=340"`.
//! Parsing is best-effort: malformed entries are skipped and a fully
//! malformed header degrades to an empty list rather than an error.

use serde::Serialize;

/// One named server-side phase and its duration in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerTiming {
    pub name: String,
    pub duration: f64,
}

/// Parse a `Server-Timing` header value into `{name, duration}` pairs.
/// Entries without a parseable `dur=` attribute are dropped.
pub fn parse_server_timing(header: &str) -> Vec<ServerTiming> {
    header
        .split(',')
        .filter_map(|entry| {
            let mut fields = entry.trim().split(';');
            let name = fields.next()?.trim();
            if name.is_empty() {
                return None;
            }

            let duration = fields.find_map(|attr| {
                attr.trim().strip_prefix("dur=")?.parse::<f64>().ok()
            });
            match duration {
                Some(duration) => Some(ServerTiming {
                    name: name.to_string(),
                    duration,
                }),
                None => {
                    tracing::debug!(entry = %entry.trim(), "skipping Server-Timing entry without duration");
                    None
                }
            }
        })
        .collect()
}
