use crate::metadata::TimestampSource;
use crate::timestamp::parse_instant;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub instant_ms: i64,
    pub source: TimestampSource,
}

/// An instant of exactly zero counts as unresolved, so a genuine
/// `1970-01-01T00:00:00Z` capture falls through to the next candidate.
pub fn resolve_timestamp<I, S>(candidates: I, fallback_ms: i64) -> Resolution
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (field_index, raw) in candidates.into_iter().enumerate() {
        let raw = raw.as_ref();
        if raw.is_empty() {
            continue;
        }
        match parse_instant(raw) {
            Ok(instant_ms) if instant_ms > 0 => {
                return Resolution {
                    instant_ms,
                    source: TimestampSource::Metadata { field_index },
                };
            }
            Ok(instant_ms) => {
                log::debug!("ignoring non-positive timestamp {instant_ms} from {raw:?}");
            }
            Err(err) => log::debug!("{err}"),
        }
    }

    Resolution {
        instant_ms: fallback_ms,
        source: TimestampSource::FileModified,
    }
}
