use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;

use crate::store::{LogCategory, LogStore};

/// Dashboard counts derived from the general log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComplaintStats {
    pub total: u64,
    pub urgent: u64,
    pub normal: u64,
    pub today: u64,
}

/// Scan the general log once and derive counts.
///
/// Never fails: an unreadable store yields all-zero counts. Every array
/// element counts toward `total`, even hand-written or legacy entries with
/// missing fields: an entry is urgent only when its `urgent` field is `true`,
/// otherwise it is normal, so urgent + normal always equals total. `today`
/// compares the `YYYY-MM-DD` prefix of each entry's timestamp against the
/// current local date. String comparison, not datetime parsing.
pub fn complaint_stats(store: &LogStore) -> ComplaintStats {
    let entries = match store.read(LogCategory::General) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(%err, "general log unreadable, reporting zero stats");
            return ComplaintStats::default();
        }
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    let mut stats = ComplaintStats::default();
    for value in entries {
        stats.total += 1;
        if value.get("urgent").and_then(Value::as_bool) == Some(true) {
            stats.urgent += 1;
        } else {
            stats.normal += 1;
        }
        if value
            .get("timestamp")
            .and_then(Value::as_str)
            .is_some_and(|ts| ts.starts_with(&today))
        {
            stats.today += 1;
        }
    }
    stats
}
