//! Persisted record shapes. Records are created exactly once at
//! complaint-handling time and never updated in place.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp format shared by every persisted record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summaries embed at most this many characters of the complaint.
const EXCERPT_CHARS: usize = 60;

/// Current local time in the shared record format.
pub fn now_stamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Full record of one handled complaint, appended to the general log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub complaint: String,
    /// Reply returned to the passenger (generated or fallback)
    pub response: String,
    pub urgent: bool,
    /// Matched urgent keyword, or "normal"
    pub reason: String,
}

/// One-line digest appended to the urgent or normal log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub timestamp: String,
    pub summary: String,
}

impl SummaryEntry {
    pub fn urgent(timestamp: &str, reason: &str, complaint: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            summary: format!(
                "URGENT: {} issue - {}",
                capitalize(reason),
                excerpt(complaint)
            ),
        }
    }

    pub fn normal(timestamp: &str, complaint: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            summary: format!("NORMAL: {}", excerpt(complaint)),
        }
    }
}

/// Escalation record persisted to the dedicated emergency log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyEntry {
    pub timestamp: String,
    pub complaint: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub priority: String,
}

impl EmergencyEntry {
    pub fn new(timestamp: &str, complaint: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            complaint: complaint.to_string(),
            kind: "EMERGENCY".to_string(),
            status: "ESCALATED".to_string(),
            priority: "CRITICAL".to_string(),
        }
    }
}

/// First [`EXCERPT_CHARS`] characters of the complaint, always followed by
/// an ellipsis. Char-based so multi-byte text never splits mid-character.
fn excerpt(text: &str) -> String {
    let head: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{head}...")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{EmergencyEntry, SummaryEntry, excerpt};

    #[test]
    fn urgent_summary_capitalizes_reason_and_excerpts_complaint() {
        let entry = SummaryEntry::urgent(
            "2026-08-23 10:00:00",
            "fire",
            "There was a fire in coach B3",
        );
        assert_eq!(
            entry.summary,
            "URGENT: Fire issue - There was a fire in coach B3..."
        );
    }

    #[test]
    fn normal_summary_prefixes_excerpt() {
        let entry = SummaryEntry::normal("2026-08-23 10:00:00", "The washroom was dirty");
        assert_eq!(entry.summary, "NORMAL: The washroom was dirty...");
    }

    #[test]
    fn excerpt_truncates_to_sixty_chars() {
        let long = "a".repeat(80);
        assert_eq!(excerpt(&long), format!("{}...", "a".repeat(60)));
    }

    #[test]
    fn emergency_entry_serializes_type_field() {
        let entry = EmergencyEntry::new("2026-08-23 10:00:00", "explosion near platform 2");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "EMERGENCY");
        assert_eq!(value["status"], "ESCALATED");
        assert_eq!(value["priority"], "CRITICAL");
    }
}
