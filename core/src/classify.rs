use serde::{Deserialize, Serialize};

/// Keywords that mark a complaint as urgent, in priority order. When a
/// complaint mentions several of these, the one appearing earliest in this
/// list wins — regardless of where each keyword sits in the text.
pub const URGENT_KEYWORDS: [&str; 10] = [
    "accident",
    "fire",
    "fight",
    "harassment",
    "theft",
    "safety",
    "injury",
    "medical",
    "emergency",
    "threat",
];

/// Urgency verdict for one complaint.
///
/// `urgent` is true exactly when `reason` is a member of [`URGENT_KEYWORDS`];
/// otherwise `reason` is the literal `"normal"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub urgent: bool,
    pub reason: String,
}

/// Rule-based urgency check. Matching is case-insensitive substring
/// containment. Pure and infallible.
pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    for keyword in URGENT_KEYWORDS {
        if lowered.contains(keyword) {
            return Classification {
                urgent: true,
                reason: keyword.to_string(),
            };
        }
    }
    Classification {
        urgent: false,
        reason: "normal".to_string(),
    }
}
