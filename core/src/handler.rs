use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::classify::{Classification, classify};
use crate::error::StoreError;
use crate::llm::ReplyGenerator;
use crate::records::{LogEntry, SummaryEntry, now_stamp};
use crate::store::{LogCategory, LogStore};

/// Persona and policy sent with every reply request.
pub const SYSTEM_PROMPT: &str = "You are a Railway Complaint Analyzer AI. \
Your job is to listen carefully to passenger complaints, \
record them clearly, and maintain a structured log. \
If a complaint is serious (safety, harassment, medical, accident, fire, etc.), \
flag it as URGENT and summarize it in one short line for immediate action. \
If the issue is normal (maintenance, cleanliness, comfort, etc.), \
save it separately as a NORMAL complaint log. \
Always respond politely and empathetically, making the user feel heard.";

/// Sampling temperature for every reply request.
pub const REPLY_TEMPERATURE: f64 = 0.7;

/// Structured result returned to the caller for one handled complaint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplaintOutcome {
    /// Reply shown to the passenger (generated or fallback)
    pub response: String,
    /// Whether the complaint was classified urgent
    pub urgent: bool,
    /// Matched urgent keyword, or "normal"
    pub reason: String,
}

/// Orchestrates classification, reply acquisition, and log persistence.
///
/// Callers must reject empty complaint text before invoking [`handle`];
/// the handler itself fails only when an entry cannot be durably recorded.
///
/// [`handle`]: ComplaintHandler::handle
pub struct ComplaintHandler {
    store: LogStore,
    generator: Arc<dyn ReplyGenerator>,
}

impl ComplaintHandler {
    pub fn new(store: LogStore, generator: Arc<dyn ReplyGenerator>) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Handle one complaint end to end: classify, obtain a reply (falling
    /// back to a deterministic template when the backend fails), append the
    /// full entry to the general log and a one-line summary to the urgent or
    /// normal log.
    ///
    /// Single attempt, no retries. Two file writes per call.
    pub async fn handle(&self, complaint: &str) -> Result<ComplaintOutcome, StoreError> {
        let timestamp = now_stamp();
        let classification = classify(complaint);

        let response = match self
            .generator
            .generate(SYSTEM_PROMPT, complaint, REPLY_TEMPERATURE)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, "generative backend unavailable, using fallback reply");
                fallback_reply(&classification, &timestamp)
            }
        };

        let entry = LogEntry {
            timestamp: timestamp.clone(),
            complaint: complaint.to_string(),
            response: response.clone(),
            urgent: classification.urgent,
            reason: classification.reason.clone(),
        };
        let (category, summary) = if classification.urgent {
            (
                LogCategory::Urgent,
                SummaryEntry::urgent(&timestamp, &classification.reason, complaint),
            )
        } else {
            (
                LogCategory::Normal,
                SummaryEntry::normal(&timestamp, complaint),
            )
        };

        // File I/O stays off the async worker threads.
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            store.append(LogCategory::General, &entry)?;
            store.append(category, &summary)
        })
        .await
        .expect("complaint log write task panicked")?;

        Ok(ComplaintOutcome {
            response,
            urgent: classification.urgent,
            reason: classification.reason,
        })
    }
}

/// Deterministic reply used whenever the backend call fails. Never fails,
/// so the passenger always gets an answer.
fn fallback_reply(classification: &Classification, timestamp: &str) -> String {
    if classification.urgent {
        format!(
            "Thank you for reporting this {} issue. This has been marked as URGENT \
             and will be escalated to railway authorities immediately. \
             Your complaint has been logged with timestamp {}.",
            classification.reason, timestamp
        )
    } else {
        format!(
            "Thank you for your complaint. We have recorded your concern about \
             railway services. Your feedback is valuable and will be addressed \
             by the appropriate department. Complaint logged at {}.",
            timestamp
        )
    }
}
