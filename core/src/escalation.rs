//! Emergency fast path. Escalation is additive: the report lands in the
//! dedicated emergency log first, then runs through the standard pipeline
//! for the reply and the regular general/summary logging.

use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::error::StoreError;
use crate::handler::ComplaintHandler;
use crate::records::{EmergencyEntry, now_stamp};
use crate::store::LogCategory;

/// Fixed acknowledgment used when the standard pipeline cannot produce a
/// response after the emergency record is already durable.
const ESCALATION_ACK: &str =
    "Emergency complaint received and escalated to railway authorities immediately.";

const ESCALATION_ALERT: &str = "Emergency complaint escalated to authorities";

/// Result of an emergency escalation. `urgent` is always true and `reason`
/// is always `"emergency"`, whatever the classifier would have said.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EscalationOutcome {
    pub response: String,
    pub urgent: bool,
    pub reason: String,
    pub alert: String,
    /// Human-readable reference derived from the timestamp. Unique at
    /// second granularity under single-writer use only; concurrent
    /// escalations within the same second can collide.
    pub reference_id: String,
}

/// Escalate an emergency report.
///
/// Failing to write the emergency record is fatal — nothing was recorded.
/// A pipeline failure after that point degrades to the fixed acknowledgment
/// instead: the escalation itself is already on disk.
pub async fn escalate(
    handler: &ComplaintHandler,
    complaint: &str,
) -> Result<EscalationOutcome, StoreError> {
    let timestamp = now_stamp();
    let store = handler.store().clone();
    let record = EmergencyEntry::new(&timestamp, complaint);
    tokio::task::spawn_blocking(move || store.append(LogCategory::Emergency, &record))
        .await
        .expect("emergency log write task panicked")?;

    let response = match handler.handle(complaint).await {
        Ok(outcome) => outcome.response,
        Err(err) => {
            error!(%err, "standard pipeline failed after emergency record was written");
            ESCALATION_ACK.to_string()
        }
    };

    error!(complaint, "EMERGENCY COMPLAINT escalated");

    Ok(EscalationOutcome {
        response,
        urgent: true,
        reason: "emergency".to_string(),
        alert: ESCALATION_ALERT.to_string(),
        reference_id: reference_id(&timestamp),
    })
}

/// `EMR-` plus the timestamp with spaces turned into dashes and colons
/// removed, e.g. `EMR-2026-08-23-141503`.
pub fn reference_id(timestamp: &str) -> String {
    format!("EMR-{}", timestamp.replace(' ', "-").replace(':', ""))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{escalate, reference_id};
    use crate::handler::ComplaintHandler;
    use crate::llm::{LlmError, ReplyGenerator};
    use crate::store::{LogCategory, LogStore};

    struct CannedReply(&'static str);

    #[async_trait]
    impl ReplyGenerator for CannedReply {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_text: &str,
            _temperature: f64,
        ) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn reference_id_strips_separators() {
        assert_eq!(
            reference_id("2026-08-23 14:15:03"),
            "EMR-2026-08-23-141503"
        );
    }

    #[tokio::test]
    async fn escalation_forces_emergency_reason_and_writes_dedicated_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        let handler = ComplaintHandler::new(store, Arc::new(CannedReply("Help is on the way.")));

        let outcome = escalate(&handler, "explosion near platform 2").await.unwrap();

        assert!(outcome.urgent);
        assert_eq!(outcome.reason, "emergency");
        assert_eq!(outcome.response, "Help is on the way.");
        assert!(outcome.reference_id.starts_with("EMR-"));
        assert!(!outcome.reference_id.contains(' '));
        assert!(!outcome.reference_id.contains(':'));

        let emergencies = handler.store().read(LogCategory::Emergency).unwrap();
        assert_eq!(emergencies.len(), 1);
        assert_eq!(emergencies[0]["priority"], "CRITICAL");
        assert_eq!(emergencies[0]["type"], "EMERGENCY");
        assert_eq!(emergencies[0]["complaint"], "explosion near platform 2");

        // The standard pipeline also ran: general log gained an entry.
        assert_eq!(handler.store().read(LogCategory::General).unwrap().len(), 1);
    }
}
