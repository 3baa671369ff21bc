use std::sync::Arc;

use raildesk_core::handler::ComplaintHandler;
use raildesk_core::store::LogStore;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ComplaintHandler>,
    pub store: LogStore,
}
