use crate::config::Config;
use crate::service::SubmissionService;
use std::sync::Arc;

pub struct AppState {
    pub service: SubmissionService,
    pub config: Arc<Config>,
}
