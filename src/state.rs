use std::sync::Arc;

use crate::{repository::SubmissionRepository, upload::UploadHandler};

/// Everything a request handler needs, built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub submission_repository: Arc<SubmissionRepository>,
    pub upload_handler: Arc<UploadHandler>,
}
