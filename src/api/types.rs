use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::SearchService;

pub struct AppState {
    pub search: SearchService,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
