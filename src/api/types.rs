//! Shared types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::models::HistoryRecord;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Body of `PUT /api/connectivity`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityRequest {
    pub online: bool,
}

/// Query of `GET /api/history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: usize,
    pub records: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub removed: usize,
}
