//! Shared types for the API layer.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::core_state::CoreState;
use crate::db;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Wall-clock time used for recording and trend windows, at the
    /// precision timestamps are stored with.
    pub fn now(&self) -> NaiveDateTime {
        db::to_storage_precision(chrono::Local::now().naive_local())
    }
}
