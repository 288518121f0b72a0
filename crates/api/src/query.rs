//! Shared query parameter types for API handlers.

use serde::Deserialize;
use servicecore_core::types::DbId;

/// `?project_id=` filter shared by task and kanban listings.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectScope {
    pub project_id: Option<DbId>,
}
