//! Handler for the `/home` dashboard.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use servicecore_core::dashboard::sla_compliance_percent;
use servicecore_db::models::dashboard::{DashboardCounts, StaleTicket};
use servicecore_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many stale tickets the dashboard lists.
const STALE_TICKET_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct HomeDashboard {
    #[serde(flatten)]
    pub counts: DashboardCounts,
    pub sla_compliance_percent: f64,
    pub stale_tickets: Vec<StaleTicket>,
}

/// GET /api/v1/home
pub async fn dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<HomeDashboard>>> {
    let now = Utc::now();
    let counts = DashboardRepo::counts(&state.pool, now).await?;
    let stale_tickets = DashboardRepo::stale_tickets(&state.pool, now, STALE_TICKET_LIMIT).await?;
    let sla = sla_compliance_percent(counts.finished_tickets, counts.finished_on_time);

    Ok(Json(DataResponse::new(HomeDashboard {
        counts,
        sla_compliance_percent: sla,
        stale_tickets,
    })))
}
