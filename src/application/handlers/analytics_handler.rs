use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::state::AppState;
use crate::domain::entities::analytics::UserAnalytics;
use crate::domain::errors::ApiError;
use crate::domain::services::leaderboard::LeaderboardEntry;
use crate::domain::services::metrics::MetricsSummary;

/// Body of a recalculation request
#[derive(Debug, Serialize, Deserialize)]
pub struct RecalculateRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecalculateResponse {
    pub success: bool,
    pub metrics: MetricsSummary,
}

/// Query parameters for the leaderboard endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    /// Number of entries (default from config, clamped to 1..=100)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub limit: usize,
    pub min_trades: u32,
}

/// Recompute a user's metrics from their trades and cache the result
pub async fn recalculate_analytics(
    State(state): State<AppState>,
    payload: Result<Json<RecalculateRequest>, JsonRejection>,
) -> Result<Json<RecalculateResponse>, ApiError> {
    let Json(request) = payload?;
    let metrics = state.analytics.recalculate(&request.user_id).await?;

    Ok(Json(RecalculateResponse {
        success: true,
        metrics,
    }))
}

/// Last computed metrics for a user
pub async fn get_user_analytics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserAnalytics>, ApiError> {
    Ok(Json(state.analytics.summary(&user_id).await?))
}

/// Ranked users by cached total pnl
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let limit = state.config.leaderboard_limit(params.limit);
    let entries = state.analytics.leaderboard(limit).await?;

    Ok(Json(LeaderboardResponse {
        entries,
        limit,
        min_trades: state.config.leaderboard_min_trades,
    }))
}
