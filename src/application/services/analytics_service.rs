//! Analytics workflow: fetch a user's trades, compute metrics, cache them.
//!
//! Failures are reported, never retried here; a caller that wants a retry
//! reruns the whole fetch-compute-store cycle.

use crate::config::LEADERBOARD_MAX_LIMIT;
use crate::domain::entities::analytics::UserAnalytics;
use crate::domain::entities::trade::validate_user_id;
use crate::domain::errors::{GatewayError, ValidationError};
use crate::domain::repositories::trade_store::TradeStore;
use crate::domain::services::leaderboard::{self, LeaderboardEntry};
use crate::domain::services::metrics::{compute_metrics, MetricsSummary};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("No trades found for user {0}")]
    NoTrades(String),

    #[error("No analytics computed for user {0}")]
    NotComputed(String),

    #[error("Failed to fetch trades: {0}")]
    FetchFailed(GatewayError),

    #[error("Failed to store analytics: {0}")]
    StoreFailed(GatewayError),
}

pub struct AnalyticsService {
    store: Arc<dyn TradeStore>,
    leaderboard_min_trades: u32,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn TradeStore>, leaderboard_min_trades: u32) -> Self {
        Self {
            store,
            leaderboard_min_trades,
        }
    }

    /// Recompute and cache the metrics for one user
    ///
    /// # Errors
    /// - `InvalidInput` for a blank user id
    /// - `NoTrades` when the user has not logged anything
    /// - `FetchFailed` / `StoreFailed` when the gateway fails
    pub async fn recalculate(&self, user_id: &str) -> Result<MetricsSummary, AnalyticsError> {
        let user_id = validate_user_id(user_id)?;

        let trades = self.store.fetch_trades(&user_id).await.map_err(|e| {
            error!(user_id = %user_id, error = %e, "Failed to fetch trades");
            AnalyticsError::FetchFailed(e)
        })?;

        if trades.is_empty() {
            warn!(user_id = %user_id, "No trades to compute metrics from");
            return Err(AnalyticsError::NoTrades(user_id));
        }

        let summary = compute_metrics(&trades);

        self.store
            .upsert_summary(&user_id, &summary, Utc::now())
            .await
            .map_err(|e| {
                error!(user_id = %user_id, error = %e, "Failed to store analytics");
                AnalyticsError::StoreFailed(e)
            })?;

        info!(
            user_id = %user_id,
            trade_count = trades.len(),
            total_pnl = summary.total_pnl,
            win_rate = summary.win_rate,
            "Recalculated trade metrics"
        );

        Ok(summary)
    }

    /// Last cached metrics for a user
    pub async fn summary(&self, user_id: &str) -> Result<UserAnalytics, AnalyticsError> {
        let user_id = validate_user_id(user_id)?;

        self.store
            .get_summary(&user_id)
            .await
            .map_err(AnalyticsError::FetchFailed)?
            .ok_or(AnalyticsError::NotComputed(user_id))
    }

    /// Top users by cached total pnl; `limit` is clamped to 1..=100
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AnalyticsError> {
        let limit = limit.clamp(1, LEADERBOARD_MAX_LIMIT);
        let records = self
            .store
            .top_summaries(self.leaderboard_min_trades, limit)
            .await
            .map_err(AnalyticsError::FetchFailed)?;

        Ok(leaderboard::rank(records, self.leaderboard_min_trades, limit))
    }
}
