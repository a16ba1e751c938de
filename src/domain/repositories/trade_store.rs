//! Trade Store Trait
//!
//! Port between the analytics workflow and whatever backs the journal.
//! The SQLite repository is the production implementation; the in-memory
//! store backs tests and throwaway local runs.

use crate::domain::entities::analytics::UserAnalytics;
use crate::domain::entities::trade::Trade;
use crate::domain::errors::GatewayError;
use crate::domain::services::metrics::MetricsSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Common result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[async_trait]
pub trait TradeStore: Send + Sync {
    /// All trades logged by a user, oldest entry first
    async fn fetch_trades(&self, user_id: &str) -> GatewayResult<Vec<Trade>>;

    /// Persist a validated trade
    async fn insert_trade(&self, trade: &Trade) -> GatewayResult<()>;

    /// Remove one of a user's trades
    ///
    /// # Errors
    /// `GatewayError::NotFound` when the user has no trade with that id
    async fn delete_trade(&self, user_id: &str, trade_id: &str) -> GatewayResult<()>;

    /// Overwrite the cached summary for a user
    async fn upsert_summary(
        &self,
        user_id: &str,
        summary: &MetricsSummary,
        computed_at: DateTime<Utc>,
    ) -> GatewayResult<()>;

    /// Cached summary for a user, if one was ever computed
    async fn get_summary(&self, user_id: &str) -> GatewayResult<Option<UserAnalytics>>;

    /// Cached summaries with at least `min_trades` trades, in leaderboard order
    async fn top_summaries(&self, min_trades: u32, limit: usize) -> GatewayResult<Vec<UserAnalytics>>;

    /// Check the store is reachable
    async fn is_healthy(&self) -> bool {
        true
    }
}
