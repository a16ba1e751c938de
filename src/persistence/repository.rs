//! Database Repository
//!
//! SQLite implementation of the [`TradeStore`] gateway.

use super::models::{AnalyticsRecord, TradeRecord};
use super::DbPool;
use crate::domain::entities::analytics::UserAnalytics;
use crate::domain::entities::trade::Trade;
use crate::domain::errors::GatewayError;
use crate::domain::repositories::trade_store::{GatewayResult, TradeStore};
use crate::domain::services::metrics::MetricsSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error};

/// Trade and analytics repository backed by SQLite
#[derive(Clone)]
pub struct SqliteTradeStore {
    pool: DbPool,
}

impl SqliteTradeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx failure onto the gateway taxonomy.
///
/// Connection-level failures are transient; decode failures mean a bad row;
/// anything else falls back to `otherwise`.
fn classify(e: sqlx::Error, otherwise: fn(String) -> GatewayError) -> GatewayError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            GatewayError::Unavailable(e.to_string())
        }
        sqlx::Error::RowNotFound => GatewayError::NotFound(e.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => GatewayError::Malformed(e.to_string()),
        other => otherwise(other.to_string()),
    }
}

#[async_trait]
impl TradeStore for SqliteTradeStore {
    async fn fetch_trades(&self, user_id: &str) -> GatewayResult<Vec<Trade>> {
        let records = sqlx::query_as::<_, TradeRecord>(
            "SELECT * FROM trades WHERE user_id = ?1 ORDER BY entry_date ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch trades for {}: {}", user_id, e);
            classify(e, GatewayError::Unavailable)
        })?;

        let trades = records
            .into_iter()
            .map(Trade::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Fetched {} trades for {}", trades.len(), user_id);
        Ok(trades)
    }

    async fn insert_trade(&self, trade: &Trade) -> GatewayResult<()> {
        let tags = serde_json::to_string(&trade.tags)
            .map_err(|e| GatewayError::WriteFailed(format!("Failed to serialize tags: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO trades (
                id, user_id, symbol, position, entry_date, exit_date,
                entry_price, exit_price, quantity, pnl, fees,
                strategy, broker, notes, tags, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&trade.id)
        .bind(&trade.user_id)
        .bind(&trade.symbol)
        .bind(trade.position.as_str())
        .bind(trade.entry_date)
        .bind(trade.exit_date)
        .bind(trade.entry_price)
        .bind(trade.exit_price)
        .bind(trade.quantity)
        .bind(trade.pnl)
        .bind(trade.fees)
        .bind(&trade.strategy)
        .bind(&trade.broker)
        .bind(&trade.notes)
        .bind(&tags)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert trade {}: {}", trade.id, e);
            classify(e, GatewayError::WriteFailed)
        })?;

        debug!("Inserted trade {} for {}", trade.id, trade.user_id);
        Ok(())
    }

    async fn delete_trade(&self, user_id: &str, trade_id: &str) -> GatewayResult<()> {
        let rows_affected = sqlx::query("DELETE FROM trades WHERE id = ?1 AND user_id = ?2")
            .bind(trade_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete trade {}: {}", trade_id, e);
                classify(e, GatewayError::WriteFailed)
            })?
            .rows_affected();

        if rows_affected == 0 {
            return Err(GatewayError::NotFound(format!(
                "Trade {} not found for user {}",
                trade_id, user_id
            )));
        }

        debug!("Deleted trade {} for {}", trade_id, user_id);
        Ok(())
    }

    async fn upsert_summary(
        &self,
        user_id: &str,
        summary: &MetricsSummary,
        computed_at: DateTime<Utc>,
    ) -> GatewayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_analytics (
                user_id, win_rate, total_pnl, largest_win, largest_loss,
                average_win, average_loss, profit_factor,
                total_trades, winning_trades, losing_trades, computed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(user_id) DO UPDATE SET
                win_rate = excluded.win_rate,
                total_pnl = excluded.total_pnl,
                largest_win = excluded.largest_win,
                largest_loss = excluded.largest_loss,
                average_win = excluded.average_win,
                average_loss = excluded.average_loss,
                profit_factor = excluded.profit_factor,
                total_trades = excluded.total_trades,
                winning_trades = excluded.winning_trades,
                losing_trades = excluded.losing_trades,
                computed_at = excluded.computed_at
            "#,
        )
        .bind(user_id)
        .bind(summary.win_rate)
        .bind(summary.total_pnl)
        .bind(summary.largest_win)
        .bind(summary.largest_loss)
        .bind(summary.average_win)
        .bind(summary.average_loss)
        .bind(summary.profit_factor)
        .bind(i64::from(summary.total_trades))
        .bind(i64::from(summary.winning_trades))
        .bind(i64::from(summary.losing_trades))
        .bind(computed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to upsert analytics for {}: {}", user_id, e);
            classify(e, GatewayError::WriteFailed)
        })?;

        debug!("Upserted analytics for {}", user_id);
        Ok(())
    }

    async fn get_summary(&self, user_id: &str) -> GatewayResult<Option<UserAnalytics>> {
        let record = sqlx::query_as::<_, AnalyticsRecord>(
            "SELECT * FROM user_analytics WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get analytics for {}: {}", user_id, e);
            classify(e, GatewayError::Unavailable)
        })?;

        record.map(UserAnalytics::try_from).transpose()
    }

    async fn top_summaries(&self, min_trades: u32, limit: usize) -> GatewayResult<Vec<UserAnalytics>> {
        let records = sqlx::query_as::<_, AnalyticsRecord>(
            r#"
            SELECT * FROM user_analytics
            WHERE total_trades >= ?1
            ORDER BY total_pnl DESC, win_rate DESC, user_id ASC
            LIMIT ?2
            "#,
        )
        .bind(i64::from(min_trades))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to load leaderboard: {}", e);
            classify(e, GatewayError::Unavailable)
        })?;

        records.into_iter().map(UserAnalytics::try_from).collect()
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
