//! In-memory [`TradeStore`] used by tests and `DATABASE_URL=memory` runs.

use crate::domain::entities::analytics::UserAnalytics;
use crate::domain::entities::trade::Trade;
use crate::domain::errors::GatewayError;
use crate::domain::repositories::trade_store::{GatewayResult, TradeStore};
use crate::domain::services::leaderboard;
use crate::domain::services::metrics::MetricsSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryTradeStore {
    trades: RwLock<HashMap<String, Vec<Trade>>>,
    analytics: RwLock<HashMap<String, UserAnalytics>>,
}

impl InMemoryTradeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TradeStore for InMemoryTradeStore {
    async fn fetch_trades(&self, user_id: &str) -> GatewayResult<Vec<Trade>> {
        let trades = self.trades.read().await;
        let mut result = trades.get(user_id).cloned().unwrap_or_default();
        result.sort_by(|a, b| a.entry_date.cmp(&b.entry_date).then_with(|| a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn insert_trade(&self, trade: &Trade) -> GatewayResult<()> {
        let mut trades = self.trades.write().await;
        if trades.values().flatten().any(|t| t.id == trade.id) {
            return Err(GatewayError::WriteFailed(format!(
                "Trade {} already exists",
                trade.id
            )));
        }
        trades
            .entry(trade.user_id.clone())
            .or_default()
            .push(trade.clone());
        Ok(())
    }

    async fn delete_trade(&self, user_id: &str, trade_id: &str) -> GatewayResult<()> {
        let mut trades = self.trades.write().await;
        let not_found = || {
            GatewayError::NotFound(format!(
                "Trade {} not found for user {}",
                trade_id, user_id
            ))
        };

        let user_trades = trades.get_mut(user_id).ok_or_else(not_found)?;
        let before = user_trades.len();
        user_trades.retain(|t| t.id != trade_id);
        if user_trades.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn upsert_summary(
        &self,
        user_id: &str,
        summary: &MetricsSummary,
        computed_at: DateTime<Utc>,
    ) -> GatewayResult<()> {
        self.analytics.write().await.insert(
            user_id.to_string(),
            UserAnalytics {
                user_id: user_id.to_string(),
                metrics: *summary,
                computed_at,
            },
        );
        Ok(())
    }

    async fn get_summary(&self, user_id: &str) -> GatewayResult<Option<UserAnalytics>> {
        Ok(self.analytics.read().await.get(user_id).cloned())
    }

    async fn top_summaries(&self, min_trades: u32, limit: usize) -> GatewayResult<Vec<UserAnalytics>> {
        let mut records: Vec<UserAnalytics> = self
            .analytics
            .read()
            .await
            .values()
            .filter(|a| a.metrics.total_trades >= min_trades)
            .cloned()
            .collect();
        records.sort_by(leaderboard::compare);
        records.truncate(limit);
        Ok(records)
    }
}
