//! Database Models
//!
//! Row types for trades and cached analytics, and their conversion into
//! domain entities.

use crate::domain::entities::analytics::UserAnalytics;
use crate::domain::entities::trade::{PositionSide, Trade};
use crate::domain::errors::GatewayError;
use crate::domain::services::metrics::MetricsSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Trade record in database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TradeRecord {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub position: String, // "long" or "short"
    pub entry_date: DateTime<Utc>,
    pub exit_date: Option<DateTime<Utc>>,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub pnl: Option<f64>,
    pub fees: Option<f64>,
    pub strategy: Option<String>,
    pub broker: Option<String>,
    pub notes: Option<String>,
    pub tags: String, // JSON array
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = GatewayError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        let position = record
            .position
            .parse::<PositionSide>()
            .map_err(|e| GatewayError::Malformed(format!("trade {}: {}", record.id, e)))?;

        let tags: Vec<String> = serde_json::from_str(&record.tags).map_err(|e| {
            GatewayError::Malformed(format!("trade {}: invalid tags: {}", record.id, e))
        })?;

        Ok(Trade {
            id: record.id,
            user_id: record.user_id,
            symbol: record.symbol,
            position,
            entry_date: record.entry_date,
            exit_date: record.exit_date,
            entry_price: record.entry_price,
            exit_price: record.exit_price,
            quantity: record.quantity,
            pnl: record.pnl,
            fees: record.fees,
            strategy: record.strategy,
            broker: record.broker,
            notes: record.notes,
            tags,
        })
    }
}

/// Cached analytics record in database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalyticsRecord {
    pub user_id: String,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub profit_factor: f64,
    pub total_trades: i64,
    pub winning_trades: i64,
    pub losing_trades: i64,
    pub computed_at: DateTime<Utc>,
}

impl TryFrom<AnalyticsRecord> for UserAnalytics {
    type Error = GatewayError;

    fn try_from(record: AnalyticsRecord) -> Result<Self, Self::Error> {
        let to_count = |value: i64, column: &str| {
            u32::try_from(value).map_err(|_| {
                GatewayError::Malformed(format!(
                    "analytics {}: {} out of range: {}",
                    record.user_id, column, value
                ))
            })
        };

        let metrics = MetricsSummary {
            win_rate: record.win_rate,
            total_pnl: record.total_pnl,
            largest_win: record.largest_win,
            largest_loss: record.largest_loss,
            average_win: record.average_win,
            average_loss: record.average_loss,
            profit_factor: record.profit_factor,
            total_trades: to_count(record.total_trades, "total_trades")?,
            winning_trades: to_count(record.winning_trades, "winning_trades")?,
            losing_trades: to_count(record.losing_trades, "losing_trades")?,
        };

        Ok(UserAnalytics {
            user_id: record.user_id,
            metrics,
            computed_at: record.computed_at,
        })
    }
}
