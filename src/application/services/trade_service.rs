//! Trade journal operations: log, list and delete trades.

use crate::domain::entities::trade::{validate_user_id, NewTrade, Trade};
use crate::domain::errors::{GatewayError, ValidationError};
use crate::domain::repositories::trade_store::TradeStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TradeError {
    #[error("Invalid trade: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub struct TradeService {
    store: Arc<dyn TradeStore>,
}

impl TradeService {
    pub fn new(store: Arc<dyn TradeStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new trade, assigning it a fresh id
    pub async fn log_trade(&self, payload: NewTrade) -> Result<Trade, TradeError> {
        let trade = payload.into_trade(Uuid::new_v4().to_string())?;
        self.store.insert_trade(&trade).await?;

        info!(
            user_id = %trade.user_id,
            trade_id = %trade.id,
            symbol = %trade.symbol,
            "Logged trade"
        );
        Ok(trade)
    }

    pub async fn list_trades(&self, user_id: &str) -> Result<Vec<Trade>, TradeError> {
        let user_id = validate_user_id(user_id)?;
        Ok(self.store.fetch_trades(&user_id).await?)
    }

    pub async fn delete_trade(&self, user_id: &str, trade_id: &str) -> Result<(), TradeError> {
        let user_id = validate_user_id(user_id)?;
        self.store.delete_trade(&user_id, trade_id).await?;
        info!(user_id = %user_id, trade_id = %trade_id, "Deleted trade");
        Ok(())
    }
}
