use crate::application::services::analytics_service::AnalyticsService;
use crate::application::services::trade_service::TradeService;
use crate::config::ServerConfig;
use crate::domain::repositories::trade_store::TradeStore;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub analytics: Arc<AnalyticsService>,
    pub trades: Arc<TradeService>,
    pub store: Arc<dyn TradeStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn TradeStore>, config: ServerConfig) -> Self {
        Self {
            analytics: Arc::new(AnalyticsService::new(
                store.clone(),
                config.leaderboard_min_trades,
            )),
            trades: Arc::new(TradeService::new(store.clone())),
            store,
            config: Arc::new(config),
        }
    }
}
