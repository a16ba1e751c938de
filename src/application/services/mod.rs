pub mod analytics_service;
pub mod trade_service;
