//! Leaderboard ranking over cached user analytics.

use crate::domain::entities::analytics::UserAnalytics;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked row of the public leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub total_pnl: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub total_trades: u32,
}

/// Leaderboard order: total pnl desc, then win rate desc, then user id asc
pub fn compare(a: &UserAnalytics, b: &UserAnalytics) -> Ordering {
    b.metrics
        .total_pnl
        .total_cmp(&a.metrics.total_pnl)
        .then_with(|| b.metrics.win_rate.total_cmp(&a.metrics.win_rate))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort, filter by minimum trade count, truncate and number the entries
pub fn rank(mut records: Vec<UserAnalytics>, min_trades: u32, limit: usize) -> Vec<LeaderboardEntry> {
    records.retain(|r| r.metrics.total_trades >= min_trades);
    records.sort_by(compare);

    records
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, r)| LeaderboardEntry {
            rank: u32::try_from(i + 1).unwrap_or(u32::MAX),
            user_id: r.user_id,
            total_pnl: r.metrics.total_pnl,
            win_rate: r.metrics.win_rate,
            profit_factor: r.metrics.profit_factor,
            total_trades: r.metrics.total_trades,
        })
        .collect()
}
