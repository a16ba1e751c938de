//! Trade Journal Analytics Library
//!
//! Trade logging, per-user performance metrics and a pnl leaderboard,
//! served over HTTP and backed by SQLite.

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod persistence;
pub mod rate_limit;
