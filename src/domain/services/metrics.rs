//! Trade performance metrics
//!
//! Reduces a user's journal to a [`MetricsSummary`]. The computation is
//! total: empty input, open trades and rows with a missing or non-finite
//! `pnl` degrade to exclusion, never to an error.

use crate::domain::entities::trade::Trade;
use crate::domain::value_objects::pnl::PnL;
use serde::{Deserialize, Serialize};

/// Profit factor reported when there are winning trades but no losses.
///
/// A finite stand-in for "unbounded" so the value survives JSON and SQL.
pub const PROFIT_FACTOR_CAP: f64 = 999.0;

/// Aggregate performance statistics for one user's trades
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Percentage of valid trades with positive pnl (0.0 to 100.0)
    pub win_rate: f64,
    /// Sum of pnl over valid trades
    pub total_pnl: f64,
    /// Best winning trade, 0 if none
    pub largest_win: f64,
    /// Worst losing trade (negative), 0 if none
    pub largest_loss: f64,
    pub average_win: f64,
    /// Mean loss as a positive magnitude
    pub average_loss: f64,
    /// Gross profit / gross loss, or [`PROFIT_FACTOR_CAP`] when nothing was lost
    pub profit_factor: f64,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
}

impl MetricsSummary {
    /// Replace every non-finite field with zero
    pub fn sanitized(self) -> Self {
        Self {
            win_rate: sanitize(self.win_rate),
            total_pnl: sanitize(self.total_pnl),
            largest_win: sanitize(self.largest_win),
            largest_loss: sanitize(self.largest_loss),
            average_win: sanitize(self.average_win),
            average_loss: sanitize(self.average_loss),
            profit_factor: sanitize(self.profit_factor),
            ..self
        }
    }

    /// Expected pnl per trade: avg win * win rate - avg loss * loss rate
    pub fn expectancy(&self) -> f64 {
        if self.total_trades == 0 {
            return 0.0;
        }
        let win_rate = self.win_rate / 100.0;
        let loss_rate = self.losing_trades as f64 / self.total_trades as f64;
        sanitize(self.average_win * win_rate - self.average_loss * loss_rate)
    }

    /// True when the profit factor is the sentinel rather than a real ratio
    pub fn has_unbounded_profit_factor(&self) -> bool {
        self.losing_trades == 0 && self.profit_factor == PROFIT_FACTOR_CAP
    }
}

/// Clamp a non-finite value to zero
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Compute summary statistics over a user's trades.
///
/// `total_trades` counts trades with a valid pnl, except when none are valid:
/// then it reports the raw input length and every other field is zero.
/// Stored analytics rely on that asymmetry, so it is kept.
pub fn compute_metrics(trades: &[Trade]) -> MetricsSummary {
    if trades.is_empty() {
        return MetricsSummary::default();
    }

    let mut realized: Vec<PnL> = trades.iter().filter_map(Trade::realized_pnl).collect();
    if realized.is_empty() {
        return MetricsSummary {
            total_trades: count(trades.len()),
            ..MetricsSummary::default()
        };
    }

    // Fixed summation order keeps the result independent of input order.
    realized.sort_by(|a, b| a.value().total_cmp(&b.value()));

    let mut acc = Accumulator::default();
    for pnl in &realized {
        acc.record(*pnl);
    }
    acc.finish(realized.len()).sanitized()
}

#[derive(Debug, Default)]
struct Accumulator {
    total: PnL,
    gross_profit: PnL,
    gross_loss: PnL,
    winning_trades: u32,
    losing_trades: u32,
    largest_win: f64,
    largest_loss: f64,
}

impl Accumulator {
    fn record(&mut self, pnl: PnL) {
        self.total = self.total.saturating_accumulate(pnl);

        if pnl.is_profit() {
            self.winning_trades += 1;
            self.gross_profit = self.gross_profit.saturating_accumulate(pnl);
            self.largest_win = self.largest_win.max(pnl.value());
        } else if pnl.is_loss() {
            self.losing_trades += 1;
            self.gross_loss = self.gross_loss.saturating_accumulate(pnl);
            self.largest_loss = self.largest_loss.min(pnl.value());
        }
    }

    fn finish(self, valid_trades: usize) -> MetricsSummary {
        let gross_profit = self.gross_profit.value();
        let gross_loss = self.gross_loss.abs();

        let average_win = if self.winning_trades > 0 {
            gross_profit / self.winning_trades as f64
        } else {
            0.0
        };
        let average_loss = if self.losing_trades > 0 {
            gross_loss / self.losing_trades as f64
        } else {
            0.0
        };

        let win_rate = if valid_trades > 0 {
            self.winning_trades as f64 / valid_trades as f64 * 100.0
        } else {
            0.0
        };

        MetricsSummary {
            win_rate,
            total_pnl: self.total.value(),
            largest_win: self.largest_win,
            largest_loss: self.largest_loss,
            average_win,
            average_loss,
            profit_factor: profit_factor(gross_profit, gross_loss),
            total_trades: count(valid_trades),
            winning_trades: self.winning_trades,
            losing_trades: self.losing_trades,
        }
    }
}

fn profit_factor(gross_profit: f64, gross_loss: f64) -> f64 {
    if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        PROFIT_FACTOR_CAP
    } else {
        0.0
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::trade::PositionSide;
    use chrono::{TimeZone, Utc};

    fn trade(pnl: Option<f64>) -> Trade {
        Trade {
            id: format!("t-{:?}", pnl),
            user_id: "user-1".to_string(),
            symbol: "ES".to_string(),
            position: PositionSide::Long,
            entry_date: Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap(),
            exit_date: pnl.map(|_| Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap()),
            entry_price: 4800.0,
            exit_price: None,
            quantity: 1.0,
            pnl,
            fees: None,
            strategy: None,
            broker: None,
            notes: None,
            tags: vec![],
        }
    }

    fn trades(pnls: &[Option<f64>]) -> Vec<Trade> {
        pnls.iter().map(|p| trade(*p)).collect()
    }

    fn assert_all_finite(summary: &MetricsSummary) {
        for value in [
            summary.win_rate,
            summary.total_pnl,
            summary.largest_win,
            summary.largest_loss,
            summary.average_win,
            summary.average_loss,
            summary.profit_factor,
        ] {
            assert!(value.is_finite(), "non-finite field in {:?}", summary);
        }
    }

    #[test]
    fn test_empty_input_is_zero_summary() {
        assert_eq!(compute_metrics(&[]), MetricsSummary::default());
    }

    #[test]
    fn test_mixed_wins_and_losses() {
        let summary = compute_metrics(&trades(&[Some(100.0), Some(-50.0), Some(50.0)]));

        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.winning_trades, 2);
        assert_eq!(summary.losing_trades, 1);
        assert_eq!(summary.total_pnl, 100.0);
        assert_eq!(summary.largest_win, 100.0);
        assert_eq!(summary.largest_loss, -50.0);
        assert_eq!(summary.average_win, 75.0);
        assert_eq!(summary.average_loss, 50.0);
        assert_eq!(summary.profit_factor, 3.0);
        assert!((summary.win_rate - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_all_null_pnl_keeps_raw_count() {
        let summary = compute_metrics(&trades(&[None, None]));

        assert_eq!(
            summary,
            MetricsSummary {
                total_trades: 2,
                ..MetricsSummary::default()
            }
        );
    }

    #[test]
    fn test_non_finite_pnl_is_excluded() {
        let summary = compute_metrics(&trades(&[
            Some(f64::NAN),
            Some(f64::INFINITY),
            Some(f64::NEG_INFINITY),
            Some(20.0),
            None,
        ]));

        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.total_pnl, 20.0);
        assert_eq!(summary.win_rate, 100.0);
    }

    #[test]
    fn test_only_non_finite_counts_like_null() {
        let summary = compute_metrics(&trades(&[Some(f64::NAN), Some(f64::INFINITY), None]));
        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.winning_trades, 0);
        assert_eq!(summary.profit_factor, 0.0);
    }

    #[test]
    fn test_no_losses_uses_profit_factor_cap() {
        let summary = compute_metrics(&trades(&[Some(100.0)]));

        assert_eq!(summary.profit_factor, PROFIT_FACTOR_CAP);
        assert!(summary.profit_factor.is_finite());
        assert!(summary.has_unbounded_profit_factor());
        assert_eq!(summary.average_loss, 0.0);
        assert_eq!(summary.largest_loss, 0.0);
    }

    #[test]
    fn test_only_losses() {
        let summary = compute_metrics(&trades(&[Some(-10.0), Some(-30.0)]));

        assert_eq!(summary.profit_factor, 0.0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.largest_win, 0.0);
        assert_eq!(summary.largest_loss, -30.0);
        assert_eq!(summary.average_loss, 20.0);
        assert_eq!(summary.total_pnl, -40.0);
        assert!(!summary.has_unbounded_profit_factor());
    }

    #[test]
    fn test_breakeven_trades_count_toward_win_rate_only() {
        let summary = compute_metrics(&trades(&[Some(0.0), Some(0.0), Some(10.0), Some(-5.0)]));

        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.losing_trades, 1);
        assert_eq!(summary.win_rate, 25.0);
        assert!(summary.winning_trades + summary.losing_trades <= summary.total_trades);
    }

    #[test]
    fn test_all_breakeven_has_zero_profit_factor() {
        let summary = compute_metrics(&trades(&[Some(0.0), Some(-0.0)]));
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.profit_factor, 0.0);
        assert_eq!(summary.win_rate, 0.0);
    }

    #[test]
    fn test_overflowing_sum_keeps_prior_total() {
        let summary = compute_metrics(&trades(&[Some(f64::MAX), Some(f64::MAX)]));

        assert_eq!(summary.winning_trades, 2);
        assert_eq!(summary.total_pnl, f64::MAX);
        assert_all_finite(&summary);
    }

    #[test]
    fn test_permutation_invariance() {
        let pnls = [
            Some(0.1),
            Some(0.2),
            Some(0.3),
            Some(1e16),
            Some(-1e16),
            None,
            Some(-7.25),
            Some(f64::NAN),
            Some(3.5),
        ];
        let forward = compute_metrics(&trades(&pnls));

        let mut reversed = pnls.to_vec();
        reversed.reverse();
        let mut rotated = pnls.to_vec();
        rotated.rotate_left(4);
        let mut interleaved: Vec<Option<f64>> = pnls.iter().step_by(2).copied().collect();
        interleaved.extend(pnls.iter().skip(1).step_by(2).copied());

        for permutation in [reversed, rotated, interleaved] {
            let summary = compute_metrics(&trades(&permutation));
            assert_eq!(summary.total_pnl.to_bits(), forward.total_pnl.to_bits());
            assert_eq!(summary.average_win.to_bits(), forward.average_win.to_bits());
            assert_eq!(summary.profit_factor.to_bits(), forward.profit_factor.to_bits());
            assert_eq!(summary, forward);
        }
    }

    #[test]
    fn test_idempotent() {
        let input = trades(&[Some(12.3), Some(-4.56), Some(7.89), None]);
        let first = compute_metrics(&input);
        let second = compute_metrics(&input);

        assert_eq!(first.total_pnl.to_bits(), second.total_pnl.to_bits());
        assert_eq!(first.win_rate.to_bits(), second.win_rate.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_invariants_hold_over_varied_inputs() {
        let inputs: Vec<Vec<Option<f64>>> = vec![
            vec![],
            vec![None],
            vec![Some(1.0)],
            vec![Some(-1.0)],
            vec![Some(0.0)],
            vec![Some(5.0), Some(-5.0), Some(0.0), None],
            vec![Some(f64::MAX), Some(f64::MIN), Some(f64::MAX)],
            vec![Some(1e-300), Some(-1e-300)],
        ];

        for input in inputs {
            let summary = compute_metrics(&trades(&input));
            assert!((0.0..=100.0).contains(&summary.win_rate));
            assert!(summary.profit_factor >= 0.0);
            assert!(summary.winning_trades + summary.losing_trades <= summary.total_trades);
            assert_all_finite(&summary);
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize(-3.5), -3.5);

        let dirty = MetricsSummary {
            win_rate: f64::NAN,
            profit_factor: f64::INFINITY,
            total_pnl: 12.0,
            total_trades: 4,
            ..MetricsSummary::default()
        };
        let clean = dirty.sanitized();
        assert_eq!(clean.win_rate, 0.0);
        assert_eq!(clean.profit_factor, 0.0);
        assert_eq!(clean.total_pnl, 12.0);
        assert_eq!(clean.total_trades, 4);
    }

    #[test]
    fn test_expectancy() {
        let summary = compute_metrics(&trades(&[Some(100.0), Some(-50.0), Some(50.0), Some(0.0)]));
        // win rate 50%, loss rate 25%: 75 * 0.5 - 50 * 0.25
        assert!((summary.expectancy() - 25.0).abs() < 1e-9);
        assert_eq!(MetricsSummary::default().expectancy(), 0.0);
    }

    #[test]
    fn test_summary_serializes_finite_json() {
        let summary = compute_metrics(&trades(&[Some(10.0)]));
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["profit_factor"], serde_json::json!(999.0));
        assert_eq!(json["total_trades"], serde_json::json!(1));
    }
}
