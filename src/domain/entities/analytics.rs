use crate::domain::services::metrics::MetricsSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached metrics for one user, overwritten on every recalculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnalytics {
    pub user_id: String,
    #[serde(flatten)]
    pub metrics: MetricsSummary,
    pub computed_at: DateTime<Utc>,
}
