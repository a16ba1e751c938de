use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::state::AppState;
use crate::domain::entities::trade::{NewTrade, Trade};
use crate::domain::errors::ApiError;

/// Log a new trade
pub async fn create_trade(
    State(state): State<AppState>,
    payload: Result<Json<NewTrade>, JsonRejection>,
) -> Result<(StatusCode, Json<Trade>), ApiError> {
    let Json(payload) = payload?;
    let trade = state.trades.log_trade(payload).await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

/// All trades of a user, oldest entry first
pub async fn list_trades(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    Ok(Json(state.trades.list_trades(&user_id).await?))
}

pub async fn delete_trade(
    State(state): State<AppState>,
    Path((user_id, trade_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.trades.delete_trade(&user_id, &trade_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
