use crate::{assembler::TradingData, error::AppError, AppState};
use axum::{extract::State, Json};
use std::sync::Arc;

/// # GET /api/trading-data
/// Fetches a fresh snapshot and returns every trade together with its metrics.
pub async fn get_trading_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TradingData>, AppError> {
    let data = state.assembler.assemble().await?;
    Ok(Json(data))
}
