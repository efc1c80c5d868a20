//! Dashboard statistics.

use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;
use taller_core::Stats;

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/stats` body. `dailySales` is a plain JSON number for the dashboard card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub daily_sales: f64,
    pub low_stock_count: i64,
    pub pending_services: i64,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        StatsResponse {
            daily_sales: stats.daily_sales.to_f64(),
            low_stock_count: stats.low_stock_count,
            pending_services: stats.pending_services,
        }
    }
}

/// "Today" is the server's local calendar day.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.db.stats().get_stats(&Local::now()).await?;
    Ok(Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taller_core::Money;

    #[test]
    fn response_shape() {
        let response = StatsResponse::from(Stats {
            daily_sales: Money::from_cents(4550),
            low_stock_count: 2,
            pending_services: 1,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["dailySales"], 45.5);
        assert_eq!(json["lowStockCount"], 2);
        assert_eq!(json["pendingServices"], 1);
    }
}
