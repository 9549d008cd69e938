// src/handlers/valuation.rs
use warp::reply::Json;
use warp::Rejection;

use crate::models::ValuationRequest;
use crate::services::scenario::ScenarioStore;
use crate::services::valuation::run_valuation;
use log::info;
use std::sync::Arc;

pub async fn compute_valuation(
    store: Arc<ScenarioStore>,
    request: ValuationRequest,
) -> Result<Json, Rejection> {
    info!(
        "Handling DCF valuation request ({:?} terminal value)",
        request.terminal.method
    );
    let result = run_valuation(store.profile(), &request.assumptions, &request.terminal);
    Ok(warp::reply::json(&result))
}
