// src/handlers/company.rs
use warp::reply::Json;
use warp::Rejection;

use crate::services::format::{format_currency, format_price};
use crate::services::scenario::ScenarioStore;
use log::info;
use serde_json::json;
use std::sync::Arc;

pub async fn get_company(store: Arc<ScenarioStore>) -> Result<Json, Rejection> {
    info!("Handling request to get company profile");
    let profile = store.profile();
    Ok(warp::reply::json(&json!({
        "ticker": profile.ticker,
        "name": profile.name,
        "baseRevenue": profile.base_revenue,
        "baseDepreciation": profile.base_depreciation,
        "sharesOutstanding": profile.shares_outstanding,
        "currentSharePrice": profile.current_share_price,
        "formatted": {
            "baseRevenue": format_currency(profile.base_revenue),
            "baseDepreciation": format_currency(profile.base_depreciation),
            "currentSharePrice": format_price(profile.current_share_price),
        },
    })))
}
