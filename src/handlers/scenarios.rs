// src/handlers/scenarios.rs
use warp::reply::{with_status, Json};
use warp::Rejection;

use crate::models::{CreateScenarioRequest, Scenario, ScenarioPatch, TerminalValueSpec};
use crate::services::format::{format_percentage, format_price};
use crate::services::scenario::{DeleteError, ScenarioStore};
use log::{error, info};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApiError;

/// One scenario as the dashboard renders it: the raw numbers plus formatted
/// strings and the upside against the current share price.
fn scenario_summary(scenario: &Scenario, current_price: f64) -> serde_json::Value {
    let upside = if current_price != 0.0 {
        (scenario.fair_value_per_share - current_price) / current_price * 100.0
    } else {
        0.0
    };
    json!({
        "id": scenario.id,
        "name": scenario.name,
        "assumptions": scenario.assumptions,
        "fairValuePerShare": scenario.fair_value_per_share,
        "fairValueFormatted": format_price(scenario.fair_value_per_share),
        "upsidePercent": upside,
        "upsideFormatted": format_percentage(upside),
        "updatedAt": scenario.updated_at,
    })
}

pub async fn list_scenarios(store: Arc<ScenarioStore>) -> Result<Json, Rejection> {
    info!("Handling request to list scenarios");
    let current_price = store.profile().current_share_price;
    let scenarios = store.list().await;
    let body: Vec<serde_json::Value> = scenarios
        .iter()
        .map(|s| scenario_summary(s, current_price))
        .collect();
    Ok(warp::reply::json(&body))
}

pub async fn get_scenario(id: Uuid, store: Arc<ScenarioStore>) -> Result<Json, Rejection> {
    info!("Handling request to get scenario {}", id);
    match store.get(id).await {
        Some(scenario) => Ok(warp::reply::json(&scenario_summary(
            &scenario,
            store.profile().current_share_price,
        ))),
        None => {
            error!("Scenario {} not found", id);
            Err(warp::reject::custom(ApiError::not_found(
                "scenario not found",
            )))
        }
    }
}

pub async fn create_scenario(
    store: Arc<ScenarioStore>,
    request: CreateScenarioRequest,
) -> Result<impl warp::Reply, Rejection> {
    info!("Handling request to create a scenario");
    let scenario = store
        .create(request.name, request.assumptions, &request.terminal)
        .await;
    Ok(with_status(
        warp::reply::json(&scenario_summary(
            &scenario,
            store.profile().current_share_price,
        )),
        warp::http::StatusCode::CREATED,
    ))
}

pub async fn update_scenario(
    id: Uuid,
    store: Arc<ScenarioStore>,
    patch: ScenarioPatch,
) -> Result<Json, Rejection> {
    info!("Handling request to update scenario {}", id);
    match store.update(id, &patch).await {
        Some(scenario) => Ok(warp::reply::json(&scenario_summary(
            &scenario,
            store.profile().current_share_price,
        ))),
        None => {
            error!("Scenario {} not found", id);
            Err(warp::reject::custom(ApiError::not_found(
                "scenario not found",
            )))
        }
    }
}

pub async fn delete_scenario(id: Uuid, store: Arc<ScenarioStore>) -> Result<Json, Rejection> {
    info!("Handling request to delete scenario {}", id);
    match store.delete(id).await {
        Ok(()) => Ok(warp::reply::json(&json!({ "deleted": id }))),
        Err(e @ DeleteError::NotFound) => {
            error!("Failed to delete scenario {}: {}", id, e);
            Err(warp::reject::custom(ApiError::not_found(e.to_string())))
        }
        Err(e @ DeleteError::LastScenario) => {
            error!("Failed to delete scenario {}: {}", id, e);
            Err(warp::reject::custom(ApiError::conflict(e.to_string())))
        }
    }
}

pub async fn revalue_scenarios(
    store: Arc<ScenarioStore>,
    terminal: TerminalValueSpec,
) -> Result<Json, Rejection> {
    info!(
        "Handling request to revalue all scenarios ({:?} terminal value)",
        terminal.method
    );
    let current_price = store.profile().current_share_price;
    let scenarios = store.revalue_all(&terminal).await;
    let body: Vec<serde_json::Value> = scenarios
        .iter()
        .map(|s| scenario_summary(s, current_price))
        .collect();
    Ok(warp::reply::json(&body))
}
