// src/routes.rs
use std::sync::Arc;

use crate::handlers::{
    company::get_company,
    scenarios::{
        create_scenario, delete_scenario, get_scenario, list_scenarios, revalue_scenarios,
        update_scenario,
    },
    valuation::compute_valuation,
};
use crate::services::scenario::ScenarioStore;
use log::info;
use uuid::Uuid;
use warp::reject::Rejection;

use crate::handlers::error::ApiError;
use std::convert::Infallible;
use warp::{Filter, Reply};

// Recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(body_error) = err.find::<warp::filters::body::BodyDeserializeError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = body_error.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    store: Arc<ScenarioStore>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());

    let company_route = warp::path!("api" / "v1" / "company")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_company);

    let valuation_route = warp::path!("api" / "v1" / "valuation")
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(compute_valuation);

    let scenarios_list_route = warp::path!("api" / "v1" / "scenarios")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(list_scenarios);

    let scenario_create_route = warp::path!("api" / "v1" / "scenarios")
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(create_scenario);

    let scenario_revalue_route = warp::path!("api" / "v1" / "scenarios" / "revalue")
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(revalue_scenarios);

    let scenario_get_route = warp::path!("api" / "v1" / "scenarios" / Uuid)
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_scenario);

    let scenario_update_route = warp::path!("api" / "v1" / "scenarios" / Uuid)
        .and(warp::put())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(update_scenario);

    let scenario_delete_route = warp::path!("api" / "v1" / "scenarios" / Uuid)
        .and(warp::delete())
        .and(store_filter.clone())
        .and_then(delete_scenario);

    info!("All routes configured successfully.");

    company_route
        .or(valuation_route)
        .or(scenarios_list_route)
        .or(scenario_revalue_route)
        .or(scenario_create_route)
        .or(scenario_get_route)
        .or(scenario_update_route)
        .or(scenario_delete_route)
        .recover(handle_rejection)
}
