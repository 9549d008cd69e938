//! Integration tests driving the warp filter tree end to end.

use std::convert::Infallible;
use std::sync::Arc;

use dcf_dashboard::models::CompanyProfile;
use dcf_dashboard::routes::routes;
use dcf_dashboard::services::scenario::ScenarioStore;
use serde_json::{json, Value};
use warp::{Filter, Reply};

fn api() -> (
    Arc<ScenarioStore>,
    impl Filter<Extract = impl Reply, Error = Infallible> + Clone,
) {
    let store = Arc::new(ScenarioStore::new(CompanyProfile::default()));
    let api = routes(store.clone());
    (store, api)
}

fn default_assumptions_body() -> Value {
    json!({
        "revenueGrowthCAGR": 8.0,
        "operatingProfitMargin": 15.0,
        "discountRate": 10.0,
        "capexIntensity": 8.0,
        "workingCapitalIntensity": 12.0,
        "taxRate": 25.0,
        "terminalGrowthRate": 2.5
    })
}

#[tokio::test]
async fn valuation_returns_a_five_year_projection() {
    let (_store, api) = api();
    let mut body = default_assumptions_body();
    body["terminalMethod"] = json!("gordon");

    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/valuation")
        .json(&body)
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);

    let result: Value = serde_json::from_slice(response.body()).unwrap();
    let projections = result["projections"].as_array().unwrap();
    assert_eq!(projections.len(), 5);
    assert_eq!(projections[0]["year"], 1);
    assert_eq!(projections[4]["year"], 5);
    assert!((projections[0]["revenue"].as_f64().unwrap() - 1_080_000_000.0).abs() < 1.0);
    assert!(result["fairValuePerShare"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn valuation_exit_multiple_changes_the_terminal_value() {
    let (_store, api) = api();

    let gordon_body = default_assumptions_body();
    let gordon = warp::test::request()
        .method("POST")
        .path("/api/v1/valuation")
        .json(&gordon_body)
        .reply(&api)
        .await;
    let gordon: Value = serde_json::from_slice(gordon.body()).unwrap();

    let mut multiple_body = default_assumptions_body();
    multiple_body["terminalMethod"] = json!("multiple");
    multiple_body["exitMultiple"] = json!(18.0);
    multiple_body["exitMultipleType"] = json!("pe");
    let multiple = warp::test::request()
        .method("POST")
        .path("/api/v1/valuation")
        .json(&multiple_body)
        .reply(&api)
        .await;
    let multiple: Value = serde_json::from_slice(multiple.body()).unwrap();

    assert_ne!(gordon["terminalValue"], multiple["terminalValue"]);

    // Multiple requested without its parameters falls back to Gordon Growth
    let mut fallback_body = default_assumptions_body();
    fallback_body["terminalMethod"] = json!("multiple");
    let fallback = warp::test::request()
        .method("POST")
        .path("/api/v1/valuation")
        .json(&fallback_body)
        .reply(&api)
        .await;
    let fallback: Value = serde_json::from_slice(fallback.body()).unwrap();
    assert_eq!(gordon["terminalValue"], fallback["terminalValue"]);
}

#[tokio::test]
async fn valuation_rejects_an_incomplete_body() {
    let (_store, api) = api();
    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/valuation")
        .json(&json!({ "revenueGrowthCAGR": 8.0 }))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 400);

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn company_endpoint_reports_the_configured_profile() {
    let (_store, api) = api();
    let response = warp::test::request()
        .method("GET")
        .path("/api/v1/company")
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(body["baseRevenue"].as_f64().unwrap(), 1_000_000_000.0);
    assert_eq!(body["formatted"]["baseRevenue"], "$1.00B");
    assert_eq!(body["formatted"]["currentSharePrice"], "$45.00");
}

#[tokio::test]
async fn scenario_crud_roundtrip() {
    let (_store, api) = api();

    // Seeded with the base case
    let response = warp::test::request()
        .method("GET")
        .path("/api/v1/scenarios")
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);
    let listed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let base_id = listed[0]["id"].as_str().unwrap().to_string();

    // Create
    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/scenarios")
        .json(&json!({ "name": "Bull Case" }))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 201);
    let created: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(created["name"], "Bull Case");
    let created_id = created["id"].as_str().unwrap().to_string();

    // Update one assumption; the fair value must move
    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/api/v1/scenarios/{}", created_id))
        .json(&json!({ "revenueGrowthCAGR": 12.0 }))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);
    let updated: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(
        updated["fairValuePerShare"].as_f64().unwrap()
            > created["fairValuePerShare"].as_f64().unwrap()
    );

    // Unknown id is a 404
    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/api/v1/scenarios/{}", uuid::Uuid::new_v4()))
        .json(&json!({ "revenueGrowthCAGR": 12.0 }))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 404);

    // Delete the extra scenario, then refuse to delete the last one
    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/v1/scenarios/{}", created_id))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/v1/scenarios/{}", base_id))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn revalue_applies_a_new_terminal_spec_to_every_scenario() {
    let (store, api) = api();
    store
        .create(None, None, &Default::default())
        .await;

    let before: Vec<f64> = store
        .list()
        .await
        .iter()
        .map(|s| s.fair_value_per_share)
        .collect();

    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/scenarios/revalue")
        .json(&json!({
            "terminalMethod": "multiple",
            "exitMultiple": 12.0,
            "exitMultipleType": "ebitda"
        }))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    let revalued = body.as_array().unwrap();
    assert_eq!(revalued.len(), before.len());
    for (scenario, old_value) in revalued.iter().zip(&before) {
        assert_ne!(scenario["fairValuePerShare"].as_f64().unwrap(), *old_value);
        assert!(scenario["upsidePercent"].is_number());
    }
}
