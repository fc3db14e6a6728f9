mod common;

use bleau::core::services::view_service::ViewService;
use bleau::error::{ApiError, AppError};
use bleau::viz::{BarOptions, TableauViz};
use common::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIEW_PATH: &str = "/api/3.19/sites/site-uuid-1/views/v-1/data";

#[tokio::test]
async fn test_view_data_rows_become_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VIEW_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"Region": "East", "Sales": "120.5"},
                {"Region": "West", "Sales": "98"}
            ]
        })))
        .mount(&server)
        .await;

    let session = resumed_session(&server);
    let table = ViewService::new(&session).unwrap().data("v-1").await.unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.numeric_column("Sales").unwrap(), vec![120.5, 98.0]);
}

#[tokio::test]
async fn test_view_data_feeds_charts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VIEW_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"Region": ["East", "West"], "Sales": [120, 98]}
        })))
        .mount(&server)
        .await;

    let session = resumed_session(&server);
    let viz = TableauViz::new();
    let table = viz.view_data(&session, "v-1").await.unwrap();
    let plot = viz
        .bar_chart(&table, &BarOptions::new("Region", "Sales").title("Sales by Region"))
        .unwrap();
    let figure: serde_json::Value = serde_json::from_str(&plot.to_json()).unwrap();
    assert_eq!(figure["layout"]["title"]["text"], "Sales by Region");
}

#[tokio::test]
async fn test_missing_view_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3.19/sites/site-uuid-1/views/gone/data"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let session = resumed_session(&server);
    let result = ViewService::new(&session).unwrap().data("gone").await;
    assert!(matches!(
        result,
        Err(AppError::Api(ApiError::NotFound { .. }))
    ));
}

#[tokio::test]
async fn test_body_without_data_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VIEW_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .mount(&server)
        .await;

    let session = resumed_session(&server);
    let result = ViewService::new(&session).unwrap().data("v-1").await;
    assert!(matches!(
        result,
        Err(AppError::Api(ApiError::InvalidResponse { .. }))
    ));
}
