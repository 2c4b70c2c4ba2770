//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use salesdash_core::Record;
use tower::ServiceExt;

fn scenario_dataset() -> Dataset {
    let date = NaiveDate::from_ymd_opt(2022, 4, 30).unwrap();
    Dataset::from_records(vec![
        Record::new(
            date,
            "Electronics",
            "Maharashtra",
            "Mumbai",
            "Delivered",
            100.0,
            "405-0001",
        ),
        Record::new(date, "Books", "Delhi", "Delhi", "Cancelled", 50.0, "405-0002"),
    ])
}

fn setup_test_app() -> Router {
    let state = AppState::new(scenario_dataset(), ServerConfig::default()).unwrap();
    create_router(state, None)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ========== Filter API Tests ==========

#[tokio::test]
async fn test_get_filters() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/filters")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["categories"], serde_json::json!(["Books", "Electronics"]));
    assert_eq!(json["states"], serde_json::json!(["Delhi", "Maharashtra"]));
    assert_eq!(json["statuses"], serde_json::json!(["Delivered", "Cancelled"]));
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["records"], 2);
}

// ========== Dashboard API Tests ==========

#[tokio::test]
async fn test_dashboard_unfiltered() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["scope"], "overall data");
    assert_eq!(json["kpis"]["total_sales"], 150.0);
    assert_eq!(json["cards"][0]["value"], "₹150.00");
    assert_eq!(json["charts"].as_array().unwrap().len(), 4);
    assert_eq!(json["charts"][0]["id"], "sales-trend");
}

#[tokio::test]
async fn test_dashboard_filtered() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/dashboard?category=Books"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["scope"], "current filtered view");
    assert_eq!(json["kpis"]["total_sales"], 50.0);
    assert_eq!(json["filters"]["categories"], serde_json::json!(["Books"]));
}

#[tokio::test]
async fn test_dashboard_comma_separated_filters() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/dashboard?category=Books,Electronics&state=Delhi"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(
        json["filters"]["categories"],
        serde_json::json!(["Books", "Electronics"])
    );
    assert_eq!(json["filters"]["states"], serde_json::json!(["Delhi"]));
    assert_eq!(json["kpis"]["total_sales"], 50.0);
}

#[tokio::test]
async fn test_dashboard_repeated_filter_key_keeps_commas() {
    let date = NaiveDate::from_ymd_opt(2022, 5, 2).unwrap();
    let dataset = Dataset::from_records(vec![
        Record::new(date, "Set", "Kerala", "Kochi", "Shipped, Rejected", 70.0, "405-0003"),
        Record::new(date, "Set", "Kerala", "Kochi", "Shipped", 30.0, "405-0004"),
        Record::new(date, "Set", "Kerala", "Kochi", "Rejected", 20.0, "405-0005"),
    ]);
    let app = create_router(
        AppState::new(dataset, ServerConfig::default()).unwrap(),
        None,
    );

    let response = app
        .oneshot(get(
            "/api/dashboard?status=Shipped%2C%20Rejected&status=Cancelled",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["kpis"]["total_sales"], 70.0);
    assert_eq!(json["kpis"]["total_orders"], 1);
}

#[tokio::test]
async fn test_dashboard_rejects_non_numeric_top() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/dashboard?top=ten")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_empty_filter_result() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/dashboard?status=Returned"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["cards"][1]["value"], "0");
    for chart in json["charts"].as_array().unwrap() {
        assert_eq!(chart["no_data"], true);
        assert_eq!(chart["title"], "No data for current filters");
    }
}

#[tokio::test]
async fn test_dashboard_rejects_bad_top() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/dashboard?top=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("top must be"));
}

#[tokio::test]
async fn test_get_single_chart() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/charts/top-cities?top=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["kind"], "bar");
    assert_eq!(json["points"].as_array().unwrap().len(), 1);
    assert_eq!(json["points"][0]["label"], "Mumbai");

    let response = app.oneshot(get("/api/charts/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Ask API Tests ==========

#[tokio::test]
async fn test_ask_total_sales() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/ask",
            serde_json::json!({ "question": "total sales" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["intent"], "total_sales");
    assert_eq!(json["scope"], "overall data");
    let answer = json["answer"].as_str().unwrap();
    assert!(answer.starts_with("🤖 "));
    assert!(answer.contains("₹150.00"));
}

#[tokio::test]
async fn test_ask_uses_request_filters() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/ask",
            serde_json::json!({ "question": "total sales", "categories": ["Books"] }),
        ))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["scope"], "current filtered view");
    assert!(json["answer"].as_str().unwrap().contains("₹50.00"));
}

#[tokio::test]
async fn test_ask_blank_question_is_not_an_error() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/ask", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["intent"].is_null());
    assert!(json["answer"]
        .as_str()
        .unwrap()
        .contains("Please ask a question"));
}

#[tokio::test]
async fn test_ask_rejects_long_question() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/ask",
            serde_json::json!({ "question": "a".repeat(MAX_QUESTION_LEN + 1) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Security Header Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/filters")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_cors_allowed_origin() {
    let config = ServerConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
        ..Default::default()
    };
    let app = create_router(AppState::new(scenario_dataset(), config).unwrap(), None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/filters")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:3000"
    );
}

// ========== Startup Tests ==========

#[tokio::test]
async fn test_serve_fails_when_port_taken() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();
    let state = AppState::new(scenario_dataset(), ServerConfig::default()).unwrap();

    let result = serve(state, "127.0.0.1", port, None).await;
    assert!(result.is_err());
}
