use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::api::router::router;
use crate::core::config::Settings;
use crate::test_support;

#[tokio::test]
async fn item_lifecycle_through_routes() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "item": { "name": "Milk", "description": "2 liters" } })),
        ))
        .await
        .expect("create item");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Milk");
    assert_eq!(created["description"], "2 liters");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/items/1",
            Some(json!({ "item": { "name": "Oat milk" } })),
        ))
        .await
        .expect("patch item");
    let status = response.status();
    let updated = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {updated}");
    assert_eq!(updated["name"], "Oat milk");
    assert_eq!(updated["description"], "2 liters");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            "/api/v1/items/1",
            Some(json!({ "description": "" })),
        ))
        .await
        .expect("put item");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = test_support::read_json(response).await;
    assert!(updated["description"].is_null());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/items", None))
        .await
        .expect("list items");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = test_support::read_json(response).await;
    let listed = listed.as_array().expect("item list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Oat milk");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::DELETE, "/api/v1/items/1", None))
        .await
        .expect("delete item");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::DELETE, "/api/v1/items/1", None))
        .await
        .expect("delete again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "Couldn't find Item with 'id'=1");

    assert!(ctx.state.items().list_items().await.expect("list").is_empty());
}

#[tokio::test]
async fn create_accepts_bare_payload() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/items/",
            Some(json!({ "name": "  Bread  " })),
        ))
        .await
        .expect("create item");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = test_support::read_json(response).await;
    assert_eq!(created["name"], "Bread");
    assert!(created["description"].is_null());
}

#[tokio::test]
async fn invalid_payload_is_unprocessable() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "item": { "name": "" } })),
        ))
        .await
        .expect("create item");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test_support::read_json(response).await;
    assert_eq!(body["status"], 422);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "name": 42 })),
        ))
        .await
        .expect("mistyped item");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(ctx.state.items().list_items().await.expect("list").is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_rejected() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/items")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .expect("request"),
        )
        .await
        .expect("broken json");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/items")
                .body(Body::from("name=Milk"))
                .expect("request"),
        )
        .await
        .expect("form body");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let _guard = test_support::env_lock().await;
    test_support::set_test_env();
    std::env::set_var("ITEM_CART_MAX_BODY_BYTES", "64");

    let settings = Settings::load().expect("settings");
    let app = router(test_support::build_state(settings));

    let response = app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "name": "x".repeat(200) })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn non_numeric_or_missing_ids_are_not_found() {
    let ctx = test_support::setup_test_context().await;

    for uri in ["/api/v1/items/abc", "/api/v1/items/0", "/api/v1/items/-3", "/api/v1/items/99"] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PATCH,
                uri,
                Some(json!({ "name": "Tea" })),
            ))
            .await
            .expect("patch item");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {uri}");
    }
}

#[tokio::test]
async fn update_validates_before_lookup() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/items/99",
            Some(json!({ "name": "" })),
        ))
        .await
        .expect("patch item");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unsupported_methods_report_allow_header() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/items/1", None))
        .await
        .expect("show item");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(header::ALLOW).and_then(|value| value.to_str().ok()),
        Some("DELETE, PATCH, PUT")
    );

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::DELETE, "/api/v1/items", None))
        .await
        .expect("delete collection");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(header::ALLOW).and_then(|value| value.to_str().ok()),
        Some("GET, HEAD, POST")
    );
    let body = test_support::read_json(response).await;
    assert_eq!(body["status"], 405);
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let ctx = test_support::setup_test_context().await;

    for uri in ["/api/v1/item", "/api/v1/items/1/edit", "/api/v1/items//", "/api/v2/items"] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, uri, None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {uri}");
    }
}

#[tokio::test]
async fn malformed_wrapped_update_is_rejected_without_changes() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "item": { "name": "Milk" } })),
        ))
        .await
        .expect("create item");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = test_support::read_json(response).await;

    let bodies = [
        json!({ "item": { "name": 123 } }),
        json!({ "item": null }),
        json!({ "itme": { "name": "Tea" } }),
    ];
    for body in bodies {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PATCH,
                "/api/v1/items/1",
                Some(body.clone()),
            ))
            .await
            .expect("patch item");
        let status = response.status();
        let error = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {body}; response: {error}");
        assert_eq!(error["status"], 422);
    }

    let items = ctx.state.items().list_items().await.expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Milk");
    assert_eq!(
        crate::core::time::format_primitive(items[0].updated_at),
        created["updated_at"].as_str().expect("updated_at")
    );
}

#[tokio::test]
async fn wrapped_create_with_mistyped_name_reports_type_error() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "item": { "name": 123 } })),
        ))
        .await
        .expect("create item");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test_support::read_json(response).await;
    let detail = body["detail"].as_str().expect("detail");
    assert!(detail.contains("invalid type"), "detail: {detail}");
}
