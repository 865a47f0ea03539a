//! End-to-end tests driving the router in-process

use axum::Router;
use axum::body::{Body, to_bytes};
use chrono::{Duration, Utc};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use storefront_server::auth::{AdminAccount, hash_password};
use storefront_server::catalog::ProductCatalog;
use storefront_server::services::{Notifier, PixelClient};
use storefront_server::{Config, OrderStorage, ServerState, build_app};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "correct horse";

fn app() -> Router {
    app_over(Config::in_memory(), OrderStorage::open_in_memory().unwrap())
}

/// Fresh state over an existing store, as after a restart
fn app_over(config: Config, orders: OrderStorage) -> Router {
    let state = ServerState::from_parts(
        config,
        orders,
        ProductCatalog::builtin(),
        AdminAccount::with_hash(ADMIN_EMAIL, hash_password(ADMIN_PASSWORD).unwrap()),
        Notifier::disabled(),
        PixelClient::disabled(),
    );
    build_app(state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::delete(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        post(
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn place_order(app: &Router, name: &str, quantity: u32) -> Value {
    let (status, body) = send(
        app,
        post(
            "/api/orders",
            None,
            json!({
                "product_id": "prod-001",
                "quantity": quantity,
                "name": name,
                "phone": "01712-345678",
                "address": "House 5, Road 2, Dhaka"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], true);
}

#[tokio::test]
async fn product_has_parsed_price() {
    let app = app();
    let (status, body) = send(&app, get("/api/product", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["id"], "prod-001");
    assert_eq!(body["data"]["unit_price"], 1650.0);
    assert_eq!(body["data"]["regular_price"], 2350.0);
}

#[tokio::test]
async fn order_is_priced_and_stored_pending() {
    let app = app();
    let order = place_order(&app, "  Rahim  ", 2).await;

    assert_eq!(order["name"], "Rahim");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["unit_price"], 1650.0);
    assert_eq!(order["total_price"], 3300.0);
    assert!(order["created_at"].is_string());

    let token = login(&app).await;
    let id = order["id"].as_str().unwrap();
    let (status, body) = send(&app, get(&format!("/api/admin/orders/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
}

#[tokio::test]
async fn invalid_order_reports_fields() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/orders",
            None,
            json!({ "quantity": 0, "name": " ", "phone": "123", "address": "" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 2);
    let details = body["details"].as_object().unwrap();
    for field in ["quantity", "name", "phone", "address"] {
        assert!(details.contains_key(field), "missing {field}: {body}");
    }
}

#[tokio::test]
async fn unknown_product_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/orders",
            None,
            json!({
                "product_id": "prod-999",
                "quantity": 1,
                "name": "Rahim",
                "phone": "01712345678",
                "address": "Dhaka"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn malformed_json_uses_envelope() {
    let app = app();
    let req = Request::post("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
}

#[tokio::test]
async fn admin_routes_require_token() {
    let app = app();

    let (status, body) = send(&app, get("/api/admin/orders", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = send(&app, get("/api/admin/orders", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn wrong_password_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn login_is_rate_limited() {
    let app = app();
    let attempt = || {
        post(
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": "nope" }),
        )
    };
    for _ in 0..5 {
        let (status, _) = send(&app, attempt()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = send(&app, attempt()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 9);
}

#[tokio::test]
async fn logout_revokes_token() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);

    let (status, _) = send(&app, post("/api/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/admin/orders", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);
}

#[tokio::test]
async fn signed_out_token_stays_revoked_after_restart() {
    let config = Config::in_memory();
    let orders = OrderStorage::open_in_memory().unwrap();
    let app = app_over(config.clone(), orders.clone());
    let token = login(&app).await;

    let (status, _) = send(&app, post("/api/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let restarted = app_over(config, orders);
    let (status, body) = send(&restarted, get("/api/admin/orders", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);

    let fresh = login(&restarted).await;
    let (status, _) = send(&restarted, get("/api/admin/orders", Some(&fresh))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn list_filters_and_counts() {
    let app = app();
    let first = place_order(&app, "Rahim", 1).await;
    place_order(&app, "Karim", 2).await;
    place_order(&app, "Salma", 3).await;
    let token = login(&app).await;

    let id = first["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        post(&format!("/api/admin/orders/{id}/confirm"), Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/admin/orders", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shown"], 3);
    assert_eq!(body["data"]["stats"]["pending"], 2);
    assert_eq!(body["data"]["stats"]["confirmed"], 1);
    // Newest first
    assert_eq!(body["data"]["orders"][0]["name"], "Salma");

    let (_, body) = send(
        &app,
        get("/api/admin/orders?status=pending&q=KAR", Some(&token)),
    )
    .await;
    assert_eq!(body["data"]["shown"], 1);
    assert_eq!(body["data"]["orders"][0]["name"], "Karim");
    assert_eq!(body["data"]["stats"]["total"], 3);

    let (status, body) = send(&app, get("/api/admin/orders?status=archived", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn list_filters_by_day_range() {
    let app = app();
    place_order(&app, "Rahim", 1).await;
    place_order(&app, "Karim", 1).await;
    let token = login(&app).await;

    let now = Utc::now();
    let today = now.date_naive();
    let shown = |body: &Value| body["data"]["shown"].as_u64().unwrap();

    let (status, body) = send(
        &app,
        get(&format!("/api/admin/orders?from={today}&to={today}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(shown(&body), 2);

    let tomorrow = today + Duration::days(1);
    let (_, body) = send(
        &app,
        get(&format!("/api/admin/orders?from={tomorrow}"), Some(&token)),
    )
    .await;
    assert_eq!(shown(&body), 0);

    let yesterday = today - Duration::days(1);
    let (_, body) = send(
        &app,
        get(&format!("/api/admin/orders?to={yesterday}"), Some(&token)),
    )
    .await;
    assert_eq!(shown(&body), 0);

    // Day boundaries follow the caller's zone (UTC+14 here)
    let local_today = (now + Duration::minutes(840)).date_naive();
    let (_, body) = send(
        &app,
        get(
            &format!("/api/admin/orders?from={local_today}&to={local_today}&offset=840"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(shown(&body), 2);

    // Cleared date inputs
    let (status, body) = send(&app, get("/api/admin/orders?from=&to=", Some(&token))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(shown(&body), 2);

    for bad in ["offset=abc", "from=not-a-date"] {
        let uri = format!("/api/admin/orders?{bad}");
        let (status, body) = send(&app, get(&uri, Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}: {body}");
        assert_eq!(body["code"], 5);
    }
}

#[tokio::test]
async fn confirm_and_delete_unknown_ids() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        post("/api/admin/orders/nope/confirm", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, _) = send(&app, delete("/api/admin/orders/nope", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_order() {
    let app = app();
    let order = place_order(&app, "Rahim", 1).await;
    let token = login(&app).await;
    let id = order["id"].as_str().unwrap();

    let (status, _) = send(&app, delete(&format!("/api/admin/orders/{id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get(&format!("/api/admin/orders/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_actions_report_affected_ids() {
    let app = app();
    let a = place_order(&app, "A", 1).await;
    let b = place_order(&app, "B", 1).await;
    let token = login(&app).await;
    let (a, b) = (a["id"].as_str().unwrap(), b["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        post(
            "/api/admin/orders/bulk",
            Some(&token),
            json!({ "action": "confirm", "ids": [a, "ghost"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["affected"], json!([a]));
    assert_eq!(body["data"]["missing"], json!(["ghost"]));

    let (_, body) = send(
        &app,
        post(
            "/api/admin/orders/bulk",
            Some(&token),
            json!({ "action": "delete", "ids": [a, b] }),
        ),
    )
    .await;
    assert_eq!(body["data"]["affected"], json!([a, b]));

    let (_, body) = send(&app, get("/api/admin/orders/stats", Some(&token))).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, body) = send(
        &app,
        post(
            "/api/admin/orders/bulk",
            Some(&token),
            json!({ "action": "delete", "ids": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn export_csv_download() {
    let app = app();
    place_order(&app, "Rahim, Jr.", 1).await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/admin/orders/export.csv", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("orders.csv")
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Order ID,Product,Quantity"));
    assert!(lines.next().unwrap().contains("\"Rahim, Jr.\""));
}

fn notification() -> Value {
    json!({
        "orderId": "1",
        "productTitle": "Heater Jug",
        "unitPrice": 1650,
        "quantity": 1,
        "totalPrice": 1650,
        "name": "Rahim",
        "phone": "01712345678",
        "address": "Dhaka"
    })
}

/// Server whose notifications point back at its own receiver
fn self_notifying_app() -> Router {
    let mut config = Config::in_memory();
    config.notify_url = Some(format!("{}/api/notify", config.public_base_url));
    app_over(config, OrderStorage::open_in_memory().unwrap())
}

#[tokio::test]
async fn notify_receiver_accepts_payload() {
    let app = self_notifying_app();
    let (status, body) = send(&app, post("/api/notify", None, notification())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn notify_receiver_is_rate_limited() {
    let app = self_notifying_app();
    for _ in 0..60 {
        let (status, _) = send(&app, post("/api/notify", None, notification())).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&app, post("/api/notify", None, notification())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 9);
}

#[tokio::test]
async fn notify_receiver_absent_for_external_webhook() {
    let app = app();
    let (status, _) = send(&app, post("/api/notify", None, notification())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
