use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use halotekno_api::{
    entity::{MitraStatus, UserRole},
    routes::{HttpLimits, build_app},
    services::auth_service::sign_session,
    state::AppState,
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

// These requests are all answered before any query runs, so the router is
// built over a disconnected database handle.

fn test_state() -> AppState {
    AppState::new(DatabaseConnection::Disconnected, "test-secret", 1)
}

fn app() -> Router {
    build_app(test_state(), HttpLimits::default())
}

fn token(role: UserRole, mitra_status: Option<MitraStatus>) -> String {
    sign_session(&test_state().session, Uuid::new_v4(), role, mitra_status).unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn health_is_served() {
    let response = app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn anonymous_admin_dashboard_redirects_to_login() {
    let response = app().oneshot(get("/dashboard/admin", None)).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn customer_admin_dashboard_redirects_to_customer_dashboard() {
    let customer = token(UserRole::Customer, None);
    let response = app()
        .oneshot(get("/dashboard/admin", Some(&customer)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard/customer");
}

#[tokio::test]
async fn pending_mitra_is_redirected_to_pending_page() {
    let mitra = token(UserRole::Mitra, Some(MitraStatus::Pending));
    let response = app()
        .oneshot(get("/dashboard/mitra/jobs", Some(&mitra)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard/mitra/pending");
}

#[tokio::test]
async fn api_paths_are_not_redirected() {
    let response = app().oneshot(get("/api/orders", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let response = app()
        .oneshot(get("/api/auth/me", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_echoes_the_session() {
    let mitra = token(UserRole::Mitra, Some(MitraStatus::Approved));
    let response = app().oneshot(get("/api/auth/me", Some(&mitra))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "MITRA");
    assert_eq!(body["data"]["mitra_status"], "APPROVED");
}

#[tokio::test]
async fn customer_on_admin_api_is_unauthorized() {
    let customer = token(UserRole::Customer, None);
    let response = app()
        .oneshot(get("/api/admin/users", Some(&customer)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_without_service_is_bad_request() {
    let customer = token(UserRole::Customer, None);
    let response = app()
        .oneshot(send_json(
            "POST",
            "/api/bookings",
            Some(&customer),
            json!({ "phone_type": "iPhone 11", "description": "Layar retak" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "service_id is required");
}

#[tokio::test]
async fn booking_without_session_is_unauthorized() {
    let response = app()
        .oneshot(send_json("POST", "/api/bookings", None, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rental_duration_out_of_range_is_bad_request() {
    let customer = token(UserRole::Customer, None);
    let response = app()
        .oneshot(send_json(
            "POST",
            "/api/orders/rental",
            Some(&customer),
            json!({ "rental_item_id": Uuid::new_v4(), "duration": 400 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_order_status_is_bad_request() {
    let admin = token(UserRole::SuperAdmin, None);
    let uri = format!("/api/orders/{}/status", Uuid::new_v4());
    let response = app()
        .oneshot(send_json("PATCH", &uri, Some(&admin), json!({ "status": "SHIPPED" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_rating_out_of_range_is_bad_request() {
    let customer = token(UserRole::Customer, None);
    let response = app()
        .oneshot(send_json(
            "POST",
            "/api/reviews",
            Some(&customer),
            json!({ "mitra_id": Uuid::new_v4(), "rating": 6 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_chat_message_is_bad_request() {
    let customer = token(UserRole::Customer, None);
    let uri = format!("/api/chat/rooms/{}/messages", Uuid::new_v4());
    let response = app()
        .oneshot(send_json("POST", &uri, Some(&customer), json!({ "content": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let customer = token(UserRole::Customer, None);
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders/sparepart")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {customer}"))
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registering_as_admin_is_rejected() {
    let response = app()
        .oneshot(send_json(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": "eve@example.com",
                "password": "password123",
                "name": "Eve",
                "role": "ADMIN"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let response = app().oneshot(get("/api/nope", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["data"]["path"], "/api/nope");
}

#[tokio::test]
async fn review_delete_by_query_needs_session_and_id() {
    let anonymous = Request::builder()
        .method("DELETE")
        .uri(format!("/api/reviews?id={}", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(anonymous).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let customer = token(UserRole::Customer, None);
    let missing_id = Request::builder()
        .method("DELETE")
        .uri("/api/reviews")
        .header(header::AUTHORIZATION, format!("Bearer {customer}"))
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(missing_id).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
