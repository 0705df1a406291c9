//! End-to-end authorization flow over a real router: token in, finalized
//! error body (or handler response) out.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Path;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch};
use axum::{Json, Router};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fleetops_auth::gate::{AuthMode, AuthState, Authz, authenticate};
use fleetops_auth::{AuthError, Claims, TokenValidator};
use fleetops_security::{AccessRequest, Permission, TargetScope};

/// Treats the bearer token as a JSON claims payload. Keeps the tests
/// about the authorization flow rather than JWT signatures.
struct JsonClaimsValidator;

#[async_trait]
impl TokenValidator for JsonClaimsValidator {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        serde_json::from_str(token).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

async fn update_base(
    Authz(gate): Authz,
    Path(base_id): Path<String>,
) -> Result<Json<serde_json::Value>, fleetops_errors::ApiError> {
    gate.authorize(
        &AccessRequest::permission(Permission::BaseUpdate).target(TargetScope::base(base_id.clone())),
    )?;
    Ok(Json(serde_json::json!({ "id": base_id, "updated": true })))
}

async fn fleet_overview(Authz(gate): Authz) -> Result<&'static str, fleetops_errors::ApiError> {
    gate.authorize(&AccessRequest::permissions([
        Permission::AmbulanceRead,
        Permission::BaseRead,
    ]))?;
    Ok("ok")
}

async fn whoami(gate: Result<Authz, fleetops_errors::ApiError>) -> String {
    match gate {
        Ok(Authz(gate)) => gate.principal().id().to_owned(),
        Err(_) => "anonymous".to_owned(),
    }
}

fn app(mode: AuthMode) -> Router {
    let state = AuthState::new(Arc::new(JsonClaimsValidator)).with_mode(mode);
    Router::new()
        .route("/bases/{id}", patch(update_base))
        .route("/fleet", get(fleet_overview))
        .route("/whoami", get(whoami))
        .layer(from_fn_with_state(state, authenticate))
}

fn bearer(claims: serde_json::Value) -> String {
    format!("Bearer {claims}")
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    auth: Option<String>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let response = app
        .oneshot(builder.body(axum::body::Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()));
    (status, body)
}

fn base_admin_token() -> String {
    bearer(serde_json::json!({
        "sub": "user-9",
        "roles": ["BASE_ADMIN"],
        "basesIds": ["base-1"]
    }))
}

#[tokio::test]
async fn base_admin_updates_own_base() {
    let (status, body) = send(
        app(AuthMode::Required),
        "PATCH",
        "/bases/base-1",
        Some(base_admin_token()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "base-1");
    assert_eq!(body["updated"], true);
}

#[tokio::test]
async fn base_admin_denied_on_foreign_base() {
    let (status, body) = send(
        app(AuthMode::Required),
        "PATCH",
        "/bases/base-2",
        Some(base_admin_token()),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E004");
    assert_eq!(body["message"], "Forbidden");
    assert_eq!(body["details"]["method"], "PATCH");
    assert_eq!(body["details"]["url"], "/bases/base-2");
    assert!(
        body["details"]["message"]
            .as_str()
            .unwrap()
            .contains("no matching scope")
    );
}

#[tokio::test]
async fn sys_admin_passes_every_gate() {
    let token = bearer(serde_json::json!({
        "sub": "root-1",
        "roles": ["SYS_ADMIN"]
    }));

    let (status, _) = send(
        app(AuthMode::Required),
        "PATCH",
        "/bases/base-99",
        Some(token.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(AuthMode::Required), "GET", "/fleet", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (status, body) = send(app(AuthMode::Required), "GET", "/fleet", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E003");
    assert_eq!(body["details"]["method"], "GET");
    assert_eq!(body["details"]["url"], "/fleet");
}

#[tokio::test]
async fn token_without_roles_is_unauthorized_before_any_check() {
    let token = bearer(serde_json::json!({
        "sub": "user-3",
        "basesIds": ["base-1"]
    }));

    let (status, body) = send(
        app(AuthMode::Required),
        "PATCH",
        "/bases/base-1",
        Some(token),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E003");
}

#[tokio::test]
async fn malformed_token_is_unauthorized() {
    let (status, body) = send(
        app(AuthMode::Required),
        "GET",
        "/fleet",
        Some("Bearer not-json".to_owned()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E003");
}

#[tokio::test]
async fn unit_admin_needs_all_listed_permissions() {
    // UNIT_ADMIN can read ambulances and bases; the overview requires both.
    let token = bearer(serde_json::json!({
        "sub": "user-5",
        "roles": ["UNIT_ADMIN"],
        "unitsIds": ["unit-1"]
    }));
    let (status, _) = send(app(AuthMode::Required), "GET", "/fleet", Some(token)).await;
    assert_eq!(status, StatusCode::OK);

    // BASE_ADMIN holds base:read and ambulance:read as well.
    let (status, _) = send(
        app(AuthMode::Required),
        "GET",
        "/fleet",
        Some(base_admin_token()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cookie_token_is_accepted() {
    let claims = serde_json::json!({
        "sub": "user-9",
        "roles": ["BASE_ADMIN"],
        "basesIds": ["base-1"]
    });
    let request = Request::builder()
        .method("PATCH")
        .uri("/bases/base-1")
        .header(header::COOKIE, format!("accessToken={claims}"))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app(AuthMode::Required).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn optional_mode_passes_anonymous_requests_through() {
    let (status, body) = send(app(AuthMode::Optional), "GET", "/whoami", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::Value::String("anonymous".to_owned()));

    // Protected handlers still refuse anonymous principals.
    let (status, body) = send(app(AuthMode::Optional), "GET", "/fleet", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E003");
}
