use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use app_api::AppContext;
use frost_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};

use crate::{HttpState, SESSION_HEADER};

fn build_state(temp_dir: &tempfile::TempDir) -> HttpState {
    let paths = AppPaths::new(temp_dir.path().to_path_buf());
    ensure_app_data_dir(&paths).expect("ensure app data dir");
    let app_state = AppState::new(AppConfig::new(paths.db_path));
    app_state.setup_db().expect("setup db");
    HttpState::new(AppContext::new(app_state))
}

fn post(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::from("{}")).expect("request")
}

#[tokio::test]
async fn session_routes_require_header() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let app = crate::router(build_state(&temp_dir));

    let response = app
        .oneshot(post("/api/session_get", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let app = crate::router(build_state(&temp_dir));

    let response = app
        .oneshot(post("/api/consumption", Some("nope")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_routes_fall_back_to_not_found() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let app = crate::router(build_state(&temp_dir));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/index.html")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn session_ids_are_random_hex() {
    let first = crate::generate_session_id();
    let second = crate::generate_session_id();
    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|ch| ch.is_ascii_hexdigit()));
    assert_ne!(first, second);
}
