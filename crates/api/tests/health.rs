//! Health endpoint smoke test.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["status"], "ok");
}
