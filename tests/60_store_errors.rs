mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{manager, TestApp};

#[tokio::test]
async fn store_failures_are_generic_internal_errors() -> Result<()> {
    let app = TestApp::unavailable();
    let token = manager();
    let recipe = json!([{ "name": "milk", "color": "white", "parts": 1 }]);

    let responses = vec![
        ("GET /drinks", app.get("/drinks", None).await?),
        ("GET /drinks-detail", app.get("/drinks-detail", Some(&token)).await?),
        (
            "POST /drinks",
            app.post("/drinks", Some(&token), json!({ "title": "Latte", "recipe": recipe })).await?,
        ),
        (
            "PATCH /drinks/1",
            app.patch("/drinks/1", Some(&token), json!({ "title": "Latte" })).await?,
        ),
        ("DELETE /drinks/1", app.delete("/drinks/1", Some(&token)).await?),
    ];

    for (route, (status, body)) in responses {
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", route);
        assert_eq!(
            body,
            json!({ "success": false, "error": 500, "message": "An error has occurred" }),
            "{}",
            route
        );
    }
    Ok(())
}

#[tokio::test]
async fn health_reports_unavailable_store() -> Result<()> {
    let app = TestApp::unavailable();

    let (status, body) = app.get("/health", None).await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(503));
    assert_eq!(body["message"], json!("Drink store unavailable"));
    Ok(())
}

#[tokio::test]
async fn auth_is_checked_before_the_store() -> Result<()> {
    let app = TestApp::unavailable();

    let (status, body) = app.get("/drinks-detail", None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("no_header"));
    Ok(())
}
