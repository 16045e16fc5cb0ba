use axum::http::StatusCode;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use tpprofit::api::{self, AppState};
use tpprofit::db::init_db;
use tpprofit::{Catalog, Evaluator, MockPriceSource, Repository};

async fn setup_test_app(mock: MockPriceSource) -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let catalog = Arc::new(Catalog::builtin());
    let pool = init_db(&db_path, &catalog).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool, &catalog));
    let evaluator = Evaluator::new(Arc::new(mock), catalog);

    (
        api::create_router(AppState::new(repo, evaluator)),
        temp_dir,
    )
}

async fn ask(app: axum::Router, command: &str) -> (StatusCode, serde_json::Value) {
    let uri = format!("/api/bot?command={}", command.replace(' ', "%20"));
    let request = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_help_lists_commands() {
    let (app, _temp) = setup_test_app(MockPriceSource::new()).await;
    let (status, body) = ask(app, "/gw2tp help").await;
    assert_eq!(status, StatusCode::OK);

    let reply = &body["reply"];
    assert_eq!(reply["type"], "embed");
    assert_eq!(reply["title"], "GW2TP Bot Commands");
    let values: Vec<&str> = reply["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["value"].as_str().unwrap())
        .collect();
    assert!(values.contains(&"/gw2tp scholar_rune"));
    assert!(values.contains(&"/gw2tp get_price <item_id>"));
}

#[tokio::test]
async fn test_get_price_embed() {
    let mock = MockPriceSource::new().with_price(19721, 2_000, 2_100);
    let (app, _temp) = setup_test_app(mock).await;
    let (status, body) = ask(app, "/gw2tp get_price 19721").await;
    assert_eq!(status, StatusCode::OK);

    let reply = &body["reply"];
    assert_eq!(reply["type"], "embed");
    assert_eq!(reply["title"], "Price for Item ID: 19721");
    assert_eq!(reply["fields"][0]["name"], "Buy");
    assert_eq!(reply["fields"][0]["value"], "0g 20s 0c");
    assert_eq!(reply["fields"][3]["name"], "Sell After Tax");
    assert_eq!(reply["fields"][3]["value"], "0g 17s 85c");
}

#[tokio::test]
async fn test_recipe_error_becomes_text() {
    let (app, _temp) = setup_test_app(MockPriceSource::new().with_price(19721, 1, 1)).await;
    let (status, body) = ask(app, "/gw2tp scholar_rune").await;
    assert_eq!(status, StatusCode::OK);

    let reply = &body["reply"];
    assert_eq!(reply["type"], "text");
    assert!(reply["content"]
        .as_str()
        .unwrap()
        .starts_with("Error: price unavailable"));
}

#[tokio::test]
async fn test_unknown_and_ignored_messages() {
    let (app, _temp) = setup_test_app(MockPriceSource::new()).await;

    let (_, body) = ask(app.clone(), "/gw2tp dragonhunter_rune").await;
    assert_eq!(body["reply"]["type"], "text");
    assert!(body["reply"]["content"]
        .as_str()
        .unwrap()
        .starts_with("Unknown command"));

    let (status, body) = ask(app.clone(), "good morning").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].is_null());

    let (_, body) = ask(app, "/gw2tp get_price ecto").await;
    assert_eq!(body["reply"]["content"], "Usage: /gw2tp get_price <item_id>");
}

#[tokio::test]
async fn test_missing_command_param_is_400() {
    let (app, _temp) = setup_test_app(MockPriceSource::new()).await;
    let request = axum::http::Request::builder()
        .uri("/api/bot")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
