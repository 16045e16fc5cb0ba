use axum::http::StatusCode;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use tpprofit::api::{self, AppState};
use tpprofit::db::init_db;
use tpprofit::{Catalog, Evaluator, Gsc, MockPriceSource, Repository, TimeMs};

async fn setup_test_app() -> (axum::Router, Arc<Repository>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let catalog = Arc::new(Catalog::builtin());
    let pool = init_db(&db_path, &catalog).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool, &catalog));
    let evaluator = Evaluator::new(Arc::new(MockPriceSource::new()), catalog);

    (
        api::create_router(AppState::new(repo.clone(), evaluator)),
        repo,
        temp_dir,
    )
}

async fn get_raw(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = get_raw(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

async fn seed(repo: &Repository, recipe: &str, timestamps: &[i64]) {
    for (i, ts) in timestamps.iter().enumerate() {
        repo.insert_snapshot(
            recipe,
            TimeMs::new(*ts),
            Gsc::new(5, i as i64, 0),
            Gsc::new(8, 0, i as i64),
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn test_history_json_window() {
    let (app, repo, _temp) = setup_test_app().await;
    seed(&repo, "scholar_rune", &[1_000, 2_000, 3_000]).await;

    let (status, body) =
        get_json(app, "/api/history/scholar_rune?fromMs=1500&toMs=3000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipe"], "scholar_rune");

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["timestamp"], 2_000);
    assert_eq!(rows[0]["crafting_cost_s"], 1);
    assert_eq!(rows[1]["timestamp"], 3_000);
    assert_eq!(rows[1]["sell_c"], 2);
}

#[tokio::test]
async fn test_history_csv_export() {
    let (app, repo, _temp) = setup_test_app().await;
    seed(&repo, "gear_to_ecto", &[1_000]).await;

    let (status, content_type, body) =
        get_raw(app, "/api/history/gear_to_ecto?format=csv").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/csv"));

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines[0],
        "id,timestamp,crafting_cost_g,crafting_cost_s,crafting_cost_c,sell_g,sell_s,sell_c"
    );
    assert!(lines[1].ends_with(",1000,5,0,0,8,0,0"));
}

#[tokio::test]
async fn test_history_bad_requests() {
    let (app, _repo, _temp) = setup_test_app().await;

    let (status, body) = get_json(app.clone(), "/api/history/scholar_rune?format=xml").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("xml"));

    let (status, _) =
        get_json(app.clone(), "/api/history/scholar_rune?fromMs=5&toMs=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(app, "/api/history/scholar_rune/chart?hours=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_untracked_recipe_is_404() {
    let (app, _repo, _temp) = setup_test_app().await;

    let (status, _) = get_json(app.clone(), "/api/history/t5_mats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(app, "/api/history/unknown_recipe/chart").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chart_empty_window() {
    let (app, repo, _temp) = setup_test_app().await;
    // Far outside the default 24h window.
    seed(&repo, "scholar_rune", &[1_000]).await;

    let (status, body) = get_json(app, "/api/history/scholar_rune/chart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hours"], 24);
    assert_eq!(body["points"], 0);
    assert!(body["svg"].is_null());
}

#[tokio::test]
async fn test_chart_recent_rows() {
    let (app, repo, _temp) = setup_test_app().await;
    let now = TimeMs::now().as_ms();
    seed(&repo, "relic_of_fireworks", &[now - 7_200_000, now - 3_600_000]).await;

    let (status, body) = get_json(app, "/api/history/relic_of_fireworks/chart?hours=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 2);

    let svg = body["svg"].as_str().unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Relic of Fireworks"));
}

#[tokio::test]
async fn test_history_page() {
    let (app, repo, _temp) = setup_test_app().await;
    let now = TimeMs::now().as_ms();
    seed(&repo, "scholar_rune", &[now - 60_000]).await;

    let (status, content_type, html) = get_raw(app.clone(), "/history/scholar_rune").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(html.contains("Scholar Rune: last 24h"));
    assert!(html.contains("<svg"));
    assert!(html.contains("<td>5g 0s 0c</td>"));
    assert!(html.contains("<td>8g 0s 0c</td>"));
    assert!(!html.contains("Margin"));

    let (status, _, html) = get_raw(app, "/history/gear_to_ecto").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No data"));
}
