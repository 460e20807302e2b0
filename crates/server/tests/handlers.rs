//! HTTP-level behaviour against the in-memory repository. No database needed.

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use service::subscription::repository::mock::MockSubscriptionRepository;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::AppState;

const OWNER: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

struct TestApp {
    base_url: String,
    repo: Arc<MockSubscriptionRepository>,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> anyhow::Result<i64> {
        let res = self.client.post(self.url("/service")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        let v: Value = res.json().await?;
        Ok(v["id"].as_i64().unwrap_or_default())
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let repo = Arc::new(MockSubscriptionRepository::default());
    let state = AppState::new(repo.clone());
    let app = routes::build_router(state, CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url: format!("http://{}", addr), repo, client: reqwest::Client::new() })
}

fn record(name: &str, price: i64, start: &str) -> Value {
    json!({ "service_name": name, "price": price, "user_id": OWNER, "start_date": start })
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn create_then_get_returns_same_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app.create(record("Yandex Plus", 400, "07-2025")).await?;
    assert!(id > 0);

    let res = app.client.get(app.url(&format!("/service/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, record("Yandex Plus", 400, "07-2025"));
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .post(app.url("/service"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    for bad in [
        record("", 400, "07-2025"),
        record("Plus", -1, "07-2025"),
        record("Plus", 400, "2025-07"),
        record(&"n".repeat(256), 400, "07-2025"),
        json!({ "service_name": "Plus", "price": 400, "user_id": "nope", "start_date": "07-2025" }),
    ] {
        let res = app.client.post(app.url("/service")).json(&bad).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "accepted {bad}");
        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Validation Error");
    }
    assert!(app.repo.is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_and_malformed_ids() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.client.get(app.url("/service/999")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app.client.get(app.url("/service/abc")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let res = app.client.delete(app.url("/service/999")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app
        .client
        .put(app.url("/service/999"))
        .json(&record("Plus", 1, "01-2024"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn ids_have_a_single_spelling() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app.create(record("Plus", 400, "07-2025")).await?;
    let res = app.client.get(app.url(&format!("/service/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    for alias in [format!("+{id}"), format!("%20{id}")] {
        let res = app.client.get(app.url(&format!("/service/{alias}"))).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{alias}");
    }
    Ok(())
}

#[tokio::test]
async fn update_and_delete_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app.create(record("Plus", 400, "07-2025")).await?;
    let path = app.url(&format!("/service/{id}"));

    let res = app.client.put(&path).json(&record("GPT Plus", 500, "05-2025")).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let got: Value = app.client.get(&path).send().await?.json().await?;
    assert_eq!(got, record("GPT Plus", 500, "05-2025"));

    let res = app.client.delete(&path).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = app.client.get(&path).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_price_zero_means_no_filter() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create(record("Yandex Plus", 400, "01-2024")).await?;
    app.create(record("Music", 199, "02-2024")).await?;
    app.create(record("Video", 599, "06-2024")).await?;

    let all: Value = app.client.get(app.url("/service?price=0")).send().await?.json().await?;
    assert_eq!(all["items"].as_array().map(Vec::len), Some(3));

    let res: Value = app
        .client
        .get(app.url("/service?from=01-2024&to=03-2024&sort=service_price&dir=asc"))
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = res["items"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v["service_name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Music", "Yandex Plus"]);

    let res: Value =
        app.client.get(app.url("/service?name=PLUS&limit=1")).send().await?.json().await?;
    assert_eq!(res["items"].as_array().map(Vec::len), Some(1));

    // unknown sort and limit fall back instead of failing
    let res = app.client.get(app.url("/service?sort=evil&limit=lots")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn bad_filters_are_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    for q in [
        "/service?user_id=nope",
        "/service?from=2024-01",
        "/service?price=cheap",
        "/service/sum?to=13-2024",
    ] {
        let res = app.client.get(app.url(q)).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{q}");
    }
    Ok(())
}

#[tokio::test]
async fn sum_totals_matching_rows() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create(record("Yandex Plus", 400, "01-2024")).await?;
    app.create(record("Music", 199, "02-2024")).await?;
    app.create(json!({
        "service_name": "Other",
        "price": 1000,
        "user_id": "00000000-0000-0000-0000-000000000009",
        "start_date": "02-2024"
    }))
    .await?;

    let res: Value = app
        .client
        .get(app.url(&format!("/service/sum?user_id={OWNER}&from=01-2024&to=12-2024")))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res, json!({ "total": 599 }));

    let res: Value =
        app.client.get(app.url("/service/sum?from=01-2030")).send().await?.json().await?;
    assert_eq!(res, json!({ "total": 0 }));
    Ok(())
}

#[tokio::test]
async fn store_failure_is_internal_error_without_details() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.repo.fail_all();
    let res = app
        .client
        .post(app.url("/service"))
        .json(&record("Plus", 400, "07-2025"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["detail"].is_null());
    Ok(())
}
