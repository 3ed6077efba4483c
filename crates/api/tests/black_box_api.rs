use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use cinedex_api::store::InMemoryMovieStore;

const APP_NAME: &str = "cinedexApp";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = cinedex_api::app::build_app(Arc::new(InMemoryMovieStore::new()), APP_NAME)
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn movies_url(&self) -> String {
        format!("{}/api/movies", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_movie(
    client: &reqwest::Client,
    srv: &TestServer,
    name: &str,
    category: &str,
    rating: f64,
) -> serde_json::Value {
    let res = client
        .post(srv.movies_url())
        .json(&json!({ "name": name, "category": category, "rating": rating }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

fn header<'a>(res: &'a reqwest::Response, name: &str) -> &'a str {
    res.headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_assigns_id_and_announces_it() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.movies_url())
        .json(&json!({ "name": "Alien", "category": "Horror", "rating": 8.5 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(header(&res, "location"), "/api/movies/1");
    assert_eq!(header(&res, "x-cinedexapp-alert"), "cinedexApp.movies.created");
    assert_eq!(header(&res, "x-cinedexapp-params"), "1");

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Alien");
    assert_eq!(body["rating"], 8.5);

    let fetched: serde_json::Value = client
        .get(format!("{}/1", srv.movies_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn create_with_id_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.movies_url())
        .json(&json!({ "id": 7, "name": "Alien" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "idexists");

    let count: u64 = client
        .get(format!("{}/count", srv.movies_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/42", srv.movies_url())).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_paged_sorted_and_filtered() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_movie(&client, &srv, "Heat", "Crime", 8.3).await;
    create_movie(&client, &srv, "Alien", "Horror", 8.5).await;
    create_movie(&client, &srv, "Brazil", "Comedy", 7.9).await;

    let res = client
        .get(format!("{}?page=0&size=2&sort=name,asc", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, "x-total-count"), "3");
    let link = header(&res, "link").to_string();
    assert!(link.contains("rel=\"next\""));
    assert!(link.contains("sort=name,asc"));

    let page: Vec<serde_json::Value> = res.json().await.unwrap();
    let names: Vec<&str> = page.iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alien", "Brazil"]);

    let res = client
        .get(format!("{}?rating.greaterThan=8.0&sort=rating,desc", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(header(&res, "x-total-count"), "2");
    let page: Vec<serde_json::Value> = res.json().await.unwrap();
    let names: Vec<&str> = page.iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alien", "Heat"]);

    let count: u64 = client
        .get(format!("{}/count?category.equals=Crime", srv.movies_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn list_rejects_oversized_pages_and_bad_filters() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}?size=5000", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}?rating.between=1", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

async fn assert_json_bad_request(res: reqwest::Response) -> serde_json::Value {
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(header(&res, "content-type").starts_with("application/json"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(body["message"].is_string());
    body
}

#[tokio::test]
async fn unparsable_requests_answer_with_the_json_error_body() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/abc", srv.movies_url())).send().await.unwrap();
    let body = assert_json_bad_request(res).await;
    assert_eq!(body["error"], "bad_request");

    let res = client
        .post(srv.movies_url())
        .json(&json!({ "rating": "high" }))
        .send()
        .await
        .unwrap();
    assert_json_bad_request(res).await;

    let res = client
        .post(srv.movies_url())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_json_bad_request(res).await;

    let res = client
        .get(format!("{}/search", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_json_bad_request(res).await;

    let res = client
        .get(format!("{}?size=5000", srv.movies_url()))
        .send()
        .await
        .unwrap();
    let body = assert_json_bad_request(res).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn search_matches_name_or_category_prefix() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_movie(&client, &srv, "Heat", "Crime", 8.3).await;
    create_movie(&client, &srv, "Halloween", "Horror", 7.7).await;
    create_movie(&client, &srv, "Brazil", "Comedy", 7.9).await;

    let res = client
        .get(format!("{}/search?keyword=h", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(found.len(), 2);

    let found: Vec<serde_json::Value> = client
        .get(format!("{}/search?keyword=com", srv.movies_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Brazil");
}

#[tokio::test]
async fn put_enforces_identity_rules() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_movie(&client, &srv, "Heat", "Crime", 8.3).await;

    let cases = [
        (format!("{}/1", srv.movies_url()), json!({ "name": "x" }), "idnull"),
        (format!("{}/1", srv.movies_url()), json!({ "id": 2, "name": "x" }), "idinvalid"),
        (format!("{}/9", srv.movies_url()), json!({ "id": 9, "name": "x" }), "idnotfound"),
    ];
    for (url, body, code) in cases {
        let res = client.put(url).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{code}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], code);
    }

    let res = client
        .put(format!("{}/1", srv.movies_url()))
        .json(&json!({ "id": 1, "name": "Heat (1995)" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, "x-cinedexapp-alert"), "cinedexApp.movies.updated");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Heat (1995)");
    // full replacement clears omitted fields
    assert!(body["category"].is_null());
    assert!(body["rating"].is_null());
}

#[tokio::test]
async fn patch_merges_supplied_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_movie(&client, &srv, "Heat", "Crime", 8.3).await;

    let res = client
        .patch(format!("{}/1", srv.movies_url()))
        .header("content-type", "application/merge-patch+json")
        .body(json!({ "id": 1, "rating": 9.0 }).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Heat");
    assert_eq!(body["category"], "Crime");
    assert_eq!(body["rating"], 9.0);
}

#[tokio::test]
async fn delete_removes_and_tolerates_missing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_movie(&client, &srv, "Heat", "Crime", 8.3).await;

    let res = client
        .delete(format!("{}/1", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(header(&res, "x-cinedexapp-alert"), "cinedexApp.movies.deleted");

    let res = reqwest::get(format!("{}/1", srv.movies_url())).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/1", srv.movies_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // ids are never reused
    let created = create_movie(&client, &srv, "Alien", "Horror", 8.5).await;
    assert_eq!(created["id"], 2);
}
