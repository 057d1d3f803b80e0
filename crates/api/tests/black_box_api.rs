use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use futures::StreamExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use pedalshare_auth::JwtClaims;
use pedalshare_core::Username;
use pedalshare_infra::AppConfig;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    ws_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let config = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..AppConfig::default()
        };
        let app = pedalshare_api::app::build_app(&config).expect("router should build");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            ws_url: format!("ws://{addr}/ws"),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, client: &reqwest::Client, username: &str, password: &str) -> String {
        let res = client
            .post(self.url("/api/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["username"], username);
        body["token"].as_str().unwrap().to_string()
    }

    async fn post_bike_id(
        &self,
        client: &reqwest::Client,
        path: &str,
        token: &str,
        bike_id: u64,
    ) -> (StatusCode, Value) {
        let res = client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&json!({ "bikeId": bike_id }))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &str, subject: &str, issued_at: chrono::DateTime<Utc>) -> String {
    let claims = JwtClaims {
        sub: Username::from(subject),
        issued_at,
        expires_at: issued_at + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn find_bike(snapshot: &Value, id: u64) -> Value {
    snapshot
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"] == id)
        .cloned()
        .unwrap_or(Value::Null)
}

async fn next_snapshot<S>(ws: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("snapshot within timeout")
            .expect("stream open")
            .expect("frame");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn health_and_public_listings() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let all: Value = client
        .get(srv.url("/api/bikes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 4);
    assert_eq!(find_bike(&all, 101)["owner"], "admin");
    assert_eq!(find_bike(&all, 101)["isAvailable"], true);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/my-bikes")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);

    let res = client
        .post(srv.url("/api/book"))
        .header("Authorization", "Token nope")
        .json(&json!({ "bikeId": 101 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let forged = mint_jwt("other-secret", "user", Utc::now());
    let (status, _) = srv.post_bike_id(&client, "/api/book", &forged, 101).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = mint_jwt(JWT_SECRET, "user", Utc::now() - ChronoDuration::hours(2));
    let (status, _) = srv.post_bike_id(&client, "/api/book", &expired, 101).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing changed.
    let all: Value = client
        .get(srv.url("/api/bikes/available"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn login_and_registration_statuses() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/login"))
        .json(&json!({ "username": "user", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let register = |username: &'static str, password: &'static str| {
        client
            .post(srv.url("/api/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
    };

    assert_eq!(register("frank", "pw").await.unwrap().status(), StatusCode::CREATED);
    assert_eq!(register("frank", "other").await.unwrap().status(), StatusCode::CONFLICT);
    assert_eq!(register("", "pw").await.unwrap().status(), StatusCode::BAD_REQUEST);

    srv.login(&client, "frank", "pw").await;
}

#[tokio::test]
async fn book_and_return_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = srv.login(&client, "user", "pass123").await;
    let admin = srv.login(&client, "admin", "adminpass").await;

    let (status, body) = srv.post_bike_id(&client, "/api/book", &user, 101).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = srv.post_bike_id(&client, "/api/book", &admin, 101).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = srv.post_bike_id(&client, "/api/book", &user, 9_999).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = srv.post_bike_id(&client, "/api/return", &admin, 101).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = srv.post_bike_id(&client, "/api/return", &user, 101).await;
    assert_eq!(status, StatusCode::OK);

    let available: Value = client
        .get(srv.url("/api/bikes/available"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(available.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn list_and_remove_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = srv.login(&client, "user", "pass123").await;
    let admin = srv.login(&client, "admin", "adminpass").await;

    let res = client
        .post(srv.url("/api/list-bike"))
        .bearer_auth(&user)
        .json(&json!({
            "model": "Gravel King",
            "location": "Harbor",
            "modelYear": 2022,
            "rentRate": 14.5,
            "owner": "admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let listed: Value = res.json().await.unwrap();
    assert_eq!(listed["id"], 105);
    assert_eq!(listed["owner"], "user");
    assert_eq!(listed["isAvailable"], true);

    let res = client
        .post(srv.url("/api/list-bike"))
        .bearer_auth(&user)
        .json(&json!({ "model": "", "location": "Harbor" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mine: Value = client
        .get(srv.url("/api/my-bikes"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, body) = srv.post_bike_id(&client, "/api/remove-bike", &admin, 105).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("not the owner"));

    let (status, _) = srv.post_bike_id(&client, "/api/book", &admin, 105).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = srv.post_bike_id(&client, "/api/remove-bike", &user, 105).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("currently rented"));

    let (status, _) = srv.post_bike_id(&client, "/api/return", &admin, 105).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = srv.post_bike_id(&client, "/api/remove-bike", &user, 105).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = srv.post_bike_id(&client, "/api/remove-bike", &user, 105).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = srv.login(&client, "user", "pass123").await;

    let res = client
        .post(srv.url("/api/book"))
        .bearer_auth(&user)
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/api/book"))
        .bearer_auth(&user)
        .json(&json!({ "bikeId": "one-oh-one" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn websocket_receives_snapshot_then_updates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (mut ws, _) = tokio_tungstenite::connect_async(srv.ws_url.as_str())
        .await
        .expect("websocket handshake");

    let initial = next_snapshot(&mut ws).await;
    assert_eq!(initial.as_array().unwrap().len(), 4);
    assert_eq!(find_bike(&initial, 102)["isAvailable"], true);

    let user = srv.login(&client, "user", "pass123").await;
    let (status, _) = srv.post_bike_id(&client, "/api/book", &user, 102).await;
    assert_eq!(status, StatusCode::OK);

    let update = next_snapshot(&mut ws).await;
    assert_eq!(find_bike(&update, 102)["isAvailable"], false);
    assert_eq!(find_bike(&update, 102)["bookedBy"], "user");
}
