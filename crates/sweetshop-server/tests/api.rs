//! End-to-end tests through the real router on an in-memory database.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use sweetshop_biscuit::{KeyPair, SessionClaims, TokenBuilder};
use sweetshop_core::Role;
use sweetshop_server::{AppConfig, AppState, build_router};
use tower::ServiceExt;
use uuid::Uuid;

const ADMIN_PASSWORD: &str = "admin-pass";

struct TestApp {
    router: Router,
    state: Arc<AppState>,
}

impl TestApp {
    async fn new() -> Self {
        let mut cfg = AppConfig::default();
        cfg.database.sqlite_path = ":memory:".to_string();
        cfg.auth.admin.password = ADMIN_PASSWORD.to_string();

        let state = Arc::new(AppState::init(&cfg).await.unwrap());
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    async fn token_for(&self, username: &str, password: &str) -> String {
        let (status, body) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        self.token_for("admin", ADMIN_PASSWORD).await
    }

    async fn user_token(&self) -> String {
        let (status, _) = self.register("shopper", "pw-123").await;
        assert_eq!(status, StatusCode::CREATED);
        self.token_for("shopper", "pw-123").await
    }

    async fn create_sweet(&self, token: &str, body: Value) -> Value {
        let (status, created) = self.send(Method::POST, "/api/sweets", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
        created
    }
}

fn chocolate_bar() -> Value {
    json!({ "name": "Chocolate Bar", "category": "Chocolate", "price": 2.50, "quantity": 100 })
}

#[tokio::test]
async fn healthz_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "service": "sweetshop-server" }));
}

#[tokio::test]
async fn register_and_login() {
    let app = TestApp::new().await;

    let (status, user) = app.register("alice", "wonderland").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "alice");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());
    assert!(Uuid::parse_str(user["id"].as_str().unwrap()).is_ok());

    let (status, body) = app.register("alice", "other").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = app.login("alice", "wonderland").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "user");
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body["expiresAt"].is_string());

    // Wrong password and unknown user are indistinguishable.
    let (wrong_status, wrong_body) = app.login("alice", "nope").await;
    let (unknown_status, unknown_body) = app.login("bob", "nope").await;
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(Method::POST, "/api/auth/register", None, Some(json!({ "username": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = app.register("   ", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_failures_have_distinct_codes() {
    let app = TestApp::new().await;

    let (status, _) = app.send(Method::GET, "/api/sweets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send(Method::GET, "/api/sweets", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let foreign = TokenBuilder::new(KeyPair::generate().unwrap());
    let (foreign_token, _) = foreign
        .mint_session_token(Uuid::new_v4(), Role::Admin, chrono::Duration::hours(1))
        .unwrap();
    let (status, _) = app
        .send(Method::GET, "/api/sweets", Some(&foreign_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut claims = SessionClaims::new(Uuid::new_v4(), Role::Admin, chrono::Duration::hours(1));
    claims.expires_at = claims.issued_at - chrono::Duration::seconds(5);
    let expired = app.state.tokens.mint(&claims).unwrap();
    let (status, _) = app.send(Method::GET, "/api/sweets", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inventory_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;

    let created = app.create_sweet(&admin, chocolate_bar()).await;
    assert_eq!(created["name"], "Chocolate Bar");
    assert_eq!(created["price"], 2.5);
    let id = created["id"].as_i64().unwrap();

    let (status, bought) = app
        .send(
            Method::POST,
            &format!("/api/sweets/{id}/purchase"),
            Some(&user),
            Some(json!({ "quantity": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bought["quantity"], 95);

    let (status, restocked) = app
        .send(
            Method::POST,
            &format!("/api/sweets/{id}/restock"),
            Some(&admin),
            Some(json!({ "quantity": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restocked["quantity"], 105);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/sweets/{id}/restock"),
            Some(&user),
            Some(json!({ "quantity": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/sweets/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = app
        .send(Method::GET, &format!("/api/sweets/{id}"), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn regular_users_can_read_and_purchase_only() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    let id = app.create_sweet(&admin, chocolate_bar()).await["id"].as_i64().unwrap();

    let reads = [
        (Method::GET, "/api/sweets".to_string(), None),
        (Method::GET, "/api/sweets/search?name=choc".to_string(), None),
        (Method::GET, format!("/api/sweets/{id}"), None),
        (
            Method::POST,
            format!("/api/sweets/{id}/purchase"),
            Some(json!({ "quantity": 1 })),
        ),
    ];
    for (method, uri, body) in reads {
        let (status, _) = app.send(method.clone(), &uri, Some(&user), body).await;
        assert_eq!(status, StatusCode::OK, "{method} {uri}");
    }

    let writes = [
        (Method::POST, "/api/sweets".to_string(), Some(chocolate_bar())),
        (
            Method::PUT,
            format!("/api/sweets/{id}"),
            Some(json!({ "price": 9.99 })),
        ),
        (Method::DELETE, format!("/api/sweets/{id}"), None),
        (
            Method::POST,
            format!("/api/sweets/{id}/restock"),
            Some(json!({ "quantity": 1 })),
        ),
    ];
    for (method, uri, body) in writes {
        let (status, body) = app.send(method.clone(), &uri, Some(&user), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error"], "forbidden");
    }

    // Nothing changed except the single purchase.
    let (_, sweet) = app
        .send(Method::GET, &format!("/api/sweets/{id}"), Some(&user), None)
        .await;
    assert_eq!(sweet["quantity"], 99);
    assert_eq!(sweet["price"], 2.5);
}

#[tokio::test]
async fn purchase_validation_and_overdraw() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    let id = app
        .create_sweet(
            &admin,
            json!({ "name": "Caramel Fudge", "category": "Fudge", "price": "3.00", "quantity": 4 }),
        )
        .await["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/sweets/{id}/purchase");

    let (status, body) = app
        .send(Method::POST, &uri, Some(&user), Some(json!({ "quantity": 5 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("insufficient stock"));

    for bad in [json!({ "quantity": 0 }), json!({ "quantity": -2 }), json!({})] {
        let (status, _) = app.send(Method::POST, &uri, Some(&user), Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, sweet) = app
        .send(Method::GET, &format!("/api/sweets/{id}"), Some(&user), None)
        .await;
    assert_eq!(sweet["quantity"], 4);

    let (status, sweet) = app
        .send(Method::POST, &uri, Some(&user), Some(json!({ "quantity": 4 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sweet["quantity"], 0);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/sweets/9999/purchase",
            Some(&user),
            Some(json!({ "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_filters() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    for body in [
        json!({ "name": "Dark Chocolate Truffle", "category": "Chocolate", "price": 2.50, "quantity": 50 }),
        json!({ "name": "Gummy Bears", "category": "Gummies", "price": 1.20, "quantity": 100 }),
        json!({ "name": "Sour Worms", "category": "Gummies", "price": 1.50, "quantity": 75 }),
        json!({ "name": "Milk Chocolate", "category": "Chocolate Bars", "price": 1.00, "quantity": 10 }),
    ] {
        app.create_sweet(&admin, body).await;
    }

    let names = |sweets: &Value| -> Vec<String> {
        sweets
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, all) = app.send(Method::GET, "/api/sweets", Some(&admin), None).await;
    let (_, unfiltered) = app
        .send(Method::GET, "/api/sweets/search", Some(&admin), None)
        .await;
    assert_eq!(all, unfiltered);
    assert_eq!(all.as_array().unwrap().len(), 4);

    let (_, found) = app
        .send(Method::GET, "/api/sweets/search?name=CHOCOLATE", Some(&admin), None)
        .await;
    assert_eq!(names(&found), ["Dark Chocolate Truffle", "Milk Chocolate"]);

    let (_, found) = app
        .send(Method::GET, "/api/sweets/search?category=Chocolate", Some(&admin), None)
        .await;
    assert_eq!(names(&found), ["Dark Chocolate Truffle"]);

    let (_, found) = app
        .send(
            Method::GET,
            "/api/sweets/search?category=Gummies&minPrice=1.25&maxPrice=2",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(names(&found), ["Sour Worms"]);

    let (_, found) = app
        .send(Method::GET, "/api/sweets/search?q=worm", Some(&admin), None)
        .await;
    assert_eq!(names(&found), ["Sour Worms"]);

    let (status, body) = app
        .send(Method::GET, "/api/sweets/search?minPrice=cheap", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn update_merges_and_validates() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let id = app.create_sweet(&admin, chocolate_bar()).await["id"].as_i64().unwrap();
    let uri = format!("/api/sweets/{id}");

    let (status, updated) = app
        .send(Method::PUT, &uri, Some(&admin), Some(json!({ "price": "3.25", "quantity": 7 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Chocolate Bar");
    assert_eq!(updated["category"], "Chocolate");
    assert_eq!(updated["price"], 3.25);
    assert_eq!(updated["quantity"], 7);

    let (status, unchanged) = app.send(Method::PUT, &uri, Some(&admin), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);

    for bad in [json!({ "name": "  " }), json!({ "quantity": -1 }), json!({ "price": -1 })] {
        let (status, _) = app.send(Method::PUT, &uri, Some(&admin), Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = app
        .send(Method::PUT, "/api/sweets/9999", Some(&admin), Some(json!({ "quantity": 1 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_is_bad_request() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .send(Method::GET, "/api/sweets/not-a-number", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/sweets",
            Some(&admin),
            Some(json!({ "name": "Fudge", "price": 3, "quantity": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("category"));

    let (status, _) = app
        .send(
            Method::POST,
            "/api/sweets",
            Some(&admin),
            Some(json!({ "name": "Fudge", "category": "Fudge", "price": 2.999, "quantity": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, listed) = app.send(Method::GET, "/api/sweets", Some(&admin), None).await;
    assert_eq!(listed, json!([]));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sweets")
        .header(header::AUTHORIZATION, format!("Bearer {admin}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn restock_rejects_overflow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let id = app.create_sweet(&admin, chocolate_bar()).await["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/sweets/{id}/restock"),
            Some(&admin),
            Some(json!({ "quantity": u32::MAX })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
