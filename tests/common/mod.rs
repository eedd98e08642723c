#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use authflow::configuration::{JwtSettings, PasswordSettings};
use authflow::startup::run;
use authflow::store::{InMemoryUserStore, UserStore};
use serde_json::{json, Value};

/// Cheapest cost bcrypt accepts; keeps sign-ups fast.
pub const TEST_HASH_COST: u32 = 4;

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryUserStore>,
    pub jwt: JwtSettings,
    pub client: reqwest::Client,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry_days: 7,
        issuer: "authflow-test".to_string(),
    }
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(InMemoryUserStore::new());
    spawn_app_with_store(store.clone(), store)
}

/// Serves `serving` while handing `store` back for direct inspection.
pub fn spawn_app_with_store(
    serving: Arc<dyn UserStore>,
    store: Arc<InMemoryUserStore>,
) -> TestApp {
    spawn_app_with(serving, store, jwt_settings())
}

pub fn spawn_app_with(
    serving: Arc<dyn UserStore>,
    store: Arc<InMemoryUserStore>,
    jwt: JwtSettings,
) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let password = PasswordSettings {
        hash_cost: TEST_HASH_COST,
    };
    let server = run(listener, serving, jwt.clone(), password).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        jwt,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub async fn post_sign_up(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(&format!("{}/sign-up", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_sign_in(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(&format!("{}/sign-in", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_refresh(&self, refresh_token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.post(&format!("{}/refresh", &self.address));
        if let Some(token) = refresh_token {
            request = request.header("Cookie", format!("__refresh_token={}", token));
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// Signs up `alice` and returns the refresh token from the cookie.
    pub async fn sign_up_alice(&self) -> String {
        let response = self.post_sign_up(&alice()).await;
        assert_eq!(201, response.status().as_u16());
        refresh_cookie(&response)
            .expect("sign-up should set the refresh cookie")
            .value()
            .to_string()
    }
}

pub fn alice() -> Value {
    json!({
        "username": "Alice",
        "email": "alice@example.com",
        "password": "correct horse battery staple"
    })
}

pub fn refresh_cookie(response: &reqwest::Response) -> Option<Cookie<'static>> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|h| h.to_str().ok())
        .filter_map(|h| Cookie::parse(h.to_string()).ok())
        .find(|c| c.name() == "__refresh_token")
}
