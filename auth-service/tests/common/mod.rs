use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use auth_service::config::CookieConfig;
use auth_service::domain::user::models::UserId;
use auth_service::domain::user::ports::UserRepository;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    /// Client with a cookie store, behaves like a browser
    pub api_client: reqwest::Client,
    /// Signs tokens with the same key pair as the server
    pub jwt_handler: JwtHandler,
}

/// A user registered through the API.
pub struct RegisteredUser {
    pub id: String,
    pub token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let keys = auth::testutil::primary_keys();
        let repository = Arc::new(InMemoryUserRepository::new());
        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));
        let authenticator = Arc::new(
            Authenticator::new(&keys, Duration::hours(24)).expect("Failed to build authenticator"),
        );

        // Plain http: a Secure cookie would never be sent back by the client
        let cookie = CookieConfig {
            secure: false,
            ..CookieConfig::default()
        };

        let router = create_router(user_service, authenticator, cookie);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let jwt_handler =
            JwtHandler::new(&keys, Duration::hours(24)).expect("Failed to build jwt handler");

        Self {
            address,
            repository,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            jwt_handler,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token and no cookies
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().get(self.url(path)).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token and no cookies
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new()
            .patch(self.url(path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token and no cookies
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new()
            .delete(self.url(path))
            .bearer_auth(token)
    }

    /// Register a user through the API; the cookie lands in `api_client`.
    pub async fn register(&self, username: &str, password: &str) -> RegisteredUser {
        let response = self
            .post("/api/users")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        RegisteredUser {
            id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    /// Flip the admin flag directly in the store.
    pub async fn promote_to_admin(&self, user_id: &str) {
        let id = UserId::from_string(user_id).unwrap();
        let mut user = self
            .repository
            .find_by_id(&id)
            .await
            .unwrap()
            .expect("user exists");
        user.admin = true;
        self.repository.update(user).await.unwrap();
    }
}
