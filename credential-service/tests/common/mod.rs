use std::path::PathBuf;
use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use credential_service::domain::user::service::UserService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::JsonFileUserRepository;
use tempfile::TempDir;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub store: TestStore,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

/// Temporary user store file, removed on drop
pub struct TestStore {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let store = TestStore::new();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_repo = Arc::new(
            JsonFileUserRepository::open(&store.path)
                .await
                .expect("Failed to open user store"),
        );

        // Lowest work factor keeps the suite fast
        let authenticator = Arc::new(
            Authenticator::new(TEST_SECRET)
                .expect("Failed to create authenticator")
                .with_password_hasher(PasswordHasher::with_work_factor(1).unwrap()),
        );

        let user_service = Arc::new(UserService::new(user_repo, authenticator));
        let router = create_router(user_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            store,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET).unwrap(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/users")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("db.json");
        Self { dir, path }
    }

    /// Parsed contents of the store file
    pub fn contents(&self) -> serde_json::Value {
        let bytes = std::fs::read(&self.path).expect("Failed to read store file");
        serde_json::from_slice(&bytes).expect("Store file is not valid JSON")
    }
}
