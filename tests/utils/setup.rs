use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use staffdesk::{
    auth::{Clock, TokenService},
    build_router,
    employee::repository::InMemoryEmployeeRepository,
    user::repository::InMemoryUserRepository,
    AppState, Employee, User,
};

pub const SECRET: &str = "integration-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub state: AppState,
    pub employees: Arc<InMemoryEmployeeRepository>,
    pub users: Arc<InMemoryUserRepository>,
}

pub struct TestSetupBuilder {
    users: Vec<User>,
    employees: Vec<Employee>,
    clock: Option<Arc<dyn Clock>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            employees: vec![],
            clock: None,
        }
    }

    pub fn with_user(mut self, username: &str, password: &str, role: &str) -> Self {
        let id = self.users.len() as i64 + 1;
        self.users.push(User {
            id,
            username: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        });
        self
    }

    /// admin/secret with the admin role and clerk/hunter2 with a regular role
    pub fn with_default_users(self) -> Self {
        self.with_user("admin", "secret", "admin")
            .with_user("clerk", "hunter2", "user")
    }

    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.push(employee);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> TestSetup {
        let token_service = match self.clock {
            Some(clock) => TokenService::with_clock(SECRET, clock),
            None => TokenService::new(SECRET),
        };
        let employees = Arc::new(InMemoryEmployeeRepository::with_employees(self.employees));
        let users = Arc::new(InMemoryUserRepository::with_users(self.users));

        let state = AppState::new(Arc::new(token_service), employees.clone(), users.clone());

        TestSetup {
            app: build_router(state.clone()),
            state,
            employees,
            users,
        }
    }
}

impl TestSetup {
    /// Sends one request through the full router and returns status and body text
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Logs in through POST /login and returns the token, panicking on failure
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({ "username": username, "password": password }).to_string();
        let (status, body) = self.send("POST", "/login", None, Some(&body)).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        value["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login("admin", "secret").await
    }
}
