use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use super::models::Employee;
use crate::extract::{JsonBody, RecordId};
use crate::shared::{AppError, AppState, MessageResponse};

/// HTTP handler for fetching one employee
///
/// GET /employee?id=
#[instrument(name = "get_employee", skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<Employee>, AppError> {
    let employee = state
        .employee_repository
        .get_employee(id)
        .await?
        .ok_or_else(|| {
            warn!(employee_id = id, "Employee not found");
            AppError::NotFound(format!("Employee with id {} not found", id))
        })?;

    Ok(Json(employee))
}

/// HTTP handler for listing all employees
///
/// GET /employees
/// Returns an empty array when the table is empty
#[instrument(name = "list_employees", skip(state))]
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = state.employee_repository.list_employees().await?;

    info!(employee_count = employees.len(), "Employees listed successfully");

    Ok(Json(employees))
}

/// POST /add_employee
#[instrument(name = "create_employee", skip(state, employee))]
pub async fn create_employee(
    State(state): State<AppState>,
    JsonBody(employee): JsonBody<Employee>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let id = state.employee_repository.create_employee(&employee).await?;

    info!(employee_id = id, "Employee created successfully");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Employee created")),
    ))
}

/// POST /update_employee?id=
#[instrument(name = "update_employee", skip(state, employee))]
pub async fn update_employee(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(employee): JsonBody<Employee>,
) -> Result<Json<MessageResponse>, AppError> {
    let rows = state
        .employee_repository
        .update_employee(id, &employee)
        .await?;

    if rows == 0 {
        warn!(employee_id = id, "Update matched no employee");
    }

    Ok(Json(MessageResponse::new("Employee updated")))
}

/// DELETE /delete_employee?id=
#[instrument(name = "delete_employee", skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, AppError> {
    let rows = state.employee_repository.delete_employee(id).await?;

    if rows == 0 {
        warn!(employee_id = id, "Delete matched no employee");
    }

    Ok(Json(MessageResponse::new("Employee deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::repository::{EmployeeRepository, InMemoryEmployeeRepository};
    use crate::shared::test_utils::{body_string, request, AppStateBuilder, FailingRepository};
    use axum::{
        routing::{delete, get, post},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(repo: Arc<dyn EmployeeRepository + Send + Sync>) -> Router {
        let app_state = AppStateBuilder::new()
            .with_employee_repository(repo)
            .build();

        Router::new()
            .route("/employee", get(get_employee))
            .route("/employees", get(list_employees))
            .route("/add_employee", post(create_employee))
            .route("/update_employee", post(update_employee))
            .route("/delete_employee", delete(delete_employee))
            .with_state(app_state)
    }

    fn seeded() -> Arc<InMemoryEmployeeRepository> {
        Arc::new(InMemoryEmployeeRepository::with_employees(vec![Employee {
            id: 1,
            last_name: "Saidov".to_string(),
            first_name: "Anvar".to_string(),
            position: "Accountant".to_string(),
            ..Default::default()
        }]))
    }

    #[tokio::test]
    async fn test_get_employee_handler() {
        let response = app(seeded())
            .oneshot(request("GET", "/employee?id=1", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let employee: Employee = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(employee.id, 1);
        assert_eq!(employee.last_name, "Saidov");
    }

    #[tokio::test]
    async fn test_get_employee_not_found() {
        let response = app(seeded())
            .oneshot(request("GET", "/employee?id=2", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "Employee with id 2 not found");
    }

    #[tokio::test]
    async fn test_get_employee_non_numeric_id() {
        let response = app(seeded())
            .oneshot(request("GET", "/employee?id=abc", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_employees_empty_is_array() {
        let response = app(Arc::new(InMemoryEmployeeRepository::new()))
            .oneshot(request("GET", "/employees", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_list_employees_store_failure() {
        let response = app(Arc::new(FailingRepository))
            .oneshot(request("GET", "/employees", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_employee_handler() {
        let repo = Arc::new(InMemoryEmployeeRepository::new());

        let response = app(repo.clone())
            .oneshot(request(
                "POST",
                "/add_employee",
                None,
                Some(r#"{"lastname":"Olimova","firstname":"Zarina","email":"z@example.com"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: MessageResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.message, "Employee created");

        let stored = repo.get_employee(1).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Zarina");
        assert_eq!(stored.email, "z@example.com");
    }

    #[tokio::test]
    async fn test_create_employee_malformed_json() {
        let response = app(Arc::new(InMemoryEmployeeRepository::new()))
            .oneshot(request("POST", "/add_employee", None, Some(r#"{"lastname": "#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_employee_null_body_stores_empty_record() {
        let repo = Arc::new(InMemoryEmployeeRepository::new());

        let response = app(repo.clone())
            .oneshot(request("POST", "/add_employee", None, Some("null")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = repo.get_employee(1).await.unwrap().unwrap();
        assert_eq!(stored.last_name, "");
    }

    #[tokio::test]
    async fn test_create_employee_store_failure() {
        let response = app(Arc::new(FailingRepository))
            .oneshot(request("POST", "/add_employee", None, Some("{}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_employee_handler() {
        let repo = seeded();

        let response = app(repo.clone())
            .oneshot(request(
                "POST",
                "/update_employee?id=1",
                None,
                Some(r#"{"lastname":"Saidov","position":"Chief Accountant"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let stored = repo.get_employee(1).await.unwrap().unwrap();
        assert_eq!(stored.position, "Chief Accountant");
        // Full replacement: fields absent from the body are cleared
        assert_eq!(stored.first_name, "");
    }

    #[tokio::test]
    async fn test_update_employee_missing_id() {
        let response = app(seeded())
            .oneshot(request("POST", "/update_employee", None, Some("{}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_employee_malformed_body() {
        let response = app(seeded())
            .oneshot(request("POST", "/update_employee?id=1", None, Some("not json")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_employee_store_failure() {
        let response = app(Arc::new(FailingRepository))
            .oneshot(request("POST", "/update_employee?id=1", None, Some("{}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_nonexistent_employee_succeeds() {
        let response = app(seeded())
            .oneshot(request("POST", "/update_employee?id=404", None, Some("{}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_employee_handler() {
        let repo = seeded();

        let response = app(repo.clone())
            .oneshot(request("DELETE", "/delete_employee?id=1", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.message, "Employee deleted");
        assert!(repo.get_employee(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_employee_store_failure() {
        let response = app(Arc::new(FailingRepository))
            .oneshot(request("DELETE", "/delete_employee?id=1", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
