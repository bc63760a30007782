use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::models::Employee;
use crate::shared::AppError;

/// Trait for employee repository operations
///
/// `update_employee` and `delete_employee` return the number of rows touched;
/// zero is not an error at this layer.
#[async_trait]
pub trait EmployeeRepository {
    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError>;
    async fn list_employees(&self) -> Result<Vec<Employee>, AppError>;
    /// Stores every field except `id` and returns the id assigned by the store
    async fn create_employee(&self, employee: &Employee) -> Result<i64, AppError>;
    async fn update_employee(&self, id: i64, employee: &Employee) -> Result<u64, AppError>;
    async fn delete_employee(&self, id: i64) -> Result<u64, AppError>;
}

struct EmployeeTable {
    rows: BTreeMap<i64, Employee>,
    next_id: i64,
}

/// In-memory implementation of EmployeeRepository for development and testing
///
/// Ids are handed out sequentially from 1 and never reused, like a serial column.
pub struct InMemoryEmployeeRepository {
    table: Mutex<EmployeeTable>,
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::with_employees(Vec::new())
    }

    /// Creates a repository pre-populated with rows, keeping their ids
    pub fn with_employees(employees: Vec<Employee>) -> Self {
        let next_id = employees.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let rows = employees.into_iter().map(|e| (e.id, e)).collect();

        Self {
            table: Mutex::new(EmployeeTable { rows, next_id }),
        }
    }

    pub fn employee_count(&self) -> usize {
        self.table.lock().map(|t| t.rows.len()).unwrap_or(0)
    }

    fn table(&self) -> Result<MutexGuard<'_, EmployeeTable>, AppError> {
        self.table.lock().map_err(|_| {
            warn!("Employee table lock poisoned");
            AppError::Internal
        })
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    #[instrument(skip(self))]
    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let employee = self.table()?.rows.get(&id).cloned();
        debug!(found = employee.is_some(), "Fetched employee from memory");
        Ok(employee)
    }

    #[instrument(skip(self))]
    async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        Ok(self.table()?.rows.values().cloned().collect())
    }

    #[instrument(skip(self, employee))]
    async fn create_employee(&self, employee: &Employee) -> Result<i64, AppError> {
        let mut table = self.table()?;
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(
            id,
            Employee {
                id,
                ..employee.clone()
            },
        );

        debug!(employee_id = id, "Employee created in memory");
        Ok(id)
    }

    #[instrument(skip(self, employee))]
    async fn update_employee(&self, id: i64, employee: &Employee) -> Result<u64, AppError> {
        let mut table = self.table()?;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = Employee {
                    id,
                    ..employee.clone()
                };
                Ok(1)
            }
            None => Ok(0),
        }
    }

    #[instrument(skip(self))]
    async fn delete_employee(&self, id: i64) -> Result<u64, AppError> {
        Ok(self.table()?.rows.remove(&id).map_or(0, |_| 1))
    }
}

const EMPLOYEE_COLUMNS: &str = "id, lastname, firstname, middlename, position, department, email, phonenumber, hiredate, status, photourl, notes";

/// PostgreSQL implementation of employee repository
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    #[instrument(skip(self))]
    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let query = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);

        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, employee_id = id, "Failed to fetch employee from database");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let query = format!("SELECT {} FROM employees ORDER BY id", EMPLOYEE_COLUMNS);

        let employees = sqlx::query_as::<_, Employee>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list employees from database");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(employee_count = employees.len(), "Employees listed from database");
        Ok(employees)
    }

    #[instrument(skip(self, employee))]
    async fn create_employee(&self, employee: &Employee) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO employees (lastname, firstname, middlename, position, department, email, phonenumber, hiredate, status, photourl, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING id",
        )
        .bind(&employee.last_name)
        .bind(&employee.first_name)
        .bind(&employee.middle_name)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(&employee.email)
        .bind(&employee.phone_number)
        .bind(&employee.hire_date)
        .bind(&employee.status)
        .bind(&employee.photo_url)
        .bind(&employee.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create employee in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(employee_id = id, "Employee created in database");
        Ok(id)
    }

    #[instrument(skip(self, employee))]
    async fn update_employee(&self, id: i64, employee: &Employee) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE employees SET lastname = $1, firstname = $2, middlename = $3, position = $4, department = $5, \
             email = $6, phonenumber = $7, hiredate = $8, status = $9, photourl = $10, notes = $11 WHERE id = $12",
        )
        .bind(&employee.last_name)
        .bind(&employee.first_name)
        .bind(&employee.middle_name)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(&employee.email)
        .bind(&employee.phone_number)
        .bind(&employee.hire_date)
        .bind(&employee.status)
        .bind(&employee.photo_url)
        .bind(&employee.notes)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, employee_id = id, "Failed to update employee in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_employee(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, employee_id = id, "Failed to delete employee from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
