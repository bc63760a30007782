use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::models::User;
use crate::shared::AppError;

/// Trait for user repository operations, including the login lookup
#[async_trait]
pub trait UserRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn create_user(&self, user: &User) -> Result<i64, AppError>;
    async fn update_user(&self, id: i64, user: &User) -> Result<u64, AppError>;
    async fn delete_user(&self, id: i64) -> Result<u64, AppError>;

    /// Role of the user whose username and password both match exactly
    async fn find_role(&self, username: &str, password: &str) -> Result<Option<String>, AppError>;
}

struct UserTable {
    rows: BTreeMap<i64, User>,
    next_id: i64,
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Creates a repository pre-populated with users, keeping their ids
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let rows = users.into_iter().map(|u| (u.id, u)).collect();

        Self {
            table: Mutex::new(UserTable { rows, next_id }),
        }
    }

    pub fn user_count(&self) -> usize {
        self.table.lock().map(|t| t.rows.len()).unwrap_or(0)
    }

    fn table(&self) -> Result<MutexGuard<'_, UserTable>, AppError> {
        self.table.lock().map_err(|_| {
            warn!("User table lock poisoned");
            AppError::Internal
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.table()?.rows.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.table()?.rows.values().cloned().collect())
    }

    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &User) -> Result<i64, AppError> {
        let mut table = self.table()?;
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(
            id,
            User {
                id,
                ..user.clone()
            },
        );

        debug!(user_id = id, username = %user.username, "User created in memory");
        Ok(id)
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, id: i64, user: &User) -> Result<u64, AppError> {
        let mut table = self.table()?;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = User {
                    id,
                    ..user.clone()
                };
                Ok(1)
            }
            None => Ok(0),
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: i64) -> Result<u64, AppError> {
        Ok(self.table()?.rows.remove(&id).map_or(0, |_| 1))
    }

    #[instrument(skip(self, password))]
    async fn find_role(&self, username: &str, password: &str) -> Result<Option<String>, AppError> {
        // First match in id order, as a sequential scan would return it
        let role = self
            .table()?
            .rows
            .values()
            .find(|u| u.username == username && u.password == password)
            .map(|u| u.role.clone());

        debug!(matched = role.is_some(), "Credential lookup in memory");
        Ok(role)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT id, username, password, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = id, "Failed to fetch user from database");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT id, username, password, role FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list users from database");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &User) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %user.username, "Failed to create user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(user_id = id, "User created in database");
        Ok(id)
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, id: i64, user: &User) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE users SET username = $1, password = $2, role = $3 WHERE id = $4")
                .bind(&user.username)
                .bind(&user.password)
                .bind(&user.role)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, user_id = id, "Failed to update user in database");
                    AppError::DatabaseError(e.to_string())
                })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = id, "Failed to delete user from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self, password))]
    async fn find_role(&self, username: &str, password: &str) -> Result<Option<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT role FROM users WHERE username = $1 AND password = $2 LIMIT 1",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to look up credentials in database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
