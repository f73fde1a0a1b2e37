use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{NewUser, UserModel};
use crate::shared::AppError;

/// Trait for user (credential store) operations.
///
/// Lookups return `Ok(None)` when no user matches; a duplicate email on
/// create is reported as [`AppError::Conflict`]. Every other failure is
/// [`AppError::Internal`].
#[async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserModel>, AppError>;
}

fn email_exists() -> AppError {
    AppError::Conflict("email already exists".to_string())
}

struct UserTable {
    next_id: i64,
    users: HashMap<i64, UserModel>,
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
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            table: Mutex::new(UserTable {
                next_id: 1,
                users: HashMap::new(),
            }),
        }
    }

    /// Returns the current number of users in the repository
    pub fn user_count(&self) -> usize {
        self.table.lock().map(|t| t.users.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, UserTable>, AppError> {
        self.table
            .lock()
            .map_err(|_| AppError::Internal("user table lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in memory");

        let mut table = self.lock()?;
        if table
            .users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            warn!("Email already registered in memory");
            return Err(email_exists());
        }

        let now = Utc::now();
        let id = table.next_id;
        table.next_id += 1;

        let created = UserModel {
            id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            university: user.university.clone(),
            created_at: now,
            updated_at: now,
        };
        table.users.insert(id, created.clone());

        debug!(user_id = id, "User created successfully in memory");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user by email from memory");

        let table = self.lock()?;
        let user = table
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned();

        if user.is_none() {
            debug!("User not found in memory");
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user by id from memory");

        let table = self.lock()?;
        Ok(table.users.get(&user_id).cloned())
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

const USER_COLUMNS: &str =
    "id, full_name, email, password_hash, university, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in database");

        let query = format!(
            "INSERT INTO users (full_name, email, password_hash, university) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );

        let created = sqlx::query_as::<_, UserModel>(&query)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.university)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                    warn!("Email already registered in database");
                    email_exists()
                }
                _ => {
                    warn!(error = %e, "Failed to create user in database");
                    AppError::Internal(format!("create user: {e}"))
                }
            })?;

        debug!(user_id = created.id, "User created successfully in database");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user by email from database");

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, UserModel>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch user by email from database");
                AppError::Internal(format!("get user by email: {e}"))
            })
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user by id from database");

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserModel>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = user_id, "Failed to fetch user by id from database");
                AppError::Internal(format!("get user by id: {e}"))
            })
    }
}
