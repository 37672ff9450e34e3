//! User repository for database operations.

use crate::entities::{Account, CreateUserRequest, User};
use crate::types::{timestamp_now, DatabaseError, DatabaseResult};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqlitePool, Transaction};

const USER_COLUMNS: &str = "id, public_id, name, email, email_verified, image, hashed_password, favorite_ids, created_at, updated_at";

/// Repository for user and linked-account operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Insert a user. A taken email surfaces as [`DatabaseError::Duplicate`].
    pub async fn create(&self, request: &CreateUserRequest) -> DatabaseResult<User> {
        let mut tx = self.pool.begin().await?;
        let id = insert_user(&mut tx, request).await?;
        tx.commit().await?;

        self.require(id).await
    }

    /// Replace the stored favorites array wholesale.
    pub async fn update_favorite_ids(
        &self,
        id: i64,
        favorite_ids: &[String],
    ) -> DatabaseResult<User> {
        let encoded = serde_json::to_string(favorite_ids)?;

        let result = sqlx::query("UPDATE users SET favorite_ids = ?, updated_at = ? WHERE id = ?")
            .bind(encoded)
            .bind(timestamp_now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {id}")));
        }

        self.require(id).await
    }

    /// Find the user linked to an external provider identity
    pub async fn find_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            "SELECT u.id, u.public_id, u.name, u.email, u.email_verified, u.image, u.hashed_password, u.favorite_ids, u.created_at, u.updated_at
             FROM accounts a
             JOIN users u ON u.id = a.user_id
             WHERE a.provider = ? AND a.provider_account_id = ?",
        )
        .bind(provider)
        .bind(provider_account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn link_account(
        &self,
        user_id: i64,
        provider: &str,
        provider_account_id: &str,
    ) -> DatabaseResult<Account> {
        let mut tx = self.pool.begin().await?;
        let account = insert_account(&mut tx, user_id, provider, provider_account_id).await?;
        tx.commit().await?;
        Ok(account)
    }

    /// Create a user and its provider link atomically.
    pub async fn create_with_account(
        &self,
        request: &CreateUserRequest,
        provider: &str,
        provider_account_id: &str,
    ) -> DatabaseResult<User> {
        let mut tx = self.pool.begin().await?;
        let id = insert_user(&mut tx, request).await?;
        insert_account(&mut tx, id, provider, provider_account_id).await?;
        tx.commit().await?;

        self.require(id).await
    }

    pub async fn accounts_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT id, user_id, provider, provider_account_id, created_at FROM accounts WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn require(&self, id: i64) -> DatabaseResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }
}

async fn insert_user(
    tx: &mut Transaction<'_, Sqlite>,
    request: &CreateUserRequest,
) -> DatabaseResult<i64> {
    let now = timestamp_now();

    let result = sqlx::query(
        "INSERT INTO users (public_id, name, email, image, hashed_password, favorite_ids, created_at, updated_at) VALUES (?, ?, ?, ?, ?, '[]', ?, ?)",
    )
    .bind(cuid2::cuid())
    .bind(&request.name)
    .bind(&request.email)
    .bind(&request.image)
    .bind(&request.hashed_password)
    .bind(&now)
    .bind(&now)
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn insert_account(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    provider: &str,
    provider_account_id: &str,
) -> DatabaseResult<Account> {
    let now = timestamp_now();

    let result = sqlx::query(
        "INSERT INTO accounts (user_id, provider, provider_account_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(provider)
    .bind(provider_account_id)
    .bind(&now)
    .execute(&mut **tx)
    .await?;

    Ok(Account {
        id: result.last_insert_rowid(),
        user_id,
        provider: provider.to_string(),
        provider_account_id: provider_account_id.to_string(),
        created_at: now,
    })
}

fn user_from_row(row: &SqliteRow) -> DatabaseResult<User> {
    let favorite_ids: String = row.try_get("favorite_ids")?;

    Ok(User {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        email_verified: row.try_get("email_verified")?,
        image: row.try_get("image")?,
        hashed_password: row.try_get("hashed_password")?,
        favorite_ids: serde_json::from_str(&favorite_ids)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
