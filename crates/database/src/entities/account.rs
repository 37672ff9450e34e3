//! OAuth account link entity

use serde::Serialize;

/// Links a user to an identity at an external OAuth provider.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub provider: String,
    pub provider_account_id: String,
    pub created_at: String,
}
