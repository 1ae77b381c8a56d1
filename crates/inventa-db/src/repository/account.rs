//! # Account Repository
//!
//! Named operator accounts gating access to the tracker.
//!
//! ## Key Operations
//! - First-run bootstrap of the default admin account
//! - Credential check at login
//! - Admin-only create/delete of accounts
//!
//! Accounts gate entry to the application; they carry no per-operation
//! permissions beyond the admin/standard role split.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use inventa_core::validation::validate_account_name;
use inventa_core::{
    Account, Role, ValidationError, DEFAULT_ADMIN_CREDENTIAL, DEFAULT_ADMIN_NAME,
};

/// Settings key recording that the default admin was already created, so
/// deleting that account later does not resurrect it on restart.
const ADMIN_SEEDED_KEY: &str = "admin_seeded";

/// Repository for operator accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Creates the default admin account on first run.
    ///
    /// Seeding happens at most once per database, tracked by a settings
    /// flag rather than by the account's existence. Once seeded, the
    /// default admin is never recreated, even if it has been deleted.
    ///
    /// ## Returns
    /// * `Ok(true)` - the default admin was created by this call
    /// * `Ok(false)` - the database was already seeded
    pub async fn ensure_default_admin(&self) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let seeded: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
                .bind(ADMIN_SEEDED_KEY)
                .fetch_optional(&mut *tx)
                .await?;

        if seeded.as_deref() == Some("true") {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO accounts (name, credential, role)
            VALUES (?1, ?2, 'admin')
            "#,
        )
        .bind(DEFAULT_ADMIN_NAME)
        .bind(DEFAULT_ADMIN_CREDENTIAL)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?1, 'true')")
            .bind(ADMIN_SEEDED_KEY)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(name = %DEFAULT_ADMIN_NAME, "Default admin account created");

        Ok(true)
    }

    /// Checks a name/credential pair.
    ///
    /// ## Returns
    /// * `Ok(Some(Role))` - credentials match; role of the account
    /// * `Ok(None)` - unknown name or wrong credential (indistinguishable
    ///   on purpose)
    pub async fn authenticate(&self, name: &str, credential: &str) -> DbResult<Option<Role>> {
        let role = sqlx::query_scalar::<_, Role>(
            "SELECT role FROM accounts WHERE name = ?1 AND credential = ?2",
        )
        .bind(name.trim())
        .bind(credential)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    /// Creates an account.
    ///
    /// ## Errors
    /// * `Validation` - empty name or credential, name too long
    /// * `UniqueViolation` - the name is already taken
    pub async fn create(&self, name: &str, credential: &str, role: Role) -> DbResult<Account> {
        let name = name.trim();
        validate_account_name(name)?;
        if credential.is_empty() {
            return Err(ValidationError::Required {
                field: "credential".to_string(),
            }
            .into());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (name, credential, role)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(credential)
        .bind(role)
        .execute(&self.pool)
        .await?;

        info!(name = %name, role = %role, "Account created");

        Ok(Account {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            credential: credential.to_string(),
            role,
        })
    }

    /// Deletes an account by name.
    ///
    /// Deleting the default admin is allowed; the seeded flag keeps it
    /// from coming back.
    ///
    /// ## Errors
    /// * `NotFound` - no account has this name
    pub async fn delete(&self, name: &str) -> DbResult<()> {
        let name = name.trim();

        let result = sqlx::query("DELETE FROM accounts WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Account", name));
        }

        info!(name = %name, "Account deleted");

        Ok(())
    }

    /// Lists all accounts, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, credential, role
            FROM accounts
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
