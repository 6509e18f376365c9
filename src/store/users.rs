//! User queries.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{NewUser, Role, User, UserRates};

use super::Database;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, price_per_pkg, super_rate";

/// Raw `users` row; rates and role are stored as text.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    price_per_pkg: String,
    super_rate: String,
}

impl TryFrom<UserRow> for User {
    type Error = LedgerError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role).map_err(|_| LedgerError::CorruptRecord {
            field: "users.role".to_string(),
            message: format!("unknown role '{}'", row.role),
        })?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            price_per_pkg: decode_decimal("users.price_per_pkg", &row.price_per_pkg)?,
            super_rate: decode_decimal("users.super_rate", &row.super_rate)?,
        })
    }
}

fn decode_decimal(field: &str, raw: &str) -> LedgerResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| LedgerError::CorruptRecord {
        field: field.to_string(),
        message: e.to_string(),
    })
}

impl Database {
    /// Looks up a user by id.
    pub async fn find_user(&self, id: i64) -> LedgerResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Looks up a user by email; the caller normalizes the email first.
    pub async fn find_user_by_email(&self, email: &str) -> LedgerResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Like [`Database::find_user`], but a missing user is an error.
    pub async fn get_user(&self, id: i64) -> LedgerResult<User> {
        self.find_user(id)
            .await?
            .ok_or(LedgerError::NotFound { resource: "User", id })
    }

    /// Lists all users ordered by name.
    pub async fn list_users(&self) -> LedgerResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY name, id"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Returns true if at least one admin account exists.
    pub async fn admin_exists(&self) -> LedgerResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(self.pool())
            .await?;
        Ok(count > 0)
    }

    /// Inserts a user, rejecting an email that is already registered.
    pub async fn create_user(&self, user: &NewUser) -> LedgerResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role, price_per_pkg, super_rate) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.price_per_pkg.to_string())
        .bind(user.super_rate.to_string())
        .execute(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                LedgerError::DuplicateEmail {
                    email: user.email.clone(),
                }
            }
            other => LedgerError::Database(other),
        })?;

        self.get_user(result.last_insert_rowid()).await
    }

    /// Overwrites a user's role and pay rates.
    ///
    /// Demoting the only remaining admin is refused with a validation error
    /// on `role`.
    pub async fn update_user_rates(&self, id: i64, rates: &UserRates) -> LedgerResult<User> {
        // last-admin guard is part of the UPDATE itself
        let result = sqlx::query(
            "UPDATE users SET role = ?, price_per_pkg = ?, super_rate = ? \
             WHERE id = ? \
               AND (? = 'admin' OR role <> 'admin' \
                    OR (SELECT COUNT(*) FROM users WHERE role = 'admin' AND id <> ?) > 0)",
        )
        .bind(rates.role.as_str())
        .bind(rates.price_per_pkg.to_string())
        .bind(rates.super_rate.to_string())
        .bind(id)
        .bind(rates.role.as_str())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            // either the user is missing or the guard held
            self.get_user(id).await?;
            return Err(LedgerError::validation("role", "cannot demote the last admin"));
        }
        self.get_user(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str, role: Role) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
            price_per_pkg: Decimal::new(150, 2),
            super_rate: Decimal::new(115, 3),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = Database::in_memory().await.unwrap();
        let created = db
            .create_user(&new_user("Ana", "ana@example.com", Role::Worker))
            .await
            .unwrap();

        assert_eq!(created.name, "Ana");
        assert_eq!(created.price_per_pkg, Decimal::new(150, 2));
        assert_eq!(created.super_rate, Decimal::new(115, 3));

        let by_email = db.find_user_by_email("ana@example.com").await.unwrap();
        assert_eq!(by_email, Some(created.clone()));
        assert_eq!(db.find_user(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::in_memory().await.unwrap();
        db.create_user(&new_user("Ana", "ana@example.com", Role::Worker))
            .await
            .unwrap();

        let err = db
            .create_user(&new_user("Other Ana", "ana@example.com", Role::Worker))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateEmail { .. }));
    }

    #[tokio::test]
    async fn test_list_users_ordered_by_name() {
        let db = Database::in_memory().await.unwrap();
        db.create_user(&new_user("Zoe", "zoe@example.com", Role::Worker))
            .await
            .unwrap();
        db.create_user(&new_user("Ben", "ben@example.com", Role::Admin))
            .await
            .unwrap();

        let names: Vec<String> = db
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Ben", "Zoe"]);
    }

    #[tokio::test]
    async fn test_admin_exists() {
        let db = Database::in_memory().await.unwrap();
        assert!(!db.admin_exists().await.unwrap());

        db.create_user(&new_user("Ana", "ana@example.com", Role::Worker))
            .await
            .unwrap();
        assert!(!db.admin_exists().await.unwrap());

        db.create_user(&new_user("Boss", "boss@example.com", Role::Admin))
            .await
            .unwrap();
        assert!(db.admin_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_update_user_rates() {
        let db = Database::in_memory().await.unwrap();
        let user = db
            .create_user(&new_user("Ana", "ana@example.com", Role::Worker))
            .await
            .unwrap();

        let updated = db
            .update_user_rates(
                user.id,
                &UserRates {
                    role: Role::Admin,
                    price_per_pkg: Decimal::new(175, 2),
                    super_rate: Decimal::new(12, 2),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.price_per_pkg, Decimal::new(175, 2));
        assert_eq!(updated.super_rate, Decimal::new(12, 2));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let db = Database::in_memory().await.unwrap();
        let err = db
            .update_user_rates(
                99,
                &UserRates {
                    role: Role::Worker,
                    price_per_pkg: Decimal::ONE,
                    super_rate: Decimal::ZERO,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { resource: "User", id: 99 }));
    }

    #[tokio::test]
    async fn test_last_admin_cannot_be_demoted() {
        let db = Database::in_memory().await.unwrap();
        let boss = db
            .create_user(&new_user("Boss", "boss@example.com", Role::Admin))
            .await
            .unwrap();
        let demote = UserRates {
            role: Role::Worker,
            price_per_pkg: Decimal::ONE,
            super_rate: Decimal::ZERO,
        };

        let err = db.update_user_rates(boss.id, &demote).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "role"));
        assert_eq!(db.get_user(boss.id).await.unwrap().role, Role::Admin);

        // rate changes that keep the role still apply
        let keep = UserRates {
            role: Role::Admin,
            ..demote
        };
        assert_eq!(db.update_user_rates(boss.id, &keep).await.unwrap().price_per_pkg, Decimal::ONE);

        db.create_user(&new_user("Deputy", "deputy@example.com", Role::Admin))
            .await
            .unwrap();
        let updated = db.update_user_rates(boss.id, &demote).await.unwrap();
        assert_eq!(updated.role, Role::Worker);
        assert!(db.admin_exists().await.unwrap());
    }
}
