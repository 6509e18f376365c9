//! First-start provisioning.

use crate::auth::hash_password;
use crate::config::BootstrapAdminConfig;
use crate::error::LedgerResult;
use crate::models::{NewUser, Role, User, normalize_email};

use super::Database;

/// Creates the configured administrator if the database has no admin yet.
///
/// Safe to call on every start: once any admin exists it does nothing and
/// returns `None`.
pub async fn ensure_default_admin(
    db: &Database,
    admin: &BootstrapAdminConfig,
    bcrypt_cost: u32,
) -> LedgerResult<Option<User>> {
    if db.admin_exists().await? {
        tracing::debug!("Admin account present, skipping bootstrap");
        return Ok(None);
    }

    let user = db
        .create_user(&NewUser {
            name: admin.name.trim().to_string(),
            email: normalize_email(&admin.email),
            password_hash: hash_password(&admin.password, bcrypt_cost)?,
            role: Role::Admin,
            price_per_pkg: admin.price_per_pkg,
            super_rate: admin.super_rate,
        })
        .await?;

    tracing::warn!(
        user_id = user.id,
        email = %user.email,
        "Created default admin account; change its password"
    );
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;

    #[tokio::test]
    async fn test_bootstrap_creates_admin_once() {
        let db = Database::in_memory().await.unwrap();
        let config = BootstrapAdminConfig {
            email: " Admin@Example.com ".to_string(),
            ..BootstrapAdminConfig::default()
        };

        let first = ensure_default_admin(&db, &config, 4).await.unwrap();
        let admin = first.expect("admin should be created on empty database");
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.email, "admin@example.com");
        assert!(verify_password("admin123", &admin.password_hash).unwrap());

        let second = ensure_default_admin(&db, &config, 4).await.unwrap();
        assert!(second.is_none());
        assert_eq!(db.list_users().await.unwrap().len(), 1);
    }
}
