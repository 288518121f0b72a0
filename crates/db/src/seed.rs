//! Idempotent startup seeding.
//!
//! Only inserts rows that are missing. Permission flags an admin has edited
//! are never overwritten.

use sqlx::PgPool;
use servicecore_core::permissions::{default_grants, Feature};
use servicecore_core::roles::{DEFAULT_ROLES, ROLE_ADMIN};

use crate::models::user::CreateUser;
use crate::repositories::{PermissionRepo, RoleRepo, UserRepo};

/// Display name given to the bootstrap admin account.
const ADMIN_NAME: &str = "Administrator";

/// What a seeding pass inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub admin_created: bool,
    pub permissions_created: usize,
}

/// Ensure default roles, the admin account and default permission rows.
pub async fn run(
    pool: &PgPool,
    admin_email: &str,
    admin_password_hash: &str,
) -> Result<SeedReport, sqlx::Error> {
    let mut report = SeedReport::default();

    for (name, description) in DEFAULT_ROLES {
        if RoleRepo::ensure(pool, name, description).await? {
            report.roles_created += 1;
        }
    }

    if UserRepo::find_by_email(pool, admin_email).await?.is_none() {
        UserRepo::create(
            pool,
            &CreateUser {
                name: ADMIN_NAME.to_string(),
                email: admin_email.to_string(),
                password_hash: admin_password_hash.to_string(),
                role: ROLE_ADMIN.to_string(),
                department_id: None,
                phone: None,
            },
        )
        .await?;
        report.admin_created = true;
    }

    for (role, _) in DEFAULT_ROLES {
        let grants = default_grants(role);
        for feature in Feature::ALL {
            let allowed = grants.contains(feature);
            if PermissionRepo::insert_if_missing(pool, role, feature.key(), allowed).await? {
                report.permissions_created += 1;
            }
        }
    }

    tracing::info!(
        roles_created = report.roles_created,
        admin_created = report.admin_created,
        permissions_created = report.permissions_created,
        "Seeding complete",
    );
    Ok(report)
}
