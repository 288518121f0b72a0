//! Repository for the `roles` and `departments` tables.

use sqlx::PgPool;
use servicecore_core::types::DbId;

use crate::models::role::{CreateRole, Department, Role, UpdateRole, UpsertDepartment};

const ROLE_COLUMNS: &str = "id, name, description, created_at";
const DEPARTMENT_COLUMNS: &str = "id, name, description, created_at";

/// Provides CRUD operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles ORDER BY id");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateRole) -> Result<Role, sqlx::Error> {
        let query = format!(
            "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING {ROLE_COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Insert the role unless one with the same name exists. Returns `true`
    /// when a row was inserted.
    pub async fn ensure(
        pool: &PgPool,
        name: &str,
        description: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO roles (name, description) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_roles_name DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRole,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!(
            "UPDATE roles SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {ROLE_COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }
}

/// Provides CRUD operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY name");
        sqlx::query_as::<_, Department>(&query).fetch_all(pool).await
    }

    /// Insert when `id` is `None`, otherwise update. Returns `None` when the
    /// id does not exist.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertDepartment,
    ) -> Result<Option<Department>, sqlx::Error> {
        match input.id {
            None => {
                let query = format!(
                    "INSERT INTO departments (name, description) VALUES ($1, $2)
                     RETURNING {DEPARTMENT_COLUMNS}"
                );
                sqlx::query_as::<_, Department>(&query)
                    .bind(input.name.trim())
                    .bind(&input.description)
                    .fetch_one(pool)
                    .await
                    .map(Some)
            }
            Some(id) => {
                let query = format!(
                    "UPDATE departments SET name = $2, description = $3 WHERE id = $1
                     RETURNING {DEPARTMENT_COLUMNS}"
                );
                sqlx::query_as::<_, Department>(&query)
                    .bind(id)
                    .bind(input.name.trim())
                    .bind(&input.description)
                    .fetch_optional(pool)
                    .await
            }
        }
    }
}
