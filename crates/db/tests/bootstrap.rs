use sqlx::PgPool;
use servicecore_core::permissions::Feature;
use servicecore_core::roles::{ROLE_ADMIN, ROLE_USER};
use servicecore_db::repositories::{PermissionRepo, UserRepo};

/// Full bootstrap test: connect, migrate, verify lookup seed data.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    servicecore_db::health_check(&pool).await.unwrap();

    let tables = [
        "roles",
        "ticket_statuses",
        "ticket_priorities",
        "ticket_categories",
        "asset_categories",
        "solution_topics",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seed_creates_admin_and_grants(pool: PgPool) {
    let report = servicecore_db::seed::run(&pool, "Admin@Example.com", "hash")
        .await
        .unwrap();

    assert!(report.admin_created);
    // Roles come from the migration already.
    assert_eq!(report.roles_created, 0);
    assert_eq!(report.permissions_created, Feature::ALL.len() * 5);

    let admin = UserRepo::find_by_email(&pool, "admin@example.com")
        .await
        .unwrap()
        .expect("admin should exist");
    assert_eq!(admin.role, ROLE_ADMIN);

    let user_can_create = PermissionRepo::lookup(&pool, ROLE_USER, Feature::TicketsCreate.key())
        .await
        .unwrap();
    assert_eq!(user_can_create, Some(true));

    let user_can_admin = PermissionRepo::lookup(&pool, ROLE_USER, Feature::AdminSettings.key())
        .await
        .unwrap();
    assert_eq!(user_can_admin, Some(false));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seed_is_idempotent_and_keeps_edits(pool: PgPool) {
    servicecore_db::seed::run(&pool, "admin@example.com", "hash")
        .await
        .unwrap();

    PermissionRepo::upsert_many(&pool, ROLE_USER, &[(Feature::ReportsView.key(), true)])
        .await
        .unwrap();

    let second = servicecore_db::seed::run(&pool, "admin@example.com", "hash")
        .await
        .unwrap();
    assert!(!second.admin_created);
    assert_eq!(second.permissions_created, 0);

    let kept = PermissionRepo::lookup(&pool, ROLE_USER, Feature::ReportsView.key())
        .await
        .unwrap();
    assert_eq!(kept, Some(true));
}
