//! Repository integration tests against a real database.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use servicecore_core::assets::{HISTORY_ASSIGNMENT, HISTORY_REGISTRATION, STATUS_AVAILABLE, STATUS_IN_USE};
use servicecore_core::contracts::{
    DECISION_APPROVED, STATUS_ACTIVE, STATUS_DRAFT, STATUS_PENDING_APPROVAL,
};
use servicecore_core::projects::{TASK_DONE, TASK_TODO};
use servicecore_db::models::asset::{AssetFilter, AssignAsset, CreateAsset};
use servicecore_db::models::contract::{CreateContract, CreatePayment};
use servicecore_db::models::project::{CreateProject, CreateTask, UpdateProject};
use servicecore_db::models::ticket::{NewTicket, TicketChanges, TicketFilter, TicketOrder};
use servicecore_db::models::user::CreateUser;
use servicecore_db::repositories::{
    AssetRepo, ContractRepo, LookupRepo, ProjectRepo, SettingRepo, TaskRepo, TicketRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hash".to_string(),
            role: role.to_string(),
            department_id: None,
            phone: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_ticket(pool: &PgPool, subject: &str, requester: i64, assignee: Option<i64>) -> i64 {
    let open = LookupRepo::find_status_by_name(pool, "Open")
        .await
        .unwrap()
        .unwrap();
    let now = Utc::now();
    TicketRepo::create(
        pool,
        &NewTicket {
            subject: subject.to_string(),
            description: None,
            status_id: open.id,
            priority_id: None,
            category_id: None,
            requester_id: requester,
            assigned_to_id: assignee,
            created_at: now,
            due_date: now + Duration::hours(24),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_asset(tag: &str) -> CreateAsset {
    CreateAsset {
        name: format!("Laptop {tag}"),
        asset_tag: tag.to_string(),
        serial_number: None,
        category_id: None,
        department_id: None,
        status: None,
        purchase_date: None,
        purchase_cost: Some(1200.0),
        warranty_expiry: None,
        location: None,
        notes: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_ticket_create_resolves_names(pool: PgPool) {
    let requester = new_user(&pool, "Rita", "User").await;
    let id = new_ticket(&pool, "Printer offline", requester, None).await;

    let ticket = TicketRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(ticket.status_name, "Open");
    assert_eq!(ticket.requester_name, "Rita");
    assert!(ticket.assignee_name.is_none());
    assert!(ticket.due_date.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ticket_filter_by_involvement_and_search(pool: PgPool) {
    let alice = new_user(&pool, "Alice", "User").await;
    let bob = new_user(&pool, "Bob", "User").await;
    let agent = new_user(&pool, "Agnes", "Agent").await;

    new_ticket(&pool, "VPN broken", alice, Some(agent)).await;
    new_ticket(&pool, "Need monitor", bob, None).await;

    let mine = TicketFilter {
        involving_user: Some(alice),
        ..Default::default()
    };
    assert_eq!(TicketRepo::count(&pool, &mine).await.unwrap(), 1);

    let assigned = TicketFilter {
        involving_user: Some(agent),
        ..Default::default()
    };
    let rows = TicketRepo::list(&pool, &assigned, 20, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subject, "VPN broken");

    let search = TicketFilter {
        search: Some("monitor".into()),
        ..Default::default()
    };
    assert_eq!(TicketRepo::count(&pool, &search).await.unwrap(), 1);
    assert_eq!(TicketRepo::count(&pool, &TicketFilter::default()).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ticket_edit_can_clear_assignee_and_reorders_by_update(pool: PgPool) {
    let requester = new_user(&pool, "Dora", "User").await;
    let agent = new_user(&pool, "Agnes", "Agent").await;
    let older = new_ticket(&pool, "Older", requester, Some(agent)).await;
    let newer = new_ticket(&pool, "Newer", requester, None).await;
    sqlx::query("UPDATE tickets SET created_at = created_at - INTERVAL '1 day'")
        .execute(&pool)
        .await
        .unwrap();

    let ticket = TicketRepo::find_by_id(&pool, older).await.unwrap().unwrap();
    let keep = TicketChanges {
        subject: Some("Older, edited".into()),
        description: None,
        status_id: None,
        priority_id: None,
        category_id: None,
        assigned_to_id: None,
        clear_assignee: false,
        due_date: ticket.due_date,
        resolution_date: None,
    };
    let edited = TicketRepo::update(&pool, older, &keep).await.unwrap().unwrap();
    assert_eq!(edited.assigned_to_id, Some(agent));

    let clear = TicketChanges {
        clear_assignee: true,
        ..keep
    };
    let edited = TicketRepo::update(&pool, older, &clear).await.unwrap().unwrap();
    assert_eq!(edited.assigned_to_id, None);

    let by_created = TicketRepo::list(&pool, &TicketFilter::default(), 20, 0).await.unwrap();
    assert_eq!(by_created[0].id, newer);
    let by_updated = TicketFilter {
        order: TicketOrder::Updated,
        ..Default::default()
    };
    let rows = TicketRepo::list(&pool, &by_updated, 20, 0).await.unwrap();
    assert_eq!(rows[0].id, older);
    assert_eq!(rows[1].id, newer);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ticket_comments_and_cascade(pool: PgPool) {
    let requester = new_user(&pool, "Carl", "User").await;
    let id = new_ticket(&pool, "Mouse", requester, None).await;

    let comment = TicketRepo::add_comment(&pool, id, requester, "still broken")
        .await
        .unwrap();
    assert_eq!(comment.author_name.as_deref(), Some("Carl"));
    assert_eq!(TicketRepo::list_comments(&pool, id).await.unwrap().len(), 1);

    assert!(TicketRepo::delete(&pool, id).await.unwrap());
    assert!(TicketRepo::find_by_id(&pool, id).await.unwrap().is_none());
    let orphaned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);
}

// ---------------------------------------------------------------------------
// Projects and tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_project_members_replaced_on_update(pool: PgPool) {
    let owner = new_user(&pool, "Olga", "Member").await;
    let a = new_user(&pool, "Ann", "Member").await;
    let b = new_user(&pool, "Ben", "Member").await;

    let project = ProjectRepo::create(
        &pool,
        owner,
        &CreateProject {
            name: "Migration".into(),
            description: None,
            status: None,
            priority: None,
            start_date: None,
            end_date: None,
            team_lead_id: Some(owner),
            team_member_ids: vec![a],
        },
    )
    .await
    .unwrap();
    assert_eq!(project.status, "Planning");
    assert_eq!(project.team_lead_name.as_deref(), Some("Olga"));

    ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: None,
            description: None,
            status: Some("Active".into()),
            priority: None,
            start_date: None,
            end_date: None,
            team_lead_id: None,
            team_member_ids: Some(vec![b]),
        },
    )
    .await
    .unwrap()
    .unwrap();

    let members = ProjectRepo::members(&pool, project.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, b);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_project_stats_count_done_tasks(pool: PgPool) {
    let owner = new_user(&pool, "Pia", "Member").await;
    let project = ProjectRepo::create(
        &pool,
        owner,
        &CreateProject {
            name: "Rollout".into(),
            description: None,
            status: None,
            priority: None,
            start_date: None,
            end_date: None,
            team_lead_id: None,
            team_member_ids: vec![],
        },
    )
    .await
    .unwrap();

    let task = |title: &str| CreateTask {
        project_id: project.id,
        milestone_id: None,
        title: title.to_string(),
        description: None,
        status: None,
        priority: None,
        due_date: None,
        assignee_ids: vec![owner],
    };
    let first = TaskRepo::create(&pool, owner, &task("one")).await.unwrap();
    TaskRepo::create(&pool, owner, &task("two")).await.unwrap();
    assert_eq!(first.status, TASK_TODO);

    assert!(TaskRepo::set_status(&pool, first.id, TASK_DONE).await.unwrap());

    let stats = ProjectRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].task_count, 2);
    assert_eq!(stats[0].completed_count, 1);

    let assignees = TaskRepo::assignees(&pool, &[first.id]).await.unwrap();
    assert_eq!(assignees.len(), 1);
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_asset_registration_and_assignment_history(pool: PgPool) {
    let admin = new_user(&pool, "Ada", "Admin").await;
    let holder = new_user(&pool, "Hal", "User").await;

    let asset = AssetRepo::create(&pool, admin, &new_asset("LT-001")).await.unwrap();
    assert_eq!(asset.status, STATUS_AVAILABLE);

    AssetRepo::assign(
        &pool,
        asset.id,
        &asset.status,
        admin,
        &AssignAsset {
            user_id: holder,
            notes: None,
        },
    )
    .await
    .unwrap();

    let reloaded = AssetRepo::find_by_id(&pool, asset.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, STATUS_IN_USE);
    assert_eq!(reloaded.assigned_user_name.as_deref(), Some("Hal"));

    let history = AssetRepo::history(&pool, asset.id).await.unwrap();
    let actions: Vec<&str> = history.iter().map(|h| h.action.as_str()).collect();
    assert!(actions.contains(&HISTORY_REGISTRATION));
    assert!(actions.contains(&HISTORY_ASSIGNMENT));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_asset_tag_is_unique(pool: PgPool) {
    let admin = new_user(&pool, "Ada", "Admin").await;
    AssetRepo::create(&pool, admin, &new_asset("DUP-1")).await.unwrap();
    let err = AssetRepo::create(&pool, admin, &new_asset("DUP-1"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.code().as_deref(), Some("23505"));
            assert_eq!(db.constraint(), Some("uq_assets_asset_tag"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }

    let filter = AssetFilter {
        search: Some("dup".into()),
        category_id: None,
    };
    assert_eq!(AssetRepo::count(&pool, &filter).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_contract_decision_and_payments(pool: PgPool) {
    let admin = new_user(&pool, "Ada", "Admin").await;
    let contract = ContractRepo::create(
        &pool,
        admin,
        &CreateContract {
            contract_number: Some("C-100".into()),
            title: "Support renewal".into(),
            description: None,
            vendor_id: None,
            contract_type_id: None,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 12, 31),
            value: 5000.0,
            currency: None,
            owner_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(contract.status, STATUS_DRAFT);
    assert_eq!(contract.currency, "USD");
    assert_eq!(contract.owner_id, Some(admin));

    let approval = ContractRepo::decide(&pool, contract.id, STATUS_ACTIVE, admin, DECISION_APPROVED, None)
        .await
        .unwrap();
    assert_eq!(approval.decision, DECISION_APPROVED);

    let (count, total) = ContractRepo::active_totals(&pool).await.unwrap();
    assert_eq!(count, 1);
    assert!((total - 5000.0).abs() < f64::EPSILON);

    ContractRepo::add_payment(
        &pool,
        contract.id,
        &CreatePayment {
            due_date: date(2026, 2, 1),
            amount: 500.0,
            status: None,
            payment_date: None,
            reference: None,
        },
    )
    .await
    .unwrap();
    let payments = ContractRepo::payments(&pool, contract.id).await.unwrap();
    assert_eq!(payments[0].status, "Pending");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expiring_contracts_include_overdue_active(pool: PgPool) {
    let admin = new_user(&pool, "Ada", "Admin").await;
    let term = |title: &str, start: NaiveDate, end: NaiveDate| CreateContract {
        contract_number: None,
        title: title.into(),
        description: None,
        vendor_id: None,
        contract_type_id: None,
        start_date: start,
        end_date: end,
        value: 100.0,
        currency: None,
        owner_id: None,
    };
    let overdue = ContractRepo::create(&pool, admin, &term("Overdue", date(2020, 1, 1), date(2020, 6, 30)))
        .await
        .unwrap();
    let later = ContractRepo::create(&pool, admin, &term("Later", date(2020, 1, 1), date(2099, 1, 1)))
        .await
        .unwrap();
    for id in [overdue.id, later.id] {
        ContractRepo::set_status(&pool, id, STATUS_ACTIVE).await.unwrap();
    }
    let pending = ContractRepo::create(&pool, admin, &term("Waiting", date(2020, 1, 1), date(2020, 2, 1)))
        .await
        .unwrap();
    ContractRepo::set_status(&pool, pending.id, STATUS_PENDING_APPROVAL).await.unwrap();

    let until = Utc::now().date_naive() + Duration::days(30);
    let expiring = ContractRepo::expiring_by(&pool, until).await.unwrap();
    let ids: Vec<i64> = expiring.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![overdue.id]);

    assert_eq!(ContractRepo::count_pending_approval(&pool).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_setting_upsert_overwrites(pool: PgPool) {
    SettingRepo::upsert(&pool, "site_name", "Help Desk").await.unwrap();
    let updated = SettingRepo::upsert(&pool, "site_name", "Service Desk").await.unwrap();
    assert_eq!(updated.value, "Service Desk");
    assert_eq!(SettingRepo::list(&pool).await.unwrap().len(), 1);
}
