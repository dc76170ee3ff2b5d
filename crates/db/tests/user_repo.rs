//! Integration tests for the user record store and its transitions.
//!
//! Runs the repository layer against a real SQLite database: a per-test
//! database from `#[sqlx::test]`, or a temporary file where the test needs
//! its own multi-threaded runtime.

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sigma_core::attendance::{CheckInOutcome, DEFAULT_DAILY_REWARD};
use sigma_db::models::user::UpdateUser;
use sigma_db::repositories::UserRepo;
use sigma_db::StorageError;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply the schema to a fresh test database.
async fn migrate(pool: &SqlitePool) {
    sigma_db::run_migrations(pool).await.unwrap();
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn row_count(pool: &SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Record lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn first_get_or_create_yields_zeroed_record(pool: SqlitePool) {
    migrate(&pool).await;

    let record = UserRepo::get_or_create(&pool, 42).await.unwrap();

    assert_eq!(record.user_id, 42);
    assert_eq!(record.balance, 0);
    assert_eq!(record.total_checkins, 0);
    assert!(record.last_checkin.is_none());
    assert!(record.joined_at.is_none());
}

#[sqlx::test(migrations = false)]
async fn get_or_create_is_idempotent(pool: SqlitePool) {
    migrate(&pool).await;

    let first = UserRepo::get_or_create(&pool, 42).await.unwrap();
    let second = UserRepo::get_or_create(&pool, 42).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(row_count(&pool).await, 1);
}

#[sqlx::test(migrations = false)]
async fn get_or_create_does_not_reset_existing_record(pool: SqlitePool) {
    migrate(&pool).await;
    UserRepo::check_in(&pool, 42, date("2024-01-01"), DEFAULT_DAILY_REWARD)
        .await
        .unwrap();

    let record = UserRepo::get_user(&pool, 42).await.unwrap();

    assert_eq!(record.balance, 100_000);
    assert_eq!(record.total_checkins, 1);
}

#[sqlx::test(migrations = false)]
async fn find_by_id_does_not_create(pool: SqlitePool) {
    migrate(&pool).await;

    assert!(UserRepo::find_by_id(&pool, 5).await.unwrap().is_none());
    assert_eq!(row_count(&pool).await, 0);
}

#[sqlx::test(migrations = false)]
async fn update_applies_only_provided_fields(pool: SqlitePool) {
    migrate(&pool).await;
    UserRepo::get_or_create(&pool, 7).await.unwrap();

    let updated = UserRepo::update(
        &pool,
        7,
        &UpdateUser {
            balance: Some(500),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.balance, 500);
    assert_eq!(updated.total_checkins, 0);
    assert!(updated.last_checkin.is_none());

    // Immediately visible to a fresh read.
    let reread = UserRepo::find_by_id(&pool, 7).await.unwrap().unwrap();
    assert_eq!(reread, updated);
}

#[sqlx::test(migrations = false)]
async fn update_never_overwrites_join_date(pool: SqlitePool) {
    migrate(&pool).await;
    UserRepo::record_join(&pool, 7, date("2024-03-01")).await.unwrap();

    let updated = UserRepo::update(
        &pool,
        7,
        &UpdateUser {
            joined_at: Some(date("2025-01-01")),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.joined_at, Some(date("2024-03-01")));
}

#[sqlx::test(migrations = false)]
async fn update_of_missing_user_fails(pool: SqlitePool) {
    migrate(&pool).await;

    let result = UserRepo::update(&pool, 404, &UpdateUser::default()).await;

    assert_matches!(result, Err(StorageError::NotFound { user_id: 404 }));
}

// ---------------------------------------------------------------------------
// Check-in
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn check_in_twice_same_day_grants_once(pool: SqlitePool) {
    migrate(&pool).await;
    let today = date("2024-01-01");

    let first = UserRepo::check_in(&pool, 1, today, DEFAULT_DAILY_REWARD)
        .await
        .unwrap();
    let second = UserRepo::check_in(&pool, 1, today, DEFAULT_DAILY_REWARD)
        .await
        .unwrap();

    assert_eq!(
        first,
        CheckInOutcome::Granted {
            balance: 100_000,
            total_checkins: 1,
            reward: 100_000,
        }
    );
    assert_eq!(
        second,
        CheckInOutcome::AlreadyCheckedIn {
            balance: 100_000,
            total_checkins: 1,
        }
    );

    let record = UserRepo::find_by_id(&pool, 1).await.unwrap().unwrap();
    assert_eq!(record.last_checkin, Some(today));
}

#[sqlx::test(migrations = false)]
async fn check_in_scenario_across_days(pool: SqlitePool) {
    migrate(&pool).await;

    let profile = UserRepo::get_user(&pool, 42).await.unwrap();
    assert_eq!((profile.balance, profile.total_checkins), (0, 0));

    let day_one = UserRepo::check_in(&pool, 42, date("2024-01-01"), 100_000)
        .await
        .unwrap();
    assert!(day_one.is_granted());
    assert_eq!((day_one.balance(), day_one.total_checkins()), (100_000, 1));

    let repeat = UserRepo::check_in(&pool, 42, date("2024-01-01"), 100_000)
        .await
        .unwrap();
    assert!(!repeat.is_granted());
    assert_eq!(repeat.balance(), 100_000);

    let day_two = UserRepo::check_in(&pool, 42, date("2024-01-02"), 100_000)
        .await
        .unwrap();
    assert!(day_two.is_granted());
    assert_eq!((day_two.balance(), day_two.total_checkins()), (200_000, 2));
}

#[sqlx::test(migrations = false)]
async fn overflowing_check_in_leaves_record_untouched(pool: SqlitePool) {
    migrate(&pool).await;
    UserRepo::get_or_create(&pool, 3).await.unwrap();
    UserRepo::update(
        &pool,
        3,
        &UpdateUser {
            balance: Some(i64::MAX),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let result = UserRepo::check_in(&pool, 3, date("2024-01-01"), 1).await;
    assert_matches!(result, Err(StorageError::Core(_)));

    let record = UserRepo::find_by_id(&pool, 3).await.unwrap().unwrap();
    assert_eq!(record.balance, i64::MAX);
    assert_eq!(record.total_checkins, 0);
    assert!(record.last_checkin.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_check_ins_grant_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("sigma.db").display());
    let pool = sigma_db::create_pool(&url, Duration::from_secs(5))
        .await
        .unwrap();
    sigma_db::run_migrations(&pool).await.unwrap();

    let today = date("2024-01-01");
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { UserRepo::check_in(&pool, 11, today, 100_000).await })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_granted() {
            granted += 1;
        }
    }

    assert_eq!(granted, 1);
    let record = UserRepo::find_by_id(&pool, 11).await.unwrap().unwrap();
    assert_eq!(record.balance, 100_000);
    assert_eq!(record.total_checkins, 1);
}

// ---------------------------------------------------------------------------
// Join recording
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn join_date_is_recorded_once(pool: SqlitePool) {
    migrate(&pool).await;

    let first = UserRepo::record_join(&pool, 99, date("2024-03-01"))
        .await
        .unwrap();
    assert_eq!(first.joined_at, Some(date("2024-03-01")));

    let second = UserRepo::record_join(&pool, 99, date("2024-03-05"))
        .await
        .unwrap();
    assert_eq!(second.joined_at, Some(date("2024-03-01")));
    assert_eq!(row_count(&pool).await, 1);
}

#[sqlx::test(migrations = false)]
async fn join_after_command_use_stamps_date_and_keeps_balance(pool: SqlitePool) {
    migrate(&pool).await;
    UserRepo::check_in(&pool, 5, date("2024-02-10"), 100_000)
        .await
        .unwrap();

    let record = UserRepo::record_join(&pool, 5, date("2024-02-11"))
        .await
        .unwrap();

    assert_eq!(record.joined_at, Some(date("2024-02-11")));
    assert_eq!(record.balance, 100_000);
    assert_eq!(record.total_checkins, 1);
}
