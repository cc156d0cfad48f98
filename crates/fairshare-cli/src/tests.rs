//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use clap::Parser;

use fairshare_core::db::Database;
use fairshare_core::test_utils::{done_task, member, open_task, ts, TEST_SPACE};
use fairshare_core::{EngineConfig, InsightStatus, MemberPreferences, MemberRole, TaskCategory};

use crate::cli::Cli;
use crate::commands::{self, truncate, Output, RecommendOptions};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

/// alice carries the load, bob has done a little, carol nothing
fn seeded_db() -> Database {
    let db = setup_test_db();
    for id in ["alice", "bob", "carol"] {
        db.upsert_member(&member(id)).unwrap();
    }
    for task in [
        done_task("k1", TaskCategory::Kitchen, 4, "alice", ts(0)),
        done_task("k2", TaskCategory::Kitchen, 4, "alice", ts(2)),
        done_task("k3", TaskCategory::Kitchen, 4, "bob", ts(4)),
        done_task("b1", TaskCategory::Bathroom, 8, "alice", ts(3)),
        open_task("o1", TaskCategory::Laundry, 6),
        open_task("o2", TaskCategory::Trash, 2),
        open_task("o3", TaskCategory::Outdoor, 9).with_due_date(ts(10)),
    ] {
        db.upsert_task(&task).unwrap();
    }
    db
}

fn insight_status(db: &Database, id: i64) -> String {
    let conn = db.conn().unwrap();
    conn.query_row(
        "SELECT status FROM insights WHERE id = ?",
        rusqlite::params![id],
        |row| row.get(0),
    )
    .unwrap()
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fairshare.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Re-running against an existing database is fine
    commands::cmd_init(&path).unwrap();
}

#[test]
fn test_load_config() {
    assert!(commands::load_config(None).is_ok());

    let missing = std::path::Path::new("/nonexistent/engine.toml");
    assert!(commands::load_config(Some(missing)).is_err());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[recommend]\nbase_score = 40.0").unwrap();
    let config = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(config.recommend.base_score, 40.0);
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Dishes", 10), "Dishes");
    assert_eq!(truncate("Deep clean the oven", 10), "Deep cl...");
    assert_eq!(truncate("Küchenputz am Samstag", 8), "Küche...");
}

// ========== Import Tests ==========

#[test]
fn test_cmd_import() {
    let db = setup_test_db();
    db.upsert_member(&member("alice")).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "id,title,category,difficulty,status,assigned_to,created_at,due_date,completed_at\n\
         t1,Dishes,kitchen,3,done,alice,2026-01-01,,2026-01-02T19:30:00Z\n\
         t2,Mow lawn,garden,8,todo,,2026-01-03,2026-01-05,\n\
         t3,Walk dog,pets,4,done,dave,2026-01-03,,2026-01-03T08:00:00Z\n"
    )
    .unwrap();

    commands::cmd_import(&db, file.path(), TEST_SPACE).unwrap();

    let tasks = db.list_tasks(TEST_SPACE).unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(
        db.get_task("t2").unwrap().unwrap().category,
        TaskCategory::Outdoor
    );

    // Importing again replaces rows by id
    commands::cmd_import(&db, file.path(), TEST_SPACE).unwrap();
    assert_eq!(db.list_tasks(TEST_SPACE).unwrap().len(), 3);
}

#[test]
fn test_cmd_import_rejects_bad_rows() {
    let db = setup_test_db();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "id,title,category,difficulty,created_at\nt1,Paint,maintenance,0,2026-01-01\n"
    )
    .unwrap();

    let err = commands::cmd_import(&db, file.path(), TEST_SPACE).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
    assert!(db.list_tasks(TEST_SPACE).unwrap().is_empty());
}

#[test]
fn test_cmd_import_missing_file() {
    let db = setup_test_db();
    let result = commands::cmd_import(&db, std::path::Path::new("/nonexistent.csv"), TEST_SPACE);
    assert!(result.is_err());
}

// ========== Members Tests ==========

#[test]
fn test_cmd_members_add_and_list() {
    let db = setup_test_db();
    commands::cmd_members_add(&db, TEST_SPACE, "alice", None, MemberRole::Owner, ts(1)).unwrap();
    commands::cmd_members_add(&db, TEST_SPACE, "bob", Some("Bob"), MemberRole::Member, ts(2))
        .unwrap();

    // Renaming keeps the original join date
    commands::cmd_members_add(&db, TEST_SPACE, "alice", Some("Alice"), MemberRole::Owner, ts(5))
        .unwrap();

    let members = db.list_members(TEST_SPACE).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].name, "Alice");
    assert_eq!(members[0].joined_at, ts(1));
    assert_eq!(members[0].role, MemberRole::Owner);
    assert_eq!(members[1].name, "Bob");

    assert!(commands::cmd_members_list(&db, TEST_SPACE, Output::Text).is_ok());
    assert!(commands::cmd_members_list(&db, TEST_SPACE, Output::Json).is_ok());
    assert!(commands::cmd_members_list(&db, "empty", Output::Text).is_ok());
}

// ========== Workload Tests ==========

#[test]
fn test_cmd_stats() {
    let db = seeded_db();
    let config = EngineConfig::default();
    assert!(commands::cmd_stats(&db, &config, TEST_SPACE, Output::Text).is_ok());
    assert!(commands::cmd_stats(&db, &config, TEST_SPACE, Output::Json).is_ok());
    assert!(commands::cmd_stats(&db, &config, "empty", Output::Text).is_ok());
}

#[test]
fn test_cmd_fairness() {
    let db = seeded_db();
    let config = EngineConfig::default();
    assert!(commands::cmd_fairness(&db, &config, TEST_SPACE, "bob", Output::Text).is_ok());
    assert!(commands::cmd_fairness(&db, &config, TEST_SPACE, "carol", Output::Json).is_ok());

    let err = commands::cmd_fairness(&db, &config, TEST_SPACE, "mallory", Output::Text)
        .unwrap_err();
    assert!(err.to_string().contains("not a member"));
}

#[test]
fn test_cmd_assign_dry_run_leaves_tasks_open() {
    let db = seeded_db();
    commands::cmd_assign(&db, TEST_SPACE, false, Output::Text).unwrap();

    for id in ["o1", "o2", "o3"] {
        assert!(db.get_task(id).unwrap().unwrap().assigned_to.is_none());
    }
}

#[test]
fn test_cmd_assign_apply() {
    let db = seeded_db();
    commands::cmd_assign(&db, TEST_SPACE, true, Output::Json).unwrap();

    // carol (0 points) gets the hardest, bob (4) next, alice (16) the easiest
    let assignee = |id: &str| db.get_task(id).unwrap().unwrap().assigned_to;
    assert_eq!(assignee("o3").as_deref(), Some("carol"));
    assert_eq!(assignee("o1").as_deref(), Some("bob"));
    assert_eq!(assignee("o2").as_deref(), Some("alice"));

    // Nothing left to assign
    assert!(commands::cmd_assign(&db, TEST_SPACE, true, Output::Text).is_ok());
}

#[test]
fn test_cmd_assign_apply_is_atomic() {
    let db = seeded_db();
    // A stale row that auto-assign never sees but apply trips over
    let plan = vec![
        fairshare_core::Assignment {
            task_id: "o1".to_string(),
            user_id: "bob".to_string(),
            difficulty: 6,
        },
        fairshare_core::Assignment {
            task_id: "k1".to_string(),
            user_id: "carol".to_string(),
            difficulty: 4,
        },
    ];
    assert!(db.apply_assignments(&plan).is_err());
    assert!(db.get_task("o1").unwrap().unwrap().assigned_to.is_none());

    // The command itself still applies a fresh plan in one go
    commands::cmd_assign(&db, TEST_SPACE, true, Output::Text).unwrap();
    for id in ["o1", "o2", "o3"] {
        assert!(db.get_task(id).unwrap().unwrap().assigned_to.is_some());
    }
}

#[test]
fn test_cmd_assign_without_members() {
    let db = setup_test_db();
    db.upsert_task(&open_task("o1", TaskCategory::Kitchen, 3))
        .unwrap();

    let err = commands::cmd_assign(&db, TEST_SPACE, true, Output::Text).unwrap_err();
    assert!(format!("{:#}", err).contains("no members"));
    assert!(db.get_task("o1").unwrap().unwrap().assigned_to.is_none());
}

// ========== Recommend Tests ==========

#[test]
fn test_cmd_recommend() {
    let db = seeded_db();
    let config = EngineConfig::default();
    let opts = RecommendOptions {
        preferences: MemberPreferences {
            preferred: vec![TaskCategory::Laundry],
            avoided: vec![TaskCategory::Trash],
        },
        limit: 2,
    };

    assert!(
        commands::cmd_recommend(&db, &config, TEST_SPACE, "carol", &opts, ts(9), Output::Text)
            .is_ok()
    );
    assert!(
        commands::cmd_recommend(&db, &config, TEST_SPACE, "alice", &opts, ts(9), Output::Json)
            .is_ok()
    );
    assert!(
        commands::cmd_recommend(&db, &config, TEST_SPACE, "nobody", &opts, ts(9), Output::Text)
            .is_err()
    );
}

// ========== Insights Tests ==========

#[test]
fn test_cmd_habits() {
    let db = seeded_db();
    assert!(commands::cmd_habits(&db, TEST_SPACE, "alice", Output::Text).is_ok());
    assert!(commands::cmd_habits(&db, TEST_SPACE, "carol", Output::Text).is_ok());
    assert!(commands::cmd_habits(&db, TEST_SPACE, "carol", Output::Json).is_ok());
    assert!(commands::cmd_habits(&db, TEST_SPACE, "nobody", Output::Text).is_err());
}

#[test]
fn test_cmd_insights_are_reused() {
    let db = seeded_db();
    let config = EngineConfig::default();

    commands::cmd_insights(&db, &config, TEST_SPACE, "alice", ts(10), Output::Text).unwrap();
    let first = db.list_insights(TEST_SPACE, "alice", None).unwrap();
    assert!(!first.is_empty());

    commands::cmd_insights(&db, &config, TEST_SPACE, "alice", ts(10), Output::Json).unwrap();
    let second = db.list_insights(TEST_SPACE, "alice", None).unwrap();
    assert_eq!(first.len(), second.len());

    assert!(
        commands::cmd_insights(&db, &config, TEST_SPACE, "nobody", ts(10), Output::Text).is_err()
    );
}

#[test]
fn test_snooze_days_bounded() {
    assert!(Cli::try_parse_from(["fairshare", "insight", "snooze", "7", "--days", "3"]).is_ok());
    assert!(Cli::try_parse_from(["fairshare", "insight", "snooze", "7", "--days", "0"]).is_err());
    assert!(
        Cli::try_parse_from(["fairshare", "insight", "snooze", "7", "--days", "4294967295"])
            .is_err()
    );
}

#[test]
fn test_cmd_insight_snooze_overflow() {
    let db = seeded_db();
    let config = EngineConfig::default();
    commands::cmd_insights(&db, &config, TEST_SPACE, "alice", ts(10), Output::Text).unwrap();
    let id = db.list_insights(TEST_SPACE, "alice", None).unwrap()[0].id;

    assert!(commands::cmd_insight_snooze(&db, id, u32::MAX, ts(10)).is_err());
    assert_eq!(insight_status(&db, id), "pending");
}

#[test]
fn test_cmd_insight_status_changes() {
    let db = seeded_db();
    let config = EngineConfig::default();
    commands::cmd_insights(&db, &config, TEST_SPACE, "alice", ts(10), Output::Text).unwrap();

    let ids: Vec<i64> = db
        .list_insights(TEST_SPACE, "alice", Some(InsightStatus::Pending))
        .unwrap()
        .iter()
        .map(|i| i.id)
        .collect();
    assert!(ids.len() >= 2, "expected several insights, got {:?}", ids);

    commands::cmd_insight_accept(&db, ids[0]).unwrap();
    commands::cmd_insight_snooze(&db, ids[1], 3, ts(10)).unwrap();
    assert_eq!(insight_status(&db, ids[0]), "accepted");
    assert_eq!(insight_status(&db, ids[1]), "snoozed");

    let snoozed = db.get_insight(ids[1]).unwrap().unwrap();
    assert_eq!(snoozed.snoozed_until, Some(ts(13)));

    commands::cmd_insight_reject(&db, ids[1]).unwrap();
    assert_eq!(insight_status(&db, ids[1]), "rejected");

    assert!(commands::cmd_insight_accept(&db, 9999).is_err());
}
