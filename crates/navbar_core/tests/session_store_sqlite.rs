use navbar_core::db::migrations::latest_version;
use navbar_core::db::{open_db, DbError};
use navbar_core::{
    IdentityKind, Navbar, NavbarConfig, SessionResolver, SqliteSessionStore, StoreError,
    ViewportScroll,
};
use rusqlite::Connection;
use std::rc::Rc;

#[test]
fn open_db_creates_session_slots_table() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("session.db")).unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'session_slots'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match SqliteSessionStore::open(&path) {
        Err(StoreError::Db(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        })) => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("future schema must be rejected"),
    }
}

#[test]
fn slots_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");

    let store = SqliteSessionStore::open(&path).unwrap();
    store.put("admin_user", r#"{"email":"ops@example.com"}"#).unwrap();
    drop(store);

    let reopened = Rc::new(SqliteSessionStore::open(&path).unwrap());
    let resolver = SessionResolver::new(reopened, "team", "admin_user");
    assert_eq!(resolver.resolve().unwrap().kind(), IdentityKind::Admin);
}

#[test]
fn navbar_follows_sqlite_store_writes() {
    let store = Rc::new(SqliteSessionStore::open_in_memory().unwrap());
    let viewport = Rc::new(ViewportScroll::new());
    let mut navbar = Navbar::mount(
        NavbarConfig::default(),
        store.clone(),
        viewport.clone(),
        "/",
    );
    assert_eq!(navbar.view().identity, IdentityKind::Guest);

    store.put("team", r#"{"id":"t1","name":"Rustaceans"}"#).unwrap();
    assert!(navbar.session_is_stale());
    assert_eq!(navbar.view().identity, IdentityKind::Team);

    navbar.unmount();
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn refresh_picks_up_out_of_process_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");
    let store = Rc::new(SqliteSessionStore::open(&path).unwrap());
    let viewport = Rc::new(ViewportScroll::new());
    let mut navbar = Navbar::mount(NavbarConfig::default(), store, viewport, "/");

    let writer = SqliteSessionStore::open(&path).unwrap();
    writer.put("team", r#"{"id":"t2"}"#).unwrap();

    assert!(!navbar.session_is_stale());
    assert_eq!(navbar.identity().kind(), IdentityKind::Guest);
    assert_eq!(navbar.refresh_session().kind(), IdentityKind::Team);
}
