//! Service-level tests for event CRUD, overlap search, and the two
//! transactional units against an in-memory database.

use agenda_mcp_server::{
    ContactService, CreateOutcome, Database, DeleteOutcome, EventCreateOutcome,
    EventDeleteOutcome, EventService, UpdateOutcome, ValidationError,
};

const BASE: i64 = 1_700_000_000;
const THREE_HOURS: i64 = 10_800;

fn setup() -> (EventService, Database) {
    let db = Database::open_in_memory().unwrap();
    (EventService::new(db.clone()), db)
}

fn create_event(service: &EventService, heading: &str, start: i64, end: i64) -> i64 {
    match service.create(heading, start, end, None, &[]) {
        EventCreateOutcome::Created(id) => id,
        other => panic!("create failed: {other:?}"),
    }
}

fn event_count(db: &Database) -> i64 {
    db.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .unwrap()
    })
}

fn link_rows(db: &Database, event_id: i64) -> Vec<i64> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare("SELECT contact_id FROM event_contacts WHERE event_id = ?1 ORDER BY rowid")
            .unwrap();
        stmt.query_map([event_id], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    })
}

#[test]
fn test_create_validations() {
    let (service, db) = setup();

    let outcome = service.create("   ", BASE, BASE + 100, None, &[]);
    assert_eq!(
        outcome,
        EventCreateOutcome::Invalid(ValidationError::EmptyEventHeading)
    );

    // End strictly before start is rejected and inserts nothing.
    let outcome = service.create("Backwards", BASE + 100, BASE, None, &[]);
    assert_eq!(
        outcome,
        EventCreateOutcome::Invalid(ValidationError::EndBeforeStart)
    );
    assert_eq!(event_count(&db), 0);

    // A zero-duration event is valid.
    let outcome = service.create("Instant", BASE, BASE, None, &[]);
    assert!(matches!(outcome, EventCreateOutcome::Created(_)));
}

#[test]
fn test_create_links_contacts_in_supplied_order() {
    let (service, db) = setup();

    let outcome = service.create("Team lunch", BASE, BASE + 3600, None, &[7, 3, 12]);
    let EventCreateOutcome::Created(event_id) = outcome else {
        panic!("create failed: {outcome:?}");
    };

    // One link row per id, in the supplied order. The ids were never
    // checked against the contacts table.
    assert_eq!(link_rows(&db, event_id), [7, 3, 12]);
}

#[test]
fn test_create_rolls_back_when_link_insert_fails() {
    let (service, db) = setup();
    db.with_conn(|conn| conn.execute_batch("DROP TABLE event_contacts").unwrap());

    let outcome = service.create("Doomed", BASE, BASE + 3600, None, &[1]);
    assert_eq!(outcome, EventCreateOutcome::DatabaseFailed);
    // The event insert succeeded inside the unit but must not persist.
    assert_eq!(event_count(&db), 0);
}

#[test]
fn test_list_orders_by_start_time() {
    let (service, _db) = setup();
    assert!(service.list().unwrap().is_empty());

    create_event(&service, "Later", BASE + 7200, BASE + 9000);
    create_event(&service, "Earlier", BASE, BASE + 3600);

    let headings: Vec<String> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|e| e.heading)
        .collect();
    assert_eq!(headings, ["Earlier", "Later"]);
}

#[test]
fn test_find_overlap_window_uses_strict_bounds() {
    let (service, _db) = setup();

    // Window is [BASE, BASE + 3h). Events touching the window at exactly
    // one boundary do not overlap.
    create_event(&service, "ends at window start", BASE - 3600, BASE);
    create_event(&service, "spans window start", BASE - 1800, BASE + 1800);
    create_event(&service, "inside window", BASE + 3600, BASE + 7200);
    create_event(&service, "spans window end", BASE + 9000, BASE + 14_400);
    create_event(
        &service,
        "starts at window end",
        BASE + THREE_HOURS,
        BASE + THREE_HOURS + 3600,
    );

    let headings: Vec<String> = service
        .find(BASE, BASE + THREE_HOURS)
        .unwrap()
        .into_iter()
        .map(|e| e.heading)
        .collect();
    assert_eq!(
        headings,
        ["spans window start", "inside window", "spans window end"]
    );
}

#[test]
fn test_find_empty_window() {
    let (service, _db) = setup();
    create_event(&service, "Far away", BASE + 100_000, BASE + 101_000);

    assert!(service.find(BASE, BASE + 10).unwrap().is_empty());
}

#[test]
fn test_update_partial_fields() {
    let (service, _db) = setup();
    let id = create_event(&service, "Planning", BASE, BASE + 3600);

    let outcome = service
        .update(id, Some("Replanning".to_string()), None, None, None)
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    let events = service.list().unwrap();
    assert_eq!(events[0].heading, "Replanning");
    assert_eq!(events[0].start_time, BASE);

    assert_eq!(
        service.update(999, Some("Ghost".to_string()), None, None, None).unwrap(),
        UpdateOutcome::NotFound
    );
    assert_eq!(
        service.update(id, None, None, None, None).unwrap(),
        UpdateOutcome::Invalid(ValidationError::NoUpdateFields)
    );
}

#[test]
fn test_update_may_invert_time_range() {
    // The start/end ordering rule is enforced at creation only; a partial
    // update can push start past the stored end. Pinned behavior.
    let (service, _db) = setup();
    let id = create_event(&service, "Shifty", BASE, BASE + 100);

    let outcome = service
        .update(id, None, Some(BASE + 500), None, None)
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    let events = service.list().unwrap();
    assert_eq!(events[0].start_time, BASE + 500);
    assert_eq!(events[0].end_time, BASE + 100);
}

#[test]
fn test_delete_removes_event_and_links() {
    let (service, db) = setup();
    let outcome = service.create("Offsite", BASE, BASE + 3600, None, &[1, 2]);
    let EventCreateOutcome::Created(id) = outcome else {
        panic!("create failed: {outcome:?}");
    };

    assert_eq!(service.delete(id), EventDeleteOutcome::Deleted);
    assert_eq!(event_count(&db), 0);
    assert!(link_rows(&db, id).is_empty());
}

#[test]
fn test_delete_missing_event_rolls_back_link_cleanup() {
    let (service, db) = setup();

    // Orphan link rows for an event that does not exist. The unit deletes
    // them first, then rolls back on the not-found check, so they survive.
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO event_contacts (event_id, contact_id) VALUES (999, 1), (999, 2)",
            [],
        )
        .unwrap()
    });

    assert_eq!(service.delete(999), EventDeleteOutcome::NotFound);
    assert_eq!(link_rows(&db, 999), [1, 2]);
}

#[test]
fn test_delete_reports_database_failure() {
    let (service, db) = setup();
    db.with_conn(|conn| conn.execute_batch("DROP TABLE event_contacts").unwrap());

    assert_eq!(service.delete(1), EventDeleteOutcome::DatabaseFailed);
}

#[test]
fn test_contact_delete_leaves_links_behind() {
    // Known inconsistency, preserved on purpose: deleting a contact does
    // not cascade to event_contacts.
    let (events, db) = setup();
    let contacts = ContactService::new(db.clone());

    let CreateOutcome::Created(contact_id) =
        contacts.create("Mallory", None, None, None).unwrap()
    else {
        panic!("contact create failed");
    };
    let outcome = events.create("One on one", BASE, BASE + 1800, None, &[contact_id]);
    let EventCreateOutcome::Created(event_id) = outcome else {
        panic!("event create failed: {outcome:?}");
    };

    assert_eq!(contacts.delete(contact_id).unwrap(), DeleteOutcome::Deleted);
    assert_eq!(link_rows(&db, event_id), [contact_id]);
}
