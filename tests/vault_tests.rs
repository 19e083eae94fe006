//! Integration tests for the vault engine: authentication state
//! machine, item lifecycle, and export/import.

use chaffvault::audit::AuditKind;
use chaffvault::errors::VaultError;
use chaffvault::store::Namespace;
use chaffvault::vault::{ItemKind, ItemPatch, NewItem, Vault};
use serde_json::{json, Map, Value};

// Fast KDF setting so the test suite stays quick.
const TEST_ITERATIONS: u32 = 1_000;

fn new_vault(password: &str) -> Vault {
    let mut vault = Vault::in_memory().expect("open in-memory vault");
    assert!(vault.initialize(password, TEST_ITERATIONS).unwrap());
    vault
}

fn sample_data() -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("username".to_string(), json!("a"));
    data.insert("password".to_string(), json!("b"));
    data
}

fn bank_item() -> NewItem {
    NewItem {
        name: "Bank".to_string(),
        kind: ItemKind::Password,
        data: sample_data(),
    }
}

// ---------------------------------------------------------------------------
// Authentication state machine
// ---------------------------------------------------------------------------

#[test]
fn initialize_then_authenticate_roundtrips() {
    let mut vault = new_vault("correct horse");

    assert!(vault.is_unlock_required().unwrap());

    let session = vault.authenticate("correct horse").expect("unlock");

    // The session key must actually work for seal/open.
    let id = vault.create_item(&session, bank_item()).unwrap();
    let item = vault.read_item(&session, &id).unwrap().expect("item exists");
    assert_eq!(item.name, "Bank");
}

#[test]
fn authenticate_with_wrong_password_fails() {
    let mut vault = new_vault("password-one");

    let result = vault.authenticate("password-two");
    assert!(matches!(result, Err(VaultError::AuthMismatch)));
}

#[test]
fn authenticate_before_initialize_reports_missing_auth_data() {
    let mut vault = Vault::in_memory().unwrap();

    assert!(!vault.is_unlock_required().unwrap());
    let result = vault.authenticate("anything");
    assert!(matches!(result, Err(VaultError::AuthDataMissing)));
}

#[test]
fn missing_master_key_is_its_own_failure() {
    let mut vault = new_vault("some password");

    // Salt present, key entry gone: the key's absence is the
    // authoritative signal.
    vault
        .store()
        .remove(Namespace::Credentials, "masterKey")
        .unwrap();

    assert!(!vault.is_unlock_required().unwrap());
    let result = vault.authenticate("some password");
    assert!(matches!(result, Err(VaultError::MasterKeyMissing)));
}

#[test]
fn double_initialize_is_rejected() {
    let mut vault = new_vault("first password");
    assert!(!vault.initialize("second password", TEST_ITERATIONS).unwrap());

    // The original password still unlocks.
    assert!(vault.authenticate("first password").is_ok());
}

#[test]
fn every_unlock_attempt_is_audited() {
    let mut vault = new_vault("audit me");

    let _ = vault.authenticate("wrong");
    let _ = vault.authenticate("audit me").unwrap();

    let events = vault.query_audit(50, 0).unwrap();
    let unlocks: Vec<_> = events
        .iter()
        .filter(|e| e.kind == AuditKind::UnlockAttempt)
        .collect();

    assert_eq!(unlocks.len(), 2);
    assert!(unlocks.iter().any(|e| e.details["success"] == json!(true)));
    assert!(unlocks.iter().any(|e| e.details["success"] == json!(false)));
}

#[test]
fn stale_rotation_timestamp_is_reset_on_unlock() {
    let mut vault = new_vault("rotate me");

    // Pretend the last rotation was at epoch-ms 1 (far beyond 30 days).
    vault
        .store()
        .set(Namespace::Metadata, "lastKeyRotation", "1")
        .unwrap();

    vault.authenticate("rotate me").unwrap();

    let last = vault.last_rotation().unwrap().expect("timestamp present");
    assert!(last > 1, "stale rotation timestamp should be reset to now");
}

#[test]
fn fresh_rotation_timestamp_is_left_alone() {
    let mut vault = new_vault("rotate me");

    let before = vault.last_rotation().unwrap().expect("set at init");
    vault.authenticate("rotate me").unwrap();
    let after = vault.last_rotation().unwrap().expect("still present");

    assert_eq!(before, after);
}

// ---------------------------------------------------------------------------
// Item lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_read_update_delete_item() {
    let mut vault = new_vault("lifecycle");
    let session = vault.authenticate("lifecycle").unwrap();

    let id = vault.create_item(&session, bank_item()).unwrap();

    let item = vault.read_item(&session, &id).unwrap().expect("created");
    assert_eq!(item.kind, ItemKind::Password);
    assert_eq!(item.data["username"], json!("a"));
    assert_eq!(item.created_at, item.updated_at);

    std::thread::sleep(std::time::Duration::from_millis(5));
    vault
        .update_item(
            &session,
            &id,
            ItemPatch {
                name: Some("Bank (new)".to_string()),
                ..ItemPatch::default()
            },
        )
        .unwrap();

    let updated = vault.read_item(&session, &id).unwrap().expect("updated");
    assert_eq!(updated.name, "Bank (new)");
    // Unpatched fields survive the merge.
    assert_eq!(updated.data["password"], json!("b"));
    assert!(updated.updated_at > updated.created_at);

    vault.delete_item(&session, &id).unwrap();
    assert!(vault.read_item(&session, &id).unwrap().is_none());
}

#[test]
fn read_missing_item_returns_none() {
    let mut vault = new_vault("missing");
    let session = vault.authenticate("missing").unwrap();

    assert!(vault.read_item(&session, "no_such_id").unwrap().is_none());
}

#[test]
fn update_missing_item_is_record_not_found() {
    let mut vault = new_vault("missing");
    let session = vault.authenticate("missing").unwrap();

    let result = vault.update_item(&session, "no_such_id", ItemPatch::default());
    assert!(matches!(result, Err(VaultError::RecordNotFound(_))));
}

#[test]
fn delete_is_unconditional() {
    let mut vault = new_vault("deleter");
    let session = vault.authenticate("deleter").unwrap();

    // Deleting a nonexistent record succeeds and is still audited.
    vault.delete_item(&session, "never_existed").unwrap();

    let events = vault.query_audit(50, 0).unwrap();
    assert!(events.iter().any(|e| e.kind == AuditKind::ItemDelete));
}

#[test]
fn list_items_is_newest_first() {
    let mut vault = new_vault("lister");
    let session = vault.authenticate("lister").unwrap();

    let first = vault.create_item(&session, bank_item()).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = vault
        .create_item(
            &session,
            NewItem {
                name: "Note".to_string(),
                kind: ItemKind::Note,
                data: Map::new(),
            },
        )
        .unwrap();

    let items = vault.list_items(&session).unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    // Updating the older item moves it to the front.
    std::thread::sleep(std::time::Duration::from_millis(5));
    vault
        .update_item(&session, &first, ItemPatch::default())
        .unwrap();
    let items = vault.list_items(&session).unwrap();
    assert_eq!(items[0].id, first);
}

#[test]
fn corrupt_record_is_dropped_from_listing_but_loud_on_read() {
    let mut vault = new_vault("corruption");
    let session = vault.authenticate("corruption").unwrap();

    let good = vault.create_item(&session, bank_item()).unwrap();
    let bad = vault
        .create_item(
            &session,
            NewItem {
                name: "Doomed".to_string(),
                kind: ItemKind::Other,
                data: Map::new(),
            },
        )
        .unwrap();

    // Clobber one record's stored envelope.
    vault
        .store()
        .set(Namespace::Records, &bad, "not an envelope")
        .unwrap();

    // Listing silently drops the corrupt record.
    let items = vault.list_items(&session).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, good);

    // A direct read surfaces the corruption.
    let result = vault.read_item(&session, &bad);
    assert!(matches!(result, Err(VaultError::DecryptionFailed)));
}

#[test]
fn every_mutation_appends_one_audit_event() {
    let mut vault = new_vault("counter");
    let session = vault.authenticate("counter").unwrap();

    let id = vault.create_item(&session, bank_item()).unwrap();
    vault
        .update_item(&session, &id, ItemPatch::default())
        .unwrap();
    vault.delete_item(&session, &id).unwrap();

    let events = vault.query_audit(50, 0).unwrap();
    let count = |kind: AuditKind| events.iter().filter(|e| e.kind == kind).count();
    assert_eq!(count(AuditKind::ItemCreate), 1);
    assert_eq!(count(AuditKind::ItemUpdate), 1);
    assert_eq!(count(AuditKind::ItemDelete), 1);
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

#[test]
fn export_contains_ciphertext_but_no_key_and_no_audit() {
    let mut vault = new_vault("exporter");
    let session = vault.authenticate("exporter").unwrap();
    let id = vault.create_item(&session, bank_item()).unwrap();

    let doc = vault.export_all().unwrap();

    assert!(doc.data.contains_key(&id));
    assert!(doc.meta.contains_key("salt"));
    assert!(!doc.meta.contains_key("masterKey"));

    let json = serde_json::to_string(&doc).unwrap();
    assert!(
        !json.contains("\"b\""),
        "plaintext field values must not appear in the export"
    );
}

#[test]
fn import_of_own_export_is_idempotent() {
    let mut vault = new_vault("idempotent");
    let session = vault.authenticate("idempotent").unwrap();
    vault.create_item(&session, bank_item()).unwrap();

    let doc = vault.export_all().unwrap();
    let events_before = vault.query_audit(100, 0).unwrap().len();

    let counts = vault.import_all(&doc).unwrap();
    assert_eq!(counts.data, 1);

    // Same items, same content, exactly one extra audit event.
    let items = vault.list_items(&session).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Bank");

    let events = vault.query_audit(100, 0).unwrap();
    assert_eq!(events.len(), events_before + 1);
    assert_eq!(
        events
            .iter()
            .filter(|e| e.kind == AuditKind::Import)
            .count(),
        1
    );
}

#[test]
fn import_merges_without_replacing_existing_records() {
    let mut source = new_vault("shared password");
    let session = source.authenticate("shared password").unwrap();
    source.create_item(&session, bank_item()).unwrap();
    let doc = source.export_all().unwrap();

    // A second vault with its own extra item; import must keep it.
    // (The import overwrites the salt/key metadata of the source vault,
    // so both vaults share one password here.)
    let mut target = new_vault("shared password");
    let target_session = target.authenticate("shared password").unwrap();
    target
        .create_item(
            &target_session,
            NewItem {
                name: "Local".to_string(),
                kind: ItemKind::Note,
                data: Map::new(),
            },
        )
        .unwrap();

    target.import_all(&doc).unwrap();

    // The imported record was sealed under the source vault's key, so
    // it is dropped from the listing; the local record survives.
    let names: Vec<String> = target
        .list_items(&target_session)
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert!(names.contains(&"Local".to_string()));
}

#[test]
fn malformed_import_document_is_rejected() {
    let mut vault = new_vault("importer");

    let result = vault.import_json("{\"not\": \"an export\"}");
    assert!(matches!(result, Err(VaultError::ImportCorrupt(_))));

    let result = vault.import_json("not json at all");
    assert!(matches!(result, Err(VaultError::ImportCorrupt(_))));
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_unlock_cycle() {
    let mut vault = Vault::in_memory().unwrap();
    assert!(vault.initialize("Str0ng!Pass", TEST_ITERATIONS).unwrap());

    let session = vault.authenticate("Str0ng!Pass").unwrap();
    let id = vault.create_item(&session, bank_item()).unwrap();

    let items = vault.list_items(&session).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Bank");

    // Lock: discard the session (zeroizes the in-memory key).
    drop(session);

    assert!(matches!(
        vault.authenticate("wrong"),
        Err(VaultError::AuthMismatch)
    ));

    let session = vault.authenticate("Str0ng!Pass").unwrap();
    let item = vault.read_item(&session, &id).unwrap().expect("still there");
    assert_eq!(item.data["username"], json!("a"));
    assert_eq!(item.data["password"], json!("b"));
}
