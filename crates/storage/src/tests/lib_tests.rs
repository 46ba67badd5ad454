use super::*;

async fn named(storage: &Storage, first: Option<&str>, last: Option<&str>) -> Contact {
    let contact = storage.create_empty_contact().await.expect("create");
    storage
        .update_contact(
            &contact.id,
            ContactChanges {
                first: first.map(str::to_string),
                last: last.map(str::to_string),
                ..ContactChanges::default()
            },
        )
        .await
        .expect("update")
        .expect("contact exists")
}

fn ids(contacts: &[Contact]) -> Vec<ContactId> {
    contacts.iter().map(|c| c.id.clone()).collect()
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("contacts_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("contacts.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn plain_path_opens_after_normalization() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("contacts_plain_path_{suffix}"));
    let db_path = temp_root.join("contacts.db");

    let database_url = normalize_database_url(&db_path.to_string_lossy());
    let storage = Storage::new(&database_url).await.expect("db");
    storage.health_check().await.expect("health");
    drop(storage);

    assert!(db_path.exists(), "database file should exist: {}", db_path.display());
    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn created_contact_is_empty_and_listed() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let contact = storage.create_empty_contact().await.expect("create");
    assert!(contact.first.is_none());
    assert!(contact.last.is_none());
    assert!(!contact.favorite);

    let listed = storage.get_contacts(None).await.expect("list");
    assert_eq!(ids(&listed), vec![contact.id.clone()]);

    let loaded = storage
        .get_contact(&contact.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(loaded, contact);
}

#[tokio::test]
async fn search_matches_first_or_last_name_case_insensitively() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ada = named(&storage, Some("Ada"), Some("Lovelace")).await;
    let bo = named(&storage, Some("Bo"), None).await;
    let _grace = named(&storage, Some("Grace"), Some("Hopper")).await;

    let by_first = storage.get_contacts(Some("ada")).await.expect("search");
    assert_eq!(ids(&by_first), vec![ada.id.clone()]);

    let by_last = storage.get_contacts(Some("LOVE")).await.expect("search");
    assert_eq!(ids(&by_last), vec![ada.id.clone()]);

    let by_fragment = storage.get_contacts(Some("o")).await.expect("search");
    assert_eq!(by_fragment.len(), 3);
    assert!(ids(&by_fragment).contains(&bo.id));
}

#[tokio::test]
async fn search_folds_case_beyond_ascii() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let elodie = named(&storage, Some("Élodie"), Some("Ørsted")).await;
    named(&storage, Some("Ada"), None).await;

    for query in ["Élodie", "élodie", "ÉLODIE", "ørs", "ØRSTED"] {
        let found = storage.get_contacts(Some(query)).await.expect("search");
        assert_eq!(ids(&found), vec![elodie.id.clone()], "query {query}");
    }
}

#[tokio::test]
async fn blank_query_returns_everything() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    named(&storage, Some("Ada"), None).await;
    named(&storage, Some("Bo"), None).await;

    let all = storage.get_contacts(None).await.expect("all");
    let blank = storage.get_contacts(Some("   ")).await.expect("blank");
    assert_eq!(ids(&all), ids(&blank));
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn wildcard_characters_in_query_match_literally() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    named(&storage, Some("Ada"), None).await;
    let percent = named(&storage, Some("100%"), None).await;

    assert_eq!(
        ids(&storage.get_contacts(Some("%")).await.expect("search")),
        vec![percent.id]
    );
    assert!(storage
        .get_contacts(Some("_"))
        .await
        .expect("search")
        .is_empty());
}

#[tokio::test]
async fn contacts_sort_by_last_name_then_creation() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let unnamed = storage.create_empty_contact().await.expect("create");
    let turing = named(&storage, Some("Alan"), Some("Turing")).await;
    let hopper = named(&storage, Some("Grace"), Some("Hopper")).await;
    let hopper_two = named(&storage, Some("Other"), Some("Hopper")).await;

    let listed = storage.get_contacts(None).await.expect("list");
    assert_eq!(
        ids(&listed),
        vec![hopper.id, hopper_two.id, turing.id, unnamed.id]
    );
}

#[tokio::test]
async fn update_normalizes_blank_fields() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let contact = storage.create_empty_contact().await.expect("create");
    let updated = storage
        .update_contact(
            &contact.id,
            ContactChanges {
                first: Some("Ada".into()),
                last: Some("  ".into()),
                notes: Some("first programmer".into()),
                ..ContactChanges::default()
            },
        )
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.first.as_deref(), Some("Ada"));
    assert!(updated.last.is_none());
    assert_eq!(updated.notes.as_deref(), Some("first programmer"));
    assert_eq!(updated.created_at, contact.created_at);
}

#[tokio::test]
async fn update_of_unknown_contact_returns_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let result = storage
        .update_contact(&ContactId("missing".into()), ContactChanges::default())
        .await
        .expect("update");
    assert!(result.is_none());
    assert!(storage
        .set_favorite(&ContactId("missing".into()), true)
        .await
        .expect("favorite")
        .is_none());
}

#[tokio::test]
async fn set_favorite_toggles_flag() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let contact = storage.create_empty_contact().await.expect("create");
    let starred = storage
        .set_favorite(&contact.id, true)
        .await
        .expect("favorite")
        .expect("exists");
    assert!(starred.favorite);
    let unstarred = storage
        .set_favorite(&contact.id, false)
        .await
        .expect("favorite")
        .expect("exists");
    assert!(!unstarred.favorite);
}

#[tokio::test]
async fn delete_removes_contact_and_ignores_unknown_ids() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ada = named(&storage, Some("Ada"), None).await;
    let bo = named(&storage, Some("Bo"), None).await;

    assert!(storage.delete_contact(&bo.id).await.expect("delete"));
    assert!(!storage.delete_contact(&bo.id).await.expect("delete again"));
    assert_eq!(
        ids(&storage.get_contacts(None).await.expect("list")),
        vec![ada.id]
    );
}

#[tokio::test]
async fn seeding_only_fills_an_empty_store() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let inserted = storage.seed_demo_contacts().await.expect("seed");
    assert_eq!(inserted, demo_contacts().len());
    assert_eq!(storage.count_contacts().await.expect("count"), inserted as i64);

    assert_eq!(storage.seed_demo_contacts().await.expect("reseed"), 0);
    assert_eq!(storage.count_contacts().await.expect("count"), inserted as i64);
}

#[test]
fn sqlite_path_skips_memory_urls() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/contacts.db?mode=rwc"),
        Some(PathBuf::from("./data/contacts.db"))
    );
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_sqlite_urls_and_memory_databases() {
    assert_eq!(
        normalize_database_url("sqlite://./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
}

#[test]
fn blank_database_url_falls_back_to_default() {
    assert_eq!(normalize_database_url("   "), DEFAULT_DATABASE_URL);
}

#[test]
fn converts_windows_separators() {
    assert_eq!(
        normalize_database_url("C:\\Users\\alice\\contacts.db"),
        "sqlite://C:/Users/alice/contacts.db"
    );
}
