use rusqlite::Connection;
use shelter_core::db::schema::stored_version;
use shelter_core::db::{open_store, open_store_in_memory};
use shelter_core::{
    DbError, GatewayError, Gender, PetGateway, PetQuery, PetValues, SchemaManager, ShelterConfig,
};
use std::time::Duration;

#[test]
fn open_store_in_memory_creates_pets_table() {
    let conn = open_store_in_memory(&SchemaManager::default()).unwrap();
    assert_eq!(stored_version(&conn).unwrap(), 1);
    assert_table_exists(&conn, "pets");
}

#[test]
fn opening_same_store_twice_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelter.db");
    let config = ShelterConfig::at_path(&path);

    {
        let gateway = PetGateway::open(&config).unwrap();
        gateway.insert(&gateway.collection_uri(), &pet()).unwrap();
    }

    let gateway = PetGateway::open(&config).unwrap();
    assert_eq!(gateway.count().unwrap(), 1);
    let conn = Connection::open(&path).unwrap();
    assert_eq!(stored_version(&conn).unwrap(), 1);
}

#[test]
fn schema_version_bump_discards_all_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelter.db");

    {
        let gateway = PetGateway::open(&ShelterConfig::at_path(&path)).unwrap();
        let collection = gateway.collection_uri();
        for _ in 0..3 {
            gateway.insert(&collection, &pet()).unwrap();
        }
    }

    let upgraded = ShelterConfig::at_path(&path).with_schema_version(2);
    let gateway = PetGateway::open(&upgraded).unwrap();
    let rows = gateway
        .query(&gateway.collection_uri(), &PetQuery::default())
        .unwrap();
    assert_eq!(rows.count(), 0);

    let uri = gateway.insert(&gateway.collection_uri(), &pet()).unwrap();
    assert_eq!(uri, gateway.item_uri(1));
}

#[test]
fn opening_store_with_newer_schema_fails_without_touching_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelter.db");
    {
        let gateway = PetGateway::open(&ShelterConfig::at_path(&path).with_schema_version(3))
            .unwrap();
        gateway.insert(&gateway.collection_uri(), &pet()).unwrap();
    }

    let err = open_store(&path, &SchemaManager::default(), Duration::from_secs(1)).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 3);
            assert_eq!(latest_supported, 1);
        }
        other => panic!("unexpected error: {other}"),
    }

    let gateway = PetGateway::open(&ShelterConfig::at_path(&path).with_schema_version(3)).unwrap();
    assert_eq!(gateway.count().unwrap(), 1);
}

#[test]
fn unreachable_store_path_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("shelter.db");

    let err = PetGateway::open(&ShelterConfig::at_path(&path)).err().unwrap();
    match err {
        GatewayError::StorageUnavailable(DbError::StorageUnavailable { path: failed, .. }) => {
            assert_eq!(failed, path);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_config_is_rejected_before_opening() {
    let config = ShelterConfig::in_memory().with_schema_version(0);
    assert!(matches!(PetGateway::open(&config), Err(GatewayError::Config(_))));
}

#[test]
fn custom_authority_changes_identifiers() {
    let config = ShelterConfig::in_memory().with_authority("com.example.rescue");
    let gateway = PetGateway::open(&config).unwrap();
    let uri = gateway.insert(&gateway.collection_uri(), &pet()).unwrap();
    assert_eq!(uri.as_str(), "content://com.example.rescue/pets/1");
}

fn pet() -> PetValues {
    PetValues::new().name("Bella").gender(Gender::Female).weight(5)
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
