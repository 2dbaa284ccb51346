use shelter_core::{DatabaseLocation, ShelterConfig};
use std::path::PathBuf;

#[test]
fn partial_json_config_fills_defaults() {
    let config: ShelterConfig =
        serde_json::from_str(r#"{ "schema_version": 2 }"#).unwrap();
    assert_eq!(config.schema_version, 2);
    assert_eq!(config.authority, "org.shelter.pets");
    assert_eq!(config.database, DatabaseLocation::Memory);
    config.validate().unwrap();
}

#[test]
fn file_location_deserializes_with_path() {
    let config: ShelterConfig = serde_json::from_str(
        r#"{
            "authority": "org.example.pets",
            "database": { "kind": "file", "path": "/var/lib/shelter/shelter.db" },
            "busy_timeout_ms": 250
        }"#,
    )
    .unwrap();
    assert_eq!(
        config.database,
        DatabaseLocation::File(PathBuf::from("/var/lib/shelter/shelter.db"))
    );
    assert_eq!(config.busy_timeout_ms, 250);
}

#[test]
fn config_roundtrips_through_json() {
    let config = ShelterConfig::at_path("/tmp/pets.db").with_schema_version(4);
    let json = serde_json::to_string(&config).unwrap();
    let parsed: ShelterConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
