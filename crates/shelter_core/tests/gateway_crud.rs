use shelter_core::{
    Column, Gender, GatewayError, Operation, Pet, PetGateway, PetQuery, PetValues, ResourceType,
    ResourceUri, Route, Selection, SortOrder, Value,
};

#[test]
fn insert_then_read_item_returns_inserted_fields() {
    let gateway = PetGateway::open_in_memory().unwrap();

    let uri = gateway.insert(&gateway.collection_uri(), &toto()).unwrap();
    let Route::Item(id) = gateway.router().classify(&uri) else {
        panic!("insert should return an item identifier, got {uri}");
    };

    let rows: Vec<_> = gateway.query(&uri, &PetQuery::default()).unwrap().collect();
    assert_eq!(rows.len(), 1);
    let pet = rows.into_iter().next().unwrap().into_pet().unwrap();
    assert_eq!(
        pet,
        Pet {
            id,
            name: "Toto".to_string(),
            breed: Some("Terrier".to_string()),
            gender: Gender::Male,
            weight: 7,
        }
    );
}

#[test]
fn insert_returns_fresh_ids() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let collection = gateway.collection_uri();

    let first = gateway.insert(&collection, &toto()).unwrap();
    let second = gateway.insert(&collection, &toto()).unwrap();
    assert_ne!(first, second);
    assert_eq!(first, gateway.item_uri(1));
    assert_eq!(second, gateway.item_uri(2));
}

#[test]
fn insert_without_weight_defaults_to_zero() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let values = PetValues::new().name("Whiskers").gender(Gender::Female);

    let uri = gateway.insert(&gateway.collection_uri(), &values).unwrap();
    let pet = only_pet(&gateway, &uri);
    assert_eq!(pet.weight, 0);
    assert_eq!(pet.breed, None);
}

#[test]
fn insert_on_item_or_unmatched_identifier_is_unsupported() {
    let gateway = PetGateway::open_in_memory().unwrap();

    let err = gateway.insert(&gateway.item_uri(1), &toto()).unwrap_err();
    assert!(matches!(
        err,
        GatewayError::UnsupportedOperation {
            operation: Operation::Insert,
            ..
        }
    ));
    let err = gateway
        .insert(&ResourceUri::from("content://org.shelter.pets/owners"), &toto())
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnsupportedOperation { .. }));
    assert_eq!(gateway.count().unwrap(), 0);
}

#[test]
fn read_unmatched_identifier_fails_with_unknown_resource() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let err = gateway
        .query(&ResourceUri::from("content://org.shelter.pets/pets/x"), &PetQuery::default())
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnknownResource(_)));
}

#[test]
fn collection_read_after_delete_excludes_deleted_record() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let collection = gateway.collection_uri();
    let uris: Vec<_> = (0..5)
        .map(|_| gateway.insert(&collection, &toto()).unwrap())
        .collect();

    assert_eq!(gateway.delete(&uris[2], None).unwrap(), 1);

    let pets = gateway
        .query(&collection, &by_id_query())
        .unwrap()
        .into_pets();
    assert_eq!(pets.len(), 4);
    assert!(pets.iter().all(|pet| gateway.item_uri(pet.id) != uris[2]));
}

#[test]
fn item_read_ignores_caller_selection() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let uri = gateway.insert(&gateway.collection_uri(), &toto()).unwrap();

    let query = PetQuery {
        selection: Some(Selection::new("name = ?", vec![Value::Text("nobody".into())])),
        ..PetQuery::default()
    };
    assert_eq!(gateway.query(&uri, &query).unwrap().count(), 1);
}

#[test]
fn collection_read_applies_projection_selection_and_order() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let collection = gateway.collection_uri();
    for (name, weight) in [("Bolt", 12), ("Ash", 3), ("Cleo", 20)] {
        let values = PetValues::new()
            .name(name)
            .gender(Gender::Unknown)
            .weight(weight);
        gateway.insert(&collection, &values).unwrap();
    }

    let query = PetQuery {
        projection: Some(vec![Column::Id, Column::Name]),
        selection: Some(Selection::new("weight > ?", vec![Value::Integer(5)])),
        sort_order: vec![SortOrder::asc(Column::Name)],
    };
    let rows: Vec<_> = gateway.query(&collection, &query).unwrap().collect();
    let names: Vec<_> = rows.iter().filter_map(|row| row.name.clone()).collect();
    assert_eq!(names, vec!["Bolt", "Cleo"]);
    assert!(rows.iter().all(|row| row.weight.is_none()));
    assert!(rows.into_iter().all(|row| row.into_pet().is_none()));
}

#[test]
fn cursor_is_forward_only_and_sized() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let collection = gateway.collection_uri();
    gateway.insert(&collection, &toto()).unwrap();
    gateway.insert(&collection, &toto()).unwrap();

    let mut cursor = gateway.query(&collection, &PetQuery::default()).unwrap();
    assert_eq!(cursor.remaining(), 2);
    assert!(cursor.next().is_some());
    assert_eq!(cursor.len(), 1);
    assert!(cursor.next().is_some());
    assert!(cursor.next().is_none());
}

#[test]
fn update_item_changes_only_supplied_fields() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let uri = gateway.insert(&gateway.collection_uri(), &toto()).unwrap();

    let changed = gateway
        .update(&uri, &PetValues::new().weight(9).breed(None), None)
        .unwrap();
    assert_eq!(changed, 1);

    let pet = only_pet(&gateway, &uri);
    assert_eq!(pet.name, "Toto");
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 9);
    assert_eq!(pet.breed, None);
}

#[test]
fn update_with_empty_fields_returns_zero_and_changes_nothing() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let uri = gateway.insert(&gateway.collection_uri(), &toto()).unwrap();
    let before = only_pet(&gateway, &uri);

    assert_eq!(gateway.update(&uri, &PetValues::new(), None).unwrap(), 0);
    assert_eq!(only_pet(&gateway, &uri), before);
}

#[test]
fn update_item_overrides_caller_selection() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let collection = gateway.collection_uri();
    let first = gateway.insert(&collection, &toto()).unwrap();
    let second = gateway.insert(&collection, &toto()).unwrap();

    let match_all = Selection::new("1 = 1", Vec::new());
    let changed = gateway
        .update(&first, &PetValues::new().name("Renamed"), Some(&match_all))
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(only_pet(&gateway, &first).name, "Renamed");
    assert_eq!(only_pet(&gateway, &second).name, "Toto");
}

#[test]
fn collection_update_and_delete_honour_selection() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let collection = gateway.collection_uri();
    gateway.insert(&collection, &toto()).unwrap();
    gateway
        .insert(&collection, &PetValues::new().name("Luna").gender(Gender::Female))
        .unwrap();

    let females = Selection::new("gender = ?", vec![Value::Integer(Gender::Female.code())]);
    assert_eq!(
        gateway
            .update(&collection, &PetValues::new().weight(4), Some(&females))
            .unwrap(),
        1
    );
    assert_eq!(gateway.delete(&collection, Some(&females)).unwrap(), 1);
    assert_eq!(gateway.count().unwrap(), 1);

    assert_eq!(gateway.delete(&collection, None).unwrap(), 1);
    assert_eq!(gateway.count().unwrap(), 0);
}

#[test]
fn update_or_delete_missing_item_returns_zero() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let missing = gateway.item_uri(404);

    assert_eq!(
        gateway
            .update(&missing, &PetValues::new().name("Ghost"), None)
            .unwrap(),
        0
    );
    assert_eq!(gateway.delete(&missing, None).unwrap(), 0);
}

#[test]
fn update_and_delete_on_unmatched_identifier_are_unsupported() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let bogus = ResourceUri::from("content://elsewhere/pets");

    assert!(matches!(
        gateway.update(&bogus, &PetValues::new().weight(1), None),
        Err(GatewayError::UnsupportedOperation {
            operation: Operation::Update,
            ..
        })
    ));
    assert!(matches!(
        gateway.delete(&bogus, None),
        Err(GatewayError::UnsupportedOperation {
            operation: Operation::Delete,
            ..
        })
    ));
}

#[test]
fn malformed_selection_surfaces_store_error() {
    let gateway = PetGateway::open_in_memory().unwrap();
    let broken = Selection::new("no_such_column = ?", vec![Value::Integer(1)]);
    let err = gateway
        .delete(&gateway.collection_uri(), Some(&broken))
        .unwrap_err();
    assert!(matches!(err, GatewayError::Repo(_)));
}

#[test]
fn resource_type_and_mime_type_follow_routing() {
    let gateway = PetGateway::open_in_memory().unwrap();

    assert_eq!(
        gateway.resource_type(&gateway.collection_uri()).unwrap(),
        ResourceType::Collection
    );
    assert_eq!(
        gateway.resource_type(&gateway.item_uri(3)).unwrap(),
        ResourceType::Item
    );
    assert_eq!(
        gateway.mime_type(&gateway.item_uri(3)).unwrap(),
        "vnd.shelter.cursor.item/org.shelter.pets/pets"
    );
    assert!(matches!(
        gateway.resource_type(&ResourceUri::from("content://org.shelter.pets")),
        Err(GatewayError::UnknownResource(_))
    ));
}

fn toto() -> PetValues {
    PetValues::new()
        .name("Toto")
        .breed(Some("Terrier"))
        .gender(Gender::Male)
        .weight(7)
}

fn by_id_query() -> PetQuery {
    PetQuery {
        sort_order: vec![SortOrder::asc(Column::Id)],
        ..PetQuery::default()
    }
}

fn only_pet(gateway: &PetGateway, uri: &ResourceUri) -> Pet {
    let mut pets = gateway.query(uri, &PetQuery::default()).unwrap().into_pets();
    assert_eq!(pets.len(), 1, "expected exactly one pet at {uri}");
    pets.remove(0)
}
